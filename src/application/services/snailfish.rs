//! Snailfish arithmetic on numbers given as text
//!
//! Backs the `snail` subcommands: each operation parses its arguments, then
//! works on the arena representation.

use termtree::Tree;
use tracing::instrument;

use crate::application::ApplicationResult;
use crate::domain::snailfish::{parse_number, SnailNumber};

/// Result of adding a list of numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnailSum {
    pub total: SnailNumber,
    pub magnitude: u64,
}

/// Stateless service for the `snail` subcommands.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnailfishService;

impl SnailfishService {
    /// Parse each argument; errors report the 1-based argument position as the line.
    pub fn parse_all<S: AsRef<str>>(&self, numbers: &[S]) -> ApplicationResult<Vec<SnailNumber>> {
        Ok(numbers
            .iter()
            .enumerate()
            .map(|(i, text)| parse_number(text.as_ref().trim(), i + 1))
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Reduced left-to-right sum.
    #[instrument(level = "debug", skip_all, fields(count = numbers.len()))]
    pub fn add<S: AsRef<str>>(&self, numbers: &[S]) -> ApplicationResult<SnailSum> {
        let parsed = self.parse_all(numbers)?;
        let total = SnailNumber::sum(&parsed)?;
        let magnitude = total.magnitude()?;
        Ok(SnailSum { total, magnitude })
    }

    /// Magnitude as written, without reducing first.
    pub fn magnitude(&self, number: &str) -> ApplicationResult<u64> {
        Ok(parse_number(number.trim(), 1)?.magnitude()?)
    }

    /// Fully reduced form and the number of rewrite steps it took.
    pub fn reduce(&self, number: &str) -> ApplicationResult<(SnailNumber, usize)> {
        let mut parsed = parse_number(number.trim(), 1)?;
        let steps = parsed.reduce();
        Ok((parsed, steps))
    }

    pub fn tree(&self, number: &str) -> ApplicationResult<Tree<String>> {
        Ok(parse_number(number.trim(), 1)?.to_tree_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::domain::DomainError;

    #[test]
    fn given_two_numbers_when_adding_then_returns_reduced_sum_and_magnitude() {
        let sum = SnailfishService
            .add(&["[[[[4,3],4],4],[7,[[8,4],9]]]", "[1,1]"])
            .unwrap();
        assert_eq!(sum.total.to_string(), "[[[[0,7],4],[[7,8],[6,0]]],[8,1]]");
        assert_eq!(sum.magnitude, sum.total.magnitude().unwrap());
    }

    #[test]
    fn given_no_numbers_when_adding_then_empty_input() {
        let err = SnailfishService.add::<&str>(&[]).unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(DomainError::EmptyInput)));
    }

    #[test]
    fn given_bad_second_argument_when_adding_then_reports_its_position() {
        let err = SnailfishService.add(&["[1,2]", "[3,"]).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn given_unreduced_number_when_taking_magnitude_then_not_reduced() {
        // [[12,0],0] reduces to [[[6,6],0],0] with a different magnitude
        assert_eq!(SnailfishService.magnitude("[[12,0],0]").unwrap(), 3 * 36);
    }

    #[test]
    fn given_splittable_number_when_reducing_then_counts_steps() {
        let (reduced, steps) = SnailfishService.reduce("[11,1]").unwrap();
        assert_eq!(reduced.to_string(), "[[5,6],1]");
        assert_eq!(steps, 1);
    }

    #[test]
    fn given_deep_unreduced_number_when_taking_magnitude_then_overflow_error() {
        let text = format!("{}4294967295{}", "[".repeat(40), ",0]".repeat(40));
        let err = SnailfishService.magnitude(&text).unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(DomainError::Overflow(_))));
    }
}
