//! Explode and split rewrite rules, addition and the pairwise search.

use std::ops::Add;

use generational_arena::Index;
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::snailfish::arena::{NodeKind, SnailNode, SnailNumber};

/// Pairs nested this deep (root = 0) or deeper explode.
pub const EXPLODE_DEPTH: usize = 4;

/// Regulars at or above this value split.
pub const SPLIT_THRESHOLD: u64 = 10;

/// Which rewrite rule a reduction step applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Explode,
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    fn pick(self, left: Index, right: Index) -> Index {
        match self {
            Side::Left => left,
            Side::Right => right,
        }
    }
}

impl SnailNumber {
    /// Apply one rewrite: the leftmost explode if any pair qualifies, else the
    /// leftmost split. Returns None once the number is fully reduced.
    pub fn reduce_step(&mut self) -> Option<Reduction> {
        if let Some(idx) = self.find_explodable() {
            self.explode(idx);
            return Some(Reduction::Explode);
        }
        if let Some(idx) = self.find_splittable() {
            self.split(idx);
            return Some(Reduction::Split);
        }
        None
    }

    /// Reduce in place until no rule applies; returns the number of steps taken.
    #[instrument(level = "debug", skip(self))]
    pub fn reduce(&mut self) -> usize {
        let mut steps = 0;
        while let Some(rule) = self.reduce_step() {
            trace!("{:?}: {}", rule, self);
            steps += 1;
        }
        debug!("reduced in {} steps", steps);
        steps
    }

    /// `[self, rhs]` reduced. Both operands are deep-copied and left untouched.
    pub fn add(&self, rhs: &SnailNumber) -> SnailNumber {
        let mut sum = SnailNumber::join(self, rhs);
        sum.reduce();
        sum
    }

    /// Left fold of `add` over `numbers`.
    #[instrument(level = "debug", skip_all)]
    pub fn sum<'a, I>(numbers: I) -> DomainResult<SnailNumber>
    where
        I: IntoIterator<Item = &'a SnailNumber>,
    {
        let mut numbers = numbers.into_iter();
        let first = numbers.next().ok_or(DomainError::EmptyInput)?.clone();
        Ok(numbers.fold(first, |acc, next| acc.add(next)))
    }

    fn find_explodable(&self) -> Option<Index> {
        self.iter()
            .find(|(_, depth, node)| *depth >= EXPLODE_DEPTH && self.is_regular_pair(node))
            .map(|(idx, _, _)| idx)
    }

    fn find_splittable(&self) -> Option<Index> {
        self.iter()
            .find(|(_, _, node)| matches!(node.kind, NodeKind::Regular(v) if v >= SPLIT_THRESHOLD))
            .map(|(idx, _, _)| idx)
    }

    fn is_regular_pair(&self, node: &SnailNode) -> bool {
        match node.kind {
            NodeKind::Pair { left, right } => {
                self.regular_value(left).is_some() && self.regular_value(right).is_some()
            }
            NodeKind::Regular(_) => false,
        }
    }

    fn explode(&mut self, idx: Index) {
        let NodeKind::Pair { left, right } = self.node(idx).kind else {
            return;
        };
        let (Some(left_value), Some(right_value)) =
            (self.regular_value(left), self.regular_value(right))
        else {
            return;
        };

        if let Some(previous) = self.neighbour(idx, Side::Left) {
            self.add_to_regular(previous, left_value);
        }
        if let Some(next) = self.neighbour(idx, Side::Right) {
            self.add_to_regular(next, right_value);
        }

        self.arena.remove(left);
        self.arena.remove(right);
        self.node_mut(idx).kind = NodeKind::Regular(0);
    }

    fn split(&mut self, idx: Index) {
        let NodeKind::Regular(value) = self.node(idx).kind else {
            return;
        };
        let left = self.arena.insert(SnailNode {
            kind: NodeKind::Regular(value / 2),
            parent: Some(idx),
        });
        let right = self.arena.insert(SnailNode {
            kind: NodeKind::Regular(value.div_ceil(2)),
            parent: Some(idx),
        });
        self.node_mut(idx).kind = NodeKind::Pair { left, right };
    }

    /// Nearest regular on `side` of `from` in in-order traversal.
    ///
    /// Walks up until `from` lies in the opposite subtree of an ancestor, then
    /// descends that ancestor's `side` child toward the opposite edge.
    fn neighbour(&self, from: Index, side: Side) -> Option<Index> {
        let mut current = from;
        loop {
            let parent = self.node(current).parent?;
            let NodeKind::Pair { left, right } = self.node(parent).kind else {
                return None;
            };
            let sibling = side.pick(left, right);
            if sibling == current {
                current = parent;
                continue;
            }
            return Some(self.outermost_regular(sibling, side.opposite()));
        }
    }

    fn outermost_regular(&self, from: Index, toward: Side) -> Index {
        let mut current = from;
        while let NodeKind::Pair { left, right } = self.node(current).kind {
            current = toward.pick(left, right);
        }
        current
    }

    fn add_to_regular(&mut self, idx: Index, amount: u64) {
        if let NodeKind::Regular(value) = &mut self.node_mut(idx).kind {
            // regulars parse as u32 and explode never grows their total
            *value += amount;
        }
    }
}

impl Add<&SnailNumber> for &SnailNumber {
    type Output = SnailNumber;

    fn add(self, rhs: &SnailNumber) -> SnailNumber {
        SnailNumber::add(self, rhs)
    }
}

/// Largest magnitude of `a + b` over all ordered pairs of distinct positions.
///
/// None when fewer than two numbers are given. Any sum whose magnitude
/// overflows fails the whole search.
#[instrument(level = "debug", skip_all, fields(count = numbers.len()))]
pub fn largest_pair_magnitude(numbers: &[SnailNumber]) -> DomainResult<Option<u64>> {
    let n = numbers.len();
    (0..n)
        .into_par_iter()
        .flat_map_iter(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
        .map(|(i, j)| numbers[i].add(&numbers[j]).magnitude())
        .try_reduce_with(|a, b| Ok(a.max(b)))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snail(text: &str) -> SnailNumber {
        text.parse().unwrap()
    }

    #[rstest]
    #[case("[[[[[9,8],1],2],3],4]", "[[[[0,9],2],3],4]")]
    #[case("[7,[6,[5,[4,[3,2]]]]]", "[7,[6,[5,[7,0]]]]")]
    #[case("[[6,[5,[4,[3,2]]]],1]", "[[6,[5,[7,0]]],3]")]
    #[case(
        "[[3,[2,[1,[7,3]]]],[6,[5,[4,[3,2]]]]]",
        "[[3,[2,[8,0]]],[9,[5,[4,[3,2]]]]]"
    )]
    #[case(
        "[[3,[2,[8,0]]],[9,[5,[4,[3,2]]]]]",
        "[[3,[2,[8,0]]],[9,[5,[7,0]]]]"
    )]
    fn given_deep_pair_when_stepping_then_explodes_once(#[case] before: &str, #[case] after: &str) {
        let mut number = snail(before);
        assert_eq!(number.reduce_step(), Some(Reduction::Explode));
        assert_eq!(number.to_string(), after);
    }

    #[rstest]
    #[case("10", "[5,5]")]
    #[case("11", "[5,6]")]
    #[case("[12,1]", "[[6,6],1]")]
    #[case("[[[[0,7],4],[15,[0,13]]],[1,1]]", "[[[[0,7],4],[[7,8],[0,13]]],[1,1]]")]
    fn given_large_regular_when_stepping_then_splits_leftmost(#[case] before: &str, #[case] after: &str) {
        let mut number = snail(before);
        assert_eq!(number.reduce_step(), Some(Reduction::Split));
        assert_eq!(number.to_string(), after);
    }

    #[test]
    fn given_split_and_explode_eligible_when_stepping_then_explode_goes_first() {
        // 12 precedes the deep pair left-to-right, but explode has priority
        let mut number = snail("[[12,1],[[[[1,2],3],4],5]]");

        assert_eq!(number.reduce_step(), Some(Reduction::Explode));
        assert_eq!(number.to_string(), "[[12,2],[[[0,5],4],5]]");

        assert_eq!(number.reduce_step(), Some(Reduction::Split));
        assert_eq!(number.to_string(), "[[[6,6],2],[[[0,5],4],5]]");

        assert_eq!(number.reduce_step(), None);
    }

    #[test]
    fn given_reduced_number_when_stepping_then_nothing_applies() {
        let mut number = snail("[[[[0,7],4],[[7,8],[6,0]]],[8,1]]");
        assert_eq!(number.reduce_step(), None);
        assert_eq!(number.reduce(), 0);
    }

    #[test]
    fn given_walkthrough_operands_when_adding_then_matches_known_result() {
        let a = snail("[[[[4,3],4],4],[7,[[8,4],9]]]");
        let b = snail("[1,1]");

        let sum = a.add(&b);

        assert_eq!(sum.to_string(), "[[[[0,7],4],[[7,8],[6,0]]],[8,1]]");
        assert_eq!(sum.magnitude().unwrap(), 1384);
        // operands survive for reuse
        assert_eq!(a.to_string(), "[[[[4,3],4],4],[7,[[8,4],9]]]");
        assert_eq!(b.to_string(), "[1,1]");
    }

    #[test]
    fn given_explosions_when_reducing_then_no_orphan_nodes_remain() {
        let mut number = SnailNumber::join(&snail("[[[[4,3],4],4],[7,[[8,4],9]]]"), &snail("[1,1]"));
        number.reduce();

        let reachable = number.iter().count();
        assert_eq!(reachable, number.len());
    }

    #[test]
    fn given_asymmetric_pair_when_adding_both_ways_then_magnitudes_differ() {
        let a = snail("[1,2]");
        let b = snail("[3,4]");
        assert_eq!((&a + &b).magnitude().unwrap(), 55);
        assert_eq!((&b + &a).magnitude().unwrap(), 65);
    }

    #[rstest]
    #[case("[[1,2],[[3,4],5]]", 143)]
    #[case("[[[[0,7],4],[[7,8],[6,0]]],[8,1]]", 1384)]
    #[case("[[[[1,1],[2,2]],[3,3]],[4,4]]", 445)]
    #[case("[[[[3,0],[5,3]],[4,4]],[5,5]]", 791)]
    #[case("[[[[5,0],[7,4]],[5,5]],[6,6]]", 1137)]
    #[case("[[[[8,7],[7,7]],[[8,6],[7,7]]],[[[0,7],[6,6]],[8,7]]]", 3488)]
    fn given_number_when_measuring_then_returns_magnitude(#[case] text: &str, #[case] expected: u64) {
        assert_eq!(snail(text).magnitude().unwrap(), expected);
    }

    #[rstest]
    #[case(4, "[[[[1,1],[2,2]],[3,3]],[4,4]]")]
    #[case(5, "[[[[3,0],[5,3]],[4,4]],[5,5]]")]
    #[case(6, "[[[[5,0],[7,4]],[5,5]],[6,6]]")]
    fn given_ascending_pairs_when_summing_then_matches_known_result(
        #[case] count: u64,
        #[case] expected: &str,
    ) {
        let numbers: Vec<SnailNumber> = (1..=count)
            .map(|i| snail(&format!("[{},{}]", i, i)))
            .collect();
        assert_eq!(SnailNumber::sum(&numbers).unwrap().to_string(), expected);
    }

    #[test]
    fn given_no_numbers_when_summing_then_empty_input() {
        let numbers: Vec<SnailNumber> = Vec::new();
        assert_eq!(SnailNumber::sum(&numbers).unwrap_err(), DomainError::EmptyInput);
    }

    #[test]
    fn given_single_number_when_searching_pairs_then_none() {
        assert_eq!(largest_pair_magnitude(&[snail("[1,2]")]), Ok(None));
        assert_eq!(largest_pair_magnitude(&[]), Ok(None));
    }

    #[test]
    fn given_two_numbers_when_searching_pairs_then_takes_better_order() {
        let numbers = [snail("[1,2]"), snail("[3,4]")];
        assert_eq!(largest_pair_magnitude(&numbers), Ok(Some(65)));
    }
}
