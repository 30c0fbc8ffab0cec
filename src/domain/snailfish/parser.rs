//! Bracket syntax parser: `[[1,2],3]`.

use std::str::FromStr;

use nom::branch::alt;
use nom::character::complete::{char, multispace0, u32 as regular};
use nom::combinator::{all_consuming, map};
use nom::error::{Error, ErrorKind, ParseError};
use nom::sequence::{delimited, separated_pair};
use nom::{IResult, Parser};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::snailfish::arena::{Element, SnailNumber};

/// A combinator that takes a parser `inner` and produces a parser that also consumes both leading and
/// trailing whitespace, returning the output of `inner`.
fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: Parser<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Deepest accepted bracket nesting. Reduced numbers never exceed 4.
pub const MAX_NESTING: usize = 128;

// Regulars are parsed as u32: explode only moves value between regulars and
// split preserves it, so u64 sums of u32 inputs cannot overflow.
fn element(input: &str, depth: usize) -> IResult<&str, Element> {
    alt((
        map(ws(regular), |v| Element::Regular(u64::from(v))),
        |i| pair(i, depth),
    ))(input)
}

fn pair(input: &str, depth: usize) -> IResult<&str, Element> {
    if depth >= MAX_NESTING {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    map(
        delimited(
            ws(char('[')),
            separated_pair(
                |i| element(i, depth + 1),
                ws(char(',')),
                |i| element(i, depth + 1),
            ),
            ws(char(']')),
        ),
        |(left, right)| Element::Pair(Box::new(left), Box::new(right)),
    )(input)
}

/// Parse one snailfish number; `line` is only used for error reporting.
#[instrument(level = "trace")]
pub fn parse_number(text: &str, line: usize) -> DomainResult<SnailNumber> {
    match all_consuming(|i| element(i, 0))(text) {
        Ok((_, element)) => Ok(SnailNumber::from_element(&element)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let column = text.len() - e.input.len() + 1;
            let found: String = e.input.chars().take(12).collect();
            let message = if e.code == ErrorKind::TooLarge {
                format!("nesting deeper than {} pairs", MAX_NESTING)
            } else if found.is_empty() {
                "unexpected end of number".to_string()
            } else {
                format!("unexpected {:?}", found)
            };
            debug!("parse failed at {}:{}: {}", line, column, message);
            Err(DomainError::Parse {
                line,
                column,
                message,
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(DomainError::parse(line, "incomplete number")),
    }
}

/// Parse one number per non-blank line.
#[instrument(level = "debug", skip(input))]
pub fn parse_numbers(input: &str) -> DomainResult<Vec<SnailNumber>> {
    let numbers = input
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(i, text)| parse_number(text, i + 1))
        .collect::<DomainResult<Vec<_>>>()?;
    if numbers.is_empty() {
        return Err(DomainError::EmptyInput);
    }
    debug!("parsed {} snailfish numbers", numbers.len());
    Ok(numbers)
}

impl FromStr for SnailNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_number(s, 1)
    }
}
