//! BITS transmissions: a hexadecimal string decoded into a tree of literal
//! and operator packets.
//!
//! Every packet starts with a 3-bit version and a 3-bit type id. Type 4 is a
//! literal made of 5-bit groups (continuation bit plus nibble). Every other
//! type is an operator whose subpackets are framed either by a 15-bit total
//! bit length or by an 11-bit packet count.

use std::fmt;
use std::str::FromStr;

use nom::bits::complete::take;
use nom::error::{ErrorKind, ParseError};
use nom::multi::count;
use nom::IResult;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Deepest accepted operator nesting.
pub const MAX_NESTING: usize = 256;

const LITERAL_TYPE: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Sum,
    Product,
    Minimum,
    Maximum,
    GreaterThan,
    LessThan,
    EqualTo,
}

impl Operator {
    fn from_type_id(id: u64) -> Option<Self> {
        match id {
            0 => Some(Self::Sum),
            1 => Some(Self::Product),
            2 => Some(Self::Minimum),
            3 => Some(Self::Maximum),
            5 => Some(Self::GreaterThan),
            6 => Some(Self::LessThan),
            7 => Some(Self::EqualTo),
            _ => None,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Self::GreaterThan | Self::LessThan | Self::EqualTo)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sum => "sum",
            Self::Product => "product",
            Self::Minimum => "min",
            Self::Maximum => "max",
            Self::GreaterThan => "gt",
            Self::LessThan => "lt",
            Self::EqualTo => "eq",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Literal(u64),
    Operator {
        op: Operator,
        subpackets: Vec<Packet>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub version: u8,
    pub payload: Payload,
}

impl Packet {
    /// Decode the outermost packet of a hexadecimal transmission. Bits after
    /// it are padding and ignored.
    #[instrument(level = "debug", skip(text))]
    pub fn parse(text: &str) -> DomainResult<Self> {
        let digits = text.trim();
        if digits.is_empty() {
            return Err(DomainError::EmptyInput);
        }
        let bytes = decode_hex(digits)?;
        let total = bytes.len() * 8;

        match packet((&bytes[..], 0), 0) {
            Ok((rest, packet)) => {
                debug!("decoded {} of {} bits", total - remaining(rest), total);
                Ok(packet)
            }
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                let offset = total - remaining(e.input);
                Err(DomainError::Parse {
                    line: 1,
                    column: offset / 4 + 1,
                    message: format!("{} at bit {}", e.problem, offset),
                })
            }
            Err(nom::Err::Incomplete(_)) => Err(DomainError::parse(1, "incomplete transmission")),
        }
    }

    /// Sum of this packet's version and every nested version.
    pub fn version_sum(&self) -> u64 {
        let nested: u64 = match &self.payload {
            Payload::Literal(_) => 0,
            Payload::Operator { subpackets, .. } => subpackets.iter().map(Packet::version_sum).sum(),
        };
        u64::from(self.version) + nested
    }

    /// Evaluate the expression this packet encodes.
    pub fn value(&self) -> DomainResult<u64> {
        let (op, subpackets) = match &self.payload {
            Payload::Literal(value) => return Ok(*value),
            Payload::Operator { op, subpackets } => (*op, subpackets),
        };
        let values = subpackets
            .iter()
            .map(Packet::value)
            .collect::<DomainResult<Vec<_>>>()?;
        if values.is_empty() {
            return Err(DomainError::MalformedPacket(format!("{} without subpackets", op)));
        }

        if op.is_comparison() {
            let &[a, b] = values.as_slice() else {
                return Err(DomainError::MalformedPacket(format!(
                    "{} needs 2 subpackets, found {}",
                    op,
                    values.len()
                )));
            };
            let holds = match op {
                Operator::GreaterThan => a > b,
                Operator::LessThan => a < b,
                _ => a == b,
            };
            return Ok(u64::from(holds));
        }

        let folded = match op {
            Operator::Sum => values.iter().try_fold(0u64, |acc, &v| acc.checked_add(v)),
            Operator::Product => values.iter().try_fold(1u64, |acc, &v| acc.checked_mul(v)),
            Operator::Minimum => values.iter().copied().min(),
            _ => values.iter().copied().max(),
        };
        folded.ok_or_else(|| DomainError::Overflow(format!("{} of packet values", op)))
    }

    /// Number of packets in the tree, this one included.
    pub fn packet_count(&self) -> usize {
        match &self.payload {
            Payload::Literal(_) => 1,
            Payload::Operator { subpackets, .. } => {
                1 + subpackets.iter().map(Packet::packet_count).sum::<usize>()
            }
        }
    }
}

impl FromStr for Packet {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Packet::parse(s)
    }
}

/// Odd digit counts get a zero nibble appended; it only adds padding bits.
fn decode_hex(digits: &str) -> DomainResult<Vec<u8>> {
    let padded = if digits.len() % 2 == 1 {
        format!("{}0", digits)
    } else {
        digits.to_string()
    };
    hex::decode(padded).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => DomainError::Parse {
            line: 1,
            column: index + 1,
            message: format!("invalid hex digit {:?}", c),
        },
        other => DomainError::parse(1, other.to_string()),
    })
}

type Bits<'a> = (&'a [u8], usize);
type BitResult<'a, T> = IResult<Bits<'a>, T, BitError<'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Problem {
    Truncated,
    LiteralTooLarge,
    TooDeep,
    Overrun,
    NoSubpackets,
    ComparisonArity(usize),
    UnknownType(u64),
    Nom(ErrorKind),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Truncated => write!(f, "transmission ends inside a packet"),
            Problem::LiteralTooLarge => write!(f, "literal does not fit in 64 bits"),
            Problem::TooDeep => write!(f, "packets nested deeper than {}", MAX_NESTING),
            Problem::Overrun => write!(f, "subpackets run past their declared length"),
            Problem::NoSubpackets => write!(f, "operator without subpackets"),
            Problem::ComparisonArity(n) => write!(f, "comparison needs 2 subpackets, found {}", n),
            Problem::UnknownType(id) => write!(f, "unknown packet type {}", id),
            Problem::Nom(kind) => write!(f, "{:?}", kind),
        }
    }
}

#[derive(Debug)]
struct BitError<'a> {
    input: Bits<'a>,
    problem: Problem,
}

impl<'a> ParseError<Bits<'a>> for BitError<'a> {
    fn from_error_kind(input: Bits<'a>, kind: ErrorKind) -> Self {
        let problem = match kind {
            ErrorKind::Eof => Problem::Truncated,
            other => Problem::Nom(other),
        };
        BitError { input, problem }
    }

    fn append(_: Bits<'a>, _: ErrorKind, other: Self) -> Self {
        other
    }
}

fn fail<T>(input: Bits<'_>, problem: Problem) -> BitResult<'_, T> {
    Err(nom::Err::Failure(BitError { input, problem }))
}

fn remaining(input: Bits<'_>) -> usize {
    input.0.len() * 8 - input.1
}

fn bits<'a>(n: usize) -> impl Fn(Bits<'a>) -> BitResult<'a, u64> {
    take(n)
}

fn packet(input: Bits<'_>, depth: usize) -> BitResult<'_, Packet> {
    if depth >= MAX_NESTING {
        return fail(input, Problem::TooDeep);
    }
    let start = input;
    let (input, version) = bits(3)(input)?;
    let (input, type_id) = bits(3)(input)?;
    // three bits always fit in u8
    let version = version as u8;

    if type_id == LITERAL_TYPE {
        let (input, value) = literal(input)?;
        return Ok((
            input,
            Packet {
                version,
                payload: Payload::Literal(value),
            },
        ));
    }

    let Some(op) = Operator::from_type_id(type_id) else {
        return fail(start, Problem::UnknownType(type_id));
    };
    let (input, length_type) = bits(1)(input)?;
    let (input, subpackets) = if length_type == 0 {
        let (input, length) = bits(15)(input)?;
        framed_by_length(input, length as usize, depth)?
    } else {
        let (input, n) = bits(11)(input)?;
        count(|i| packet(i, depth + 1), n as usize)(input)?
    };

    if subpackets.is_empty() {
        return fail(start, Problem::NoSubpackets);
    }
    if op.is_comparison() && subpackets.len() != 2 {
        return fail(start, Problem::ComparisonArity(subpackets.len()));
    }
    Ok((
        input,
        Packet {
            version,
            payload: Payload::Operator { op, subpackets },
        },
    ))
}

fn framed_by_length(input: Bits<'_>, length: usize, depth: usize) -> BitResult<'_, Vec<Packet>> {
    let available = remaining(input);
    let mut input = input;
    let mut subpackets = Vec::new();
    while available - remaining(input) < length {
        let (rest, sub) = packet(input, depth + 1)?;
        input = rest;
        subpackets.push(sub);
    }
    if available - remaining(input) > length {
        return fail(input, Problem::Overrun);
    }
    Ok((input, subpackets))
}

fn literal(mut input: Bits<'_>) -> BitResult<'_, u64> {
    let mut value = 0u64;
    loop {
        let (rest, more) = bits(1)(input)?;
        let (rest, group) = bits(4)(rest)?;
        if value >> 60 != 0 {
            return fail(input, Problem::LiteralTooLarge);
        }
        value = value << 4 | group;
        input = rest;
        if more == 0 {
            return Ok((input, value));
        }
    }
}
