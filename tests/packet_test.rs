//! BITS transmissions: version sums and expression values.

use rstest::rstest;

use advent::domain::{DomainError, Operator, Packet, Payload};

const EXAMPLE: &str = include_str!("fixtures/packet-decoder/example.txt");

#[test]
fn given_example_transmission_when_decoding_then_version_sum_and_value() {
    let packet: Packet = EXAMPLE.parse().unwrap();
    assert_eq!(packet.version_sum(), 31);
    assert_eq!(packet.value().unwrap(), 54);
}

#[test]
fn given_nested_operators_when_decoding_then_tree_shape_survives() {
    // 8A004A801A8002F478: operator v4 > operator v1 > operator v5 > literal v6
    let packet = Packet::parse("8A004A801A8002F478").unwrap();

    let mut versions = Vec::new();
    let mut current = &packet;
    loop {
        versions.push(current.version);
        match &current.payload {
            Payload::Operator { subpackets, .. } => {
                assert_eq!(subpackets.len(), 1);
                current = &subpackets[0];
            }
            Payload::Literal(_) => break,
        }
    }
    assert_eq!(versions, vec![4, 1, 5, 6]);
}

#[rstest]
#[case("C200B40A82", Operator::Sum)]
#[case("04005AC33890", Operator::Product)]
#[case("880086C3E88112", Operator::Minimum)]
#[case("CE00C43D881120", Operator::Maximum)]
#[case("D8005AC2A8F0", Operator::LessThan)]
#[case("F600BC2D8F", Operator::GreaterThan)]
#[case("9C005AC2F8F0", Operator::EqualTo)]
fn given_single_operator_transmission_when_decoding_then_operator_matches(
    #[case] text: &str,
    #[case] expected: Operator,
) {
    let packet = Packet::parse(text).unwrap();
    assert!(matches!(packet.payload, Payload::Operator { op, .. } if op == expected));
}

#[test]
fn given_odd_digit_count_when_decoding_then_pads_last_nibble() {
    // D2FE28 without the trailing padding nibble
    assert_eq!(Packet::parse("D2FE2").unwrap().value().unwrap(), 2021);
}

#[rstest]
#[case("")]
#[case("   \n")]
fn given_blank_transmission_when_decoding_then_empty_input(#[case] text: &str) {
    assert_eq!(Packet::parse(text).unwrap_err(), DomainError::EmptyInput);
}

#[test]
fn given_truncated_operator_when_decoding_then_parse_error() {
    // the count-framed max operator from EE00D40C823060, cut after its first operand
    assert!(matches!(
        Packet::parse("EE00D40C").unwrap_err(),
        DomainError::Parse { line: 1, .. }
    ));
}
