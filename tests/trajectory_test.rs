//! Trick-shot search: launch velocities that land inside the target area.

use advent::domain::{DomainError, Target};

const EXAMPLE: &str = include_str!("fixtures/trick-shot/example.txt");

#[test]
fn given_example_target_when_searching_then_published_answers() {
    let target = Target::parse(EXAMPLE).unwrap();
    assert_eq!(target.highest_peak().unwrap(), 45);
    assert_eq!(target.hit_count(), 112);
}

#[test]
fn given_example_target_when_searching_then_best_shot_is_six_nine() {
    let target = Target::parse(EXAMPLE).unwrap();
    let best = target
        .hits()
        .into_iter()
        .max_by_key(|hit| hit.peak)
        .unwrap();
    assert_eq!(best.vy, 9);
    assert_eq!(best.peak, 45);
}

#[test]
fn given_example_target_when_searching_then_every_hit_is_distinct() {
    let target = Target::parse(EXAMPLE).unwrap();
    let mut velocities: Vec<(i64, i64)> = target.hits().iter().map(|h| (h.vx, h.vy)).collect();
    velocities.sort_unstable();
    velocities.dedup();
    assert_eq!(velocities.len(), 112);
}

#[test]
fn given_single_cell_target_when_searching_then_direct_shot_hits() {
    let target = Target::parse("target area: x=1..1, y=-1..-1").unwrap();
    let hit = target.launch(1, -1).unwrap();
    assert_eq!(hit.peak, 0);
}

#[test]
fn given_empty_input_when_parsing_then_empty_input() {
    assert_eq!(Target::parse("\n\n").unwrap_err(), DomainError::EmptyInput);
}
