//! Launch trajectories under drag and gravity, searched exhaustively for the
//! initial velocities that land a shot inside a rectangular target.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

static TARGET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^target area: x=(-?\d+)\.\.(-?\d+), y=(-?\d+)\.\.(-?\d+)$")
        .expect("target pattern compiles")
});

/// Largest accepted absolute bound. The search tries every velocity up to
/// the bounds, so its cost grows with their product.
pub const MAX_COORDINATE: i64 = 10_000;

/// Inclusive target rectangle; the launch point is the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
}

/// A launch velocity that ends inside the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub vx: i64,
    pub vy: i64,
    /// Highest y reached, the launch point included.
    pub peak: u64,
}

impl Target {
    #[instrument(level = "debug", skip(text))]
    pub fn parse(text: &str) -> DomainResult<Self> {
        let (line_no, line) = text
            .lines()
            .enumerate()
            .find(|(_, line)| !line.trim().is_empty())
            .ok_or(DomainError::EmptyInput)?;
        let caps = TARGET_LINE
            .captures(line.trim())
            .ok_or_else(|| DomainError::parse(line_no + 1, format!("expected target area, got {:?}", line)))?;

        let bound = |i: usize| {
            caps[i]
                .parse::<i64>()
                .map_err(|e| DomainError::parse(line_no + 1, format!("bad bound {:?}: {}", &caps[i], e)))
        };
        let target = Target {
            x_min: bound(1)?,
            x_max: bound(2)?,
            y_min: bound(3)?,
            y_max: bound(4)?,
        };
        target.validate()?;
        debug!("target: {:?}", target);
        Ok(target)
    }

    fn validate(&self) -> DomainResult<()> {
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(DomainError::InvalidTarget(format!(
                "empty range in x={}..{}, y={}..{}",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        let allowed = -MAX_COORDINATE..=MAX_COORDINATE;
        if bounds.iter().any(|b| !allowed.contains(b)) {
            return Err(DomainError::InvalidTarget(format!(
                "bounds beyond {} are not searched",
                MAX_COORDINATE
            )));
        }
        // every velocity would count as a hit at step zero
        if self.contains(0, 0) {
            return Err(DomainError::InvalidTarget(
                "area contains the launch point".to_string(),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y)
    }

    /// Horizontal launch speeds worth trying: anything faster overshoots on
    /// the first step.
    fn vx_candidates(&self) -> RangeInclusive<i64> {
        self.x_min.min(0)..=self.x_max.max(0)
    }

    /// Vertical launch speeds worth trying. A shot fired up at `vy` comes back
    /// through y=0 at speed `vy + 1`, so anything above the farther y bound
    /// steps over the target.
    fn vy_candidates(&self) -> RangeInclusive<i64> {
        self.y_min.min(0)..=self.y_min.abs().max(self.y_max.abs())
    }

    /// Fly one shot until it lands in the target or can no longer reach it.
    pub fn launch(&self, vx: i64, vy: i64) -> Option<Hit> {
        let (mut x, mut y) = (0i64, 0i64);
        let (mut dx, mut dy) = (vx, vy);
        loop {
            x += dx;
            y += dy;
            dx -= dx.signum();
            dy -= 1;

            if self.contains(x, y) {
                let rise = vy.max(0).unsigned_abs();
                let peak = rise * (rise + 1) / 2;
                return Some(Hit { vx, vy, peak });
            }
            let falling_below = y < self.y_min && dy < 0;
            let past_right = x > self.x_max && dx >= 0;
            let past_left = x < self.x_min && dx <= 0;
            if falling_below || past_right || past_left {
                return None;
            }
        }
    }

    /// Every launch velocity that hits, searched in parallel over `vx`.
    #[instrument(level = "debug", skip(self))]
    pub fn hits(&self) -> Vec<Hit> {
        let vys = self.vy_candidates();
        let hits: Vec<Hit> = self
            .vx_candidates()
            .into_par_iter()
            .flat_map_iter(|vx| vys.clone().filter_map(move |vy| self.launch(vx, vy)))
            .collect();
        debug!("{} hits", hits.len());
        hits
    }

    /// Highest peak among all hits.
    pub fn highest_peak(&self) -> DomainResult<u64> {
        self.hits()
            .iter()
            .map(|hit| hit.peak)
            .max()
            .ok_or_else(|| DomainError::InvalidTarget("no launch velocity reaches it".to_string()))
    }

    /// Number of distinct launch velocities that hit.
    pub fn hit_count(&self) -> usize {
        self.hits().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn example() -> Target {
        Target::parse("target area: x=20..30, y=-10..-5\n").unwrap()
    }

    #[test]
    fn given_target_line_when_parsing_then_reads_bounds() {
        assert_eq!(
            example(),
            Target {
                x_min: 20,
                x_max: 30,
                y_min: -10,
                y_max: -5
            }
        );
    }

    #[rstest]
    #[case(7, 2, true)]
    #[case(6, 3, true)]
    #[case(9, 0, true)]
    #[case(17, -4, false)]
    #[case(6, 9, true)]
    fn given_velocity_when_launching_then_hits_or_misses(
        #[case] vx: i64,
        #[case] vy: i64,
        #[case] hits: bool,
    ) {
        assert_eq!(example().launch(vx, vy).is_some(), hits);
    }

    #[test]
    fn given_example_target_when_searching_then_peak_and_count_match() {
        let target = example();
        assert_eq!(target.highest_peak().unwrap(), 45);
        assert_eq!(target.hit_count(), 112);
    }

    #[test]
    fn given_target_left_of_launch_when_searching_then_mirrors_right_side() {
        let mirrored = Target::parse("target area: x=-30..-20, y=-10..-5").unwrap();
        assert_eq!(mirrored.highest_peak().unwrap(), 45);
        assert_eq!(mirrored.hit_count(), 112);
    }

    #[test]
    fn given_target_above_launch_when_searching_then_finds_rising_hits() {
        let target = Target::parse("target area: x=2..3, y=1..2").unwrap();
        let hits = target.hits();
        assert!(!hits.is_empty());
        assert!(hits.iter().all(|h| h.vy >= 1 && h.vy <= 2));
    }

    #[rstest]
    #[case("target area: x=-5..5, y=-5..5")]
    #[case("target area: x=30..20, y=-10..-5")]
    #[case("target area: x=20..30, y=-10001..-5")]
    #[case("target area: x=20..30, y=-9223372036854775808..-5")]
    fn given_degenerate_target_when_parsing_then_rejected(#[case] text: &str) {
        assert!(matches!(Target::parse(text), Err(DomainError::InvalidTarget(_))));
    }

    #[test]
    fn given_other_text_when_parsing_then_parse_error() {
        assert!(matches!(
            Target::parse("\ntarget: 20..30").unwrap_err(),
            DomainError::Parse { line: 2, .. }
        ));
    }
}
