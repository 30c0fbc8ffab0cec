//! Puzzle service
//!
//! Locates a puzzle input, reads it through the filesystem boundary and runs
//! both parts of the matching solver.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::snailfish::{self, SnailNumber};
use crate::domain::{DomainResult, Grid, Manual, Packet, Polymer, Target, TrenchMap};
use crate::infrastructure::traits::FileSystem;

/// The puzzles this crate can solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Puzzle {
    /// Day 9: low points and basins of a height map
    SmokeBasin,
    /// Day 13: folding transparent paper
    Origami,
    /// Day 14: pair-insertion polymer growth
    Polymer,
    /// Day 15: lowest-risk path through a tiled cave
    Chiton,
    /// Day 16: decoding a hexadecimal packet transmission
    PacketDecoder,
    /// Day 17: launch velocities that reach a target area
    TrickShot,
    /// Day 18: snailfish number arithmetic
    Snailfish,
    /// Day 20: image enhancement on an infinite canvas
    TrenchMap,
}

impl Puzzle {
    pub const ALL: [Puzzle; 8] = [
        Puzzle::SmokeBasin,
        Puzzle::Origami,
        Puzzle::Polymer,
        Puzzle::Chiton,
        Puzzle::PacketDecoder,
        Puzzle::TrickShot,
        Puzzle::Snailfish,
        Puzzle::TrenchMap,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Puzzle::SmokeBasin => "smoke-basin",
            Puzzle::Origami => "origami",
            Puzzle::Polymer => "polymer",
            Puzzle::Chiton => "chiton",
            Puzzle::PacketDecoder => "packet-decoder",
            Puzzle::TrickShot => "trick-shot",
            Puzzle::Snailfish => "snailfish",
            Puzzle::TrenchMap => "trench-map",
        }
    }

    pub fn day(&self) -> u8 {
        match self {
            Puzzle::SmokeBasin => 9,
            Puzzle::Origami => 13,
            Puzzle::Polymer => 14,
            Puzzle::Chiton => 15,
            Puzzle::PacketDecoder => 16,
            Puzzle::TrickShot => 17,
            Puzzle::Snailfish => 18,
            Puzzle::TrenchMap => 20,
        }
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Puzzle {
    type Err = String;

    /// Accepts the slug, the day number (`18`) or `day18` / `day_18`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let day = s
            .trim_start_matches("day")
            .trim_start_matches('_')
            .parse::<u8>()
            .ok();
        Puzzle::ALL
            .into_iter()
            .find(|p| p.slug() == s || Some(p.day()) == day)
            .ok_or_else(|| format!("unknown puzzle: {}", s))
    }
}

/// One puzzle answer: a number, or rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Number(u64),
    Text(String),
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(n) => write!(f, "{}", n),
            Answer::Text(text) => f.write_str(text),
        }
    }
}

impl From<u64> for Answer {
    fn from(n: u64) -> Self {
        Answer::Number(n)
    }
}

impl From<usize> for Answer {
    fn from(n: usize) -> Self {
        Answer::Number(n as u64)
    }
}

/// Both answers of one puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub part1: Answer,
    pub part2: Answer,
}

/// Service that solves puzzles from input files.
pub struct PuzzleService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl PuzzleService {
    /// Create a new puzzle service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Pick the input file for `puzzle`.
    ///
    /// An explicit path wins. Otherwise `<input_dir>/<slug>/<input_file>` is
    /// used when it exists, falling back to `<input_dir>/<input_file>`.
    pub fn resolve_input(&self, puzzle: Puzzle, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let per_puzzle = self
            .settings
            .input_dir
            .join(puzzle.slug())
            .join(&self.settings.input_file);
        if self.fs.is_file(&per_puzzle) {
            return per_puzzle;
        }
        self.settings.input_dir.join(&self.settings.input_file)
    }

    /// Read the input file and solve both parts.
    #[instrument(level = "debug", skip(self))]
    pub fn solve(&self, puzzle: Puzzle, input: &Path) -> ApplicationResult<Answers> {
        if !self.fs.exists(input) {
            return Err(ApplicationError::InputNotFound(input.to_path_buf()));
        }
        let text = self
            .fs
            .read_to_string(input)
            .with_path_context("read puzzle input", input)?;
        info!("solving {} from {}", puzzle, input.display());
        self.solve_text(puzzle, &text)
    }

    /// Solve both parts from already loaded input text.
    #[instrument(level = "debug", skip(self, text))]
    pub fn solve_text(&self, puzzle: Puzzle, text: &str) -> ApplicationResult<Answers> {
        let answers = match puzzle {
            Puzzle::SmokeBasin => self.smoke_basin(text),
            Puzzle::Origami => self.origami(text),
            Puzzle::Polymer => self.polymer(text),
            Puzzle::Chiton => self.chiton(text),
            Puzzle::PacketDecoder => self.packet_decoder(text),
            Puzzle::TrickShot => self.trick_shot(text),
            Puzzle::Snailfish => self.snailfish(text),
            Puzzle::TrenchMap => self.trench_map(text),
        }?;
        debug!("{}: {:?}", puzzle, answers);
        Ok(answers)
    }

    fn smoke_basin(&self, text: &str) -> DomainResult<Answers> {
        let grid = Grid::parse(text)?;
        Ok(Answers {
            part1: grid.low_point_risk_sum().into(),
            part2: grid.largest_basins_product().into(),
        })
    }

    fn origami(&self, text: &str) -> DomainResult<Answers> {
        let manual = Manual::parse(text)?;
        let glyphs = &self.settings.origami;
        Ok(Answers {
            part1: manual.dots_after_first_fold().into(),
            part2: Answer::Text(manual.folded().render(glyphs.ink, glyphs.paper)),
        })
    }

    fn polymer(&self, text: &str) -> DomainResult<Answers> {
        let polymer = Polymer::parse(text)?;
        let steps = &self.settings.polymer;
        Ok(Answers {
            part1: polymer.element_spread(steps.short_steps)?.into(),
            part2: polymer.element_spread(steps.long_steps)?.into(),
        })
    }

    fn chiton(&self, text: &str) -> DomainResult<Answers> {
        let grid = Grid::parse(text)?;
        Ok(Answers {
            part1: grid.lowest_total_risk(1)?.into(),
            part2: grid.lowest_total_risk(self.settings.chiton.repeats)?.into(),
        })
    }

    fn packet_decoder(&self, text: &str) -> DomainResult<Answers> {
        let packet = Packet::parse(text)?;
        Ok(Answers {
            part1: packet.version_sum().into(),
            part2: packet.value()?.into(),
        })
    }

    fn trick_shot(&self, text: &str) -> DomainResult<Answers> {
        let target = Target::parse(text)?;
        Ok(Answers {
            part1: target.highest_peak()?.into(),
            part2: target.hit_count().into(),
        })
    }

    fn trench_map(&self, text: &str) -> DomainResult<Answers> {
        let map = TrenchMap::parse(text)?;
        let steps = &self.settings.image;
        Ok(Answers {
            part1: map.lit_after(steps.short_steps)?.into(),
            part2: map.lit_after(steps.long_steps)?.into(),
        })
    }

    fn snailfish(&self, text: &str) -> DomainResult<Answers> {
        let numbers = snailfish::parse_numbers(text)?;
        let total = SnailNumber::sum(&numbers)?;
        // a single number has no distinct pair; report 0 like an empty max
        let best = snailfish::largest_pair_magnitude(&numbers)?.unwrap_or(0);
        Ok(Answers {
            part1: total.magnitude()?.into(),
            part2: best.into(),
        })
    }
}
