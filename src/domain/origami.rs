//! Transparent paper folding: a set of dots folded along horizontal and
//! vertical lines, rendered as ASCII art once all folds are applied.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

static FOLD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^fold along ([xy])=(-?\d+)$").expect("fold pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fold {
    pub axis: Axis,
    pub line: i64,
}

impl Fold {
    /// Where `point` lands after folding; None if it lies on the fold line.
    pub fn reflect(&self, point: Point) -> Option<Point> {
        let coord = match self.axis {
            Axis::X => point.x,
            Axis::Y => point.y,
        };
        match coord.cmp(&self.line) {
            Ordering::Less => Some(point),
            Ordering::Equal => None,
            Ordering::Greater => {
                let mirrored = 2 * self.line - coord;
                Some(match self.axis {
                    Axis::X => Point { x: mirrored, ..point },
                    Axis::Y => Point { y: mirrored, ..point },
                })
            }
        }
    }
}

impl fmt::Display for Fold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.axis {
            Axis::X => 'x',
            Axis::Y => 'y',
        };
        write!(f, "fold along {}={}", axis, self.line)
    }
}

/// The dots currently visible on the paper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    points: BTreeSet<Point>,
}

impl Sheet {
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.points.contains(&point)
    }

    /// Fold the paper; overlapping dots merge.
    #[instrument(level = "debug", skip_all, fields(fold = %fold))]
    pub fn apply(&mut self, fold: Fold) {
        self.points = self.points.iter().filter_map(|&p| fold.reflect(p)).collect();
        debug!("{} dots visible", self.points.len());
    }

    /// One text row per y inside the bounding box; empty sheet renders as "".
    pub fn render(&self, ink: char, paper: char) -> String {
        let (Some((min_x, max_x)), Some((min_y, max_y))) = (
            self.points.iter().map(|p| p.x).minmax().into_option(),
            self.points.iter().map(|p| p.y).minmax().into_option(),
        ) else {
            return String::new();
        };

        (min_y..=max_y)
            .map(|y| {
                (min_x..=max_x)
                    .map(|x| if self.contains(Point { x, y }) { ink } else { paper })
                    .collect::<String>()
            })
            .join("\n")
    }
}

/// Parsed puzzle input: the dots and the fold instructions in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manual {
    pub sheet: Sheet,
    pub folds: Vec<Fold>,
}

impl Manual {
    /// `x,y` lines, a blank line, then `fold along x=N` / `fold along y=N` lines.
    #[instrument(level = "debug", skip(input))]
    pub fn parse(input: &str) -> DomainResult<Self> {
        let mut points = Vec::new();
        let mut folds = Vec::new();
        let mut in_folds = false;

        for (i, line) in input.lines().enumerate() {
            let line = line.trim();
            let line_no = i + 1;
            if line.is_empty() {
                if !points.is_empty() {
                    in_folds = true;
                }
                continue;
            }
            if in_folds || line.starts_with("fold") {
                in_folds = true;
                folds.push(parse_fold(line, line_no)?);
            } else {
                points.push(parse_point(line, line_no)?);
            }
        }

        if points.is_empty() && folds.is_empty() {
            return Err(DomainError::EmptyInput);
        }
        debug!("parsed {} dots and {} folds", points.len(), folds.len());
        Ok(Self {
            sheet: Sheet::new(points),
            folds,
        })
    }

    /// Dots visible after the first fold only.
    pub fn dots_after_first_fold(&self) -> usize {
        let mut sheet = self.sheet.clone();
        if let Some(&fold) = self.folds.first() {
            sheet.apply(fold);
        }
        sheet.len()
    }

    /// Sheet after every fold.
    pub fn folded(&self) -> Sheet {
        let mut sheet = self.sheet.clone();
        for &fold in &self.folds {
            sheet.apply(fold);
        }
        sheet
    }
}

fn parse_point(line: &str, line_no: usize) -> DomainResult<Point> {
    let (x, y) = line
        .split_once(',')
        .ok_or_else(|| DomainError::parse(line_no, format!("expected `x,y`, found {:?}", line)))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<i64>()
            .map_err(|e| DomainError::parse(line_no, format!("invalid coordinate {:?}: {}", s, e)))
    };
    Ok(Point {
        x: coord(x)?,
        y: coord(y)?,
    })
}

fn parse_fold(line: &str, line_no: usize) -> DomainResult<Fold> {
    let caps = FOLD_LINE.captures(line).ok_or_else(|| {
        DomainError::parse(line_no, format!("expected `fold along x=N`, found {:?}", line))
    })?;
    let axis = if &caps[1] == "x" { Axis::X } else { Axis::Y };
    let line_value = caps[2]
        .parse::<i64>()
        .map_err(|e| DomainError::parse(line_no, format!("invalid fold line: {}", e)))?;
    Ok(Fold {
        axis,
        line: line_value,
    })
}
