//! Trench-map image enhancement on an infinite canvas.
//!
//! Only a finite window is stored. Everything outside it shares one
//! background colour, which the algorithm may flip on every step when entry
//! 0 is lit.

use std::fmt;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Entries in an enhancement algorithm, one per 3x3 neighbourhood.
pub const ALGORITHM_LEN: usize = 512;

const LIT: char = '#';
const DARK: char = '.';

fn pixel(c: char) -> Option<bool> {
    match c {
        LIT => Some(true),
        DARK => Some(false),
        _ => None,
    }
}

/// Lookup table from a 9-bit neighbourhood index to the output pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Algorithm(Box<[bool; ALGORITHM_LEN]>);

impl Algorithm {
    /// Parse the algorithm block; it may be wrapped over several lines.
    /// `first_line` is the 1-based input line of `lines[0]`.
    fn parse_lines(lines: &[&str], first_line: usize) -> DomainResult<Self> {
        let mut entries = Vec::with_capacity(ALGORITHM_LEN);
        for (offset, line) in lines.iter().enumerate() {
            for (i, c) in line.trim().chars().enumerate() {
                let lit = pixel(c).ok_or_else(|| DomainError::Parse {
                    line: first_line + offset,
                    column: i + 1,
                    message: format!("expected '{}' or '{}', found {:?}", LIT, DARK, c),
                })?;
                entries.push(lit);
            }
        }
        let found = entries.len();
        let table: Box<[bool; ALGORITHM_LEN]> = entries.into_boxed_slice().try_into().map_err(|_| {
            DomainError::parse(
                first_line,
                format!("algorithm has {} entries, expected {}", found, ALGORITHM_LEN),
            )
        })?;
        Ok(Self(table))
    }

    pub fn lights(&self, index: usize) -> bool {
        self.0[index & (ALGORITHM_LEN - 1)]
    }

    /// Background colour after one step over a uniform `background`.
    pub fn next_background(&self, background: bool) -> bool {
        self.lights(if background { ALGORITHM_LEN - 1 } else { 0 })
    }
}

/// Finite window of pixels plus the colour of everything outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pixels: Vec<bool>,
    rows: usize,
    cols: usize,
    background: bool,
}

impl Image {
    /// One row per line of `#` and `.`; the background starts dark.
    /// `first_line` numbers the rows in errors.
    fn parse_lines(lines: &[&str], first_line: usize) -> DomainResult<Self> {
        let mut pixels = Vec::new();
        let mut cols = 0;
        for (offset, line) in lines.iter().enumerate() {
            let row = first_line + offset;
            let cells = line
                .trim()
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    pixel(c).ok_or(DomainError::InvalidCell {
                        row,
                        column: i + 1,
                        found: c,
                    })
                })
                .collect::<DomainResult<Vec<bool>>>()?;
            if offset == 0 {
                cols = cells.len();
            } else if cells.len() != cols {
                return Err(DomainError::RaggedGrid {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
            pixels.extend(cells);
        }
        if pixels.is_empty() {
            return Err(DomainError::EmptyInput);
        }
        Ok(Self {
            pixels,
            rows: lines.len(),
            cols,
            background: false,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn background(&self) -> bool {
        self.background
    }

    /// Pixel at a signed position; outside the window is background.
    pub fn get(&self, row: isize, col: isize) -> bool {
        match (usize::try_from(row), usize::try_from(col)) {
            (Ok(r), Ok(c)) if r < self.rows && c < self.cols => self.pixels[r * self.cols + c],
            _ => self.background,
        }
    }

    /// 9-bit index of the neighbourhood centred on `(row, col)`, read
    /// left to right, top to bottom.
    fn neighbourhood(&self, row: isize, col: isize) -> usize {
        (-1..=1)
            .flat_map(|dr| (-1..=1).map(move |dc| (dr, dc)))
            .fold(0, |index, (dr, dc)| {
                index << 1 | usize::from(self.get(row + dr, col + dc))
            })
    }

    /// One enhancement step. The window grows by one pixel on every side,
    /// which covers every pixel that can differ from the new background.
    pub fn enhance(&self, algorithm: &Algorithm) -> Image {
        let (rows, cols) = (self.rows + 2, self.cols + 2);
        let pixels = (0..rows)
            .into_par_iter()
            .flat_map_iter(|r| {
                (0..cols).map(move |c| {
                    // new (r, c) sits at old (r - 1, c - 1)
                    algorithm.lights(self.neighbourhood(r as isize - 1, c as isize - 1))
                })
            })
            .collect();
        Image {
            pixels,
            rows,
            cols,
            background: algorithm.next_background(self.background),
        }
    }

    /// Lit pixels, or None when the infinite background is lit.
    pub fn lit_count(&self) -> Option<usize> {
        (!self.background).then(|| self.pixels.iter().filter(|&&p| p).count())
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.pixels.chunks(self.cols.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &lit in row {
                write!(f, "{}", if lit { LIT } else { DARK })?;
            }
        }
        Ok(())
    }
}

/// Puzzle input: the enhancement algorithm and the starting image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrenchMap {
    pub algorithm: Algorithm,
    pub image: Image,
}

impl TrenchMap {
    /// Algorithm block, a blank line, then the image rows.
    #[instrument(level = "debug", skip(input))]
    pub fn parse(input: &str) -> DomainResult<Self> {
        let lines: Vec<&str> = input.lines().collect();
        let is_blank = |l: &&str| l.trim().is_empty();

        let start = lines.iter().position(|l| !is_blank(l)).ok_or(DomainError::EmptyInput)?;
        let split = lines[start..]
            .iter()
            .position(is_blank)
            .map_or(lines.len(), |n| start + n);
        let algorithm = Algorithm::parse_lines(&lines[start..split], start + 1)?;

        let image_start = lines[split..]
            .iter()
            .position(|l| !is_blank(l))
            .map(|n| split + n)
            .ok_or_else(|| DomainError::parse(split + 1, "missing image after algorithm"))?;
        let image_lines: Vec<&str> = lines[image_start..]
            .iter()
            .copied()
            .take_while(|l| !is_blank(l))
            .collect();
        if let Some(extra) = lines[image_start + image_lines.len()..]
            .iter()
            .position(|l| !is_blank(l))
        {
            let line = image_start + image_lines.len() + extra + 1;
            return Err(DomainError::parse(line, "unexpected text after image"));
        }
        let image = Image::parse_lines(&image_lines, image_start + 1)?;

        debug!("parsed {}x{} image", image.rows, image.cols);
        Ok(Self { algorithm, image })
    }

    /// Image after `steps` enhancements.
    pub fn enhanced(&self, steps: usize) -> Image {
        (0..steps).fold(self.image.clone(), |image, _| image.enhance(&self.algorithm))
    }

    /// Lit pixels after `steps` enhancements; infinite counts are an error.
    #[instrument(level = "debug", skip(self))]
    pub fn lit_after(&self, steps: usize) -> DomainResult<usize> {
        self.enhanced(steps)
            .lit_count()
            .ok_or(DomainError::InfiniteImage { steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Algorithm with only the given entries lit.
    fn algorithm_text(lit: &[usize]) -> String {
        (0..ALGORITHM_LEN)
            .map(|i| if lit.contains(&i) { LIT } else { DARK })
            .collect()
    }

    #[test]
    fn given_identity_algorithm_when_enhancing_then_image_is_unchanged() {
        // centre bit is 1 << 4
        let lit: Vec<usize> = (0..ALGORITHM_LEN).filter(|i| i & 16 != 0).collect();
        let map = TrenchMap::parse(&format!("{}\n\n#.\n.#\n", algorithm_text(&lit))).unwrap();

        let image = map.enhanced(3);

        assert_eq!(image.rows(), 8);
        assert_eq!(image.lit_count(), Some(2));
    }

    #[test]
    fn given_flipping_background_when_enhancing_odd_steps_then_infinite() {
        let map = TrenchMap::parse(&format!("{}\n\n.\n", algorithm_text(&[0]))).unwrap();

        assert_eq!(map.lit_after(1), Err(DomainError::InfiniteImage { steps: 1 }));
        assert_eq!(map.lit_after(2), Ok(0));
    }

    #[test]
    fn given_single_pixel_when_enhancing_then_reads_nine_bit_index() {
        // a lone lit pixel seen from its lower-right neighbour is index 256
        let map = TrenchMap::parse(&format!("{}\n\n#\n", algorithm_text(&[256]))).unwrap();

        let image = map.enhanced(1);

        assert_eq!(image.to_string(), "...\n...\n..#");
    }

    #[test]
    fn given_wrapped_algorithm_when_parsing_then_joins_lines() {
        let text = algorithm_text(&[]);
        let (head, tail) = text.split_at(100);
        let map = TrenchMap::parse(&format!("{}\n{}\n\n#\n", head, tail)).unwrap();
        assert_eq!(map.image.rows(), 1);
    }

    #[rstest]
    #[case(format!("{}\n\n#\n", ".".repeat(511)), 1)]
    #[case(format!("{}\n\n#\n", ".".repeat(513)), 1)]
    #[case(format!("{}x\n\n#\n", ".".repeat(511)), 1)]
    #[case(format!("{}\n\n", ".".repeat(512)), 2)]
    #[case(format!("{}\n\n#\n\n#\n", ".".repeat(512)), 5)]
    fn given_malformed_input_when_parsing_then_parse_error_on_line(
        #[case] text: String,
        #[case] line: usize,
    ) {
        let err = TrenchMap::parse(&text).unwrap_err();
        assert!(matches!(err, DomainError::Parse { line: l, .. } if l == line), "{err:?}");
    }

    #[test]
    fn given_ragged_image_when_parsing_then_rejected() {
        let err = TrenchMap::parse(&format!("{}\n\n##\n#\n", ".".repeat(512))).unwrap_err();
        assert_eq!(
            err,
            DomainError::RaggedGrid {
                row: 4,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn given_bad_pixel_when_parsing_then_reports_cell() {
        let err = TrenchMap::parse(&format!("{}\n\n#o\n", ".".repeat(512))).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidCell {
                row: 3,
                column: 2,
                found: 'o'
            }
        );
    }
}
