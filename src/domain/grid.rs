//! Digit grids: tiled shortest path and basin flood fill.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

const DELTAS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Height that bounds basins; never part of one.
pub const BASIN_WALL: u8 = 9;

/// Rectangular matrix of single decimal digits, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// One row per non-blank line, one digit per character.
    #[instrument(level = "debug", skip(input))]
    pub fn parse(input: &str) -> DomainResult<Self> {
        let mut cells = Vec::new();
        let mut rows = 0;
        let mut cols = 0;

        for line in input.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = rows + 1;
            let digits = line
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    c.to_digit(10).map(|d| d as u8).ok_or(DomainError::InvalidCell {
                        row,
                        column: i + 1,
                        found: c,
                    })
                })
                .collect::<DomainResult<Vec<u8>>>()?;

            if rows == 0 {
                cols = digits.len();
            } else if digits.len() != cols {
                return Err(DomainError::RaggedGrid {
                    row,
                    expected: cols,
                    found: digits.len(),
                });
            }
            cells.extend(digits);
            rows += 1;
        }

        if rows == 0 {
            return Err(DomainError::EmptyInput);
        }
        debug!("parsed {}x{} grid", rows, cols);
        Ok(Self { cells, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    /// View of the grid repeated `repeats` times in both directions.
    pub fn tiled(&self, repeats: usize) -> DomainResult<TiledGrid<'_>> {
        if repeats == 0 {
            return Err(DomainError::InvalidRepeats(repeats));
        }
        Ok(TiledGrid {
            grid: self,
            repeats,
        })
    }

    /// Cheapest path cost from top-left to bottom-right of the tiled view.
    ///
    /// The cost of a path is the sum of every cell entered; the start cell is
    /// never entered and does not count.
    #[instrument(level = "debug", skip(self))]
    pub fn lowest_total_risk(&self, repeats: usize) -> DomainResult<u64> {
        let tiled = self.tiled(repeats)?;
        let (rows, cols) = (tiled.rows(), tiled.cols());
        let target = rows * cols - 1;

        let mut dist = vec![u64::MAX; rows * cols];
        let mut heap = BinaryHeap::new();
        dist[0] = 0;
        heap.push(Reverse((0u64, 0usize)));

        while let Some(Reverse((cost, idx))) = heap.pop() {
            if idx == target {
                break;
            }
            // Stale entry: a cheaper route was already settled
            if cost > dist[idx] {
                continue;
            }
            let (row, col) = (idx / cols, idx % cols);
            for (r, c) in neighbours(row, col, rows, cols) {
                let next = cost + u64::from(tiled.value_at(r, c));
                let slot = &mut dist[r * cols + c];
                if next < *slot {
                    *slot = next;
                    heap.push(Reverse((next, r * cols + c)));
                }
            }
        }

        debug!("lowest total risk over {}x{}: {}", rows, cols, dist[target]);
        Ok(dist[target])
    }

    /// Cells strictly lower than every orthogonal neighbour.
    pub fn low_points(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .filter(|&(row, col)| {
                let height = self.cells[row * self.cols + col];
                neighbours(row, col, self.rows, self.cols)
                    .all(|(r, c)| height < self.cells[r * self.cols + c])
            })
            .collect()
    }

    /// Sum of `height + 1` over all low points.
    #[instrument(level = "debug", skip(self))]
    pub fn low_point_risk_sum(&self) -> u64 {
        self.low_points()
            .into_iter()
            .map(|(row, col)| u64::from(self.cells[row * self.cols + col]) + 1)
            .sum()
    }

    /// Sizes of all basins, in discovery order (row-major by first cell).
    pub fn basins(&self) -> Vec<usize> {
        let mut visited = vec![false; self.cells.len()];
        let mut sizes = Vec::new();

        for start in 0..self.cells.len() {
            if visited[start] || self.cells[start] == BASIN_WALL {
                continue;
            }
            visited[start] = true;
            let mut queue = VecDeque::from([start]);
            let mut size = 0;

            while let Some(idx) = queue.pop_front() {
                size += 1;
                for (r, c) in neighbours(idx / self.cols, idx % self.cols, self.rows, self.cols) {
                    let next = r * self.cols + c;
                    if !visited[next] && self.cells[next] != BASIN_WALL {
                        visited[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            sizes.push(size);
        }

        sizes
    }

    /// Product of the three largest basin sizes (fewer if fewer exist, 0 if none).
    #[instrument(level = "debug", skip(self))]
    pub fn largest_basins_product(&self) -> u64 {
        let mut sizes = self.basins();
        if sizes.is_empty() {
            return 0;
        }
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.iter().take(3).map(|&s| s as u64).product()
    }
}

/// The grid repeated `repeats x repeats` times; each tile step right or down
/// raises every value by one, wrapping 9 back to 1.
#[derive(Debug, Clone, Copy)]
pub struct TiledGrid<'a> {
    grid: &'a Grid,
    repeats: usize,
}

impl TiledGrid<'_> {
    pub fn rows(&self) -> usize {
        self.grid.rows * self.repeats
    }

    pub fn cols(&self) -> usize {
        self.grid.cols * self.repeats
    }

    pub fn value_at(&self, row: usize, col: usize) -> u8 {
        let base = self.grid.cells[(row % self.grid.rows) * self.grid.cols + col % self.grid.cols];
        let shift = row / self.grid.rows + col / self.grid.cols;
        // 0 cells wrap to 9 on the original tile
        ((base as usize + shift + 8) % 9 + 1) as u8
    }
}

fn neighbours(row: usize, col: usize, rows: usize, cols: usize) -> impl Iterator<Item = (usize, usize)> {
    DELTAS.iter().filter_map(move |&(dr, dc)| {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < rows && c < cols).then_some((r, c))
    })
}
