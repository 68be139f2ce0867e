//! The cell grid and the rules that advance it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LifeError, LifeResult};

/// A fixed-size grid of live and dead cells, stored row by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create a grid of dead cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Parse a plain-text pattern: `#` or `O` for live cells, `.` for dead ones.
    ///
    /// Blank lines are ignored; every other line must have the same length.
    pub fn parse(pattern: &str) -> LifeResult<Self> {
        let mut rows: Vec<Vec<bool>> = Vec::new();

        for (line_index, line) in pattern.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let row = line
                .chars()
                .enumerate()
                .map(|(column, c)| match c {
                    '#' | 'O' => Ok(true),
                    '.' => Ok(false),
                    other => Err(LifeError::InvalidPattern {
                        found: other,
                        line: line_index + 1,
                        column: column + 1,
                    }),
                })
                .collect::<LifeResult<Vec<bool>>>()?;

            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(LifeError::RaggedPattern {
                        line: line_index + 1,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }

        let width = rows.first().map(Vec::len).ok_or(LifeError::EmptyPattern)?;
        let height = rows.len();
        let cells = rows.into_iter().flatten().collect();

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: usize, y: usize) -> LifeResult<usize> {
        if x < self.width && y < self.height {
            Ok(y * self.width + x)
        } else {
            Err(self.out_of_bounds(x as i64, y as i64))
        }
    }

    pub(crate) fn out_of_bounds(&self, x: i64, y: i64) -> LifeError {
        LifeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> LifeResult<bool> {
        Ok(self.cells[self.index(x, y)?])
    }

    pub fn set(&mut self, x: usize, y: usize, alive: bool) -> LifeResult<()> {
        let i = self.index(x, y)?;
        self.cells[i] = alive;
        Ok(())
    }

    /// Flip a cell. Returns its new state.
    pub fn toggle(&mut self, x: usize, y: usize) -> LifeResult<bool> {
        let i = self.index(x, y)?;
        self.cells[i] = !self.cells[i];
        Ok(self.cells[i])
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = false);
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Count live cells among the eight neighbours. Cells past the edge count as dead.
    pub fn alive_neighbors(&self, x: usize, y: usize) -> usize {
        let mut count = 0;
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx >= 0
                    && ny >= 0
                    && (nx as usize) < self.width
                    && (ny as usize) < self.height
                    && self.cells[ny as usize * self.width + nx as usize]
                {
                    count += 1;
                }
            }
        }
        count
    }

    /// Compute the following generation.
    ///
    /// A live cell with two or three neighbours survives; a dead cell with
    /// exactly three comes alive; everything else is dead.
    pub fn next_generation(&self) -> Grid {
        let mut next = Grid::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let alive = self.cells[y * self.width + x];
                let neighbors = self.alive_neighbors(x, y);
                next.cells[y * self.width + x] = matches!((alive, neighbors), (true, 2) | (_, 3));
            }
        }
        next
    }

    /// Coordinates of live cells, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for alive in row {
                write!(f, "{}", if *alive { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
