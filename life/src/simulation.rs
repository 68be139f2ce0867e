//! Simulation run state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LifeResult;
use crate::grid::Grid;

pub const DEFAULT_WIDTH: usize = 60;
pub const DEFAULT_HEIGHT: usize = 40;
pub const DEFAULT_CELL_SIZE: u32 = 10;

/// Grid dimensions and on-screen cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub width: usize,
    pub height: usize,
    /// Pixels per cell side.
    pub cell_size: u32,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// A grid plus whether it is currently running.
///
/// The caller drives time: call [`Simulation::tick`] once per frame and it
/// advances only while running.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: LifeConfig,
    grid: Grid,
    running: bool,
    generation: u64,
}

impl Simulation {
    pub fn new(config: LifeConfig) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            config,
            running: false,
            generation: 0,
        }
    }

    /// Start from an existing grid. The config's dimensions follow the grid.
    pub fn with_grid(grid: Grid, cell_size: u32) -> Self {
        let config = LifeConfig {
            width: grid.width(),
            height: grid.height(),
            cell_size,
        };
        Self {
            config,
            grid,
            running: false,
            generation: 0,
        }
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            info!(generation = self.generation, "Simulation started");
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            info!(generation = self.generation, "Simulation stopped");
        }
    }

    /// Advance one generation regardless of run state.
    pub fn step(&mut self) {
        self.grid = self.grid.next_generation();
        self.generation += 1;
        debug!(
            generation = self.generation,
            population = self.grid.population(),
            "Stepped"
        );
    }

    /// Advance if running. Returns whether a step happened.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.step();
        }
        self.running
    }

    /// Stop and kill every cell.
    pub fn clear(&mut self) {
        self.stop();
        self.grid.clear();
        self.generation = 0;
        debug!("Grid cleared");
    }

    pub fn toggle(&mut self, x: usize, y: usize) -> LifeResult<bool> {
        self.grid.toggle(x, y)
    }

    /// Toggle the cell under a pixel position on the canvas.
    pub fn toggle_at_pixel(&mut self, px: f64, py: f64) -> LifeResult<bool> {
        let (x, y) = self.cell_at_pixel(px, py)?;
        self.grid.toggle(x, y)
    }

    /// Map a canvas pixel position to cell coordinates.
    pub fn cell_at_pixel(&self, px: f64, py: f64) -> LifeResult<(usize, usize)> {
        let size = f64::from(self.config.cell_size.max(1));
        let x = (px / size).floor() as i64;
        let y = (py / size).floor() as i64;

        if x < 0 || y < 0 || x as usize >= self.grid.width() || y as usize >= self.grid.height() {
            return Err(self.grid.out_of_bounds(x, y));
        }
        Ok((x as usize, y as usize))
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        let size = self.config.cell_size;
        (
            self.grid.width() as u32 * size,
            self.grid.height() as u32 * size,
        )
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(LifeConfig::default())
    }
}
