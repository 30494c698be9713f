//! Procedural height field driving the cube grid.
//!
//! Each cell's height is a sine of elapsed time offset by the cell's radial
//! distance from the grid center. Everything here is a pure function of
//! `(cell, time, parameters)`; the caller samples time once per frame.

use std::ops::Range;

use crate::{
    error::SetupError,
    linalg::{Mat4, Vec3},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: i32,
    pub col: i32,
}

impl GridCell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Largest accepted row or column count. A 1024×1024 grid needs a 64 MiB
/// instance buffer, a quarter of wgpu's default `max_buffer_size`.
pub const MAX_GRID_DIMENSION: u32 = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub rows: u32,
    pub columns: u32,
}

impl Default for GridSize {
    fn default() -> Self {
        Self { rows: 15, columns: 15 }
    }
}

impl GridSize {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// `-(n / 2) .. n - n / 2`: exactly `n` indices centered on zero.
    /// Counts past `i32::MAX` are clamped so the range never overflows.
    fn centered(n: u32) -> Range<i32> {
        let n = n.min(i32::MAX as u32) as i32;
        let half = n / 2;
        -half..(n - half)
    }

    /// Whether both dimensions are within `1..=MAX_GRID_DIMENSION`.
    pub fn is_within_limits(&self) -> bool {
        (1..=MAX_GRID_DIMENSION).contains(&self.rows) && (1..=MAX_GRID_DIMENSION).contains(&self.columns)
    }

    pub fn row_range(&self) -> Range<i32> {
        Self::centered(self.rows)
    }

    pub fn column_range(&self) -> Range<i32> {
        Self::centered(self.columns)
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        let columns = self.column_range();
        self.row_range()
            .flat_map(move |row| columns.clone().map(move |col| GridCell::new(row, col)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveParameters {
    pub min_height: f32,
    pub height_multiplier: f32,
    pub angular_frequency: f32,
    pub radial_scale: f32,
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self {
            min_height: 5.0,
            height_multiplier: 3.0,
            angular_frequency: 2.0,
            radial_scale: 0.9,
        }
    }
}

impl WaveParameters {
    pub fn validate(&self) -> Result<(), SetupError> {
        let values = [
            ("min height", self.min_height),
            ("height multiplier", self.height_multiplier),
            ("angular frequency", self.angular_frequency),
            ("radial scale", self.radial_scale),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(SetupError::Scene(format!("{} must be finite, got {}", name, value)));
            }
        }
        if self.height_multiplier < 0.0 {
            return Err(SetupError::Scene(format!(
                "height multiplier must not be negative, got {}",
                self.height_multiplier
            )));
        }
        Ok(())
    }

    /// Lowest and highest height any cell can reach.
    pub fn height_bounds(&self) -> (f32, f32) {
        (
            self.min_height - self.height_multiplier,
            self.min_height + self.height_multiplier,
        )
    }

    /// Heights stay non-negative for every time and cell.
    pub fn never_inverts(&self) -> bool {
        self.min_height >= self.height_multiplier
    }
}

pub fn cell_distance(cell: GridCell, params: &WaveParameters) -> f32 {
    let row = cell.row as f32;
    let col = cell.col as f32;
    (row * row + col * col).sqrt() * params.radial_scale
}

pub fn cell_height(cell: GridCell, time: f32, params: &WaveParameters) -> f32 {
    let distance = cell_distance(cell, params);
    params.height_multiplier * (params.angular_frequency * time + distance).sin() + params.min_height
}

/// Model matrix placing a unit cube at `(row, 0, col)` stretched to the
/// cell's height.
pub fn cell_model_matrix(cell: GridCell, time: f32, params: &WaveParameters) -> Mat4 {
    let height = cell_height(cell, time, params);
    Mat4::IDENTITY
        .translate(Vec3::new(cell.row as f32, 0.0, cell.col as f32))
        .scale(Vec3::new(1.0, height, 1.0))
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WaveField {
    pub grid: GridSize,
    pub params: WaveParameters,
}

impl WaveField {
    pub fn new(grid: GridSize, params: WaveParameters) -> Self {
        Self { grid, params }
    }

    pub fn cells(&self) -> impl Iterator<Item = GridCell> {
        self.grid.cells()
    }

    pub fn model_matrix(&self, cell: GridCell, time: f32) -> Mat4 {
        cell_model_matrix(cell, time, &self.params)
    }

    /// Every cell's model matrix for one time sample, row-major.
    pub fn frame_matrices(&self, time: f32) -> Vec<Mat4> {
        self.cells().map(|cell| self.model_matrix(cell, time)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_grid_is_centered() {
        let grid = GridSize::new(15, 15);
        assert_eq!(grid.row_range(), -7..8);
        assert_eq!(grid.cells().count(), 225);
    }

    #[test]
    fn test_even_grid_range() {
        let grid = GridSize::new(4, 2);
        assert_eq!(grid.row_range(), -2..2);
        assert_eq!(grid.column_range(), -1..1);
        assert_eq!(grid.cells().count(), 8);
    }

    #[test]
    fn test_row_major_order() {
        let cells: Vec<_> = GridSize::new(2, 3).cells().collect();
        assert_eq!(cells[0], GridCell::new(-1, -1));
        assert_eq!(cells[1], GridCell::new(-1, 0));
        assert_eq!(cells[3], GridCell::new(0, -1));
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(GridSize::new(0, 5).cells().count(), 0);
    }
}
