use crate::{
    camera::CameraConfig,
    error::SetupError,
    shaders::UniformLayout,
    wave_field::{GridSize, WaveField, WaveParameters, MAX_GRID_DIMENSION},
};

pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 600;
pub const WINDOW_TITLE: &str = "Cube waves";
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Everything needed to set the scene up. Read-only once the frame loop
/// is running.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    pub camera: CameraConfig,
    pub grid: GridSize,
    pub wave: WaveParameters,
    pub uniform_layout: UniformLayout,
    pub clear_color: wgpu::Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            camera: CameraConfig::default()
                .with_surface_size(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            grid: GridSize::default(),
            wave: WaveParameters::default(),
            uniform_layout: UniformLayout::default(),
            clear_color: CLEAR_COLOR,
        }
    }
}

impl SceneConfig {
    /// Sets the surface size and keeps the camera aspect ratio in step.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self.camera = self.camera.with_surface_size(width, height);
        self
    }

    pub fn wave_field(&self) -> WaveField {
        WaveField::new(self.grid, self.wave)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.width == 0 || self.height == 0 {
            return Err(SetupError::Scene(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.grid.cell_count() == 0 {
            return Err(SetupError::Scene(format!(
                "grid must contain at least one cell, got {}x{}",
                self.grid.rows, self.grid.columns
            )));
        }
        if !self.grid.is_within_limits() {
            return Err(SetupError::Scene(format!(
                "grid dimensions must be at most {}, got {}x{}",
                MAX_GRID_DIMENSION, self.grid.rows, self.grid.columns
            )));
        }
        self.camera.validate()?;
        self.wave.validate()?;

        if !self.wave.never_inverts() {
            let (low, _) = self.wave.height_bounds();
            log::warn!("Cube heights can drop to {:.2}; cubes will invert", low);
        }
        Ok(())
    }
}
