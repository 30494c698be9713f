use std::path::PathBuf;
use thiserror::Error;

use crate::context::{GeometryId, ProgramId, ShaderStage};

/// Failures while building the scene. None of these are retried: the scene
/// is abandoned before the first frame.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to create window: {0}")]
    Window(String),

    #[error("no suitable graphics adapter: {0}")]
    Adapter(String),

    #[error("failed to create graphics surface: {0}")]
    Surface(String),

    #[error("failed to read shader source {path}: {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage:?} shader failed to compile: {message}")]
    ShaderCompile { stage: ShaderStage, message: String },

    #[error("shader program failed to link: {0}")]
    ProgramLink(String),

    #[error("shader program has no uniform named `{0}`")]
    MissingUniform(String),

    #[error("geometry upload failed: {0}")]
    Geometry(String),

    #[error("invalid camera configuration: {0}")]
    Camera(String),

    #[error("invalid scene configuration: {0}")]
    Scene(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Failures inside a running frame. Partial frames indicate a programming
/// defect, so the caller aborts instead of skipping cells.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface unavailable: {0}")]
    Surface(String),

    #[error("resource misuse: {0}")]
    ResourceMisuse(String),

    #[error("geometry {0:?} is not live")]
    DeadGeometry(GeometryId),

    #[error("program {0:?} is not live")]
    DeadProgram(ProgramId),

    #[error("uniform location {0} is not known to the active program")]
    UnknownUniform(u32),

    #[error("frame capture failed: {0}")]
    Capture(String),
}

impl RenderError {
    /// True for errors caused by breaking the single-owner resource
    /// discipline rather than by the environment.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            RenderError::ResourceMisuse(_)
                | RenderError::DeadGeometry(_)
                | RenderError::DeadProgram(_)
                | RenderError::UnknownUniform(_)
        )
    }
}
