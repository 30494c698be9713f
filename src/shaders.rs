//! Shader sources and the uniform interface they expose.
//!
//! The cube program takes `position`/`color` per vertex, a `model` matrix
//! per draw, and either a combined `pv` matrix or separate `view` and
//! `projection` matrices in the `CameraUniforms` block.

use std::path::{Path, PathBuf};

use crate::error::SetupError;

pub const MODEL_UNIFORM: &str = "model";
pub const PV_UNIFORM: &str = "pv";
pub const VIEW_UNIFORM: &str = "view";
pub const PROJECTION_UNIFORM: &str = "projection";

pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

pub const COMBINED_VERTEX_SHADER_FILE: &str = "cube_combined.vert.wgsl";
pub const SEPARATE_VERTEX_SHADER_FILE: &str = "cube_separate.vert.wgsl";
pub const FRAGMENT_SHADER_FILE: &str = "cube.frag.wgsl";

const MAT4_SIZE: u64 = 64;
const CAMERA_BLOCK: &str = "struct CameraUniforms";
const MODEL_BLOCK: &str = "struct ModelInput";

const COMBINED_VERTEX_SOURCE: &str = include_str!("shaders/cube_combined.vert.wgsl");
const SEPARATE_VERTEX_SOURCE: &str = include_str!("shaders/cube_separate.vert.wgsl");
const FRAGMENT_SOURCE: &str = include_str!("shaders/cube.frag.wgsl");

/// How the camera reaches the vertex stage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UniformLayout {
    /// One `pv` matrix (view then projection).
    #[default]
    Combined,
    /// `view` and `projection` uploaded separately.
    Separate,
}

impl UniformLayout {
    pub fn camera_uniforms(&self) -> &'static [&'static str] {
        match self {
            UniformLayout::Combined => &[PV_UNIFORM],
            UniformLayout::Separate => &[VIEW_UNIFORM, PROJECTION_UNIFORM],
        }
    }

    /// File name of this layout's vertex shader, as shipped in `src/shaders`.
    pub fn vertex_shader_file(&self) -> &'static str {
        match self {
            UniformLayout::Combined => COMBINED_VERTEX_SHADER_FILE,
            UniformLayout::Separate => SEPARATE_VERTEX_SHADER_FILE,
        }
    }
}

/// Whether a camera member is the last matrix before clip space, and so
/// carries the projection's depth range.
pub fn ends_in_clip_space(name: &str) -> bool {
    name == PV_UNIFORM || name == PROJECTION_UNIFORM
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn embedded(layout: UniformLayout) -> Self {
        let vertex = match layout {
            UniformLayout::Combined => COMBINED_VERTEX_SOURCE,
            UniformLayout::Separate => SEPARATE_VERTEX_SOURCE,
        };
        Self {
            vertex: vertex.to_string(),
            fragment: FRAGMENT_SOURCE.to_string(),
        }
    }

    /// Reads the layout's vertex shader (`cube_combined.vert.wgsl` or
    /// `cube_separate.vert.wgsl`) and `cube.frag.wgsl` from `dir`.
    pub fn load_from_dir(dir: &Path, layout: UniformLayout) -> Result<Self, SetupError> {
        let vertex = read_source(dir.join(layout.vertex_shader_file()))?;
        let fragment = read_source(dir.join(FRAGMENT_SHADER_FILE))?;
        log::info!("Loaded shader sources from {}", dir.display());
        Ok(Self { vertex, fragment })
    }
}

fn read_source(path: PathBuf) -> Result<String, SetupError> {
    std::fs::read_to_string(&path).map_err(|source| SetupError::ShaderSource { path, source })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UniformSlot {
    /// Byte offset inside the camera uniform buffer.
    Camera { offset: u64 },
    /// Per-draw instance data.
    Model,
}

/// The uniforms a vertex source declares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderInterface {
    pub camera_members: Vec<String>,
    pub has_model_input: bool,
}

impl ShaderInterface {
    pub fn reflect(vertex_source: &str) -> Self {
        Self {
            camera_members: parse_block_members(vertex_source, CAMERA_BLOCK),
            has_model_input: vertex_source.contains(MODEL_BLOCK),
        }
    }

    /// Named uniforms in location order: camera members first, then `model`.
    pub fn uniform_slots(&self) -> Vec<(String, UniformSlot)> {
        let mut slots: Vec<(String, UniformSlot)> = self
            .camera_members
            .iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    name.clone(),
                    UniformSlot::Camera {
                        offset: i as u64 * MAT4_SIZE,
                    },
                )
            })
            .collect();

        if self.has_model_input {
            slots.push((MODEL_UNIFORM.to_string(), UniformSlot::Model));
        }
        slots
    }

    pub fn camera_buffer_size(&self) -> u64 {
        self.camera_members.len().max(1) as u64 * MAT4_SIZE
    }
}

fn parse_block_members(source: &str, block: &str) -> Vec<String> {
    let Some(start) = source.find(block) else {
        return Vec::new();
    };
    let rest = &source[start + block.len()..];
    let (Some(open), Some(close)) = (rest.find('{'), rest.find('}')) else {
        return Vec::new();
    };
    if close < open {
        return Vec::new();
    }

    rest[open + 1..close]
        .lines()
        .map(|line| line.split("//").next().unwrap_or("").trim())
        .flat_map(|line| line.split(','))
        .filter_map(|member| {
            let (name, ty) = member.split_once(':')?;
            ty.contains("mat4x4").then(|| name.trim().to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_combined() {
        let sources = ShaderSources::embedded(UniformLayout::Combined);
        let interface = ShaderInterface::reflect(&sources.vertex);
        assert_eq!(interface.camera_members, vec!["pv".to_string()]);
        assert!(interface.has_model_input);
    }

    #[test]
    fn test_reflect_separate_offsets() {
        let sources = ShaderSources::embedded(UniformLayout::Separate);
        let slots = ShaderInterface::reflect(&sources.vertex).uniform_slots();
        assert_eq!(slots[0], ("view".to_string(), UniformSlot::Camera { offset: 0 }));
        assert_eq!(slots[1], ("projection".to_string(), UniformSlot::Camera { offset: 64 }));
        assert_eq!(slots[2], ("model".to_string(), UniformSlot::Model));
    }

    #[test]
    fn test_only_last_camera_matrix_ends_in_clip_space() {
        assert!(ends_in_clip_space(PV_UNIFORM));
        assert!(ends_in_clip_space(PROJECTION_UNIFORM));
        assert!(!ends_in_clip_space(VIEW_UNIFORM));
        assert!(!ends_in_clip_space(MODEL_UNIFORM));
    }

    #[test]
    fn test_reflect_without_block() {
        let interface = ShaderInterface::reflect("fn main() {}");
        assert!(interface.camera_members.is_empty());
        assert!(!interface.has_model_input);
        assert_eq!(interface.camera_buffer_size(), 64);
    }
}
