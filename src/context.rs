//! The graphics context seam.
//!
//! Everything the frame loop needs from the outside world (surface, buffer
//! upload, shader program, draw calls) goes through [`GraphicsContext`].
//! The context is an explicit value handed to the loop at setup; there is
//! no process-wide function table.

use crate::{
    error::{RenderError, SetupError},
    geometry::{CubeVertex, VertexLayout},
    linalg::Mat4,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// Index of a named uniform inside a linked program.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// What the event source reported since the previous frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub close_requested: bool,
    pub resized: Option<(u32, u32)>,
}

impl FrameEvents {
    pub fn close() -> Self {
        Self {
            close_requested: true,
            resized: None,
        }
    }

    pub fn resize(width: u32, height: u32) -> Self {
        Self {
            close_requested: false,
            resized: Some((width, height)),
        }
    }
}

pub trait GraphicsContext {
    // Surface
    fn size(&self) -> (u32, u32);
    fn viewport(&mut self, width: u32, height: u32);
    fn clear(&mut self, color: wgpu::Color) -> Result<(), RenderError>;
    fn present(&mut self) -> Result<(), RenderError>;

    // Geometry
    fn create_geometry(
        &mut self,
        vertices: &[CubeVertex],
        layout: &VertexLayout,
    ) -> Result<GeometryId, SetupError>;
    fn bind_geometry(&mut self, geometry: GeometryId) -> Result<(), RenderError>;
    fn unbind_geometry(&mut self);
    fn destroy_geometry(&mut self, geometry: GeometryId) -> Result<(), RenderError>;
    fn draw(&mut self, vertex_count: u32) -> Result<(), RenderError>;

    // Shader program
    fn compile_shader(&mut self, source: &str, stage: ShaderStage) -> Result<ShaderId, SetupError>;
    fn delete_shader(&mut self, shader: ShaderId);
    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, SetupError>;
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;
    fn use_program(&mut self, program: ProgramId) -> Result<(), RenderError>;
    /// Sets a matrix uniform on the program currently in use.
    fn set_mat4(&mut self, location: UniformLocation, matrix: &Mat4) -> Result<(), RenderError>;
    fn destroy_program(&mut self, program: ProgramId) -> Result<(), RenderError>;
}

/// Compiles both stages and links them, releasing the stage objects
/// whether or not linking succeeds.
pub fn build_program<C: GraphicsContext + ?Sized>(
    ctx: &mut C,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<ProgramId, SetupError> {
    let vertex = ctx.compile_shader(vertex_source, ShaderStage::Vertex)?;
    let fragment = match ctx.compile_shader(fragment_source, ShaderStage::Fragment) {
        Ok(fragment) => fragment,
        Err(e) => {
            ctx.delete_shader(vertex);
            return Err(e);
        }
    };

    let program = ctx.link_program(vertex, fragment);
    ctx.delete_shader(vertex);
    ctx.delete_shader(fragment);
    program
}
