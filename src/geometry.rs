//! Static unit-cube geometry and its GPU lifecycle.
//!
//! The cube is uploaded once at scene setup, bound around the per-cell draw
//! loop, and released exactly once at teardown.

use bytemuck::{Pod, Zeroable};

use crate::{
    context::{GeometryId, GraphicsContext},
    error::{RenderError, SetupError},
};

pub const CUBE_VERTEX_COUNT: u32 = 36;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const FRONT_COLOR: [f32; 3] = [0.0, 0.0, 0.18];
const RIGHT_COLOR: [f32; 3] = [0.65, 0.8, 0.6];
const TOP_COLOR: [f32; 3] = [0.4, 0.6, 0.65];

/// Interleaved vertex, 24 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl CubeVertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// Attribute layout of a vertex buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VertexLayout {
    pub array_stride: u64,
    pub attributes: &'static [wgpu::VertexAttribute],
}

const POSITION_COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: 3 * 4,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
];

impl VertexLayout {
    /// Position at location 0, color at location 1.
    pub const POSITION_COLOR: VertexLayout = VertexLayout {
        array_stride: std::mem::size_of::<CubeVertex>() as u64,
        attributes: &POSITION_COLOR_ATTRIBUTES,
    };

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: self.attributes,
        }
    }
}

// Two triangles per face, in the order back, front, left, right, bottom, top.
const FACES: [([[f32; 3]; 6], [f32; 3]); 6] = [
    (
        [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, -0.5],
        ],
        WHITE,
    ),
    (
        [
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
            [-0.5, -0.5, 0.5],
        ],
        FRONT_COLOR,
    ),
    (
        [
            [-0.5, 0.5, 0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, -0.5],
            [-0.5, -0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ],
        WHITE,
    ),
    (
        [
            [0.5, 0.5, 0.5],
            [0.5, 0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
        ],
        RIGHT_COLOR,
    ),
    (
        [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [-0.5, -0.5, 0.5],
            [-0.5, -0.5, -0.5],
        ],
        WHITE,
    ),
    (
        [
            [-0.5, 0.5, -0.5],
            [0.5, 0.5, -0.5],
            [0.5, 0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
            [-0.5, 0.5, -0.5],
        ],
        TOP_COLOR,
    ),
];

/// The 36-vertex unit cube centered at the origin.
pub fn unit_cube() -> Vec<CubeVertex> {
    FACES
        .iter()
        .flat_map(|(corners, color)| corners.iter().map(move |p| CubeVertex::new(*p, *color)))
        .collect()
}

/// Uploaded cube geometry.
///
/// Owned by exactly one driver. [`GeometryResource::destroy`] consumes the
/// value, so the owner cannot bind or draw it afterwards.
#[derive(Debug)]
pub struct GeometryResource {
    id: GeometryId,
    vertex_count: u32,
    layout: VertexLayout,
}

impl GeometryResource {
    pub fn create<C: GraphicsContext + ?Sized>(
        ctx: &mut C,
        vertices: &[CubeVertex],
    ) -> Result<Self, SetupError> {
        if vertices.is_empty() {
            return Err(SetupError::Geometry("no vertices to upload".into()));
        }

        let layout = VertexLayout::POSITION_COLOR;
        let id = ctx.create_geometry(vertices, &layout)?;
        log::info!("Uploaded geometry {:?} ({} vertices)", id, vertices.len());

        Ok(Self {
            id,
            vertex_count: vertices.len() as u32,
            layout,
        })
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn bind<C: GraphicsContext + ?Sized>(&self, ctx: &mut C) -> Result<(), RenderError> {
        ctx.bind_geometry(self.id)
    }

    pub fn unbind<C: GraphicsContext + ?Sized>(ctx: &mut C) {
        ctx.unbind_geometry();
    }

    pub fn draw<C: GraphicsContext + ?Sized>(&self, ctx: &mut C) -> Result<(), RenderError> {
        ctx.draw(self.vertex_count)
    }

    pub fn destroy<C: GraphicsContext + ?Sized>(self, ctx: &mut C) -> Result<(), RenderError> {
        log::info!("Releasing geometry {:?}", self.id);
        ctx.destroy_geometry(self.id)
    }
}
