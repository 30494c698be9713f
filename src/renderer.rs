//! [`GraphicsContext`] on top of wgpu.
//!
//! Calls between `clear` and `present` are recorded into a pass command
//! list and replayed into one render pass at `present`. Each `set_mat4` on
//! the model uniform appends a matrix to a per-frame instance buffer and
//! the following `draw` reads exactly that instance, so every grid cell is
//! still its own draw call.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use winit::window::Window;

use crate::{
    context::{GeometryId, GraphicsContext, ProgramId, ShaderId, ShaderStage, UniformLocation},
    error::{RenderError, SetupError},
    geometry::{CubeVertex, VertexLayout},
    gpu::{GpuContext, DEPTH_FORMAT},
    linalg::Mat4,
    shaders::{ends_in_clip_space, ShaderInterface, UniformSlot, FRAGMENT_ENTRY_POINT, VERTEX_ENTRY_POINT},
};

pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const INITIAL_MODEL_CAPACITY: usize = 256;
const MODEL_STRIDE: u64 = std::mem::size_of::<Mat4>() as u64;

// One Float32x4 per matrix row, locations 2..=5.
const MODEL_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        offset: 0,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        offset: 16,
        shader_location: 3,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        offset: 32,
        shader_location: 4,
        format: wgpu::VertexFormat::Float32x4,
    },
    wgpu::VertexAttribute {
        offset: 48,
        shader_location: 5,
        format: wgpu::VertexFormat::Float32x4,
    },
];

fn model_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: MODEL_STRIDE,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &MODEL_ATTRIBUTES,
    }
}

enum RenderTarget {
    Window {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
        staging_buffer: wgpu::Buffer,
        bytes_per_row: u32,
    },
}

struct GpuGeometry {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct CompiledShader {
    module: wgpu::ShaderModule,
    stage: ShaderStage,
    interface: ShaderInterface,
}

struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniforms: Vec<(String, UniformSlot)>,
}

#[derive(Copy, Clone, Debug)]
enum PassCommand {
    UseProgram(ProgramId),
    BindGeometry(GeometryId),
    Draw { vertex_count: u32, instance: u32 },
}

#[derive(Default)]
struct PendingFrame {
    clear_color: Option<wgpu::Color>,
    commands: Vec<PassCommand>,
    models: Vec<Mat4>,
}

pub struct WgpuContext {
    gpu: GpuContext,
    target: RenderTarget,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    depth: (wgpu::Texture, wgpu::TextureView),
    bind_group_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_capacity: usize,

    next_id: u32,
    geometries: HashMap<GeometryId, GpuGeometry>,
    released_geometries: HashSet<GeometryId>,
    shaders: HashMap<ShaderId, CompiledShader>,
    programs: HashMap<ProgramId, GpuProgram>,

    active_program: Option<ProgramId>,
    bound_geometry: Option<GeometryId>,
    current_model: Option<u32>,
    frame: PendingFrame,
}

impl WgpuContext {
    /// Creates a context presenting to `window`.
    pub fn for_window(gpu: GpuContext, window: Arc<Window>) -> Result<Self, SetupError> {
        let size = window.inner_size();
        let surface = gpu
            .instance
            .create_surface(window)
            .map_err(|e| SetupError::Surface(e.to_string()))?;

        let caps = surface.get_capabilities(&gpu.adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| SetupError::Surface("surface is not supported by the adapter".into()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);
        log::info!("Surface configured: {:?} {}x{}", format, config.width, config.height);

        let (width, height) = (config.width, config.height);
        Ok(Self::with_target(
            gpu,
            RenderTarget::Window { surface, config },
            format,
            width,
            height,
        ))
    }

    /// Creates a context rendering into a texture that can be read back
    /// with [`WgpuContext::capture_frame`].
    pub fn offscreen(gpu: GpuContext, width: u32, height: u32) -> Result<Self, SetupError> {
        if width == 0 || height == 0 {
            return Err(SetupError::Surface(format!(
                "offscreen target must be non-empty, got {}x{}",
                width, height
            )));
        }
        let target = create_offscreen_target(&gpu, width, height);
        log::info!("Offscreen target: {:?} {}x{}", OFFSCREEN_FORMAT, width, height);
        Ok(Self::with_target(gpu, target, OFFSCREEN_FORMAT, width, height))
    }

    fn with_target(
        gpu: GpuContext,
        target: RenderTarget,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let depth = gpu.create_depth_texture(width, height);
        let bind_group_layout = create_camera_bind_group_layout(&gpu);
        let model_buffer = create_model_buffer(&gpu, INITIAL_MODEL_CAPACITY);

        Self {
            gpu,
            target,
            format,
            width,
            height,
            depth,
            bind_group_layout,
            model_buffer,
            model_capacity: INITIAL_MODEL_CAPACITY,
            next_id: 1,
            geometries: HashMap::new(),
            released_geometries: HashSet::new(),
            shaders: HashMap::new(),
            programs: HashMap::new(),
            active_program: None,
            bound_geometry: None,
            current_model: None,
            frame: PendingFrame::default(),
        }
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn live_geometry(&self, geometry: GeometryId) -> Result<&GpuGeometry, RenderError> {
        match self.geometries.get(&geometry) {
            Some(resource) => Ok(resource),
            None if self.released_geometries.contains(&geometry) => Err(RenderError::ResourceMisuse(
                format!("geometry {:?} used after destroy", geometry),
            )),
            None => Err(RenderError::DeadGeometry(geometry)),
        }
    }

    fn ensure_model_capacity(&mut self, needed: usize) {
        if needed <= self.model_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        log::debug!("Growing model buffer from {} to {} matrices", self.model_capacity, capacity);
        self.model_buffer.destroy();
        self.model_buffer = create_model_buffer(&self.gpu, capacity);
        self.model_capacity = capacity;
    }

    fn reconfigure_surface(&mut self) {
        if let RenderTarget::Window { surface, config } = &mut self.target {
            config.width = self.width;
            config.height = self.height;
            surface.configure(&self.gpu.device, config);
        }
    }

    fn acquire_surface_texture(&self) -> Result<Option<wgpu::SurfaceTexture>, wgpu::SurfaceError> {
        match &self.target {
            RenderTarget::Window { surface, .. } => surface.get_current_texture().map(Some),
            RenderTarget::Offscreen { .. } => Ok(None),
        }
    }

    fn replay<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        commands: &[PassCommand],
    ) -> Result<(), RenderError> {
        for command in commands {
            match *command {
                PassCommand::UseProgram(id) => {
                    let program = self.programs.get(&id).ok_or(RenderError::DeadProgram(id))?;
                    pass.set_pipeline(&program.pipeline);
                    pass.set_bind_group(0, &program.bind_group, &[]);
                }
                PassCommand::BindGeometry(id) => {
                    let geometry = self.live_geometry(id)?;
                    pass.set_vertex_buffer(0, geometry.buffer.slice(..));
                    pass.set_vertex_buffer(1, self.model_buffer.slice(..));
                }
                PassCommand::Draw {
                    vertex_count,
                    instance,
                } => pass.draw(0..vertex_count, instance..instance + 1),
            }
        }
        Ok(())
    }

    /// Reads back the last presented offscreen frame as tightly packed
    /// RGBA8 rows.
    pub fn capture_frame(&self) -> Result<Vec<u8>, RenderError> {
        let RenderTarget::Offscreen {
            texture,
            staging_buffer,
            bytes_per_row,
        } = &self.target
        else {
            return Err(RenderError::Capture("only offscreen targets can be captured".into()));
        };

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Capture Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: staging_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(*bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        let submission = self.gpu.queue.submit(Some(encoder.finish()));
        self.gpu
            .device
            .poll(wgpu::MaintainBase::WaitForSubmissionIndex(submission));

        let buffer_slice = staging_buffer.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.gpu.device.poll(wgpu::MaintainBase::Wait);

        pollster::block_on(rx)
            .map_err(|_| RenderError::Capture("map callback was dropped".into()))?
            .map_err(|e| RenderError::Capture(e.to_string()))?;

        let unpadded_bytes_per_row = (self.width * 4) as usize;
        let mut pixels = Vec::with_capacity(unpadded_bytes_per_row * self.height as usize);
        {
            let data = buffer_slice.get_mapped_range();
            for row in data.chunks(*bytes_per_row as usize).take(self.height as usize) {
                pixels.extend_from_slice(&row[..unpadded_bytes_per_row]);
            }
        }
        staging_buffer.unmap();
        Ok(pixels)
    }
}

impl GraphicsContext for WgpuContext {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.depth = self.gpu.create_depth_texture(width, height);

        if matches!(self.target, RenderTarget::Window { .. }) {
            self.reconfigure_surface();
        } else {
            self.target = create_offscreen_target(&self.gpu, width, height);
        }
    }

    fn clear(&mut self, color: wgpu::Color) -> Result<(), RenderError> {
        self.frame = PendingFrame {
            clear_color: Some(color),
            ..PendingFrame::default()
        };
        self.current_model = None;
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if let Some(geometry) = self.bound_geometry {
            return Err(RenderError::ResourceMisuse(format!(
                "geometry {:?} still bound at end of frame",
                geometry
            )));
        }
        let frame = std::mem::take(&mut self.frame);
        self.current_model = None;

        self.ensure_model_capacity(frame.models.len());
        if !frame.models.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.model_buffer, 0, bytemuck::cast_slice(&frame.models));
        }

        let surface_texture = match self.acquire_surface_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring and skipping frame");
                self.reconfigure_surface();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(RenderError::Surface(e.to_string())),
        };

        let view = match (&surface_texture, &self.target) {
            (Some(output), _) => output.texture.create_view(&wgpu::TextureViewDescriptor::default()),
            (None, RenderTarget::Offscreen { texture, .. }) => {
                texture.create_view(&wgpu::TextureViewDescriptor::default())
            }
            (None, RenderTarget::Window { .. }) => {
                return Err(RenderError::Surface("no surface texture acquired".into()))
            }
        };

        let mut encoder = self.gpu.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Cube Wave Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Wave Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(frame.clear_color.unwrap_or(wgpu::Color::WHITE)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.1,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.replay(&mut pass, &frame.commands)?;
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        if let Some(output) = surface_texture {
            output.present();
        }
        Ok(())
    }

    fn create_geometry(
        &mut self,
        vertices: &[CubeVertex],
        layout: &VertexLayout,
    ) -> Result<GeometryId, SetupError> {
        if *layout != VertexLayout::POSITION_COLOR {
            return Err(SetupError::Geometry(
                "only the position/color layout is supported".into(),
            ));
        }
        let buffer = self.gpu.create_buffer_init(
            "Cube Vertex Buffer",
            bytemuck::cast_slice(vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let geometry = GeometryId(self.allocate_id());
        self.geometries.insert(
            geometry,
            GpuGeometry {
                buffer,
                vertex_count: vertices.len() as u32,
            },
        );
        log::debug!("Uploaded {:?} with {} vertices", geometry, vertices.len());
        Ok(geometry)
    }

    fn bind_geometry(&mut self, geometry: GeometryId) -> Result<(), RenderError> {
        self.live_geometry(geometry)?;
        self.bound_geometry = Some(geometry);
        self.frame.commands.push(PassCommand::BindGeometry(geometry));
        Ok(())
    }

    fn unbind_geometry(&mut self) {
        self.bound_geometry = None;
    }

    fn destroy_geometry(&mut self, geometry: GeometryId) -> Result<(), RenderError> {
        self.live_geometry(geometry)?;
        if let Some(resource) = self.geometries.remove(&geometry) {
            resource.buffer.destroy();
        }
        self.released_geometries.insert(geometry);
        if self.bound_geometry == Some(geometry) {
            self.bound_geometry = None;
        }
        Ok(())
    }

    fn draw(&mut self, vertex_count: u32) -> Result<(), RenderError> {
        let program = self
            .active_program
            .ok_or_else(|| RenderError::ResourceMisuse("draw without a program in use".into()))?;
        if !self.programs.contains_key(&program) {
            return Err(RenderError::DeadProgram(program));
        }
        let geometry = self
            .bound_geometry
            .ok_or_else(|| RenderError::ResourceMisuse("draw without bound geometry".into()))?;
        let available = self.live_geometry(geometry)?.vertex_count;
        if vertex_count > available {
            return Err(RenderError::ResourceMisuse(format!(
                "draw of {} vertices from geometry holding {}",
                vertex_count, available
            )));
        }
        let instance = self
            .current_model
            .ok_or_else(|| RenderError::ResourceMisuse("draw before a model matrix was set".into()))?;

        self.frame.commands.push(PassCommand::Draw {
            vertex_count,
            instance,
        });
        Ok(())
    }

    fn compile_shader(&mut self, source: &str, stage: ShaderStage) -> Result<ShaderId, SetupError> {
        self.gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self.gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(match stage {
                ShaderStage::Vertex => "Cube Vertex Shader",
                ShaderStage::Fragment => "Cube Fragment Shader",
            }),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = pollster::block_on(self.gpu.device.pop_error_scope()) {
            return Err(SetupError::ShaderCompile {
                stage,
                message: error.to_string(),
            });
        }

        let shader = ShaderId(self.allocate_id());
        self.shaders.insert(
            shader,
            CompiledShader {
                module,
                stage,
                interface: ShaderInterface::reflect(source),
            },
        );
        Ok(shader)
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, SetupError> {
        let (vs, fs) = match (self.shaders.get(&vertex), self.shaders.get(&fragment)) {
            (Some(vs), Some(fs)) if vs.stage == ShaderStage::Vertex && fs.stage == ShaderStage::Fragment => {
                (vs, fs)
            }
            _ => {
                return Err(SetupError::ProgramLink(format!(
                    "{:?} and {:?} are not a vertex/fragment pair",
                    vertex, fragment
                )))
            }
        };

        let uniforms = vs.interface.uniform_slots();
        let camera_matrices = vec![Mat4::IDENTITY; vs.interface.camera_members.len().max(1)];
        let camera_buffer = self.gpu.create_buffer_init(
            "Camera Uniform Buffer",
            bytemuck::cast_slice(&camera_matrices),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        self.gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = create_cube_pipeline(
            &self.gpu,
            &vs.module,
            &fs.module,
            &self.bind_group_layout,
            self.format,
        );
        if let Some(error) = pollster::block_on(self.gpu.device.pop_error_scope()) {
            camera_buffer.destroy();
            return Err(SetupError::ProgramLink(error.to_string()));
        }

        let program = ProgramId(self.allocate_id());
        self.programs.insert(
            program,
            GpuProgram {
                pipeline,
                camera_buffer,
                bind_group,
                uniforms,
            },
        );
        log::debug!("Linked {:?}", program);
        Ok(program)
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs
            .get(&program)?
            .uniforms
            .iter()
            .position(|(uniform, _)| uniform == name)
            .map(|index| UniformLocation(index as u32))
    }

    fn use_program(&mut self, program: ProgramId) -> Result<(), RenderError> {
        if !self.programs.contains_key(&program) {
            return Err(RenderError::DeadProgram(program));
        }
        self.active_program = Some(program);
        self.frame.commands.push(PassCommand::UseProgram(program));
        Ok(())
    }

    fn set_mat4(&mut self, location: UniformLocation, matrix: &Mat4) -> Result<(), RenderError> {
        let program = self
            .active_program
            .ok_or_else(|| RenderError::ResourceMisuse("uniform upload without a program in use".into()))?;
        let resource = self.programs.get(&program).ok_or(RenderError::DeadProgram(program))?;
        let (name, slot) = resource
            .uniforms
            .get(location.0 as usize)
            .ok_or(RenderError::UnknownUniform(location.0))?;

        match *slot {
            UniformSlot::Camera { offset } => {
                // Matrices arrive in OpenGL clip depth; wgpu clips z to 0..w.
                let matrix = if ends_in_clip_space(name) {
                    matrix.to_wgpu_depth()
                } else {
                    *matrix
                };
                self.gpu
                    .queue
                    .write_buffer(&resource.camera_buffer, offset, bytemuck::bytes_of(&matrix));
            }
            UniformSlot::Model => {
                self.current_model = Some(self.frame.models.len() as u32);
                self.frame.models.push(*matrix);
            }
        }
        Ok(())
    }

    fn destroy_program(&mut self, program: ProgramId) -> Result<(), RenderError> {
        let resource = self
            .programs
            .remove(&program)
            .ok_or(RenderError::DeadProgram(program))?;
        resource.camera_buffer.destroy();
        if self.active_program == Some(program) {
            self.active_program = None;
        }
        Ok(())
    }
}

fn create_offscreen_target(gpu: &GpuContext, width: u32, height: u32) -> RenderTarget {
    let unpadded_bytes_per_row = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let bytes_per_row = ((unpadded_bytes_per_row + align - 1) / align) * align;

    let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Offscreen Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: OFFSCREEN_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let staging_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Capture Staging Buffer"),
        size: bytes_per_row as u64 * height as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    RenderTarget::Offscreen {
        texture,
        staging_buffer,
        bytes_per_row,
    }
}

fn create_model_buffer(gpu: &GpuContext, capacity: usize) -> wgpu::Buffer {
    gpu.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Model Instance Buffer"),
        size: capacity as u64 * MODEL_STRIDE,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_camera_bind_group_layout(gpu: &GpuContext) -> wgpu::BindGroupLayout {
    gpu.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Camera Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

fn create_cube_pipeline(
    gpu: &GpuContext,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = gpu.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Cube Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    gpu.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Cube Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: VERTEX_ENTRY_POINT,
            buffers: &[VertexLayout::POSITION_COLOR.buffer_layout(), model_buffer_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: FRAGMENT_ENTRY_POINT,
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}
