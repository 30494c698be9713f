//! The per-frame driver.
//!
//! ```text
//! Initializing --initialize--> Running --close requested--> Terminating
//! ```
//!
//! One frame clears the target, binds the program and the cube, draws every
//! grid cell with a model matrix computed from a single time sample, unbinds
//! and presents. Any error inside a frame is returned to the caller, which
//! is expected to abort rather than continue with a partial frame.

use std::time::Instant;

use crate::{
    camera::Camera,
    config::SceneConfig,
    context::{build_program, FrameEvents, GraphicsContext, ProgramId, UniformLocation},
    error::{RenderError, SetupError},
    geometry::{unit_cube, GeometryResource},
    shaders::{ShaderSources, UniformLayout, MODEL_UNIFORM, PROJECTION_UNIFORM, PV_UNIFORM, VIEW_UNIFORM},
    wave_field::WaveField,
};

const STATS_INTERVAL_SECONDS: f32 = 1.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Running,
    Terminating,
}

/// Source of the per-frame time sample, in seconds since scene start.
pub trait TimeSource {
    fn elapsed_seconds(&self) -> f32;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }
}

impl TimeSource for SystemClock {
    fn elapsed_seconds(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Always reports the same time.
#[derive(Copy, Clone, Debug)]
pub struct FixedClock(pub f32);

impl TimeSource for FixedClock {
    fn elapsed_seconds(&self) -> f32 {
        self.0
    }
}

#[derive(Copy, Clone, Debug)]
enum CameraLocations {
    Combined { pv: UniformLocation },
    Separate { view: UniformLocation, projection: UniformLocation },
}

#[derive(Copy, Clone, Debug)]
struct UniformLocations {
    model: UniformLocation,
    camera: CameraLocations,
}

#[derive(Debug, Default)]
struct FrameStats {
    frames: u64,
    window_start: f32,
    window_frames: u32,
}

impl FrameStats {
    fn record(&mut self, time: f32) {
        self.frames += 1;
        self.window_frames += 1;

        let elapsed = time - self.window_start;
        if elapsed >= STATS_INTERVAL_SECONDS {
            log::debug!(
                "{:.1} fps ({} frames total)",
                self.window_frames as f32 / elapsed,
                self.frames
            );
            self.window_start = time;
            self.window_frames = 0;
        }
    }
}

pub struct FrameLoop {
    state: LoopState,
    config: SceneConfig,
    wave_field: WaveField,
    camera: Option<Camera>,
    geometry: Option<GeometryResource>,
    program: Option<ProgramId>,
    uniforms: Option<UniformLocations>,
    stats: FrameStats,
}

impl FrameLoop {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            state: LoopState::Initializing,
            wave_field: config.wave_field(),
            config,
            camera: None,
            geometry: None,
            program: None,
            uniforms: None,
            stats: FrameStats::default(),
        }
    }

    /// Builds every GPU resource and uploads the camera once.
    ///
    /// On failure nothing built here is left alive on the context.
    pub fn initialize<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        sources: &ShaderSources,
    ) -> Result<(), SetupError> {
        if self.state != LoopState::Initializing {
            return Err(SetupError::Render(RenderError::ResourceMisuse(format!(
                "initialize called in state {:?}",
                self.state
            ))));
        }
        self.config.validate()?;

        if let Err(e) = self.build_resources(ctx, sources) {
            self.release(ctx);
            self.state = LoopState::Terminating;
            return Err(e);
        }

        log::info!(
            "Scene ready: {}x{} grid, {} uniforms",
            self.config.grid.rows,
            self.config.grid.columns,
            match self.config.uniform_layout {
                UniformLayout::Combined => "combined",
                UniformLayout::Separate => "separate",
            }
        );
        self.state = LoopState::Running;
        Ok(())
    }

    fn build_resources<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        sources: &ShaderSources,
    ) -> Result<(), SetupError> {
        let (width, height) = ctx.size();
        let camera = Camera::new(self.config.camera.with_surface_size(width, height))?;

        self.geometry = Some(GeometryResource::create(ctx, &unit_cube())?);

        let program = build_program(ctx, &sources.vertex, &sources.fragment)?;
        self.program = Some(program);

        let uniforms = self.lookup_uniforms(ctx, program)?;
        self.uniforms = Some(uniforms);

        ctx.use_program(program)?;
        upload_camera(ctx, &uniforms.camera, &camera)?;
        self.camera = Some(camera);
        Ok(())
    }

    fn lookup_uniforms<C: GraphicsContext + ?Sized>(
        &self,
        ctx: &C,
        program: ProgramId,
    ) -> Result<UniformLocations, SetupError> {
        let find = |name: &str| {
            ctx.uniform_location(program, name)
                .ok_or_else(|| SetupError::MissingUniform(name.to_string()))
        };

        let camera = match self.config.uniform_layout {
            UniformLayout::Combined => CameraLocations::Combined { pv: find(PV_UNIFORM)? },
            UniformLayout::Separate => CameraLocations::Separate {
                view: find(VIEW_UNIFORM)?,
                projection: find(PROJECTION_UNIFORM)?,
            },
        };

        Ok(UniformLocations {
            model: find(MODEL_UNIFORM)?,
            camera,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn wave_field(&self) -> &WaveField {
        &self.wave_field
    }

    pub fn frames_rendered(&self) -> u64 {
        self.stats.frames
    }

    /// Runs one iteration. Returns the state the loop is in afterwards.
    pub fn frame<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        events: FrameEvents,
        time: f32,
    ) -> Result<LoopState, RenderError> {
        if self.state != LoopState::Running {
            return Err(RenderError::ResourceMisuse(format!(
                "frame requested in state {:?}",
                self.state
            )));
        }

        if events.close_requested {
            self.terminate(ctx)?;
            return Ok(self.state);
        }
        if let Some((width, height)) = events.resized {
            self.resize(ctx, width, height)?;
        }

        self.draw_cells(ctx, time)?;
        self.stats.record(time);
        Ok(self.state)
    }

    fn draw_cells<C: GraphicsContext + ?Sized>(&self, ctx: &mut C, time: f32) -> Result<(), RenderError> {
        let (Some(program), Some(geometry), Some(uniforms)) =
            (self.program, self.geometry.as_ref(), self.uniforms)
        else {
            return Err(RenderError::ResourceMisuse("running without resources".into()));
        };

        ctx.clear(self.config.clear_color)?;
        ctx.use_program(program)?;
        geometry.bind(ctx)?;

        for cell in self.wave_field.cells() {
            let model = self.wave_field.model_matrix(cell, time);
            ctx.set_mat4(uniforms.model, &model)?;
            geometry.draw(ctx)?;
        }

        GeometryResource::unbind(ctx);
        ctx.present()
    }

    /// Applies a new surface size: viewport, camera aspect, camera upload.
    pub fn resize<C: GraphicsContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        ctx.viewport(width, height);

        let (Some(camera), Some(program), Some(uniforms)) =
            (self.camera.as_mut(), self.program, self.uniforms)
        else {
            return Ok(());
        };
        camera.set_aspect_ratio(width as f32 / height as f32);
        ctx.use_program(program)?;
        upload_camera(ctx, &uniforms.camera, camera)?;
        log::debug!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Releases every resource exactly once and enters `Terminating`.
    ///
    /// Both the geometry and the program release are attempted; if either
    /// fails the first error is returned after the other has run.
    pub fn terminate<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C) -> Result<(), RenderError> {
        if self.state == LoopState::Terminating {
            return Ok(());
        }
        self.state = LoopState::Terminating;

        let mut first_error = None;
        if let Some(geometry) = self.geometry.take() {
            if let Err(e) = geometry.destroy(ctx) {
                log::error!("Failed to release geometry: {}", e);
                first_error.get_or_insert(e);
            }
        }
        if let Some(program) = self.program.take() {
            if let Err(e) = ctx.destroy_program(program) {
                log::error!("Failed to release program: {}", e);
                first_error.get_or_insert(e);
            }
        }
        log::info!("Scene terminated after {} frames", self.stats.frames);
        first_error.map_or(Ok(()), Err)
    }

    fn release<C: GraphicsContext + ?Sized>(&mut self, ctx: &mut C) {
        if let Some(geometry) = self.geometry.take() {
            if let Err(e) = geometry.destroy(ctx) {
                log::error!("Failed to release geometry: {}", e);
            }
        }
        if let Some(program) = self.program.take() {
            if let Err(e) = ctx.destroy_program(program) {
                log::error!("Failed to release program: {}", e);
            }
        }
        self.uniforms = None;
        self.camera = None;
    }
}

fn upload_camera<C: GraphicsContext + ?Sized>(
    ctx: &mut C,
    locations: &CameraLocations,
    camera: &Camera,
) -> Result<(), RenderError> {
    match *locations {
        CameraLocations::Combined { pv } => ctx.set_mat4(pv, &camera.view_projection()),
        CameraLocations::Separate { view, projection } => {
            ctx.set_mat4(view, &camera.view())?;
            ctx.set_mat4(projection, &camera.projection())
        }
    }
}
