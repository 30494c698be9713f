//! Cube wave viewer.
//!
//! Opens a window, builds the scene and runs one frame per `AboutToWait`
//! until the window is closed. `--save-frame` renders a single frame
//! offscreen instead and writes it as PNG.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use cube_wave::{
    config::{SceneConfig, WINDOW_TITLE},
    frame_loop::{FixedClock, FrameLoop, LoopState, SystemClock, TimeSource},
    gpu::GpuContext,
    shaders::{ShaderSources, UniformLayout},
    snapshot::render_snapshot,
    FrameEvents, GridSize, RenderError, SetupError, WaveParameters, WgpuContext,
};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

#[derive(Parser, Debug)]
#[command(name = "cube-wave")]
#[command(about = "Animated grid of cubes whose heights follow a radial sine wave")]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = cube_wave::config::DEFAULT_WINDOW_WIDTH)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = cube_wave::config::DEFAULT_WINDOW_HEIGHT)]
    height: u32,

    /// Number of grid rows
    #[arg(long, default_value_t = GridSize::default().rows)]
    rows: u32,

    /// Number of grid columns
    #[arg(long, default_value_t = GridSize::default().columns)]
    columns: u32,

    /// Cube height at the wave's rest position
    #[arg(long, default_value_t = WaveParameters::default().min_height)]
    min_height: f32,

    /// Wave amplitude
    #[arg(long, default_value_t = WaveParameters::default().height_multiplier)]
    height_multiplier: f32,

    /// Angular frequency in radians per second
    #[arg(long, default_value_t = WaveParameters::default().angular_frequency)]
    angular_frequency: f32,

    /// Scale applied to the distance from the grid center
    #[arg(long, default_value_t = WaveParameters::default().radial_scale)]
    radial_scale: f32,

    /// Upload the camera as one matrix or as view and projection
    #[arg(long, value_enum, default_value_t = UniformLayout::Combined)]
    uniform_layout: UniformLayout,

    /// Directory holding cube_<layout>.vert.wgsl and cube.frag.wgsl
    #[arg(long)]
    shader_dir: Option<PathBuf>,

    /// Render one frame offscreen and save it to this PNG (headless mode)
    #[arg(long)]
    save_frame: Option<PathBuf>,

    /// Time sample in seconds used with --save-frame
    #[arg(long, default_value_t = 0.0)]
    time: f32,
}

impl Args {
    fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            grid: GridSize::new(self.rows, self.columns),
            wave: WaveParameters {
                min_height: self.min_height,
                height_multiplier: self.height_multiplier,
                angular_frequency: self.angular_frequency,
                radial_scale: self.radial_scale,
            },
            uniform_layout: self.uniform_layout,
            ..SceneConfig::default()
        }
        .with_size(self.width, self.height)
    }

    fn shader_sources(&self) -> Result<ShaderSources> {
        match &self.shader_dir {
            Some(dir) => Ok(ShaderSources::load_from_dir(dir, self.uniform_layout)?),
            None => Ok(ShaderSources::embedded(self.uniform_layout)),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let result = run(&args);
    if let Err(e) = &result {
        log::error!("{:#}", e);
    }
    result
}

fn run(args: &Args) -> Result<()> {
    let config = args.scene_config();
    let sources = args.shader_sources().context("Failed to load shaders")?;

    match &args.save_frame {
        Some(output_path) => render_snapshot(config, &sources, FixedClock(args.time), output_path)
            .context("Headless render failed"),
        None => run_windowed(config, &sources),
    }
}

fn run_windowed(config: SceneConfig, sources: &ShaderSources) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .build(&event_loop)
            .map_err(|e| SetupError::Window(e.to_string()))?,
    );

    let gpu = pollster::block_on(GpuContext::new())?;
    let mut ctx = WgpuContext::for_window(gpu, window.clone())?;
    let mut frame_loop = FrameLoop::new(config);
    frame_loop
        .initialize(&mut ctx, sources)
        .context("Scene setup failed")?;

    let clock = SystemClock::start();
    let mut pending = FrameEvents::default();
    let mut failure: Option<RenderError> = None;

    event_loop.run(|event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => pending.close_requested = true,
                WindowEvent::Resized(size) => pending.resized = Some((size.width, size.height)),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => pending.close_requested = true,
                _ => {}
            },
            Event::AboutToWait => {
                let events = std::mem::take(&mut pending);
                match frame_loop.frame(&mut ctx, events, clock.elapsed_seconds()) {
                    Ok(LoopState::Running) => {}
                    Ok(_) => elwt.exit(),
                    Err(e) => {
                        failure = Some(e);
                        elwt.exit();
                    }
                }
            }
            _ => {}
        }
    })?;

    if let Some(e) = failure {
        if let Err(release) = frame_loop.terminate(&mut ctx) {
            log::error!("Failed to release resources: {}", release);
        }
        return Err(e).context("Frame failed");
    }
    frame_loop.terminate(&mut ctx)?;
    Ok(())
}
