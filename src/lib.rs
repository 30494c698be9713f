pub mod camera;
pub mod config;
pub mod context;
pub mod error;
pub mod frame_loop;
pub mod geometry;
pub mod gpu;
pub mod linalg;
pub mod recording;
pub mod renderer;
pub mod shaders;
pub mod snapshot;
pub mod wave_field;

pub use camera::{Camera, CameraConfig};
pub use config::SceneConfig;
pub use context::{FrameEvents, GraphicsContext};
pub use error::{RenderError, SetupError};
pub use frame_loop::{FixedClock, FrameLoop, LoopState, SystemClock, TimeSource};
pub use linalg::{Mat4, Vec3, Vec4};
pub use renderer::WgpuContext;
pub use wave_field::{GridSize, WaveField, WaveParameters};
