//! Headless single-frame rendering to PNG.
//!
//! Renders the scene once into an offscreen texture at a fixed time sample,
//! reads the pixels back and writes them with the `image` crate. Useful for
//! checking the wave shape without a window.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::{
    config::SceneConfig,
    context::FrameEvents,
    frame_loop::{FixedClock, FrameLoop, TimeSource},
    gpu::GpuContext,
    renderer::WgpuContext,
    shaders::ShaderSources,
};

pub fn render_snapshot(
    config: SceneConfig,
    sources: &ShaderSources,
    clock: FixedClock,
    output_path: &Path,
) -> Result<()> {
    log::info!(
        "Rendering {}x{} frame at t={:.3}s to {}",
        config.width,
        config.height,
        clock.elapsed_seconds(),
        output_path.display()
    );

    let gpu = pollster::block_on(GpuContext::new())?;
    let mut ctx = WgpuContext::offscreen(gpu, config.width, config.height)?;
    let (width, height) = (config.width, config.height);

    let mut frame_loop = FrameLoop::new(config);
    frame_loop.initialize(&mut ctx, sources)?;

    let rendered = frame_loop
        .frame(&mut ctx, FrameEvents::default(), clock.elapsed_seconds())
        .map_err(anyhow::Error::from)
        .and_then(|_| ctx.capture_frame().map_err(anyhow::Error::from));
    frame_loop.terminate(&mut ctx)?;

    let pixels = to_rgba(rendered?, ctx.format());
    save_frame_as_png(output_path, &pixels, width, height)?;
    log::info!("Frame saved to {}", output_path.display());
    Ok(())
}

/// Returns RGBA8 pixels, swizzling if `format` stores blue first.
pub fn to_rgba(data: Vec<u8>, format: wgpu::TextureFormat) -> Vec<u8> {
    match format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => convert_bgra_to_rgba(&data),
        _ => data,
    }
}

pub fn convert_bgra_to_rgba(bgra_data: &[u8]) -> Vec<u8> {
    bgra_data
        .chunks_exact(4)
        .flat_map(|pixel| [pixel[2], pixel[1], pixel[0], pixel[3]])
        .collect()
}

pub fn save_frame_as_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(anyhow!(
            "frame holds {} bytes, expected {} for {}x{}",
            data.len(),
            expected,
            width,
            height
        ));
    }
    image::save_buffer(path, data, width, height, image::ColorType::Rgba8)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_passes_through() {
        let data = vec![1, 2, 3, 4];
        assert_eq!(to_rgba(data.clone(), wgpu::TextureFormat::Rgba8UnormSrgb), data);
    }

    #[test]
    fn test_bgra_is_swizzled() {
        assert_eq!(
            to_rgba(vec![10, 20, 30, 255], wgpu::TextureFormat::Bgra8UnormSrgb),
            vec![30, 20, 10, 255]
        );
    }
}
