use crate::context::GpuContext;
use crate::error::{GpuError, Result};

/// Texture holding one composited RGBA8 frame, sampled pixel for pixel.
pub struct FrameTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl FrameTexture {
    pub fn new(ctx: &GpuContext, rgba: &[u8], width: u32, height: u32) -> Result<Self> {
        check_frame_len(rgba.len(), width, height)?;

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: extent(width, height),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let frame = Self {
            texture,
            view,
            sampler,
            width,
            height,
        };
        frame.write(ctx, rgba);
        Ok(frame)
    }

    /// Whether a frame of this size can be written in place.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }

    /// Overwrite the pixels of a same-sized frame.
    pub fn update(&self, ctx: &GpuContext, rgba: &[u8]) -> Result<()> {
        check_frame_len(rgba.len(), self.width, self.height)?;
        self.write(ctx, rgba);
        Ok(())
    }

    fn write(&self, ctx: &GpuContext, rgba: &[u8]) {
        ctx.queue.write_texture(
            self.texture.as_image_copy(),
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            extent(self.width, self.height),
        );
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Check that a buffer holds exactly `width * height` RGBA8 pixels.
pub fn check_frame_len(len: usize, width: u32, height: u32) -> Result<()> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || len != expected {
        return Err(GpuError::FrameSize {
            width,
            height,
            expected,
            actual: len,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_frame_len() {
        assert!(check_frame_len(16, 2, 2).is_ok());
        assert!(matches!(
            check_frame_len(15, 2, 2),
            Err(GpuError::FrameSize { expected: 16, actual: 15, .. })
        ));
        assert!(check_frame_len(0, 0, 0).is_err());
    }
}
