//! CPU texture sampling with GPU sampler semantics.

use glam::{Vec2, Vec4};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::SliceResult;
use crate::pipeline::TextureSampler;
use crate::types::TextureSize;

/// Texel addressing outside `[0,1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(mode: FilterMode) -> Self {
        match mode {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

/// Sampler configuration shared by the CPU sampler and the GPU renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    #[serde(default)]
    pub address_mode: AddressMode,
    #[serde(default)]
    pub filter: FilterMode,
}

impl SamplerConfig {
    pub fn descriptor(&self) -> wgpu::SamplerDescriptor<'static> {
        let address_mode = self.address_mode.into();
        let filter = self.filter.into();
        wgpu::SamplerDescriptor {
            label: Some("Slice Sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        }
    }
}

/// An RGBA image bound with a sampler configuration.
pub struct ImageSampler {
    image: RgbaImage,
    config: SamplerConfig,
}

impl ImageSampler {
    pub fn new(image: RgbaImage, config: SamplerConfig) -> Self {
        Self { image, config }
    }

    /// Loads any format the `image` crate decodes, converted to RGBA8.
    pub fn open(path: &Path, config: SamplerConfig) -> SliceResult<Self> {
        let image = image::open(path)?.to_rgba8();
        Ok(Self::new(image, config))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    fn address(&self, i: i64, extent: u32) -> u32 {
        let n = i64::from(extent);
        let wrapped = match self.config.address_mode {
            AddressMode::ClampToEdge => i.clamp(0, n - 1),
            AddressMode::Repeat => i.rem_euclid(n),
            AddressMode::MirrorRepeat => {
                let m = i.rem_euclid(2 * n);
                if m >= n { 2 * n - 1 - m } else { m }
            }
        };
        wrapped as u32
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let (w, h) = self.image.dimensions();
        let p = self.image.get_pixel(self.address(x, w), self.address(y, h));
        Vec4::new(p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32) / 255.0
    }
}

impl TextureSampler for ImageSampler {
    fn size(&self) -> TextureSize {
        let (width, height) = self.image.dimensions();
        TextureSize::new(width, height)
    }

    fn sample(&self, uv: Vec2) -> Vec4 {
        let size = self.size();
        if size.is_empty() || !uv.is_finite() {
            return Vec4::ZERO;
        }
        let texel = uv * size.as_vec2();

        match self.config.filter {
            FilterMode::Nearest => {
                let t = texel.floor();
                self.texel(t.x as i64, t.y as i64)
            }
            FilterMode::Linear => {
                let t = texel - Vec2::splat(0.5);
                let base = t.floor();
                let f = t - base;
                let (x0, y0) = (base.x as i64, base.y as i64);
                let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), f.x);
                let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), f.x);
                top.lerp(bottom, f.y)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 2x1 image: black then white.
    fn ramp() -> RgbaImage {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        img
    }

    fn sampler(address_mode: AddressMode, filter: FilterMode) -> ImageSampler {
        ImageSampler::new(ramp(), SamplerConfig { address_mode, filter })
    }

    #[test]
    fn test_nearest_picks_texel() {
        let s = sampler(AddressMode::ClampToEdge, FilterMode::Nearest);
        assert_eq!(s.sample(Vec2::new(0.25, 0.5)).x, 0.0);
        assert_eq!(s.sample(Vec2::new(0.75, 0.5)).x, 1.0);
        // u == 1 clamps onto the last texel.
        assert_eq!(s.sample(Vec2::new(1.0, 0.5)).x, 1.0);
    }

    #[test]
    fn test_nearest_repeat_and_mirror() {
        let repeat = sampler(AddressMode::Repeat, FilterMode::Nearest);
        assert_eq!(repeat.sample(Vec2::new(1.25, 0.5)).x, 0.0);
        assert_eq!(repeat.sample(Vec2::new(-0.25, 0.5)).x, 1.0);

        let mirror = sampler(AddressMode::MirrorRepeat, FilterMode::Nearest);
        assert_eq!(mirror.sample(Vec2::new(1.25, 0.5)).x, 1.0);
        assert_eq!(mirror.sample(Vec2::new(1.75, 0.5)).x, 0.0);
    }

    #[test]
    fn test_linear_blends_between_texel_centers() {
        let s = sampler(AddressMode::ClampToEdge, FilterMode::Linear);
        assert!((s.sample(Vec2::new(0.5, 0.5)).x - 0.5).abs() < 1e-6);
        assert!((s.sample(Vec2::new(0.25, 0.5)).x - 0.0).abs() < 1e-6);
        assert!((s.sample(Vec2::new(0.75, 0.5)).x - 1.0).abs() < 1e-6);
        assert_eq!(s.sample(Vec2::new(0.5, 0.5)).w, 1.0);
    }

    #[test]
    fn test_empty_image_is_transparent() {
        let s = ImageSampler::new(RgbaImage::new(0, 0), SamplerConfig::default());
        assert!(s.size().is_empty());
        assert_eq!(s.sample(Vec2::new(0.5, 0.5)), Vec4::ZERO);
    }

    #[test]
    fn test_non_finite_coordinate_is_transparent() {
        let s = sampler(AddressMode::Repeat, FilterMode::Linear);
        assert_eq!(s.sample(Vec2::new(f32::NAN, 0.5)), Vec4::ZERO);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageSampler::open(&dir.path().join("missing.png"), SamplerConfig::default());
        assert!(matches!(result, Err(crate::SliceError::Image(_))));
    }

    #[test]
    fn test_descriptor_mirrors_config() {
        let config = SamplerConfig {
            address_mode: AddressMode::Repeat,
            filter: FilterMode::Nearest,
        };
        let desc = config.descriptor();
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Nearest);
    }
}
