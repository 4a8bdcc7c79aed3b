//! Test support: golden image comparison and GPU readback.

use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Assert that an image matches the golden snapshot in `tests/goldens`.
///
/// With `UPDATE_SNAPSHOTS=1` the image is saved as the new golden instead.
/// A missing golden fails the test; goldens are committed with the tests.
pub fn assert_snapshot(actual: &RgbaImage, name: &str) {
    let golden_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/goldens");
    let update = std::env::var("UPDATE_SNAPSHOTS").is_ok();
    assert_snapshot_at(actual, name, &golden_dir, update);
}

fn assert_snapshot_at(actual: &RgbaImage, name: &str, golden_dir: &Path, update: bool) {
    let golden_path = golden_dir.join(format!("{}.png", name));
    if update {
        std::fs::create_dir_all(golden_dir).unwrap();
        actual
            .save(&golden_path)
            .expect("Failed to save golden image");
        println!("Saved golden: {:?}", golden_path);
        return;
    }
    if !golden_path.exists() {
        panic!(
            "Missing golden {:?}; run with UPDATE_SNAPSHOTS=1 to create it",
            golden_path
        );
    }

    let golden = image::open(&golden_path)
        .expect("Failed to load golden image")
        .to_rgba8();

    if actual.dimensions() != golden.dimensions() {
        panic!(
            "Dimension mismatch: actual {:?} vs golden {:?}",
            actual.dimensions(),
            golden.dimensions()
        );
    }

    let diff_pixels = actual
        .pixels()
        .zip(golden.pixels())
        .filter(|(a, g)| a != g)
        .count();

    if diff_pixels > 0 {
        let actual_path = golden_dir.join(format!("{}_actual.png", name));
        let _ = actual.save(&actual_path);
        panic!(
            "Snapshot mismatch for {}: {} pixels differ. Saved actual to {:?}",
            name, diff_pixels, actual_path
        );
    }
}

/// Headless wgpu device whose render targets can be read back.
///
/// Honours `WGPU_BACKEND` and `WGPU_POWER_PREF` so CI can pick a software
/// adapter.
pub struct HeadlessGpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    /// Format of targets from [`HeadlessGpu::color_target`].
    pub format: wgpu::TextureFormat,
}

impl HeadlessGpu {
    /// Returns None without a usable adapter so renderer tests can skip.
    pub async fn new() -> Option<Self> {
        let backends = wgpu::util::backend_bits_from_env()
            .unwrap_or(wgpu::Backends::VULKAN | wgpu::Backends::GL);
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::util::power_preference_from_env()
                    .unwrap_or(wgpu::PowerPreference::LowPower),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await?;
        log::debug!("Headless adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Headless Slice Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                },
                None,
            )
            .await
            .ok()?;

        Some(Self {
            device,
            queue,
            // Same encoding as sprite textures, so texels survive a
            // decode/encode round trip unchanged.
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
        })
    }

    /// A render target that can also be copied out with [`Self::read_texture`].
    pub fn color_target(&self, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Readable Color Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Copies a 4-byte-per-texel target into an image, waiting for the GPU.
    pub fn read_texture(&self, texture: &wgpu::Texture) -> RgbaImage {
        let (width, height) = (texture.width(), texture.height());
        // Rows in the buffer are padded to COPY_BYTES_PER_ROW_ALIGNMENT.
        let row_bytes = 4 * width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row_bytes = row_bytes.div_ceil(align) * align;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: u64::from(padded_row_bytes * height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(height),
                },
            },
            texture.size(),
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .expect("map_async callback dropped")
            .expect("Failed to map readback buffer");

        let pixels = {
            let data = slice.get_mapped_range();
            data.chunks_exact(padded_row_bytes as usize)
                .flat_map(|row| &row[..row_bytes as usize])
                .copied()
                .collect::<Vec<u8>>()
        };
        buffer.unmap();
        RgbaImage::from_raw(width, height, pixels).expect("Readback size mismatch")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        assert_snapshot_at(&img, "flat", dir.path(), true);
        assert!(dir.path().join("flat.png").exists());
        // Without update, compares against the saved golden.
        assert_snapshot_at(&img, "flat", dir.path(), false);
    }

    #[test]
    #[should_panic(expected = "Missing golden")]
    fn test_snapshot_missing_golden_panics() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        assert_snapshot_at(&img, "flat", dir.path(), false);
    }

    #[test]
    #[should_panic(expected = "Snapshot mismatch")]
    fn test_snapshot_mismatch_panics() {
        let dir = tempdir().unwrap();
        let img = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        assert_snapshot_at(&img, "flat", dir.path(), true);
        let other = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        assert_snapshot_at(&other, "flat", dir.path(), false);
    }
}
