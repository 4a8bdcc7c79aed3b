use anyhow::{Context, Result, bail};
use glam::Vec2;
use ninepatch::{FragmentInput, ImageSampler, PanelTarget, TextureSampler, render_panel};
use std::path::Path;

use crate::config::Panel;

fn load_texture(path: &Path, panel: &Panel) -> Result<ImageSampler> {
    let texture = ImageSampler::open(path, panel.sampler)
        .with_context(|| format!("Failed to open texture {}", path.display()))?;
    let size = texture.size();
    log::info!("Loaded {} ({}x{})", path.display(), size.width, size.height);
    Ok(texture)
}

/// Renders `input` as a `width` x `height` panel into `output`.
pub fn render(input: &Path, output: &Path, width: u32, height: u32, panel: &Panel) -> Result<()> {
    let texture = load_texture(input, panel)?;
    let pipeline = panel.pipeline(texture.size(), (width, height))?;

    let start = std::time::Instant::now();
    let image = render_panel(
        &pipeline,
        &texture,
        PanelTarget {
            width,
            height,
            tint: panel.tint,
            mode: panel.mode,
        },
    )?;
    log::info!("Rendered {}x{} panel in {:?}", width, height, start.elapsed());

    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

/// Traces one coordinate through the pipeline.
pub fn probe(input: &Path, uv: [f32; 2], target: Option<(u32, u32)>, panel: &Panel) -> Result<String> {
    let texture = load_texture(input, panel)?;
    let size = texture.size();
    let sprite = panel.sprite_size(size);
    let target = target.unwrap_or((sprite.width, sprite.height));
    if !uv.iter().all(|c| c.is_finite()) {
        bail!("Probe coordinate must be finite, got {:?}", uv);
    }

    let pipeline = panel.pipeline(size, target)?;
    pipeline.validate(size)?;

    let uv = Vec2::from(uv);
    let coord = pipeline.sample_coord(uv, size);
    let color = pipeline.shade(
        &FragmentInput {
            uv,
            color: panel.tint,
            mode: panel.mode,
        },
        &texture,
    );
    Ok(format!(
        "uv ({:.4}, {:.4}) -> sample ({:.4}, {:.4}) color [{:.3}, {:.3}, {:.3}, {:.3}]",
        uv.x, uv.y, coord.x, coord.y, color.x, color.y, color.z, color.w
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{FilterArg, PanelArgs};
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn panel(border: [f32; 4]) -> Panel {
        Panel::resolve(&PanelArgs {
            border: Some(border),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))
            .save(&input)
            .unwrap();

        render(&input, &output, 12, 6, &panel([1.0; 4])).unwrap();

        let out = image::open(&output).unwrap().to_rgba8();
        assert_eq!(out.dimensions(), (12, 6));
        assert_eq!(*out.get_pixel(5, 3), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_render_missing_input() {
        let dir = tempdir().unwrap();
        let err = render(
            &dir.path().join("missing.png"),
            &dir.path().join("out.png"),
            4,
            4,
            &panel([0.0; 4]),
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open texture"));
    }

    #[test]
    fn test_probe_self_relative() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.png");
        RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]))
            .save(&input)
            .unwrap();

        let line = probe(&input, [0.05, 0.5], None, &panel([10.0; 4])).unwrap();
        assert!(line.contains("sample (0.5000, 0.5000)"), "{}", line);
    }

    #[test]
    fn test_render_atlas_sprite() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("atlas.png");
        let output = dir.path().join("out.png");
        // Left half blue, right half green.
        let mut atlas = RgbaImage::from_pixel(8, 4, Rgba([0, 0, 255, 255]));
        for y in 0..4 {
            for x in 4..8 {
                atlas.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        atlas.save(&input).unwrap();

        let panel = Panel::resolve(&PanelArgs {
            atlas_rect: Some([4, 0, 4, 4]),
            filter: Some(FilterArg::Nearest),
            ..Default::default()
        })
        .unwrap();
        render(&input, &output, 16, 16, &panel).unwrap();

        let out = image::open(&output).unwrap().to_rgba8();
        assert!(out.pixels().all(|p| *p == Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_atlas_rect_outside_texture_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.png");
        RgbaImage::new(8, 8).save(&input).unwrap();
        let panel = Panel::resolve(&PanelArgs {
            atlas_rect: Some([4, 4, 8, 8]),
            ..Default::default()
        })
        .unwrap();
        let err = probe(&input, [0.5, 0.5], None, &panel).unwrap_err();
        assert!(format!("{:#}", err).contains("outside"), "{:#}", err);
    }

    #[test]
    fn test_probe_rejects_negative_border() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.png");
        RgbaImage::new(8, 8).save(&input).unwrap();
        assert!(probe(&input, [0.5, 0.5], None, &panel([-1.0, 0.0, 0.0, 0.0])).is_err());
    }
}
