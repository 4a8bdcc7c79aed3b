//! CPU reference rasterizer.
//!
//! Runs the vertex stage, rasterizes triangles at pixel centers and shades
//! every covered pixel with [`CoordinatePipeline::shade`]. Rows are shaded in
//! parallel with rayon; fragments share only read-only inputs.

use glam::{Mat4, Vec2, Vec4};
use image::RgbaImage;
use rayon::prelude::*;

use crate::error::{SliceError, SliceResult};
use crate::pipeline::{CoordinatePipeline, TextureSampler};
use crate::quad::SpriteQuad;
use crate::types::RenderMode;
use crate::vertex::{SliceVertex, VertexOutput, transform_vertex};

/// Size and per-vertex inputs of a full-target panel render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelTarget {
    pub width: u32,
    pub height: u32,
    pub tint: Vec4,
    pub mode: RenderMode,
}

/// A triangle after the vertex stage, in pixel space.
struct ScreenTriangle {
    points: [Vec2; 3],
    vertices: [VertexOutput; 3],
    area: f32,
    min_y: f32,
    max_y: f32,
}

fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

impl ScreenTriangle {
    fn new(vertices: [VertexOutput; 3], width: u32, height: u32) -> Option<Self> {
        let points = vertices.map(|v| {
            let ndc = v.clip_position.truncate() / v.clip_position.w;
            Vec2::new(
                (ndc.x + 1.0) * 0.5 * width as f32,
                (1.0 - ndc.y) * 0.5 * height as f32,
            )
        });
        let area = edge(points[0], points[1], points[2]);
        if area == 0.0 || !area.is_finite() {
            return None;
        }
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        Some(Self {
            points,
            vertices,
            area,
            min_y,
            max_y,
        })
    }

    /// Barycentric weights of `p`, or `None` when outside.
    fn weights(&self, p: Vec2) -> Option<[f32; 3]> {
        let [a, b, c] = self.points;
        let w = [
            edge(b, c, p) / self.area,
            edge(c, a, p) / self.area,
            edge(a, b, p) / self.area,
        ];
        // Slack keeps the shared diagonal crack-free under rounding.
        w.iter().all(|w| *w >= -1e-5).then_some(w)
    }

    fn interpolate(&self, w: [f32; 3]) -> (Vec2, Vec4) {
        let [a, b, c] = &self.vertices;
        (
            a.uv * w[0] + b.uv * w[1] + c.uv * w[2],
            a.color * w[0] + b.color * w[1] + c.color * w[2],
        )
    }
}

fn to_rgba8(color: Vec4) -> [u8; 4] {
    let c = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, c.w as u8]
}

/// Renders a triangle list into a new image.
///
/// Uncovered pixels stay transparent black; later triangles overwrite
/// earlier ones. The render mode is flat, taken from each triangle's first
/// vertex.
pub fn rasterize<S>(
    pipeline: &CoordinatePipeline,
    texture: &S,
    view_proj: Mat4,
    vertices: &[SliceVertex],
    width: u32,
    height: u32,
) -> SliceResult<RgbaImage>
where
    S: TextureSampler + Sync + ?Sized,
{
    if width == 0 || height == 0 {
        return Err(SliceError::EmptyTarget { width, height });
    }
    pipeline.validate(texture.size())?;

    let triangles: Vec<ScreenTriangle> = vertices
        .chunks_exact(3)
        .filter_map(|tri| {
            let outputs = [
                transform_vertex(view_proj, &tri[0]),
                transform_vertex(view_proj, &tri[1]),
                transform_vertex(view_proj, &tri[2]),
            ];
            ScreenTriangle::new(outputs, width, height)
        })
        .collect();
    log::debug!(
        "Rasterizing {} triangles into {}x{}",
        triangles.len(),
        width,
        height
    );

    let mut image = RgbaImage::new(width, height);
    let pixels: &mut [u8] = &mut image;
    pixels
        .par_chunks_mut(width as usize * 4)
        .enumerate()
        .for_each(|(y, row)| {
            let py = y as f32 + 0.5;
            for tri in triangles.iter().filter(|t| py >= t.min_y && py <= t.max_y) {
                for (x, out) in row.chunks_exact_mut(4).enumerate() {
                    let p = Vec2::new(x as f32 + 0.5, py);
                    if let Some(w) = tri.weights(p) {
                        let (uv, color) = tri.interpolate(w);
                        let input = tri.vertices[0].fragment(uv, color);
                        out.copy_from_slice(&to_rgba8(pipeline.shade(&input, texture)));
                    }
                }
            }
        });

    Ok(image)
}

/// Renders `texture` as one sliced panel filling the whole target.
pub fn render_panel<S>(
    pipeline: &CoordinatePipeline,
    texture: &S,
    target: PanelTarget,
) -> SliceResult<RgbaImage>
where
    S: TextureSampler + Sync + ?Sized,
{
    let vertices = SpriteQuad::fullscreen(target.tint, target.mode)
        .vertices(Mat4::IDENTITY, texture.size());
    rasterize(
        pipeline,
        texture,
        Mat4::IDENTITY,
        &vertices,
        target.width,
        target.height,
    )
}
