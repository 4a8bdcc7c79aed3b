//! Per-fragment coordinate pipeline: slice, tile, sample, tint.
//!
//! Every binding the fragment stage reads (texture, sampler, border and
//! tiling uniforms) is passed in explicitly, so the whole pipeline can run on
//! the CPU against synthetic inputs. Nothing here holds state between
//! fragments; a [`CoordinatePipeline`] is shared read-only by every worker.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{SliceError, SliceResult};
use crate::slicer::{Axis, SliceParams, SliceStrategy};
use crate::tiler::tile_texture;
use crate::types::{AtlasRect, RenderMode, TextureSize};

/// A bound texture plus its sampler configuration.
pub trait TextureSampler {
    /// Pixel dimensions, queried per draw.
    fn size(&self) -> TextureSize;
    /// Filtered RGBA at a normalized coordinate.
    fn sample(&self, uv: Vec2) -> Vec4;
}

/// Which tiling factor component gates tiling of the y axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TilingGuard {
    /// Each axis is gated by its own factor.
    #[default]
    PerAxis,
    /// The y axis is gated by the x factor. Reproduces output of renderers
    /// that shipped with this defect.
    SharedX,
}

/// Interpolated inputs of one fragment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInput {
    pub uv: Vec2,
    pub color: Vec4,
    pub mode: RenderMode,
}

/// Slicing and tiling configuration for one draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePipeline {
    pub strategy: SliceStrategy,
    pub params: SliceParams,
    /// Repeats of the interior per axis; 0 disables tiling on that axis.
    #[serde(default, with = "vec2_array")]
    pub tiling: Vec2,
    #[serde(default)]
    pub guard: TilingGuard,
    /// Atlas sub-rect the sprite lives in; `None` uses the whole texture.
    #[serde(default)]
    pub atlas_rect: Option<AtlasRect>,
}

impl CoordinatePipeline {
    pub fn new(strategy: SliceStrategy, params: SliceParams) -> Self {
        Self {
            strategy,
            params,
            tiling: Vec2::ZERO,
            guard: TilingGuard::PerAxis,
            atlas_rect: None,
        }
    }

    pub fn with_tiling(mut self, tiling: Vec2) -> Self {
        self.tiling = tiling;
        self
    }

    pub fn with_guard(mut self, guard: TilingGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_atlas_rect(mut self, rect: AtlasRect) -> Self {
        self.atlas_rect = Some(rect);
        self
    }

    /// Checks the draw configuration once, before any fragment runs.
    ///
    /// The fragment functions never fail; inputs rejected here would produce
    /// NaN or infinite coordinates.
    pub fn validate(&self, texture_size: TextureSize) -> SliceResult<()> {
        let params = &self.params;
        if !params.border.is_valid() {
            return Err(SliceError::NegativeBorder(params.border.to_array()));
        }
        if !params.window_border.is_valid() {
            return Err(SliceError::NegativeBorder(params.window_border.to_array()));
        }
        if !self.tiling.is_finite() || self.tiling.min_element() < 0.0 {
            return Err(SliceError::InvalidTiling(self.tiling.to_array()));
        }
        if let Some(rect) = self.atlas_rect {
            if !rect.fits(texture_size) {
                return Err(SliceError::AtlasRectOutOfBounds {
                    rect: [rect.x, rect.y, rect.width, rect.height],
                    width: texture_size.width,
                    height: texture_size.height,
                });
            }
        }
        if self.strategy == SliceStrategy::SelfRelative && texture_size.is_empty() {
            return Err(SliceError::EmptyTexture {
                width: texture_size.width,
                height: texture_size.height,
            });
        }

        if self.guard == TilingGuard::SharedX {
            log::warn!("y-axis tiling is gated by the x tiling factor (legacy guard)");
        }
        let params = self.bound_params(texture_size);
        for (axis, factor) in [(Axis::X, self.tiling.x), (Axis::Y, self.tiling.y)] {
            let bounds = self.strategy.source_breakpoints(axis, &params);
            if factor != 0.0 && bounds.low >= bounds.high {
                log::warn!(
                    "{:?} borders leave no interior ({} >= {}); tiling degenerates",
                    axis,
                    bounds.low,
                    bounds.high
                );
            }
        }

        log::debug!(
            "Validated {:?} slice pipeline: border={:?}, tiling={:?}, texture={}x{}",
            self.strategy,
            params.border.to_array(),
            self.tiling.to_array(),
            texture_size.width,
            texture_size.height
        );
        Ok(())
    }

    /// Slicing sees the atlas rect, when set, as the whole texture.
    fn bound_params(&self, texture_size: TextureSize) -> SliceParams {
        SliceParams {
            texture_size: self.atlas_rect.map_or(texture_size, |rect| rect.size()),
            ..self.params
        }
    }

    fn tiles_x(&self) -> bool {
        self.tiling.x != 0.0
    }

    fn tiles_y(&self) -> bool {
        match self.guard {
            TilingGuard::PerAxis => self.tiling.y != 0.0,
            TilingGuard::SharedX => self.tiling.x != 0.0,
        }
    }

    /// Final sampling coordinate for an interpolated UV.
    pub fn sample_coord(&self, uv: Vec2, texture_size: TextureSize) -> Vec2 {
        let params = self.bound_params(texture_size);

        let mut coord = if self.strategy.is_passthrough(&params) {
            uv
        } else {
            self.strategy.slice(uv, &params)
        };

        if self.tiles_x() {
            let b = self.strategy.source_breakpoints(Axis::X, &params);
            coord.x = tile_texture(coord.x, b.low, b.high, self.tiling.x);
        }
        if self.tiles_y() {
            let b = self.strategy.source_breakpoints(Axis::Y, &params);
            coord.y = tile_texture(coord.y, b.low, b.high, self.tiling.y);
        }

        match self.atlas_rect {
            Some(rect) => rect.to_texture(coord, texture_size),
            None => coord,
        }
    }

    /// Output color of one fragment.
    pub fn shade<S: TextureSampler + ?Sized>(&self, input: &FragmentInput, texture: &S) -> Vec4 {
        let uv = self.sample_coord(input.uv, texture.size());
        // Sampled before the mode branch; the result may go unused.
        let sampled = texture.sample(uv);
        combine(sampled, input.color, input.mode)
    }
}

/// Applies the render mode to a sampled texel and the vertex tint.
pub fn combine(sampled: Vec4, tint: Vec4, mode: RenderMode) -> Vec4 {
    match mode {
        RenderMode::TexturedQuad => sampled * tint,
        RenderMode::SolidColor => tint,
    }
}

/// Uniform block shared with `shader.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SliceUniform {
    /// Pixel borders (self-relative) or normalized texture borders (window-relative).
    pub border: [f32; 4],
    /// Normalized window borders, window-relative only.
    pub window_border: [f32; 4],
    pub tiling: [f32; 2],
    /// 0 = self-relative, 1 = window-relative.
    pub strategy: u32,
    /// 0 = per-axis, 1 = shared x.
    pub guard: u32,
    /// Atlas rect as `[x, y, width, height]` in texels; all zero for none.
    pub atlas: [f32; 4],
}

impl SliceUniform {
    pub fn from_pipeline(pipeline: &CoordinatePipeline) -> Self {
        Self {
            border: pipeline.params.border.to_array(),
            window_border: pipeline.params.window_border.to_array(),
            tiling: pipeline.tiling.to_array(),
            strategy: match pipeline.strategy {
                SliceStrategy::SelfRelative => 0,
                SliceStrategy::WindowRelative => 1,
            },
            guard: match pipeline.guard {
                TilingGuard::PerAxis => 0,
                TilingGuard::SharedX => 1,
            },
            atlas: pipeline.atlas_rect.map_or([0.0; 4], |rect| rect.to_array()),
        }
    }
}

mod vec2_array {
    use glam::Vec2;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vec2, s: S) -> Result<S::Ok, S::Error> {
        v.to_array().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec2, D::Error> {
        <[f32; 2]>::deserialize(d).map(Vec2::from)
    }
}
