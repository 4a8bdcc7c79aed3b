//! Panel settings from flags and an optional JSON file.

use anyhow::{Context, Result};
use glam::{Vec2, Vec4};
use ninepatch::{
    AddressMode, AtlasRect, BorderQuad, CoordinatePipeline, FilterMode, RenderMode, SamplerConfig,
    SliceParams, SliceStrategy, TextureSize, TilingGuard, window_slice_params,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::args::{AddressArg, FilterArg, ModeArg, PanelArgs, StrategyArg};

/// Panel settings as stored on disk. Every field is optional.
///
/// ```json
/// { "border": [4, 4, 4, 4], "tiling": [2, 0], "strategy": "window" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub border: Option<[f32; 4]>,
    pub tiling: Option<[f32; 2]>,
    pub strategy: Option<StrategyArg>,
    pub mode: Option<ModeArg>,
    pub tint: Option<[f32; 4]>,
    pub filter: Option<FilterArg>,
    pub address: Option<AddressArg>,
    pub atlas_rect: Option<[u32; 4]>,
    pub legacy_tiling_guard: Option<bool>,
}

impl PanelConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }
}

/// Fully resolved panel settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    /// Pixel border.
    pub border: BorderQuad,
    pub tiling: Vec2,
    pub strategy: SliceStrategy,
    pub mode: RenderMode,
    pub tint: Vec4,
    pub sampler: SamplerConfig,
    pub guard: TilingGuard,
    pub atlas_rect: Option<AtlasRect>,
}

impl Panel {
    /// Explicit flags win over file values, which win over defaults.
    pub fn resolve(args: &PanelArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => PanelConfig::load(path)?,
            None => PanelConfig::default(),
        };
        Ok(Self::merge(args, &file))
    }

    fn merge(args: &PanelArgs, file: &PanelConfig) -> Self {
        let strategy = match args.strategy.or(file.strategy) {
            Some(StrategyArg::WindowRelative) => SliceStrategy::WindowRelative,
            Some(StrategyArg::SelfRelative) | None => SliceStrategy::SelfRelative,
        };
        let mode = match args.mode.or(file.mode) {
            Some(ModeArg::Solid) => RenderMode::SolidColor,
            Some(ModeArg::Textured) | None => RenderMode::TexturedQuad,
        };
        let filter = match args.filter.or(file.filter) {
            Some(FilterArg::Nearest) => FilterMode::Nearest,
            Some(FilterArg::Linear) | None => FilterMode::Linear,
        };
        let address_mode = match args.address.or(file.address) {
            Some(AddressArg::Repeat) => AddressMode::Repeat,
            Some(AddressArg::Mirror) => AddressMode::MirrorRepeat,
            Some(AddressArg::Clamp) | None => AddressMode::ClampToEdge,
        };
        let legacy = args.legacy_tiling_guard || file.legacy_tiling_guard.unwrap_or(false);

        Self {
            border: args.border.or(file.border).map(BorderQuad::from).unwrap_or_default(),
            tiling: args.tiling.or(file.tiling).map(Vec2::from).unwrap_or(Vec2::ZERO),
            strategy,
            mode,
            tint: args.tint.or(file.tint).map(Vec4::from).unwrap_or(Vec4::ONE),
            sampler: SamplerConfig {
                address_mode,
                filter,
            },
            guard: if legacy {
                TilingGuard::SharedX
            } else {
                TilingGuard::PerAxis
            },
            atlas_rect: args.atlas_rect.or(file.atlas_rect).map(AtlasRect::from),
        }
    }

    /// Pixel size of the sprite: the atlas rect if set, else the texture.
    pub fn sprite_size(&self, texture_size: TextureSize) -> TextureSize {
        self.atlas_rect.map_or(texture_size, |rect| rect.size())
    }

    /// Builds the coordinate pipeline for a texture drawn at `target` pixels.
    pub fn pipeline(&self, texture_size: TextureSize, target: (u32, u32)) -> Result<CoordinatePipeline> {
        let sprite_size = self.sprite_size(texture_size);
        let params = match self.strategy {
            SliceStrategy::SelfRelative => SliceParams::self_relative(self.border, sprite_size),
            SliceStrategy::WindowRelative => window_slice_params(
                (target.0 as f32, target.1 as f32),
                self.border,
                sprite_size,
            )?
            .params(),
        };
        let pipeline = CoordinatePipeline::new(self.strategy, params)
            .with_tiling(self.tiling)
            .with_guard(self.guard);
        Ok(match self.atlas_rect {
            Some(rect) => pipeline.with_atlas_rect(rect),
            None => pipeline,
        })
    }
}
