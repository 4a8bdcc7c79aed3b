//! Border-aware (9-slice) texture coordinate remapping.
//!
//! This crate provides:
//! - Linear remapping and per-axis slicing of texture coordinates (`remap`, `slicer`)
//! - Interior tiling (`tiler`)
//! - The per-fragment coordinate pipeline and its uniforms (`pipeline`)
//! - Sprite quad geometry and the vertex stage (`quad`, `vertex`)
//! - A CPU reference rasterizer (`raster`, `sampler`) and a wgpu renderer (`gpu`)

mod error;

pub mod gpu;
pub mod nine_slice;
pub mod pipeline;
pub mod quad;
pub mod raster;
pub mod remap;
pub mod sampler;
pub mod slicer;
pub mod tiler;
pub mod types;
pub mod vertex;

#[cfg(test)]
mod testing;

pub use error::{SliceError, SliceResult};
pub use gpu::{SlicedSpriteRenderer, ViewUniform, create_sprite_texture};
pub use nine_slice::{NineSliceResult, window_slice_params};
pub use pipeline::{
    CoordinatePipeline, FragmentInput, SliceUniform, TextureSampler, TilingGuard, combine,
};
pub use quad::SpriteQuad;
pub use raster::{PanelTarget, rasterize, render_panel};
pub use remap::map;
pub use sampler::{AddressMode, FilterMode, ImageSampler, SamplerConfig};
pub use slicer::{Axis, Breakpoints, SliceParams, SliceStrategy, slice_axis_self, slice_axis_window};
pub use tiler::tile_texture;
pub use types::{AtlasRect, BorderQuad, RenderMode, TextureSize};
pub use vertex::{SliceVertex, VertexOutput, transform_vertex};
