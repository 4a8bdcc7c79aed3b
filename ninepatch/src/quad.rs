//! Sprite quad geometry.
//!
//! Produces the six vertices (two triangles) of a sliced sprite. Slicing
//! works on the quad's raw UVs, so they always span `[0,1]`; an atlas rect
//! only sets the default quad size; the pipeline maps samples into it.

use glam::{Mat4, Vec2, Vec4};

use crate::types::{AtlasRect, RenderMode, TextureSize};
use crate::vertex::SliceVertex;

/// Triangle indices into the four corners: bottom-left then top-right.
const QUAD_INDICES: [usize; 6] = [0, 2, 3, 0, 1, 2];

/// Corner offsets around the quad center.
const QUAD_VERTEX_POSITIONS: [Vec2; 4] = [
    Vec2::new(-0.5, -0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.5, 0.5),
    Vec2::new(-0.5, 0.5),
];

/// Corner UVs; v grows downward in the texture while y grows upward.
const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 0.0),
];

/// A tinted, optionally flipped sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    pub color: Vec4,
    pub mode: RenderMode,
    /// Overrides the texture's pixel size as the quad size.
    pub custom_size: Option<Vec2>,
    /// Atlas region drawn by this sprite; its size is the default quad size.
    pub rect: Option<AtlasRect>,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Pivot relative to the quad center, in quad-size units.
    pub anchor: Vec2,
}

impl Default for SpriteQuad {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            mode: RenderMode::TexturedQuad,
            custom_size: None,
            rect: None,
            flip_x: false,
            flip_y: false,
            anchor: Vec2::ZERO,
        }
    }
}

impl SpriteQuad {
    /// A quad covering all of clip space under an identity transform.
    pub fn fullscreen(color: Vec4, mode: RenderMode) -> Self {
        Self {
            color,
            mode,
            custom_size: Some(Vec2::splat(2.0)),
            ..Default::default()
        }
    }

    /// Builds the triangle-list vertices for this sprite.
    pub fn vertices(&self, transform: Mat4, texture_size: TextureSize) -> [SliceVertex; 6] {
        let mut uvs = QUAD_UVS;
        if self.flip_x {
            uvs = [uvs[1], uvs[0], uvs[3], uvs[2]];
        }
        if self.flip_y {
            uvs = [uvs[3], uvs[2], uvs[1], uvs[0]];
        }

        let size = self
            .custom_size
            .or_else(|| self.rect.map(|rect| rect.size().as_vec2()))
            .unwrap_or_else(|| texture_size.as_vec2());
        let positions = QUAD_VERTEX_POSITIONS
            .map(|corner| transform.transform_point3(((corner - self.anchor) * size).extend(0.0)));

        let color = self.color.to_array();
        let mode = self.mode.tag();
        QUAD_INDICES.map(|i| SliceVertex {
            position: positions[i].to_array(),
            uv: uvs[i].to_array(),
            color,
            mode,
        })
    }
}
