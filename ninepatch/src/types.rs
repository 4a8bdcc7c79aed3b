//! Plain data bound to a sliced draw: borders, texture size, render mode.

use serde::{Deserialize, Serialize};

/// Per-edge slice margins in `(left, top, right, bottom)` order.
///
/// Units depend on the slicing strategy: texture pixels for
/// [`SliceStrategy::SelfRelative`](crate::SliceStrategy::SelfRelative),
/// normalized fractions for the window-relative borders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderQuad {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BorderQuad {
    pub const ZERO: Self = Self {
        left: 0.0,
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
    };

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same margin on all four edges.
    pub const fn uniform(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    /// All four margins zero: plain stretch, slicing is skipped.
    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }

    pub fn is_valid(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite() && *v >= 0.0)
    }

    /// `(left, right)`: the near/far margins of the x axis.
    pub fn horizontal(&self) -> (f32, f32) {
        (self.left, self.right)
    }

    /// `(top, bottom)`: the near/far margins of the y axis.
    pub fn vertical(&self) -> (f32, f32) {
        (self.top, self.bottom)
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    /// Divides horizontal margins by `x` and vertical margins by `y`.
    pub fn normalized(&self, x: f32, y: f32) -> Self {
        Self::new(self.left / x, self.top / y, self.right / x, self.bottom / y)
    }
}

impl From<[f32; 4]> for BorderQuad {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Pixel dimensions of the bound texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_vec2(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32, self.height as f32)
    }
}

/// A sub-rectangle of an atlas texture, in whole texels.
///
/// Slicing and tiling run in the rect's own `[0,1]` space; the final sample
/// coordinate is then mapped into the rect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> TextureSize {
        TextureSize::new(self.width, self.height)
    }

    /// Non-empty and fully inside a texture of `texture_size`.
    pub fn fits(&self, texture_size: TextureSize) -> bool {
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        !self.size().is_empty()
            && right <= u64::from(texture_size.width)
            && bottom <= u64::from(texture_size.height)
    }

    /// Maps a coordinate in the rect's `[0,1]` space to whole-texture space.
    pub fn to_texture(&self, coord: glam::Vec2, texture_size: TextureSize) -> glam::Vec2 {
        let min = glam::Vec2::new(self.x as f32, self.y as f32);
        (min + coord * self.size().as_vec2()) / texture_size.as_vec2()
    }

    /// `[x, y, width, height]` as floats, the uniform layout.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x as f32, self.y as f32, self.width as f32, self.height as f32]
    }
}

impl From<[u32; 4]> for AtlasRect {
    fn from(v: [u32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// How the sampled texel combines with the vertex tint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Sampled color multiplied by the tint.
    #[default]
    TexturedQuad,
    /// Tint only; the sample is discarded.
    SolidColor,
}

impl RenderMode {
    /// Decodes the per-vertex tag: 0 is textured, anything else is solid.
    pub fn from_tag(tag: u32) -> Self {
        if tag == 0 {
            RenderMode::TexturedQuad
        } else {
            RenderMode::SolidColor
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            RenderMode::TexturedQuad => 0,
            RenderMode::SolidColor => 1,
        }
    }
}
