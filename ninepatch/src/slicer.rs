//! Per-axis piecewise slicing.
//!
//! Each axis of the `[0,1]` coordinate space is split into a near zone, a
//! middle zone and a far zone by two breakpoints. Near and far zones are the
//! texture's borders; the middle zone is the interior that stretches.
//!
//! Two strategies exist and they are intentionally kept apart:
//!
//! - [`SliceStrategy::SelfRelative`] derives both breakpoints from the
//!   texture's own pixel size, so the destination zones coincide with the
//!   source zones and only the interpolation inside them changes.
//! - [`SliceStrategy::WindowRelative`] takes separate source (texture) and
//!   destination (window) breakpoints, which is the general 9-slice case for
//!   quads whose size differs from the texture.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::remap::map;
use crate::types::{BorderQuad, TextureSize};

/// One of the two coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Lower and upper breakpoint of one axis, both in `[0,1]` space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoints {
    pub low: f32,
    pub high: f32,
}

impl Breakpoints {
    pub const FULL: Self = Self {
        low: 0.0,
        high: 1.0,
    };

    /// Breakpoints from normalized near/far margins.
    pub fn from_margins(near: f32, far: f32) -> Self {
        Self {
            low: near,
            high: 1.0 - far,
        }
    }
}

/// Selects which slicing transform a draw uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliceStrategy {
    /// Borders in texture pixels, breakpoints normalized by the texture size.
    #[default]
    SelfRelative,
    /// Normalized texture borders mapped onto normalized window borders.
    WindowRelative,
}

/// Everything either strategy reads.
///
/// `border` is in texture pixels for [`SliceStrategy::SelfRelative`] and in
/// normalized texture space for [`SliceStrategy::WindowRelative`].
/// `window_border` is only read by the window-relative strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SliceParams {
    pub border: BorderQuad,
    #[serde(default)]
    pub window_border: BorderQuad,
    #[serde(default)]
    pub texture_size: TextureSize,
}

impl SliceParams {
    /// Pixel borders on a texture of known size.
    pub fn self_relative(border: BorderQuad, texture_size: TextureSize) -> Self {
        Self {
            border,
            window_border: BorderQuad::ZERO,
            texture_size,
        }
    }

    /// Normalized texture and window borders.
    pub fn window_relative(texture_border: BorderQuad, window_border: BorderQuad) -> Self {
        Self {
            border: texture_border,
            window_border,
            texture_size: TextureSize::default(),
        }
    }
}

impl SliceStrategy {
    /// Remaps a coordinate on both axes.
    pub fn slice(self, uv: Vec2, params: &SliceParams) -> Vec2 {
        Vec2::new(
            self.slice_axis(uv.x, Axis::X, params),
            self.slice_axis(uv.y, Axis::Y, params),
        )
    }

    /// Remaps one component of a coordinate.
    pub fn slice_axis(self, coord: f32, axis: Axis, params: &SliceParams) -> f32 {
        match self {
            SliceStrategy::SelfRelative => {
                let (border_min, border_max) = axis_margins(&params.border, axis);
                slice_axis_self(coord, border_min, border_max, axis_size(params, axis))
            }
            SliceStrategy::WindowRelative => {
                let tx = self.source_breakpoints(axis, params);
                let (win_near, win_far) = axis_margins(&params.window_border, axis);
                let win = Breakpoints::from_margins(win_near, win_far);
                slice_axis_window(coord, tx.low, tx.high, win.low, win.high)
            }
        }
    }

    /// Whether these params make slicing an identity that can be skipped.
    pub fn is_passthrough(self, params: &SliceParams) -> bool {
        match self {
            SliceStrategy::SelfRelative => params.border.is_zero(),
            SliceStrategy::WindowRelative => {
                params.border.is_zero() && params.window_border.is_zero()
            }
        }
    }

    /// Breakpoints in the space the sliced coordinate lives in (texture space).
    ///
    /// These bound the border-free interior used for tiling.
    pub fn source_breakpoints(self, axis: Axis, params: &SliceParams) -> Breakpoints {
        let (near, far) = axis_margins(&params.border, axis);
        match self {
            SliceStrategy::SelfRelative => {
                let size = axis_size(params, axis);
                Breakpoints {
                    low: near / size,
                    high: (size - far) / size,
                }
            }
            SliceStrategy::WindowRelative => Breakpoints::from_margins(near, far),
        }
    }
}

fn axis_size(params: &SliceParams, axis: Axis) -> f32 {
    match axis {
        Axis::X => params.texture_size.width as f32,
        Axis::Y => params.texture_size.height as f32,
    }
}

fn axis_margins(border: &BorderQuad, axis: Axis) -> (f32, f32) {
    match axis {
        Axis::X => border.horizontal(),
        Axis::Y => border.vertical(),
    }
}

/// Slice-to-self transform of one axis.
///
/// `border_min`/`border_max` are pixel offsets from the two edges and
/// `axis_size` is the texture's pixel size on this axis. `low == 0` makes the
/// near branch unreachable for `coord >= 0`; an all-zero border is expected
/// to skip this function entirely.
pub fn slice_axis_self(coord: f32, border_min: f32, border_max: f32, axis_size: f32) -> f32 {
    let low = border_min / axis_size;
    let high = (axis_size - border_max) / axis_size;

    if coord < low {
        coord / low
    } else if coord < high {
        map(coord, 0.0, 1.0, low, high)
    } else {
        map(coord, 0.0, 1.0, high, 1.0)
    }
}

/// Slice-to-window transform of one axis.
///
/// `tx_*` are the source breakpoints in texture space, `win_*` where the
/// borders end on the rendered quad. Zones of zero width are never entered,
/// including at `coord == 1` when the far window zone is empty.
pub fn slice_axis_window(
    coord: f32,
    tx_border_min: f32,
    tx_border_max: f32,
    win_border_min: f32,
    win_border_max: f32,
) -> f32 {
    let near = |c| map(c, 0.0, win_border_min, 0.0, tx_border_min);
    let middle = |c| map(c, win_border_min, win_border_max, tx_border_min, tx_border_max);

    if coord < win_border_min {
        near(coord)
    } else if coord < win_border_max {
        middle(coord)
    } else if win_border_max < 1.0 {
        map(coord, win_border_max, 1.0, tx_border_max, 1.0)
    } else if win_border_max > win_border_min {
        middle(coord)
    } else {
        near(coord)
    }
}
