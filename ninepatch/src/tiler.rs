//! Repeating the border-free interior.

/// GPU-style fractional part, `x - floor(x)`.
#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Wraps `coord` into `factor` repeats when it lies in
/// `[border_min, border_max]`; border zones pass through unchanged.
///
/// A zero `factor` collapses the interior to 0, so callers skip tiling on
/// that axis instead of calling this.
pub fn tile_texture(coord: f32, border_min: f32, border_max: f32, factor: f32) -> f32 {
    if coord >= border_min && coord <= border_max {
        fract(coord * factor)
    } else {
        coord
    }
}
