//! Linear range remapping.

/// Maps `value` from `[min, max]` onto `[new_min, new_max]`.
///
/// `max` must differ from `min`. A zero-width source range yields NaN or
/// infinity; callers arrange their breakpoints so that never happens.
#[inline]
pub fn map(value: f32, min: f32, max: f32, new_min: f32, new_max: f32) -> f32 {
    (value - min) / (max - min) * (new_max - new_min) + new_min
}
