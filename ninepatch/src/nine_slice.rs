//! Window-relative slice parameters from pixel-space inputs.

use crate::error::{SliceError, SliceResult};
use crate::slicer::SliceParams;
use crate::types::{BorderQuad, TextureSize};

/// The result of fitting pixel borders onto a target quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NineSliceResult {
    /// Borders fit on both axes.
    Full(SliceParams),
    /// Target too small for the borders (size < near + far) on at least one
    /// axis; window borders on that axis were scaled down until they meet.
    Squeezed(SliceParams),
}

impl NineSliceResult {
    pub fn params(&self) -> SliceParams {
        match self {
            NineSliceResult::Full(p) | NineSliceResult::Squeezed(p) => *p,
        }
    }
}

/// Normalized window margins for one axis, and whether they were squeezed.
fn fit_axis(near: f32, far: f32, target: f32) -> ((f32, f32), bool) {
    let total = near + far;
    if total == 0.0 {
        ((0.0, 0.0), false)
    } else if total >= target {
        ((near / total, far / total), total > target)
    } else {
        ((near / target, far / target), false)
    }
}

/// Computes window-relative params for drawing a texture with pixel
/// `border` into a quad of `target_size` pixels.
///
/// Texture borders are `border / texture_size`, window borders are
/// `border / target_size`.
pub fn window_slice_params(
    target_size: (f32, f32),
    border: BorderQuad,
    texture_size: TextureSize,
) -> SliceResult<NineSliceResult> {
    if texture_size.is_empty() {
        return Err(SliceError::EmptyTexture {
            width: texture_size.width,
            height: texture_size.height,
        });
    }
    if !border.is_valid() {
        return Err(SliceError::NegativeBorder(border.to_array()));
    }

    let texture_border = border.normalized(texture_size.width as f32, texture_size.height as f32);

    let ((left, right), squeezed_x) = fit_axis(border.left, border.right, target_size.0);
    let ((top, bottom), squeezed_y) = fit_axis(border.top, border.bottom, target_size.1);
    let params = SliceParams::window_relative(
        texture_border,
        BorderQuad::new(left, top, right, bottom),
    );

    if squeezed_x || squeezed_y {
        log::warn!(
            "Target {}x{} is smaller than borders {:?}; squeezing window borders",
            target_size.0,
            target_size.1,
            border.to_array()
        );
        Ok(NineSliceResult::Squeezed(params))
    } else {
        Ok(NineSliceResult::Full(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slicer::SliceStrategy;
    use glam::Vec2;

    fn assert_border_approx(a: BorderQuad, b: BorderQuad) {
        for (x, y) in a.to_array().iter().zip(b.to_array()) {
            assert!((x - y).abs() < 1e-6, "left: {:?}, right: {:?}", a, b);
        }
    }

    #[test]
    fn test_normal_window_slice() {
        let result = window_slice_params(
            (200.0, 100.0),            // target
            BorderQuad::uniform(10.0), // border
            TextureSize::new(100, 50), // texture size
        )
        .unwrap();

        if let NineSliceResult::Full(params) = result {
            assert_border_approx(params.border, BorderQuad::new(0.1, 0.2, 0.1, 0.2));
            assert_border_approx(params.window_border, BorderQuad::new(0.05, 0.1, 0.05, 0.1));
        } else {
            panic!("Expected Full 9-slice");
        }
    }

    #[test]
    fn test_degenerate_squeezes() {
        let result = window_slice_params(
            (10.0, 100.0),
            BorderQuad::new(20.0, 10.0, 5.0, 10.0), // horizontal borders bigger than size
            TextureSize::new(64, 64),
        )
        .unwrap();
        let NineSliceResult::Squeezed(params) = result else {
            panic!("Expected Squeezed");
        };
        // 20:5 split of the full width; vertical axis untouched.
        assert_border_approx(params.window_border, BorderQuad::new(0.8, 0.1, 0.2, 0.1));
    }

    #[test]
    fn test_exact_fit_is_not_squeezed() {
        let result = window_slice_params((20.0, 20.0), BorderQuad::uniform(10.0), TextureSize::new(64, 64)).unwrap();
        assert!(matches!(result, NineSliceResult::Full(_)));
        assert_border_approx(result.params().window_border, BorderQuad::uniform(0.5));
    }

    #[test]
    fn test_zero_border() {
        let result = window_slice_params((100.0, 100.0), BorderQuad::ZERO, TextureSize::new(64, 64)).unwrap();
        let params = result.params();
        assert!(params.border.is_zero());
        assert!(params.window_border.is_zero());
        assert!(SliceStrategy::WindowRelative.is_passthrough(&params));
    }

    #[test]
    fn test_zero_target_stays_finite() {
        let result = window_slice_params((0.0, 0.0), BorderQuad::uniform(4.0), TextureSize::new(16, 16)).unwrap();
        assert!(matches!(result, NineSliceResult::Squeezed(_)));
        assert!(result.params().window_border.is_valid());
    }

    #[test]
    fn test_empty_texture_rejected() {
        let result = window_slice_params((10.0, 10.0), BorderQuad::uniform(1.0), TextureSize::new(0, 10));
        assert!(matches!(result, Err(SliceError::EmptyTexture { .. })));
    }

    #[test]
    fn test_corners_keep_native_scale() {
        // 32px texture, 8px borders, drawn at 128px: one target pixel inside
        // the border advances one texture pixel.
        let params = window_slice_params((128.0, 128.0), BorderQuad::uniform(8.0), TextureSize::new(32, 32))
            .unwrap()
            .params();
        let a = SliceStrategy::WindowRelative.slice(Vec2::new(2.0 / 128.0, 0.5), &params);
        let b = SliceStrategy::WindowRelative.slice(Vec2::new(3.0 / 128.0, 0.5), &params);
        assert!(((b.x - a.x) * 32.0 - 1.0).abs() < 1e-4);
    }
}
