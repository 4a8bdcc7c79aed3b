use thiserror::Error;

/// Errors raised when a draw is configured, never per fragment.
#[derive(Error, Debug)]
pub enum SliceError {
    #[error("Border components must be finite and non-negative, got {0:?}")]
    NegativeBorder([f32; 4]),
    #[error("Tiling factor must be finite and non-negative, got {0:?}")]
    InvalidTiling([f32; 2]),
    #[error("Texture has no pixels ({width}x{height})")]
    EmptyTexture { width: u32, height: u32 },
    #[error("Atlas rect {rect:?} is empty or outside the {width}x{height} texture")]
    AtlasRectOutOfBounds {
        rect: [u32; 4],
        width: u32,
        height: u32,
    },
    #[error("Render target has no pixels ({width}x{height})")]
    EmptyTarget { width: u32, height: u32 },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type SliceResult<T> = Result<T, SliceError>;
