use thiserror::Error;

/// Errors raised at the edges of the drawing surface.
///
/// Drawing operations themselves never fail, degenerate input simply draws
/// nothing. These cover raw buffer construction and snapshot export.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Raw pixel data does not have `width * height * 4` bytes
    #[error("pixel buffer of {width}x{height} cannot hold {len} bytes")]
    BufferSize {
        width: usize,
        height: usize,
        len: usize,
    },

    /// The PNG encoder rejected the raster
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] image::ImageError),

    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
}
