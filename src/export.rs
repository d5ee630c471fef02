use std::io::Cursor;
use std::path::Path;

use base64::Engine as _;
use egui::Color32;

use crate::error::SurfaceError;
use crate::pixel_buffer::PixelBuffer;

/// PNG of the visible raster, ready to hand to whatever sends it on.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportedImage {
    width: usize,
    height: usize,
    png: Vec<u8>,
}

impl std::fmt::Debug for ExportedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_len", &self.png.len())
            .finish()
    }
}

impl ExportedImage {
    /// Encodes `pixels` composited over opaque white, so transparent areas
    /// come out as paper rather than black.
    pub fn encode(pixels: &PixelBuffer) -> Result<Self, SurfaceError> {
        let flat = pixels.flattened_onto(Color32::WHITE);
        let (width, height) = (flat.width(), flat.height());
        let len = flat.as_raw().len();
        let rgba = image::RgbaImage::from_raw(width as u32, height as u32, flat.into_raw())
            .ok_or(SurfaceError::BufferSize { width, height, len })?;

        let mut png = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
        log::debug!("Encoded {}x{} snapshot into {} PNG bytes", width, height, png.len());

        Ok(Self { width, height, png })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// Standard base64 of the PNG bytes
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.png)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        std::fs::write(path.as_ref(), &self.png)?;
        log::info!("Saved snapshot to {}", path.as_ref().display());
        Ok(())
    }
}
