use egui::{Color32, ColorImage};

use crate::error::SurfaceError;

/// Bytes per pixel: red, green, blue, alpha.
pub const CHANNELS: usize = 4;

/// Row-major RGBA8 raster, `width * height * 4` bytes.
///
/// Channels are stored as unmultiplied sRGBA, the layout PNG and
/// [`ColorImage::from_rgba_unmultiplied`] expect. [`Color32`] is premultiplied,
/// so colours are converted on the way in and out.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

// Dumping every byte of a raster is never useful
impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color32::TRANSPARENT)
    }

    pub fn filled(width: usize, height: usize, color: Color32) -> Self {
        let data = color.to_srgba_unmultiplied().repeat(width * height);
        Self { width, height, data }
    }

    /// Wrap raw RGBA bytes. The length must be exactly `width * height * 4`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, SurfaceError> {
        if data.len() != width * height * CHANNELS {
            return Err(SurfaceError::BufferSize {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Byte offset of the first channel of pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * CHANNELS
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color32> {
        if !self.contains(x, y) {
            return None;
        }
        let o = self.offset(x, y);
        let p = &self.data[o..o + CHANNELS];
        Some(Color32::from_rgba_unmultiplied(p[0], p[1], p[2], p[3]))
    }

    /// Writes one pixel. Out-of-bounds writes are dropped.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: Color32) {
        self.put(x, y, color.to_srgba_unmultiplied());
    }

    /// Writes one pixel from bytes already in storage layout.
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if self.contains(x, y) {
            let o = self.offset(x, y);
            self.data[o..o + CHANNELS].copy_from_slice(&rgba);
        }
    }

    pub fn fill(&mut self, color: Color32) {
        let rgba = color.to_srgba_unmultiplied();
        for pixel in self.data.chunks_exact_mut(CHANNELS) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// True when every channel of every pixel is zero.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Copies the overlapping top-left region of `src` into `self`.
    /// Pixels of `self` outside `src` are left alone.
    pub fn blit_from(&mut self, src: &PixelBuffer) {
        let cols = self.width.min(src.width);
        let rows = self.height.min(src.height);
        let row_bytes = cols * CHANNELS;
        for y in 0..rows {
            let dst = self.offset(0, y);
            let from = src.offset(0, y);
            self.data[dst..dst + row_bytes].copy_from_slice(&src.data[from..from + row_bytes]);
        }
    }

    /// Source-over composite onto an opaque background colour.
    pub fn flattened_onto(&self, background: Color32) -> PixelBuffer {
        let bg = background.to_srgba_unmultiplied();
        let mut out = self.clone();
        for pixel in out.data.chunks_exact_mut(CHANNELS) {
            let alpha = pixel[3] as u16;
            for c in 0..3 {
                let src = pixel[c] as u16 * alpha;
                let dst = bg[c] as u16 * (255 - alpha);
                pixel[c] = ((src + dst + 127) / 255) as u8;
            }
            pixel[3] = 255;
        }
        out
    }

    /// Upload-ready copy for egui textures.
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(self.size(), &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, SurfaceError::BufferSize { width: 2, height: 2, len: 15 }));
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn test_opaque_colours_are_stored_as_is() {
        let mut buffer = PixelBuffer::new(3, 2);
        let teal = Color32::from_rgb(0, 128, 128);
        buffer.set(2, 1, teal);

        assert_eq!(buffer.get(2, 1), Some(teal));
        assert_eq!(&buffer.as_raw()[buffer.offset(2, 1)..][..4], &[0, 128, 128, 255]);
        assert_eq!(buffer.get(3, 1), None);
    }

    #[test]
    fn test_translucent_colours_are_stored_unmultiplied() {
        let mut buffer = PixelBuffer::new(1, 1);
        buffer.set(0, 0, Color32::from_rgba_unmultiplied(255, 0, 0, 128));

        let raw = &buffer.as_raw()[..4];
        assert!(raw[0] >= 250, "red was darkened to {}", raw[0]);
        assert_eq!(raw[3], 128);

        // half red over white is pink, not dark red
        let flat = buffer.flattened_onto(Color32::WHITE);
        let pixel = &flat.as_raw()[..4];
        assert!(pixel[0] >= 250);
        assert!((120..=135).contains(&pixel[1]), "green is {}", pixel[1]);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn test_out_of_bounds_set_is_dropped() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.set(5, 5, Color32::RED);
        assert!(buffer.is_blank());
    }

    #[test]
    fn test_blit_copies_overlap_only() {
        let src = PixelBuffer::filled(2, 3, Color32::BLACK);
        let mut dst = PixelBuffer::new(3, 2);
        dst.blit_from(&src);

        assert_eq!(dst.get(0, 0), Some(Color32::BLACK));
        assert_eq!(dst.get(1, 1), Some(Color32::BLACK));
        assert_eq!(dst.get(2, 0), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_flatten_onto_white() {
        let mut buffer = PixelBuffer::new(2, 1);
        buffer.set(0, 0, Color32::BLACK);
        let flat = buffer.flattened_onto(Color32::WHITE);

        assert_eq!(flat.get(0, 0), Some(Color32::BLACK));
        assert_eq!(flat.get(1, 0), Some(Color32::WHITE));
    }
}
