use egui::{Context, TextureHandle, TextureId, TextureOptions};

use crate::pixel_buffer::PixelBuffer;

/// GPU copy of a surface raster, re-uploaded only when the surface repaints
#[derive(Default)]
pub struct SurfaceTexture {
    handle: Option<TextureHandle>,
    /// Surface revision the texture was last uploaded from
    revision: Option<u64>,
    uploads: usize,
}

impl SurfaceTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a texture holding `pixels`, uploading them if `revision` changed.
    ///
    /// `pixels` is only called on upload so hosts can pass a lazy read.
    pub fn update<F>(&mut self, ctx: &Context, revision: u64, pixels: F) -> TextureId
    where
        F: FnOnce() -> PixelBuffer,
    {
        if self.revision != Some(revision) || self.handle.is_none() {
            let image = pixels().to_color_image();
            match &mut self.handle {
                Some(handle) => handle.set(image, TextureOptions::NEAREST),
                None => {
                    self.handle = Some(ctx.load_texture("drawing_surface", image, TextureOptions::NEAREST));
                }
            }
            self.revision = Some(revision);
            self.uploads += 1;
        }

        match &self.handle {
            Some(handle) => handle.id(),
            None => TextureId::default(),
        }
    }

    /// Number of uploads so far
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Drops the GPU copy, the next update re-uploads
    pub fn clear(&mut self) {
        self.handle = None;
        self.revision = None;
    }
}

impl std::fmt::Debug for SurfaceTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceTexture")
            .field("revision", &self.revision)
            .field("uploads", &self.uploads)
            .finish()
    }
}
