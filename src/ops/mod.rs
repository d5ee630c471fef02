mod history;

use std::sync::Arc;

use egui::Color32;

use crate::canvas::RenderTarget;
use crate::pixel_buffer::PixelBuffer;
use crate::shape::ShapeOp;

pub use history::OpHistory;

/// One committed entry of the paint log.
///
/// Entries are immutable. Undo and redo move them between stacks, they are
/// never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A vector shape from a completed drag
    Shape(ShapeOp),
    /// The whole raster right after a flood fill
    Snapshot(Arc<PixelBuffer>),
}

impl DrawOp {
    pub fn snapshot(buffer: PixelBuffer) -> Self {
        DrawOp::Snapshot(Arc::new(buffer))
    }

    /// Short name for logs and the history list
    pub fn label(&self) -> &'static str {
        match self {
            DrawOp::Shape(shape) => shape.kind().label(),
            DrawOp::Snapshot(_) => "Fill",
        }
    }

    /// Replays this op onto `target`. A snapshot replaces everything below it.
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T, color: Color32) {
        match self {
            DrawOp::Shape(shape) => shape.draw(target, color),
            DrawOp::Snapshot(buffer) => target.write_pixels(buffer),
        }
    }
}

impl From<ShapeOp> for DrawOp {
    fn from(shape: ShapeOp) -> Self {
        DrawOp::Shape(shape)
    }
}
