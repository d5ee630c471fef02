#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod error;
pub mod export;
pub mod fill;
pub mod input;
pub mod ops;
pub mod panels;
pub mod pixel_buffer;
pub mod settings;
pub mod shape;
pub mod surface;
pub mod texture;

pub use app::SketchApp;
pub use canvas::{Paint, RasterCanvas, RenderTarget};
pub use error::SurfaceError;
pub use export::ExportedImage;
pub use fill::flood_fill;
pub use input::{InputHandler, KeyCommand, SurfaceInput};
pub use ops::{DrawOp, OpHistory};
pub use pixel_buffer::PixelBuffer;
pub use settings::{FillTrigger, SettingsError, ToolSettings};
pub use shape::{ShapeKind, ShapeOp};
pub use surface::{DrawingSurface, SurfaceState};
