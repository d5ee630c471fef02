//! The drawing surface: an immutable paint log replayed onto a raster.
//!
//! ```text
//!            pointer down               pointer move
//!   ┌──────┐ (not fill trigger) ┌──────────┐ ──┐
//!   │ Idle ├───────────────────►│ Dragging │   │ rebuild preview
//!   │      │◄───────────────────┤          │◄──┘
//!   └──┬───┘  pointer up: commit└──────────┘
//!      │      pointer cancel: discard
//!      │ fill trigger: flood fill, commit snapshot, stay Idle
//!      ▼
//! ```
//!
//! Every mutation ends in a full repaint: clear, replay the log in order,
//! then draw the preview on top.

use egui::{PointerButton, Pos2};

use crate::canvas::{RasterCanvas, RenderTarget};
use crate::error::SurfaceError;
use crate::export::ExportedImage;
use crate::fill::flood_fill;
use crate::input::{KeyCommand, SurfaceInput};
use crate::ops::{DrawOp, OpHistory};
use crate::pixel_buffer::PixelBuffer;
use crate::settings::{SettingsResult, ToolSettings};
use crate::shape::ShapeOp;

/// Where the surface is in a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceState {
    Idle,
    /// A shape is being dragged out from `anchor`
    Dragging { anchor: Pos2 },
}

/// Owns the paint log, redo stack, preview and the raster they are painted on.
#[derive(Debug)]
pub struct DrawingSurface<T: RenderTarget = RasterCanvas> {
    target: T,
    history: OpHistory,
    preview: Option<ShapeOp>,
    state: SurfaceState,
    settings: ToolSettings,
    /// Bumped on every repaint so hosts know when to re-upload the raster
    revision: u64,
}

impl DrawingSurface<RasterCanvas> {
    /// A blank software-rendered surface of `width` x `height` pixels
    pub fn new(width: usize, height: usize, settings: ToolSettings) -> Self {
        Self::with_target(RasterCanvas::new(width, height), settings)
    }
}

impl<T: RenderTarget> DrawingSurface<T> {
    pub fn with_target(target: T, settings: ToolSettings) -> Self {
        let mut surface = Self {
            target,
            history: OpHistory::new(),
            preview: None,
            state: SurfaceState::Idle,
            settings,
            revision: 0,
        };
        surface.repaint();
        surface
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn size(&self) -> [usize; 2] {
        self.target.size()
    }

    pub fn history(&self) -> &OpHistory {
        &self.history
    }

    pub fn ops(&self) -> &[DrawOp] {
        self.history.ops()
    }

    pub fn undone(&self) -> &[DrawOp] {
        self.history.undone()
    }

    pub fn preview(&self) -> Option<&ShapeOp> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SurfaceState::Dragging { .. })
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Direct access for UI controls that already keep values in range
    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: ToolSettings) -> SettingsResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Dispatch one host event
    pub fn handle_input(&mut self, input: SurfaceInput) {
        match input {
            SurfaceInput::PointerDown { pos, button } => self.pointer_down(pos, button),
            SurfaceInput::PointerMove { pos } => self.pointer_move(pos),
            SurfaceInput::PointerUp { pos, button } => self.pointer_up(pos, button),
            SurfaceInput::PointerCancel => self.pointer_cancel(),
            SurfaceInput::Key(KeyCommand::Undo) => {
                self.undo();
            }
            SurfaceInput::Key(KeyCommand::Redo) => {
                self.redo();
            }
            SurfaceInput::Key(KeyCommand::EraseAll) => self.erase_all(),
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, button: PointerButton) {
        if self.is_dragging() {
            log::debug!("Ignoring {:?} press at {:?} while dragging", button, pos);
            return;
        }

        if button == self.settings.fill_trigger.button() {
            self.fill_at(pos);
            return;
        }

        log::debug!("Idle -> Dragging from {:?}", pos);
        self.state = SurfaceState::Dragging { anchor: pos };
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let SurfaceState::Dragging { anchor } = self.state else {
            return;
        };
        self.preview = Some(self.shape_between(anchor, pos, false));
        self.repaint();
    }

    /// Finishes a drag. Any button other than primary commits a filled shape.
    pub fn pointer_up(&mut self, pos: Pos2, button: PointerButton) {
        let SurfaceState::Dragging { anchor } = self.state else {
            return;
        };
        self.state = SurfaceState::Idle;
        self.preview = None;

        let shape = self.shape_between(anchor, pos, button != PointerButton::Primary);
        if shape.is_degenerate() {
            log::debug!("Dropping zero-size {} at {:?}", shape.kind(), pos);
        } else {
            log::info!("Committed {} from {:?} to {:?}", shape.kind(), anchor, pos);
            self.history.commit(shape.into());
        }
        self.repaint();
    }

    /// Abandons the current drag without committing anything
    pub fn pointer_cancel(&mut self) {
        if !self.is_dragging() {
            return;
        }
        log::debug!("Drag cancelled");
        self.state = SurfaceState::Idle;
        self.preview = None;
        self.repaint();
    }

    /// Flood-fills at `pos` and commits the resulting raster.
    ///
    /// Returns false, leaving the log alone, when `pos` is off the surface.
    pub fn fill_at(&mut self, pos: Pos2) -> bool {
        let (x, y) = (pos.x.floor(), pos.y.floor());
        let [width, height] = self.target.size();
        let inside = x >= 0.0 && y >= 0.0 && (x as usize) < width && (y as usize) < height;
        if !inside {
            log::warn!("Fill at {:?} is outside the {}x{} surface", pos, width, height);
            return false;
        }

        let mut pixels = self.target.read_pixels();
        let written = flood_fill(
            &mut pixels,
            x as usize,
            y as usize,
            self.settings.fill_color,
            self.settings.fill_tolerance,
        );
        log::info!("Filled {} pixels from ({}, {})", written, x, y);

        self.history.commit(DrawOp::snapshot(pixels));
        self.repaint();
        true
    }

    /// Returns false if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        log::info!("Undo, {} ops left", self.history.ops().len());
        self.repaint();
        true
    }

    /// Returns false if there was nothing to redo
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        log::info!("Redo, {} ops in log", self.history.ops().len());
        self.repaint();
        true
    }

    pub fn erase_all(&mut self) {
        log::info!("Erasing {} ops", self.history.ops().len());
        self.history.clear();
        self.preview = None;
        self.state = SurfaceState::Idle;
        self.repaint();
    }

    /// Clears the target and replays the log, then the preview.
    pub fn repaint(&mut self) {
        self.target.clear();
        for op in self.history.ops() {
            op.render(&mut self.target, self.settings.ink_color);
        }
        if let Some(preview) = &self.preview {
            preview.draw(&mut self.target, self.settings.preview_color);
        }
        self.revision += 1;
    }

    /// Changes the raster size and replays the log at the new size.
    /// Returns false when the size is unchanged.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if self.target.size() == [width, height] {
            return false;
        }
        log::debug!("Resizing surface {:?} -> {:?}", self.target.size(), [width, height]);
        self.target.resize([width, height]);
        self.repaint();
        true
    }

    /// Copy of the visible raster
    pub fn pixels(&self) -> PixelBuffer {
        self.target.read_pixels()
    }

    /// True when nothing visible has been drawn
    pub fn is_blank(&self) -> bool {
        self.pixels().is_blank()
    }

    /// PNG of the visible raster on a white background
    pub fn export_png(&self) -> Result<ExportedImage, SurfaceError> {
        ExportedImage::encode(&self.pixels())
    }

    fn shape_between(&self, anchor: Pos2, pos: Pos2, filled: bool) -> ShapeOp {
        let kind = self.settings.shape;
        ShapeOp::new(kind, anchor, pos, filled && kind.can_fill(), self.settings.stroke_width)
            .with_grid_cells(self.settings.grid_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FillTrigger;
    use crate::shape::ShapeKind;
    use egui::pos2;

    fn surface() -> DrawingSurface {
        DrawingSurface::new(20, 20, ToolSettings::default())
    }

    #[test]
    fn test_drag_builds_preview_without_committing() {
        let mut surface = surface();
        surface.pointer_down(pos2(1.0, 1.0), PointerButton::Primary);
        surface.pointer_move(pos2(5.0, 5.0));

        assert_eq!(surface.state(), SurfaceState::Dragging { anchor: pos2(1.0, 1.0) });
        assert_eq!(surface.preview().map(|p| p.end()), Some(pos2(5.0, 5.0)));
        assert!(surface.ops().is_empty());
        assert!(!surface.is_blank());
    }

    #[test]
    fn test_moves_while_idle_are_ignored() {
        let mut surface = surface();
        let revision = surface.revision();
        surface.pointer_move(pos2(3.0, 3.0));
        surface.pointer_up(pos2(3.0, 3.0), PointerButton::Primary);

        assert_eq!(surface.revision(), revision);
        assert!(surface.preview().is_none());
    }

    #[test]
    fn test_secondary_release_commits_filled_shape() {
        let settings = ToolSettings {
            shape: ShapeKind::Rectangle,
            fill_trigger: FillTrigger::MiddleButton,
            ..Default::default()
        };
        let mut surface = DrawingSurface::new(20, 20, settings);

        surface.pointer_down(pos2(2.0, 2.0), PointerButton::Secondary);
        surface.pointer_up(pos2(8.0, 8.0), PointerButton::Secondary);

        match surface.ops() {
            [DrawOp::Shape(shape)] => assert!(shape.filled()),
            other => panic!("unexpected log {other:?}"),
        }
    }

    #[test]
    fn test_line_ignores_filled_button() {
        let settings = ToolSettings {
            fill_trigger: FillTrigger::MiddleButton,
            ..Default::default()
        };
        let mut surface = DrawingSurface::new(20, 20, settings);

        surface.pointer_down(pos2(2.0, 2.0), PointerButton::Secondary);
        surface.pointer_up(pos2(8.0, 8.0), PointerButton::Secondary);

        match surface.ops() {
            [DrawOp::Shape(shape)] => assert!(!shape.filled()),
            other => panic!("unexpected log {other:?}"),
        }
    }

    #[test]
    fn test_press_while_dragging_is_ignored() {
        let mut surface = surface();
        surface.pointer_down(pos2(1.0, 1.0), PointerButton::Primary);
        surface.pointer_down(pos2(4.0, 4.0), PointerButton::Secondary);

        assert_eq!(surface.state(), SurfaceState::Dragging { anchor: pos2(1.0, 1.0) });
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_fill_outside_is_rejected() {
        let mut surface = surface();
        assert!(!surface.fill_at(pos2(-0.5, 3.0)));
        assert!(!surface.fill_at(pos2(20.0, 3.0)));
        assert!(!surface.fill_at(pos2(f32::NAN, 3.0)));
        assert!(surface.ops().is_empty());
    }

    #[test]
    fn test_repaint_bumps_revision() {
        let mut surface = surface();
        let revision = surface.revision();
        surface.repaint();
        assert_eq!(surface.revision(), revision + 1);
    }

    #[test]
    fn test_set_settings_validates() {
        let mut surface = surface();
        let bad = ToolSettings {
            stroke_width: 0,
            ..Default::default()
        };
        assert!(surface.set_settings(bad).is_err());
        assert_eq!(surface.settings().stroke_width, 2);
    }

    /// Records calls instead of drawing
    #[derive(Debug, Default)]
    struct RecordingTarget {
        calls: Vec<String>,
    }

    impl RenderTarget for RecordingTarget {
        fn size(&self) -> [usize; 2] {
            [16, 16]
        }

        fn resize(&mut self, _size: [usize; 2]) {}

        fn clear(&mut self) {
            self.calls.push("clear".to_owned());
        }

        fn line_segment(&mut self, _points: [Pos2; 2], stroke: egui::Stroke) {
            self.calls.push(format!("line {:?}", stroke.color));
        }

        fn closed_path(&mut self, _points: &[Pos2], _paint: crate::canvas::Paint) {
            self.calls.push("path".to_owned());
        }

        fn rect(&mut self, _rect: egui::Rect, _paint: crate::canvas::Paint) {
            self.calls.push("rect".to_owned());
        }

        fn ellipse(&mut self, _center: Pos2, _radius: egui::Vec2, _paint: crate::canvas::Paint) {
            self.calls.push("ellipse".to_owned());
        }

        fn read_pixels(&self) -> PixelBuffer {
            PixelBuffer::new(16, 16)
        }

        fn write_pixels(&mut self, _buffer: &PixelBuffer) {
            self.calls.push("pixels".to_owned());
        }
    }

    #[test]
    fn test_repaint_replays_log_then_preview() {
        let mut surface = DrawingSurface::with_target(RecordingTarget::default(), ToolSettings::default());
        surface.pointer_down(pos2(1.0, 1.0), PointerButton::Primary);
        surface.pointer_up(pos2(5.0, 1.0), PointerButton::Primary);
        surface.fill_at(pos2(8.0, 8.0));
        surface.pointer_down(pos2(2.0, 2.0), PointerButton::Primary);
        surface.pointer_move(pos2(6.0, 6.0));

        surface.target.calls.clear();
        surface.repaint();

        let ink = ToolSettings::default().ink_color;
        let preview = ToolSettings::default().preview_color;
        assert_eq!(
            surface.target().calls,
            vec![
                "clear".to_owned(),
                format!("line {:?}", ink),
                "pixels".to_owned(),
                format!("line {:?}", preview),
            ]
        );
    }
}
