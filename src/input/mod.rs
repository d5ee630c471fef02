use egui::{Context, Event, Key, Modifiers, PointerButton, Pos2, Rect, TouchPhase};

/// Keyboard commands understood by the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
    EraseAll,
}

/// Host input, already translated into surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceInput {
    /// A button was pressed over the surface
    PointerDown { pos: Pos2, button: PointerButton },
    /// The pointer moved, with or without a button held
    PointerMove { pos: Pos2 },
    /// A button was released
    PointerUp { pos: Pos2, button: PointerButton },
    /// The gesture was interrupted (touch cancel, Escape)
    PointerCancel,
    Key(KeyCommand),
}

/// Converts raw egui input into [`SurfaceInput`] events.
///
/// Presses only count when they land on the canvas; moves and releases are
/// forwarded wherever they happen so a drag that leaves the canvas still
/// finishes. Surface coordinates are physical pixels relative to the
/// canvas' top-left corner.
#[derive(Debug)]
pub struct InputHandler {
    canvas_rect: Option<Rect>,
    pixels_per_point: f32,
    last_pointer_pos: Option<Pos2>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            canvas_rect: None,
            pixels_per_point: 1.0,
            last_pointer_pos: None,
        }
    }

    /// Update where the canvas is on the screen and the display scale
    pub fn set_canvas_rect(&mut self, rect: Rect, pixels_per_point: f32) {
        self.canvas_rect = Some(rect);
        self.pixels_per_point = pixels_per_point;
    }

    /// Screen position to surface coordinates
    pub fn to_surface(&self, pos: Pos2) -> Option<Pos2> {
        let rect = self.canvas_rect?;
        Some(((pos - rect.min) * self.pixels_per_point).to_pos2())
    }

    fn on_canvas(&self, pos: Pos2) -> bool {
        self.canvas_rect.is_some_and(|rect| rect.contains(pos))
    }

    /// Translate one raw egui event. Returns `None` for anything the surface
    /// does not care about.
    pub fn translate(&mut self, event: &Event) -> Option<SurfaceInput> {
        match event {
            Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } => {
                if !self.on_canvas(*pos) {
                    return None;
                }
                Some(SurfaceInput::PointerDown {
                    pos: self.to_surface(*pos)?,
                    button: *button,
                })
            }
            Event::PointerButton {
                pos,
                button,
                pressed: false,
                ..
            } => Some(SurfaceInput::PointerUp {
                pos: self.to_surface(*pos)?,
                button: *button,
            }),
            Event::PointerMoved(pos) => {
                if self.last_pointer_pos == Some(*pos) {
                    return None;
                }
                self.last_pointer_pos = Some(*pos);
                Some(SurfaceInput::PointerMove {
                    pos: self.to_surface(*pos)?,
                })
            }
            Event::Touch {
                phase: TouchPhase::Cancel,
                ..
            } => Some(SurfaceInput::PointerCancel),
            _ => None,
        }
    }

    /// Process this frame's egui input and keyboard shortcuts
    pub fn process_input(&mut self, ctx: &Context) -> Vec<SurfaceInput> {
        let raw_events = ctx.input(|input| input.events.clone());
        let mut events: Vec<SurfaceInput> = raw_events.iter().filter_map(|event| self.translate(event)).collect();

        // Leave shortcuts alone while a text field has focus
        if !ctx.wants_keyboard_input() {
            ctx.input_mut(|input| {
                if input.consume_key(Modifiers::COMMAND, Key::Z) {
                    events.push(SurfaceInput::Key(KeyCommand::Undo));
                }
                if input.consume_key(Modifiers::COMMAND, Key::Y) {
                    events.push(SurfaceInput::Key(KeyCommand::Redo));
                }
                if input.consume_key(Modifiers::NONE, Key::Escape) {
                    events.push(SurfaceInput::PointerCancel);
                }
            });
        }

        events
    }
}
