use egui::{Color32, Rect, pos2};

use crate::SketchApp;

/// The drawing area: keeps the surface sized to the panel, feeds it input
/// and shows its raster.
pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::WHITE))
        .show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;

            // The surface works in physical pixels so the texture maps 1:1
            let pixels_per_point = ctx.pixels_per_point();
            let width = (rect.width() * pixels_per_point).round().max(1.0) as usize;
            let height = (rect.height() * pixels_per_point).round().max(1.0) as usize;
            app.surface.resize(width, height);
            app.input.set_canvas_rect(rect, pixels_per_point);

            for input in app.input.process_input(ctx) {
                app.surface.handle_input(input);
            }

            if app.surface.is_dragging() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }

            let surface = &app.surface;
            let texture = app
                .texture
                .update(ctx, surface.revision(), || surface.pixels());
            painter.image(
                texture,
                rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        });
}
