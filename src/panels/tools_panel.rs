use egui::{ComboBox, Slider};

use crate::SketchApp;
use crate::settings::{FillTrigger, MAX_GRID_CELLS, MIN_GRID_CELLS};
use crate::shape::ShapeKind;

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Shapes");

            let settings = app.surface.settings_mut();
            for kind in ShapeKind::ALL {
                if ui.selectable_label(settings.shape == kind, kind.label()).clicked() {
                    log::info!("Shape selected from UI: {}", kind);
                    settings.shape = kind;
                }
            }

            ui.separator();
            ui.add(Slider::new(&mut settings.stroke_width, 1..=50).text("Stroke width"));
            if settings.shape == ShapeKind::GridMatrix {
                ui.add(Slider::new(&mut settings.grid_cells, MIN_GRID_CELLS..=MAX_GRID_CELLS).text("Grid cells"));
            }

            ui.separator();
            ui.heading("Fill");
            ui.add(Slider::new(&mut settings.fill_tolerance, 0..=255).text("Tolerance"));
            ComboBox::from_label("Fill with")
                .selected_text(settings.fill_trigger.label())
                .show_ui(ui, |ui| {
                    for trigger in [FillTrigger::SecondaryButton, FillTrigger::MiddleButton] {
                        ui.selectable_value(&mut settings.fill_trigger, trigger, trigger.label());
                    }
                });
            ui.horizontal(|ui| {
                ui.label("Colour");
                ui.color_edit_button_srgba(&mut settings.fill_color);
            });

            ui.separator();

            ui.horizontal(|ui| {
                let history = app.surface.history();
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
                if ui.button("Erase all").clicked() {
                    app.erase_all();
                }
            });

            if ui.button("Export PNG").clicked() {
                app.export();
            }
            if let Some(status) = &app.status {
                ui.label(status);
            }

            ui.separator();

            let history = app.surface.history();
            ui.horizontal(|ui| {
                ui.label(format!("Ops: {}", history.ops().len()));
                ui.label(format!("Undone: {}", history.undone().len()));
            });

            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::Grid::new("op_history_grid")
                    .num_columns(2)
                    .spacing([40.0, 4.0])
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Log");
                        ui.strong("Undone");
                        ui.end_row();

                        let ops = history.ops();
                        let undone = history.undone();
                        for i in 0..ops.len().max(undone.len()) {
                            ui.label(ops.get(i).map_or("", |op| op.label()));
                            ui.label(undone.get(i).map_or("", |op| op.label()));
                            ui.end_row();
                        }
                    });
            });
        });
}
