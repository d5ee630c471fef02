use crate::input::InputHandler;
use crate::panels::{central_panel, tools_panel};
use crate::settings::ToolSettings;
use crate::surface::DrawingSurface;
use crate::texture::SurfaceTexture;

/// Where the native build writes exported drawings
pub const EXPORT_PATH: &str = "sketch.png";

/// Surface size before the first frame reports the panel size
const INITIAL_SIZE: [usize; 2] = [800, 600];

/// The eframe host for one drawing surface.
///
/// Only the tool settings are persisted; the drawing starts blank on every launch.
#[derive(Debug)]
pub struct SketchApp {
    pub(crate) surface: DrawingSurface,
    pub(crate) input: InputHandler,
    pub(crate) texture: SurfaceTexture,
    /// Result of the last export, shown in the tools panel
    pub(crate) status: Option<String>,
}

impl Default for SketchApp {
    fn default() -> Self {
        Self::with_settings(ToolSettings::default())
    }
}

impl SketchApp {
    /// Called once before the first frame.
    ///
    /// `settings` overrides whatever was persisted from the last run.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Option<ToolSettings>) -> Self {
        let persisted = cc
            .storage
            .and_then(|storage| eframe::get_value::<ToolSettings>(storage, eframe::APP_KEY));

        let settings = settings
            .or(persisted)
            .filter(|settings| match settings.validate() {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("Ignoring stored tool settings: {}", err);
                    false
                }
            })
            .unwrap_or_default();

        Self::with_settings(settings)
    }

    pub fn with_settings(settings: ToolSettings) -> Self {
        let [width, height] = INITIAL_SIZE;
        Self {
            surface: DrawingSurface::new(width, height, settings),
            input: InputHandler::new(),
            texture: SurfaceTexture::new(),
            status: None,
        }
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut DrawingSurface {
        &mut self.surface
    }

    pub fn undo(&mut self) {
        self.surface.undo();
    }

    pub fn redo(&mut self) {
        self.surface.redo();
    }

    pub fn erase_all(&mut self) {
        self.surface.erase_all();
    }

    /// Encodes the visible drawing and hands it off.
    ///
    /// Native builds write [`EXPORT_PATH`]; the web build logs the data URL.
    pub fn export(&mut self) {
        if self.surface.is_blank() {
            log::warn!("Nothing to export, the surface is blank");
            self.status = Some("Nothing to export".to_owned());
            return;
        }

        let result = self.surface.export_png().and_then(|image| {
            #[cfg(not(target_arch = "wasm32"))]
            image.save(EXPORT_PATH)?;
            #[cfg(target_arch = "wasm32")]
            log::info!("Exported drawing: {}", image.to_data_url());
            Ok(image)
        });

        self.status = Some(match result {
            Ok(image) => format!("Exported {}x{} PNG", image.width(), image.height()),
            Err(err) => {
                log::error!("Export failed: {}", err);
                format!("Export failed: {err}")
            }
        });
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.surface.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
