use std::fs;
use std::path::Path;

use egui::{Color32, PointerButton};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::ShapeKind;

/// Range of cells per side a grid may have, shared by validation and the UI
pub const MIN_GRID_CELLS: u32 = 2;
pub const MAX_GRID_CELLS: u32 = 10;

/// Errors from validating, loading or saving tool settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("stroke width must be at least 1, got {0}")]
    InvalidStrokeWidth(u32),

    #[error("grid cells must be between {min} and {max}, got {0}", min = MIN_GRID_CELLS, max = MAX_GRID_CELLS)]
    InvalidGridCells(u32),

    #[error("unknown shape kind: {0:?}")]
    UnknownShape(String),

    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Which pointer button performs a flood fill instead of starting a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillTrigger {
    #[default]
    SecondaryButton,
    MiddleButton,
}

impl FillTrigger {
    pub fn button(&self) -> PointerButton {
        match self {
            FillTrigger::SecondaryButton => PointerButton::Secondary,
            FillTrigger::MiddleButton => PointerButton::Middle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FillTrigger::SecondaryButton => "Right click",
            FillTrigger::MiddleButton => "Middle click",
        }
    }
}

/// Tool configuration for a drawing surface.
///
/// Only these settings survive a restart; the drawing itself is never saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old settings
pub struct ToolSettings {
    pub shape: ShapeKind,
    pub stroke_width: u32,
    /// Cells per side of the grid shape
    pub grid_cells: u32,
    pub fill_color: Color32,
    /// Per-channel tolerance of the fill, 0 means exact match
    pub fill_tolerance: u8,
    pub fill_trigger: FillTrigger,
    /// Colour of committed shapes
    pub ink_color: Color32,
    /// Colour of the shape being dragged
    pub preview_color: Color32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Line,
            stroke_width: 2,
            grid_cells: 3,
            fill_color: Color32::BLACK,
            fill_tolerance: 180,
            fill_trigger: FillTrigger::SecondaryButton,
            ink_color: Color32::BLACK,
            preview_color: Color32::from_gray(0x99),
        }
    }
}

impl ToolSettings {
    pub fn validate(&self) -> SettingsResult<()> {
        if self.stroke_width == 0 {
            return Err(SettingsError::InvalidStrokeWidth(self.stroke_width));
        }
        if !(MIN_GRID_CELLS..=MAX_GRID_CELLS).contains(&self.grid_cells) {
            return Err(SettingsError::InvalidGridCells(self.grid_cells));
        }
        Ok(())
    }

    pub fn set_stroke_width(&mut self, width: u32) -> SettingsResult<()> {
        if width == 0 {
            return Err(SettingsError::InvalidStrokeWidth(width));
        }
        self.stroke_width = width;
        Ok(())
    }

    pub fn set_grid_cells(&mut self, cells: u32) -> SettingsResult<()> {
        if !(MIN_GRID_CELLS..=MAX_GRID_CELLS).contains(&cells) {
            return Err(SettingsError::InvalidGridCells(cells));
        }
        self.grid_cells = cells;
        Ok(())
    }

    /// Selects a shape by its tag, e.g. `"rhombus"` or `"grid-matrix"`
    pub fn set_shape_tag(&mut self, tag: &str) -> SettingsResult<()> {
        self.shape = tag.parse()?;
        Ok(())
    }

    /// Reads and validates settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings: ToolSettings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded tool settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Writes settings as pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> SettingsResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
