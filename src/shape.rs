use std::f32::consts::{FRAC_PI_2, TAU};
use std::str::FromStr;

use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use serde::{Deserialize, Serialize};

use crate::canvas::{Paint, RenderTarget};
use crate::settings::SettingsError;

/// Shapes a drag can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Line,
    Rectangle,
    Pentagon,
    Hexagon,
    Rhombus,
    Oval,
    GridMatrix,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Pentagon,
        ShapeKind::Hexagon,
        ShapeKind::Rhombus,
        ShapeKind::Oval,
        ShapeKind::GridMatrix,
    ];

    /// Stable tag used in settings files
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Rhombus => "rhombus",
            ShapeKind::Oval => "oval",
            ShapeKind::GridMatrix => "grid-matrix",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Pentagon => "Pentagon",
            ShapeKind::Hexagon => "Hexagon",
            ShapeKind::Rhombus => "Rhombus",
            ShapeKind::Oval => "Oval",
            ShapeKind::GridMatrix => "Grid",
        }
    }

    /// Line and grid are always stroked, whatever the button
    pub fn can_fill(&self) -> bool {
        !matches!(self, ShapeKind::Line | ShapeKind::GridMatrix)
    }
}

impl FromStr for ShapeKind {
    type Err = SettingsError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag.trim()))
            .ok_or_else(|| SettingsError::UnknownShape(tag.to_owned()))
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One vector drawing instruction, from a drag anchor to a release point.
///
/// Immutable once built. The same value is used for the live preview and
/// for the committed op; only the colour it is drawn with differs.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeOp {
    kind: ShapeKind,
    start: Pos2,
    end: Pos2,
    filled: bool,
    line_width: u32,
    grid_cells: u32,
}

impl ShapeOp {
    pub fn new(kind: ShapeKind, start: Pos2, end: Pos2, filled: bool, line_width: u32) -> Self {
        Self {
            kind,
            start,
            end,
            filled,
            line_width,
            grid_cells: 0,
        }
    }

    /// Number of cells per side for [`ShapeKind::GridMatrix`]
    pub fn with_grid_cells(mut self, cells: u32) -> Self {
        self.grid_cells = cells;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn end(&self) -> Pos2 {
        self.end
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn line_width(&self) -> u32 {
        self.line_width
    }

    pub fn grid_cells(&self) -> u32 {
        self.grid_cells
    }

    /// True when the shape would have no size and so draws nothing.
    ///
    /// Polygons and grids are sized by the shorter side of the dragged box,
    /// so a drag along a single axis collapses them too.
    pub fn is_degenerate(&self) -> bool {
        let size = self.extent().abs();
        match self.kind {
            ShapeKind::Line | ShapeKind::Rectangle | ShapeKind::Rhombus | ShapeKind::Oval => {
                size == Vec2::ZERO
            }
            ShapeKind::Pentagon | ShapeKind::Hexagon | ShapeKind::GridMatrix => size.min_elem() <= 0.0,
        }
    }

    fn extent(&self) -> Vec2 {
        self.end - self.start
    }

    fn center(&self) -> Pos2 {
        self.start + self.extent() / 2.0
    }

    fn paint(&self, color: Color32) -> Paint {
        if self.filled {
            Paint::Fill(color)
        } else {
            Paint::Outline(Stroke::new(self.line_width as f32, color))
        }
    }

    /// Renders the shape onto `target` in `color`.
    pub fn draw<T: RenderTarget + ?Sized>(&self, target: &mut T, color: Color32) {
        let stroke = Stroke::new(self.line_width as f32, color);
        let size = self.extent();
        let center = self.center();

        match self.kind {
            ShapeKind::Line => target.line_segment([self.start, self.end], stroke),
            ShapeKind::Rectangle => {
                target.rect(Rect::from_two_pos(self.start, self.end), self.paint(color));
            }
            ShapeKind::Oval => {
                target.ellipse(center, size.abs() / 2.0, self.paint(color));
            }
            ShapeKind::Pentagon | ShapeKind::Hexagon => {
                let (sides, rotation) = if self.kind == ShapeKind::Pentagon {
                    (5, -FRAC_PI_2)
                } else {
                    (6, 0.0)
                };
                let radius = size.x.abs().min(size.y.abs()) / 2.0;
                let points = regular_polygon(center, radius, sides, rotation);
                if radius > 0.0 && !points.is_empty() {
                    target.closed_path(&points, self.paint(color));
                }
            }
            ShapeKind::Rhombus => {
                let points = [
                    Pos2::new(center.x, self.start.y),
                    Pos2::new(self.end.x, center.y),
                    Pos2::new(center.x, self.end.y),
                    Pos2::new(self.start.x, center.y),
                ];
                target.closed_path(&points, self.paint(color));
            }
            ShapeKind::GridMatrix => {
                for segment in grid_lines(self.start, self.end, self.grid_cells) {
                    target.line_segment(segment, stroke);
                }
            }
        }
    }
}

/// Vertices of a regular polygon. Fewer than 3 sides yields nothing.
pub fn regular_polygon(center: Pos2, radius: f32, sides: usize, rotation: f32) -> Vec<Pos2> {
    if sides < 3 {
        return Vec::new();
    }
    let step = TAU / sides as f32;
    (0..sides)
        .map(|i| {
            let angle = rotation + step * i as f32;
            Pos2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Segments of an `cells` x `cells` grid anchored at `start`.
///
/// The dragged box is clamped to a square whose side is the shorter extent,
/// keeping the drag direction on each axis. Returns the four sides of the
/// square followed by the inner vertical and horizontal lines. A box with no
/// extent on either axis yields nothing.
pub fn grid_lines(start: Pos2, end: Pos2, cells: u32) -> Vec<[Pos2; 2]> {
    if cells == 0 {
        return Vec::new();
    }
    let extent = end - start;
    let side = extent.x.abs().min(extent.y.abs());
    if side.is_nan() || side <= 0.0 {
        return Vec::new();
    }
    let dx = side * sign(extent.x);
    let dy = side * sign(extent.y);
    let corner = Pos2::new(start.x + dx, start.y + dy);

    let mut lines = vec![
        [start, Pos2::new(corner.x, start.y)],
        [Pos2::new(corner.x, start.y), corner],
        [corner, Pos2::new(start.x, corner.y)],
        [Pos2::new(start.x, corner.y), start],
    ];
    for i in 1..cells {
        let x = start.x + dx * i as f32 / cells as f32;
        let y = start.y + dy * i as f32 / cells as f32;
        lines.push([Pos2::new(x, start.y), Pos2::new(x, corner.y)]);
        lines.push([Pos2::new(start.x, y), Pos2::new(corner.x, y)]);
    }
    lines
}

// Zero counts as positive
fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
