//! The rendering capability the drawing surface paints through, and a
//! software rasterizer implementing it.

use egui::{Color32, Pos2, Rect, Stroke, Vec2};

use crate::pixel_buffer::PixelBuffer;

/// Segments used to approximate an ellipse outline, bounded both ways.
const MIN_ELLIPSE_SEGMENTS: usize = 16;
const MAX_ELLIPSE_SEGMENTS: usize = 256;

/// Slack for float noise when testing stroke coverage
const COVERAGE_EPSILON: f32 = 1e-3;

/// How a closed shape is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    /// Paint the interior
    Fill(Color32),
    /// Stroke the boundary only
    Outline(Stroke),
}

/// A 2D raster target the host environment provides.
///
/// Coordinates are logical surface coordinates. Every call must be
/// deterministic so that replaying the same calls yields the same pixels.
pub trait RenderTarget {
    /// `[width, height]` in pixels
    fn size(&self) -> [usize; 2];

    /// Replace the backing raster. Contents are unspecified until the next repaint.
    fn resize(&mut self, size: [usize; 2]);

    /// Every pixel becomes transparent black
    fn clear(&mut self);

    fn line_segment(&mut self, points: [Pos2; 2], stroke: Stroke);

    fn closed_path(&mut self, points: &[Pos2], paint: Paint);

    fn rect(&mut self, rect: Rect, paint: Paint);

    fn ellipse(&mut self, center: Pos2, radius: Vec2, paint: Paint);

    fn read_pixels(&self) -> PixelBuffer;

    /// Overwrites the raster with `buffer`.
    fn write_pixels(&mut self, buffer: &PixelBuffer);
}

/// Software [`RenderTarget`] over a [`PixelBuffer`].
///
/// Pixel `(x, y)` is sampled at the logical point `(x, y)`. There is no
/// anti-aliasing and colours are written, not blended, so output depends
/// only on the sequence of calls.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    pixels: PixelBuffer,
}

impl RasterCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: PixelBuffer::new(width, height),
        }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    fn stroke_segment(&mut self, a: Pos2, b: Pos2, stroke: Stroke) {
        if stroke.width <= 0.0 || !a.is_finite() || !b.is_finite() {
            return;
        }
        let rgba = stroke.color.to_srgba_unmultiplied();
        let half = (stroke.width / 2.0).max(0.5) + COVERAGE_EPSILON;
        let Some((y0, y1)) = span(a.y.min(b.y) - half, a.y.max(b.y) + half, self.pixels.height()) else {
            return;
        };

        // Only the covered run of each row is tested, one pixel of slack on
        // either side keeps the exact distance test authoritative.
        for y in y0..=y1 {
            let sy = y as f32;
            let Some((left, right)) = capsule_row(a, b, half, sy) else {
                continue;
            };
            let Some((x0, x1)) = span(left - 1.0, right + 1.0, self.pixels.width()) else {
                continue;
            };
            for x in x0..=x1 {
                if distance_to_segment(Pos2::new(x as f32, sy), a, b) <= half {
                    self.pixels.put(x, y, rgba);
                }
            }
        }
    }

    /// Strokes every edge of the polygon. Zero-length edges, left over when
    /// a shape collapses onto a point, draw nothing.
    fn stroke_closed(&mut self, points: &[Pos2], stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if a != b {
                self.stroke_segment(a, b, stroke);
            }
        }
    }

    /// Even-odd scanline fill. A row covers `x` when `left <= x < right`.
    fn fill_polygon(&mut self, points: &[Pos2], color: Color32) {
        if points.len() < 3 || points.iter().any(|p| !p.is_finite()) {
            return;
        }
        let rgba = color.to_srgba_unmultiplied();
        let (min_y, max_y) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        let Some((y0, y1)) = span(min_y, max_y, self.pixels.height()) else {
            return;
        };

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y0..=y1 {
            let sy = y as f32;
            crossings.clear();
            for (i, &a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy && sy < b.y) || (b.y <= sy && sy < a.y) {
                    let t = (sy - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for pair in crossings.chunks_exact(2) {
                self.fill_row(y, pair[0], pair[1], rgba);
            }
        }
    }

    fn fill_row(&mut self, y: usize, left: f32, right: f32, rgba: [u8; 4]) {
        let start = left.ceil();
        let end = right.ceil() - 1.0;
        if let Some((x0, x1)) = span(start, end, self.pixels.width()) {
            for x in x0..=x1 {
                self.pixels.put(x, y, rgba);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        if !rect.is_finite() {
            return;
        }
        let rgba = color.to_srgba_unmultiplied();
        let top = rect.min.y.ceil();
        let bottom = rect.max.y.ceil() - 1.0;
        if let Some((y0, y1)) = span(top, bottom, self.pixels.height()) {
            for y in y0..=y1 {
                self.fill_row(y, rect.min.x, rect.max.x, rgba);
            }
        }
    }

    fn fill_ellipse(&mut self, center: Pos2, radius: Vec2, color: Color32) {
        if radius.x <= 0.0 || radius.y <= 0.0 || !center.is_finite() {
            return;
        }
        let rgba = color.to_srgba_unmultiplied();
        let Some((x0, x1)) = span(center.x - radius.x, center.x + radius.x, self.pixels.width()) else {
            return;
        };
        let Some((y0, y1)) = span(center.y - radius.y, center.y + radius.y, self.pixels.height()) else {
            return;
        };

        for y in y0..=y1 {
            let dy = (y as f32 - center.y) / radius.y;
            for x in x0..=x1 {
                let dx = (x as f32 - center.x) / radius.x;
                if dx * dx + dy * dy <= 1.0 {
                    self.pixels.put(x, y, rgba);
                }
            }
        }
    }
}

impl RenderTarget for RasterCanvas {
    fn size(&self) -> [usize; 2] {
        self.pixels.size()
    }

    fn resize(&mut self, size: [usize; 2]) {
        self.pixels = PixelBuffer::new(size[0], size[1]);
    }

    fn clear(&mut self) {
        self.pixels.fill(Color32::TRANSPARENT);
    }

    fn line_segment(&mut self, points: [Pos2; 2], stroke: Stroke) {
        self.stroke_segment(points[0], points[1], stroke);
    }

    fn closed_path(&mut self, points: &[Pos2], paint: Paint) {
        match paint {
            Paint::Fill(color) => self.fill_polygon(points, color),
            Paint::Outline(stroke) => self.stroke_closed(points, stroke),
        }
    }

    fn rect(&mut self, rect: Rect, paint: Paint) {
        match paint {
            Paint::Fill(color) => self.fill_rect(rect, color),
            Paint::Outline(stroke) => {
                let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
                self.stroke_closed(&corners, stroke);
            }
        }
    }

    fn ellipse(&mut self, center: Pos2, radius: Vec2, paint: Paint) {
        let radius = radius.abs();
        match paint {
            Paint::Fill(color) => self.fill_ellipse(center, radius, color),
            Paint::Outline(stroke) => {
                if radius == Vec2::ZERO {
                    return;
                }
                let points = ellipse_points(center, radius);
                self.stroke_closed(&points, stroke);
            }
        }
    }

    fn read_pixels(&self) -> PixelBuffer {
        self.pixels.clone()
    }

    fn write_pixels(&mut self, buffer: &PixelBuffer) {
        if buffer.size() == self.pixels.size() {
            self.pixels.clone_from(buffer);
        } else {
            log::debug!(
                "Writing {:?} pixels into {:?} canvas, copying the overlap",
                buffer.size(),
                self.pixels.size()
            );
            self.clear();
            self.pixels.blit_from(buffer);
        }
    }
}

/// Clamps the closed interval `[lo, hi]` to pixel indices `0..len`.
fn span(lo: f32, hi: f32, len: usize) -> Option<(usize, usize)> {
    if len == 0 || lo.is_nan() || hi.is_nan() || lo > hi {
        return None;
    }
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min((len - 1) as f32);
    (lo <= hi).then_some((lo as usize, hi as usize))
}

/// Horizontal extent of the points on row `y` lying within `half` of the
/// segment `a`-`b`, i.e. the row's cut through the stroke's capsule.
fn capsule_row(a: Pos2, b: Pos2, half: f32, y: f32) -> Option<(f32, f32)> {
    let mut extent = None;

    // round caps
    for end in [a, b] {
        let dy = y - end.y;
        if dy.abs() <= half {
            let dx = (half * half - dy * dy).sqrt();
            extent = union(extent, (end.x - dx, end.x + dx));
        }
    }

    // body: with u = x - a.x, `along` must be in [0, len] and `across` in [-half, half]
    let d = b - a;
    let len = d.length();
    if len > 0.0 {
        let rise = y - a.y;
        let along = linear_range(rise * d.y / len, d.x / len, 0.0, len);
        let across = linear_range(-rise * d.x / len, d.y / len, -half, half);
        if let (Some(along), Some(across)) = (along, across) {
            let (lo, hi) = (along.0.max(across.0), along.1.min(across.1));
            if lo <= hi {
                extent = union(extent, (a.x + lo, a.x + hi));
            }
        }
    }

    extent
}

/// Values of `u` for which `c0 + c1 * u` lies in `[lo, hi]`
fn linear_range(c0: f32, c1: f32, lo: f32, hi: f32) -> Option<(f32, f32)> {
    if c1 == 0.0 {
        return (lo <= c0 && c0 <= hi).then_some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let (u0, u1) = ((lo - c0) / c1, (hi - c0) / c1);
    Some((u0.min(u1), u0.max(u1)))
}

fn union(extent: Option<(f32, f32)>, (lo, hi): (f32, f32)) -> Option<(f32, f32)> {
    Some(match extent {
        Some((l, h)) => (l.min(lo), h.max(hi)),
        None => (lo, hi),
    })
}

/// Distance from `point` to the segment `a`-`b`
pub(crate) fn distance_to_segment(point: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let ap = point - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return ap.length();
    }
    let t = (ap.dot(ab) / len_sq).clamp(0.0, 1.0);
    (point - (a + ab * t)).length()
}

/// Closed polyline approximating an axis-aligned ellipse
fn ellipse_points(center: Pos2, radius: Vec2) -> Vec<Pos2> {
    let perimeter = std::f32::consts::PI * (radius.x + radius.y);
    let segments = ((perimeter / 2.0).ceil() as usize).clamp(MIN_ELLIPSE_SEGMENTS, MAX_ELLIPSE_SEGMENTS);
    (0..segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            Pos2::new(center.x + radius.x * angle.cos(), center.y + radius.y * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn count(canvas: &RasterCanvas, color: Color32) -> usize {
        let [w, h] = canvas.size();
        (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixels().get(x, y) == Some(color))
            .count()
    }

    #[test]
    fn test_horizontal_line_is_one_pixel_thick() {
        let mut canvas = RasterCanvas::new(12, 12);
        canvas.line_segment([pos2(1.0, 5.0), pos2(10.0, 5.0)], Stroke::new(1.0, Color32::BLACK));

        assert_eq!(count(&canvas, Color32::BLACK), 10);
        assert_eq!(canvas.pixels().get(1, 5), Some(Color32::BLACK));
        assert_eq!(canvas.pixels().get(10, 5), Some(Color32::BLACK));
        assert_eq!(canvas.pixels().get(5, 4), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_diagonal_line_has_no_gaps() {
        let mut canvas = RasterCanvas::new(20, 20);
        canvas.line_segment([pos2(0.0, 0.0), pos2(19.0, 7.0)], Stroke::new(1.0, Color32::BLACK));

        for x in 0..20 {
            let hit = (0..20).any(|y| canvas.pixels().get(x, y) == Some(Color32::BLACK));
            assert!(hit, "column {x} is empty");
        }
    }

    #[test]
    fn test_rect_fill_is_half_open() {
        let mut canvas = RasterCanvas::new(12, 12);
        canvas.rect(
            Rect::from_two_pos(pos2(2.0, 2.0), pos2(6.0, 5.0)),
            Paint::Fill(Color32::RED),
        );

        assert_eq!(count(&canvas, Color32::RED), 4 * 3);
        assert_eq!(canvas.pixels().get(2, 2), Some(Color32::RED));
        assert_eq!(canvas.pixels().get(6, 2), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_rect_outline_leaves_interior_empty() {
        let mut canvas = RasterCanvas::new(12, 12);
        canvas.rect(
            Rect::from_two_pos(pos2(0.0, 0.0), pos2(10.0, 10.0)),
            Paint::Outline(Stroke::new(1.0, Color32::BLACK)),
        );

        assert_eq!(count(&canvas, Color32::BLACK), 40);
        assert_eq!(canvas.pixels().get(5, 5), Some(Color32::TRANSPARENT));
        assert_eq!(canvas.pixels().get(10, 10), Some(Color32::BLACK));
    }

    #[test]
    fn test_triangle_fill() {
        let mut canvas = RasterCanvas::new(10, 10);
        let triangle = [pos2(0.0, 0.0), pos2(8.0, 0.0), pos2(0.0, 8.0)];
        canvas.closed_path(&triangle, Paint::Fill(Color32::BLUE));

        assert_eq!(canvas.pixels().get(1, 1), Some(Color32::BLUE));
        assert_eq!(canvas.pixels().get(7, 7), Some(Color32::TRANSPARENT));
        assert_eq!(canvas.pixels().get(0, 8), Some(Color32::TRANSPARENT));
    }

    #[test]
    fn test_ellipse_fill_and_outline() {
        let mut filled = RasterCanvas::new(21, 21);
        filled.ellipse(pos2(10.0, 10.0), Vec2::new(8.0, 4.0), Paint::Fill(Color32::BLACK));
        assert_eq!(filled.pixels().get(10, 10), Some(Color32::BLACK));
        assert_eq!(filled.pixels().get(18, 10), Some(Color32::BLACK));
        assert_eq!(filled.pixels().get(10, 15), Some(Color32::TRANSPARENT));

        let mut outlined = RasterCanvas::new(21, 21);
        outlined.ellipse(pos2(10.0, 10.0), Vec2::new(8.0, 4.0), Paint::Outline(Stroke::new(1.0, Color32::BLACK)));
        assert_eq!(outlined.pixels().get(10, 10), Some(Color32::TRANSPARENT));
        assert_eq!(outlined.pixels().get(18, 10), Some(Color32::BLACK));
    }

    #[test]
    fn test_write_pixels_with_other_size_copies_overlap() {
        let mut canvas = RasterCanvas::new(4, 4);
        canvas.rect(Rect::from_two_pos(pos2(0.0, 0.0), pos2(4.0, 4.0)), Paint::Fill(Color32::RED));

        canvas.write_pixels(&PixelBuffer::filled(2, 2, Color32::BLACK));

        assert_eq!(count(&canvas, Color32::BLACK), 4);
        assert_eq!(count(&canvas, Color32::RED), 0);
    }

    #[test]
    fn test_drawing_outside_is_clipped() {
        let mut canvas = RasterCanvas::new(4, 4);
        canvas.line_segment([pos2(-10.0, -10.0), pos2(-5.0, -5.0)], Stroke::new(3.0, Color32::BLACK));
        canvas.rect(Rect::from_two_pos(pos2(2.0, 2.0), pos2(50.0, 50.0)), Paint::Fill(Color32::BLACK));

        assert_eq!(count(&canvas, Color32::BLACK), 4);
    }

    #[test]
    fn test_span_clamps() {
        assert_eq!(span(-3.0, 2.5, 10), Some((0, 3)));
        assert_eq!(span(12.0, 15.0, 10), None);
        assert_eq!(span(1.0, 0.0, 10), None);
        assert_eq!(span(0.0, 1.0, 0), None);
        assert_eq!(span(f32::NAN, 1.0, 10), None);
        assert_eq!(span(0.0, f32::NAN, 10), None);
    }

    #[test]
    fn test_stroke_covers_exactly_the_pixels_near_the_segment() {
        let segments = [
            ([pos2(2.0, 3.0), pos2(37.0, 21.0)], 1.0),
            ([pos2(30.0, 1.5), pos2(4.25, 28.0)], 4.0),
            ([pos2(5.0, 10.0), pos2(35.0, 10.0)], 3.0),
            ([pos2(20.0, 2.0), pos2(20.0, 27.0)], 2.0),
            ([pos2(12.0, 12.0), pos2(12.0, 12.0)], 5.0),
            ([pos2(-10.0, -4.0), pos2(50.0, 40.0)], 7.0),
        ];

        for (points, width) in segments {
            let mut canvas = RasterCanvas::new(40, 30);
            canvas.line_segment(points, Stroke::new(width, Color32::BLACK));

            let half = (width / 2.0).max(0.5) + COVERAGE_EPSILON;
            for y in 0..30 {
                for x in 0..40 {
                    let near = distance_to_segment(pos2(x as f32, y as f32), points[0], points[1]) <= half;
                    let inked = canvas.pixels().get(x, y) == Some(Color32::BLACK);
                    assert_eq!(inked, near, "pixel ({x}, {y}) of {points:?} width {width}");
                }
            }
        }
    }

    #[test]
    fn test_capsule_row_misses_rows_beyond_the_caps() {
        let (a, b) = (pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert_eq!(capsule_row(a, b, 1.0, -2.0), None);
        assert_eq!(capsule_row(a, b, 1.0, 12.0), None);

        let (lo, hi) = capsule_row(a, b, 1.0, 5.0).unwrap();
        assert!(lo < 5.0 && hi > 5.0);
        assert!(hi - lo < 3.0, "row is {lo}..{hi}");
    }

    #[test]
    fn test_collapsed_closed_path_draws_nothing() {
        let mut canvas = RasterCanvas::new(10, 10);
        let point = pos2(5.0, 5.0);
        canvas.closed_path(&[point; 5], Paint::Outline(Stroke::new(4.0, Color32::BLACK)));
        assert!(canvas.pixels().is_blank());
    }
}
