//! Region fill over a raw RGBA raster.

use egui::Color32;

use crate::pixel_buffer::{CHANNELS, PixelBuffer};

/// True when every channel of `pixel` is within `tolerance` of `target`.
#[inline]
fn matches(pixel: &[u8], target: [u8; 4], tolerance: u8) -> bool {
    pixel
        .iter()
        .zip(target)
        .all(|(&p, t)| p.abs_diff(t) <= tolerance)
}

/// Flood-fills the 4-connected region around `(seed_x, seed_y)`.
///
/// A pixel joins the region when each of its channels differs from the
/// seed's original colour by at most `tolerance`. The seed colour is read
/// once before any write, so `fill` never feeds back into the match.
/// Every pixel is visited at most once.
///
/// Returns the number of pixels written. A seed outside the buffer writes
/// nothing and returns 0.
pub fn flood_fill(
    buffer: &mut PixelBuffer,
    seed_x: usize,
    seed_y: usize,
    fill: Color32,
    tolerance: u8,
) -> usize {
    if !buffer.contains(seed_x, seed_y) {
        log::warn!(
            "Flood fill seed ({}, {}) outside {}x{} buffer",
            seed_x,
            seed_y,
            buffer.width(),
            buffer.height()
        );
        return 0;
    }

    let width = buffer.width();
    let height = buffer.height();
    let fill = fill.to_srgba_unmultiplied();

    let seed = buffer.offset(seed_x, seed_y);
    let mut target = [0u8; 4];
    target.copy_from_slice(&buffer.as_raw()[seed..seed + CHANNELS]);

    let data = buffer.as_raw_mut();
    let mut visited = vec![false; width * height];
    let mut stack = vec![(seed_x, seed_y)];
    let mut written = 0;

    while let Some((x, y)) = stack.pop() {
        let idx = y * width + x;
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        let o = idx * CHANNELS;
        if !matches(&data[o..o + CHANNELS], target, tolerance) {
            continue;
        }
        data[o..o + CHANNELS].copy_from_slice(&fill);
        written += 1;

        if x > 0 {
            stack.push((x - 1, y));
        }
        if x + 1 < width {
            stack.push((x + 1, y));
        }
        if y > 0 {
            stack.push((x, y - 1));
        }
        if y + 1 < height {
            stack.push((x, y + 1));
        }
    }

    log::debug!("Flood fill from ({}, {}) wrote {} pixels", seed_x, seed_y, written);
    written
}
