use eframe_sketch::{PixelBuffer, flood_fill};
use egui::Color32;

// 7x7 white buffer with a black ring on x/y = 1 and 5
fn bordered_buffer() -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(7, 7, Color32::WHITE);
    for i in 1..=5 {
        buffer.set(i, 1, Color32::BLACK);
        buffer.set(i, 5, Color32::BLACK);
        buffer.set(1, i, Color32::BLACK);
        buffer.set(5, i, Color32::BLACK);
    }
    buffer
}

#[test]
fn test_uniform_buffer_is_filled_completely() {
    let mut buffer = PixelBuffer::filled(5, 5, Color32::WHITE);

    let written = flood_fill(&mut buffer, 2, 2, Color32::BLACK, 0);

    assert_eq!(written, 25);
    assert_eq!(buffer, PixelBuffer::filled(5, 5, Color32::BLACK));
}

#[test]
fn test_fill_stops_at_border() {
    let mut buffer = bordered_buffer();

    let written = flood_fill(&mut buffer, 3, 3, Color32::RED, 0);

    assert_eq!(written, 9);
    for y in 0..7 {
        for x in 0..7 {
            let expected = if (2..=4).contains(&x) && (2..=4).contains(&y) {
                Color32::RED
            } else if (1..=5).contains(&x) && (1..=5).contains(&y) {
                Color32::BLACK
            } else {
                Color32::WHITE
            };
            assert_eq!(buffer.get(x, y), Some(expected), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_default_tolerance_still_respects_black_border() {
    let mut buffer = bordered_buffer();

    let written = flood_fill(&mut buffer, 0, 0, Color32::BLUE, 180);

    // 49 pixels minus the 5x5 block inside and including the ring
    assert_eq!(written, 24);
    assert_eq!(buffer.get(3, 3), Some(Color32::WHITE));
    assert_eq!(buffer.get(6, 6), Some(Color32::BLUE));
}

#[test]
fn test_filling_the_border_itself() {
    let mut buffer = bordered_buffer();

    let written = flood_fill(&mut buffer, 1, 1, Color32::GREEN, 0);

    assert_eq!(written, 16);
    assert_eq!(buffer.get(5, 5), Some(Color32::GREEN));
    assert_eq!(buffer.get(3, 3), Some(Color32::WHITE));
}
