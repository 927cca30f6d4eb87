//! Pixel layout math for the matrix screens.
//!
//! Kept free of hardware types so the geometry is testable anywhere.

/// Average glyph advance of the 5x7 BDF font, in pixels.
pub const CHAR_WIDTH: u32 = 5;

/// X position that centers `text` on a display `width` pixels wide.
/// Text wider than the display pins to the left edge.
pub fn centered_x(text: &str, width: u32) -> u32 {
    centered_x_with_char_width(text, width, CHAR_WIDTH)
}

pub fn centered_x_with_char_width(text: &str, width: u32, char_width: u32) -> u32 {
    let text_width = text.chars().count() as u32 * char_width;
    width.saturating_sub(text_width) / 2
}

/// X position that right-aligns an item of `item_width` with `margin`
/// pixels of edge clearance. Panels too narrow for the item pin it to the
/// left edge instead of underflowing.
pub fn right_aligned_x(item_width: u32, width: u32, margin: u32) -> u32 {
    width.saturating_sub(item_width + margin)
}

/// Scale a `source_width` x `source_height` image to fit inside a
/// `max_size` square, preserving aspect ratio. Degenerate dimensions
/// collapse to the square.
pub fn fit_within(source_width: u32, source_height: u32, max_size: u32) -> (u32, u32) {
    if source_width == 0 || source_height == 0 {
        return (max_size, max_size);
    }
    if source_width > source_height {
        let height = (max_size * source_height) / source_width;
        (max_size, height.max(1))
    } else {
        let width = (max_size * source_width) / source_height;
        (width.max(1), max_size)
    }
}

// ============================================================================
// Tests
// ============================================================================
