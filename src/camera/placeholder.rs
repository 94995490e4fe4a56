//! Fallback backdrop shown when no camera frame is available.

use image::{Rgba, RgbaImage};

pub const PLACEHOLDER_WIDTH: u32 = 960;
pub const PLACEHOLDER_HEIGHT: u32 = 540;

const BACKGROUND: Rgba<u8> = Rgba([0x42, 0x42, 0x42, 0xFF]);
const FRAME_LINE: Rgba<u8> = Rgba([23, 23, 23, 0xFF]);
const FRAME_COUNT: u32 = 16;
const FRAME_STEP: u32 = 5;

/// Builds the placeholder bitmap: the panel background with nested
/// darker frames stepping inward from the edges. The caption text is
/// layered on top by the renderer, not baked into the pixels.
pub fn placeholder_image() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT, BACKGROUND);
    for i in 0..FRAME_COUNT {
        let inset = i * FRAME_STEP;
        draw_rect_outline(
            &mut img,
            inset,
            inset,
            PLACEHOLDER_WIDTH - 1 - inset,
            PLACEHOLDER_HEIGHT - 1 - inset,
            FRAME_LINE,
        );
    }
    img
}

fn draw_rect_outline(img: &mut RgbaImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba<u8>) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    for x in x0..=x1 {
        img.put_pixel(x, y0, color);
        img.put_pixel(x, y1, color);
    }
    for y in y0..=y1 {
        img.put_pixel(x0, y, color);
        img.put_pixel(x1, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_dimensions() {
        let img = placeholder_image();
        assert_eq!(img.width(), PLACEHOLDER_WIDTH);
        assert_eq!(img.height(), PLACEHOLDER_HEIGHT);
    }

    #[test]
    fn test_outer_frame_is_drawn() {
        let img = placeholder_image();
        assert_eq!(*img.get_pixel(0, 0), FRAME_LINE);
        assert_eq!(
            *img.get_pixel(PLACEHOLDER_WIDTH - 1, PLACEHOLDER_HEIGHT - 1),
            FRAME_LINE
        );
    }

    #[test]
    fn test_second_frame_sits_five_pixels_in() {
        let img = placeholder_image();
        assert_eq!(*img.get_pixel(5, 5), FRAME_LINE);
        assert_eq!(*img.get_pixel(2, 2), BACKGROUND);
    }

    #[test]
    fn test_center_keeps_background() {
        let img = placeholder_image();
        assert_eq!(
            *img.get_pixel(PLACEHOLDER_WIDTH / 2, PLACEHOLDER_HEIGHT / 2),
            BACKGROUND
        );
    }
}
