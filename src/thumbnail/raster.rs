//! Raster drawing primitives for placeholder thumbnails.

use image::{Rgba, RgbaImage};

use crate::format::VideoFormat;

/// Background fill per detected container format.
pub(super) fn background_for(format: VideoFormat) -> Rgba<u8> {
    match format {
        VideoFormat::Mp4 => Rgba([100, 149, 237, 255]),  // cornflower blue
        VideoFormat::Webm => Rgba([144, 238, 144, 255]), // light green
        VideoFormat::Avi => Rgba([255, 182, 193, 255]),  // light pink
        VideoFormat::Mov => Rgba([255, 215, 0, 255]),    // gold
        VideoFormat::Unknown => Rgba([128, 128, 128, 255]),
    }
}

/// 1-pixel border around the whole image.
pub(super) fn draw_border(img: &mut RgbaImage, color: Rgba<u8>) {
    let (width, height) = img.dimensions();
    for x in 0..width {
        img.put_pixel(x, 0, color);
        img.put_pixel(x, height - 1, color);
    }
    for y in 0..height {
        img.put_pixel(0, y, color);
        img.put_pixel(width - 1, y, color);
    }
}

/// Centered white play triangle sized to a sixth of the smaller edge.
pub(super) fn draw_play_glyph(img: &mut RgbaImage) {
    let (width, height) = img.dimensions();
    let cx = i64::from(width / 2);
    let cy = i64::from(height / 2);
    let size = i64::from(width.min(height) / 6);

    let vertices = [
        (cx - size / 2, cy - size / 2),
        (cx - size / 2, cy + size / 2),
        (cx + size / 2, cy),
    ];

    let white = Rgba([255, 255, 255, 255]);
    for y in 0..i64::from(height) {
        for x in 0..i64::from(width) {
            if point_in_triangle(x, y, vertices) {
                img.put_pixel(x as u32, y as u32, white);
            }
        }
    }
}

/// Simple camera glyph: body outline plus a filled lens circle.
pub(super) fn draw_camera_glyph(img: &mut RgbaImage) {
    let (width, height) = img.dimensions();
    let cx = i64::from(width / 2);
    let cy = i64::from(height / 2);
    let size = i64::from(width.min(height) / 4);
    let gray = Rgba([150, 150, 150, 255]);

    for y in (cy - size / 2)..=(cy + size / 2) {
        for x in (cx - size / 2)..=(cx + size / 2) {
            let on_edge =
                y == cy - size / 2 || y == cy + size / 2 || x == cx - size / 2 || x == cx + size / 2;
            if on_edge && in_bounds(x, y, width, height) {
                img.put_pixel(x as u32, y as u32, gray);
            }
        }
    }

    let radius = size / 4;
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            let dx = x - cx;
            let dy = y - cy;
            if dx * dx + dy * dy <= radius * radius && in_bounds(x, y, width, height) {
                img.put_pixel(x as u32, y as u32, gray);
            }
        }
    }
}

/// Barycentric point-in-triangle test.
fn point_in_triangle(px: i64, py: i64, vertices: [(i64, i64); 3]) -> bool {
    let [(x1, y1), (x2, y2), (x3, y3)] = vertices;
    let denominator = (y2 - y3) * (x1 - x3) + (x3 - x2) * (y1 - y3);
    if denominator == 0 {
        return false;
    }

    let a = ((y2 - y3) * (px - x3) + (x3 - x2) * (py - y3)) as f64 / denominator as f64;
    let b = ((y3 - y1) * (px - x3) + (x1 - x3) * (py - y3)) as f64 / denominator as f64;
    let c = 1.0 - a - b;
    a >= 0.0 && b >= 0.0 && c >= 0.0
}

fn in_bounds(x: i64, y: i64, width: u32, height: u32) -> bool {
    x >= 0 && y >= 0 && x < i64::from(width) && y < i64::from(height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_pixels() {
        let mut img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
        let border = Rgba([255, 255, 255, 128]);
        draw_border(&mut img, border);
        assert_eq!(*img.get_pixel(0, 0), border);
        assert_eq!(*img.get_pixel(63, 63), border);
        assert_eq!(*img.get_pixel(32, 0), border);
        assert_eq!(*img.get_pixel(0, 32), border);
        assert_ne!(*img.get_pixel(32, 32), border);
    }

    #[test]
    fn test_play_glyph_marks_center() {
        let mut img = RgbaImage::from_pixel(120, 120, Rgba([0, 0, 0, 255]));
        draw_play_glyph(&mut img);
        // The triangle covers pixels just left of the center.
        assert_eq!(*img.get_pixel(58, 60), Rgba([255, 255, 255, 255]));
        // Far corners stay untouched.
        assert_eq!(*img.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_backgrounds_are_distinct() {
        let formats = [
            VideoFormat::Mp4,
            VideoFormat::Mov,
            VideoFormat::Avi,
            VideoFormat::Webm,
            VideoFormat::Unknown,
        ];
        for (i, a) in formats.iter().enumerate() {
            for b in &formats[i + 1..] {
                assert_ne!(background_for(*a), background_for(*b));
            }
        }
    }
}
