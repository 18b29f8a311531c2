//! Variance-of-Laplacian sharpness metric.
//!
//! ```text
//! RGB → gray (BT.601) → 3x3 Laplacian (reflect-101 borders) → |x| clamped to u8 → variance
//! ```
//!
//! Blurry images have weak edge responses, so the variance of the Laplacian
//! collapses towards zero; crisp images score high.

use image::{DynamicImage, GrayImage, Luma};

/// Convert to 8-bit gray using BT.601 luma weights, rounded to nearest.
pub fn to_gray(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
        Luma([((weighted + 500) / 1000) as u8])
    })
}

/// Mirror an out-of-range index back inside `0..len` without repeating the edge.
#[inline]
fn reflect101(i: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= len {
        i = 2 * len - 2 - i;
    }
    i as usize
}

/// Absolute 4-neighbour Laplacian response per pixel, saturated to `0..=255`.
pub fn laplacian_abs(gray: &GrayImage) -> Vec<u8> {
    let (w, h) = (i64::from(gray.width()), i64::from(gray.height()));
    let px = |x: i64, y: i64| -> i32 {
        i32::from(gray.get_pixel(reflect101(x, w) as u32, reflect101(y, h) as u32).0[0])
    };

    let mut out = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            let response = px(x, y - 1) + px(x - 1, y) + px(x + 1, y) + px(x, y + 1) - 4 * px(x, y);
            out.push(response.unsigned_abs().min(255) as u8);
        }
    }
    out
}

/// Population variance of a sample. Empty input has zero variance.
pub fn variance(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let (sum, sum_sq) = values.iter().fold((0.0f64, 0.0f64), |(s, sq), &v| {
        let v = f64::from(v);
        (s + v, sq + v * v)
    });
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Sharpness score of a decoded image.
pub fn laplacian_variance(image: &DynamicImage) -> f64 {
    variance(&laplacian_abs(&to_gray(image)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn gray(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([f(x, y)]))
    }

    #[test]
    fn test_flat_image_scores_zero() {
        let img = DynamicImage::ImageLuma8(gray(16, 16, |_, _| 128));
        assert_eq!(laplacian_variance(&img), 0.0);
    }

    #[test]
    fn test_hard_edge_beats_soft_edge() {
        let hard = DynamicImage::ImageLuma8(gray(32, 32, |x, _| if x < 16 { 0 } else { 200 }));
        let soft = DynamicImage::ImageLuma8(gray(32, 32, |x, _| match x {
            0..=11 => 0,
            12..=19 => ((x - 11) * 25) as u8,
            _ => 200,
        }));
        assert!(laplacian_variance(&hard) > laplacian_variance(&soft));
        assert!(laplacian_variance(&soft) > 0.0);
    }

    #[test]
    fn test_single_bright_pixel_response() {
        // 3x3 with a bright centre. Edge pixels see the centre twice through
        // the reflected border.
        let g = gray(3, 3, |x, y| if x == 1 && y == 1 { 90 } else { 0 });
        let lap = laplacian_abs(&g);
        assert_eq!(lap[4], 255); // |-360| saturates
        assert_eq!(lap[1], 180);
        assert_eq!(lap[3], 180);
        assert_eq!(lap[0], 0);
    }

    #[test]
    fn test_reflect101() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(2, 5), 2);
        assert_eq!(reflect101(-1, 1), 0);
        assert_eq!(reflect101(1, 1), 0);
    }

    #[test]
    fn test_one_pixel_image() {
        let img = DynamicImage::ImageLuma8(gray(1, 1, |_, _| 200));
        assert_eq!(laplacian_variance(&img), 0.0);
    }

    #[test]
    fn test_variance() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[7, 7, 7]), 0.0);
        assert!((variance(&[0, 2]) - 1.0).abs() < 1e-12);
        assert!((variance(&[2, 4, 4, 4, 5, 5, 7, 9]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_to_gray_bt601() {
        let rgb: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_fn(1, 3, |_, y| match y {
                0 => Rgb([255, 0, 0]),
                1 => Rgb([0, 255, 0]),
                _ => Rgb([0, 0, 255]),
            });
        let g = to_gray(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(g.get_pixel(0, 0).0[0], 76);
        assert_eq!(g.get_pixel(0, 1).0[0], 150);
        assert_eq!(g.get_pixel(0, 2).0[0], 29);
    }
}
