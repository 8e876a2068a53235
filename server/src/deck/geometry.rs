//! Slide image placement geometry.

use super::types::Placement;

const CANVAS_WIDTH: f64 = 960.0;
const CANVAS_HEIGHT: f64 = 540.0;
const FINAL_SCALE: f64 = 0.75;

/// Fit an image of `width`×`height` pixels into the 960×540 point canvas,
/// preserving aspect ratio and centering it.
///
/// The returned width/height are additionally scaled by 0.75 while x/y keep
/// the unscaled centering offsets. Clients position slides around that exact
/// asymmetry, so it must not change.
pub fn slide_placement(width: u32, height: u32) -> Placement {
    let aspect_ratio = width as f64 / height as f64;

    let (slide_width, slide_height) = if aspect_ratio > CANVAS_WIDTH / CANVAS_HEIGHT {
        (CANVAS_WIDTH, CANVAS_WIDTH / aspect_ratio)
    } else {
        (CANVAS_HEIGHT * aspect_ratio, CANVAS_HEIGHT)
    };

    let center_x = (CANVAS_WIDTH - slide_width) / 2.0;
    let center_y = (CANVAS_HEIGHT - slide_height) / 2.0;

    Placement {
        width: (slide_width * FINAL_SCALE).round() as i64,
        height: (slide_height * FINAL_SCALE).round() as i64,
        x: center_x.round() as i64,
        y: center_y.round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_image_fills_canvas_width() {
        // 2:1 is wider than the 16:9 canvas
        let p = slide_placement(2000, 1000);
        assert_eq!(p.width, 720); // 960 * 0.75
        assert_eq!(p.height, 360); // 480 * 0.75
        assert_eq!(p.x, 0);
        assert_eq!(p.y, 30); // (540 - 480) / 2, unscaled
    }

    #[test]
    fn tall_image_fills_canvas_height() {
        let p = slide_placement(500, 1000);
        assert_eq!(p.height, 405); // 540 * 0.75
        assert_eq!(p.width, 203); // round(270 * 0.75)
        assert_eq!(p.x, 345); // (960 - 270) / 2, unscaled
        assert_eq!(p.y, 0);
    }

    #[test]
    fn canvas_aspect_image_is_centered_at_origin() {
        let p = slide_placement(1920, 1080);
        assert_eq!(p.width, 720);
        assert_eq!(p.height, 405);
        assert_eq!(p.x, 0);
        assert_eq!(p.y, 0);
    }

    #[test]
    fn aspect_ratio_is_preserved_within_rounding() {
        for &(w, h) in &[(1200u32, 800u32), (333, 777), (960, 540), (4096, 1024)] {
            let p = slide_placement(w, h);
            let input_ratio = w as f64 / h as f64;
            let output_ratio = p.width as f64 / p.height as f64;
            assert!(
                (input_ratio - output_ratio).abs() / input_ratio < 0.02,
                "ratio drifted for {w}x{h}: {input_ratio} vs {output_ratio}"
            );
        }
    }

    #[test]
    fn offsets_are_non_negative_and_within_canvas() {
        for &(w, h) in &[(10u32, 10u32), (5000, 100), (100, 5000), (1200, 800)] {
            let p = slide_placement(w, h);
            assert!(p.x >= 0 && p.y >= 0, "{w}x{h} produced negative offset");
            assert!(p.x <= 960 && p.y <= 540);
        }
    }

    #[test]
    fn pure_function_is_idempotent() {
        assert_eq!(slide_placement(1234, 567), slide_placement(1234, 567));
    }
}
