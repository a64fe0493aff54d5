//! Dimension and size arithmetic for image re-encoding.

/// Scale `(width, height)` down so the width is at most `max_width`.
///
/// The aspect ratio is kept; the height is rounded to the nearest pixel and
/// never drops below 1. Images already narrow enough are returned unchanged.
pub fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let ratio = f64::from(max_width) / f64::from(width);
    let scaled = (f64::from(height) * ratio).round().max(1.0);
    (max_width, scaled as u32)
}

/// Percentage by which `new` is smaller than `original` (negative if larger).
pub fn reduction_percent(original: u64, new: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - new as f64) / original as f64 * 100.0
}

/// Bytes as kibibytes with one decimal, e.g. `12.3 KB`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_images_are_untouched() {
        assert_eq!(fit_width(800, 600, 1200), (800, 600));
        assert_eq!(fit_width(1200, 600, 1200), (1200, 600));
    }

    #[test]
    fn wide_images_keep_aspect_ratio() {
        assert_eq!(fit_width(2400, 1600, 1200), (1200, 800));
        let (w, h) = fit_width(1920, 1081, 1200);
        assert_eq!(w, 1200);
        let exact = 1081.0 * 1200.0 / 1920.0;
        assert!((f64::from(h) - exact).abs() <= 0.5);
    }

    #[test]
    fn extreme_ratios_keep_one_pixel() {
        assert_eq!(fit_width(10_000, 1, 100), (100, 1));
    }

    #[test]
    fn reduction_is_relative_to_original() {
        assert_eq!(reduction_percent(1000, 250), 75.0);
        assert_eq!(reduction_percent(1000, 1500), -50.0);
        assert_eq!(reduction_percent(0, 10), 0.0);
    }

    #[test]
    fn formats_kilobytes() {
        assert_eq!(format_kb(1536), "1.5 KB");
        assert_eq!(format_kb(0), "0.0 KB");
    }
}
