//! Table column detection.
//!
//! Canny edges feed a Hough transform; every steep Hough line is then walked
//! through the edge map to recover the actual line segments, bridging short
//! gaps the way a probabilistic Hough detector does. Long, nearly vertical
//! segments are taken as column dividers.

use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::hough::{detect_lines, LineDetectionOptions, PolarLine};

use super::boundaries::{merge_boundaries, BoundarySet};
use crate::config::DetectionConfig;
use crate::log;

/// A detected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl LineSegment {
    pub fn length(&self) -> f32 {
        let dx = self.x2 as f32 - self.x1 as f32;
        let dy = self.y2 as f32 - self.y1 as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Returns the column of an edge pixel on row `y` within one pixel of `x`.
fn edge_near(edges: &GrayImage, x: i64, y: u32) -> Option<u32> {
    let width = edges.width() as i64;
    [x, x - 1, x + 1]
        .into_iter()
        .filter(|&cx| cx >= 0 && cx < width)
        .map(|cx| cx as u32)
        .find(|&cx| edges.get_pixel(cx, y)[0] > 0)
}

/// Walks a steep Hough line top to bottom and returns its edge segments.
///
/// Gaps of up to `max_gap` rows without an edge pixel are bridged; segments
/// shorter than `min_length` are dropped. Lines closer to horizontal than 45°
/// yield nothing.
pub fn trace_segments(
    edges: &GrayImage,
    line: &PolarLine,
    min_length: f32,
    max_gap: u32,
) -> Vec<LineSegment> {
    let theta = (line.angle_in_degrees as f32).to_radians();
    let (sin, cos) = theta.sin_cos();
    if cos.abs() < std::f32::consts::FRAC_1_SQRT_2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current: Option<LineSegment> = None;

    let close = |seg: LineSegment, segments: &mut Vec<LineSegment>| {
        if seg.length() >= min_length {
            segments.push(seg);
        }
    };

    for y in 0..edges.height() {
        let x = ((line.r - y as f32 * sin) / cos).round() as i64;
        let Some(hit_x) = edge_near(edges, x, y) else {
            continue;
        };

        current = match current {
            Some(mut seg) if y - seg.y2 - 1 <= max_gap => {
                seg.x2 = hit_x;
                seg.y2 = y;
                Some(seg)
            }
            previous => {
                if let Some(seg) = previous {
                    close(seg, &mut segments);
                }
                Some(LineSegment {
                    x1: hit_x,
                    y1: y,
                    x2: hit_x,
                    y2: y,
                })
            }
        };
    }

    if let Some(seg) = current {
        close(seg, &mut segments);
    }

    segments
}

/// Runs edge and line detection over a grayscale image.
pub fn detect_line_segments(gray: &GrayImage, config: &DetectionConfig) -> Vec<LineSegment> {
    let edges = canny(gray, config.canny_low, config.canny_high);
    let options = LineDetectionOptions {
        vote_threshold: config.vote_threshold,
        suppression_radius: config.suppression_radius,
    };
    let min_length = gray.height() as f32 * config.min_line_ratio;

    detect_lines(&edges, options)
        .iter()
        .flat_map(|line| trace_segments(&edges, line, min_length, config.max_line_gap))
        .collect()
}

/// Keeps segments whose endpoints differ horizontally by less than `tolerance`,
/// as `(x_min, x_max)` pairs.
pub fn vertical_spans(segments: &[LineSegment], tolerance: u32) -> Vec<(u32, u32)> {
    segments
        .iter()
        .filter(|s| s.x1.abs_diff(s.x2) < tolerance)
        .map(|s| (s.x1.min(s.x2), s.x1.max(s.x2)))
        .collect()
}

/// Detects the five day columns of a menu table.
///
/// Returns `None` when fewer than four interior dividers survive merging.
pub fn detect_boundaries(img: &DynamicImage, config: &DetectionConfig) -> Option<BoundarySet> {
    let gray = img.to_luma8();
    let segments = detect_line_segments(&gray, config);
    let spans = vertical_spans(&segments, config.vertical_tolerance);
    let points = merge_boundaries(&spans, gray.width(), config.merge_ratio);

    log(&format!(
        "Boundary detection: {} segments, {} vertical, boundaries {:?}",
        segments.len(),
        spans.len(),
        points
    ));

    BoundarySet::from_points(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    /// Edge map with a single vertical line at `x`, skipping rows in `gaps`.
    fn edge_column(width: u32, height: u32, x: u32, gaps: std::ops::Range<u32>) -> GrayImage {
        GrayImage::from_fn(width, height, |px, py| {
            if px == x && !gaps.contains(&py) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    /// White table with 4px black dividers at the given x positions.
    fn table_image(width: u32, height: u32, dividers: &[u32]) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if dividers.iter().any(|&d| x >= d && x < d + 4) {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_trace_bridges_small_gap() {
        let edges = edge_column(100, 200, 40, 90..100);
        let line = PolarLine { r: 40.0, angle_in_degrees: 0 };

        let segments = trace_segments(&edges, &line, 120.0, 20);
        assert_eq!(segments, vec![LineSegment { x1: 40, y1: 0, x2: 40, y2: 199 }]);
    }

    #[test]
    fn test_trace_splits_on_large_gap() {
        let edges = edge_column(100, 200, 40, 80..110);
        let line = PolarLine { r: 40.0, angle_in_degrees: 0 };

        // Both pieces are 80+ rows long; only keep pieces of at least 50
        let segments = trace_segments(&edges, &line, 50.0, 20);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].y2, 79);
        assert_eq!(segments[1].y1, 110);

        // Neither piece reaches 60% of the height
        assert!(trace_segments(&edges, &line, 120.0, 20).is_empty());
    }

    #[test]
    fn test_trace_ignores_shallow_lines() {
        let edges = edge_column(100, 200, 40, 0..0);
        let line = PolarLine { r: 40.0, angle_in_degrees: 90 };
        assert!(trace_segments(&edges, &line, 10.0, 20).is_empty());
    }

    #[test]
    fn test_vertical_spans_filters_slanted() {
        let segments = [
            LineSegment { x1: 100, y1: 0, x2: 104, y2: 300 },
            LineSegment { x1: 300, y1: 0, x2: 260, y2: 300 },
            LineSegment { x1: 512, y1: 0, x2: 500, y2: 300 },
        ];
        assert_eq!(vertical_spans(&segments, 20), vec![(100, 104), (500, 512)]);
    }

    #[test]
    fn test_detect_boundaries_finds_table_dividers() {
        let img = table_image(1000, 400, &[200, 400, 600, 800]);
        let set = detect_boundaries(&img, &DetectionConfig::default())
            .expect("dividers should be detected");

        let points = set.points();
        assert_eq!(points[0], 0);
        assert_eq!(points[5], 1000);
        for (found, expected) in points[1..5].iter().zip([200u32, 400, 600, 800]) {
            assert!(
                found.abs_diff(expected) <= 6,
                "boundary {} too far from divider {}",
                found,
                expected
            );
        }
    }

    #[test]
    fn test_detect_boundaries_blank_image_is_insufficient() {
        let img = table_image(500, 200, &[]);
        assert!(detect_boundaries(&img, &DetectionConfig::default()).is_none());
    }

    #[test]
    fn test_detect_boundaries_short_dividers_are_ignored() {
        // Dividers only span the top third of the image
        let img = RgbImage::from_fn(1000, 400, |x, y| {
            let on_divider = [200u32, 400, 600, 800].iter().any(|&d| x >= d && x < d + 4);
            if on_divider && y < 130 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let img = DynamicImage::ImageRgb8(img);
        assert!(detect_boundaries(&img, &DetectionConfig::default()).is_none());
    }
}
