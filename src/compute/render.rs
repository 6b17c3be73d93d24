//! Diagnostic rendering of the best-ever curve match.
//!
//! Draws the target silhouette and the best net boundary side by side, with
//! the matched segments highlighted, and writes the result as a PNG.

use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use super::curve_db::{CurveSegmentDatabase, SegmentSpan};
use crate::schema::Point;

const PANEL_SIZE: u32 = 400;
const MARGIN: f64 = 20.0;

const BACKGROUND: Rgb<u8> = Rgb([16, 16, 16]);
const CONTOUR: Rgb<u8> = Rgb([120, 120, 120]);
const TARGET_MATCH: Rgb<u8> = Rgb([80, 200, 120]);
const SOURCE_MATCH: Rgb<u8> = Rgb([230, 120, 80]);

/// Render the matched target/source pair to `path`.
pub fn render_best_match(
    path: &Path,
    target: &CurveSegmentDatabase,
    source: &CurveSegmentDatabase,
    target_span: SegmentSpan,
    source_span: SegmentSpan,
) -> image::ImageResult<()> {
    let mut img = RgbImage::from_pixel(PANEL_SIZE * 2, PANEL_SIZE, BACKGROUND);

    draw_panel(&mut img, target, target_span, 0, TARGET_MATCH);
    draw_panel(&mut img, source, source_span, PANEL_SIZE, SOURCE_MATCH);

    img.save(path)
}

fn draw_panel(
    img: &mut RgbImage,
    db: &CurveSegmentDatabase,
    span: SegmentSpan,
    x_offset: u32,
    highlight: Rgb<u8>,
) {
    let contour = db.contour();
    let to_panel = panel_transform(contour, x_offset);

    draw_closed_polyline(img, contour, &to_panel, CONTOUR);
    // Matched segment on top of the contour, open-ended.
    let matched = db.span_points(span);
    draw_open_polyline(img, &matched, &to_panel, highlight);
}

/// Uniform-scale transform fitting a point set into one panel with margins.
fn panel_transform(points: &[Point], x_offset: u32) -> impl Fn(Point) -> (f32, f32) {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1e-12);
    let scale = (PANEL_SIZE as f64 - 2.0 * MARGIN) / span;
    let base_x = x_offset as f64 + MARGIN;

    move |p: Point| {
        (
            (base_x + (p.x - min_x) * scale) as f32,
            (MARGIN + (p.y - min_y) * scale) as f32,
        )
    }
}

fn draw_closed_polyline(
    img: &mut RgbImage,
    points: &[Point],
    to_panel: &impl Fn(Point) -> (f32, f32),
    color: Rgb<u8>,
) {
    let n = points.len();
    for i in 0..n {
        draw_line_segment_mut(img, to_panel(points[i]), to_panel(points[(i + 1) % n]), color);
    }
}

fn draw_open_polyline(
    img: &mut RgbImage,
    points: &[Point],
    to_panel: &impl Fn(Point) -> (f32, f32),
    color: Rgb<u8>,
) {
    for pair in points.windows(2) {
        draw_line_segment_mut(img, to_panel(pair[0]), to_panel(pair[1]), color);
    }
}
