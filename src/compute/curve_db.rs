//! Curve-segment databases: resampled contours, enumerated segment spans,
//! and per-span curvature signatures.
//!
//! A database is built once per contour. The target stencil keeps one for
//! the whole run; every candidate net gets a fresh one per evaluation.

use serde::{Deserialize, Serialize};

use crate::schema::{Contour, CurveDbConfig, Point};

/// A contiguous sub-arc of a resampled contour, identified by its start
/// offset and length in resampled points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SegmentSpan {
    pub offset: usize,
    pub len: usize,
}

/// Curve-segment index for one contour.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSegmentDatabase {
    /// Contour resampled to uniform arc length.
    contour: Vec<Point>,
    /// Signed curvature at each resampled point (turning angle per unit
    /// arc length; positive where the contour turns counter-clockwise).
    curvatures: Vec<f64>,
    /// Enumerated segment spans, ordered by length then offset.
    spans: Vec<SegmentSpan>,
    /// Curvature signature per span, index-aligned with `spans`.
    signatures: Vec<Vec<f64>>,
}

impl CurveSegmentDatabase {
    /// Build the database for a contour. Returns `None` when the contour is
    /// degenerate (too few points or zero perimeter) and no segments can be
    /// derived from it.
    pub fn build(contour: &Contour, config: &CurveDbConfig) -> Option<Self> {
        let resampled = contour.resample(config.resample_size)?;
        let curvatures = point_curvatures(&resampled, contour.perimeter());

        let n = resampled.len();
        let mut spans = Vec::new();
        let mut signatures = Vec::new();
        for len in config.min_segment_len..=config.max_segment_len {
            for offset in (0..n).step_by(config.offset_step) {
                let signature = (0..len).map(|k| curvatures[(offset + k) % n]).collect();
                spans.push(SegmentSpan { offset, len });
                signatures.push(signature);
            }
        }

        Some(Self {
            contour: resampled,
            curvatures,
            spans,
            signatures,
        })
    }

    /// Resampled contour points.
    pub fn contour(&self) -> &[Point] {
        &self.contour
    }

    /// All enumerated spans, in database order.
    pub fn spans(&self) -> &[SegmentSpan] {
        &self.spans
    }

    /// Curvature signatures, index-aligned with [`spans`](Self::spans).
    pub fn signatures(&self) -> &[Vec<f64>] {
        &self.signatures
    }

    /// Signed curvature per resampled contour point.
    pub fn curvatures(&self) -> &[f64] {
        &self.curvatures
    }

    /// Signature of a span previously handed out by this database.
    pub fn signature_for(&self, span: SegmentSpan) -> Option<&[f64]> {
        self.spans
            .iter()
            .position(|s| *s == span)
            .map(|i| self.signatures[i].as_slice())
    }

    /// Contour points covered by a span, walking forward with wrap-around.
    pub fn span_points(&self, span: SegmentSpan) -> Vec<Point> {
        let n = self.contour.len();
        (0..span.len)
            .map(|k| self.contour[(span.offset + k) % n])
            .collect()
    }
}

/// Signed turning angle per unit arc length at each point of a uniformly
/// resampled closed contour.
fn point_curvatures(points: &[Point], perimeter: f64) -> Vec<f64> {
    let n = points.len();
    let step = perimeter / n as f64;
    (0..n)
        .map(|i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            let ax = cur.x - prev.x;
            let ay = cur.y - prev.y;
            let bx = next.x - cur.x;
            let by = next.y - cur.y;
            let cross = ax * by - ay * bx;
            let dot = ax * bx + ay * by;
            cross.atan2(dot) / step
        })
        .collect()
}
