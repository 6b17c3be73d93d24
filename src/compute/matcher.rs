//! Curvature-only matching of a contour's segment database against one
//! target segment signature.

use rayon::prelude::*;

use super::curve_db::CurveSegmentDatabase;

/// Outcome of matching one target segment against a source database.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Index of the best source span in the source database.
    pub source_index: usize,
    /// Root-mean-square curvature difference over the span.
    pub distance: f64,
}

/// Find the source span whose curvature signature is closest to
/// `target_signature`, comparing curvature profiles only (position and
/// orientation are ignored by construction).
///
/// Only spans of equal length are comparable; both databases are built from
/// one shared [`CurveDbConfig`](crate::schema::CurveDbConfig), so every
/// target length exists on the source side whenever the source database is
/// non-empty. Returns `None` when no comparable span exists.
///
/// Ties resolve to the lowest source index, so the result is deterministic
/// and identical to a sequential scan.
pub fn compare_curvature_only(
    source: &CurveSegmentDatabase,
    target_signature: &[f64],
) -> Option<MatchResult> {
    source
        .signatures()
        .par_iter()
        .enumerate()
        .filter(|(_, sig)| sig.len() == target_signature.len())
        .map(|(i, sig)| (i, rms_distance(sig, target_signature)))
        .min_by(|a, b| {
            a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))
        })
        .map(|(source_index, distance)| MatchResult {
            source_index,
            distance,
        })
}

/// Root-mean-square difference between two equal-length signatures.
fn rms_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    (sum / a.len() as f64).sqrt()
}
