//! Fitness evaluators for candidate unfoldings.
//!
//! Two call shapes exist, mirroring how the GA engine drives them:
//! genome-based evaluators rebuild the shared mesh handle from an
//! individual's weight vector before scoring, net-based evaluators score
//! whatever net the handle currently holds. Higher fitness is better in
//! every variant.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use super::curve_db::{CurveSegmentDatabase, SegmentSpan};
use super::matcher::compare_curvature_only;
use super::render::render_best_match;
use super::stencil::{StencilError, TargetShapeIndex};
use super::unfolding::{MeshUnfolding, OverlapChecker};
use crate::schema::CurveDbConfig;

/// Error value meaning "no target segment has matched yet".
const ERROR_SENTINEL: f64 = f64::MAX;

/// Local overlaps weigh this much heavier than global ones: they flag
/// overlaps the cheaper global check may under-report.
const LOCAL_OVERLAP_WEIGHT: usize = 100;

/// Starting value for [`AreaEvaluator`]'s best-ratio tracker.
const INITIAL_BEST_RATIO: f64 = 1e3;

/// A candidate pays for the exhaustive overlap count only when its area
/// ratio is within 1% of the best ratio seen so far.
const NEAR_BEST_MARGIN: f64 = 1.01;

/// Evaluator scoring an individual's genome through the shared mesh handle.
pub trait GenomeEvaluator {
    /// Rebuild the handle's net from `genome` and score it.
    fn score(&mut self, unfolder: &mut dyn MeshUnfolding, genome: &[f64]) -> f64;
}

/// Evaluator scoring the handle's current (externally rebuilt) net.
pub trait NetEvaluator {
    fn score(&mut self, unfolder: &mut dyn MeshUnfolding) -> f64;
}

/// Penalizes self-overlap using the engine's own overlap counters.
#[derive(Debug, Default)]
pub struct OverlappingEvaluator;

impl GenomeEvaluator for OverlappingEvaluator {
    fn score(&mut self, unfolder: &mut dyn MeshUnfolding, genome: &[f64]) -> f64 {
        let global = unfolder.rebuild_from_genome(genome, true);
        let local = unfolder.count_local_overlaps();
        -((global + local * LOCAL_OVERLAP_WEIGHT) as f64)
    }
}

/// Penalizes self-overlap via a pixel-rasterized area ratio, paying for the
/// exhaustive overlap count only on near-best candidates.
pub struct AreaEvaluator {
    checker: Box<dyn OverlapChecker>,
    best_ratio: f64,
}

impl AreaEvaluator {
    pub fn new(checker: Box<dyn OverlapChecker>) -> Self {
        Self {
            checker,
            best_ratio: INITIAL_BEST_RATIO,
        }
    }

    /// Lowest area-overlap ratio seen so far. Non-increasing across calls.
    pub fn best_ratio(&self) -> f64 {
        self.best_ratio
    }
}

impl GenomeEvaluator for AreaEvaluator {
    fn score(&mut self, unfolder: &mut dyn MeshUnfolding, genome: &[f64]) -> f64 {
        // Rebuild without the overlap check; the ratio drives everything.
        unfolder.rebuild_from_genome(genome, false);

        let ratio = {
            let net = unfolder.current_net();
            let config = unfolder.current_config();
            self.checker.overlap_ratio(net, config)
        };

        let overlaps = if ratio < self.best_ratio * NEAR_BEST_MARGIN {
            unfolder.count_all_overlaps()
        } else {
            // Assume the worst instead of paying for the exact count.
            let faces = unfolder.face_count();
            faces * faces
        };

        if ratio < self.best_ratio {
            self.best_ratio = ratio;
        }

        -(overlaps as f64)
    }
}

/// Pass-through: total boundary cut length, maximized directly.
#[derive(Debug, Default)]
pub struct CutLengthEvaluator;

impl NetEvaluator for CutLengthEvaluator {
    fn score(&mut self, unfolder: &mut dyn MeshUnfolding) -> f64 {
        unfolder.total_cut_length()
    }
}

/// Pass-through: inverse convex-hull area, so smaller hulls score higher.
#[derive(Debug, Default)]
pub struct HullAreaEvaluator;

impl NetEvaluator for HullAreaEvaluator {
    fn score(&mut self, unfolder: &mut dyn MeshUnfolding) -> f64 {
        1.0 / unfolder.convex_hull_area()
    }
}

/// Best match observed across every evaluation of one
/// [`PolygonFitEvaluator`] instance.
///
/// `min_error` is monotonically non-increasing: [`offer`](Self::offer)
/// accepts a new value only when it is strictly better, so equal errors
/// never replace an earlier best.
#[derive(Debug, Clone, Default)]
pub struct BestMatchState {
    min_error: Option<f64>,
    target_span: SegmentSpan,
    source_span: SegmentSpan,
    net_db: Option<CurveSegmentDatabase>,
}

impl BestMatchState {
    /// Minimum match error seen so far, or the sentinel if nothing matched.
    pub fn min_error(&self) -> f64 {
        self.min_error.unwrap_or(ERROR_SENTINEL)
    }

    /// Target span of the best match.
    pub fn target_span(&self) -> SegmentSpan {
        self.target_span
    }

    /// Source span of the best match.
    pub fn source_span(&self) -> SegmentSpan {
        self.source_span
    }

    /// Curve database of the net that produced the best match.
    pub fn net_db(&self) -> Option<&CurveSegmentDatabase> {
        self.net_db.as_ref()
    }

    /// Record a candidate best match. Accepts only strictly smaller errors;
    /// returns whether the state was overwritten.
    pub fn offer(
        &mut self,
        error: f64,
        target: SegmentSpan,
        source: SegmentSpan,
        net_db: &CurveSegmentDatabase,
    ) -> bool {
        if error >= self.min_error() {
            return false;
        }
        self.min_error = Some(error);
        self.target_span = target;
        self.source_span = source;
        self.net_db = Some(net_db.clone());
        true
    }
}

/// Scores a net's boundary by its best curvature-signature match against a
/// fixed target silhouette, and remembers the best-ever match for rendering
/// at teardown.
pub struct PolygonFitEvaluator {
    target: TargetShapeIndex,
    config: CurveDbConfig,
    best: BestMatchState,
    output_dir: PathBuf,
}

impl PolygonFitEvaluator {
    /// Build the evaluator from a silhouette image with default database
    /// parameters. Fails at construction; never mid-run.
    pub fn new(stencil_path: &Path) -> Result<Self, StencilError> {
        Self::with_config(stencil_path, CurveDbConfig::default())
    }

    pub fn with_config(stencil_path: &Path, config: CurveDbConfig) -> Result<Self, StencilError> {
        let target = TargetShapeIndex::from_path(stencil_path, &config)?;
        Ok(Self::from_target(target, config))
    }

    /// Build from an already constructed target index.
    pub fn from_target(target: TargetShapeIndex, config: CurveDbConfig) -> Self {
        Self {
            target,
            config,
            best: BestMatchState::default(),
            output_dir: PathBuf::from("."),
        }
    }

    /// Directory the teardown visualization is written into.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn target(&self) -> &TargetShapeIndex {
        &self.target
    }

    pub fn best_state(&self) -> &BestMatchState {
        &self.best
    }
}

impl NetEvaluator for PolygonFitEvaluator {
    fn score(&mut self, unfolder: &mut dyn MeshUnfolding) -> f64 {
        unfolder.force_full_rebuild();
        let boundary = unfolder.current_net().boundary.clone();

        let Some(source_db) = CurveSegmentDatabase::build(&boundary, &self.config) else {
            debug!("net boundary is degenerate, skipping match");
            return 1.0 / ERROR_SENTINEL;
        };

        let target_db = self.target.db();
        let mut min_error = ERROR_SENTINEL;
        let mut best_target = target_db.spans()[0];
        let mut best_source = source_db.spans()[0];

        // Greedy one-sided scan: every target segment is matched against
        // the whole net database, and the single lowest-distance match
        // wins. Strict < keeps the first of equal candidates.
        for (span, signature) in target_db.spans().iter().zip(target_db.signatures()) {
            let Some(m) = compare_curvature_only(&source_db, signature) else {
                continue;
            };
            if m.distance >= min_error {
                continue;
            }
            best_target = *span;
            best_source = source_db.spans()[m.source_index];
            min_error = m.distance;
        }

        if self.best.offer(min_error, best_target, best_source, &source_db) {
            debug!("new best-ever match, error {:e}", min_error);
        }

        1.0 / min_error
    }
}

impl Drop for PolygonFitEvaluator {
    fn drop(&mut self) {
        let Some(net_db) = self.best.net_db() else {
            return;
        };

        // Re-run the comparison for the stored pair so the artifact carries
        // the final error even if state and database drifted apart.
        let final_error = self
            .target
            .db()
            .signature_for(self.best.target_span())
            .and_then(|sig| compare_curvature_only(net_db, sig))
            .map(|m| m.distance)
            .unwrap_or_else(|| self.best.min_error());

        let path = self
            .output_dir
            .join(format!("polygonfit_best_net_err_{:.6}.png", final_error));

        match render_best_match(
            &path,
            self.target.db(),
            net_db,
            self.best.target_span(),
            self.best.source_span(),
        ) {
            Ok(()) => info!("saved best matching to {}", path.display()),
            Err(e) => warn!("failed to save best matching to {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Contour, Net, Point, UnfoldConfig};
    use std::f64::consts::PI;

    fn circle(n: usize, radius: f64) -> Contour {
        Contour::new(
            (0..n)
                .map(|i| {
                    let a = 2.0 * PI * i as f64 / n as f64;
                    Point::new(radius * a.cos(), radius * a.sin())
                })
                .collect(),
        )
    }

    fn config() -> CurveDbConfig {
        CurveDbConfig {
            resample_size: 48,
            min_segment_len: 10,
            max_segment_len: 14,
            offset_step: 3,
        }
    }

    struct MockUnfolder {
        net: Net,
        config: UnfoldConfig,
        global_overlaps: usize,
        local_overlaps: usize,
        all_overlaps: usize,
        cut_length: f64,
        hull_area: f64,
        faces: usize,
        all_overlap_calls: usize,
    }

    impl MockUnfolder {
        fn with_boundary(boundary: Contour) -> Self {
            Self {
                net: Net::new(boundary, 6),
                config: UnfoldConfig::default(),
                global_overlaps: 0,
                local_overlaps: 0,
                all_overlaps: 0,
                cut_length: 12.5,
                hull_area: 4.0,
                faces: 6,
                all_overlap_calls: 0,
            }
        }
    }

    impl MeshUnfolding for MockUnfolder {
        fn rebuild_from_genome(&mut self, _genome: &[f64], check_overlaps: bool) -> usize {
            if check_overlaps { self.global_overlaps } else { 0 }
        }
        fn count_local_overlaps(&self) -> usize {
            self.local_overlaps
        }
        fn count_all_overlaps(&mut self) -> usize {
            self.all_overlap_calls += 1;
            self.all_overlaps
        }
        fn force_full_rebuild(&mut self) {}
        fn current_net(&self) -> &Net {
            &self.net
        }
        fn current_config(&self) -> &UnfoldConfig {
            &self.config
        }
        fn total_cut_length(&self) -> f64 {
            self.cut_length
        }
        fn convex_hull_area(&self) -> f64 {
            self.hull_area
        }
        fn face_count(&self) -> usize {
            self.faces
        }
    }

    struct ScriptedChecker {
        ratios: Vec<f64>,
        next: usize,
    }

    impl OverlapChecker for ScriptedChecker {
        fn overlap_ratio(&mut self, _net: &Net, _config: &UnfoldConfig) -> f64 {
            let r = self.ratios[self.next];
            self.next += 1;
            r
        }
    }

    #[test]
    fn overlapping_score_is_nonpositive_and_zero_only_when_clean() {
        let mut evaluator = OverlappingEvaluator;
        let mut unfolder = MockUnfolder::with_boundary(circle(32, 2.0));
        assert_eq!(evaluator.score(&mut unfolder, &[0.5; 8]), 0.0);

        unfolder.global_overlaps = 3;
        assert_eq!(evaluator.score(&mut unfolder, &[0.5; 8]), -3.0);

        unfolder.local_overlaps = 2;
        assert_eq!(evaluator.score(&mut unfolder, &[0.5; 8]), -203.0);
    }

    #[test]
    fn cut_length_and_hull_area_are_pass_throughs() {
        let mut unfolder = MockUnfolder::with_boundary(circle(32, 2.0));
        unfolder.cut_length = 42.25;
        unfolder.hull_area = 8.0;
        assert_eq!(CutLengthEvaluator.score(&mut unfolder), 42.25);
        assert_eq!(HullAreaEvaluator.score(&mut unfolder), 1.0 / 8.0);
    }

    #[test]
    fn area_evaluator_skips_exhaustive_count_when_ratio_is_poor() {
        let checker = ScriptedChecker {
            ratios: vec![2.0, 5.0, 1.0],
            next: 0,
        };
        let mut evaluator = AreaEvaluator::new(Box::new(checker));
        let mut unfolder = MockUnfolder::with_boundary(circle(32, 2.0));
        unfolder.all_overlaps = 7;
        unfolder.faces = 6;

        // Ratio 2.0 beats the 1000.0 sentinel: exact count is taken.
        assert_eq!(evaluator.score(&mut unfolder, &[0.0; 4]), -7.0);
        assert_eq!(unfolder.all_overlap_calls, 1);
        assert_eq!(evaluator.best_ratio(), 2.0);

        // Ratio 5.0 >= 2.0 * 1.01: exact count must not run, worst case
        // face_count^2 is assumed instead.
        assert_eq!(evaluator.score(&mut unfolder, &[0.0; 4]), -36.0);
        assert_eq!(unfolder.all_overlap_calls, 1);
        assert_eq!(evaluator.best_ratio(), 2.0);

        // Ratio 1.0 improves again.
        assert_eq!(evaluator.score(&mut unfolder, &[0.0; 4]), -7.0);
        assert_eq!(unfolder.all_overlap_calls, 2);
        assert_eq!(evaluator.best_ratio(), 1.0);
    }

    #[test]
    fn best_ratio_is_monotonically_non_increasing() {
        let checker = ScriptedChecker {
            ratios: vec![3.0, 9.0, 2.5, 2.5, 40.0],
            next: 0,
        };
        let mut evaluator = AreaEvaluator::new(Box::new(checker));
        let mut unfolder = MockUnfolder::with_boundary(circle(32, 2.0));

        let mut last = evaluator.best_ratio();
        for _ in 0..5 {
            evaluator.score(&mut unfolder, &[0.0; 4]);
            assert!(evaluator.best_ratio() <= last);
            last = evaluator.best_ratio();
        }
        assert_eq!(last, 2.5);
    }

    fn fit_evaluator(target: Contour) -> PolygonFitEvaluator {
        let index = TargetShapeIndex::from_contour(target, &config()).unwrap();
        PolygonFitEvaluator::from_target(index, config())
    }

    #[test]
    fn exact_boundary_match_scores_infinite() {
        let shape = circle(128, 5.0);
        let mut evaluator = fit_evaluator(shape.clone());
        let mut unfolder = MockUnfolder::with_boundary(shape);

        let fitness = evaluator.score(&mut unfolder);
        assert_eq!(fitness, f64::INFINITY);
        assert_eq!(evaluator.best_state().min_error(), 0.0);
        assert!(evaluator.best_state().net_db().is_some());

        // Don't exercise the teardown render in this unit test.
        evaluator = evaluator.with_output_dir("/nonexistent-dir");
        drop(evaluator);
    }

    #[test]
    fn degenerate_boundary_yields_degenerate_fitness_and_untouched_state() {
        let mut evaluator = fit_evaluator(circle(128, 5.0));
        let line = Contour::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let mut unfolder = MockUnfolder::with_boundary(line);

        let fitness = evaluator.score(&mut unfolder);
        assert_eq!(fitness, 1.0 / f64::MAX);
        assert_eq!(evaluator.best_state().min_error(), f64::MAX);
        assert!(evaluator.best_state().net_db().is_none());
    }

    #[test]
    fn intra_call_ties_keep_the_first_target_segment() {
        // Identical contours: target span 0 already matches with distance
        // exactly 0, so no later (equal) candidate may replace it.
        let shape = circle(128, 5.0);
        let mut evaluator = fit_evaluator(shape.clone());
        let mut unfolder = MockUnfolder::with_boundary(shape);

        evaluator.score(&mut unfolder);
        let first_span = evaluator.target().db().spans()[0];
        assert_eq!(evaluator.best_state().target_span(), first_span);
    }

    #[test]
    fn repeated_evaluation_is_bit_identical() {
        let mut evaluator = fit_evaluator(circle(128, 5.0));
        let mut unfolder = MockUnfolder::with_boundary(circle(96, 2.0));

        let a = evaluator.score(&mut unfolder);
        let b = evaluator.score(&mut unfolder);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn best_state_accepts_only_strict_improvements() {
        let db = CurveSegmentDatabase::build(&circle(64, 1.0), &config()).unwrap();
        let span = db.spans()[0];
        let other = db.spans()[1];
        let mut state = BestMatchState::default();

        assert!(state.offer(5.0, span, span, &db));
        assert_eq!(state.min_error(), 5.0);

        assert!(state.offer(3.0, other, other, &db));
        assert_eq!(state.min_error(), 3.0);
        assert_eq!(state.target_span(), other);

        // Equal error: rejected, spans untouched.
        assert!(!state.offer(3.0, span, span, &db));
        assert_eq!(state.min_error(), 3.0);
        assert_eq!(state.target_span(), other);

        // Worse error: rejected.
        assert!(!state.offer(7.0, span, span, &db));
        assert_eq!(state.min_error(), 3.0);
    }

    #[test]
    fn cross_call_best_state_improves_toward_closer_nets() {
        let mut evaluator = fit_evaluator(circle(128, 5.0));

        // A square is a worse curvature match for a circle than a rounder
        // polygon of the right radius.
        let square = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        let mut square_unfolder = MockUnfolder::with_boundary(square);
        evaluator.score(&mut square_unfolder);
        let after_square = evaluator.best_state().min_error();
        assert!(after_square < f64::MAX);

        let mut round_unfolder = MockUnfolder::with_boundary(circle(64, 5.0));
        evaluator.score(&mut round_unfolder);
        let after_circle = evaluator.best_state().min_error();
        assert!(after_circle <= after_square);

        // Re-scoring the worse net must not regress the persistent state.
        evaluator.score(&mut square_unfolder);
        assert_eq!(evaluator.best_state().min_error(), after_circle);
    }

    #[test]
    fn teardown_writes_the_best_match_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let shape = circle(128, 5.0);
        let mut evaluator = fit_evaluator(shape.clone()).with_output_dir(dir.path());
        let mut unfolder = MockUnfolder::with_boundary(shape);
        evaluator.score(&mut unfolder);
        drop(evaluator);

        let artifacts: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("polygonfit_best_net_err_"))
            .collect();
        assert_eq!(artifacts.len(), 1);
    }

    #[test]
    fn teardown_without_a_recorded_best_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let evaluator = fit_evaluator(circle(128, 5.0)).with_output_dir(dir.path());
        drop(evaluator);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
