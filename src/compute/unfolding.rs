//! Collaborator seams for the external mesh-unfolding engine and the pixel
//! overlap checker.
//!
//! The mesh engine owns the 3D model and the flattening machinery; the
//! evaluators only drive it through this trait and read measurements back.

use crate::schema::{Net, UnfoldConfig};

/// Handle to the external mesh-unfolding engine.
///
/// One handle is shared by all genome-based evaluators for a run and is
/// mutated in place on every call: rebuilding from a genome replaces the
/// current net. Exclusive access per evaluation call is the caller's
/// responsibility.
pub trait MeshUnfolding {
    /// Rebuild the flattened net from a genome. When `check_overlaps` is
    /// set, returns the global overlap count of the new net; otherwise
    /// returns 0 without paying for the check.
    fn rebuild_from_genome(&mut self, genome: &[f64], check_overlaps: bool) -> usize;

    /// Adjacency-only overlap count. Cheap, but under-reports on large nets.
    fn count_local_overlaps(&self) -> usize;

    /// Exhaustive all-pairs overlap count. Expensive.
    fn count_all_overlaps(&mut self) -> usize;

    /// Force a full re-flattening of the current model.
    fn force_full_rebuild(&mut self);

    /// The current flattened net.
    fn current_net(&self) -> &Net;

    /// Raster configuration for the current net.
    fn current_config(&self) -> &UnfoldConfig;

    /// Total boundary cut length of the current net.
    fn total_cut_length(&self) -> f64;

    /// Convex-hull area of the current net.
    fn convex_hull_area(&self) -> f64;

    /// Number of faces in the model.
    fn face_count(&self) -> usize;
}

/// Pixel-rasterization overlap checker.
pub trait OverlapChecker {
    /// Overlapped-area ratio of the net in `[0, inf)`; 0 means no face
    /// covers the same pixel as another.
    fn overlap_ratio(&mut self, net: &Net, config: &UnfoldConfig) -> f64;
}
