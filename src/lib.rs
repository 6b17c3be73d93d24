//! Netfit - Fitness evaluators for genetic mesh-unfolding search.
//!
//! Scores candidate 2D nets produced by unfolding a 3D polyhedral mesh, for
//! use as the fitness function of an external genetic-algorithm engine.
//! Simple evaluators penalize self-overlap or reward compactness; the core
//! [`PolygonFitEvaluator`](compute::PolygonFitEvaluator) scores how closely
//! a net's outline resembles a fixed target silhouette via curvature-signed
//! curve matching, and tracks the best-ever match across the whole run.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and geometry types (contours, nets)
//! - `compute`: Curve databases, matching, and the evaluators
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use netfit::compute::PolygonFitEvaluator;
//!
//! // Build the evaluator once; the stencil index is immutable afterwards.
//! let mut evaluator = PolygonFitEvaluator::new(Path::new("stencil.png"))
//!     .expect("stencil must decode to a silhouette contour");
//!
//! // The GA engine calls score(...) once per individual per generation,
//! // after rebuilding the net externally:
//! // let fitness = evaluator.score(&mut unfolder);
//! # let _ = &mut evaluator;
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    CurveSegmentDatabase, GenomeEvaluator, MatchResult, MeshUnfolding, NetEvaluator,
    PolygonFitEvaluator, TargetShapeIndex,
};
pub use schema::{Contour, CurveDbConfig, Net, Point};
