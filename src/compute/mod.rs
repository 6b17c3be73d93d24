//! Compute module - Curve indexing, matching, and fitness evaluation.

mod curve_db;
mod evaluator;
mod matcher;
mod render;
mod stencil;
mod unfolding;

pub use curve_db::*;
pub use evaluator::*;
pub use matcher::*;
pub use render::*;
pub use stencil::*;
pub use unfolding::*;
