//! Zhang-Shasha tree edit distance over opaque, callback-driven trees.
//!
//! The engine never inspects node structure itself: callers hand it a root node handle
//! plus a `get_children` callback, and a cost model made of three callbacks
//! (`insert_cost`, `remove_cost`, `update_cost`). See [`distance`] for the entry point.

pub mod algebra;
pub mod annotate;
pub mod distance;
pub mod error;

pub use algebra::Edit;
pub use annotate::{annotate, AnnotatedTree};
pub use distance::distance;
pub use error::{Side, TreeDiffError};
