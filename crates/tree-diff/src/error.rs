//! Error types for the tree edit distance engine.

use thiserror::Error;

/// Which of the two input trees was degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Left => "left",
            Side::Right => "right",
        })
    }
}

/// Failures [`crate::distance`] can report.
///
/// The engine has exactly one recoverable error kind: a degenerate (empty) input tree.
/// Resource exhaustion during allocation is not modeled as a `Result` variant, matching the
/// ambient allocator-abort behavior of the rest of the language.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeDiffError {
    #[error("{side} tree is empty; distance requires a root node on each side")]
    EmptyTree { side: Side },
}
