//! Change classification against the protected path prefix.

use serde::Serialize;

use crate::domain::ChangedFileSet;

/// Outcome of classifying a pull request's changed files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Whether any changed path falls under the protected prefix.
    pub triggered: bool,

    /// Changed paths under the prefix, in listing order.
    pub protected_files: Vec<String>,
}

/// Classify `files` against `prefix`.
///
/// Matching is a plain string prefix test. Paths are not normalised: no
/// globbing, no separator rewriting, no case folding.
pub fn classify(files: &ChangedFileSet, prefix: &str) -> Classification {
    let protected_files: Vec<String> = files
        .paths()
        .iter()
        .filter(|path| path.starts_with(prefix))
        .cloned()
        .collect();

    Classification {
        triggered: !protected_files.is_empty(),
        protected_files,
    }
}
