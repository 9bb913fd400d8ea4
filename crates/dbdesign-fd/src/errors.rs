use thiserror::Error;

/// Line-level failure reported by the dependency parser.
///
/// `line` counts only non-blank, non-comment lines, starting at 1. The
/// messages are the user-facing German texts shown in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyParseError {
    /// The `->` separator is missing or the line starts with it.
    #[error("Zeile {line}: Erwartet Format A,B -> C,D")]
    MissingArrow { line: usize },
    /// One side had no attribute left after trimming.
    #[error("Zeile {line}: Linke und rechte Seite duerfen nicht leer sein.")]
    EmptySide { line: usize },
}

impl DependencyParseError {
    /// Filtered line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            DependencyParseError::MissingArrow { line } | DependencyParseError::EmptySide { line } => {
                *line
            }
        }
    }
}
