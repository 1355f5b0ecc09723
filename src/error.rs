use std::path::PathBuf;
use thiserror::Error;

/// Errors that abandon a single module file or class lookup.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text contains no `val <name> = module {` declaration
    #[error("no module declaration found")]
    NoModuleFound,

    /// A block inside the module body uses a keyword that is not a known lifecycle
    #[error("unknown component kind: {0}")]
    UnknownComponentKind(String),

    /// The class source exists but has no primary constructor parameter list
    #[error("no constructor declaration found for class {0}")]
    MissingConstructorDeclaration(String),

    /// A component body has no `ClassName(...)` call to take the component from
    #[error("no constructor call found in `{keyword}` block")]
    MissingConstructorCall { keyword: String },

    /// A `scoped` component with neither its own type annotation nor an enclosing `scope<T>`
    #[error("scoped component {0} has no scope type")]
    UnsupportedScope(String),
}

#[derive(Debug, Error)]
pub enum ScanErrorKind {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A per-file failure, tagged with the file that caused it.
#[derive(Debug, Error)]
#[error("{}: {kind}", .path.display())]
pub struct ScanError {
    pub path: PathBuf,
    pub kind: ScanErrorKind,
}

impl ScanError {
    pub fn new(path: impl Into<PathBuf>, kind: impl Into<ScanErrorKind>) -> Self {
        Self {
            path: path.into(),
            kind: kind.into(),
        }
    }
}
