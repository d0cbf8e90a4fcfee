/// Geometry error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A name or index did not map to an axis.
    UnknownAxis(String),
    /// A name did not map to a corner.
    UnknownCorner(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAxis(s) => write!(f, "unknown axis: {s}"),
            Self::UnknownCorner(s) => write!(f, "unknown corner: {s}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for geometry operations.
pub type Result<T> = std::result::Result<T, Error>;
