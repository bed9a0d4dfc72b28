// crates/pyramid-core/src/error.rs
use thiserror::Error;

/// Errors produced while loading datasets or shaping chart data.
#[derive(Debug, Error)]
pub enum PyramidError {
    /// A dataset, slug or code that is not present.
    #[error("not found: {0}")]
    NotFound(String),

    /// The dataset exists but has no snapshot for the requested year.
    #[error("no data for {name} in {year}")]
    YearMissing { name: String, year: u16 },

    /// Two datasets were combined whose age groups do not line up.
    #[error("age groups do not line up: {0}")]
    MismatchedAgeGroups(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl PyramidError {
    /// True for the "nothing there" family of errors (unknown slug, missing year).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::YearMissing { .. })
    }
}

pub type Result<T> = std::result::Result<T, PyramidError>;
