use thiserror::Error;

/// Errors returned when building or decoding a path.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("a path needs at least one curve")]
    NoCurves,

    #[error("reduced list needs at least 8 numbers, got {0}")]
    ReducedListTooShort(usize),

    #[error("reduced list of {0} numbers is not a start point followed by groups of 6")]
    ReducedListMisaligned(usize),

    #[error("curve {curve} does not have four points")]
    MissingPoint { curve: usize },

    #[error("even distribution needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    #[error("invalid path json: {0}")]
    Json(#[from] serde_json::Error),
}
