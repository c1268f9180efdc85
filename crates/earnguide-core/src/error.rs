use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuidanceError {
    #[error("unknown source tag: {0:?}")]
    UnknownSource(String),

    #[error("malformed guidance input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("invariant violated for {metric:?} ({period:?}): {detail}")]
    Invariant {
        metric: String,
        period: String,
        detail: String,
    },
}
