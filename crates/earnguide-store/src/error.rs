use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("resolution file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
