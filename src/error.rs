use thiserror::Error;

/// Fatal failure modes. Measurement failures never show up here, they
/// degrade to sentinel values at the workload boundary instead.
#[derive(Debug, Error)]
pub enum SysgradeError {
    #[error("failed to snapshot system inventory: {0}")]
    Inventory(String),

    #[error("invalid scoring config: {0}")]
    Config(String),

    #[error("failed to write report: {0}")]
    ReportWrite(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}
