use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Jar index {index} out of range (jars: {len})")]
    JarIndexOutOfRange { index: usize, len: usize },
    #[error("Unknown jar: {0}")]
    UnknownJar(String),
    #[error("Total balance must not be negative: {0}")]
    NegativeBalance(i64),
    #[error("Allocation must total 100% before saving (currently {total}%)")]
    AllocationIncomplete { total: u32 },
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failures reported by the backend collaborator.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request rejected with code {code}: {message}")]
    Rejected { code: i32, message: String },
    #[error("Response contained no result")]
    EmptyResult,
}
