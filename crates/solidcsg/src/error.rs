use solidmath::IndexOverflow;

/// Error that can occur in kernel operations.
#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum KernelError {
    #[error("overflow ({0})")]
    Overflow(IndexOverflow),
    #[error("error loading config: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("box is empty")]
    EmptyBox,
    #[error("ray has zero direction")]
    DegenerateRay,
}
impl From<IndexOverflow> for KernelError {
    fn from(value: IndexOverflow) -> Self {
        KernelError::Overflow(value)
    }
}

/// Result type returned by kernel operations.
pub type KernelResult<T> = Result<T, KernelError>;
