pub type ReelforgeResult<T> = Result<T, ReelforgeError>;

#[derive(thiserror::Error, Debug)]
pub enum ReelforgeError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("probe error: {0}")]
    Probe(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelforgeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
