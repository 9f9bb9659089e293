use crate::exec::kernel::KernelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("planning failed: {0}")]
    Planning(String),

    #[error("reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("invalid sketch support: {0}")]
    InvalidSupport(String),

    #[error("solid continuity violated: {0}")]
    Continuity(String),

    #[error("kernel call failed: {0}")]
    Kernel(#[from] KernelError),

    #[error("post-condition violated: {0}")]
    PostCondition(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
