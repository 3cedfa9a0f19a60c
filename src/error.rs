use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SksError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Invalid skill format: {0}")]
    InvalidSkill(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("Indexing failed: {0}")]
    IndexingFailed(String),

    #[error("Lock failed: {0}")]
    LockFailed(String),
}

pub type Result<T> = std::result::Result<T, SksError>;
