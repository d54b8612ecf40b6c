use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotlightError {
    #[error("not initialized: run 'spotlight init'")]
    NotInitialized,

    #[error("product not found: {0}")]
    ProductNotFound(i64),

    #[error("invalid product name: {0}")]
    InvalidProductName(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, SpotlightError>;
