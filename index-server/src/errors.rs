use crate::config::ValidationError;
use resolver::errors::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build response: {0}")]
    Http(#[from] http::Error),
}
