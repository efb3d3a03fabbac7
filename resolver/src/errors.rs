use crate::key::LookupKey;

/// Failures reported by a store backend. These are never surfaced to callers
/// of the resolver directly; they are classified into an `IndexError` first.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("read of {0} timed out")]
    Timeout(String),
}

/// Classified resolution failures.
///
/// A critical error means the app cannot serve any index document. A
/// non-critical error means only the explicitly requested revision is
/// unavailable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("there's no {app}:current revision, the site is down")]
    NoCurrentRevision { app: String },

    #[error("there's no {key} revision, the site is down")]
    CurrentRevisionMissing { key: LookupKey },

    #[error("there's no {key} revision")]
    RevisionNotFound { key: LookupKey },

    #[error("reading {key} from the store timed out")]
    StoreTimeout { key: LookupKey, critical: bool },
}

impl IndexError {
    pub fn is_critical(&self) -> bool {
        match self {
            IndexError::NoCurrentRevision { .. } => true,
            IndexError::CurrentRevisionMissing { .. } => true,
            IndexError::RevisionNotFound { .. } => false,
            IndexError::StoreTimeout { critical, .. } => *critical,
        }
    }
}
