use resolver::config::{ResolverOptions, StoreConfig};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Empty app name")]
    EmptyAppName,

    #[error("Empty revision query parameter name")]
    EmptyRevisionQueryParam,
}

/// Index server configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener serving index documents
    pub listener: Listener,
    /// Admin listener for health and readiness probes
    pub admin_listener: Listener,
    /// Namespace of every store key read by this server
    pub app_name: String,
    #[serde(default)]
    pub resolver: ResolverOptions,
    pub store: StoreConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.app_name.is_empty() {
            return Err(ValidationError::EmptyAppName);
        }

        if self.resolver.revision_query_param.is_empty() {
            return Err(ValidationError::EmptyRevisionQueryParam);
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}
