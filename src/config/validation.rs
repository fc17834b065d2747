use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("engine.max_resolve_depth must be at least 1")]
    InvalidResolveDepth,

    #[error("http timeout must be positive: {field}")]
    InvalidTimeout { field: &'static str },

    #[error("server.api.max_payload_bytes must be positive")]
    InvalidPayloadLimit,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    if config.engine.max_resolve_depth == 0 {
        return Err(ValidationError::InvalidResolveDepth);
    }

    if config.http.connect_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "connect_timeout_secs",
        });
    }
    if config.http.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "request_timeout_secs",
        });
    }

    if config.server.api.max_payload_bytes == 0 {
        return Err(ValidationError::InvalidPayloadLimit);
    }

    Ok(())
}
