use thiserror::Error;

use crate::model::{MediaIdentity, Source};

const MAX_NAME_BYTES: usize = 512;
const MAX_IDS_PER_IDENTITY: usize = 16;

#[derive(Debug, Error)]
pub enum RequestValidationError {
    #[error("identity must carry at least one id or a name")]
    EmptyIdentity,
    #[error("identity id namespace and value must be non-empty")]
    EmptyId,
    #[error("identity carries more than {MAX_IDS_PER_IDENTITY} ids")]
    TooManyIds,
    #[error("identity name exceeds {MAX_NAME_BYTES} bytes")]
    NameTooLong,
    #[error("source url must be http or https")]
    InvalidSourceUrl,
}

/// Validate an identity before handing it to the `item`/`source` stages.
pub fn validate_identity(
    identity: &MediaIdentity,
) -> Result<(), RequestValidationError> {
    if identity.ids.is_empty() && identity.name.is_none() {
        return Err(RequestValidationError::EmptyIdentity);
    }

    if identity.ids.len() > MAX_IDS_PER_IDENTITY {
        return Err(RequestValidationError::TooManyIds);
    }

    for (namespace, value) in &identity.ids {
        if namespace.is_empty() || value.is_empty() {
            return Err(RequestValidationError::EmptyId);
        }
    }

    if let Some(name) = &identity.name {
        if name.len() > MAX_NAME_BYTES {
            return Err(RequestValidationError::NameTooLong);
        }
    }

    Ok(())
}

/// Validate a caller-supplied source before resolution.
pub fn validate_source(source: &Source) -> Result<(), RequestValidationError> {
    if !source.url.starts_with("http://") && !source.url.starts_with("https://") {
        return Err(RequestValidationError::InvalidSourceUrl);
    }
    Ok(())
}
