// Copyright 2023 Remi Bernotavicius

use serde::Serialize;

/// Everything a catalog operation can fail with. Each variant maps onto one
/// of the three wire classifications in [`Classification`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("invalid credential: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("failed to resolve {kind} name: {source}")]
    ReferenceResolution {
        kind: &'static str,
        #[source]
        source: diesel::result::Error,
    },

    #[error("storage error: {0}")]
    Persistence(#[from] diesel::result::Error),

    #[error("password hashing failed: {0}")]
    Credential(#[from] bcrypt::BcryptError),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn classification(&self) -> Classification {
        match self {
            Self::Validation(_) | Self::EmptyName(_) => Classification::Validation,
            Self::Unauthenticated(_) | Self::Token(_) => Classification::Auth,
            Self::ReferenceResolution { .. } | Self::Persistence(_) | Self::Credential(_) => {
                Classification::Persistence
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            status: self.classification(),
        }
    }
}

#[derive(Debug, Hash, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Validation,
    Auth,
    Persistence,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: Classification,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_per_variant() {
        assert_eq!(
            Error::validation("bad").classification(),
            Classification::Validation
        );
        assert_eq!(
            Error::EmptyName("ingredient").classification(),
            Classification::Validation
        );
        assert_eq!(
            Error::Unauthenticated("no token".into()).classification(),
            Classification::Auth
        );
        assert_eq!(
            Error::Persistence(diesel::result::Error::NotFound).classification(),
            Classification::Persistence
        );
    }

    #[test]
    fn response_serializes_lowercase_status() {
        let body = serde_json::to_string(&Error::validation("name is required").to_response())
            .unwrap();
        assert_eq!(body, r#"{"error":"name is required","status":"validation"}"#);
    }
}
