//! Error types for the Specdock platform

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpecdockError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Permission denied: {action} on {resource}")]
    PermissionDenied { action: String, resource: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Token error: {message}")]
    TokenError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Store error: {message}")]
    StoreError { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SpecdockError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn permission_denied(action: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::PermissionDenied {
            action: action.into(),
            resource: resource.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn token_error(message: impl Into<String>) -> Self {
        Self::TokenError {
            message: message.into(),
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn store_error(message: impl Into<String>) -> Self {
        Self::StoreError {
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpecdockError>;
