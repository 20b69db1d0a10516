//! Connector error model.
//! Every catalog, handle and codec operation fails with one of these variants; each carries a
//! short machine code plus a human message, and maps to a SQLSTATE for engine-facing reporting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectorError {
    #[error("{code}: {message}")]
    NotFound { code: String, message: String },
    #[error("{code}: {message}")]
    TypeMismatch { code: String, message: String },
    #[error("{code}: {message}")]
    Unsupported { code: String, message: String },
    #[error("{code}: {message}")]
    InvalidType { code: String, message: String },
    #[error("{code}: {message}")]
    Decode { code: String, message: String },
    #[error("{code}: {message}")]
    Storage { code: String, message: String },
}

impl ConnectorError {
    pub fn code_str(&self) -> &str {
        match self {
            ConnectorError::NotFound { code, .. }
            | ConnectorError::TypeMismatch { code, .. }
            | ConnectorError::Unsupported { code, .. }
            | ConnectorError::InvalidType { code, .. }
            | ConnectorError::Decode { code, .. }
            | ConnectorError::Storage { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ConnectorError::NotFound { message, .. }
            | ConnectorError::TypeMismatch { message, .. }
            | ConnectorError::Unsupported { message, .. }
            | ConnectorError::InvalidType { message, .. }
            | ConnectorError::Decode { message, .. }
            | ConnectorError::Storage { message, .. } => message.as_str(),
        }
    }

    pub fn not_found<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ConnectorError::NotFound { code: code.into(), message: msg.into() } }
    pub fn type_mismatch<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ConnectorError::TypeMismatch { code: code.into(), message: msg.into() } }
    pub fn unsupported<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ConnectorError::Unsupported { code: code.into(), message: msg.into() } }
    pub fn invalid_type<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ConnectorError::InvalidType { code: code.into(), message: msg.into() } }
    pub fn decode<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ConnectorError::Decode { code: code.into(), message: msg.into() } }
    pub fn storage<C: Into<String>, M: Into<String>>(code: C, msg: M) -> Self { ConnectorError::Storage { code: code.into(), message: msg.into() } }

    /// SQLSTATE reported to the engine for this failure.
    pub fn sqlstate(&self) -> &'static str {
        match self {
            ConnectorError::NotFound { .. } => "42P01",     // undefined_table
            ConnectorError::TypeMismatch { .. } => "XX000", // internal_error
            ConnectorError::Unsupported { .. } => "0A000",  // feature_not_supported
            ConnectorError::InvalidType { .. } => "42804",  // datatype_mismatch
            ConnectorError::Decode { .. } => "22P02",       // invalid_text_representation
            ConnectorError::Storage { .. } => "58000",      // system_error
        }
    }
}

pub type ConnectorResult<T> = Result<T, ConnectorError>;
