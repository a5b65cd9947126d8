//! Error types for lldxf

use std::io;
use thiserror::Error;

use crate::types::DxfVersion;

/// Main error type for tag parsing, entity construction and export
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred while reading or writing a record source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unparsable group code / value pair
    #[error("Malformed tag at line {line}: {message}")]
    MalformedTag { line: usize, message: String },

    /// No schema is registered for this DXF type name
    #[error("Unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Structural impossibility inside one entity record
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Mandatory attribute without a default was never set
    #[error("Attribute not set: {0}")]
    AttributeNotSet(String),

    /// Attribute name is not part of the entity schema
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// Value kind does not match the attribute definition
    #[error("Invalid value for attribute '{attribute}': expected {expected}")]
    InvalidAttributeValue {
        attribute: String,
        expected: &'static str,
    },

    /// Attribute value is not valid for the target DXF version
    #[error("Invalid value for attribute '{attribute}' in DXF version {version}")]
    InvalidAttributeForVersion {
        attribute: String,
        version: DxfVersion,
    },

    /// Entity type cannot be written for the requested DXF version
    #[error("Unsupported CAD version: {0}")]
    UnsupportedVersion(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

impl DxfError {
    /// Errors which tolerant mode turns into a notification instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DxfError::MalformedTag { .. }
                | DxfError::UnknownEntityType(_)
                | DxfError::SchemaViolation(_)
                | DxfError::InvalidAttributeForVersion { .. }
                | DxfError::UnsupportedVersion(_)
        )
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        DxfError::MalformedTag {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for lldxf operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
