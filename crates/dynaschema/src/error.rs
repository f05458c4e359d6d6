//! Error types for table lifecycle operations.

use dynaschema_core::{ConfigError, SchemaError, SchemaMismatch};
use thiserror::Error;

use crate::service::ServiceError;

/// Result type alias for the dynaschema crate.
pub type Result<T> = std::result::Result<T, DynaschemaError>;

/// Errors that can occur during table lifecycle operations.
#[derive(Error, Debug)]
pub enum DynaschemaError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid schema: {0}")]
    InvalidSchema(SchemaError),

    #[error("Unknown table '{table_name}'")]
    UnknownTable { table_name: String },

    #[error("Table '{table_name}' already exists")]
    TableAlreadyExists {
        table_name: String,
        /// Raw service response body.
        body: String,
    },

    #[error(transparent)]
    UpdateTable(#[from] SchemaMismatch),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Timeout waiting for table '{table_name}' to become active")]
    TableActivationTimeout { table_name: String },

    #[error("Operation cancelled by user")]
    UserCancelled,
}

impl From<SchemaError> for DynaschemaError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownTable { table_name } => Self::UnknownTable { table_name },
            other => Self::InvalidSchema(other),
        }
    }
}
