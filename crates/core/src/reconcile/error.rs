use thiserror::Error;

/// The local primary key no longer matches the deployed table.
///
/// Primary keys are immutable once a table exists, so this is never
/// corrected automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaMismatch {
    #[error("Mismatched schema for {table_name}: {upstream} VS {local}")]
    KeySchema {
        table_name: String,
        upstream: String,
        local: String,
    },

    #[error("Mismatched attributes for {table_name}: {upstream} VS {local}")]
    Attributes {
        table_name: String,
        upstream: String,
        local: String,
    },
}
