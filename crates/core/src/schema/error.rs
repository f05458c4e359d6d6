use thiserror::Error;

/// Errors raised while turning configuration into typed schema objects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown table: {table_name}")]
    UnknownTable { table_name: String },

    #[error("Unknown key type '{token}' for attribute '{attribute}'")]
    UnknownKeyKind { attribute: String, token: String },

    #[error("Unknown data type '{token}' for attribute '{attribute}'")]
    UnknownDataType { attribute: String, token: String },

    #[error("Unknown index type '{token}' for index '{index}'")]
    UnknownIndexKind { index: String, token: String },

    #[error("Index '{index}' of type '{token}' cannot be declared under '{section}'")]
    IndexScopeMismatch {
        index: String,
        token: String,
        section: &'static str,
    },

    #[error("Invalid primary key: {reason}")]
    InvalidPrimaryKey { reason: String },

    #[error("Duplicate index name '{index}' in table '{table_name}'")]
    DuplicateIndex { table_name: String, index: String },

    #[error("Throughput for {target} must be positive, got read={read}, write={write}")]
    InvalidThroughput { target: String, read: u64, write: u64 },

    #[error("No throughput declared for {target} and no default_throughput configured")]
    MissingThroughput { target: String },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_table_display() {
        let error = SchemaError::UnknownTable {
            table_name: "ghosts".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown table: ghosts");
    }

    #[test]
    fn test_unknown_index_kind_display() {
        let error = SchemaError::UnknownIndexKind {
            index: "ByEmail".to_string(),
            token: "GlobalEverythingIndex".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unknown index type 'GlobalEverythingIndex' for index 'ByEmail'"
        );
    }

    #[test]
    fn test_index_scope_mismatch_display() {
        let error = SchemaError::IndexScopeMismatch {
            index: "ByCreated".to_string(),
            token: "AllIndex".to_string(),
            section: "global_indexes",
        };
        assert_eq!(
            error.to_string(),
            "Index 'ByCreated' of type 'AllIndex' cannot be declared under 'global_indexes'"
        );
    }
}
