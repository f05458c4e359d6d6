//! Snapshot of a deployed table as reported by the service.

use crate::schema::{DataType, KeyKind, Throughput};

/// Table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

/// Index status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Active,
    Creating,
    Updating,
    Deleting,
}

/// One entry of the upstream key schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeySchemaEntry {
    pub attribute_name: String,
    pub kind: KeyKind,
}

/// One entry of the upstream attribute definitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AttributeDefinitionEntry {
    pub attribute_name: String,
    pub data_type: DataType,
}

/// A global secondary index that exists upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamIndex {
    pub name: String,
    pub status: IndexStatus,
    /// Absent for on-demand tables.
    pub throughput: Option<Throughput>,
}

/// Read-only view of a deployed table, fetched once per reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamDescription {
    pub table_name: String,
    pub status: TableStatus,
    pub key_schema: Vec<KeySchemaEntry>,
    pub attribute_definitions: Vec<AttributeDefinitionEntry>,
    pub global_indexes: Vec<UpstreamIndex>,
    pub throughput: Option<Throughput>,
}

impl UpstreamDescription {
    pub fn global_index_names(&self) -> Vec<&str> {
        self.global_indexes.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn global_index(&self, name: &str) -> Option<&UpstreamIndex> {
        self.global_indexes.iter().find(|i| i.name == name)
    }

    /// True when the table and every global index are active.
    pub fn is_active(&self) -> bool {
        self.status == TableStatus::Active
            && self
                .global_indexes
                .iter()
                .all(|i| i.status == IndexStatus::Active)
    }
}
