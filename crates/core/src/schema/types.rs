use std::fmt;

use crate::config::{RawIndex, RawKey, RawThroughput};

/// Role of an attribute in a key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyKind {
    /// Partition key.
    Hash,
    /// Sort key.
    Range,
}

impl KeyKind {
    /// Parses a configuration token (`HashKey`, `Hash`, `HASH`, ...).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "HashKey" | "Hash" | "HASH" => Some(Self::Hash),
            "RangeKey" | "Range" | "RANGE" => Some(Self::Range),
            _ => None,
        }
    }

    /// Canonical configuration token.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Hash => "HashKey",
            Self::Range => "RangeKey",
        }
    }

    /// Key type as spelled by the DynamoDB API.
    pub fn key_type(&self) -> &'static str {
        match self {
            Self::Hash => "HASH",
            Self::Range => "RANGE",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key_type())
    }
}

/// Scalar attribute types allowed in key schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    String,
    Number,
    Binary,
}

impl DataType {
    /// Parses a configuration token (`STRING`, `String`, `S`, ...).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "STRING" | "String" | "S" => Some(Self::String),
            "NUMBER" | "Number" | "N" => Some(Self::Number),
            "BINARY" | "Binary" | "B" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Canonical configuration token.
    pub fn token(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Binary => "BINARY",
        }
    }

    /// Attribute type as spelled by the DynamoDB API.
    pub fn attribute_type(&self) -> &'static str {
        match self {
            Self::String => "S",
            Self::Number => "N",
            Self::Binary => "B",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_type())
    }
}

/// A typed key attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyDescriptor {
    pub name: String,
    pub kind: KeyKind,
    pub data_type: DataType,
}

impl KeyDescriptor {
    pub fn hash(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            kind: KeyKind::Hash,
            data_type,
        }
    }

    pub fn range(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            kind: KeyKind::Range,
            data_type,
        }
    }

    /// Converts back to the configuration shape using canonical tokens.
    pub fn to_raw(&self) -> RawKey {
        RawKey {
            name: self.name.clone(),
            kind: self.kind.token().to_string(),
            data_type: self.data_type.token().to_string(),
        }
    }
}

impl fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.kind, self.data_type)
    }
}

/// Which attributes an index projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionKind {
    All,
    KeysOnly,
    Include,
}

/// Secondary index kinds accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    All,
    KeysOnly,
    Include,
    GlobalAll,
    GlobalKeysOnly,
    GlobalInclude,
}

impl IndexKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AllIndex" => Some(Self::All),
            "KeysOnlyIndex" => Some(Self::KeysOnly),
            "IncludeIndex" => Some(Self::Include),
            "GlobalAllIndex" => Some(Self::GlobalAll),
            "GlobalKeysOnlyIndex" => Some(Self::GlobalKeysOnly),
            "GlobalIncludeIndex" => Some(Self::GlobalInclude),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::All => "AllIndex",
            Self::KeysOnly => "KeysOnlyIndex",
            Self::Include => "IncludeIndex",
            Self::GlobalAll => "GlobalAllIndex",
            Self::GlobalKeysOnly => "GlobalKeysOnlyIndex",
            Self::GlobalInclude => "GlobalIncludeIndex",
        }
    }

    /// Whether the index is provisioned independently from the base table.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            Self::GlobalAll | Self::GlobalKeysOnly | Self::GlobalInclude
        )
    }

    pub fn projection(&self) -> ProjectionKind {
        match self {
            Self::All | Self::GlobalAll => ProjectionKind::All,
            Self::KeysOnly | Self::GlobalKeysOnly => ProjectionKind::KeysOnly,
            Self::Include | Self::GlobalInclude => ProjectionKind::Include,
        }
    }
}

/// Provisioned read/write capacity units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Throughput {
    pub read_capacity: u64,
    pub write_capacity: u64,
}

impl Throughput {
    /// Creates a throughput value. Both capacities must be positive; use
    /// [`crate::schema::build_throughput`] to get a descriptive error.
    pub fn new(read_capacity: u64, write_capacity: u64) -> Option<Self> {
        (read_capacity > 0 && write_capacity > 0).then_some(Self {
            read_capacity,
            write_capacity,
        })
    }

    pub fn to_raw(&self) -> RawThroughput {
        RawThroughput {
            read_capacity: self.read_capacity,
            write_capacity: self.write_capacity,
        }
    }
}

impl fmt::Display for Throughput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read={}, write={}",
            self.read_capacity, self.write_capacity
        )
    }
}

/// A typed secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: String,
    pub kind: IndexKind,
    /// May be empty: the index then relies on the table's own key.
    pub key_parts: Vec<KeyDescriptor>,
    /// Non-key attributes projected by include indexes.
    pub includes: Vec<String>,
    /// Present for global indexes only.
    pub throughput: Option<Throughput>,
}

impl IndexDescriptor {
    pub fn is_global(&self) -> bool {
        self.kind.is_global()
    }

    /// Key parts sent to the service. An index declared without a hash key
    /// reuses the table's hash key.
    pub fn resolved_key_parts(&self, table_hash_key: Option<&KeyDescriptor>) -> Vec<KeyDescriptor> {
        let has_hash = self.key_parts.iter().any(|k| k.kind == KeyKind::Hash);
        match table_hash_key {
            Some(hash_key) if !has_hash => std::iter::once(hash_key.clone())
                .chain(self.key_parts.iter().cloned())
                .collect(),
            _ => self.key_parts.clone(),
        }
    }

    /// The same index with [`Self::resolved_key_parts`] as its key parts.
    pub fn with_table_hash_key(&self, table_hash_key: Option<&KeyDescriptor>) -> Self {
        Self {
            key_parts: self.resolved_key_parts(table_hash_key),
            ..self.clone()
        }
    }

    pub fn to_raw(&self) -> RawIndex {
        RawIndex {
            name: self.name.clone(),
            kind: self.kind.token().to_string(),
            parts: self.key_parts.iter().map(KeyDescriptor::to_raw).collect(),
            includes: self.includes.clone(),
            throughput: self.throughput.map(|t| t.to_raw()),
        }
    }
}

/// Locally declared schema of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Name as declared in configuration.
    pub logical_name: String,
    /// Namespaced name used against the service.
    pub table_name: String,
    /// Hash key, optionally followed by a range key.
    pub primary_key: Vec<KeyDescriptor>,
    pub global_indexes: Vec<IndexDescriptor>,
    pub local_indexes: Vec<IndexDescriptor>,
    pub default_throughput: Option<Throughput>,
}

impl TableSchema {
    pub fn hash_key(&self) -> Option<&KeyDescriptor> {
        self.primary_key.iter().find(|k| k.kind == KeyKind::Hash)
    }

    pub fn range_key(&self) -> Option<&KeyDescriptor> {
        self.primary_key.iter().find(|k| k.kind == KeyKind::Range)
    }

    pub fn global_index(&self, name: &str) -> Option<&IndexDescriptor> {
        self.global_indexes.iter().find(|index| index.name == name)
    }

    /// Every attribute used by the table key or an index key, deduplicated by
    /// name. The first declaration wins.
    pub fn attribute_definitions(&self) -> Vec<(&str, DataType)> {
        let mut definitions: Vec<(&str, DataType)> = Vec::new();
        let keys = self.primary_key.iter().chain(
            self.global_indexes
                .iter()
                .chain(self.local_indexes.iter())
                .flat_map(|index| index.key_parts.iter()),
        );
        for key in keys {
            if !definitions.iter().any(|(name, _)| *name == key.name) {
                definitions.push((key.name.as_str(), key.data_type));
            }
        }
        definitions
    }
}
