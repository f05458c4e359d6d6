//! Raw shape of the schema configuration file.
//!
//! These types mirror the YAML document one-to-one. Token fields (`type`,
//! `data_type`) stay as strings here; the schema builder turns them into
//! closed enums and reports unknown tokens.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Result;

/// The whole schema configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Primary key declaration per logical table name.
    #[serde(default)]
    pub schemas: BTreeMap<String, Vec<RawKey>>,
    /// Global secondary indexes per logical table name.
    #[serde(default)]
    pub global_indexes: BTreeMap<String, Vec<RawIndex>>,
    /// Local secondary indexes per logical table name.
    #[serde(default)]
    pub indexes: BTreeMap<String, Vec<RawIndex>>,
    /// Optional column type hints per logical table name.
    #[serde(default)]
    pub columns: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_throughput: Option<RawThroughput>,
}

/// A key attribute as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawKey {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data_type: String,
}

/// A secondary index as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIndex {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parts: Vec<RawKey>,
    /// Non-key attributes projected by `*IncludeIndex` kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<RawThroughput>,
}

/// Provisioned capacity as written in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawThroughput {
    #[serde(alias = "read")]
    pub read_capacity: u64,
    #[serde(alias = "write")]
    pub write_capacity: u64,
}

impl SchemaFile {
    /// Parses a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Serializes the document back to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
