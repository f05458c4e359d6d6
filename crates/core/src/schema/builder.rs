//! Pure functions turning raw configuration into typed schema objects.

use std::collections::HashSet;

use super::{
    DataType, IndexDescriptor, IndexKind, KeyDescriptor, KeyKind, Result, SchemaError, TableSchema,
    Throughput,
};
use crate::config::{Config, RawIndex, RawKey, RawThroughput};

/// Builds one key attribute.
pub fn build_key(raw: &RawKey) -> Result<KeyDescriptor> {
    let kind = KeyKind::from_token(&raw.kind).ok_or_else(|| SchemaError::UnknownKeyKind {
        attribute: raw.name.clone(),
        token: raw.kind.clone(),
    })?;
    let data_type =
        DataType::from_token(&raw.data_type).ok_or_else(|| SchemaError::UnknownDataType {
            attribute: raw.name.clone(),
            token: raw.data_type.clone(),
        })?;

    Ok(KeyDescriptor {
        name: raw.name.clone(),
        kind,
        data_type,
    })
}

/// Builds a table primary key: one hash key and at most one range key, in
/// declaration order.
pub fn build_primary_key(raw_keys: &[RawKey]) -> Result<Vec<KeyDescriptor>> {
    let keys = raw_keys.iter().map(build_key).collect::<Result<Vec<_>>>()?;

    let hash_count = keys.iter().filter(|k| k.kind == KeyKind::Hash).count();
    let range_count = keys.len() - hash_count;
    let invalid = |reason: String| Err(SchemaError::InvalidPrimaryKey { reason });

    if keys.is_empty() || keys.len() > 2 {
        return invalid(format!("expected 1 or 2 attributes, got {}", keys.len()));
    }
    if hash_count != 1 {
        return invalid(format!("expected exactly one hash key, got {hash_count}"));
    }
    if range_count > 1 {
        return invalid(format!("expected at most one range key, got {range_count}"));
    }
    if keys.len() == 2 && keys[0].name == keys[1].name {
        return invalid(format!("attribute '{}' declared twice", keys[0].name));
    }

    Ok(keys)
}

/// Validates a raw throughput pair. `target` names the table or index for
/// error messages.
pub fn build_throughput(raw: RawThroughput, target: &str) -> Result<Throughput> {
    Throughput::new(raw.read_capacity, raw.write_capacity).ok_or_else(|| {
        SchemaError::InvalidThroughput {
            target: target.to_string(),
            read: raw.read_capacity,
            write: raw.write_capacity,
        }
    })
}

/// Builds one secondary index.
///
/// Global indexes get their declared throughput, else `default_throughput`.
/// Local indexes share the table's capacity and never carry a throughput.
pub fn build_index(raw: &RawIndex, default_throughput: Option<Throughput>) -> Result<IndexDescriptor> {
    let kind = IndexKind::from_token(&raw.kind).ok_or_else(|| SchemaError::UnknownIndexKind {
        index: raw.name.clone(),
        token: raw.kind.clone(),
    })?;
    let key_parts = raw.parts.iter().map(build_key).collect::<Result<Vec<_>>>()?;

    let target = format!("index '{}'", raw.name);
    let throughput = if kind.is_global() {
        let declared = raw
            .throughput
            .map(|t| build_throughput(t, &target))
            .transpose()?;
        Some(
            declared
                .or(default_throughput)
                .ok_or(SchemaError::MissingThroughput { target })?,
        )
    } else {
        None
    };

    Ok(IndexDescriptor {
        name: raw.name.clone(),
        kind,
        key_parts,
        includes: raw.includes.clone(),
        throughput,
    })
}

/// Builds a list of secondary indexes, preserving declaration order.
pub fn build_indexes(
    raw_indexes: &[RawIndex],
    default_throughput: Option<Throughput>,
) -> Result<Vec<IndexDescriptor>> {
    raw_indexes
        .iter()
        .map(|raw| build_index(raw, default_throughput))
        .collect()
}

/// Reads and validates `default_throughput`.
pub fn default_throughput(config: &Config) -> Result<Option<Throughput>> {
    config
        .schema
        .default_throughput
        .map(|raw| build_throughput(raw, "default_throughput"))
        .transpose()
}

/// Builds the full schema of a declared table.
pub fn build_table_schema(config: &Config, logical_name: &str) -> Result<TableSchema> {
    let Some(keys_config) = config.schema.schemas.get(logical_name) else {
        tracing::error!(
            event = "dynaschema.unknown_table",
            table_name = logical_name,
            "Unknown table"
        );
        return Err(SchemaError::UnknownTable {
            table_name: logical_name.to_string(),
        });
    };

    let default_throughput = default_throughput(config)?;
    let primary_key = build_primary_key(keys_config)?;
    let global_indexes = build_indexes(
        indexes_for(&config.schema.global_indexes, logical_name),
        default_throughput,
    )?;
    check_index_scope(&global_indexes, true)?;
    let local_indexes = build_indexes(
        indexes_for(&config.schema.indexes, logical_name),
        default_throughput,
    )?;
    check_index_scope(&local_indexes, false)?;

    let mut seen = HashSet::new();
    for index in global_indexes.iter().chain(local_indexes.iter()) {
        if !seen.insert(index.name.as_str()) {
            return Err(SchemaError::DuplicateIndex {
                table_name: logical_name.to_string(),
                index: index.name.clone(),
            });
        }
    }

    Ok(TableSchema {
        logical_name: logical_name.to_string(),
        table_name: config.table_name(logical_name),
        primary_key,
        global_indexes,
        local_indexes,
        default_throughput,
    })
}

/// Picks the explicit throughput, falling back to the table's default.
pub fn resolve_throughput(explicit: Option<Throughput>, schema: &TableSchema) -> Result<Throughput> {
    explicit
        .or(schema.default_throughput)
        .ok_or_else(|| SchemaError::MissingThroughput {
            target: format!("table '{}'", schema.logical_name),
        })
}

/// `global_indexes` only holds global kinds, `indexes` only local ones.
fn check_index_scope(indexes: &[IndexDescriptor], global: bool) -> Result<()> {
    match indexes.iter().find(|index| index.kind.is_global() != global) {
        Some(index) => Err(SchemaError::IndexScopeMismatch {
            index: index.name.clone(),
            token: index.kind.token().to_string(),
            section: if global { "global_indexes" } else { "indexes" },
        }),
        None => Ok(()),
    }
}

fn indexes_for<'a>(
    indexes: &'a std::collections::BTreeMap<String, Vec<RawIndex>>,
    logical_name: &str,
) -> &'a [RawIndex] {
    indexes
        .get(logical_name)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, SchemaFile};

    fn raw_key(name: &str, kind: &str, data_type: &str) -> RawKey {
        RawKey {
            name: name.to_string(),
            kind: kind.to_string(),
            data_type: data_type.to_string(),
        }
    }

    fn raw_index(name: &str, kind: &str, parts: Vec<RawKey>) -> RawIndex {
        RawIndex {
            name: name.to_string(),
            kind: kind.to_string(),
            parts,
            includes: vec![],
            throughput: None,
        }
    }

    fn config_from_yaml(yaml: &str) -> Config {
        let schema = SchemaFile::from_yaml_str(yaml).unwrap();
        let overrides = ConfigOverrides::default()
            .namespace("test_")
            .credentials("key", "secret");
        Config::from_sources(schema, overrides, |_| None).unwrap()
    }

    const TABLES: &str = r#"
default_throughput: {read: 5, write: 5}
schemas:
  change_in_condition:
    - {name: carecenter_id, type: HashKey, data_type: NUMBER}
    - {name: time, type: RangeKey, data_type: NUMBER}
global_indexes:
  change_in_condition:
    - name: SessionId
      type: GlobalAllIndex
      parts:
        - {name: session_id, type: HashKey, data_type: STRING}
        - {name: time, type: RangeKey, data_type: NUMBER}
      throughput: {read: 15, write: 10}
    - name: ByPatient
      type: GlobalKeysOnlyIndex
      parts:
        - {name: patient_id, type: HashKey, data_type: STRING}
indexes:
  change_in_condition:
    - name: ByRisk
      type: AllIndex
      parts:
        - {name: carecenter_id, type: HashKey, data_type: NUMBER}
        - {name: risk, type: RangeKey, data_type: NUMBER}
"#;

    #[test]
    fn test_build_primary_key_hash_and_range() {
        let keys = build_primary_key(&[
            raw_key("id", "HashKey", "STRING"),
            raw_key("time", "RangeKey", "NUMBER"),
        ])
        .unwrap();

        assert_eq!(
            keys,
            vec![
                KeyDescriptor::hash("id", DataType::String),
                KeyDescriptor::range("time", DataType::Number),
            ]
        );
    }

    #[test]
    fn test_primary_key_round_trip() {
        let raw = vec![
            raw_key("id", "HashKey", "STRING"),
            raw_key("time", "RangeKey", "NUMBER"),
        ];
        let keys = build_primary_key(&raw).unwrap();
        let reserialized: Vec<RawKey> = keys.iter().map(KeyDescriptor::to_raw).collect();

        assert_eq!(reserialized, raw);
        assert_eq!(build_primary_key(&reserialized).unwrap(), keys);
    }

    #[test]
    fn test_alternate_tokens_build_the_same_keys() {
        let canonical = build_primary_key(&[raw_key("id", "HashKey", "BINARY")]).unwrap();
        let short = build_primary_key(&[raw_key("id", "Hash", "B")]).unwrap();
        assert_eq!(canonical, short);
    }

    #[test]
    fn test_unknown_key_kind() {
        let result = build_primary_key(&[raw_key("id", "PartitionKey", "STRING")]);
        assert_eq!(
            result,
            Err(SchemaError::UnknownKeyKind {
                attribute: "id".to_string(),
                token: "PartitionKey".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_data_type() {
        let result = build_primary_key(&[raw_key("id", "HashKey", "BOOLEAN")]);
        assert!(matches!(result, Err(SchemaError::UnknownDataType { .. })));
    }

    #[test]
    fn test_primary_key_shape_is_validated() {
        assert!(matches!(
            build_primary_key(&[]),
            Err(SchemaError::InvalidPrimaryKey { .. })
        ));
        assert!(matches!(
            build_primary_key(&[raw_key("time", "RangeKey", "NUMBER")]),
            Err(SchemaError::InvalidPrimaryKey { .. })
        ));
        assert!(matches!(
            build_primary_key(&[
                raw_key("a", "HashKey", "STRING"),
                raw_key("b", "HashKey", "STRING"),
            ]),
            Err(SchemaError::InvalidPrimaryKey { .. })
        ));
        assert!(matches!(
            build_primary_key(&[
                raw_key("a", "HashKey", "STRING"),
                raw_key("b", "RangeKey", "STRING"),
                raw_key("c", "RangeKey", "STRING"),
            ]),
            Err(SchemaError::InvalidPrimaryKey { .. })
        ));
    }

    #[test]
    fn test_index_without_parts_is_valid() {
        let index = build_index(&raw_index("ByTime", "KeysOnlyIndex", vec![]), None).unwrap();
        assert!(index.key_parts.is_empty());
        assert!(index.throughput.is_none());
    }

    #[test]
    fn test_unknown_index_kind() {
        let result = build_index(&raw_index("ByTime", "SparseIndex", vec![]), None);
        assert!(matches!(result, Err(SchemaError::UnknownIndexKind { .. })));
    }

    #[test]
    fn test_global_index_falls_back_to_default_throughput() {
        let default = Throughput::new(3, 2);
        let index = build_index(
            &raw_index(
                "ByUser",
                "GlobalAllIndex",
                vec![raw_key("user", "HashKey", "STRING")],
            ),
            default,
        )
        .unwrap();
        assert_eq!(index.throughput, default);
    }

    #[test]
    fn test_global_index_without_any_throughput() {
        let result = build_index(&raw_index("ByUser", "GlobalAllIndex", vec![]), None);
        assert!(matches!(result, Err(SchemaError::MissingThroughput { .. })));
    }

    #[test]
    fn test_zero_throughput_is_rejected() {
        let mut raw = raw_index("ByUser", "GlobalAllIndex", vec![]);
        raw.throughput = Some(RawThroughput {
            read_capacity: 0,
            write_capacity: 1,
        });
        let result = build_index(&raw, Throughput::new(1, 1));
        assert!(matches!(
            result,
            Err(SchemaError::InvalidThroughput { read: 0, .. })
        ));
    }

    #[test]
    fn test_index_round_trip() {
        let mut raw = raw_index(
            "ByUser",
            "GlobalIncludeIndex",
            vec![raw_key("user", "HashKey", "STRING")],
        );
        raw.includes = vec!["email".to_string()];
        raw.throughput = Some(RawThroughput {
            read_capacity: 4,
            write_capacity: 2,
        });

        let index = build_index(&raw, None).unwrap();
        assert_eq!(index.to_raw(), raw);
    }

    #[test]
    fn test_build_table_schema() {
        let config = config_from_yaml(TABLES);
        let schema = build_table_schema(&config, "change_in_condition").unwrap();

        assert_eq!(schema.table_name, "test_change_in_condition");
        assert_eq!(schema.primary_key.len(), 2);
        assert_eq!(schema.default_throughput, Throughput::new(5, 5));

        let names: Vec<_> = schema.global_indexes.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["SessionId", "ByPatient"]);
        assert_eq!(
            schema.global_index("SessionId").and_then(|i| i.throughput),
            Throughput::new(15, 10)
        );
        assert_eq!(
            schema.global_index("ByPatient").and_then(|i| i.throughput),
            Throughput::new(5, 5)
        );
        assert_eq!(schema.local_indexes.len(), 1);
        assert!(schema.local_indexes[0].throughput.is_none());
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = config_from_yaml(TABLES);
        assert_eq!(
            build_table_schema(&config, "change_in_condition"),
            build_table_schema(&config, "change_in_condition")
        );
    }

    #[test]
    fn test_unknown_table() {
        let config = config_from_yaml(TABLES);
        let result = build_table_schema(&config, "missing");
        assert_eq!(
            result,
            Err(SchemaError::UnknownTable {
                table_name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_index_names() {
        let config = config_from_yaml(
            r#"
schemas:
  users:
    - {name: id, type: HashKey, data_type: STRING}
global_indexes:
  users:
    - {name: ByEmail, type: GlobalAllIndex, throughput: {read: 1, write: 1}}
indexes:
  users:
    - {name: ByEmail, type: AllIndex}
"#,
        );
        let result = build_table_schema(&config, "users");
        assert!(matches!(result, Err(SchemaError::DuplicateIndex { .. })));
    }

    #[test]
    fn test_local_index_kind_under_global_indexes() {
        let config = config_from_yaml(
            r#"
schemas:
  users:
    - {name: id, type: HashKey, data_type: STRING}
    - {name: time, type: RangeKey, data_type: NUMBER}
default_throughput: {read: 1, write: 1}
global_indexes:
  users:
    - name: ByCreated
      type: AllIndex
      parts:
        - {name: created, type: RangeKey, data_type: NUMBER}
"#,
        );
        let result = build_table_schema(&config, "users");
        assert_eq!(
            result,
            Err(SchemaError::IndexScopeMismatch {
                index: "ByCreated".to_string(),
                token: "AllIndex".to_string(),
                section: "global_indexes",
            })
        );
    }

    #[test]
    fn test_global_index_kind_under_indexes() {
        let config = config_from_yaml(
            r#"
schemas:
  users:
    - {name: id, type: HashKey, data_type: STRING}
default_throughput: {read: 1, write: 1}
indexes:
  users:
    - name: ByEmail
      type: GlobalKeysOnlyIndex
      parts:
        - {name: email, type: HashKey, data_type: STRING}
"#,
        );
        let result = build_table_schema(&config, "users");
        assert!(matches!(
            result,
            Err(SchemaError::IndexScopeMismatch { ref index, section: "indexes", .. })
                if index == "ByEmail"
        ));
    }

    #[test]
    fn test_resolve_throughput() {
        let config = config_from_yaml(TABLES);
        let schema = build_table_schema(&config, "change_in_condition").unwrap();

        assert_eq!(
            resolve_throughput(Throughput::new(20, 20), &schema),
            Ok(Throughput::new(20, 20).unwrap())
        );
        assert_eq!(
            resolve_throughput(None, &schema),
            Ok(Throughput::new(5, 5).unwrap())
        );

        let bare = TableSchema {
            default_throughput: None,
            ..schema
        };
        assert!(matches!(
            resolve_throughput(None, &bare),
            Err(SchemaError::MissingThroughput { .. })
        ));
    }
}
