//! Metadata lookups over the declared tables.

use std::collections::BTreeMap;

use super::{build_index, default_throughput, DataType, IndexDescriptor, Result, SchemaError};
use crate::config::Config;

/// Logical names of every declared table, without namespace.
pub fn list_table_names(config: &Config) -> Vec<String> {
    config.schema.schemas.keys().cloned().collect()
}

/// Known optional columns of a table and their data types.
pub fn table_columns(config: &Config, logical_name: &str) -> Result<BTreeMap<String, DataType>> {
    let Some(columns) = config.schema.columns.get(logical_name) else {
        tracing::error!(
            event = "dynaschema.unknown_table",
            table_name = logical_name,
            "Unknown table"
        );
        return Err(SchemaError::UnknownTable {
            table_name: logical_name.to_string(),
        });
    };

    columns
        .iter()
        .map(|(name, token)| {
            DataType::from_token(token)
                .map(|data_type| (name.clone(), data_type))
                .ok_or_else(|| SchemaError::UnknownDataType {
                    attribute: name.clone(),
                    token: token.clone(),
                })
        })
        .collect()
}

/// Finds an index declaration, local or global, by table and index name.
pub fn table_index(
    config: &Config,
    logical_name: &str,
    index_name: &str,
) -> Result<Option<IndexDescriptor>> {
    let declared = config
        .schema
        .indexes
        .get(logical_name)
        .into_iter()
        .chain(config.schema.global_indexes.get(logical_name))
        .flatten()
        .find(|raw| raw.name == index_name);

    match declared {
        Some(raw) => build_index(raw, default_throughput(config)?).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, SchemaFile};
    use crate::schema::IndexKind;

    fn config() -> Config {
        let schema = SchemaFile::from_yaml_str(
            r#"
default_throughput: {read: 2, write: 1}
schemas:
  users:
    - {name: id, type: HashKey, data_type: STRING}
  sessions:
    - {name: id, type: HashKey, data_type: STRING}
global_indexes:
  users:
    - {name: ByEmail, type: GlobalAllIndex, parts: [{name: email, type: HashKey, data_type: STRING}]}
indexes:
  users:
    - {name: ByCreated, type: KeysOnlyIndex}
columns:
  users:
    email: STRING
    age: NUMBER
  broken:
    blob: BLOB
"#,
        )
        .unwrap();
        let overrides = ConfigOverrides::default()
            .namespace("dev_")
            .credentials("key", "secret");
        Config::from_sources(schema, overrides, |_| None).unwrap()
    }

    #[test]
    fn test_list_table_names() {
        assert_eq!(list_table_names(&config()), vec!["sessions", "users"]);
    }

    #[test]
    fn test_table_columns() {
        let columns = table_columns(&config(), "users").unwrap();
        assert_eq!(columns.get("email"), Some(&DataType::String));
        assert_eq!(columns.get("age"), Some(&DataType::Number));
    }

    #[test]
    fn test_table_columns_for_undeclared_table() {
        assert_eq!(
            table_columns(&config(), "invoices"),
            Err(SchemaError::UnknownTable {
                table_name: "invoices".to_string()
            })
        );
    }

    #[test]
    fn test_table_columns_without_columns_section() {
        assert!(matches!(
            table_columns(&config(), "sessions"),
            Err(SchemaError::UnknownTable { .. })
        ));
    }

    #[test]
    fn test_table_columns_unknown_type() {
        assert!(matches!(
            table_columns(&config(), "broken"),
            Err(SchemaError::UnknownDataType { .. })
        ));
    }

    #[test]
    fn test_table_index_lookup() {
        let config = config();

        let global = table_index(&config, "users", "ByEmail").unwrap().unwrap();
        assert_eq!(global.kind, IndexKind::GlobalAll);
        assert_eq!(global.key_parts.len(), 1);

        let local = table_index(&config, "users", "ByCreated").unwrap().unwrap();
        assert_eq!(local.kind, IndexKind::KeysOnly);

        assert_eq!(table_index(&config, "users", "ByAge").unwrap(), None);
        assert_eq!(table_index(&config, "ghosts", "ByEmail").unwrap(), None);
    }
}
