//! Primary key comparison between the local declaration and upstream.

use super::{AttributeDefinitionEntry, KeySchemaEntry, SchemaMismatch, UpstreamDescription};
use crate::schema::KeyDescriptor;

/// Fails when the upstream primary key differs from `local` in any attribute
/// name, key kind or data type. Order is irrelevant.
pub fn validate_primary_key(
    local: &[KeyDescriptor],
    upstream: &UpstreamDescription,
) -> Result<(), SchemaMismatch> {
    let mut upstream_schema = upstream.key_schema.clone();
    let mut upstream_attributes: Vec<AttributeDefinitionEntry> = upstream
        .attribute_definitions
        .iter()
        .filter(|definition| {
            upstream
                .key_schema
                .iter()
                .any(|key| key.attribute_name == definition.attribute_name)
        })
        .cloned()
        .collect();

    let mut local_schema: Vec<KeySchemaEntry> = local
        .iter()
        .map(|key| KeySchemaEntry {
            attribute_name: key.name.clone(),
            kind: key.kind,
        })
        .collect();
    let mut local_attributes: Vec<AttributeDefinitionEntry> = local
        .iter()
        .map(|key| AttributeDefinitionEntry {
            attribute_name: key.name.clone(),
            data_type: key.data_type,
        })
        .collect();

    upstream_schema.sort_by(|a, b| a.attribute_name.cmp(&b.attribute_name));
    local_schema.sort_by(|a, b| a.attribute_name.cmp(&b.attribute_name));
    upstream_attributes.sort_by(|a, b| a.attribute_name.cmp(&b.attribute_name));
    local_attributes.sort_by(|a, b| a.attribute_name.cmp(&b.attribute_name));

    if upstream_schema != local_schema {
        return Err(SchemaMismatch::KeySchema {
            table_name: upstream.table_name.clone(),
            upstream: format_key_schema(&upstream_schema),
            local: format_key_schema(&local_schema),
        });
    }

    if upstream_attributes != local_attributes {
        return Err(SchemaMismatch::Attributes {
            table_name: upstream.table_name.clone(),
            upstream: format_attributes(&upstream_attributes),
            local: format_attributes(&local_attributes),
        });
    }

    Ok(())
}

fn format_key_schema(entries: &[KeySchemaEntry]) -> String {
    let parts: Vec<String> = entries
        .iter()
        .map(|e| format!("{}:{}", e.attribute_name, e.kind))
        .collect();
    format!("[{}]", parts.join(", "))
}

fn format_attributes(entries: &[AttributeDefinitionEntry]) -> String {
    let parts: Vec<String> = entries
        .iter()
        .map(|e| format!("{}:{}", e.attribute_name, e.data_type))
        .collect();
    format!("[{}]", parts.join(", "))
}
