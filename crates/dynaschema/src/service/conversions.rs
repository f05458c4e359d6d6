//! Conversions between schema types and AWS SDK types.

use aws_sdk_dynamodb::types::{
    AttributeDefinition, GlobalSecondaryIndex, KeySchemaElement, KeyType, LocalSecondaryIndex,
    Projection, ProjectionType, ProvisionedThroughput, ProvisionedThroughputDescription,
    ScalarAttributeType, TableDescription,
};
use dynaschema_core::reconcile::{
    AttributeDefinitionEntry, IndexStatus, KeySchemaEntry, TableStatus, UpstreamDescription,
    UpstreamIndex,
};
use dynaschema_core::schema::{
    DataType, IndexDescriptor, KeyDescriptor, KeyKind, ProjectionKind, Throughput,
};

use super::{ServiceError, ServiceResult};

pub(super) fn to_key_type(kind: KeyKind) -> KeyType {
    match kind {
        KeyKind::Hash => KeyType::Hash,
        KeyKind::Range => KeyType::Range,
    }
}

pub(super) fn to_scalar_type(data_type: DataType) -> ScalarAttributeType {
    match data_type {
        DataType::String => ScalarAttributeType::S,
        DataType::Number => ScalarAttributeType::N,
        DataType::Binary => ScalarAttributeType::B,
    }
}

/// Key schema elements with the hash key first.
pub(super) fn key_schema(
    operation: &'static str,
    keys: &[KeyDescriptor],
) -> ServiceResult<Vec<KeySchemaElement>> {
    let mut ordered: Vec<&KeyDescriptor> = keys.iter().collect();
    ordered.sort_by_key(|key| key.kind);

    ordered
        .into_iter()
        .map(|key| {
            KeySchemaElement::builder()
                .attribute_name(&key.name)
                .key_type(to_key_type(key.kind))
                .build()
                .map_err(|e| ServiceError::client(operation, e.to_string()))
        })
        .collect()
}

pub(super) fn attribute_definitions(
    operation: &'static str,
    definitions: &[(&str, DataType)],
) -> ServiceResult<Vec<AttributeDefinition>> {
    definitions
        .iter()
        .map(|(name, data_type)| {
            AttributeDefinition::builder()
                .attribute_name(*name)
                .attribute_type(to_scalar_type(*data_type))
                .build()
                .map_err(|e| ServiceError::client(operation, e.to_string()))
        })
        .collect()
}

pub(super) fn provisioned_throughput(
    operation: &'static str,
    throughput: Throughput,
) -> ServiceResult<ProvisionedThroughput> {
    let capacity = |units: u64| {
        i64::try_from(units)
            .map_err(|_| ServiceError::client(operation, format!("capacity {units} out of range")))
    };

    ProvisionedThroughput::builder()
        .read_capacity_units(capacity(throughput.read_capacity)?)
        .write_capacity_units(capacity(throughput.write_capacity)?)
        .build()
        .map_err(|e| ServiceError::client(operation, e.to_string()))
}

pub(super) fn projection(index: &IndexDescriptor) -> Projection {
    match index.kind.projection() {
        ProjectionKind::All => Projection::builder()
            .projection_type(ProjectionType::All)
            .build(),
        ProjectionKind::KeysOnly => Projection::builder()
            .projection_type(ProjectionType::KeysOnly)
            .build(),
        ProjectionKind::Include => Projection::builder()
            .projection_type(ProjectionType::Include)
            .set_non_key_attributes(Some(index.includes.clone()))
            .build(),
    }
}

/// Rejects an index whose key schema has no hash key.
pub(super) fn require_hash_key(
    operation: &'static str,
    index_name: &str,
    key_parts: &[KeyDescriptor],
) -> ServiceResult<()> {
    if key_parts.iter().any(|key| key.kind == KeyKind::Hash) {
        Ok(())
    } else {
        Err(ServiceError::client(
            operation,
            format!("index '{index_name}' has no hash key"),
        ))
    }
}

pub(super) fn global_secondary_index(
    operation: &'static str,
    index: &IndexDescriptor,
    table_hash_key: Option<&KeyDescriptor>,
) -> ServiceResult<GlobalSecondaryIndex> {
    let mut builder = GlobalSecondaryIndex::builder()
        .index_name(&index.name)
        .set_key_schema(Some(key_schema(
            operation,
            &index.resolved_key_parts(table_hash_key),
        )?))
        .projection(projection(index));

    if let Some(throughput) = index.throughput {
        builder = builder.provisioned_throughput(provisioned_throughput(operation, throughput)?);
    }

    builder
        .build()
        .map_err(|e| ServiceError::client(operation, e.to_string()))
}

pub(super) fn local_secondary_index(
    operation: &'static str,
    index: &IndexDescriptor,
    table_hash_key: Option<&KeyDescriptor>,
) -> ServiceResult<LocalSecondaryIndex> {
    LocalSecondaryIndex::builder()
        .index_name(&index.name)
        .set_key_schema(Some(key_schema(
            operation,
            &index.resolved_key_parts(table_hash_key),
        )?))
        .projection(projection(index))
        .build()
        .map_err(|e| ServiceError::client(operation, e.to_string()))
}

fn throughput_from(description: Option<&ProvisionedThroughputDescription>) -> Option<Throughput> {
    let description = description?;
    let read = u64::try_from(description.read_capacity_units()?).ok()?;
    let write = u64::try_from(description.write_capacity_units()?).ok()?;
    Throughput::new(read, write)
}

/// Converts a DescribeTable response into an upstream snapshot.
pub(super) fn upstream_description(
    operation: &'static str,
    table: &TableDescription,
) -> ServiceResult<UpstreamDescription> {
    let key_schema = table
        .key_schema()
        .iter()
        .map(|element| {
            let kind = match element.key_type() {
                KeyType::Hash => KeyKind::Hash,
                KeyType::Range => KeyKind::Range,
                other => {
                    return Err(ServiceError::client(
                        operation,
                        format!("unsupported key type {}", other.as_str()),
                    ))
                }
            };
            Ok(KeySchemaEntry {
                attribute_name: element.attribute_name().to_string(),
                kind,
            })
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    let attribute_definitions = table
        .attribute_definitions()
        .iter()
        .map(|definition| {
            let data_type = match definition.attribute_type() {
                ScalarAttributeType::S => DataType::String,
                ScalarAttributeType::N => DataType::Number,
                ScalarAttributeType::B => DataType::Binary,
                other => {
                    return Err(ServiceError::client(
                        operation,
                        format!("unsupported attribute type {}", other.as_str()),
                    ))
                }
            };
            Ok(AttributeDefinitionEntry {
                attribute_name: definition.attribute_name().to_string(),
                data_type,
            })
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    let global_indexes = table
        .global_secondary_indexes()
        .iter()
        .map(|gsi| UpstreamIndex {
            name: gsi.index_name().unwrap_or_default().to_string(),
            status: match gsi.index_status() {
                Some(aws_sdk_dynamodb::types::IndexStatus::Active) => IndexStatus::Active,
                Some(aws_sdk_dynamodb::types::IndexStatus::Creating) => IndexStatus::Creating,
                Some(aws_sdk_dynamodb::types::IndexStatus::Updating) => IndexStatus::Updating,
                Some(aws_sdk_dynamodb::types::IndexStatus::Deleting) => IndexStatus::Deleting,
                _ => IndexStatus::Active,
            },
            throughput: throughput_from(gsi.provisioned_throughput()),
        })
        .collect();

    let status = match table.table_status() {
        Some(aws_sdk_dynamodb::types::TableStatus::Active) => TableStatus::Active,
        Some(aws_sdk_dynamodb::types::TableStatus::Creating) => TableStatus::Creating,
        Some(aws_sdk_dynamodb::types::TableStatus::Updating) => TableStatus::Updating,
        Some(aws_sdk_dynamodb::types::TableStatus::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Active,
    };

    Ok(UpstreamDescription {
        table_name: table.table_name().unwrap_or_default().to_string(),
        status,
        key_schema,
        attribute_definitions,
        global_indexes,
        throughput: throughput_from(table.provisioned_throughput()),
    })
}
