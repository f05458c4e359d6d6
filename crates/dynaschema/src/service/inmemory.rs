//! In-memory table service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dynaschema_core::reconcile::{
    AttributeDefinitionEntry, IndexStatus, KeySchemaEntry, TableStatus, UpstreamDescription,
    UpstreamIndex,
};
use dynaschema_core::schema::{IndexDescriptor, KeyKind, TableSchema, Throughput};

use super::{ServiceError, ServiceResult, TableService, RESOURCE_IN_USE, RESOURCE_NOT_FOUND};

const VALIDATION: &str = "ValidationException";

/// A call received by [`InMemoryTableService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    DescribeTable {
        table_name: String,
    },
    CreateTable {
        table_name: String,
        throughput: Throughput,
    },
    UpdateTableThroughput {
        table_name: String,
        throughput: Throughput,
    },
    CreateGlobalIndex {
        table_name: String,
        index_name: String,
    },
    UpdateGlobalIndexThroughput {
        table_name: String,
        index_name: String,
        throughput: Throughput,
    },
    DeleteGlobalIndex {
        table_name: String,
        index_name: String,
    },
}

impl RecordedCall {
    /// True for every call except describe.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::DescribeTable { .. })
    }
}

/// In-memory table service for tests and local experimentation.
///
/// Tables live in a `HashMap` behind `Arc<RwLock<_>>`. Every call is recorded,
/// including the ones that fail. Created tables and indexes are immediately
/// active.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTableService {
    tables: Arc<RwLock<HashMap<String, UpstreamDescription>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    next_failure: Arc<RwLock<Option<ServiceError>>>,
}

impl InMemoryTableService {
    /// Creates a service with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service that already holds the given tables.
    pub fn with_tables(tables: impl IntoIterator<Item = UpstreamDescription>) -> Self {
        let tables = tables
            .into_iter()
            .map(|table| (table.table_name.clone(), table))
            .collect();
        Self {
            tables: Arc::new(RwLock::new(tables)),
            ..Self::default()
        }
    }

    pub async fn insert_table(&self, table: UpstreamDescription) {
        let mut tables = self.tables.write().await;
        tables.insert(table.table_name.clone(), table);
    }

    pub async fn table(&self, table_name: &str) -> Option<UpstreamDescription> {
        let tables = self.tables.read().await;
        tables.get(table_name).cloned()
    }

    /// Makes the next call fail with `error`, whatever it is.
    pub async fn fail_next(&self, error: ServiceError) {
        *self.next_failure.write().await = Some(error);
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub async fn mutations(&self) -> Vec<RecordedCall> {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.is_mutation())
            .cloned()
            .collect()
    }

    pub async fn clear_calls(&self) {
        self.calls.write().await.clear();
    }

    async fn record(&self, call: RecordedCall) -> ServiceResult<()> {
        self.calls.write().await.push(call);
        match self.next_failure.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn table_not_found(operation: &'static str, table_name: &str) -> ServiceError {
    ServiceError::service(
        operation,
        RESOURCE_NOT_FOUND,
        format!("Requested resource not found: Table: {table_name} not found"),
    )
}

fn index_not_found(operation: &'static str, index_name: &str) -> ServiceError {
    ServiceError::service(
        operation,
        RESOURCE_NOT_FOUND,
        format!("Requested resource not found: Index: {index_name} not found"),
    )
}

fn upstream_from_schema(schema: &TableSchema, throughput: Throughput) -> UpstreamDescription {
    UpstreamDescription {
        table_name: schema.table_name.clone(),
        status: TableStatus::Active,
        key_schema: schema
            .primary_key
            .iter()
            .map(|key| KeySchemaEntry {
                attribute_name: key.name.clone(),
                kind: key.kind,
            })
            .collect(),
        attribute_definitions: schema
            .attribute_definitions()
            .into_iter()
            .map(|(name, data_type)| AttributeDefinitionEntry {
                attribute_name: name.to_string(),
                data_type,
            })
            .collect(),
        global_indexes: schema
            .global_indexes
            .iter()
            .map(|index| UpstreamIndex {
                name: index.name.clone(),
                status: IndexStatus::Active,
                throughput: index.throughput,
            })
            .collect(),
        throughput: Some(throughput),
    }
}

#[async_trait]
impl TableService for InMemoryTableService {
    async fn describe_table(&self, table_name: &str) -> ServiceResult<UpstreamDescription> {
        self.record(RecordedCall::DescribeTable {
            table_name: table_name.to_string(),
        })
        .await?;

        self.table(table_name)
            .await
            .ok_or_else(|| table_not_found("DescribeTable", table_name))
    }

    async fn create_table(&self, schema: &TableSchema, throughput: Throughput) -> ServiceResult<()> {
        self.record(RecordedCall::CreateTable {
            table_name: schema.table_name.clone(),
            throughput,
        })
        .await?;

        let mut tables = self.tables.write().await;
        if tables.contains_key(&schema.table_name) {
            return Err(ServiceError::service(
                "CreateTable",
                RESOURCE_IN_USE,
                format!("Table already exists: {}", schema.table_name),
            ));
        }
        tables.insert(
            schema.table_name.clone(),
            upstream_from_schema(schema, throughput),
        );
        Ok(())
    }

    async fn update_table_throughput(
        &self,
        table_name: &str,
        throughput: Throughput,
    ) -> ServiceResult<()> {
        self.record(RecordedCall::UpdateTableThroughput {
            table_name: table_name.to_string(),
            throughput,
        })
        .await?;

        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found("UpdateTable", table_name))?;
        table.throughput = Some(throughput);
        Ok(())
    }

    async fn create_global_index(
        &self,
        table_name: &str,
        index: &IndexDescriptor,
    ) -> ServiceResult<()> {
        self.record(RecordedCall::CreateGlobalIndex {
            table_name: table_name.to_string(),
            index_name: index.name.clone(),
        })
        .await?;

        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found("UpdateTable", table_name))?;
        if table.global_index(&index.name).is_some() {
            return Err(ServiceError::service(
                "UpdateTable",
                VALIDATION,
                format!("Attempting to create an index which already exists: {}", index.name),
            ));
        }
        if !index.key_parts.iter().any(|key| key.kind == KeyKind::Hash) {
            return Err(ServiceError::service(
                "UpdateTable",
                VALIDATION,
                format!("No hash key in key schema of index {}", index.name),
            ));
        }

        for key in &index.key_parts {
            if !table
                .attribute_definitions
                .iter()
                .any(|definition| definition.attribute_name == key.name)
            {
                table.attribute_definitions.push(AttributeDefinitionEntry {
                    attribute_name: key.name.clone(),
                    data_type: key.data_type,
                });
            }
        }
        table.global_indexes.push(UpstreamIndex {
            name: index.name.clone(),
            status: IndexStatus::Active,
            throughput: index.throughput,
        });
        Ok(())
    }

    async fn update_global_index_throughput(
        &self,
        table_name: &str,
        index_name: &str,
        throughput: Throughput,
    ) -> ServiceResult<()> {
        self.record(RecordedCall::UpdateGlobalIndexThroughput {
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
            throughput,
        })
        .await?;

        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found("UpdateTable", table_name))?;
        let index = table
            .global_indexes
            .iter_mut()
            .find(|index| index.name == index_name)
            .ok_or_else(|| index_not_found("UpdateTable", index_name))?;
        index.throughput = Some(throughput);
        Ok(())
    }

    async fn delete_global_index(&self, table_name: &str, index_name: &str) -> ServiceResult<()> {
        self.record(RecordedCall::DeleteGlobalIndex {
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        })
        .await?;

        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found("UpdateTable", table_name))?;
        let before = table.global_indexes.len();
        table.global_indexes.retain(|index| index.name != index_name);
        if table.global_indexes.len() == before {
            return Err(index_not_found("UpdateTable", index_name));
        }
        Ok(())
    }
}
