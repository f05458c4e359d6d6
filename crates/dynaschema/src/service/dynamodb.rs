//! DynamoDB implementation of the table service (Imperative Shell).

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    CreateGlobalSecondaryIndexAction, DeleteGlobalSecondaryIndexAction,
    GlobalSecondaryIndexUpdate, UpdateGlobalSecondaryIndexAction,
};
use aws_sdk_dynamodb::Client;
use dynaschema_core::reconcile::UpstreamDescription;
use dynaschema_core::schema::{IndexDescriptor, TableSchema, Throughput};

use super::conversions::{
    attribute_definitions, global_secondary_index, key_schema, local_secondary_index, projection,
    provisioned_throughput, require_hash_key, upstream_description,
};
use super::{ServiceError, ServiceResult, TableService};

/// Table service backed by an AWS SDK client.
#[derive(Debug, Clone)]
pub struct DynamoDbService {
    client: Client,
}

impl DynamoDbService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client, for item reads and writes.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl TableService for DynamoDbService {
    async fn describe_table(&self, table_name: &str) -> ServiceResult<UpstreamDescription> {
        const OPERATION: &str = "DescribeTable";

        let response = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(OPERATION, e))?;

        let table = response
            .table()
            .ok_or_else(|| ServiceError::client(OPERATION, "response has no table description"))?;

        upstream_description(OPERATION, table)
    }

    async fn create_table(&self, schema: &TableSchema, throughput: Throughput) -> ServiceResult<()> {
        const OPERATION: &str = "CreateTable";

        let hash_key = schema.hash_key();
        let global_indexes = schema
            .global_indexes
            .iter()
            .map(|index| global_secondary_index(OPERATION, index, hash_key))
            .collect::<ServiceResult<Vec<_>>>()?;
        let local_indexes = schema
            .local_indexes
            .iter()
            .map(|index| local_secondary_index(OPERATION, index, hash_key))
            .collect::<ServiceResult<Vec<_>>>()?;

        let mut request = self
            .client
            .create_table()
            .table_name(&schema.table_name)
            .set_key_schema(Some(key_schema(OPERATION, &schema.primary_key)?))
            .set_attribute_definitions(Some(attribute_definitions(
                OPERATION,
                &schema.attribute_definitions(),
            )?))
            .provisioned_throughput(provisioned_throughput(OPERATION, throughput)?);

        if !global_indexes.is_empty() {
            request = request.set_global_secondary_indexes(Some(global_indexes));
        }
        if !local_indexes.is_empty() {
            request = request.set_local_secondary_indexes(Some(local_indexes));
        }

        request
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(OPERATION, e))?;
        Ok(())
    }

    async fn update_table_throughput(
        &self,
        table_name: &str,
        throughput: Throughput,
    ) -> ServiceResult<()> {
        const OPERATION: &str = "UpdateTable";

        self.client
            .update_table()
            .table_name(table_name)
            .provisioned_throughput(provisioned_throughput(OPERATION, throughput)?)
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(OPERATION, e))?;
        Ok(())
    }

    async fn create_global_index(
        &self,
        table_name: &str,
        index: &IndexDescriptor,
    ) -> ServiceResult<()> {
        const OPERATION: &str = "UpdateTable";

        let key_parts = &index.key_parts;
        require_hash_key(OPERATION, &index.name, key_parts)?;
        let definitions: Vec<_> = key_parts
            .iter()
            .map(|key| (key.name.as_str(), key.data_type))
            .collect();

        let mut action = CreateGlobalSecondaryIndexAction::builder()
            .index_name(&index.name)
            .set_key_schema(Some(key_schema(OPERATION, key_parts)?))
            .projection(projection(index));
        if let Some(throughput) = index.throughput {
            action = action.provisioned_throughput(provisioned_throughput(OPERATION, throughput)?);
        }
        let action = action
            .build()
            .map_err(|e| ServiceError::client(OPERATION, e.to_string()))?;

        self.client
            .update_table()
            .table_name(table_name)
            .set_attribute_definitions(Some(attribute_definitions(OPERATION, &definitions)?))
            .global_secondary_index_updates(
                GlobalSecondaryIndexUpdate::builder().create(action).build(),
            )
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(OPERATION, e))?;
        Ok(())
    }

    async fn update_global_index_throughput(
        &self,
        table_name: &str,
        index_name: &str,
        throughput: Throughput,
    ) -> ServiceResult<()> {
        const OPERATION: &str = "UpdateTable";

        let action = UpdateGlobalSecondaryIndexAction::builder()
            .index_name(index_name)
            .provisioned_throughput(provisioned_throughput(OPERATION, throughput)?)
            .build()
            .map_err(|e| ServiceError::client(OPERATION, e.to_string()))?;

        self.client
            .update_table()
            .table_name(table_name)
            .global_secondary_index_updates(
                GlobalSecondaryIndexUpdate::builder().update(action).build(),
            )
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(OPERATION, e))?;
        Ok(())
    }

    async fn delete_global_index(&self, table_name: &str, index_name: &str) -> ServiceResult<()> {
        const OPERATION: &str = "UpdateTable";

        let action = DeleteGlobalSecondaryIndexAction::builder()
            .index_name(index_name)
            .build()
            .map_err(|e| ServiceError::client(OPERATION, e.to_string()))?;

        self.client
            .update_table()
            .table_name(table_name)
            .global_secondary_index_updates(
                GlobalSecondaryIndexUpdate::builder().delete(action).build(),
            )
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(OPERATION, e))?;
        Ok(())
    }
}
