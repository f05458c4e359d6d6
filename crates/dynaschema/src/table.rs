//! Table handles returned by the lifecycle operations.

use std::collections::HashMap;
use std::sync::Arc;

use aws_sdk_dynamodb::types::AttributeValue;
use dynaschema_core::reconcile::UpstreamDescription;
use dynaschema_core::schema::TableSchema;

use crate::error::Result;
use crate::service::{DynamoDbService, ServiceError, TableService};

/// An item as stored by DynamoDB.
pub type Item = HashMap<String, AttributeValue>;

/// A table bound to its local schema and a service.
///
/// Creating a handle never contacts the service. A handle for a table that
/// does not exist upstream fails on its first remote call.
#[derive(Debug)]
pub struct TableHandle<S> {
    schema: TableSchema,
    service: Arc<S>,
}

impl<S> Clone for TableHandle<S> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: TableService> TableHandle<S> {
    pub(crate) fn new(schema: TableSchema, service: Arc<S>) -> Self {
        Self { schema, service }
    }

    /// Namespaced table name.
    pub fn name(&self) -> &str {
        &self.schema.table_name
    }

    pub fn logical_name(&self) -> &str {
        &self.schema.logical_name
    }

    /// The local schema this handle was built from.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Fetches the current upstream description of the table.
    pub async fn describe(&self) -> Result<UpstreamDescription> {
        Ok(self.service.describe_table(self.name()).await?)
    }
}

impl TableHandle<DynamoDbService> {
    pub async fn get_item(&self, key: Item) -> Result<Option<Item>> {
        let response = self
            .service
            .client()
            .get_item()
            .table_name(self.name())
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk("GetItem", e))?;
        Ok(response.item().cloned())
    }

    pub async fn put_item(&self, item: Item) -> Result<()> {
        self.service
            .client()
            .put_item()
            .table_name(self.name())
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk("PutItem", e))?;
        Ok(())
    }

    pub async fn delete_item(&self, key: Item) -> Result<()> {
        self.service
            .client()
            .delete_item()
            .table_name(self.name())
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk("DeleteItem", e))?;
        Ok(())
    }
}
