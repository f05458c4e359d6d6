//! The remote table service and its implementations.

mod conversions;
mod dynamodb;
mod error;
mod inmemory;
mod wait;

pub use dynamodb::DynamoDbService;
pub use error::{ServiceError, RESOURCE_IN_USE, RESOURCE_NOT_FOUND};
pub use inmemory::{InMemoryTableService, RecordedCall};
pub use wait::wait_for_table_active;

use async_trait::async_trait;
use dynaschema_core::reconcile::UpstreamDescription;
use dynaschema_core::schema::{IndexDescriptor, TableSchema, Throughput};

/// Result type for service calls.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Table lifecycle calls against the remote service.
///
/// Every method is a single remote round trip. Implementations never retry.
#[async_trait]
pub trait TableService: Send + Sync {
    /// Fetches the current description of a table.
    async fn describe_table(&self, table_name: &str) -> ServiceResult<UpstreamDescription>;

    /// Creates a table with its key schema, indexes and throughput.
    async fn create_table(&self, schema: &TableSchema, throughput: Throughput) -> ServiceResult<()>;

    /// Updates the provisioned throughput of the table itself.
    async fn update_table_throughput(
        &self,
        table_name: &str,
        throughput: Throughput,
    ) -> ServiceResult<()>;

    /// Adds a global secondary index to an existing table.
    async fn create_global_index(
        &self,
        table_name: &str,
        index: &IndexDescriptor,
    ) -> ServiceResult<()>;

    /// Updates the provisioned throughput of one global secondary index.
    async fn update_global_index_throughput(
        &self,
        table_name: &str,
        index_name: &str,
        throughput: Throughput,
    ) -> ServiceResult<()>;

    /// Removes a global secondary index.
    async fn delete_global_index(&self, table_name: &str, index_name: &str) -> ServiceResult<()>;
}
