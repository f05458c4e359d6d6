//! dynaschema - declarative DynamoDB table schemas.
//!
//! Tables, keys, indexes and throughput are declared in a YAML file. This
//! crate turns those declarations into DynamoDB calls:
//!
//! - [`Dynaschema::create_table`] creates a declared table with its indexes.
//! - [`Dynaschema::update_table`] reconciles a deployed table with its
//!   declaration, refusing any primary key change.
//! - [`Dynaschema::get_table`] returns a handle for reads and writes.
//!
//! The pure parts (configuration, schema building, planning) live in
//! `dynaschema_core`; the most used types are re-exported here.

pub mod connection;
pub mod error;
pub mod reconcile;
pub mod service;
pub mod table;
pub mod tables;

pub use dynaschema_core::{
    Config, ConfigError, ConfigOverrides, IndexDescriptor, ReconcilePlan, SchemaError,
    SchemaMismatch, TableSchema, Throughput,
};
pub use error::{DynaschemaError, Result};
pub use service::{DynamoDbService, InMemoryTableService, ServiceError, TableService};
pub use table::{Item, TableHandle};
pub use tables::Dynaschema;
