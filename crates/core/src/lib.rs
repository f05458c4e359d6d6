//! dynaschema_core - schema model and reconciliation planning for dynaschema.
//!
//! Everything in this crate is pure: configuration parsing and resolution,
//! schema building, primary key validation and reconciliation planning. The
//! `dynaschema` crate owns every call to the remote service.

pub mod config;
pub mod naming;
pub mod reconcile;
pub mod schema;

pub use config::{Config, ConfigError, ConfigOverrides, SchemaFile};
pub use reconcile::{
    calculate_reconcile_plan, validate_primary_key, IndexOperation, ReconcilePlan, SchemaMismatch,
    UpstreamDescription,
};
pub use schema::{
    build_indexes, build_primary_key, build_table_schema, DataType, IndexDescriptor, IndexKind,
    KeyDescriptor, KeyKind, SchemaError, TableSchema, Throughput,
};
