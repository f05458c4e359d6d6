mod builder;
mod catalog;
mod error;
mod types;

pub use builder::{
    build_index, build_indexes, build_key, build_primary_key, build_table_schema,
    build_throughput, default_throughput, resolve_throughput,
};
pub use catalog::{list_table_names, table_columns, table_index};
pub use error::{Result, SchemaError};
pub use types::{
    DataType, IndexDescriptor, IndexKind, KeyDescriptor, KeyKind, ProjectionKind, TableSchema,
    Throughput,
};
