//! Schema reconciliation: compare a local table schema with its deployed
//! counterpart and compute the corrective operations.

mod error;
mod planning;
mod upstream;
mod validation;

pub use error::SchemaMismatch;
pub use planning::{
    calculate_reconcile_plan, format_reconcile_plan, format_table_creation, IndexOperation,
    ReconcilePlan,
};
pub use upstream::{
    AttributeDefinitionEntry, IndexStatus, KeySchemaEntry, TableStatus, UpstreamDescription,
    UpstreamIndex,
};
pub use validation::validate_primary_key;
