//! Pure functions for calculating reconciliation plans.

use super::{validate_primary_key, SchemaMismatch, UpstreamDescription};
use crate::schema::{IndexDescriptor, TableSchema, Throughput};

/// One corrective action on a global secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOperation {
    /// Declared locally, missing upstream. Key parts always include a hash
    /// key, taken from the table when the index declares none.
    Create(IndexDescriptor),
    /// Present on both sides.
    UpdateThroughput {
        index_name: String,
        throughput: Throughput,
    },
    /// Present upstream, no longer declared.
    Delete { index_name: String },
}

impl IndexOperation {
    pub fn index_name(&self) -> &str {
        match self {
            Self::Create(index) => &index.name,
            Self::UpdateThroughput { index_name, .. } | Self::Delete { index_name } => index_name,
        }
    }
}

/// Everything `update_table` will do, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub table_name: String,
    /// Primary table throughput, always applied.
    pub throughput: Throughput,
    pub index_operations: Vec<IndexOperation>,
}

impl ReconcilePlan {
    pub fn creates(&self) -> impl Iterator<Item = &IndexDescriptor> {
        self.index_operations.iter().filter_map(|op| match op {
            IndexOperation::Create(index) => Some(index),
            _ => None,
        })
    }

    pub fn updates(&self) -> impl Iterator<Item = (&str, Throughput)> {
        self.index_operations.iter().filter_map(|op| match op {
            IndexOperation::UpdateThroughput {
                index_name,
                throughput,
            } => Some((index_name.as_str(), *throughput)),
            _ => None,
        })
    }

    pub fn deletes(&self) -> impl Iterator<Item = &str> {
        self.index_operations.iter().filter_map(|op| match op {
            IndexOperation::Delete { index_name } => Some(index_name.as_str()),
            _ => None,
        })
    }

    /// True when no index has to be created or deleted.
    pub fn is_converged(&self) -> bool {
        self.creates().next().is_none() && self.deletes().next().is_none()
    }
}

/// Pure function: compare the local schema against the deployed table.
///
/// The primary key is validated first; a mismatch yields no plan at all.
/// Index operations follow local declaration order for creates and updates,
/// then upstream order for deletes.
pub fn calculate_reconcile_plan(
    local: &TableSchema,
    upstream: &UpstreamDescription,
    throughput: Throughput,
) -> Result<ReconcilePlan, SchemaMismatch> {
    validate_primary_key(&local.primary_key, upstream)?;

    let upstream_names = upstream.global_index_names();
    let mut index_operations: Vec<IndexOperation> = local
        .global_indexes
        .iter()
        .map(|index| {
            if upstream_names.contains(&index.name.as_str()) {
                IndexOperation::UpdateThroughput {
                    index_name: index.name.clone(),
                    throughput: index.throughput.unwrap_or(throughput),
                }
            } else {
                IndexOperation::Create(index.with_table_hash_key(local.hash_key()))
            }
        })
        .collect();

    index_operations.extend(
        upstream_names
            .iter()
            .filter(|name| local.global_index(name).is_none())
            .map(|name| IndexOperation::Delete {
                index_name: name.to_string(),
            }),
    );

    Ok(ReconcilePlan {
        table_name: local.table_name.clone(),
        throughput,
        index_operations,
    })
}

/// Pure function: format a reconcile plan for display.
pub fn format_reconcile_plan(plan: &ReconcilePlan) -> Vec<String> {
    let mut lines = vec![
        format!("~ Update table: {}", plan.table_name),
        format!("  ~ Throughput: {}", plan.throughput),
    ];
    for op in &plan.index_operations {
        match op {
            IndexOperation::Create(index) => {
                lines.push(format!("+ Create GSI: {}", index.name));
                for key in &index.key_parts {
                    lines.push(format!("    Key: {key}"));
                }
                if let Some(throughput) = index.throughput {
                    lines.push(format!("    Throughput: {throughput}"));
                }
            }
            IndexOperation::UpdateThroughput {
                index_name,
                throughput,
            } => lines.push(format!("~ Update GSI throughput: {index_name} ({throughput})")),
            IndexOperation::Delete { index_name } => {
                lines.push(format!("- Delete GSI: {index_name}"))
            }
        }
    }
    lines
}

/// Pure function: format a table creation for display.
pub fn format_table_creation(schema: &TableSchema, throughput: Throughput) -> Vec<String> {
    let mut lines = vec![format!("+ Create table: {}", schema.table_name)];
    for key in &schema.primary_key {
        lines.push(format!("  Key: {key}"));
    }
    lines.push(format!("  Throughput: {throughput}"));
    for index in &schema.global_indexes {
        lines.push(format!("  + GSI: {} ({})", index.name, index.kind.token()));
        if let Some(throughput) = index.throughput {
            lines.push(format!("    Throughput: {throughput}"));
        }
    }
    for index in &schema.local_indexes {
        lines.push(format!("  + LSI: {} ({})", index.name, index.kind.token()));
    }
    lines
}
