//! Reconciliation execution (Imperative Shell).

use dynaschema_core::reconcile::{IndexOperation, ReconcilePlan};

use crate::error::Result;
use crate::service::TableService;

/// Executes a reconcile plan, one remote call per step.
///
/// The table throughput is updated first, then each index operation in plan
/// order. The first failure stops execution and is returned as is; earlier
/// steps are not rolled back.
pub async fn execute_reconcile_plan<S>(service: &S, plan: &ReconcilePlan) -> Result<()>
where
    S: TableService + ?Sized,
{
    let table_name = plan.table_name.as_str();

    service
        .update_table_throughput(table_name, plan.throughput)
        .await?;
    tracing::info!(table = table_name, throughput = %plan.throughput, "Updated table throughput");

    for operation in &plan.index_operations {
        match operation {
            IndexOperation::Create(index) => {
                tracing::info!(table = table_name, index = %index.name, "Creating GSI");
                service.create_global_index(table_name, index).await?;
            }
            IndexOperation::UpdateThroughput {
                index_name,
                throughput,
            } => {
                tracing::info!(
                    table = table_name,
                    index = %index_name,
                    throughput = %throughput,
                    "Updating GSI throughput"
                );
                service
                    .update_global_index_throughput(table_name, index_name, *throughput)
                    .await?;
            }
            IndexOperation::Delete { index_name } => {
                tracing::info!(table = table_name, index = %index_name, "Deleting GSI");
                service.delete_global_index(table_name, index_name).await?;
            }
        }
    }

    Ok(())
}
