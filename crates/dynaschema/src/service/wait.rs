use std::time::Duration;

use super::{ServiceResult, TableService};

/// Polls `describe_table` until the table and all of its global indexes are
/// active. Returns `false` when `attempts` run out first.
///
/// A table that is not found yet is treated like one that is still being
/// created. Any other error stops the wait.
pub async fn wait_for_table_active<S>(
    service: &S,
    table_name: &str,
    attempts: u32,
    delay: Duration,
) -> ServiceResult<bool>
where
    S: TableService + ?Sized,
{
    for attempt in 1..=attempts {
        match service.describe_table(table_name).await {
            Ok(table) if table.is_active() => return Ok(true),
            Ok(_) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
        tracing::debug!(table = table_name, attempt, "waiting for table to become active");
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{InMemoryTableService, ServiceError};
    use dynaschema_core::reconcile::{IndexStatus, TableStatus, UpstreamDescription, UpstreamIndex};

    fn table(status: TableStatus, index_status: IndexStatus) -> UpstreamDescription {
        UpstreamDescription {
            table_name: "dev_users".to_string(),
            status,
            key_schema: vec![],
            attribute_definitions: vec![],
            global_indexes: vec![UpstreamIndex {
                name: "ByEmail".to_string(),
                status: index_status,
                throughput: None,
            }],
            throughput: None,
        }
    }

    #[tokio::test]
    async fn test_active_table_returns_immediately() {
        let service =
            InMemoryTableService::with_tables([table(TableStatus::Active, IndexStatus::Active)]);

        let active = wait_for_table_active(&service, "dev_users", 3, Duration::ZERO)
            .await
            .unwrap();
        assert!(active);
        assert_eq!(service.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_creating_index_times_out() {
        let service =
            InMemoryTableService::with_tables([table(TableStatus::Active, IndexStatus::Creating)]);

        let active = wait_for_table_active(&service, "dev_users", 3, Duration::ZERO)
            .await
            .unwrap();
        assert!(!active);
        assert_eq!(service.calls().await.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_table_keeps_waiting() {
        let service = InMemoryTableService::new();

        let active = wait_for_table_active(&service, "dev_users", 2, Duration::ZERO)
            .await
            .unwrap();
        assert!(!active);
    }

    #[tokio::test]
    async fn test_service_error_stops_waiting() {
        let service = InMemoryTableService::new();
        service
            .fail_next(ServiceError::client("DescribeTable", "connection refused"))
            .await;

        let error = wait_for_table_active(&service, "dev_users", 5, Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(error.message, "connection refused");
        assert_eq!(service.calls().await.len(), 1);
    }
}
