//! The public entry point for table lifecycle operations.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use dynaschema_core::reconcile::{calculate_reconcile_plan, format_reconcile_plan, ReconcilePlan};
use dynaschema_core::schema::{
    self, build_table_schema, resolve_throughput, DataType, IndexDescriptor, TableSchema,
    Throughput,
};
use dynaschema_core::Config;

use crate::connection;
use crate::error::{DynaschemaError, Result};
use crate::reconcile::execute_reconcile_plan;
use crate::service::{self, DynamoDbService, TableService};
use crate::table::TableHandle;

/// Table lifecycle operations over one configuration and one service.
///
/// The configuration is immutable for the lifetime of the value; build a new
/// `Dynaschema` from [`Config::reload`] to pick up file changes.
#[derive(Debug)]
pub struct Dynaschema<S = DynamoDbService> {
    config: Arc<Config>,
    service: Arc<S>,
}

impl<S> Clone for Dynaschema<S> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            service: Arc::clone(&self.service),
        }
    }
}

impl Dynaschema<DynamoDbService> {
    /// Connects to DynamoDB with the settings in `config`.
    pub async fn connect(config: Config) -> Result<Self> {
        let client = connection::connect(&config).await?;
        Ok(Self::new(config, DynamoDbService::new(client)))
    }
}

impl<S: TableService> Dynaschema<S> {
    pub fn new(config: Config, service: S) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Namespaced name of a logical table.
    pub fn table_name(&self, logical_name: &str) -> String {
        self.config.table_name(logical_name)
    }

    /// Logical name of a namespaced table.
    pub fn reverse_table_name<'a>(&self, namespaced: &'a str) -> &'a str {
        self.config.reverse_table_name(namespaced)
    }

    /// Logical names of every declared table, sorted.
    pub fn list_table_names(&self) -> Vec<String> {
        schema::list_table_names(&self.config)
    }

    pub fn table_columns(&self, logical_name: &str) -> Result<BTreeMap<String, DataType>> {
        Ok(schema::table_columns(&self.config, logical_name)?)
    }

    pub fn table_index(
        &self,
        logical_name: &str,
        index_name: &str,
    ) -> Result<Option<IndexDescriptor>> {
        Ok(schema::table_index(&self.config, logical_name, index_name)?)
    }

    /// Builds the local schema of a declared table.
    pub fn table_schema(&self, logical_name: &str) -> Result<TableSchema> {
        Ok(build_table_schema(&self.config, logical_name)?)
    }

    /// Returns a handle for a declared table without contacting the service.
    pub fn get_table(&self, logical_name: &str) -> Result<TableHandle<S>> {
        let schema = self.table_schema(logical_name)?;
        Ok(TableHandle::new(schema, Arc::clone(&self.service)))
    }

    /// Creates a declared table with its indexes.
    ///
    /// `throughput` defaults to the configured `default_throughput`. An
    /// existing table yields [`DynaschemaError::TableAlreadyExists`] carrying
    /// the raw service response.
    pub async fn create_table(
        &self,
        logical_name: &str,
        throughput: Option<Throughput>,
    ) -> Result<TableHandle<S>> {
        let schema = self.table_schema(logical_name)?;
        let throughput = resolve_throughput(throughput, &schema)?;

        match self.service.create_table(&schema, throughput).await {
            Ok(()) => {}
            Err(err) if err.is_resource_in_use() => {
                return Err(DynaschemaError::TableAlreadyExists {
                    table_name: schema.table_name,
                    body: err.body.unwrap_or(err.message),
                });
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            table = %schema.table_name,
            throughput = %throughput,
            global_indexes = schema.global_indexes.len(),
            local_indexes = schema.local_indexes.len(),
            "Created table"
        );

        Ok(TableHandle::new(schema, Arc::clone(&self.service)))
    }

    /// Computes what [`Self::update_table`] would do, without mutating anything.
    pub async fn plan_update(
        &self,
        logical_name: &str,
        throughput: Option<Throughput>,
    ) -> Result<ReconcilePlan> {
        let schema = self.table_schema(logical_name)?;
        self.plan_for(&schema, throughput).await
    }

    /// Brings the deployed table in line with its local declaration.
    ///
    /// The primary key is validated before anything is changed. Afterwards the
    /// table throughput is updated and global indexes are created, updated or
    /// deleted one call at a time. A failure midway leaves the earlier changes
    /// in place; running the update again picks up from the current state.
    pub async fn update_table(
        &self,
        logical_name: &str,
        throughput: Option<Throughput>,
    ) -> Result<TableHandle<S>> {
        let schema = self.table_schema(logical_name)?;
        let plan = self.plan_for(&schema, throughput).await?;

        self.apply_plan(&plan).await?;

        Ok(TableHandle::new(schema, Arc::clone(&self.service)))
    }

    /// Executes a plan returned by [`Self::plan_update`] as is.
    ///
    /// The deployed table is not described again, so the calls made are
    /// exactly the ones the plan lists.
    pub async fn apply_plan(&self, plan: &ReconcilePlan) -> Result<()> {
        execute_reconcile_plan(self.service.as_ref(), plan).await
    }

    /// Waits until a declared table and its global indexes are active.
    pub async fn wait_for_table_active(
        &self,
        logical_name: &str,
        attempts: u32,
        delay: Duration,
    ) -> Result<()> {
        let table_name = self.table_name(logical_name);
        if service::wait_for_table_active(self.service.as_ref(), &table_name, attempts, delay)
            .await?
        {
            Ok(())
        } else {
            Err(DynaschemaError::TableActivationTimeout { table_name })
        }
    }

    async fn plan_for(
        &self,
        schema: &TableSchema,
        throughput: Option<Throughput>,
    ) -> Result<ReconcilePlan> {
        let throughput = resolve_throughput(throughput, schema)?;

        let upstream = match self.service.describe_table(&schema.table_name).await {
            Ok(upstream) => upstream,
            Err(err) if err.is_not_found() => {
                tracing::error!(
                    event = "dynaschema.unknown_table",
                    table_name = %schema.table_name,
                    "Table not found upstream"
                );
                return Err(DynaschemaError::UnknownTable {
                    table_name: schema.table_name.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let plan = calculate_reconcile_plan(schema, &upstream, throughput)?;
        tracing::debug!(plan = ?format_reconcile_plan(&plan), "Reconcile plan computed");
        Ok(plan)
    }
}
