//! Commands that change deployed tables.

use std::time::Duration;

use dialoguer::Confirm;
use dynaschema::connection::target_display;
use dynaschema::{Config, Dynaschema, DynaschemaError};
use dynaschema_core::reconcile::{format_reconcile_plan, format_table_creation};
use dynaschema_core::schema::resolve_throughput;

use super::{Global, ThroughputArgs};
use crate::prelude::*;

const WAIT_ATTEMPTS: u32 = 60;
const WAIT_DELAY: Duration = Duration::from_secs(2);

/// Create a declared table.
#[derive(Debug, clap::Parser)]
pub struct CreateCommand {
    /// Logical table name
    pub table: String,

    #[command(flatten)]
    pub capacity: ThroughputArgs,

    /// Wait until the table and its indexes are active
    #[arg(long)]
    pub wait: bool,
}

/// Reconcile a deployed table with its declaration.
#[derive(Debug, clap::Parser)]
#[command(long_about = "Reconcile a deployed table with its declaration.

The primary key of the deployed table must match the declared one; any
difference aborts the command before anything is changed.

Then the table throughput is updated, missing global indexes are created,
existing ones get their throughput updated and undeclared ones are deleted.

The command shows the plan before applying and asks for confirmation.")]
pub struct UpdateCommand {
    /// Logical table name
    pub table: String,

    #[command(flatten)]
    pub capacity: ThroughputArgs,

    /// Show the plan without applying it
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation prompts
    #[arg(long)]
    pub force: bool,
}

pub async fn run_create(config: Config, cmd: CreateCommand, global: &Global) -> anyhow::Result<()> {
    let throughput = cmd.capacity.throughput()?;

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), target_display(&config));
        aprintln!();
    }

    let dynaschema = Dynaschema::connect(config).await?;
    let schema = dynaschema.table_schema(&cmd.table)?;

    if !global.is_silent() {
        let resolved = resolve_throughput(throughput, &schema)?;
        aprintln!("{}", p_c("Create Plan:"));
        for line in format_table_creation(&schema, resolved) {
            aprintln!("  {}", p_plan(&line));
        }
        aprintln!();
    }

    match dynaschema.create_table(&cmd.table, throughput).await {
        Ok(_) => {}
        Err(DynaschemaError::TableAlreadyExists { table_name, body }) => {
            if !global.is_silent() {
                aprintln!("{} {}", p_y("Table already exists:"), table_name);
            }
            tracing::debug!(%body, "CreateTable response");
            return Err(DynaschemaError::TableAlreadyExists { table_name, body }.into());
        }
        Err(err) => return Err(err.into()),
    }

    if cmd.wait {
        if !global.is_silent() {
            aprintln!("{}", p_b("Waiting for table to become active..."));
        }
        dynaschema
            .wait_for_table_active(&cmd.table, WAIT_ATTEMPTS, WAIT_DELAY)
            .await?;
    }

    if !global.is_silent() {
        aprintln!("{}", p_g("Table created successfully."));
    }
    Ok(())
}

pub async fn run_update(config: Config, cmd: UpdateCommand, global: &Global) -> anyhow::Result<()> {
    let throughput = cmd.capacity.throughput()?;

    if !global.is_silent() {
        aprintln!("{} {}", p_b("Target:"), target_display(&config));
        aprintln!();
    }

    let dynaschema = Dynaschema::connect(config).await?;
    let plan = dynaschema.plan_update(&cmd.table, throughput).await?;

    if !global.is_silent() {
        aprintln!("{}", p_c("Update Plan:"));
        for line in format_reconcile_plan(&plan) {
            aprintln!("  {}", p_plan(&line));
        }
        aprintln!();
    }

    if cmd.dry_run {
        return Ok(());
    }

    if !cmd.force {
        let confirmed = Confirm::new()
            .with_prompt("Apply these changes?")
            .default(true)
            .interact()?;

        if !confirmed {
            return Err(DynaschemaError::UserCancelled.into());
        }
    }

    if !global.is_silent() {
        aprintln!("{}", p_b("Applying changes..."));
    }

    dynaschema.apply_plan(&plan).await?;

    if !global.is_silent() {
        aprintln!("{}", p_g("Table updated successfully."));
    }
    Ok(())
}
