//! Commands that only read the configuration.

use dynaschema::Config;
use dynaschema_core::schema::{build_table_schema, list_table_names, table_columns};

use super::Global;
use crate::prelude::*;

pub fn run_tables(config: &Config, global: &Global) -> anyhow::Result<()> {
    if global.is_silent() {
        return Ok(());
    }

    for name in list_table_names(config) {
        aprintln!("{} {}", p_c(&name), config.table_name(&name));
    }
    Ok(())
}

pub fn run_columns(config: &Config, table: &str, global: &Global) -> anyhow::Result<()> {
    let columns = table_columns(config, table)?;

    if !global.is_silent() {
        for (name, data_type) in columns {
            aprintln!("{} {}", p_c(&name), data_type.token());
        }
    }
    Ok(())
}

pub fn run_check(config: &Config, global: &Global) -> anyhow::Result<()> {
    let mut failures = 0;

    for name in list_table_names(config) {
        match build_table_schema(config, &name) {
            Ok(schema) => {
                if !global.is_silent() {
                    aprintln!(
                        "{} {} ({} global, {} local indexes)",
                        p_g("ok"),
                        schema.table_name,
                        schema.global_indexes.len(),
                        schema.local_indexes.len()
                    );
                }
            }
            Err(err) => {
                failures += 1;
                if !global.is_silent() {
                    aprintln!("{} {}: {}", p_r("error"), name, err);
                }
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} table declaration(s) are invalid");
    }
    Ok(())
}
