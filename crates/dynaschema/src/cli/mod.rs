//! Command line interface.

mod deploy;
mod inspect;

use std::path::PathBuf;

use dynaschema::{Config, ConfigOverrides, Throughput};
use dynaschema_core::config::ENV_CONFIG_PATH;

/// Declarative DynamoDB table schemas
#[derive(Debug, clap::Parser)]
#[command(name = "dynaschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: Global,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand.
///
/// Connection settings given here take precedence over the `DYNASCHEMA_*`
/// environment variables.
#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Path to the schema configuration file
    #[arg(long, global = true, env = ENV_CONFIG_PATH, default_value = "dynamodb.yml")]
    pub config: PathBuf,

    /// Prefix applied to every table name
    #[arg(long, global = true)]
    pub namespace: Option<String>,

    #[arg(long, global = true)]
    pub access_key_id: Option<String>,

    #[arg(long, global = true)]
    pub secret_access_key: Option<String>,

    /// Explicit host, e.g. a DynamoDB Local instance
    #[arg(long, global = true)]
    pub host: Option<String>,

    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Use https when talking to --host
    #[arg(long, global = true)]
    pub secure: bool,

    /// AWS region (default us-west-2)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Silence the command output
    #[arg(long, global = true)]
    pub silent: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,
}

impl Global {
    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Connection settings given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            namespace: self.namespace.clone(),
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            host: self.host.clone(),
            port: self.port,
            is_secure: self.secure.then_some(true),
            region: self.region.clone(),
        }
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        Ok(Config::load(&self.config, self.overrides())?)
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List declared tables
    Tables,

    /// Show the column type hints of a table
    Columns {
        /// Logical table name
        table: String,
    },

    /// Build every declared table schema and report errors
    Check,

    /// Create a declared table
    Create(deploy::CreateCommand),

    /// Reconcile a deployed table with its declaration
    Update(deploy::UpdateCommand),
}

/// Explicit capacity for a create or update.
#[derive(Debug, Clone, clap::Args)]
pub struct ThroughputArgs {
    /// Read capacity units, defaults to default_throughput
    #[arg(long, requires = "write")]
    pub read: Option<u64>,

    /// Write capacity units, defaults to default_throughput
    #[arg(long, requires = "read")]
    pub write: Option<u64>,
}

impl ThroughputArgs {
    pub fn throughput(&self) -> anyhow::Result<Option<Throughput>> {
        match (self.read, self.write) {
            (Some(read), Some(write)) => Throughput::new(read, write)
                .map(Some)
                .ok_or_else(|| anyhow::anyhow!("--read and --write must be positive")),
            _ => Ok(None),
        }
    }
}

pub async fn run(command: Commands, global: Global) -> anyhow::Result<()> {
    let config = global.load_config()?;

    match command {
        Commands::Tables => inspect::run_tables(&config, &global),
        Commands::Columns { table } => inspect::run_columns(&config, &table, &global),
        Commands::Check => inspect::run_check(&config, &global),
        Commands::Create(cmd) => deploy::run_create(config, cmd, &global).await,
        Commands::Update(cmd) => deploy::run_update(config, cmd, &global).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_global_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "dynaschema",
            "--namespace",
            "dev_",
            "--host",
            "localhost",
            "--port",
            "8000",
            "--secure",
            "tables",
        ])
        .unwrap();

        let overrides = cli.global.overrides();
        assert_eq!(overrides.namespace.as_deref(), Some("dev_"));
        assert_eq!(overrides.host.as_deref(), Some("localhost"));
        assert_eq!(overrides.port, Some(8000));
        assert_eq!(overrides.is_secure, Some(true));
        assert!(overrides.access_key_id.is_none());
    }

    #[test]
    fn test_secure_flag_absent_leaves_env_in_charge() {
        let cli = Cli::try_parse_from(["dynaschema", "check"]).unwrap();
        assert_eq!(cli.global.overrides().is_secure, None);
    }

    #[test]
    fn test_update_flags() {
        let cli = Cli::try_parse_from([
            "dynaschema",
            "update",
            "events",
            "--read",
            "10",
            "--write",
            "5",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Update(cmd) => {
                assert_eq!(cmd.table, "events");
                assert!(cmd.dry_run);
                assert!(!cmd.force);
                assert_eq!(cmd.capacity.throughput().unwrap(), Throughput::new(10, 5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_read_requires_write() {
        let result = Cli::try_parse_from(["dynaschema", "create", "events", "--read", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let args = ThroughputArgs {
            read: Some(0),
            write: Some(5),
        };
        assert!(args.throughput().is_err());
    }
}
