use std::fmt;
use std::path::{Path, PathBuf};

use super::{ConfigError, Result, SchemaFile};
use crate::naming;

/// Region used when neither an override nor `DYNASCHEMA_REGION` is set.
pub const DEFAULT_REGION: &str = "us-west-2";

pub const ENV_NAMESPACE: &str = "DYNASCHEMA_NAMESPACE";
pub const ENV_ACCESS_KEY_ID: &str = "DYNASCHEMA_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "DYNASCHEMA_SECRET_ACCESS_KEY";
pub const ENV_HOST: &str = "DYNASCHEMA_HOST";
pub const ENV_PORT: &str = "DYNASCHEMA_PORT";
pub const ENV_IS_SECURE: &str = "DYNASCHEMA_IS_SECURE";
pub const ENV_REGION: &str = "DYNASCHEMA_REGION";
pub const ENV_CONFIG_PATH: &str = "DYNASCHEMA_CONFIG_PATH";

/// Explicit values that take precedence over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub namespace: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub is_secure: Option<bool>,
    pub region: Option<String>,
}

impl ConfigOverrides {
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn is_secure(mut self, is_secure: bool) -> Self {
        self.is_secure = Some(is_secure);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Static credentials for the remote service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Explicit endpoint, used to target DynamoDB Local or another emulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: Option<u16>,
    pub is_secure: bool,
}

impl Endpoint {
    /// Returns the endpoint as a URL.
    pub fn url(&self) -> String {
        let scheme = if self.is_secure { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}", self.host),
            None => format!("{scheme}://{}", self.host),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigSource {
    path: PathBuf,
    overrides: ConfigOverrides,
}

/// Resolved, immutable configuration.
///
/// Built once with [`Config::load`] and shared by reference. A new value is
/// produced by [`Config::reload`]; existing values never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix applied to every table name.
    pub namespace: String,
    pub credentials: Credentials,
    /// Present when the host is set explicitly.
    pub endpoint: Option<Endpoint>,
    pub region: String,
    /// Declarative table schemas.
    pub schema: SchemaFile,
    source: Option<ConfigSource>,
}

impl Config {
    /// Loads the schema file at `path` and resolves connection settings from
    /// `overrides` and the process environment.
    pub fn load(path: impl AsRef<Path>, overrides: ConfigOverrides) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let schema = SchemaFile::from_yaml_str(&contents)?;

        let mut config = Self::from_sources(schema, overrides.clone(), |var| {
            std::env::var(var).ok()
        })?;
        config.source = Some(ConfigSource {
            path: path.to_path_buf(),
            overrides,
        });

        tracing::info!(
            event = "dynaschema.set_config",
            status = "config loaded",
            path = %path.display(),
            namespace = %config.namespace,
            tables = config.schema.schemas.len(),
        );

        Ok(config)
    }

    /// Resolves a configuration from an already parsed schema file.
    ///
    /// Every setting is taken from `overrides` first, then from `env`. Empty
    /// strings count as absent.
    pub fn from_sources<F>(schema: SchemaFile, overrides: ConfigOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |value: Option<String>, var: &str| {
            value
                .or_else(|| env(var))
                .filter(|value| !value.trim().is_empty())
        };

        let namespace = lookup(overrides.namespace, ENV_NAMESPACE)
            .ok_or(ConfigError::MissingNamespace { var: ENV_NAMESPACE })?;
        let access_key_id = lookup(overrides.access_key_id, ENV_ACCESS_KEY_ID).ok_or(
            ConfigError::MissingAccessKeyId {
                var: ENV_ACCESS_KEY_ID,
            },
        )?;
        let secret_access_key = lookup(overrides.secret_access_key, ENV_SECRET_ACCESS_KEY).ok_or(
            ConfigError::MissingSecretAccessKey {
                var: ENV_SECRET_ACCESS_KEY,
            },
        )?;

        let port = match overrides.port {
            Some(port) => Some(port),
            None => lookup(None, ENV_PORT).map(|raw| parse_port(&raw)).transpose()?,
        };
        let is_secure = match overrides.is_secure {
            Some(is_secure) => is_secure,
            None => lookup(None, ENV_IS_SECURE)
                .map(|raw| parse_flag(&raw))
                .transpose()?
                .unwrap_or(false),
        };
        let endpoint = lookup(overrides.host, ENV_HOST).map(|host| Endpoint {
            host,
            port,
            is_secure,
        });
        let region =
            lookup(overrides.region, ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string());

        Ok(Self {
            namespace,
            credentials: Credentials {
                access_key_id,
                secret_access_key,
            },
            endpoint,
            region,
            schema,
            source: None,
        })
    }

    /// Re-reads the originating file with the original overrides.
    pub fn reload(&self) -> Result<Self> {
        let source = self.source.as_ref().ok_or(ConfigError::NotReloadable)?;
        Self::load(&source.path, source.overrides.clone())
    }

    /// Path of the file this configuration was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.source.as_ref().map(|source| source.path.as_path())
    }

    /// Prefixes a logical table name with the namespace.
    pub fn table_name(&self, logical_name: &str) -> String {
        naming::table_name(&self.namespace, logical_name)
    }

    /// Strips the namespace from a namespaced table name.
    pub fn reverse_table_name<'a>(&self, namespaced: &'a str) -> &'a str {
        naming::reverse_table_name(&self.namespace, namespaced)
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
        var: ENV_PORT,
        value: raw.to_string(),
    })
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidSecureFlag {
            var: ENV_IS_SECURE,
            value: raw.to_string(),
        }),
    }
}
