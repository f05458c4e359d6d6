mod error;
mod file;
mod settings;

pub use error::{ConfigError, Result};
pub use file::{RawIndex, RawKey, RawThroughput, SchemaFile};
pub use settings::{
    Config, ConfigOverrides, Credentials, Endpoint, DEFAULT_REGION, ENV_ACCESS_KEY_ID,
    ENV_CONFIG_PATH, ENV_HOST, ENV_IS_SECURE, ENV_NAMESPACE, ENV_PORT, ENV_REGION,
    ENV_SECRET_ACCESS_KEY,
};
