//! AWS SDK client setup (Imperative Shell).

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::Client;
use dynaschema_core::Config;

use crate::error::Result;

const CREDENTIALS_PROVIDER: &str = "dynaschema-config";

/// Returns a display string for the service targeted by `config`.
pub fn target_display(config: &Config) -> String {
    match &config.endpoint {
        Some(endpoint) => format!("Local DynamoDB ({})", endpoint.url()),
        None => format!("AWS DynamoDB (region: {})", config.region),
    }
}

/// Creates a DynamoDB client from the resolved configuration.
///
/// Credentials are always the static pair from `config`. When a host is set
/// the client targets it instead of the regional endpoint.
pub async fn connect(config: &Config) -> Result<Client> {
    let credentials = Credentials::new(
        &config.credentials.access_key_id,
        &config.credentials.secret_access_key,
        None,
        None,
        CREDENTIALS_PROVIDER,
    );

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .load()
        .await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
    if let Some(endpoint) = &config.endpoint {
        dynamo_config = dynamo_config.endpoint_url(endpoint.url());
    }

    tracing::debug!(target_service = %target_display(config), "dynamodb client created");

    Ok(Client::from_conf(dynamo_config.build()))
}
