//! Errors reported by the remote service.

use std::fmt::Debug;

use aws_sdk_dynamodb::config::http::HttpResponse;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";
pub const RESOURCE_IN_USE: &str = "ResourceInUseException";

/// A failed call to the remote service, carrying the HTTP status and the
/// machine-readable error code when the service returned them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{operation} failed ({}): {message}", .code.as_deref().unwrap_or("unclassified"))]
pub struct ServiceError {
    pub operation: &'static str,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
    /// Raw response body, kept for diagnostics.
    pub body: Option<String>,
}

impl ServiceError {
    /// An error returned by the service itself (status 400).
    pub fn service(operation: &'static str, code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            operation,
            status: Some(400),
            code: Some(code.to_string()),
            body: Some(format!(
                r#"{{"__type":"com.amazonaws.dynamodb.v20120810#{code}","message":"{message}"}}"#
            )),
            message,
        }
    }

    /// A request that could not be built or a response that could not be read.
    pub fn client(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            status: None,
            code: None,
            message: message.into(),
            body: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some(RESOURCE_NOT_FOUND)
    }

    pub fn is_resource_in_use(&self) -> bool {
        self.code.as_deref() == Some(RESOURCE_IN_USE)
    }

    /// Maps an AWS SDK error, keeping status, code and raw body.
    pub fn from_sdk<E>(operation: &'static str, err: SdkError<E, HttpResponse>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Debug + Send + Sync + 'static,
    {
        let status = err.raw_response().map(|r| r.status().as_u16());
        let body = err
            .raw_response()
            .and_then(|r| r.body().bytes())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        let code = err.code().map(str::to_string);
        let message = err
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| DisplayErrorContext(&err).to_string());

        Self {
            operation,
            status,
            code,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_classification() {
        let error = ServiceError::service(
            "DescribeTable",
            RESOURCE_NOT_FOUND,
            "Requested resource not found",
        );
        assert!(error.is_not_found());
        assert!(!error.is_resource_in_use());
        assert_eq!(error.status, Some(400));
    }

    #[test]
    fn test_service_error_display() {
        let error = ServiceError::service(
            "CreateTable",
            RESOURCE_IN_USE,
            "Table already exists: dev_users",
        );
        assert_eq!(
            error.to_string(),
            "CreateTable failed (ResourceInUseException): Table already exists: dev_users"
        );
        assert!(error.body.unwrap().contains("ResourceInUseException"));
    }

    #[test]
    fn test_client_error_is_unclassified() {
        let error = ServiceError::client("UpdateTable", "missing index name");
        assert_eq!(
            error.to_string(),
            "UpdateTable failed (unclassified): missing index name"
        );
        assert!(!error.is_not_found());
    }
}
