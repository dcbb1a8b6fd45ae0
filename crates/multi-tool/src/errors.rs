use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Required environment variables, in the order they are reported.
pub const REQUIRED_ENV_VARS: [&str; 3] = [
    "GOOGLE_CLOUD_PROJECT",
    "GOOGLE_CLOUD_LOCATION",
    "GOOGLE_CLOUD_STAGING_BUCKET",
];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variables (GOOGLE_CLOUD_PROJECT, GOOGLE_CLOUD_LOCATION, GOOGLE_CLOUD_STAGING_BUCKET). Please check your .env file.")]
    MissingEnvVars { missing: Vec<&'static str> },

    #[error("Invalid value for {env_var}: {value}")]
    InvalidValue { env_var: &'static str, value: String },
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, Deserialize, Serialize)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Request failed: {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Operation {name} failed: {message}")]
    OperationFailed { name: String, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid resource name: {0}")]
    InvalidResourceName(String),

    #[error("Malformed event in stream: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not run gcloud to obtain an access token: {0}")]
    Gcloud(#[from] std::io::Error),

    #[error("gcloud auth print-access-token failed: {0}")]
    Command(String),

    #[error("gcloud returned an empty access token")]
    EmptyToken,
}
