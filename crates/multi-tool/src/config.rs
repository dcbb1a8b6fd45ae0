use std::env;
use std::time::Duration;

use crate::errors::{ConfigError, REQUIRED_ENV_VARS};

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_RAG_REGION: &str = "us-east4";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Source of configuration values, keyed by environment variable name.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub trait EnvConfig {
    /// Load configuration through an arbitrary lookup
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError>
    where
        Self: Sized;

    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        Self::from_lookup(&|key| env::var(key).ok())
    }

    /// Read a value, treating an empty string the same as an unset variable
    fn get_env(lookup: Lookup<'_>, key: &str, default: Option<&str>) -> Option<String> {
        match lookup(key) {
            Some(value) if !value.is_empty() => Some(value),
            Some(_) => None,
            None => default.map(str::to_string),
        }
    }
}

/// Process-wide settings for talking to the agent platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub project_id: String,
    pub location: String,
    pub staging_bucket: String,
    pub rag_corpus: Option<String>,
    pub rag_region: String,
    /// Display name of the deployed resource; the agent name when unset
    pub display_name: Option<String>,
    pub access_token: Option<String>,
    /// Overrides the regional `https://{region}-aiplatform.googleapis.com` host
    pub api_endpoint: Option<String>,
    pub poll_interval: Duration,
}

impl Config {
    pub fn new(project_id: &str, location: &str, staging_bucket: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            location: location.to_string(),
            staging_bucket: staging_bucket.to_string(),
            rag_corpus: None,
            rag_region: DEFAULT_RAG_REGION.to_string(),
            display_name: None,
            access_token: None,
            api_endpoint: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// Base URL of the API host serving `region`.
    pub fn endpoint(&self, region: &str) -> String {
        match &self.api_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", region),
        }
    }
}

impl EnvConfig for Config {
    fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        let project_id = Self::get_env(lookup, "GOOGLE_CLOUD_PROJECT", None);
        let location = Self::get_env(lookup, "GOOGLE_CLOUD_LOCATION", Some(DEFAULT_LOCATION));
        let staging_bucket = Self::get_env(lookup, "GOOGLE_CLOUD_STAGING_BUCKET", None);

        let (project_id, location, staging_bucket) = match (project_id, location, staging_bucket) {
            (Some(project_id), Some(location), Some(staging_bucket)) => {
                (project_id, location, staging_bucket)
            }
            (project_id, location, staging_bucket) => {
                let present = [
                    project_id.is_some(),
                    location.is_some(),
                    staging_bucket.is_some(),
                ];
                let missing = REQUIRED_ENV_VARS
                    .iter()
                    .zip(present)
                    .filter(|(_, present)| !present)
                    .map(|(name, _)| *name)
                    .collect();
                return Err(ConfigError::MissingEnvVars { missing });
            }
        };

        let poll_interval = match Self::get_env(lookup, "AGENT_ENGINE_POLL_INTERVAL_SECS", None) {
            Some(value) => {
                let secs = value.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    env_var: "AGENT_ENGINE_POLL_INTERVAL_SECS",
                    value: value.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        };

        Ok(Self {
            project_id,
            location,
            staging_bucket,
            rag_corpus: Self::get_env(lookup, "RAG_CORPUS", None),
            rag_region: Self::get_env(lookup, "RAG_REGION", Some(DEFAULT_RAG_REGION))
                .unwrap_or_else(|| DEFAULT_RAG_REGION.to_string()),
            display_name: Self::get_env(lookup, "AGENT_DISPLAY_NAME", None),
            access_token: Self::get_env(lookup, "GOOGLE_CLOUD_ACCESS_TOKEN", None),
            api_endpoint: Self::get_env(lookup, "GOOGLE_CLOUD_API_ENDPOINT", None),
            poll_interval,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(&|key| vars.get(key).cloned())
    }

    #[test]
    fn test_required_values_and_defaults() {
        let config = load(&[
            ("GOOGLE_CLOUD_PROJECT", "my-project"),
            ("GOOGLE_CLOUD_STAGING_BUCKET", "gs://my-bucket"),
        ])
        .unwrap();

        assert_eq!(config.project_id, "my-project");
        assert_eq!(config.location, "us-central1");
        assert_eq!(config.staging_bucket, "gs://my-bucket");
        assert_eq!(config.rag_corpus, None);
        assert_eq!(config.rag_region, "us-east4");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_optional_values() {
        let config = load(&[
            ("GOOGLE_CLOUD_PROJECT", "p"),
            ("GOOGLE_CLOUD_LOCATION", "europe-west1"),
            ("GOOGLE_CLOUD_STAGING_BUCKET", "gs://b"),
            ("RAG_CORPUS", "projects/p/locations/us-east4/ragCorpora/42"),
            ("RAG_REGION", "us-west1"),
            ("AGENT_DISPLAY_NAME", "weather bot"),
            ("GOOGLE_CLOUD_ACCESS_TOKEN", "token"),
            ("AGENT_ENGINE_POLL_INTERVAL_SECS", "2"),
        ])
        .unwrap();

        assert_eq!(config.location, "europe-west1");
        assert_eq!(
            config.rag_corpus.as_deref(),
            Some("projects/p/locations/us-east4/ragCorpora/42")
        );
        assert_eq!(config.rag_region, "us-west1");
        assert_eq!(config.display_name.as_deref(), Some("weather bot"));
        assert_eq!(config.access_token.as_deref(), Some("token"));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_missing_required_values() {
        let err = load(&[("GOOGLE_CLOUD_PROJECT", "p")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingEnvVars {
                missing: vec!["GOOGLE_CLOUD_STAGING_BUCKET"]
            }
        );
        assert!(err.to_string().contains("Please check your .env file"));

        let err = load(&[]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingEnvVars {
                missing: vec!["GOOGLE_CLOUD_PROJECT", "GOOGLE_CLOUD_STAGING_BUCKET"]
            }
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = load(&[
            ("GOOGLE_CLOUD_PROJECT", "p"),
            ("GOOGLE_CLOUD_LOCATION", ""),
            ("GOOGLE_CLOUD_STAGING_BUCKET", "gs://b"),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::MissingEnvVars {
                missing: vec!["GOOGLE_CLOUD_LOCATION"]
            }
        );
    }

    #[test]
    fn test_invalid_poll_interval() {
        let err = load(&[
            ("GOOGLE_CLOUD_PROJECT", "p"),
            ("GOOGLE_CLOUD_STAGING_BUCKET", "gs://b"),
            ("AGENT_ENGINE_POLL_INTERVAL_SECS", "soon"),
        ])
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { value, .. } if value == "soon"));
    }

    #[test]
    fn test_endpoint_override() {
        let mut config = Config::new("p", "us-central1", "gs://b");
        assert_eq!(
            config.endpoint("us-east4"),
            "https://us-east4-aiplatform.googleapis.com"
        );

        config.api_endpoint = Some("http://127.0.0.1:1234/".to_string());
        assert_eq!(config.endpoint("us-east4"), "http://127.0.0.1:1234");
    }
}
