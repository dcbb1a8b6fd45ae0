use std::fmt;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::utils::short_id;
use crate::agent::AgentDefinition;
use crate::config::Config;
use crate::errors::EngineError;

/// Events of a streamed query, yielded in arrival order.
pub type EventStream<'a> = Box<dyn Iterator<Item = Result<Value, EngineError>> + 'a>;

/// Fully qualified name of a deployed agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceName {
    pub project: String,
    pub location: String,
    pub resource_id: String,
}

fn resource_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^projects/([^/]+)/locations/([^/]+)/reasoningEngines/([^/]+)$")
            .expect("resource name pattern is valid")
    })
}

impl ResourceName {
    pub fn new(project: &str, location: &str, resource_id: &str) -> Self {
        Self {
            project: project.to_string(),
            location: location.to_string(),
            resource_id: resource_id.to_string(),
        }
    }

    /// Parse a full `projects/.../reasoningEngines/...` name.
    pub fn parse(name: &str) -> Result<Self, EngineError> {
        let captures = resource_name_pattern()
            .captures(name)
            .ok_or_else(|| EngineError::InvalidResourceName(name.to_string()))?;
        Ok(Self::new(&captures[1], &captures[2], &captures[3]))
    }

    /// Accept either a short resource id, expanded with the configured project
    /// and location, or a full resource name.
    pub fn resolve(resource_id: &str, config: &Config) -> Result<Self, EngineError> {
        if resource_id.contains('/') {
            Self::parse(resource_id)
        } else if resource_id.is_empty() {
            Err(EngineError::InvalidResourceName(resource_id.to_string()))
        } else {
            Ok(Self::new(&config.project_id, &config.location, resource_id))
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/locations/{}/reasoningEngines/{}",
            self.project, self.location, self.resource_id
        )
    }
}

/// Everything the platform needs to host the agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub display_name: String,
    pub description: String,
    pub agent: Value,
    pub requirements: Vec<String>,
    pub extra_packages: Vec<String>,
    pub staging_bucket: String,
    pub enable_tracing: bool,
}

impl DeployRequest {
    pub fn new(agent: &AgentDefinition, config: &Config) -> Result<Self> {
        Ok(Self {
            display_name: config
                .display_name
                .clone()
                .unwrap_or_else(|| agent.name.clone()),
            description: agent.description.clone(),
            agent: agent.spec()?,
            requirements: Vec::new(),
            extra_packages: Vec::new(),
            staging_bucket: config.staging_bucket.clone(),
            enable_tracing: true,
        })
    }

    pub fn with_requirements<S: AsRef<str>>(mut self, requirements: &[S]) -> Self {
        self.requirements = requirements.iter().map(|r| r.as_ref().to_string()).collect();
        self
    }

    pub fn with_extra_packages<S: AsRef<str>>(mut self, packages: &[S]) -> Self {
        self.extra_packages = packages.iter().map(|p| p.as_ref().to_string()).collect();
        self
    }

    /// Body of the `reasoningEngines` create call.
    ///
    /// This is a local declarative shape: the agent travels as its `spec()`
    /// JSON and the package inputs as plain lists. The hosted `PackageSpec`
    /// only takes GCS URIs (`pickleObjectGcsUri`, `requirementsGcsUri`,
    /// `dependencyFilesGcsUri`) and no staging happens here, so the live
    /// service rejects this body. It is pinned against the mock server only.
    pub fn payload(&self) -> Value {
        json!({
            "displayName": self.display_name,
            "description": self.description,
            "spec": {
                "agentFramework": "google-adk",
                "agent": self.agent,
                "enableTracing": self.enable_tracing,
                "packageSpec": {
                    "requirements": self.requirements,
                    "extraPackages": self.extra_packages,
                    "stagingBucket": self.staging_bucket,
                },
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedResource {
    pub resource_name: String,
}

impl DeployedResource {
    pub fn new<S: Into<String>>(resource_name: S) -> Self {
        Self {
            resource_name: resource_name.into(),
        }
    }

    /// The short id accepted by the other commands.
    pub fn resource_id(&self) -> &str {
        short_id(&self.resource_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(default, alias = "appName")]
    pub app_name: Option<String>,
    #[serde(default, alias = "lastUpdateTime")]
    pub last_update_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub user_id: String,
    pub session_id: String,
    pub message: String,
}

impl Query {
    pub fn new(user_id: &str, session_id: &str, message: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            message: message.to_string(),
        }
    }
}

/// The remote agent hosting platform, reduced to the three calls the CLI makes.
pub trait AgentEngine {
    /// Submit an agent for hosting and wait until the resource exists
    fn deploy(&self, request: &DeployRequest) -> Result<DeployedResource>;

    /// Open a new conversation with a deployed agent
    fn create_session(&self, resource: &ResourceName, user_id: &str) -> Result<Session>;

    /// Send a message and stream back the agent's events
    fn stream_query(&self, resource: &ResourceName, query: &Query) -> Result<EventStream<'_>>;
}
