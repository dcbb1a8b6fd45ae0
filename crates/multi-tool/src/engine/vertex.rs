use std::io::BufReader;
use std::thread;

use anyhow::Result;
use reqwest::blocking::Client;
use serde_json::{json, Value};

use super::base::{
    AgentEngine, DeployRequest, DeployedResource, EventStream, Query, ResourceName, Session,
};
use super::utils::{check_status, http_client, EventLines, API_VERSION};
use crate::auth;
use crate::config::Config;
use crate::errors::EngineError;

/// Vertex AI Agent Engine (reasoning engines) over its REST API.
pub struct VertexAgentEngine {
    client: Client,
    config: Config,
    token: String,
}

impl VertexAgentEngine {
    pub fn new(config: Config) -> Result<Self> {
        let client = http_client()?;
        let token = auth::access_token(config.access_token.as_deref())?;

        Ok(Self {
            client,
            config,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint(&self.config.location),
            API_VERSION,
            path
        )
    }

    fn post(
        &self,
        path: &str,
        payload: &Value,
    ) -> Result<reqwest::blocking::Response, EngineError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .header("Authorization", auth::bearer(&self.token))
            .json(payload)
            .send()?;
        check_status(response)
    }

    fn get(&self, path: &str) -> Result<Value, EngineError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .header("Authorization", auth::bearer(&self.token))
            .send()?;
        Ok(check_status(response)?.json()?)
    }

    /// Poll a long-running operation until it reports `done`, returning its
    /// `response` payload.
    fn wait_for_operation(&self, mut operation: Value) -> Result<Value, EngineError> {
        let name = operation
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                EngineError::UnexpectedResponse(format!("operation without a name: {}", operation))
            })?
            .to_string();

        while !operation.get("done").and_then(Value::as_bool).unwrap_or(false) {
            tracing::info!(operation = %name, "waiting for deployment to finish");
            thread::sleep(self.config.poll_interval);
            operation = self.get(&name)?;
        }

        if let Some(error) = operation.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(EngineError::OperationFailed { name, message });
        }

        operation
            .get("response")
            .cloned()
            .ok_or_else(|| {
                EngineError::UnexpectedResponse(format!(
                    "operation {} finished without a response",
                    name
                ))
            })
    }
}

impl AgentEngine for VertexAgentEngine {
    fn deploy(&self, request: &DeployRequest) -> Result<DeployedResource> {
        let parent = format!(
            "projects/{}/locations/{}/reasoningEngines",
            self.config.project_id, self.config.location
        );
        let operation: Value = self.post(&parent, &request.payload())?.json()?;
        let response = self.wait_for_operation(operation)?;

        let resource_name = response
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                EngineError::UnexpectedResponse(format!(
                    "deployed resource without a name: {}",
                    response
                ))
            })?;
        tracing::info!(resource = %resource_name, "agent deployed");

        Ok(DeployedResource::new(resource_name))
    }

    fn create_session(&self, resource: &ResourceName, user_id: &str) -> Result<Session> {
        let payload = json!({
            "classMethod": "create_session",
            "input": { "user_id": user_id },
        });
        let response: Value = self.post(&format!("{}:query", resource), &payload)?.json()?;

        let output = response
            .get("output")
            .cloned()
            .ok_or_else(|| {
                EngineError::UnexpectedResponse(format!("query without output: {}", response))
            })?;
        Ok(serde_json::from_value(output)?)
    }

    fn stream_query(&self, resource: &ResourceName, query: &Query) -> Result<EventStream<'_>> {
        let payload = json!({
            "classMethod": "stream_query",
            "input": query,
        });
        let response = self.post(&format!("{}:streamQuery", resource), &payload)?;

        Ok(Box::new(EventLines::new(BufReader::new(response))))
    }
}
