use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde_json::Value;

use multi_tool::engine::{
    AgentEngine, DeployRequest, DeployedResource, EventStream, Query, ResourceName, Session,
};
use multi_tool::errors::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Deploy(DeployRequest),
    CreateSession { resource: String, user_id: String },
    StreamQuery { resource: String, query: Query },
}

/// An engine that records every call and answers with canned values.
pub struct MockEngine {
    calls: Arc<Mutex<Vec<Call>>>,
    resource_name: String,
    session_id: String,
    events: Vec<Result<Value, String>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            resource_name: "projects/p/locations/us-central1/reasoningEngines/5404200805588795392"
                .to_string(),
            session_id: "6869123577984057344".to_string(),
            events: Vec::new(),
        }
    }

    pub fn with_session_id(mut self, session_id: &str) -> Self {
        self.session_id = session_id.to_string();
        self
    }

    pub fn with_events(mut self, events: Vec<Value>) -> Self {
        self.events = events.into_iter().map(Ok).collect();
        self
    }

    /// Make the stream fail after the events queued so far.
    pub fn with_stream_error(mut self, message: &str) -> Self {
        self.events.push(Err(message.to_string()));
        self
    }

    /// Shared handle on the recorded calls, usable after the engine is boxed.
    pub fn calls(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AgentEngine for MockEngine {
    fn deploy(&self, request: &DeployRequest) -> Result<DeployedResource> {
        self.record(Call::Deploy(request.clone()));
        Ok(DeployedResource::new(self.resource_name.clone()))
    }

    fn create_session(&self, resource: &ResourceName, user_id: &str) -> Result<Session> {
        self.record(Call::CreateSession {
            resource: resource.to_string(),
            user_id: user_id.to_string(),
        });
        Ok(Session {
            id: self.session_id.clone(),
            user_id: user_id.to_string(),
            app_name: Some(resource.resource_id.clone()),
            last_update_time: None,
        })
    }

    fn stream_query(&self, resource: &ResourceName, query: &Query) -> Result<EventStream<'_>> {
        self.record(Call::StreamQuery {
            resource: resource.to_string(),
            query: query.clone(),
        });
        Ok(Box::new(self.events.iter().map(|event| {
            event.clone().map_err(EngineError::UnexpectedResponse)
        })))
    }
}
