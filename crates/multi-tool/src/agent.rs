use std::collections::HashSet;

use anyhow::Result;
use serde_json::{json, Value};

use crate::config::Config;
use crate::errors::ToolError;
use crate::tool::Tool;
use crate::tools::retrieval::RagRetrieval;
use crate::tools::{time, weather};

pub const AGENT_NAME: &str = "multi_tool_bot";
pub const AGENT_MODEL: &str = "gemini-2.0-flash";
pub const AGENT_DESCRIPTION: &str = "A multi-tool bot that can use multiple tools to perform tasks";
pub const AGENT_INSTRUCTION: &str = "You are a helpful assistant that can use multiple tools to answer user queries. Cite retrieved sources for RAG answers.";

/// A capability bound to the agent.
#[derive(Debug)]
pub enum AgentTool {
    Function(Tool),
    Retrieval(RagRetrieval),
}

impl AgentTool {
    pub fn name(&self) -> &str {
        match self {
            AgentTool::Function(tool) => &tool.name,
            AgentTool::Retrieval(retrieval) => &retrieval.name,
        }
    }

    pub fn declaration(&self) -> Value {
        match self {
            AgentTool::Function(tool) => tool.declaration(),
            AgentTool::Retrieval(retrieval) => retrieval.declaration(),
        }
    }

    pub fn invoke(&self, args: &Value) -> Result<Value> {
        match self {
            AgentTool::Function(tool) => tool.call(args),
            AgentTool::Retrieval(retrieval) => retrieval.call(args),
        }
    }
}

/// Model, instructions and tools of a hostable agent.
#[derive(Debug)]
pub struct AgentDefinition {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
    pub tools: Vec<AgentTool>,
}

impl AgentDefinition {
    pub fn new(name: &str, model: &str, description: &str, instruction: &str) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            description: description.to_string(),
            instruction: instruction.to_string(),
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: AgentTool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tool(&self, name: &str) -> Option<&AgentTool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(AgentTool::name).collect()
    }

    /// Run a tool call locally, the way the hosted loop would.
    pub fn invoke(&self, name: &str, args: &Value) -> Result<Value> {
        let tool = self
            .tool(name)
            .ok_or_else(|| ToolError::ToolNotFound(name.to_string()))?;
        tool.invoke(args)
    }

    /// Declarative form shipped to the platform on deploy.
    pub fn spec(&self) -> Result<Value> {
        let mut names = HashSet::new();
        let mut tools = Vec::with_capacity(self.tools.len());
        for tool in &self.tools {
            if !names.insert(tool.name()) {
                return Err(ToolError::DuplicateTool(tool.name().to_string()).into());
            }
            tools.push(tool.declaration());
        }

        Ok(json!({
            "name": self.name,
            "model": self.model,
            "description": self.description,
            "instruction": self.instruction,
            "tools": tools,
        }))
    }
}

/// The deployed agent: time and weather lookups, plus corpus retrieval when a
/// corpus is configured.
pub fn root_agent(config: &Config) -> Result<AgentDefinition> {
    let agent = AgentDefinition::new(AGENT_NAME, AGENT_MODEL, AGENT_DESCRIPTION, AGENT_INSTRUCTION)
        .with_tool(AgentTool::Function(time::tool()))
        .with_tool(AgentTool::Function(weather::tool()));

    match &config.rag_corpus {
        Some(corpus) => Ok(agent.with_tool(AgentTool::Retrieval(RagRetrieval::new(
            config, corpus,
        )?))),
        None => {
            tracing::warn!("RAG_CORPUS is not set; deploying without the retrieval tool");
            Ok(agent)
        }
    }
}
