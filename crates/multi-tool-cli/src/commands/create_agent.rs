use std::io::Write;

use anyhow::Result;
use console::style;
use multi_tool::agent::root_agent;
use multi_tool::config::Config;
use multi_tool::engine::{AgentEngine, DeployRequest, DeployedResource};

/// Pinned dependencies installed next to the hosted agent.
pub const REQUIREMENTS: [&str; 4] = [
    "google-adk>=1.7.0,<2.0.0",
    "google-cloud-aiplatform[adk,agent_engines]>=1.49.0",
    "pydantic>=2.11.3,<3.0.0",
    "cloudpickle>=3.1.0,<4.0.0",
];

/// Local code packages shipped with the agent.
pub const EXTRA_PACKAGES: [&str; 1] = ["./multi_tool"];

/// Deploys the agent to Vertex AI Agent Engine.
pub fn handle_create_agent(
    engine: &dyn AgentEngine,
    config: &Config,
    out: &mut dyn Write,
) -> Result<DeployedResource> {
    let agent = root_agent(config)?;
    let request = DeployRequest::new(&agent, config)?
        .with_requirements(&REQUIREMENTS)
        .with_extra_packages(&EXTRA_PACKAGES);

    let resource = engine.deploy(&request)?;

    writeln!(
        out,
        "{} Created remote agent. Resource Name:\n{}",
        style("✅").green(),
        resource.resource_name
    )?;
    writeln!(
        out,
        "\nUse this Resource ID for other commands: {}",
        resource.resource_id()
    )?;
    Ok(resource)
}
