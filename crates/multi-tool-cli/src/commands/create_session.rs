use std::io::Write;

use anyhow::Result;
use console::style;
use multi_tool::config::Config;
use multi_tool::engine::{AgentEngine, ResourceName};

/// Creates a new session to interact with a deployed agent.
pub fn handle_create_session(
    engine: &dyn AgentEngine,
    config: &Config,
    resource_id: &str,
    user_id: &str,
    out: &mut dyn Write,
) -> Result<String> {
    let resource = ResourceName::resolve(resource_id, config)?;
    let session = engine.create_session(&resource, user_id)?;

    writeln!(
        out,
        "{} Created remote session. Session ID: {}",
        style("✅").green(),
        session.id
    )?;
    Ok(session.id)
}
