use std::io::Write;

use anyhow::Result;
use multi_tool::config::Config;
use multi_tool::engine::{AgentEngine, Query, ResourceName};

/// Sends a message to an agent session and prints the streaming response.
///
/// Every event is written as one JSON document per line, in arrival order.
/// Returns the number of events printed.
pub fn handle_send_message(
    engine: &dyn AgentEngine,
    config: &Config,
    resource_id: &str,
    session_id: &str,
    message: &str,
    user_id: &str,
    out: &mut dyn Write,
) -> Result<usize> {
    let resource = ResourceName::resolve(resource_id, config)?;
    let query = Query::new(user_id, session_id, message);

    writeln!(out, "Agent Response:")?;
    let mut count = 0;
    for event in engine.stream_query(&resource, &query)? {
        writeln!(out, "{}", event?)?;
        out.flush()?;
        count += 1;
    }
    tracing::debug!(events = count, "stream finished");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::mock_engine::MockEngine;
    use serde_json::json;

    #[test]
    fn test_stream_error_after_partial_output() {
        let engine = MockEngine::new()
            .with_events(vec![json!({"id": 1})])
            .with_stream_error("connection reset");
        let config = Config::new("p", "us-central1", "gs://b");
        let mut out = Vec::new();

        let err = handle_send_message(&engine, &config, "1", "s", "hi", "u", &mut out).unwrap_err();

        assert!(err.to_string().contains("connection reset"));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Agent Response:\n{\"id\":1}\n"
        );
    }

    #[test]
    fn test_empty_stream() {
        let engine = MockEngine::new();
        let config = Config::new("p", "us-central1", "gs://b");
        let mut out = Vec::new();

        let count = handle_send_message(&engine, &config, "1", "s", "hi", "u", &mut out).unwrap();

        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "Agent Response:\n");
    }
}
