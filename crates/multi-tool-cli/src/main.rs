mod commands;

use std::ffi::OsString;
use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use commands::create_agent::handle_create_agent;
use commands::create_session::handle_create_session;
use commands::send_message::handle_send_message;
use multi_tool::config::{Config, EnvConfig, Lookup};
use multi_tool::engine::{AgentEngine, VertexAgentEngine};

const DEFAULT_USER_ID: &str = "test_user_123";

#[derive(Parser)]
#[command(author, version, about = "Vertex AI Agent Deployment & Interaction CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Deploy a new agent to Vertex AI.
    CreateAgent,

    /// Create a new interaction session for a deployed agent.
    CreateSession {
        /// The unique ID of the deployed agent.
        #[arg(long)]
        resource_id: String,

        /// A unique identifier for the end-user.
        #[arg(long, default_value = DEFAULT_USER_ID)]
        user_id: String,
    },

    /// Send a message to an agent session.
    SendMessage {
        /// The unique ID of the deployed agent.
        #[arg(long)]
        resource_id: String,

        /// The ID of the session to use.
        #[arg(long)]
        session_id: String,

        /// The message to send.
        #[arg(long)]
        message: String,

        /// A unique identifier for the end-user.
        #[arg(long, default_value = DEFAULT_USER_ID)]
        user_id: String,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    run(
        &|key| std::env::var(key).ok(),
        std::env::args_os(),
        connect,
        &mut stdout.lock(),
    )
}

fn connect(config: &Config) -> Result<Box<dyn AgentEngine>> {
    Ok(Box::new(VertexAgentEngine::new(config.clone())?))
}

/// Validate configuration, parse the command line and run one command.
///
/// A configuration problem is reported on `out` and ends the run before any
/// engine is created.
fn run<I, T, F>(lookup: Lookup<'_>, args: I, connect: F, out: &mut dyn Write) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(&Config) -> Result<Box<dyn AgentEngine>>,
{
    let config = match Config::from_lookup(lookup) {
        Ok(config) => config,
        Err(err) => {
            writeln!(out, "{} {}", style("❌").red(), err)?;
            return Ok(());
        }
    };

    print_banner(&config, out)?;

    let cli = Cli::parse_from(args);
    let engine = connect(&config)?;

    match cli.command {
        Command::CreateAgent => {
            handle_create_agent(engine.as_ref(), &config, out)?;
        }
        Command::CreateSession {
            resource_id,
            user_id,
        } => {
            handle_create_session(engine.as_ref(), &config, &resource_id, &user_id, out)?;
        }
        Command::SendMessage {
            resource_id,
            session_id,
            message,
            user_id,
        } => {
            handle_send_message(
                engine.as_ref(),
                &config,
                &resource_id,
                &session_id,
                &message,
                &user_id,
                out,
            )?;
        }
    }
    Ok(())
}

fn print_banner(config: &Config, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "Initializing Vertex AI:")?;
    writeln!(out, "  Project: {}", config.project_id)?;
    writeln!(out, "  Location: {}", config.location)?;
    writeln!(out, "  Staging Bucket: {}", config.staging_bucket)?;
    if config.rag_corpus.is_some() {
        writeln!(out, "  RAG Region: {}", config.rag_region)?;
    }
    Ok(())
}
