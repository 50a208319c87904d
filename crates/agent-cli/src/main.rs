//! News delegation agents from the command line
//!
//! # Usage
//!
//! ```bash
//! # Point the agents at an OpenAI-compatible endpoint (Ollama by default)
//! export MODEL_API_BASE="http://localhost:11434/v1"
//! export MODEL="llama3.2"
//!
//! # Host the analyzers, each on its own port
//! PORT=10002 agent-cli serve-agent --agent sentiment
//! PORT=10003 agent-cli serve-agent --agent business
//!
//! # Chat with the root coordinator, delegating to the hosted analyzers
//! SENTIMENT_AGENT_URL=http://localhost:10002/ \
//! BUSINESS_AGENT_URL=http://localhost:10003/ \
//!     agent-cli chat
//!
//! # Or host the root coordinator itself for other clients
//! PORT=8080 agent-cli serve-agent --agent root
//! ```

mod agents;
mod chat;
mod serve;

use agent_utils::{AppConfig, init_tracing};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "agent-cli")]
#[command(about = "Run and host the news delegation agents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chat with an agent in the terminal
    Chat {
        /// Agent to talk to
        #[arg(long, value_enum, default_value_t = ChatAgent::Root)]
        agent: ChatAgent,

        /// How the root coordinator routes requests
        #[arg(long, value_enum, default_value_t = RouterKind::Keyword)]
        router: RouterKind,

        /// Session identifier
        #[arg(long, default_value = "cli")]
        session: String,

        /// Buckets to create in a local object store
        #[arg(long = "bucket")]
        buckets: Vec<String>,
    },

    /// Host an agent over the agent-to-agent protocol on PORT
    ServeAgent {
        #[arg(long, value_enum)]
        agent: HostedAgent,

        /// How a hosted root coordinator routes requests
        #[arg(long, value_enum, default_value_t = RouterKind::Keyword)]
        router: RouterKind,

        /// Buckets to create in a local object store
        #[arg(long = "bucket")]
        buckets: Vec<String>,
    },

    /// Host the storage tools over the tool server protocol on PORT
    ServeStorage {
        /// Buckets to create before serving
        #[arg(long = "bucket")]
        buckets: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ChatAgent {
    /// Root coordinator over the summarizer and the analyzers
    Root,
    /// City news assistant
    News,
    /// City news assistant with object storage
    Storage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RouterKind {
    Keyword,
    Llm,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum HostedAgent {
    /// Root coordinator over the summarizer and the analyzers
    Root,
    /// City news assistant
    News,
    /// City news assistant with object storage
    Storage,
    Sentiment,
    Business,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    info!(command = ?cli.command, "starting agent-cli");

    match cli.command {
        Command::Chat {
            agent,
            router,
            session,
            buckets,
        } => chat::run(&config, agent, router, session, &buckets).await,
        Command::ServeAgent {
            agent,
            router,
            buckets,
        } => serve::agent(&config, agent, router, &buckets).await,
        Command::ServeStorage { buckets } => serve::storage(&config, &buckets).await,
    }
}
