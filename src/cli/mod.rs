pub mod cache;
pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "lane")]
#[command(about = "Memory Lane CLI - manage photo memory collections from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Bypass the local response cache")]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Authentication and session management")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Memory lane operations")]
    Lanes {
        #[command(subcommand)]
        cmd: commands::lanes::LaneCommands,
    },

    #[command(about = "Memory and image operations")]
    Memories {
        #[command(subcommand)]
        cmd: commands::memories::MemoryCommands,
    },

    #[command(about = "Tag management")]
    Tags {
        #[command(subcommand)]
        cmd: commands::tags::TagCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Everything a command needs: the saved session, an HTTP client bound
/// to it, and the on-disk response cache.
pub struct Context {
    pub session: config::Session,
    pub client: client::ApiClient,
    pub cache: cache::Cache,
    pub use_cache: bool,
    pub output: OutputFormat,
}

impl Context {
    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let session = config::load_session()?;
        let client = client::ApiClient::from_session(&session);
        let cache = cache::Cache::load();
        Ok(Self {
            session,
            client,
            cache,
            use_cache: !cli.no_cache,
            output: OutputFormat::from_cli(cli),
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = Context::from_cli(&cli)?;

    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &mut ctx).await,
        Commands::Lanes { cmd } => commands::lanes::handle(cmd, &mut ctx).await,
        Commands::Memories { cmd } => commands::memories::handle(cmd, &mut ctx).await,
        Commands::Tags { cmd } => commands::tags::handle(cmd, &mut ctx).await,
    };

    ctx.cache.save();
    result
}
