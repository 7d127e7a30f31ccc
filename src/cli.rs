//! CLI definitions for ATP.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ATP CLI.
#[derive(Parser)]
#[command(name = "atp")]
#[command(about = "Agent Tool Protocol toolkit host and client")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Host the demo toolkit in the foreground (default)
    Serve {
        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Server port
        #[arg(long)]
        port: Option<u16>,

        /// Do not restart when watched sources change
        #[arg(long)]
        no_auto_restart: bool,
    },

    /// Print a toolkit's tool schemas shaped for a provider
    Context {
        /// Toolkit ID
        toolkit_id: String,

        /// Provider (openai, anthropic, mistral or an alias)
        #[arg(short, long, default_value = "openai")]
        provider: String,

        /// Prompt forwarded to the backend
        #[arg(long)]
        prompt: Option<String>,
    },

    /// Execute provider tool calls read from a JSON file ("-" for stdin)
    Call {
        /// Toolkit ID
        toolkit_id: String,

        /// Provider that produced the calls
        #[arg(short, long, default_value = "openai")]
        provider: String,

        /// Tool-call payload
        #[arg(long)]
        payload: PathBuf,

        /// Credential for key or bearer authenticated tools
        #[arg(long, env = "ATP_AUTH_TOKEN")]
        auth_token: Option<String>,

        /// User whose OAuth connections back delegated tools
        #[arg(long)]
        user: Option<String>,

        /// OAuth platforms to load the user's connection for
        #[arg(long = "platform")]
        platforms: Vec<String>,
    },

    /// Connect a user to an OAuth platform and wait for authorization
    Oauth {
        /// Platform ID (e.g. github)
        platform_id: String,

        /// External user ID
        external_user_id: String,
    },
}
