use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gravctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative CLI for Gravitee.io API management", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reconcile an API against a desired-state document
    Apply(ApplyArgs),

    /// Exchange an OAuth2 access token for a gateway token
    Token(TokenArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Connection
// ============================================================================

#[derive(Parser)]
pub struct ConnectionArgs {
    /// Base URL of the management API server
    #[arg(long, env = "GRAVITEE_URL")]
    pub url: String,

    /// Username for basic authentication
    #[arg(long, env = "GRAVITEE_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "GRAVITEE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Pre-obtained gateway token (bearer authentication)
    #[arg(long, env = "GRAVITEE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

// ============================================================================
// Apply
// ============================================================================

#[derive(Parser)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Desired-state document (JSON)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// External OAuth2 access token to exchange before reconciling
    #[arg(long, env = "GRAVITEE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Auth resource id used by the token exchange
    #[arg(long)]
    pub auth_resource_id: Option<String>,
}

// ============================================================================
// Token
// ============================================================================

#[derive(Parser)]
pub struct TokenArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// External OAuth2 access token to exchange
    #[arg(long, env = "GRAVITEE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Auth resource id used by the token exchange
    #[arg(long)]
    pub auth_resource_id: String,
}
