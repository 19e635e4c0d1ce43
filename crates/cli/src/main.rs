//! NOTE2U CLI - share tokens and card store access.
//!
//! # Usage
//!
//! ```bash
//! # Print the share token for a card
//! n2u encode --file card.json
//!
//! # Print a full share link instead
//! echo '{"to":"Sam","from":"Lee"}' | n2u encode --base-url https://note2u.example/
//!
//! # Show the card inside a token or share link
//! n2u decode 'https://note2u.example/?card=JTdCJTIy...'
//!
//! # Store a card on a running card store, then read it back
//! n2u save --file card.json --server http://127.0.0.1:8888
//! n2u fetch abc123 --server http://127.0.0.1:8888
//! ```
//!
//! # Commands
//!
//! - `encode` - Card JSON to token or share URL
//! - `decode` - Token or share URL to card JSON
//! - `save` - POST a card to the card store
//! - `fetch` - GET a card from the card store

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use url::Url;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "n2u")]
#[command(author, version, about = "NOTE2U card tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode card JSON into a share token
    Encode {
        /// Read card JSON from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print a share URL on top of this page instead of the bare token
        #[arg(short, long)]
        base_url: Option<Url>,
    },
    /// Decode a share token or share URL into card JSON
    Decode {
        /// Token, or a full URL carrying `?card=` or flat fields
        token_or_url: String,
    },
    /// Save a card to a card store
    Save {
        /// Read card JSON from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Card id (6 characters); generated when omitted
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        server: ServerArgs,
    },
    /// Fetch a card from a card store
    Fetch {
        /// Card id
        id: String,

        #[command(flatten)]
        server: ServerArgs,
    },
}

#[derive(clap::Args)]
struct ServerArgs {
    /// Card store base URL
    #[arg(short, long, env = "N2U_SERVER", default_value = "http://127.0.0.1:8888")]
    server: Url,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

impl ServerArgs {
    const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "n2u=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Encode { file, base_url } => {
            let input = commands::read_input(file.as_deref())?;
            commands::codec::encode(&input, base_url.as_ref(), &mut out)?;
        }
        Commands::Decode { token_or_url } => {
            commands::codec::decode(&token_or_url, &mut out)?;
        }
        Commands::Save { file, id, server } => {
            let input = commands::read_input(file.as_deref())?;
            commands::remote::save(
                &server.server,
                server.timeout(),
                &input,
                id.as_deref(),
                &mut out,
            )
            .await?;
        }
        Commands::Fetch { id, server } => {
            commands::remote::fetch(&server.server, server.timeout(), &id, &mut out).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_server_default() {
        let cli = Cli::try_parse_from(["n2u", "fetch", "abc123"]).unwrap_or_else(|e| panic!("{e}"));
        let Commands::Fetch { id, server } = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(id, "abc123");
        assert_eq!(server.timeout(), Duration::from_secs(10));
        assert_eq!(server.server.port(), Some(8888));
    }
}
