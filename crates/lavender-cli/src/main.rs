//! Lavender command-line tool.
//!
//! # Usage
//!
//! ```bash
//! # Generate a key pair
//! lavender keygen
//!
//! # Seal a message for a recipient
//! lavender seal --private <b64> --recipient <b64> "hello"
//!
//! # Show what a chat screen would display for stored content
//! lavender open --private <b64> --counterparty <b64> --locale es <content>
//! ```

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use lavender_cli::{OpenKeys, keygen, open, render, seal};
use lavender_client::{KeyEpoch, Locale, SystemEnv};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Lavender message sealing tool
#[derive(Parser, Debug)]
#[command(name = "lavender")]
#[command(about = "Seal and open Lavender chat messages")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a fresh key pair
    Keygen,

    /// Seal a message for a recipient
    Seal {
        /// Sender private key (base64)
        #[arg(long)]
        private: String,

        /// Recipient public key (base64)
        #[arg(long)]
        recipient: String,

        /// Derive the key the way pre-migration clients did
        #[arg(long)]
        legacy: bool,

        /// Message text
        text: String,
    },

    /// Decrypt stored content, falling back to the legacy key
    Open {
        /// Viewer current private key (base64)
        #[arg(long)]
        private: String,

        /// Viewer legacy private key (base64)
        #[arg(long)]
        legacy_private: Option<String>,

        /// Counterparty public key (base64)
        #[arg(long)]
        counterparty: String,

        /// Language of the undecryptable placeholder (e.g. en, es-MX)
        #[arg(long, default_value = "en")]
        locale: String,

        /// Stored message content
        content: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let env = SystemEnv::new();
    let output = match args.command {
        Command::Keygen => keygen(&env),
        Command::Seal { private, recipient, legacy, text } => {
            let epoch = if legacy { KeyEpoch::Legacy } else { KeyEpoch::Current };
            seal(&env, epoch, &private, &recipient, &text)?
        },
        Command::Open { private, legacy_private, counterparty, locale, content } => {
            let keys = OpenKeys {
                private: &private,
                legacy_private: legacy_private.as_deref(),
                counterparty: &counterparty,
            };
            let negotiation = open(keys, &content)?;
            for attempt in &negotiation.attempts {
                match &attempt.result {
                    Ok(()) => tracing::info!(epoch = attempt.epoch.as_str(), "opened"),
                    Err(err) => tracing::info!(epoch = attempt.epoch.as_str(), error = %err, "failed"),
                }
            }
            render(&negotiation, Locale::from_tag(&locale))
        },
    };

    writeln!(io::stdout().lock(), "{output}")?;
    Ok(())
}
