// ABOUTME: Administration CLI for the vault: bootstrap admin accounts, generate encryption keys
// ABOUTME: Talks to the database directly; intended for operators, not end users
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! # CredVault CLI
//!
//! Operator commands that run against the vault database directly.
//!
//! ## Usage
//!
//! ```bash
//! # Bootstrap an admin account
//! cargo run --bin credvault-cli -- user create-admin --username admin --password secret123
//!
//! # Override database URL
//! cargo run --bin credvault-cli -- user create-admin --username admin \
//!     --password secret123 --database-url sqlite:./data/credvault.db
//!
//! # Generate a fresh DATA_ENCRYPTION_KEY value
//! cargo run --bin credvault-cli -- key generate
//! ```

mod commands;

use clap::{Parser, Subcommand};

use credvault::config::environment::ServerConfig;
use credvault::crypto::FieldCipher;
use credvault::database::Database;
use credvault::errors::AppResult;

#[derive(Parser)]
#[command(
    name = "credvault-cli",
    about = "CredVault administration CLI",
    long_about = "Operator commands for the credential vault: admin bootstrap and key generation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Encryption key commands
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create an admin account directly in the database
    CreateAdmin {
        /// Login name for the new admin
        #[arg(long)]
        username: String,

        /// Plaintext password, hashed with bcrypt before storage
        #[arg(long)]
        password: String,

        /// Database URL override
        #[arg(long)]
        database_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Print a fresh `DATA_ENCRYPTION_KEY` value
    Generate,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "credvault=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::CreateAdmin {
                username,
                password,
                database_url,
            } => {
                let config = ServerConfig::from_env()?;
                let url = database_url.unwrap_or(config.database_url);
                let database = Database::new(&url, FieldCipher::from_env()).await?;
                commands::user::create_admin(&database, &username, &password).await
            }
        },
        Commands::Key { command } => match command {
            KeyCommands::Generate => {
                commands::key::generate();
                Ok(())
            }
        },
    }
}
