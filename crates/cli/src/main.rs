//! Lunchbox CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! lunchbox migrate
//!
//! # Seed the database with the starter stores and menu
//! lunchbox seed
//!
//! # Create a user
//! lunchbox user create -n "Alice"
//!
//! # Create a user who may delete any store
//! lunchbox user create -n "Alice" --can-delete-stores
//! ```
//!
//! # Environment Variables
//!
//! - `LUNCHBOX_DATABASE_URL` - SQLite connection string
//!   (default: `sqlite://lunchbox.db?mode=rwc`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lunchbox")]
#[command(author, version, about = "Lunchbox CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with the starter stores and menu items
    Seed,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Display name (unique)
        #[arg(short, long)]
        name: String,

        /// Grant the global permission to delete any store
        #[arg(long)]
        can_delete_stores: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                name,
                can_delete_stores,
            } => {
                commands::user::create(&name, can_delete_stores).await?;
            }
        },
    }
    Ok(())
}
