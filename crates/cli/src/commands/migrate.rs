//! Database migration command.
//!
//! ```bash
//! lunchbox migrate
//! ```
//!
//! Applies the embedded migrations from `crates/server/migrations/`.

use lunchbox_server::db;

use super::CommandError;

/// Run the embedded database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
