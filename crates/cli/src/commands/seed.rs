//! Database seeding command.
//!
//! ```bash
//! lunchbox seed
//! ```
//!
//! Inserts the two starter stores and McDonald's starter menu. Running
//! it twice inserts the rows twice; it is meant for a fresh database.

use lunchbox_core::Price;
use lunchbox_server::db::StoreRepository;
use lunchbox_server::db::stores::NewStore;

use super::CommandError;

/// Seed the database with the starter stores and menu items.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let repo = StoreRepository::new(&pool);

    tracing::info!("Seeding stores...");

    repo.create(&NewStore {
        name: "Kennedy".to_owned(),
        notes: "No crispy chicken, no deal".to_owned(),
        owner_id: None,
    })
    .await
    .map_err(sqlx_err)?;

    let mcdonalds = repo
        .create(&NewStore {
            name: "McDonald's".to_owned(),
            notes: String::new(),
            owner_id: None,
        })
        .await
        .map_err(sqlx_err)?;

    repo.create_menu_item(mcdonalds.id, "Big Mac Meal", Price::new(99))
        .await
        .map_err(sqlx_err)?;
    repo.create_menu_item(mcdonalds.id, "Cone", Price::new(15))
        .await
        .map_err(sqlx_err)?;

    tracing::info!("Seeding complete!");
    Ok(())
}

fn sqlx_err(err: lunchbox_server::db::RepositoryError) -> CommandError {
    CommandError::Invalid(err.to_string())
}
