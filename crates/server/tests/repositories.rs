//! Repository tests against an in-memory SQLite database.
//!
//! Each test migrates a fresh single-connection pool, so foreign keys and
//! cascade rules are exercised exactly as in production.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use lunchbox_core::Price;
use lunchbox_server::db::stores::{MenuChange, NewStore, StoreUpdate};
use lunchbox_server::db::{
    EventRepository, MIGRATOR, OrderRepository, RepositoryError, StoreRepository, UserRepository,
};
use lunchbox_server::models::{MenuItem, Store, User};

async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory pool");

    MIGRATOR.run(&pool).await.expect("migrations apply");
    pool
}

async fn seed_store(pool: &SqlitePool, name: &str) -> Store {
    StoreRepository::new(pool)
        .create(&NewStore {
            name: name.to_owned(),
            notes: String::new(),
            owner_id: None,
        })
        .await
        .expect("store created")
}

async fn seed_item(pool: &SqlitePool, store: &Store, name: &str, price: i64) -> MenuItem {
    StoreRepository::new(pool)
        .create_menu_item(store.id, name, Price::new(price))
        .await
        .expect("menu item created")
}

async fn seed_user(pool: &SqlitePool, name: &str) -> User {
    UserRepository::new(pool)
        .create(name, false)
        .await
        .expect("user created")
}

#[tokio::test]
async fn store_delete_cascades_to_children() {
    let pool = test_pool().await;
    let stores = StoreRepository::new(&pool);

    let store = seed_store(&pool, "McDonald's").await;
    let item = seed_item(&pool, &store, "Big Mac Meal", 99).await;
    let event = EventRepository::new(&pool)
        .create(store.id)
        .await
        .expect("event created");
    let user = seed_user(&pool, "alice").await;
    OrderRepository::new(&pool)
        .upsert(event.id, user.id, item.id, "no pickles")
        .await
        .expect("order placed");

    stores.delete(store.id).await.expect("store deleted");

    assert!(stores.get(store.id).await.expect("query ok").is_none());
    assert!(
        stores
            .get_menu_item(item.id)
            .await
            .expect("query ok")
            .is_none()
    );
    assert!(
        EventRepository::new(&pool)
            .get(event.id)
            .await
            .expect("query ok")
            .is_none()
    );
    assert_eq!(
        OrderRepository::new(&pool)
            .count_for_event(event.id)
            .await
            .expect("query ok"),
        0
    );
    // The ordering user survives the cascade.
    assert!(
        UserRepository::new(&pool)
            .get(user.id)
            .await
            .expect("query ok")
            .is_some()
    );
}

#[tokio::test]
async fn resubmitting_an_order_keeps_one_row_with_latest_values() {
    let pool = test_pool().await;

    let store = seed_store(&pool, "McDonald's").await;
    let big_mac = seed_item(&pool, &store, "Big Mac Meal", 99).await;
    let event = EventRepository::new(&pool)
        .create(store.id)
        .await
        .expect("event created");
    let user = seed_user(&pool, "u").await;

    let orders = OrderRepository::new(&pool);
    let first = orders
        .upsert(event.id, user.id, big_mac.id, "no pickles")
        .await
        .expect("first submission");
    let second = orders
        .upsert(event.id, user.id, big_mac.id, "extra pickles")
        .await
        .expect("second submission");

    assert_eq!(first.id, second.id);
    assert_eq!(second.notes, "extra pickles");
    assert_eq!(
        orders.count_for_event(event.id).await.expect("query ok"),
        1
    );

    let found = orders
        .find(event.id, user.id)
        .await
        .expect("query ok")
        .expect("order exists");
    assert_eq!(found.notes, "extra pickles");
}

#[tokio::test]
async fn ordering_a_vanished_item_is_a_conflict_not_a_database_error() {
    let pool = test_pool().await;

    let store = seed_store(&pool, "S").await;
    let item = seed_item(&pool, &store, "Gone soon", 10).await;
    let event = EventRepository::new(&pool)
        .create(store.id)
        .await
        .expect("event created");
    let user = seed_user(&pool, "u").await;

    // The item disappears after the menu was read but before the order
    // lands.
    StoreRepository::new(&pool)
        .delete_menu_item(item.id)
        .await
        .expect("item deleted");

    let result = OrderRepository::new(&pool)
        .upsert(event.id, user.id, item.id, "")
        .await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[tokio::test]
async fn orders_from_different_users_coexist() {
    let pool = test_pool().await;

    let store = seed_store(&pool, "S").await;
    let item = seed_item(&pool, &store, "Cone", 15).await;
    let event = EventRepository::new(&pool)
        .create(store.id)
        .await
        .expect("event created");
    let a = seed_user(&pool, "a").await;
    let b = seed_user(&pool, "b").await;

    let orders = OrderRepository::new(&pool);
    orders
        .upsert(event.id, a.id, item.id, "")
        .await
        .expect("a orders");
    orders
        .upsert(event.id, b.id, item.id, "two scoops")
        .await
        .expect("b orders");

    let listing = orders.list_for_event(event.id).await.expect("query ok");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].user_name, "a");
    assert_eq!(listing[1].user_name, "b");
    assert_eq!(listing[1].item_price, Price::new(15));
}

#[tokio::test]
async fn update_with_menu_applies_all_edits_atomically() {
    let pool = test_pool().await;
    let stores = StoreRepository::new(&pool);

    let store = seed_store(&pool, "Old name").await;
    let keep = seed_item(&pool, &store, "Keep", 10).await;
    let removed = seed_item(&pool, &store, "Drop", 20).await;

    stores
        .update_with_menu(
            store.id,
            &StoreUpdate {
                name: "New name".to_owned(),
                notes: "now with notes".to_owned(),
                menu: vec![
                    MenuChange::Update {
                        id: keep.id,
                        name: "Kept".to_owned(),
                        price: Price::new(11),
                    },
                    MenuChange::Delete { id: removed.id },
                    MenuChange::Insert {
                        name: "Fresh".to_owned(),
                        price: Price::new(30),
                    },
                ],
            },
        )
        .await
        .expect("update applies");

    let updated = stores
        .get(store.id)
        .await
        .expect("query ok")
        .expect("store exists");
    assert_eq!(updated.name, "New name");
    assert_eq!(updated.notes, "now with notes");

    let menu = stores.menu_items(store.id).await.expect("query ok");
    let names: Vec<&str> = menu.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Kept", "Fresh"]);
    assert_eq!(menu[0].price, Price::new(11));
}

#[tokio::test]
async fn update_with_menu_rolls_back_when_a_row_is_foreign() {
    let pool = test_pool().await;
    let stores = StoreRepository::new(&pool);

    let mine = seed_store(&pool, "Mine").await;
    let theirs = seed_store(&pool, "Theirs").await;
    let foreign_item = seed_item(&pool, &theirs, "Not yours", 5).await;

    let result = stores
        .update_with_menu(
            mine.id,
            &StoreUpdate {
                name: "Renamed".to_owned(),
                notes: String::new(),
                menu: vec![MenuChange::Update {
                    id: foreign_item.id,
                    name: "Hijacked".to_owned(),
                    price: Price::new(1),
                }],
            },
        )
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));

    // Neither the store fields nor the foreign row changed.
    let unchanged = stores
        .get(mine.id)
        .await
        .expect("query ok")
        .expect("store exists");
    assert_eq!(unchanged.name, "Mine");

    let untouched = stores
        .get_menu_item(foreign_item.id)
        .await
        .expect("query ok")
        .expect("item exists");
    assert_eq!(untouched.name, "Not yours");
}

#[tokio::test]
async fn latest_event_is_the_most_recently_created() {
    let pool = test_pool().await;
    let events = EventRepository::new(&pool);

    assert!(events.latest().await.expect("query ok").is_none());

    let s1 = seed_store(&pool, "S1").await;
    let s2 = seed_store(&pool, "S2").await;
    let e1 = events.create(s1.id).await.expect("e1 created");
    let e2 = events.create(s2.id).await.expect("e2 created");
    assert!(e1.id < e2.id);

    let latest = events
        .latest()
        .await
        .expect("query ok")
        .expect("event exists");
    assert_eq!(latest.id, e2.id);
    assert_eq!(latest.store_id, s2.id);
}

#[tokio::test]
async fn event_creation_requires_an_existing_store() {
    let pool = test_pool().await;

    let result = EventRepository::new(&pool)
        .create(lunchbox_core::StoreId::new(999))
        .await;
    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[tokio::test]
async fn duplicate_user_names_are_conflicts() {
    let pool = test_pool().await;
    let users = UserRepository::new(&pool);

    users.create("alice", false).await.expect("first create");
    let result = users.create("alice", true).await;
    assert!(matches!(result, Err(RepositoryError::Conflict(_))));

    // get_or_create resolves to the existing row instead.
    let user = users.get_or_create("alice").await.expect("lookup ok");
    assert!(!user.can_delete_stores);
}

#[tokio::test]
async fn deleting_an_owner_leaves_the_store_unowned() {
    let pool = test_pool().await;

    let owner = seed_user(&pool, "owner").await;
    let store = StoreRepository::new(&pool)
        .create(&NewStore {
            name: "Owned".to_owned(),
            notes: String::new(),
            owner_id: Some(owner.id),
        })
        .await
        .expect("store created");

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(owner.id)
        .execute(&pool)
        .await
        .expect("owner deleted");

    let orphaned = StoreRepository::new(&pool)
        .get(store.id)
        .await
        .expect("query ok")
        .expect("store survives");
    assert_eq!(orphaned.owner_id, None);
}
