use entity::Status;
use platform_db::NewStore;
use retail_tests::{seed_store, seed_user, sqlite_db};
use uuid::Uuid;

#[tokio::test]
async fn created_store_round_trips_and_is_listed() {
    let db = sqlite_db().await;

    let created = platform_db::create_store(
        &db,
        NewStore {
            name: "Shop A".into(),
            address: "1 Main St".into(),
            phone: "555-0100".into(),
            email: "a@shop.test".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(created.name, "Shop A");
    assert_eq!(created.address, "1 Main St");
    assert_eq!(created.phone, "555-0100");
    assert_eq!(created.email, "a@shop.test");
    assert_eq!(created.status, Status::Active);
    assert!(created.id > 0);

    let listed = platform_db::list_active_stores(&db).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], created);
}

#[tokio::test]
async fn inactive_and_archived_stores_are_never_listed() {
    let db = sqlite_db().await;
    seed_store(&db, "Open", "active").await;
    seed_store(&db, "Closed", "inactive").await;
    seed_store(&db, "Gone", "archived").await;

    let listed = platform_db::list_active_stores(&db).await.unwrap();
    let names: Vec<_> = listed.iter().map(|store| store.name.as_str()).collect();
    assert_eq!(names, ["Open"]);
}

#[tokio::test]
async fn update_user_store_assigns_existing_user() {
    let db = sqlite_db().await;
    seed_store(&db, "Shop A", "active").await;
    let user_id = Uuid::new_v4();
    seed_user(&db, user_id, "staff@example.test").await;

    let updated = platform_db::update_user_store(&db, user_id, 1).await.unwrap();
    assert!(updated);

    let user = platform_db::find_user_by_email(&db, "staff@example.test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.store_id, Some(1));
}

#[tokio::test]
async fn update_user_store_reports_false_for_unknown_user() {
    let db = sqlite_db().await;
    seed_store(&db, "Shop A", "active").await;

    let updated = platform_db::update_user_store(&db, Uuid::new_v4(), 1)
        .await
        .unwrap();
    assert!(!updated);
}

#[tokio::test]
async fn reassignment_is_last_write_wins() {
    let db = sqlite_db().await;
    seed_store(&db, "Shop A", "active").await;
    seed_store(&db, "Shop B", "active").await;
    let user_id = Uuid::new_v4();
    seed_user(&db, user_id, "staff@example.test").await;

    assert!(platform_db::update_user_store(&db, user_id, 1).await.unwrap());
    assert!(platform_db::update_user_store(&db, user_id, 2).await.unwrap());

    let user = platform_db::find_user_by_email(&db, "staff@example.test")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.store_id, Some(2));
}

#[tokio::test]
async fn find_user_by_email_misses_unknown_address() {
    let db = sqlite_db().await;
    let found = platform_db::find_user_by_email(&db, "nobody@example.test")
        .await
        .unwrap();
    assert!(found.is_none());
}
