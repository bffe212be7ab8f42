//! Shared fixtures for the integration tests: an in-memory SQLite database
//! with the retail schema hand-created (enum columns become TEXT), plus raw
//! seed helpers.

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement, Value};
use uuid::Uuid;

pub async fn sqlite_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .unwrap();

    for sql in [
        r#"
        CREATE TABLE stores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'active',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE users (
            id TEXT PRIMARY KEY,
            name TEXT,
            email TEXT NOT NULL UNIQUE,
            email_verified TEXT,
            image TEXT,
            role TEXT NOT NULL DEFAULT 'store_staff',
            store_id INTEGER REFERENCES stores (id),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
        r#"
        CREATE TABLE products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            store_id INTEGER NOT NULL REFERENCES stores (id),
            image_url TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL,
            price REAL NOT NULL,
            stock INTEGER NOT NULL,
            available_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    ] {
        db.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
            .await
            .unwrap();
    }

    db
}

pub async fn seed_store(db: &DatabaseConnection, name: &str, status: &str) {
    let now = Utc::now().to_rfc3339();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO stores (name, address, phone, email, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        vec![
            name.into(),
            "1 Main St".into(),
            "555-0100".into(),
            "store@example.test".into(),
            status.into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .unwrap();
}

pub async fn seed_user(db: &DatabaseConnection, id: Uuid, email: &str) {
    let now = Utc::now().to_rfc3339();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO users (id, email, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        vec![
            id.into(),
            email.into(),
            "store_staff".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .unwrap();
}

pub async fn seed_product(db: &DatabaseConnection, store_id: i32, name: &str, price: f64) {
    let now = Utc::now().to_rfc3339();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO products (store_id, image_url, name, status, price, stock, \
         available_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        vec![
            store_id.into(),
            "https://img.example.test/p.png".into(),
            name.into(),
            "active".into(),
            Value::Double(Some(price)),
            3.into(),
            now.clone().into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .unwrap();
}
