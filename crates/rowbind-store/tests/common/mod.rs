// Shared fixtures for store integration tests

use rowbind_store::{SqliteGateway, StoreConfig};
use tempfile::TempDir;

pub const SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT,
        active INTEGER,
        score REAL,
        created_at TEXT,
        updated_at TEXT,
        deleted_at TEXT
    );
";

// Helper to create a file-backed gateway with the schema applied
pub fn setup_file_gateway() -> (TempDir, SqliteGateway) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gateway = SqliteGateway::open(dir.path().join("rowbind.db"), &StoreConfig::default())
        .expect("Failed to open database");
    gateway.execute_batch(SCHEMA).expect("Failed to create schema");
    (dir, gateway)
}

pub fn setup_memory_gateway() -> SqliteGateway {
    let gateway = SqliteGateway::open_in_memory().expect("Failed to open database");
    gateway.execute_batch(SCHEMA).expect("Failed to create schema");
    gateway
}
