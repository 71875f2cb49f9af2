use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use rowbind_core::errors::{ExError, Result};
use rowbind_core::{
    Clock, ConnectionGateway, EntityType, Model, Record, Row, Statement, Value,
};
use rowbind_store::SqliteGateway;
use std::sync::{Arc, OnceLock};

pub const SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT,
        email TEXT,
        status TEXT,
        age INTEGER,
        created_at TEXT,
        updated_at TEXT,
        deleted_at TEXT
    );
    CREATE TABLE profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        bio TEXT
    );
    CREATE TABLE posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        title TEXT,
        created_at TEXT,
        updated_at TEXT
    );
";

/// Soft-deleting, timestamped entity
#[allow(dead_code)]
#[derive(Debug)]
pub struct User(Record);

impl Model for User {
    fn entity_type() -> Arc<EntityType> {
        static TYPE: OnceLock<Arc<EntityType>> = OnceLock::new();
        TYPE.get_or_init(|| EntityType::new("User").with_soft_delete(true).shared())
            .clone()
    }

    fn from_record(record: Record) -> Self {
        User(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}

#[allow(dead_code)]
impl User {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

/// Plain entity: no timestamps, hard delete
#[allow(dead_code)]
#[derive(Debug)]
pub struct Profile(Record);

impl Model for Profile {
    fn entity_type() -> Arc<EntityType> {
        static TYPE: OnceLock<Arc<EntityType>> = OnceLock::new();
        TYPE.get_or_init(|| EntityType::new("Profile").with_timestamps(false).shared())
            .clone()
    }

    fn from_record(record: Record) -> Self {
        Profile(record)
    }

    fn record(&self) -> &Record {
        &self.0
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.0
    }
}

#[allow(dead_code)]
pub fn posts() -> Arc<EntityType> {
    static TYPE: OnceLock<Arc<EntityType>> = OnceLock::new();
    TYPE.get_or_init(|| EntityType::new("Post").shared()).clone()
}

/// In-memory SQLite gateway with the test schema applied
#[allow(dead_code)]
pub fn setup_gateway() -> SqliteGateway {
    let gateway = SqliteGateway::open_in_memory().expect("Failed to open database");
    gateway.execute_batch(SCHEMA).expect("Failed to create schema");
    gateway
}

/// Insert a user row directly and return its id
#[allow(dead_code)]
pub fn seed_user(gateway: &SqliteGateway, name: &str, status: &str, age: i64) -> i64 {
    let mut user = User::new();
    user.record_mut()
        .set("name", name)
        .set("status", status)
        .set("age", age);
    let outcome = rowbind_engine::save_reporting_key(user.record_mut(), gateway).expect("seed user");
    match outcome.generated_key() {
        Some(Value::Integer(id)) => *id,
        other => panic!("unexpected generated key {:?}", other),
    }
}

/// Clock frozen at a fixed instant
#[allow(dead_code)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[allow(dead_code)]
pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap() + Duration::microseconds(250))
}

/// Gateway double recording every statement it sees
///
/// Queries answer with the configured rows; `fail` makes every call error.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingGateway {
    pub statements: Mutex<Vec<Statement>>,
    pub rows: Vec<Row>,
    pub fail: bool,
}

#[allow(dead_code)]
impl RecordingGateway {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn recorded(&self) -> Vec<Statement> {
        self.statements.lock().clone()
    }

    fn record(&self, statement: &Statement) -> Result<()> {
        self.statements.lock().push(statement.clone());
        if self.fail {
            return Err(ExError::storage(std::io::Error::new(
                std::io::ErrorKind::Other,
                "connection reset",
            )));
        }
        Ok(())
    }
}

impl ConnectionGateway for RecordingGateway {
    fn execute(&self, statement: &Statement) -> Result<u64> {
        self.record(statement)?;
        Ok(1)
    }

    fn query(&self, statement: &Statement) -> Result<Vec<Row>> {
        self.record(statement)?;
        Ok(self.rows.clone())
    }
}
