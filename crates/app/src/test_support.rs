use std::sync::Arc;

use hr_records_storage::Database;
use hr_records_util::Environment;

use crate::auth::{Role, StaticCredentialStore};
use crate::router::AppState;
use crate::telemetry;

pub const ADMIN: (&str, &str) = ("admin", "admin-pass");
pub const USER: (&str, &str) = ("user", "user-pass");

/// Fresh in-memory database with migrations applied.
pub async fn setup_database() -> Database {
    let database = Database::connect("sqlite::memory:?cache=shared")
        .await
        .expect("connect");
    database.run_migrations().await.expect("migrations");
    database
}

pub async fn setup_state() -> AppState {
    let metrics = telemetry::init_metrics().expect("metrics init");
    let credentials = StaticCredentialStore::new()
        .with_account(ADMIN.0, ADMIN.1, vec![Role::Admin])
        .with_account(USER.0, USER.1, vec![Role::User]);
    AppState::new(
        metrics,
        setup_database().await,
        Arc::new(credentials),
        Environment::Test,
    )
}
