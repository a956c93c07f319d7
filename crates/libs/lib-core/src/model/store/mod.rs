//! # Database Store
//!
//! Database connection pool, schema bootstrap and repository implementations.

// region: --- Modules
pub mod account_repository;
pub mod company_repository;
pub mod models;
pub mod proposal_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use account_repository::AccountRepository;
pub use company_repository::CompanyRepository;
pub use models::{
    Account, AccountForCreate, CompanyForUpsert, CompanySettings, Proposal, ProposalForCreate,
    ProposalItem, Role,
};
pub use proposal_repository::ProposalRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool, creating the database file if missing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePool::connect_with(options).await
}

/// Create the tables if they do not exist yet. Safe to run on every startup.
pub async fn init_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role          TEXT NOT NULL DEFAULT 'STANDARD',
            created_at    TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS company_settings (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id   INTEGER NOT NULL UNIQUE REFERENCES accounts(id),
            company_name TEXT NOT NULL,
            cnpj         TEXT,
            address      TEXT,
            logo_url     TEXT,
            updated_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS proposals (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id     INTEGER NOT NULL REFERENCES accounts(id),
            title          TEXT NOT NULL,
            client_name    TEXT NOT NULL,
            client_email   TEXT,
            client_company TEXT,
            items_json     TEXT NOT NULL DEFAULT '[]',
            total          REAL NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_proposals_account ON proposals(account_id, created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Single-connection in-memory pool with the schema applied.
///
/// `sqlite::memory:` gives every connection its own database, so the pool is
/// capped at one connection.
pub async fn memory_pool() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}
// endregion: --- Types and Functions
