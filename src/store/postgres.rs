//! PostgreSQL account store

use async_trait::async_trait;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row};

use super::AccountStore;
use crate::account::Account;
use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id            TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    msisdn        TEXT NOT NULL,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    status        INTEGER NOT NULL DEFAULT 0,
    role          INTEGER NOT NULL DEFAULT 0,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const COLUMNS: &str = "id, email, msisdn, username, password_hash, status, role, created_at";

/// Store backed by one long-lived tokio-postgres client. The client
/// pipelines queries, so a single instance is shared by every request.
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Open the connection and spawn its driver task
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let conn_string = config.connection_string();

        let (client, connection) =
            tokio::time::timeout(config.timeout(), tokio_postgres::connect(&conn_string, NoTls))
                .await
                .map_err(|_| Error::Timeout("connect"))??;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        tracing::info!(
            "Connected to PostgreSQL at {}:{}/{}",
            config.host,
            config.port,
            config.dbname
        );

        Ok(Self { client })
    }

    /// Create the accounts table if it does not exist yet
    pub async fn migrate(&self) -> Result<()> {
        self.client.batch_execute(SCHEMA).await?;
        tracing::debug!("Account schema is up to date");
        Ok(())
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Account>> {
        let query = format!("SELECT {} FROM accounts WHERE {} = $1", COLUMNS, column);
        let row = self.client.query_opt(&query, &[&value]).await?;
        row.map(|row| account_from_row(&row)).transpose()
    }
}

fn account_from_row(row: &Row) -> Result<Account> {
    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        msisdn: row.try_get("msisdn")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        status: row.try_get("status")?,
        role: row.try_get("role")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.find_one("username", username).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        self.find_one("id", id).await
    }

    async fn insert(&self, account: &Account) -> Result<()> {
        let query = format!(
            "INSERT INTO accounts ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            COLUMNS
        );
        let result = self
            .client
            .execute(
                &query,
                &[
                    &account.id,
                    &account.email,
                    &account.msisdn,
                    &account.username,
                    &account.password_hash,
                    &account.status,
                    &account.role,
                    &account.created_at,
                ],
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Err(Error::Conflict("account already exists".to_string()))
            }
            Err(e) => Err(Error::Database(e)),
        }
    }
}
