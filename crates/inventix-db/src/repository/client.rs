//! # Client Repository
//!
//! Database operations for clients.
//!
//! ## Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  id              INTEGER, assigned by SQLite, used for relations       │
//! │  identification  national id the user types in, UNIQUE                 │
//! │                                                                         │
//! │  Register "0102030405" twice                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UNIQUE constraint failed: clients.identification                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError::UniqueViolation { field: "clients.identification" }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use inventix_core::validation::validate_new_client;
use inventix_core::{Client, CoreError, NewClient};

use super::CLIENT_COLUMNS;
use crate::error::DbResult;

/// Repository for client database operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    /// Creates a new ClientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Registers a client.
    ///
    /// The input is validated and trimmed before it is stored.
    ///
    /// ## Returns
    /// * `Ok(Client)` - The stored row, with its new id
    /// * `Err(DbError::UniqueViolation)` - Identification already registered
    /// * `Err(DbError::Rule)` - Validation failed
    pub async fn insert(&self, input: &NewClient) -> DbResult<Client> {
        let client = validate_new_client(input.clone()).map_err(CoreError::from)?;

        debug!(identification = %client.identification, "Inserting client");

        let sql = format!(
            "INSERT INTO clients (name, identification, phone, email, address, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             RETURNING {CLIENT_COLUMNS}"
        );

        let stored: Client = sqlx::query_as(&sql)
            .bind(&client.name)
            .bind(&client.identification)
            .bind(&client.phone)
            .bind(&client.email)
            .bind(&client.address)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        info!(id = stored.id, name = %stored.name, "Client registered");
        Ok(stored)
    }

    /// Lists all clients, sorted by name (ties by id).
    pub async fn list(&self) -> DbResult<Vec<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name, id");

        let clients: Vec<Client> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = clients.len(), "Listed clients");
        Ok(clients)
    }

    /// Gets a client by its ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Client>> {
        let sql = format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1");

        let client = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Deletes a client.
    ///
    /// ## Returns
    /// * `Ok(n)` - Rows removed; `0` when no such client exists
    /// * `Err(DbError::ForeignKeyViolation)` - The client has recorded sales
    pub async fn delete(&self, id: i64) -> DbResult<u64> {
        debug!(id, "Deleting client");

        let result = sqlx::query("DELETE FROM clients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        info!(id, removed, "Client delete finished");
        Ok(removed)
    }

    /// Counts registered clients.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
