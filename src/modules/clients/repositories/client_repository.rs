use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::core::{AppError, AppResult};
use crate::modules::clients::models::Client;

/// Persistence gateway for clients
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Client>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Client>>;

    async fn find_by_siret(&self, siret: &str) -> AppResult<Option<Client>>;

    async fn insert(
        &self,
        name: &str,
        email: &str,
        siret: &str,
        created_at: DateTime<Utc>,
    ) -> AppResult<Client>;

    async fn update(&self, id: i64, name: &str, email: &str, siret: &str) -> AppResult<()>;

    /// Deletes the client; invoices and their lines go with it through
    /// the schema's cascade rules.
    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// SQLite-backed client repository
pub struct SqliteClientRepository {
    pool: SqlitePool,
}

impl SqliteClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientRepository for SqliteClientRepository {
    async fn list(&self) -> AppResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, siret, created_at FROM clients",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, siret, created_at FROM clients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, siret, created_at FROM clients WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn find_by_siret(&self, siret: &str) -> AppResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, siret, created_at FROM clients WHERE siret = ?",
        )
        .bind(siret)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn insert(
        &self,
        name: &str,
        email: &str,
        siret: &str,
        created_at: DateTime<Utc>,
    ) -> AppResult<Client> {
        let result = sqlx::query(
            "INSERT INTO clients (name, email, siret, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(siret)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(Client {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            siret: siret.to_string(),
            created_at,
        })
    }

    async fn update(&self, id: i64, name: &str, email: &str, siret: &str) -> AppResult<()> {
        // id and created_at are never touched by updates
        sqlx::query("UPDATE clients SET name = ?, email = ?, siret = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(siret)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// The unique indexes on email and siret are the last line of defense
/// against the check-then-write race: two concurrent creates can both
/// pass the service-level check, but only one insert lands.
fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("email") {
                return AppError::conflict("a client with this email already exists");
            }
            if message.contains("siret") {
                return AppError::conflict("a client with this SIRET already exists");
            }
            return AppError::conflict("a client with these details already exists");
        }
    }

    AppError::Database(err)
}
