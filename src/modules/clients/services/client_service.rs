use std::sync::Arc;

use chrono::Utc;

use crate::core::{AppError, AppResult};
use crate::modules::clients::models::Client;
use crate::modules::clients::repositories::ClientRepository;

/// Service for client business logic.
///
/// Enforces the population-wide uniqueness of email and SIRET before
/// every write; the storage-level unique indexes back this up under
/// concurrent requests.
pub struct ClientService {
    repo: Arc<dyn ClientRepository>,
}

impl ClientService {
    pub fn new(repo: Arc<dyn ClientRepository>) -> Self {
        Self { repo }
    }

    /// List all clients
    pub async fn list(&self) -> AppResult<Vec<Client>> {
        self.repo.list().await
    }

    /// Get a client by id. Absence is not an error.
    pub async fn get(&self, id: i64) -> AppResult<Option<Client>> {
        self.repo.find_by_id(id).await
    }

    /// Create a new client.
    ///
    /// Fails with a conflict when another client already holds the
    /// email or the SIRET. The creation timestamp is assigned here.
    pub async fn create(&self, name: &str, email: &str, siret: &str) -> AppResult<Client> {
        Client::validate(name, email, siret)?;

        if self.repo.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("a client with this email already exists"));
        }

        if self.repo.find_by_siret(siret).await?.is_some() {
            return Err(AppError::conflict("a client with this SIRET already exists"));
        }

        let client = self.repo.insert(name, email, siret, Utc::now()).await?;

        tracing::info!(client_id = client.id, "client created");

        Ok(client)
    }

    /// Update an existing client's name, email and SIRET.
    ///
    /// Uniqueness checks exclude the client being updated, so a client
    /// can keep its own email or SIRET. Id and creation timestamp are
    /// never altered.
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        email: &str,
        siret: &str,
    ) -> AppResult<Client> {
        Client::validate(name, email, siret)?;

        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("client {} not found", id)))?;

        if let Some(other) = self.repo.find_by_email(email).await? {
            if other.id != id {
                return Err(AppError::conflict("a client with this email already exists"));
            }
        }

        if let Some(other) = self.repo.find_by_siret(siret).await? {
            if other.id != id {
                return Err(AppError::conflict("a client with this SIRET already exists"));
            }
        }

        self.repo.update(id, name, email, siret).await?;

        Ok(Client {
            id,
            name: name.to_string(),
            email: email.to_string(),
            siret: siret.to_string(),
            created_at: existing.created_at,
        })
    }

    /// Delete a client and, by cascade, all of its invoices and lines.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(format!("client {} not found", id)));
        }

        self.repo.delete(id).await?;

        tracing::info!(client_id = id, "client deleted");

        Ok(())
    }
}
