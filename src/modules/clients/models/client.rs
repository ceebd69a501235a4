use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppResult, ValidationErrors};

/// A billed client.
///
/// Email and SIRET are unique across the whole client population; the
/// service layer checks before writing and the database indexes enforce
/// it under concurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Client {
    /// Surrogate id, assigned by the database on creation
    pub id: i64,

    pub name: String,

    pub email: String,

    /// 14-digit business registration number
    pub siret: String,

    /// Set once at creation, never modified by updates
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Validate the mutable client fields, collecting every violation.
    pub fn validate(name: &str, email: &str, siret: &str) -> AppResult<()> {
        let mut errors = ValidationErrors::new();

        if name.trim().is_empty() {
            errors.add("name", "name must not be empty");
        }

        if email.trim().is_empty() {
            errors.add("email", "email must not be empty");
        } else if !is_valid_email(email) {
            errors.add("email", "email format is invalid");
        }

        if siret.trim().is_empty() {
            errors.add("siret", "SIRET must not be empty");
        } else if !is_valid_siret(siret) {
            errors.add("siret", "SIRET must be exactly 14 digits");
        }

        errors.into_result()
    }
}

/// Request body for creating and updating clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientPayload {
    pub name: String,
    pub email: String,
    pub siret: String,
}

/// Syntactic check only: one '@', non-empty local and domain parts,
/// no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = email.split('@');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty()
    )
}

/// Exactly 14 ASCII digits. No checksum validation.
fn is_valid_siret(siret: &str) -> bool {
    siret.len() == 14 && siret.bytes().all(|b| b.is_ascii_digit())
}
