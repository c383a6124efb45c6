//! User record and its field invariants
//!
//! Timestamps (`dob`, `ctime`) are Unix seconds. The record's `id` doubles
//! as the store's document key; it is empty until the repository assigns
//! one at create time and immutable afterwards.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A user record as stored in the search collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned document key; empty before creation.
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Date of birth, Unix seconds. Must be in the past.
    pub dob: i64,
    pub address: String,
    pub description: String,
    /// Record creation time, Unix seconds. Must not be in the future.
    pub ctime: i64,
}

/// A field invariant the record violates.
///
/// Checks short-circuit: the first failing field determines the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("id must be empty before creation")]
    IdAlreadyAssigned,
    #[error("id must not be empty")]
    MissingId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("dob must be in the past")]
    DobNotInPast,
    #[error("address must not be empty")]
    EmptyAddress,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("ctime must not be in the future")]
    CtimeInFuture,
}

impl User {
    /// Validates a record submitted for creation.
    ///
    /// Check order: id empty, name, dob, address, description, ctime.
    pub fn validate_new(&self) -> Result<(), ValidationError> {
        if !self.id.is_empty() {
            return Err(ValidationError::IdAlreadyAssigned);
        }
        self.validate_fields(Utc::now().timestamp())
    }

    /// Validates a record submitted for a full update.
    ///
    /// The record must already carry its id; field invariants are the same
    /// as for creation.
    pub fn validate_update(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingId);
        }
        self.validate_fields(Utc::now().timestamp())
    }

    fn validate_fields(&self, now: i64) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.dob >= now {
            return Err(ValidationError::DobNotInPast);
        }
        if self.address.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }
        if self.description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if self.ctime > now {
            return Err(ValidationError::CtimeInFuture);
        }
        Ok(())
    }
}
