//! Response envelopes for the REST API

use serde::Serialize;

use crate::repo::BatchOutcome;

/// List response with the window it was fetched with
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub count: usize,
    pub limit: usize,
    pub offset: usize,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>, limit: usize, offset: usize) -> Self {
        let count = data.len();
        Self {
            data,
            count,
            limit,
            offset,
        }
    }
}

/// Single record response
#[derive(Debug, Clone, Serialize)]
pub struct SingleResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> SingleResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Create response carrying the assigned id
#[derive(Debug, Clone, Serialize)]
pub struct CreateResponse {
    pub id: String,
}

impl CreateResponse {
    pub fn new(id: String) -> Self {
        Self { id }
    }
}

/// One failed entry of a batch create
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    /// Position of the record in the submitted batch
    pub index: usize,
    pub error: String,
}

/// Batch create response: assigned ids plus per-entry failures
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub created: Vec<String>,
    pub failures: Vec<BatchFailure>,
}

impl From<&BatchOutcome> for BatchResponse {
    fn from(outcome: &BatchOutcome) -> Self {
        let mut created = Vec::new();
        let mut failures = Vec::new();
        for (index, result) in outcome.results().iter().enumerate() {
            match result {
                Ok(id) => created.push(id.clone()),
                Err(err) => failures.push(BatchFailure {
                    index,
                    error: err.to_string(),
                }),
            }
        }
        Self { created, failures }
    }
}

/// Delete response
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn success() -> Self {
        Self { deleted: true }
    }
}
