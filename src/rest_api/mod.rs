//! HTTP boundary for user record operations
//!
//! Thin axum layer over a `UserRepo`: parse parameters, delegate,
//! serialize the result, map the error taxonomy to status codes.

mod errors;
mod response;
mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use response::{
    BatchFailure, BatchResponse, CreateResponse, DeleteResponse, ListResponse, SingleResponse,
};
pub use server::RestServer;
