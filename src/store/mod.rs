//! Connection to the backing document-search store
//!
//! `StoreGateway` owns the HTTP session and gates every read and write on
//! a readiness probe (session alive + target collection present). Search
//! responses are decoded through the typed shapes in `response`.

mod errors;
mod gateway;
mod response;

pub use errors::{StoreError, StoreResult};
pub use gateway::StoreGateway;
pub use response::{Hit, SearchResponse};
