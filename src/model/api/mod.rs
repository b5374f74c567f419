//! API-friendly types.
//!
//! These types are serialised in an API-friendly way, e.g.:
//!
//! - IDs are hex strings, datetimes are RFC 3339 strings.
//! - Field names are camelCase.

pub mod evaluation;
pub mod field_pool;
mod response;

pub use response::Response;
