//! Paired-video labeling API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! media streaming) so integration tests and the binary entrypoint can both
//! access them.

pub mod catalog;
pub mod config;
pub mod downloads;
pub mod error;
pub mod handlers;
pub mod manifest_source;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod store;
pub mod streaming;
