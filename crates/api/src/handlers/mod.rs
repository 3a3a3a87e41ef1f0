//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers take what they need from [`AppState`](crate::state::AppState),
//! delegate to `pairlabel_core` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod annotation;
pub mod catalog;
pub mod downloads;
pub mod media;
pub mod ontology;
pub mod stats;
pub mod video;
