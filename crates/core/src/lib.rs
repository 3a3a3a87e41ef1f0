//! Pure domain logic for the paired-video labeling service.
//!
//! Nothing in this crate knows about HTTP. The API crate wires these
//! building blocks to request handlers; the player module is the
//! client-side protocol, kept here so it can be exercised in isolation.

pub mod annotation;
pub mod error;
pub mod file_id;
pub mod grouping;
pub mod listing;
pub mod manifest;
pub mod media_path;
pub mod ontology;
pub mod player;
pub mod range;
pub mod reconcile;
pub mod stats;
pub mod types;
