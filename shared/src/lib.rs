//! Shared types for the reservation service
//!
//! Data models and small utilities shared between reserve-server and API
//! clients. DB row derives are feature-gated so clients don't pull sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
