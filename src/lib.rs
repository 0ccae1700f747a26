//! Subhub - Subscription Aggregator
//!
//! Merges proxy subscription sources and manually added nodes into a single
//! subscription and serves it in the format the requesting client expects.
//!
//! ## Features
//!
//! - Concurrent source fetching with per-source failure isolation
//! - Node list detection for base64 and plaintext sources
//! - Client format detection (Clash, Surge, Quantumult X, Loon, sing-box)
//! - Delegation to an external subscription conversion service
//! - Links from a JSON file, an environment list or PostgreSQL

pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repository;
pub mod subscription;

pub use config::Config;
pub use database::Database;
pub use error::{Result, SubhubError};
