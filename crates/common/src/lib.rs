//! Shared utilities, configuration, and error handling for Chatline
//!
//! This crate provides common functionality used across the Chatline service:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors shared by the API handlers
//! - Database pool and migration helpers

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::{HistoryQuery, ValidatedJson, ValidatedQuery};
