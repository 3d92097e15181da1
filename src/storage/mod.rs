//! Storage layer for persona-view
//!
//! Handles configuration management. Profiles are stored as TOML under the
//! platform config directory.

pub mod config;

type Result<T> = crate::Result<T>;
