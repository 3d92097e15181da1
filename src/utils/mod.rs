//! Utils module - Shared utilities and helpers
//!
//! This module provides utility functions and helpers that are used across
//! multiple layers of the application architecture.

/// Conversions from transport errors into [`crate::error::ApiError`]
pub mod error_helpers;

/// Logger initialisation for the binary
pub mod logging;

/// Numeric parsing and field stringification helpers
pub mod text;

/// Input validation for URLs, paths and record IDs
pub mod validation;
