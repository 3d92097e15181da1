//! persona-view: fetch persona records from an HTTP API gateway and render
//! them as HTML fragments.
//!
//! The [`core::presenter::Presenter`] drives every view: it asks the
//! [`core::services::PersonaService`] for data, shapes it with
//! [`core::query`] and the [`display`] renderers, then hands the markup to a
//! [`display::sink::ContentSink`].

pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Retrieval, query and presentation
pub mod storage; // Configuration persistence

/// Support modules (used across layers)
pub mod api; // API gateway client and record model
pub mod display; // HTML rendering and output sinks
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
