//! Core layer: retrieval, querying and the presenter that feeds the sink.

pub mod presenter;
pub mod query;
pub mod services;
