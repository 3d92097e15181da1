pub mod client;
pub mod models;

pub use client::{GatewayClient, ResourcePaths, Transport};
pub use models::{Address, Field, FieldValue, PersonaFields, Record, SiteInfo};
