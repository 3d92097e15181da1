pub mod persona_service;

pub use persona_service::{GATEWAY_ALERT, PersonaService};
