use crate::api::client::{ResourcePaths, Transport};
use crate::api::models::{CollectionEnvelope, Record};
use crate::core::query::Query;
use crate::display::sink::Notifier;
use crate::error::ApiError;
use crate::utils::validation::validate_record_id;
use serde_json::Value;
use std::sync::Arc;

/// Alert raised once per failed retrieval
pub const GATEWAY_ALERT: &str = "Error: could not reach the API gateway";

/// Retrieval boundary for persona records.
///
/// `try_*` methods surface [`ApiError`]; the plain methods report the error
/// (one alert plus one log entry) and yield `None`, so "no response" stays
/// distinct from an empty collection.
pub struct PersonaService {
    transport: Arc<dyn Transport>,
    notifier: Arc<dyn Notifier>,
    paths: ResourcePaths,
}

impl PersonaService {
    pub fn new(transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            paths: ResourcePaths::default(),
        }
    }

    pub fn with_paths(mut self, paths: ResourcePaths) -> Self {
        self.paths = paths;
        self
    }

    pub async fn try_fetch_all(&self) -> Result<Vec<Record>, ApiError> {
        let endpoint = self.paths.all.as_str();
        let body = self.transport.get_json(endpoint).await?;
        let envelope: CollectionEnvelope =
            serde_json::from_value(body).map_err(|e| ApiError::MalformedPayload {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        log::debug!("Fetched {} records from {}", envelope.data.len(), endpoint);
        Ok(envelope.data)
    }

    pub async fn try_fetch_one(&self, id: &str) -> Result<Record, ApiError> {
        let endpoint = self.paths.record(id);
        let body = self.transport.get_json(&endpoint).await?;
        serde_json::from_value(body).map_err(|e| ApiError::MalformedPayload {
            endpoint,
            message: e.to_string(),
        })
    }

    /// Whole collection, or `None` when the retrieval failed.
    pub async fn fetch_all(&self) -> Option<Vec<Record>> {
        self.try_fetch_all()
            .await
            .map_err(|e| self.report(&e))
            .ok()
    }

    /// One record, or `None` when the retrieval failed or `id` is unusable.
    pub async fn fetch_one(&self, id: &str) -> Option<Record> {
        if let Err(e) = validate_record_id(id) {
            log::warn!("Not fetching record: {}", e);
            return None;
        }

        self.try_fetch_one(id)
            .await
            .map_err(|e| self.report(&e))
            .ok()
    }

    /// Raw Home payload; shape checks are left to [`crate::api::models::SiteInfo`].
    pub async fn fetch_home(&self) -> Option<Value> {
        self.fetch_raw(&self.paths.home).await
    }

    pub async fn fetch_about(&self) -> Option<Value> {
        self.fetch_raw(&self.paths.about).await
    }

    /// One fetch of the collection followed by the query's filter and sort.
    pub async fn query(&self, query: &Query) -> Option<Vec<Record>> {
        let records = self.fetch_all().await?;
        Some(query.apply(records))
    }

    async fn fetch_raw(&self, path: &str) -> Option<Value> {
        self.transport
            .get_json(path)
            .await
            .map_err(|e| self.report(&e))
            .ok()
    }

    fn report(&self, error: &ApiError) {
        log::error!("Retrieval from {} failed: {}", error.endpoint(), error);
        self.notifier.alert(GATEWAY_ALERT);
    }
}
