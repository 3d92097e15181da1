//! Sequencing of retrievals into the content sink.
//!
//! Every public operation returns the markup it pushed to the sink, or
//! `None` when nothing was rendered (retrieval failed, or a newer request
//! started while this one was in flight).

use crate::api::models::{Field, Record, SiteInfo};
use crate::core::query::{Filter, Query, SortMode, SortSpec};
use crate::core::services::PersonaService;
use crate::display::escape::EscapePolicy;
use crate::display::sink::ContentSink;
use crate::display::table::{HtmlTable, TableLayout};
use crate::display::template::Template;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub mod titles {
    pub const HOME: &str = "Persona Home";
    pub const ABOUT: &str = "About Persona";
    pub const LIST: &str = "Persona list";
    pub const NAMES: &str = "Persona names";
    pub const SHOWN: &str = "Persona shown";
}

pub struct Presenter {
    service: PersonaService,
    sink: Arc<dyn ContentSink>,
    table: HtmlTable,
    last_shown: Mutex<Option<Record>>,
    generation: AtomicU64,
}

impl Presenter {
    pub fn new(service: PersonaService, sink: Arc<dyn ContentSink>) -> Self {
        Self {
            service,
            sink,
            table: HtmlTable::new(),
            last_shown: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_escape(mut self, escape: EscapePolicy) -> Self {
        self.table = self.table.with_escape(escape);
        self
    }

    /// The most recently displayed record, if any.
    pub fn last_shown(&self) -> Option<Record> {
        self.last_shown
            .lock()
            .ok()
            .and_then(|slot| slot.clone())
    }

    pub async fn home(&self) -> Option<String> {
        let ticket = self.begin();
        let payload = self.service.fetch_home().await;
        self.commit(ticket, titles::HOME, self.home_html(payload.as_ref()))
    }

    pub async fn about(&self) -> Option<String> {
        let ticket = self.begin();
        let payload = self.service.fetch_about().await;
        self.commit(ticket, titles::ABOUT, self.about_html(payload.as_ref()))
    }

    /// Render an already retrieved Home payload; malformed payloads show the fallback.
    pub fn show_home(&self, payload: Option<&Value>) -> Option<String> {
        let ticket = self.begin();
        self.commit(ticket, titles::HOME, self.home_html(payload))
    }

    pub fn show_about(&self, payload: Option<&Value>) -> Option<String> {
        let ticket = self.begin();
        self.commit(ticket, titles::ABOUT, self.about_html(payload))
    }

    pub async fn list(&self) -> Option<String> {
        self.list_query(&Query::all(), TableLayout::Full, titles::LIST)
            .await
    }

    pub async fn list_names(&self) -> Option<String> {
        self.list_query(&Query::all(), TableLayout::Names, titles::NAMES)
            .await
    }

    pub async fn list_names_sorted(&self) -> Option<String> {
        let query = Query::all().sort(SortSpec::lexicographic(Field::Name));
        self.list_query(&query, TableLayout::Names, titles::NAMES)
            .await
    }

    pub async fn list_sorted(&self, field: Field, mode: SortMode) -> Option<String> {
        let query = Query::all().sort(SortSpec { field, mode });
        self.list_query(&query, TableLayout::Full, titles::LIST)
            .await
    }

    pub async fn search(&self, filter: Filter) -> Option<String> {
        let query = Query::all().filter(filter);
        self.list_query(&query, TableLayout::Full, titles::LIST)
            .await
    }

    /// The one fetch-filter-sort-render path every listing goes through.
    pub async fn list_query(
        &self,
        query: &Query,
        layout: TableLayout,
        title: &str,
    ) -> Option<String> {
        let ticket = self.begin();
        let records = self.service.query(query).await?;
        self.commit(ticket, title, self.table.render(&records, layout))
    }

    /// Show one record as a single-row table and remember it.
    pub async fn show(&self, id: &str) -> Option<String> {
        let ticket = self.begin();
        let record = self.service.fetch_one(id).await?;
        let html = self
            .table
            .render(std::slice::from_ref(&record), TableLayout::Full);
        self.commit_shown(ticket, record, html)
    }

    /// Show one record through `template` and remember it.
    pub async fn show_with(&self, id: &str, template: &Template) -> Option<String> {
        let ticket = self.begin();
        let record = self.service.fetch_one(id).await?;
        let html = template.substitute(&record);
        self.commit_shown(ticket, record, html)
    }

    fn home_html(&self, payload: Option<&Value>) -> String {
        let info = SiteInfo::from_home_payload(payload);
        self.table.escape().apply(&info.message).into_owned()
    }

    fn about_html(&self, payload: Option<&Value>) -> String {
        let info = SiteInfo::from_about_payload(payload);
        let escape = self.table.escape();
        format!(
            "<div><p>{}</p><ul><li><b>Author</b>: {}</li><li><b>E-mail</b>: {}</li><li><b>Date</b>: {}</li></ul></div>",
            escape.apply(&info.message),
            escape.apply(&info.author),
            escape.apply(&info.email),
            escape.apply(&info.date),
        )
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    fn commit(&self, ticket: u64, title: &str, html: String) -> Option<String> {
        if !self.is_current(ticket) {
            log::debug!("Dropping superseded render of '{}'", title);
            return None;
        }
        self.sink.update(title, &html);
        Some(html)
    }

    fn commit_shown(&self, ticket: u64, record: Record, html: String) -> Option<String> {
        let html = self.commit(ticket, titles::SHOWN, html)?;
        if let Ok(mut slot) = self.last_shown.lock() {
            *slot = Some(record);
        }
        Some(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::Transport;
    use crate::display::sink::{MemoryNotifier, MemorySink};
    use crate::error::ApiError;
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    struct FixedTransport(Option<Value>);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
            self.0.clone().ok_or_else(|| ApiError::Unreachable {
                endpoint: path.to_string(),
                message: "offline".to_string(),
            })
        }
    }

    fn presenter(body: Option<Value>) -> (Presenter, MemorySink, MemoryNotifier) {
        let sink = MemorySink::new();
        let notifier = MemoryNotifier::new();
        let service = PersonaService::new(
            Arc::new(FixedTransport(body)),
            Arc::new(notifier.clone()),
        );
        let presenter = Presenter::new(service, Arc::new(sink.clone()));
        (presenter, sink, notifier)
    }

    #[test]
    fn test_show_home_fallbacks() {
        let (presenter, sink, _) = presenter(None);
        for payload in [None, Some(json!(23)), Some(json!({})), Some(json!({ "foo": "bar" }))] {
            presenter.show_home(payload.as_ref());
            let update = sink.last().unwrap();
            assert_eq!(update.title, titles::HOME);
            assert_eq!(update.html, SiteInfo::FALLBACK_MESSAGE);
        }

        presenter.show_home(Some(&json!({ "mensaje": "Mensaje de prueba descargado" })));
        assert_eq!(sink.last().unwrap().html, "Mensaje de prueba descargado");
    }

    #[test]
    fn test_show_about() {
        let (presenter, sink, _) = presenter(None);
        presenter.show_about(Some(&json!({ "autor": "un autor", "email": "e", "fecha": "f" })));
        let update = sink.last().unwrap();
        assert_eq!(update.title, titles::ABOUT);
        assert!(update.html.contains(SiteInfo::FALLBACK_MESSAGE));

        presenter.show_about(Some(&json!({
            "mensaje": "Mensaje de prueba descargado",
            "autor": "Prueba de autor",
            "email": "Prueba de email",
            "fecha": "00/00/0000"
        })));
        let html = sink.last().unwrap().html;
        assert!(html.contains("Prueba de autor"));
        assert!(html.contains("Prueba de email"));
        assert!(html.contains("00/00/0000"));
    }

    #[tokio::test]
    async fn test_home_falls_back_when_gateway_is_down() {
        let (presenter, sink, notifier) = presenter(None);
        let html = presenter.home().await;
        assert_eq!(html.as_deref(), Some(SiteInfo::FALLBACK_MESSAGE));
        assert_eq!(sink.updates().len(), 1);
        assert_eq!(notifier.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_list_failure_renders_nothing() {
        let (presenter, sink, notifier) = presenter(None);
        assert!(presenter.list().await.is_none());
        assert!(presenter.show("1").await.is_none());
        assert!(sink.updates().is_empty());
        assert_eq!(notifier.alerts().len(), 2);
        assert!(presenter.last_shown().is_none());
    }

    #[tokio::test]
    async fn test_list_empty_collection_renders_empty_table() {
        let (presenter, sink, _) = presenter(Some(json!({ "data": [] })));
        let html = presenter.list().await.unwrap();
        assert_eq!(html, HtmlTable::new().render(&[], TableLayout::Full));
        assert_eq!(sink.last().unwrap().title, titles::LIST);
    }

    #[tokio::test]
    async fn test_show_updates_last_shown() {
        let body = json!({ "ref": { "@ref": { "id": "9" } }, "data": { "nombre": "Eva" } });
        let (presenter, sink, _) = presenter(Some(body));

        let html = presenter.show("9").await.unwrap();
        assert!(html.contains(r#"<tr title="9">"#));
        assert_eq!(sink.last().unwrap().title, titles::SHOWN);
        assert_eq!(presenter.last_shown().map(|r| r.id), Some("9".to_string()));

        let card = presenter
            .show_with("9", &Template::new("<p>### NAME ### (### ID ###)</p>"))
            .await
            .unwrap();
        assert_eq!(card, "<p>Eva (9)</p>");
    }

    // Transport that parks the first request until released
    struct GatedTransport {
        gate: Notify,
        first: Mutex<bool>,
    }

    #[async_trait]
    impl Transport for GatedTransport {
        async fn get_json(&self, _path: &str) -> Result<Value, ApiError> {
            let is_first = {
                let mut first = self.first.lock().unwrap();
                std::mem::replace(&mut *first, false)
            };
            if is_first {
                self.gate.notified().await;
            }
            Ok(json!({ "data": [] }))
        }
    }

    #[tokio::test]
    async fn test_superseded_render_is_dropped() {
        let sink = MemorySink::new();
        let transport = Arc::new(GatedTransport {
            gate: Notify::new(),
            first: Mutex::new(true),
        });
        let service = PersonaService::new(transport.clone(), Arc::new(MemoryNotifier::new()));
        let presenter = Presenter::new(service, Arc::new(sink.clone()));

        let slow = presenter.list();
        let fast = async {
            tokio::task::yield_now().await;
            let html = presenter.list_names().await;
            transport.gate.notify_one();
            html
        };
        let (slow_html, fast_html) = tokio::join!(slow, fast);

        assert!(slow_html.is_none());
        assert!(fast_html.is_some());
        let updates = sink.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].title, titles::NAMES);
    }

    #[tokio::test]
    async fn test_escape_policy_reaches_rows() {
        let body = json!({ "data": [ { "ref": { "@ref": { "id": "1" } }, "data": { "nombre": "<b>x</b>" } } ] });
        let (presenter, _, _) = presenter(Some(body));
        let presenter = presenter.with_escape(EscapePolicy::Html);
        let html = presenter.list_names().await.unwrap();
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    }
}
