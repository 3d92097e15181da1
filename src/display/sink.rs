//! Output surfaces the presenter writes to.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// The region that receives rendered markup.
pub trait ContentSink: Send + Sync {
    fn update(&self, title: &str, html: &str);
}

/// User-visible alert channel for retrieval failures.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes each update to stdout as `<h1>title</h1>` followed by the markup.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ContentSink for StdoutSink {
    fn update(&self, title: &str, html: &str) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = writeln!(out, "<h1>{}</h1>\n{}", title, html) {
            log::warn!("Failed to write to stdout: {}", e);
        }
    }
}

#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// One recorded `update` call
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub title: String,
    pub html: String,
}

/// Sink that keeps every update in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    updates: Arc<Mutex<Vec<Update>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<Update> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Update> {
        self.updates
            .lock()
            .ok()
            .and_then(|updates| updates.last().cloned())
    }
}

impl ContentSink for MemorySink {
    fn update(&self, title: &str, html: &str) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(Update {
                title: title.to_string(),
                html: html.to_string(),
            });
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }
}
