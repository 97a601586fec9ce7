//! Prometheus counters for the web service.

use prometheus::{IntCounter, Registry, TextEncoder};

/// Counters registered on a registry owned by the application state, so
/// several routers can live in one process.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub chat_messages: IntCounter,
    pub chat_failures: IntCounter,
    pub pdf_uploads: IntCounter,
    pub pdf_rejections: IntCounter,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let counter = |name: &str, help: &str| -> prometheus::Result<IntCounter> {
            let counter = IntCounter::new(name, help)?;
            registry.register(Box::new(counter.clone()))?;
            Ok(counter)
        };

        Ok(Self {
            chat_messages: counter("healthbot_chat_messages_total", "Chat messages answered by the model")?,
            chat_failures: counter("healthbot_chat_failures_total", "Chat messages the model failed to answer")?,
            pdf_uploads: counter("healthbot_pdf_uploads_total", "PDF documents analyzed and stored")?,
            pdf_rejections: counter("healthbot_pdf_rejections_total", "PDF uploads rejected or unreadable")?,
            registry,
        })
    }

    pub fn render(&self) -> String {
        TextEncoder::new()
            .encode_to_string(&self.registry.gather())
            .unwrap_or_else(|_| "Error encoding metrics".to_string())
    }
}
