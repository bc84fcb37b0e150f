//! `TraceSink` implementations.

use std::sync::Mutex;

use ragline_core::traits::TraceSink;

/// Forwards trace messages to `tracing` at info level.
#[derive(Debug, Clone, Default)]
pub struct TracingTraceSink {
    correlation_id: Option<String>,
}

impl TracingTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_correlation(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
        }
    }
}

impl TraceSink for TracingTraceSink {
    fn emit(&self, message: &str) {
        tracing::info!(
            event = "trace",
            correlation_id = self.correlation_id.as_deref().unwrap_or(""),
            "{message}"
        );
    }
}

/// Collects trace messages in memory, in emission order.
#[derive(Debug, Default)]
pub struct BufferedTraceSink {
    messages: Mutex<Vec<String>>,
}

impl BufferedTraceSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages emitted so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl TraceSink for BufferedTraceSink {
    fn emit(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
