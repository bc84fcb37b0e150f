//! `Telemetry` implementations.

use std::time::Instant;

use ragline_core::traits::{SpanHandle, Telemetry};

/// Opens a `tracing` span per pipeline step and logs its attributes and
/// duration when the step ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

struct TracingSpanHandle {
    span: tracing::Span,
    name: String,
    started: Instant,
    fields: Vec<(String, String)>,
}

impl Telemetry for TracingTelemetry {
    fn start_span(&self, name: &str, attributes: &[(&str, String)]) -> Box<dyn SpanHandle> {
        let span = tracing::info_span!("ragline.step", step = %name);
        span.in_scope(|| {
            tracing::debug!(step = %name, attributes = ?attributes, "step started");
        });
        Box::new(TracingSpanHandle {
            span,
            name: name.to_string(),
            started: Instant::now(),
            fields: Vec::new(),
        })
    }
}

impl SpanHandle for TracingSpanHandle {
    fn record(&mut self, key: &str, value: String) {
        self.fields.push((key.to_string(), value));
    }

    fn end(self: Box<Self>) {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        self.span.in_scope(|| {
            tracing::debug!(
                step = %self.name,
                elapsed_ms = elapsed_ms,
                fields = ?self.fields,
                "step finished"
            );
        });
    }
}

/// Discards all spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

struct NoopSpan;

impl SpanHandle for NoopSpan {
    fn record(&mut self, _key: &str, _value: String) {}

    fn end(self: Box<Self>) {}
}

impl Telemetry for NoopTelemetry {
    fn start_span(&self, _name: &str, _attributes: &[(&str, String)]) -> Box<dyn SpanHandle> {
        Box::new(NoopSpan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_open_record_and_end_without_subscriber() {
        let telemetry = TracingTelemetry;
        let mut span = telemetry.start_span("ragline.fuse", &[("tenant_id", "t1".to_string())]);
        span.record("fused", "3".to_string());
        span.end();

        let mut noop = NoopTelemetry.start_span("x", &[]);
        noop.record("k", "v".to_string());
        noop.end();
    }
}
