/// Receives human-readable progress messages for one request.
pub trait TraceSink: Send + Sync {
    fn emit(&self, message: &str);
}

/// An open telemetry span.
pub trait SpanHandle: Send {
    fn record(&mut self, key: &str, value: String);

    fn end(self: Box<Self>);
}

/// Span factory for pipeline steps.
pub trait Telemetry: Send + Sync {
    fn start_span(&self, name: &str, attributes: &[(&str, String)]) -> Box<dyn SpanHandle>;
}
