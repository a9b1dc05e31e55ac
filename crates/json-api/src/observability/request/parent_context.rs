//! Continue an upstream trace from `traceparent`/`tracestate` headers.

use opentelemetry::{
    Context, global,
    propagation::{Extractor, TextMapPropagator},
    trace::TraceContextExt as _,
};
use salvo::http::{HeaderMap, HeaderName};

pub(super) fn extract_parent_context(headers: &HeaderMap) -> Option<Context> {
    global::get_text_map_propagator(|propagator| extract_with(propagator, headers))
}

/// `None` unless the headers carry a valid remote span.
fn extract_with(propagator: &dyn TextMapPropagator, headers: &HeaderMap) -> Option<Context> {
    // an empty base keeps the server's own active span out of the result
    let context = propagator.extract_with_context(&Context::new(), &RequestHeaders(headers));

    let remote = context.span().span_context().is_valid();

    remote.then_some(context)
}

#[derive(Debug)]
struct RequestHeaders<'a>(&'a HeaderMap);

impl Extractor for RequestHeaders<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use salvo::http::HeaderValue;

    use super::*;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    fn headers(traceparent: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Some(value) = traceparent {
            headers.insert("traceparent", HeaderValue::from_static(value));
        }

        headers
    }

    #[test]
    fn valid_traceparent_yields_remote_parent() {
        let context = extract_with(&TraceContextPropagator::new(), &headers(Some(TRACEPARENT)));

        let trace_id = context.map(|context| context.span().span_context().trace_id().to_string());

        assert_eq!(
            trace_id.as_deref(),
            Some("4bf92f3577b34da6a3ce929d0e0e4736"),
            "trace id should come from the header"
        );
    }

    #[test]
    fn missing_or_garbled_traceparent_is_ignored() {
        let propagator = TraceContextPropagator::new();

        assert!(
            extract_with(&propagator, &headers(None)).is_none(),
            "no header"
        );
        assert!(
            extract_with(&propagator, &headers(Some("00-not-a-trace-01"))).is_none(),
            "garbled header"
        );
    }
}
