//! Low-cardinality names for request spans and metric labels.

/// Every route the server answers, with ids collapsed.
const ROUTES: [&str; 13] = [
    "/",
    "/health",
    "/metrics",
    "/api-doc/openapi.json",
    "/api/auth/register",
    "/api/auth/login",
    "/api/customers",
    "/api/customers/{id}",
    "/api/accounts",
    "/api/accounts/{id}",
    "/api/analytics",
    "/api/analytics/customers/{id}",
    "/docs",
];

/// API paths that no route accepts.
pub(super) const UNMATCHED_ROUTE: &str = "unmatched";

/// Anything outside the API handed to the static frontend.
pub(super) const FRONTEND_ROUTE: &str = "frontend";

const METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) method: &'static str,
    pub(super) route: &'static str,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let method = METHODS
        .into_iter()
        .find(|known| *known == method)
        .unwrap_or("OTHER");
    let route = route_label(path);

    RequestSpanName {
        method,
        route,
        otel_span_name: format!("{method} {route}"),
    }
}

/// Map a request path onto a fixed label so client-chosen paths never mint new series.
fn route_label(path: &str) -> &'static str {
    let normalised = normalise_path(path);

    if let Some(route) = ROUTES.into_iter().find(|route| *route == normalised) {
        return route;
    }

    if normalised.starts_with("/docs/") {
        return "/docs";
    }

    if normalised == "/api" || normalised.starts_with("/api/") {
        return UNMATCHED_ROUTE;
    }

    FRONTEND_ROUTE
}

fn normalise_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        return "/".to_owned();
    }

    trimmed
        .split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit()) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
