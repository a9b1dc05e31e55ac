//! API index served at `/` when no frontend build is present

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

const ENDPOINTS: [(&str, &str); 9] = [
    ("register", "POST /api/auth/register"),
    ("login", "POST /api/auth/login"),
    ("customers", "GET, POST /api/customers; GET, PUT, DELETE /api/customers/{id}"),
    ("accounts", "GET, POST /api/accounts; GET, PUT, DELETE /api/accounts/{id}"),
    ("analytics", "GET /api/analytics"),
    ("customer_analytics", "GET /api/analytics/customers/{customer_id}"),
    ("health", "GET /health"),
    ("metrics", "GET /metrics"),
    ("docs", "GET /docs"),
];

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EndpointDescription {
    pub name: String,
    pub route: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct IndexResponse {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<EndpointDescription>,
}

/// API Index Handler
#[endpoint(tags("meta"), summary = "API index")]
pub(crate) async fn handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "Tally API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(name, route)| EndpointDescription {
                name: (*name).to_string(),
                route: (*route).to_string(),
            })
            .collect(),
    })
}

/// Unknown `/api` paths are never handed to the frontend fallback.
#[handler]
pub(crate) async fn api_not_found(res: &mut Response) {
    res.render(StatusError::not_found().brief("No such API endpoint"));
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn test_index_lists_endpoints() -> TestResult {
        let router = Router::new().get(handler);

        let body: IndexResponse = TestClient::get("http://example.com/")
            .send(&Service::new(router))
            .await
            .take_json()
            .await?;

        assert_eq!(body.name, "Tally API");
        assert!(
            body.endpoints
                .iter()
                .any(|endpoint| endpoint.route == "POST /api/auth/login"),
            "login endpoint should be listed"
        );

        Ok(())
    }
}
