//! App Router

use std::{path::PathBuf, sync::Arc};

use salvo::{
    affix_state::inject, prelude::*, serve_static::StaticDir, trailing_slash::remove_slash,
};

use crate::{
    accounts, analytics, auth, customers, healthcheck,
    observability::{metrics_handler, request_logging},
    root,
    state::State,
};

/// Every route the server answers, with shared state and middleware applied.
pub(crate) fn app_router(state: Arc<State>, frontend: Option<PathBuf>) -> Router {
    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(api_router());

    match frontend {
        Some(dir) => router.push(
            Router::with_path("{**path}").get(
                StaticDir::new([dir])
                    .defaults("index.html")
                    .fallback("index.html"),
            ),
        ),
        None => router.push(Router::new().get(root::handler)),
    }
}

pub(crate) fn api_router() -> Router {
    Router::with_path("api")
        .push(Router::with_path("auth/register").post(auth::register::handler))
        .push(Router::with_path("auth/login").post(auth::login::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(
                    Router::with_path("customers")
                        .get(customers::index::handler)
                        .post(customers::create::handler)
                        .push(
                            Router::with_path("{id}")
                                .get(customers::get::handler)
                                .put(customers::update::handler)
                                .delete(customers::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("accounts")
                        .get(accounts::index::handler)
                        .post(accounts::create::handler)
                        .push(
                            Router::with_path("{id}")
                                .get(accounts::get::handler)
                                .put(accounts::update::handler)
                                .delete(accounts::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("analytics")
                        .get(analytics::global::handler)
                        .push(
                            Router::with_path("customers/{customer_id}")
                                .get(analytics::customer::handler),
                        ),
                ),
        )
        .push(Router::with_path("{**rest}").goal(root::api_not_found))
}
