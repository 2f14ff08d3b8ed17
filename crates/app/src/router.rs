use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{debug, error};

use idpage_storage::{Database, QueryExecutor};

use crate::example::ExampleService;
use crate::page;
use crate::problem::ProblemResponse;
use crate::telemetry::{self, RenderResult};

pub struct AppState<Q = Database> {
    metrics: PrometheusHandle,
    examples: ExampleService<Q>,
}

impl<Q> Clone for AppState<Q> {
    fn clone(&self) -> Self {
        Self {
            metrics: self.metrics.clone(),
            examples: self.examples.clone(),
        }
    }
}

impl<Q: QueryExecutor> AppState<Q> {
    pub fn new(metrics: PrometheusHandle, examples: ExampleService<Q>) -> Self {
        Self { metrics, examples }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub fn examples(&self) -> &ExampleService<Q> {
        &self.examples
    }
}

pub fn app_router<Q: QueryExecutor + 'static>(state: AppState<Q>) -> Router {
    Router::new()
        .route("/", get(home::<Q>))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics::<Q>))
        .with_state(state)
}

async fn home<Q: QueryExecutor>(
    State(state): State<AppState<Q>>,
) -> Result<Html<String>, ProblemResponse> {
    let started = Instant::now();
    let outcome = page::render_home_page(state.examples()).await;

    match outcome {
        Ok(html) => {
            telemetry::record_page_render(RenderResult::Ok, started.elapsed());
            debug!(stage = "page", "home page rendered");
            Ok(html)
        }
        Err(err) => {
            telemetry::record_page_render(RenderResult::Error, started.elapsed());
            error!(stage = "page", error = %err, "failed to render home page");
            Err(ProblemResponse::database_unavailable())
        }
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn metrics<Q: QueryExecutor>(State(state): State<AppState<Q>>) -> impl IntoResponse {
    let body = telemetry::render_metrics(state.metrics());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
