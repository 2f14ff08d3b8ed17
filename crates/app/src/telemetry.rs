use std::{
    fmt::Write as _,
    sync::{Mutex, OnceLock},
    time::{Duration, Instant},
};

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, histogram};
use metrics_exporter_prometheus::{
    BuildError as PrometheusBuildError, PrometheusBuilder, PrometheusHandle,
};
use thiserror::Error;
use tracing_subscriber::{
    fmt::{self as tracing_fmt, time::UtcTime},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use idpage_util::{AppConfig, Environment};

pub const PAGE_RENDER_TOTAL: &str = "page_render_total";
pub const PAGE_RENDER_SECONDS: &str = "page_render_seconds";

const BUILD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to initialize tracing: {0}")]
    Tracing(#[from] TryInitError),
    #[error("failed to initialize prometheus recorder: {0}")]
    Metrics(#[from] PrometheusBuildError),
    #[error("metrics install guard poisoned")]
    GuardPoisoned,
}

/// Outcome label attached to [`PAGE_RENDER_TOTAL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderResult {
    Ok,
    Error,
}

impl RenderResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

static TRACING_INIT: OnceLock<()> = OnceLock::new();
static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static METRICS_INSTALL_GUARD: OnceLock<Mutex<()>> = OnceLock::new();
static START_TIME: OnceLock<Instant> = OnceLock::new();

fn build_git_sha() -> &'static str {
    option_env!("GIT_SHA").unwrap_or("unknown")
}

/// Installs the global subscriber: pretty output locally, JSON lines in production.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryError> {
    if TRACING_INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.environment {
        Environment::Development | Environment::Test => registry
            .with(
                tracing_fmt::layer()
                    .with_target(false)
                    .with_timer(UtcTime::rfc_3339())
                    .event_format(tracing_fmt::format().pretty()),
            )
            .try_init()?,
        Environment::Production => registry
            .with(
                tracing_fmt::layer()
                    .with_target(false)
                    .with_timer(UtcTime::rfc_3339())
                    .json(),
            )
            .try_init()?,
    }

    TRACING_INIT.set(()).ok();
    tracing::info!(stage = "telemetry", env = %config.environment.as_str(), version = BUILD_VERSION, git_sha = build_git_sha(), "tracing initialized");
    Ok(())
}

/// Installs the Prometheus recorder once per process and returns its handle.
pub fn init_metrics() -> Result<PrometheusHandle, TelemetryError> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let _guard = METRICS_INSTALL_GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .map_err(|_| TelemetryError::GuardPoisoned)?;

    if let Some(handle) = METRICS_HANDLE.get() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    METRICS_HANDLE.set(handle.clone()).ok();

    describe_gauge!("app_build_info", "Build metadata for the running binary");
    describe_gauge!("app_uptime_seconds", "Seconds since the process started");
    describe_counter!(
        PAGE_RENDER_TOTAL,
        "Count of home page renders, labelled by result"
    );
    describe_histogram!(
        PAGE_RENDER_SECONDS,
        "Time in seconds to render the home page, database round-trip included"
    );
    START_TIME.get_or_init(Instant::now);

    Ok(handle)
}

/// Records one home page render and how long it took.
pub fn record_page_render(result: RenderResult, elapsed: Duration) {
    histogram!(PAGE_RENDER_SECONDS).record(elapsed.as_secs_f64());
    counter!(PAGE_RENDER_TOTAL, "result" => result.as_str()).increment(1);
}

/// Prometheus exposition body with build and uptime gauges appended.
pub fn render_metrics(handle: &PrometheusHandle) -> String {
    let mut body = handle.render();
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }

    let uptime = START_TIME
        .get()
        .map(|start| start.elapsed().as_secs_f64())
        .unwrap_or_default();

    // Writing into a String cannot fail.
    let _ = write!(
        body,
        "# TYPE app_build_info gauge\n\
         app_build_info{{version=\"{BUILD_VERSION}\",git=\"{}\"}} 1\n\
         # TYPE app_uptime_seconds gauge\n\
         app_uptime_seconds {uptime}\n",
        build_git_sha()
    );

    body
}
