use crate::cli::ServeArgs;
use crate::infra::{build_companion, AppState};
use crate::routes::with_operational_routes;
use answer_grader::config::AppConfig;
use answer_grader::error::AppError;
use answer_grader::questions::QuestionBank;
use answer_grader::{telemetry, Capabilities, GradingService, GradingState, ScoringEngine};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let capabilities = Capabilities::probe(&config.scoring);
    let engine = Arc::new(ScoringEngine::new(capabilities, config.scoring.clone()));
    let companion = build_companion(&config.companion);
    let companion_live = companion.is_live();
    let service = Arc::new(GradingService::new(engine, companion));
    let grading = GradingState::new(service, Arc::new(QuestionBank::standard()));

    let app = with_operational_routes(grading)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, companion_live, "answer grading service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
