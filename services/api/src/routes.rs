use crate::infra::AppState;
use answer_grader::scoring::CapabilitySummary;
use answer_grader::{grading_router, GradingState};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) version: &'static str,
    pub(crate) services: ServiceHealth,
}

#[derive(Debug, Serialize)]
pub(crate) struct ServiceHealth {
    pub(crate) scoring_engine: CapabilitySummary,
    pub(crate) companion: CompanionHealth,
    pub(crate) question_bank: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompanionHealth {
    pub(crate) evaluator: String,
    pub(crate) mode: &'static str,
}

/// Grading routes plus health, readiness and metrics.
pub(crate) fn with_operational_routes(grading: GradingState) -> Router {
    let health = Router::new()
        .route("/api/health", get(healthcheck))
        .with_state(grading.clone());

    grading_router(grading)
        .merge(health)
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck(State(grading): State<GradingState>) -> Json<HealthResponse> {
    let companion = grading.service.companion();
    let mode = if companion.is_live() {
        "live"
    } else {
        "deterministic"
    };

    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        services: ServiceHealth {
            scoring_engine: grading.service.engine().capabilities().summary(),
            companion: CompanionHealth {
                evaluator: companion.name().to_string(),
                mode,
            },
            question_bank: grading.questions.questions().len(),
        },
    })
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use answer_grader::companion::DeterministicEvaluator;
    use answer_grader::questions::QuestionBank;
    use answer_grader::{GradingService, ScoringEngine};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn grading_state() -> GradingState {
        let service = GradingService::new(
            Arc::new(ScoringEngine::default()),
            Arc::new(DeterministicEvaluator),
        );
        GradingState::new(Arc::new(service), Arc::new(QuestionBank::standard()))
    }

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn health_reports_each_service() {
        let Json(health) = healthcheck(State(grading_state())).await;

        assert_eq!(health.status, "healthy");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(health.services.companion.evaluator, "deterministic");
        assert_eq!(health.services.companion.mode, "deterministic");
        assert_eq!(health.services.question_bank, 8);
        assert_eq!(health.services.scoring_engine.language_model, None);
    }

    #[tokio::test]
    async fn readiness_is_unavailable_until_flagged() {
        let router = with_operational_routes(grading_state()).layer(Extension(app_state(false)));
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let payload = read_json_body(response).await;
        assert_eq!(payload["status"], "initializing");
    }

    #[tokio::test]
    async fn health_route_is_mounted_beside_grading_routes() {
        let router = with_operational_routes(grading_state()).layer(Extension(app_state(true)));

        let health = router
            .clone()
            .oneshot(Request::get("/api/health").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(health.status(), StatusCode::OK);
        let payload = read_json_body(health).await;
        assert_eq!(payload["services"]["question_bank"], 8);
        assert!(payload["timestamp"].is_string());

        let ready = router
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(ready.status(), StatusCode::OK);

        let metrics = router
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("route executes");
        assert_eq!(metrics.status(), StatusCode::OK);
        assert_eq!(
            metrics.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
