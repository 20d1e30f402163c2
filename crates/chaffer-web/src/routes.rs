//! 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// 실제 트래픽 경로
pub const TRAFFIC_PATH: &str = "/";
/// 디코이 경로
pub const CHAFF_PATH: &str = "/chaff";
/// 통계 경로
pub const STATS_PATH: &str = "/stats";

/// 라우트 생성
///
/// `allow_reset`이 false면 초기화 엔드포인트를 등록하지 않는다.
pub fn traffic_routes(allow_reset: bool) -> Router<AppState> {
    let router = Router::new()
        .route(TRAFFIC_PATH, get(handlers::traffic::serve_traffic))
        .route(CHAFF_PATH, get(handlers::chaff::serve_chaff))
        .route(STATS_PATH, get(handlers::stats::get_stats))
        .route("/stats/profile", get(handlers::stats::get_profile));

    let router = if allow_reset {
        router.route("/stats/reset", post(handlers::stats::reset_stats))
    } else {
        router
    };

    router.fallback(handlers::not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chaffer_core::config::AppConfig;
    use chaffer_core::models::observation::{Observation, TrafficKind};
    use chaffer_tracker::OsEntropy;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::build(&AppConfig::default_config(), Arc::new(OsEntropy::new()))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn stats_reports_snapshot_without_observing() {
        let state = state();
        state
            .recorder
            .observe(&Observation::new(150, 300, TrafficKind::Real))
            .unwrap();
        let app = traffic_routes(false).with_state(state.clone());

        for _ in 0..3 {
            let response = app.clone().oneshot(get_request("/stats")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            assert_eq!(json["count"], 1);
            assert_eq!(json["meanLatencyMs"], 150.0);
            assert_eq!(json["meanResponseBytes"], 300.0);
        }
        assert_eq!(state.recorder.snapshot().count, 1);
    }

    #[tokio::test]
    async fn profile_endpoint_reports_default_when_empty() {
        let app = traffic_routes(false).with_state(state());
        let response = app.oneshot(get_request("/stats/profile")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["profile"]["source"]["type"], "default");
        assert_eq!(json["feedbackEnabled"], false);
    }

    #[tokio::test]
    async fn reset_not_routed_by_default() {
        let app = traffic_routes(false).with_state(state());
        let request = Request::post("/stats/reset").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_ne!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn reset_clears_when_enabled() {
        let state = state();
        state
            .recorder
            .observe(&Observation::new(10, 10, TrafficKind::Real))
            .unwrap();
        let app = traffic_routes(true).with_state(state.clone());

        let request = Request::post("/stats/reset").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.recorder.snapshot().count, 0);
    }

    #[tokio::test]
    async fn unknown_path_is_json_not_found() {
        let app = traffic_routes(false).with_state(state());
        let response = app.oneshot(get_request("/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["status"], 404);
    }
}
