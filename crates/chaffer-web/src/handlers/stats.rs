//! 통계 API 핸들러.
//!
//! 조회 엔드포인트는 관측값을 만들지 않는다.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chaffer_core::models::profile::ChaffProfile;
use chaffer_core::models::summary::StatSummary;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::AppState;

/// 통계 스냅샷 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// 누적 요약 (평탄화)
    #[serde(flatten)]
    pub summary: StatSummary,
    /// 지연 표준편차 (ms)
    pub latency_std_dev_ms: f64,
    /// 응답 크기 표준편차 (bytes)
    pub response_bytes_std_dev: f64,
    /// 생성 시각 (RFC3339)
    pub generated_at: String,
}

impl From<StatSummary> for StatsResponse {
    fn from(summary: StatSummary) -> Self {
        Self {
            latency_std_dev_ms: summary.latency_std_dev(),
            response_bytes_std_dev: summary.response_bytes_std_dev(),
            summary,
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// 현재 chaff 프로파일 응답
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: ChaffProfile,
    pub feedback_enabled: bool,
    pub min_observations_for_calibration: u64,
}

/// 통계 스냅샷 조회
///
/// GET /stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.recorder.snapshot().into())
}

/// 현재 chaff 프로파일 조회
///
/// GET /stats/profile
pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let profile = state.synthesizer.current_profile();
    let config = state.synthesizer.config();
    Json(ProfileResponse {
        profile: *profile,
        feedback_enabled: config.feedback_enabled,
        min_observations_for_calibration: config.min_observations_for_calibration,
    })
}

/// 통계 초기화
///
/// POST /stats/reset (`web.allow_reset`일 때만 등록)
pub async fn reset_stats(State(state): State<AppState>) -> StatusCode {
    state.recorder.reset();
    let profile = state.synthesizer.refresh();
    info!("통계 초기화 후 프로파일 재보정: {:?}", profile.source);
    StatusCode::NO_CONTENT
}
