//! 실제 트래픽 핸들러.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use chaffer_core::config::TrafficConfig;
use chaffer_core::error::CoreError;
use chaffer_core::models::observation::{Observation, TrafficKind};
use chaffer_core::ports::entropy::EntropySource;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::{chaff, request_failed, CHAFF_HEADER};
use crate::error::ApiError;
use crate::padding;
use crate::AppState;

/// 기본 분포에서 (지연, 크기) 추출
///
/// 지연은 `[base, base + max_delay]`, 크기는 `[min_bytes, max_bytes]` 균등.
pub fn draw_base(
    entropy: &dyn EntropySource,
    traffic: &TrafficConfig,
) -> Result<(Duration, usize), CoreError> {
    let delay_ms = entropy.uniform_inclusive(traffic.base_latency_ms, traffic.latency_upper_ms())?;
    let size =
        entropy.uniform_inclusive(traffic.min_response_bytes, traffic.max_response_bytes)?;
    Ok((Duration::from_millis(delay_ms), size as usize))
}

/// 실제 트래픽 응답
///
/// GET /
///
/// 무작위 지연 후 무작위 길이 패딩 본문을 반환하고 관측값 1건을 기록한다.
/// `X-Chaff` 헤더가 있으면 디코이로 응답하며 실제 관측으로 세지 않는다.
pub async fn serve_traffic(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if headers.contains_key(CHAFF_HEADER) {
        debug!("X-Chaff 요청, 디코이로 응답");
        return chaff::respond_with_chaff(&state).await;
    }

    let started = Instant::now();
    let (delay, size) =
        draw_base(state.entropy.as_ref(), &state.traffic).map_err(request_failed)?;

    let body = padding::delayed_body(delay, size).await;

    let obs = Observation::measured(started.elapsed(), body.len(), TrafficKind::Real);
    if let Err(e) = state.recorder.observe(&obs) {
        warn!("관측값 폐기: {e}");
    }

    Ok(padding::into_response(body))
}
