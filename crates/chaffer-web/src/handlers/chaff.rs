//! 디코이(chaff) 핸들러.

use axum::extract::State;
use axum::response::Response;
use std::time::Instant;
use tracing::debug;

use super::request_failed;
use crate::error::ApiError;
use crate::padding;
use crate::AppState;

/// 디코이 응답
///
/// GET /chaff
pub async fn serve_chaff(State(state): State<AppState>) -> Result<Response, ApiError> {
    respond_with_chaff(&state).await
}

/// 합성기 프로파일로 지연/크기를 뽑아 실제 트래픽과 같은 형식으로 응답
pub(crate) async fn respond_with_chaff(state: &AppState) -> Result<Response, ApiError> {
    let started = Instant::now();
    let sample = state.synthesizer.synthesize().map_err(request_failed)?;

    let body = padding::delayed_body(sample.delay, sample.response_bytes).await;

    let recorded = state.synthesizer.record_decoy(started.elapsed(), body.len());
    debug!(
        delay_ms = sample.delay.as_millis() as u64,
        bytes = body.len(),
        source = ?sample.source,
        recorded,
        "디코이 응답"
    );

    Ok(padding::into_response(body))
}
