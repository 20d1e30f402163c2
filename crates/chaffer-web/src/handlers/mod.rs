//! HTTP 핸들러 모듈.

pub mod chaff;
pub mod stats;
pub mod traffic;

use axum::http::Uri;
use chaffer_core::error::CoreError;
use tracing::error;

use crate::error::ApiError;

/// 디코이 요청 표시 헤더. 실제 트래픽 경로로 들어와도 디코이로 응답한다.
pub const CHAFF_HEADER: &str = "x-chaff";

/// 요청 단위 치명 에러 (보안 난수원 실패 등) 기록 후 변환
pub(crate) fn request_failed(err: CoreError) -> ApiError {
    error!("요청 처리 실패: {err}");
    ApiError::from(err)
}

/// 등록되지 않은 경로
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
