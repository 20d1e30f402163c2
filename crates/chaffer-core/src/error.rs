//! chaffer 핵심 에러 타입.
//!
//! 어댑터 crate는 자체 에러 타입에서 `From<CoreError>`로 변환한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 음수 지연/크기가 담긴 관측값 (호출자가 로그 후 폐기)
    #[error("잘못된 관측값 {field}: {value}")]
    InvalidObservation {
        /// 검증 실패한 필드명
        field: &'static str,
        /// 거부된 값
        value: i64,
    },

    /// 보정에 필요한 관측 수 부족 (기본 프로파일로 대체)
    #[error("보정 데이터 부족: {count}건 관측, 최소 {required}건 필요")]
    InsufficientData {
        /// 현재 관측 수
        count: u64,
        /// 요구 관측 수
        required: u64,
    },

    /// 보안 난수원 사용 불가. 비보안 난수로 대체하지 않는다.
    #[error("보안 난수원 실패: {0}")]
    RandomSourceFailure(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
