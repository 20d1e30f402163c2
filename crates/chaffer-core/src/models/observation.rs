//! 요청 단위 관측값.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::error::CoreError;

/// 트래픽 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficKind {
    /// 실제 요청
    Real,
    /// 디코이(chaff) 요청
    Chaff,
}

/// 단일 요청/응답 사이클의 (지연, 크기) 관측값.
///
/// 생성 후 불변. `StatRecorder`가 요약 상태에 접어 넣은 뒤 폐기한다.
/// 음수 값은 검증 단계에서 거부되도록 부호 있는 정수로 받는다.
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    latency_ms: i64,
    response_bytes: i64,
    timestamp: Instant,
    kind: TrafficKind,
}

impl Observation {
    /// 현재 시각으로 관측값 생성
    pub fn new(latency_ms: i64, response_bytes: i64, kind: TrafficKind) -> Self {
        Self {
            latency_ms,
            response_bytes,
            timestamp: Instant::now(),
            kind,
        }
    }

    /// 측정된 경과 시간과 본문 길이로 관측값 생성
    pub fn measured(elapsed: Duration, response_bytes: usize, kind: TrafficKind) -> Self {
        let latency_ms = i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX);
        let response_bytes = i64::try_from(response_bytes).unwrap_or(i64::MAX);
        Self::new(latency_ms, response_bytes, kind)
    }

    /// 지연 시간 (밀리초)
    pub fn latency_ms(&self) -> i64 {
        self.latency_ms
    }

    /// 응답 크기 (바이트)
    pub fn response_bytes(&self) -> i64 {
        self.response_bytes
    }

    /// 관측 시각 (단조 시계)
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// 트래픽 종류
    pub fn kind(&self) -> TrafficKind {
        self.kind
    }

    /// 음수 지연/크기 거부
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.latency_ms < 0 {
            return Err(CoreError::InvalidObservation {
                field: "latency_ms",
                value: self.latency_ms,
            });
        }
        if self.response_bytes < 0 {
            return Err(CoreError::InvalidObservation {
                field: "response_bytes",
                value: self.response_bytes,
            });
        }
        Ok(())
    }
}
