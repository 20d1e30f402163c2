//! 누적 통계 요약.

use serde::{Deserialize, Serialize};

/// 관측값 누적 요약 (불변 스냅샷).
///
/// 분산은 표본 분산(n-1)이며 관측 수가 2 미만이면 0이다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatSummary {
    /// 반영된 관측 수 (디코이 피드백 포함)
    pub count: u64,
    /// 그중 디코이 관측 수
    pub chaff_count: u64,
    /// 검증 실패로 거부된 관측 수
    pub rejected: u64,
    /// 최소 지연 (ms)
    pub min_latency_ms: u64,
    /// 최대 지연 (ms)
    pub max_latency_ms: u64,
    /// 평균 지연 (ms)
    pub mean_latency_ms: f64,
    /// 지연 분산 (ms²)
    pub latency_variance: f64,
    /// 최소 응답 크기 (bytes)
    pub min_response_bytes: u64,
    /// 최대 응답 크기 (bytes)
    pub max_response_bytes: u64,
    /// 평균 응답 크기 (bytes)
    pub mean_response_bytes: f64,
    /// 응답 크기 분산
    pub response_bytes_variance: f64,
}

impl StatSummary {
    /// 관측이 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// 지연 표준편차 (ms)
    pub fn latency_std_dev(&self) -> f64 {
        self.latency_variance.max(0.0).sqrt()
    }

    /// 응답 크기 표준편차 (bytes)
    pub fn response_bytes_std_dev(&self) -> f64 {
        self.response_bytes_variance.max(0.0).sqrt()
    }
}
