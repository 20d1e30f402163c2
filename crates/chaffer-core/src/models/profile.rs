//! chaff 샘플링 프로파일.
//!
//! `StatSummary` 스냅샷에서 파생된 시점 고정 분포. 생성 후 불변이며
//! 다음 보정 주기에 새 프로파일로 교체된다.

use serde::{Deserialize, Serialize};

/// 분포 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionKind {
    /// [min, max] 균등 분포
    Uniform,
    /// [min, max]로 절단된 정규 분포
    TruncatedNormal,
}

/// 음이 아닌 값의 샘플링 분포
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FittedDistribution {
    pub kind: DistributionKind,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl FittedDistribution {
    /// 절단 정규 분포 생성
    ///
    /// `0 <= min <= max`, `std_dev >= 0`, `mean ∈ [min, max]`로 정규화한다.
    pub fn truncated_normal(mean: f64, std_dev: f64, min: f64, max: f64) -> Self {
        Self::normalized(DistributionKind::TruncatedNormal, mean, std_dev, min, max)
    }

    /// 균등 분포 생성
    pub fn uniform(min: f64, max: f64) -> Self {
        let min = finite_or_zero(min).max(0.0);
        let max = finite_or_zero(max).max(min);
        let mean = (min + max) / 2.0;
        let std_dev = (max - min) / 12f64.sqrt();
        Self::normalized(DistributionKind::Uniform, mean, std_dev, min, max)
    }

    fn normalized(kind: DistributionKind, mean: f64, std_dev: f64, min: f64, max: f64) -> Self {
        let min = finite_or_zero(min).max(0.0);
        let max = finite_or_zero(max).max(min);
        Self {
            kind,
            mean: finite_or_zero(mean).clamp(min, max),
            std_dev: finite_or_zero(std_dev).max(0.0),
            min,
            max,
        }
    }

    /// 분산이 없어 항상 같은 값을 내는지 여부
    pub fn is_degenerate(&self) -> bool {
        self.max - self.min <= f64::EPSILON
            || (self.kind == DistributionKind::TruncatedNormal && self.std_dev <= f64::EPSILON)
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// 프로파일 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProfileSource {
    /// 실측 요약에서 보정됨
    Observed {
        /// 보정에 사용된 관측 수
        sample_count: u64,
    },
    /// 데이터 부족으로 설정된 기본 분포 사용
    Default,
}

/// 디코이 트래픽의 지연/크기 분포
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChaffProfile {
    /// 지연 분포 (ms)
    pub latency_ms: FittedDistribution,
    /// 응답 크기 분포 (bytes)
    pub response_bytes: FittedDistribution,
    /// 프로파일 출처
    pub source: ProfileSource,
}
