//! 애플리케이션 설정 구조체.
//!
//! 웹 서버 바인드, 실제 트래픽 기본 분포, chaff 보정 정책을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드하고 CLI 인자로 오버라이드한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::models::profile::{ChaffProfile, FittedDistribution, ProfileSource};

/// 응답 본문 최대 크기 (16 MiB)
pub const MAX_RESPONSE_BYTES_LIMIT: u64 = 16 * 1024 * 1024;

/// 지연 상한의 최대값 (60초)
pub const MAX_DELAY_MS_LIMIT: u64 = 60_000;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 웹 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 실제 트래픽 경로 설정
    #[serde(default)]
    pub traffic: TrafficConfig,
    /// chaff 보정/피드백 설정
    #[serde(default)]
    pub chaff: ChaffConfig,
}

// ============================================================
// 웹 서버 설정
// ============================================================

/// 웹 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 포트 (기본: 8080)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
    /// 통계 초기화 엔드포인트 노출 여부
    #[serde(default)]
    pub allow_reset: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
            allow_reset: false,
        }
    }
}

// ============================================================
// 실제 트래픽 설정
// ============================================================

/// 실제 트래픽 경로의 기본 지연/크기 분포
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// 최소 지연 (ms)
    #[serde(default = "default_base_latency_ms")]
    pub base_latency_ms: u64,
    /// 최소 지연 위로 더해지는 무작위 지연의 상한 (ms)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// 최소 응답 크기 (bytes)
    #[serde(default = "default_min_response_bytes")]
    pub min_response_bytes: u64,
    /// 최대 응답 크기 (bytes)
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: u64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            base_latency_ms: default_base_latency_ms(),
            max_delay_ms: default_max_delay_ms(),
            min_response_bytes: default_min_response_bytes(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl TrafficConfig {
    /// 지연 상한 (ms, 포함)
    pub fn latency_upper_ms(&self) -> u64 {
        self.base_latency_ms.saturating_add(self.max_delay_ms)
    }

    /// 기본 분포를 그대로 따르는 chaff 프로파일.
    /// 보정 데이터가 부족할 때 사용한다.
    pub fn default_profile(&self) -> ChaffProfile {
        ChaffProfile {
            latency_ms: FittedDistribution::uniform(
                self.base_latency_ms as f64,
                self.latency_upper_ms() as f64,
            ),
            response_bytes: FittedDistribution::uniform(
                self.min_response_bytes as f64,
                self.max_response_bytes as f64,
            ),
            source: ProfileSource::Default,
        }
    }
}

// ============================================================
// chaff 설정
// ============================================================

/// chaff 보정 정책
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaffConfig {
    /// 실측 데이터를 신뢰하기 위한 최소 관측 수
    #[serde(default = "default_min_observations")]
    pub min_observations_for_calibration: u64,
    /// 디코이 관측을 통계에 되먹일지 여부 (기본: false)
    #[serde(default)]
    pub feedback_enabled: bool,
    /// 프로파일 재보정 주기 (ms, 0이면 요청마다 보정)
    #[serde(default = "default_calibration_interval_ms")]
    pub calibration_interval_ms: u64,
}

impl Default for ChaffConfig {
    fn default() -> Self {
        Self {
            min_observations_for_calibration: default_min_observations(),
            feedback_enabled: false,
            calibration_interval_ms: default_calibration_interval_ms(),
        }
    }
}

impl ChaffConfig {
    /// 재보정 주기. 0이면 `None` (요청 시 보정)
    pub fn calibration_interval(&self) -> Option<Duration> {
        (self.calibration_interval_ms > 0)
            .then(|| Duration::from_millis(self.calibration_interval_ms))
    }
}

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            web: WebConfig::default(),
            traffic: TrafficConfig::default(),
            chaff: ChaffConfig::default(),
        }
    }

    /// 설정값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let t = &self.traffic;
        if t.min_response_bytes > t.max_response_bytes {
            return Err(CoreError::Config(format!(
                "min_response_bytes({})가 max_response_bytes({})보다 큼",
                t.min_response_bytes, t.max_response_bytes
            )));
        }
        if t.max_response_bytes > MAX_RESPONSE_BYTES_LIMIT {
            return Err(CoreError::Config(format!(
                "max_response_bytes({})가 상한 {}을 초과",
                t.max_response_bytes, MAX_RESPONSE_BYTES_LIMIT
            )));
        }
        if t.max_delay_ms > MAX_DELAY_MS_LIMIT {
            return Err(CoreError::Config(format!(
                "max_delay_ms({})가 상한 {}을 초과",
                t.max_delay_ms, MAX_DELAY_MS_LIMIT
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_web_port() -> u16 {
    8080
}
fn default_base_latency_ms() -> u64 {
    100
}
fn default_max_delay_ms() -> u64 {
    1_000
}
fn default_min_response_bytes() -> u64 {
    100
}
fn default_max_response_bytes() -> u64 {
    1_100
}
fn default_min_observations() -> u64 {
    1
}
fn default_calibration_interval_ms() -> u64 {
    5_000
}
