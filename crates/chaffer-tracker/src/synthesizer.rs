//! 디코이(chaff) 트래픽 합성기.
//!
//! `StatRecorder` 스냅샷으로 분포를 보정하고, 보안 난수원으로 지연/크기를 뽑는다.
//!
//! 피드백 정책: 디코이 관측은 `TrafficKind::Chaff`로 태깅되며 기본적으로
//! 기록기에 반영하지 않는다. `ChaffConfig::feedback_enabled`로 켤 수 있다.

use chaffer_core::config::{ChaffConfig, TrafficConfig};
use chaffer_core::error::CoreError;
use chaffer_core::models::observation::{Observation, TrafficKind};
use chaffer_core::models::profile::{ChaffProfile, FittedDistribution, ProfileSource};
use chaffer_core::models::summary::StatSummary;
use chaffer_core::ports::entropy::EntropySource;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::recorder::StatRecorder;
use crate::sampling;

/// 디코이 한 건의 지연/크기
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaffSample {
    pub delay: Duration,
    pub response_bytes: usize,
    pub source: ProfileSource,
}

/// chaff 합성기
pub struct ChaffSynthesizer {
    recorder: Arc<StatRecorder>,
    entropy: Arc<dyn EntropySource>,
    traffic: TrafficConfig,
    config: ChaffConfig,
    /// 현재 프로파일. 갱신 시 통째로 교체한다.
    current: RwLock<Arc<ChaffProfile>>,
}

impl ChaffSynthesizer {
    /// 기본 프로파일로 시작하는 합성기 생성
    pub fn new(
        recorder: Arc<StatRecorder>,
        entropy: Arc<dyn EntropySource>,
        traffic: TrafficConfig,
        config: ChaffConfig,
    ) -> Self {
        let initial = Arc::new(traffic.default_profile());
        Self {
            recorder,
            entropy,
            traffic,
            config,
            current: RwLock::new(initial),
        }
    }

    pub fn config(&self) -> &ChaffConfig {
        &self.config
    }

    /// 보정에 필요한 최소 관측 수 (최소 1)
    pub fn required_observations(&self) -> u64 {
        self.config.min_observations_for_calibration.max(1)
    }

    /// 스냅샷에서 프로파일 도출 (결정적)
    ///
    /// 관측값 평균/표준편차를 관측 최소~최대 구간으로 절단한 정규 분포로 맞춘다.
    pub fn calibrate(&self, summary: &StatSummary) -> Result<ChaffProfile, CoreError> {
        let required = self.required_observations();
        if summary.count < required {
            return Err(CoreError::InsufficientData {
                count: summary.count,
                required,
            });
        }

        Ok(ChaffProfile {
            latency_ms: FittedDistribution::truncated_normal(
                summary.mean_latency_ms,
                summary.latency_std_dev(),
                summary.min_latency_ms as f64,
                summary.max_latency_ms as f64,
            ),
            response_bytes: FittedDistribution::truncated_normal(
                summary.mean_response_bytes,
                summary.response_bytes_std_dev(),
                summary.min_response_bytes as f64,
                summary.max_response_bytes as f64,
            ),
            source: ProfileSource::Observed {
                sample_count: summary.count,
            },
        })
    }

    /// 보정 실패 시 기본 프로파일로 대체
    pub fn calibrate_or_default(&self, summary: &StatSummary) -> ChaffProfile {
        match self.calibrate(summary) {
            Ok(profile) => profile,
            Err(e) => {
                debug!("기본 chaff 프로파일 사용: {e}");
                self.default_profile()
            }
        }
    }

    /// 설정된 기본 분포 프로파일
    pub fn default_profile(&self) -> ChaffProfile {
        self.traffic.default_profile()
    }

    /// 현재 통계로 재보정 후 프로파일 교체
    pub fn refresh(&self) -> Arc<ChaffProfile> {
        let summary = self.recorder.snapshot();
        let profile = Arc::new(self.calibrate_or_default(&summary));
        *self.current.write() = profile.clone();
        profile
    }

    /// 현재 프로파일. 보정 주기가 0이면 호출 시 보정한다.
    pub fn current_profile(&self) -> Arc<ChaffProfile> {
        if self.config.calibration_interval().is_none() {
            return self.refresh();
        }
        self.current.read().clone()
    }

    /// 프로파일 지연 분포에서 지연 추출
    pub fn next_delay(&self, profile: &ChaffProfile) -> Result<Duration, CoreError> {
        let ms = sampling::sample(self.entropy.as_ref(), &profile.latency_ms)?;
        Ok(Duration::from_millis(ms.round() as u64))
    }

    /// 프로파일 크기 분포에서 응답 크기 추출
    pub fn next_size(&self, profile: &ChaffProfile) -> Result<usize, CoreError> {
        let bytes = sampling::sample(self.entropy.as_ref(), &profile.response_bytes)?;
        Ok(bytes.round() as usize)
    }

    /// 현재 프로파일로 디코이 한 건 합성
    pub fn synthesize(&self) -> Result<ChaffSample, CoreError> {
        let profile = self.current_profile();
        Ok(ChaffSample {
            delay: self.next_delay(&profile)?,
            response_bytes: self.next_size(&profile)?,
            source: profile.source,
        })
    }

    /// 전송된 디코이를 피드백 정책에 따라 기록. 기록했으면 true.
    pub fn record_decoy(&self, elapsed: Duration, response_bytes: usize) -> bool {
        if !self.config.feedback_enabled {
            return false;
        }
        let obs = Observation::measured(elapsed, response_bytes, TrafficKind::Chaff);
        match self.recorder.observe(&obs) {
            Ok(()) => true,
            Err(e) => {
                warn!("디코이 관측 폐기: {e}");
                false
            }
        }
    }
}
