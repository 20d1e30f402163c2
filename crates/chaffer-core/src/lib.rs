//! # chaffer-core
//!
//! chaffer 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 관측값, 통계 요약, chaff 프로파일 (serde Serialize/Deserialize)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (보안 난수원)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::observation::{Observation, TrafficKind};
    use crate::models::profile::ProfileSource;

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.traffic.base_latency_ms, 100);
        assert_eq!(config.traffic.max_delay_ms, 1_000);
        assert_eq!(config.chaff.min_observations_for_calibration, 1);
        assert!(!config.chaff.feedback_enabled);
    }

    #[test]
    fn default_profile_follows_base_distribution() {
        let config = crate::config::AppConfig::default_config();
        let profile = config.traffic.default_profile();
        assert_eq!(profile.source, ProfileSource::Default);
        assert_eq!(profile.latency_ms.min, 100.0);
        assert_eq!(profile.latency_ms.max, 1_100.0);
    }

    #[test]
    fn observation_kind_is_kept() {
        let obs = Observation::new(5, 10, TrafficKind::Chaff);
        assert_eq!(obs.kind(), TrafficKind::Chaff);
        assert!(obs.validate().is_ok());
    }
}
