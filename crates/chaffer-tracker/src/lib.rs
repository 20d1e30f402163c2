//! # chaffer-tracker
//!
//! 실제 트래픽의 지연/크기 통계를 동시성 안전하게 집계하고,
//! 그 분포를 흉내 내는 디코이(chaff) 트래픽 파라미터를 합성한다.
//!
//! - [`recorder::StatRecorder`]: Welford 온라인 집계, 원시 이력 미보관
//! - [`synthesizer::ChaffSynthesizer`]: 스냅샷 보정 → 프로파일 → 지연/크기 샘플링
//! - [`entropy::OsEntropy`]: OS CSPRNG 어댑터

pub mod entropy;
pub mod online;
pub mod recorder;
mod sampling;
pub mod synthesizer;

pub use entropy::OsEntropy;
pub use recorder::StatRecorder;
pub use synthesizer::{ChaffSample, ChaffSynthesizer};
