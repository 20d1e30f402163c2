//! 동시성 안전 트래픽 통계 기록기.

use chaffer_core::error::CoreError;
use chaffer_core::models::observation::{Observation, TrafficKind};
use chaffer_core::models::summary::StatSummary;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::online::OnlineStats;

/// 잠금 아래에서만 변경되는 집계 상태
#[derive(Debug, Default)]
struct Aggregate {
    latency: OnlineStats,
    size: OnlineStats,
    chaff_count: u64,
    rejected: u64,
}

impl Aggregate {
    fn fold(&mut self, latency_ms: u64, response_bytes: u64, kind: TrafficKind) {
        self.latency.update(latency_ms);
        self.size.update(response_bytes);
        if kind == TrafficKind::Chaff {
            self.chaff_count += 1;
        }
    }

    fn summary(&self) -> StatSummary {
        StatSummary {
            count: self.latency.count(),
            chaff_count: self.chaff_count,
            rejected: self.rejected,
            min_latency_ms: self.latency.min(),
            max_latency_ms: self.latency.max(),
            mean_latency_ms: self.latency.mean(),
            latency_variance: self.latency.variance(),
            min_response_bytes: self.size.min(),
            max_response_bytes: self.size.max(),
            mean_response_bytes: self.size.mean(),
            response_bytes_variance: self.size.variance(),
        }
    }
}

/// 트래픽 관측 통계 기록기
///
/// 프로세스 전역 싱글턴이 아니라 조립 루트가 생성해 `Arc`로 공유한다.
/// 모든 변경은 `observe`/`reset`의 쓰기 잠금, 조회는 `snapshot`의 읽기 잠금을 거친다.
/// 잠금 안에서는 await하지 않는다.
#[derive(Debug, Default)]
pub struct StatRecorder {
    state: RwLock<Aggregate>,
}

impl StatRecorder {
    /// 빈 기록기 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 관측값을 요약 상태에 반영
    ///
    /// 음수 지연/크기는 `InvalidObservation`으로 거부하며 `count`는 변하지 않는다.
    pub fn observe(&self, obs: &Observation) -> Result<(), CoreError> {
        if let Err(e) = obs.validate() {
            self.state.write().rejected += 1;
            return Err(e);
        }

        // validate 통과 후이므로 음수 아님
        let latency_ms = obs.latency_ms() as u64;
        let response_bytes = obs.response_bytes() as u64;

        self.state
            .write()
            .fold(latency_ms, response_bytes, obs.kind());
        debug!(
            latency_ms,
            response_bytes,
            kind = ?obs.kind(),
            "관측값 기록"
        );
        Ok(())
    }

    /// 현재 집계 상태의 불변 복사본
    pub fn snapshot(&self) -> StatSummary {
        self.state.read().summary()
    }

    /// 집계 상태 초기화
    ///
    /// 쓰기 잠금으로 진행 중인 `observe`/`snapshot`과 배타적이다.
    pub fn reset(&self) {
        let previous = {
            let mut state = self.state.write();
            std::mem::take(&mut *state).latency.count()
        };
        info!("트래픽 통계 초기화 (이전 관측 {previous}건)");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn real(latency_ms: i64, response_bytes: i64) -> Observation {
        Observation::new(latency_ms, response_bytes, TrafficKind::Real)
    }

    #[test]
    fn count_and_mean_follow_observations() {
        let recorder = StatRecorder::new();
        let latencies = [100i64, 250, 400, 1_050, 730];
        for (i, &l) in latencies.iter().enumerate() {
            recorder.observe(&real(l, 10 * i as i64)).unwrap();
        }

        let summary = recorder.snapshot();
        let expected_mean = latencies.iter().sum::<i64>() as f64 / latencies.len() as f64;
        assert_eq!(summary.count, latencies.len() as u64);
        assert!((summary.mean_latency_ms - expected_mean).abs() < 1e-9);
        assert_eq!(summary.min_latency_ms, 100);
        assert_eq!(summary.max_latency_ms, 1_050);
        assert!((summary.mean_response_bytes - 20.0).abs() < 1e-9);
    }

    #[test]
    fn negative_latency_rejected_without_count_change() {
        let recorder = StatRecorder::new();
        recorder.observe(&real(10, 10)).unwrap();

        let err = recorder.observe(&real(-1, 10)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidObservation { .. }));

        let summary = recorder.snapshot();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.mean_latency_ms, 10.0);
    }

    #[test]
    fn negative_size_rejected() {
        let recorder = StatRecorder::new();
        assert!(recorder.observe(&real(10, -1)).is_err());
        assert_eq!(recorder.snapshot().count, 0);
    }

    #[test]
    fn reset_clears_everything() {
        let recorder = StatRecorder::new();
        for l in 0..10 {
            recorder.observe(&real(l, l)).unwrap();
        }
        let _ = recorder.observe(&real(-3, 1));

        recorder.reset();
        let summary = recorder.snapshot();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.rejected, 0);
        assert!(summary.is_empty());
    }

    #[test]
    fn chaff_observations_counted_separately() {
        let recorder = StatRecorder::new();
        recorder.observe(&real(100, 100)).unwrap();
        recorder
            .observe(&Observation::new(200, 200, TrafficKind::Chaff))
            .unwrap();

        let summary = recorder.snapshot();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.chaff_count, 1);
    }

    #[test]
    fn concurrent_threads_lose_no_updates() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        let recorder = Arc::new(StatRecorder::new());
        std::thread::scope(|s| {
            for t in 0..THREADS {
                let recorder = recorder.clone();
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        let latency = (t * PER_THREAD + i) as i64;
                        recorder.observe(&real(latency, 1)).unwrap();
                    }
                });
            }
        });

        let n = THREADS * PER_THREAD;
        let expected_mean = (0..n).map(|v| v as f64).sum::<f64>() / n as f64;
        let summary = recorder.snapshot();
        assert_eq!(summary.count, n as u64);
        assert!((summary.mean_latency_ms - expected_mean).abs() < 1e-6);
        assert_eq!(summary.min_latency_ms, 0);
        assert_eq!(summary.max_latency_ms, (n - 1) as u64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_tasks_with_readers() {
        const TASKS: i64 = 1_000;

        let recorder = Arc::new(StatRecorder::new());
        let mut handles = Vec::new();
        for i in 0..TASKS {
            let recorder = recorder.clone();
            handles.push(tokio::spawn(async move {
                recorder.observe(&real(i % 100, 64)).unwrap();
                // 스냅샷은 항상 일관된 상태여야 함
                let snap = recorder.snapshot();
                assert!(snap.count >= 1);
                assert!(snap.mean_latency_ms <= 99.0);
                assert_eq!(snap.mean_response_bytes, 64.0);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let expected_mean = (0..TASKS).map(|i| (i % 100) as f64).sum::<f64>() / TASKS as f64;
        let summary = recorder.snapshot();
        assert_eq!(summary.count, TASKS as u64);
        assert!((summary.mean_latency_ms - expected_mean).abs() < 1e-6);
    }
}
