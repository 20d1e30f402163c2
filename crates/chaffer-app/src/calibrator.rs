//! 주기적 프로파일 보정 루프.

use chaffer_tracker::ChaffSynthesizer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// 보정 루프 시작
///
/// `interval`마다 현재 통계로 디코이 프로파일을 다시 맞추고, 종료 신호를 받으면 끝낸다.
pub fn spawn_calibration_loop(
    synthesizer: Arc<ChaffSynthesizer>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        info!("chaff 보정 루프 시작 (주기 {}ms)", interval.as_millis());

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let profile = synthesizer.refresh();
                    debug!(source = ?profile.source, "chaff 프로파일 갱신");
                }
                _ = shutdown.changed() => {
                    info!("보정 루프 종료");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaffer_core::config::{ChaffConfig, TrafficConfig};
    use chaffer_core::models::observation::{Observation, TrafficKind};
    use chaffer_core::models::profile::ProfileSource;
    use chaffer_tracker::{OsEntropy, StatRecorder};

    fn synthesizer(recorder: Arc<StatRecorder>) -> Arc<ChaffSynthesizer> {
        Arc::new(ChaffSynthesizer::new(
            recorder,
            Arc::new(OsEntropy::new()),
            TrafficConfig::default(),
            ChaffConfig::default(),
        ))
    }

    #[tokio::test]
    async fn loop_recalibrates_until_shutdown() {
        let recorder = Arc::new(StatRecorder::new());
        let synth = synthesizer(recorder.clone());
        let (tx, rx) = watch::channel(false);

        let handle = spawn_calibration_loop(synth.clone(), Duration::from_millis(10), rx);

        recorder
            .observe(&Observation::new(200, 700, TrafficKind::Real))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(
            synth.current_profile().source,
            ProfileSource::Observed { sample_count: 1 }
        );

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("보정 루프가 종료되지 않음")
            .unwrap();
    }
}
