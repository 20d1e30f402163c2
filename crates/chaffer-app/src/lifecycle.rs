//! 라이프사이클 관리.
//!
//! 종료 신호 전파, 백그라운드 태스크 추적, 유예 시간 안의 정리.

use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupt,
    Terminate,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Interrupt => write!(f, "SIGINT"),
            StopReason::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// 라이프사이클 관리자
///
/// 구독자는 `watch::Receiver<bool>`로 종료를 감지하고, 추적 중인 태스크는
/// `drain`에서 유예 시간까지 기다린 뒤 남아 있으면 중단한다.
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            tasks: Vec::new(),
        }
    }

    /// 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// 정리 대상 태스크 등록
    pub fn track(&mut self, name: &'static str, handle: JoinHandle<()>) {
        self.tasks.push((name, handle));
    }

    /// 종료 신호 발송 (중복 호출 무해)
    pub fn shutdown(&self) {
        if !*self.shutdown_tx.borrow() {
            info!("종료 신호 발송");
        }
        self.shutdown_tx.send_replace(true);
    }

    /// SIGINT/SIGTERM(비 unix는 Ctrl+C) 대기
    pub async fn wait_for_stop(&self) -> std::io::Result<StopReason> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;

            let reason = tokio::select! {
                _ = sigint.recv() => StopReason::Interrupt,
                _ = sigterm.recv() => StopReason::Terminate,
            };
            Ok(reason)
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await?;
            Ok(StopReason::Interrupt)
        }
    }

    /// 종료 신호를 보내고 추적 태스크를 `grace` 안에서 회수
    pub async fn drain(self, grace: Duration) {
        self.shutdown();

        for (name, mut handle) in self.tasks {
            match tokio::time::timeout(grace, &mut handle).await {
                Ok(Ok(())) => info!("{name} 정리 완료"),
                Ok(Err(e)) => warn!("{name} 비정상 종료: {e}"),
                Err(_) => {
                    warn!("{name} 유예 시간 {}ms 초과, 중단", grace.as_millis());
                    handle.abort();
                }
            }
        }
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
