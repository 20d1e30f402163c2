//! 테스트 서버 모듈
//!
//! 실제 `WebServer`를 자동 할당 포트에 띄우고, 드롭 시 종료 신호를 보낸다.

#![allow(dead_code)]

use chaffer_core::config::{AppConfig, WebConfig};
use chaffer_core::ports::entropy::EntropySource;
use chaffer_tracker::OsEntropy;
use chaffer_web::{AppState, WebServer};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// 테스트 서버 핸들
pub struct TestServer {
    addr: String,
    pub state: AppState,
    shutdown_tx: watch::Sender<bool>,
}

impl TestServer {
    /// OS 난수원으로 서버 시작
    pub async fn start(config: AppConfig) -> Self {
        Self::start_with_entropy(config, Arc::new(OsEntropy::new())).await
    }

    /// 지정 난수원으로 서버 시작
    pub async fn start_with_entropy(config: AppConfig, entropy: Arc<dyn EntropySource>) -> Self {
        let state = AppState::build(&config, entropy);
        let web = WebConfig {
            port: 0,
            ..config.web.clone()
        };
        let server = WebServer::new(web, state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("포트 바인딩 실패");
        let port = listener.local_addr().unwrap().port();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            server
                .serve(listener, shutdown_rx)
                .await
                .expect("서버 실행 실패");
        });

        Self {
            addr: format!("http://127.0.0.1:{}", port),
            state,
            shutdown_tx,
        }
    }

    /// 서버 주소 반환
    pub fn url(&self) -> &str {
        &self.addr
    }

    /// 경로를 붙인 전체 URL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// 빠른 테스트용 설정 (지연 `[base, base + max_delay]`, 크기 `[min, max]`)
pub fn fast_config(base_ms: u64, max_delay_ms: u64, min_bytes: u64, max_bytes: u64) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.traffic.base_latency_ms = base_ms;
    config.traffic.max_delay_ms = max_delay_ms;
    config.traffic.min_response_bytes = min_bytes;
    config.traffic.max_response_bytes = max_bytes;
    config
}
