//! # chaffer-web
//!
//! 실제 트래픽/디코이/통계 HTTP 서버.
//! Axum 기반, 모든 핸들러가 하나의 [`AppState`]를 공유한다.
//!
//! ## 엔드포인트
//! - `GET /` 무작위 지연 + 패딩 본문, 관측값 기록
//! - `GET /chaff` 관측 분포를 흉내 낸 디코이 응답
//! - `GET /stats` 누적 통계 스냅샷 (읽기 전용)
//! - `GET /stats/profile` 현재 디코이 프로파일
//! - `POST /stats/reset` 통계 초기화 (`allow_reset`일 때만)

pub mod error;
pub mod handlers;
pub mod padding;
pub mod routes;

use axum::Router;
use chaffer_core::config::{AppConfig, TrafficConfig, WebConfig};
use chaffer_core::ports::entropy::EntropySource;
use chaffer_tracker::{ChaffSynthesizer, StatRecorder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 바인드 시도 포트 목록. `u16::MAX`를 넘는 포트는 시도하지 않는다.
fn candidate_ports(base_port: u16) -> impl Iterator<Item = u16> {
    (0..MAX_PORT_ATTEMPTS).map_while(move |offset| base_port.checked_add(offset))
}

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 실제 트래픽 통계 집계기
    pub recorder: Arc<StatRecorder>,
    /// 디코이 합성기 (같은 집계기를 참조)
    pub synthesizer: Arc<ChaffSynthesizer>,
    /// 기본 분포용 난수원
    pub entropy: Arc<dyn EntropySource>,
    /// 기본 트래픽 분포 설정
    pub traffic: TrafficConfig,
}

impl AppState {
    pub fn new(
        recorder: Arc<StatRecorder>,
        synthesizer: Arc<ChaffSynthesizer>,
        entropy: Arc<dyn EntropySource>,
        traffic: TrafficConfig,
    ) -> Self {
        Self {
            recorder,
            synthesizer,
            entropy,
            traffic,
        }
    }

    /// 설정으로부터 집계기와 합성기를 새로 구성
    ///
    /// 집계기 하나를 트래픽 핸들러와 합성기가 공유한다.
    pub fn build(config: &AppConfig, entropy: Arc<dyn EntropySource>) -> Self {
        let recorder = Arc::new(StatRecorder::new());
        let synthesizer = Arc::new(ChaffSynthesizer::new(
            recorder.clone(),
            entropy.clone(),
            config.traffic.clone(),
            config.chaff.clone(),
        ));
        Self::new(recorder, synthesizer, entropy, config.traffic.clone())
    }
}

/// chaffer HTTP 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    pub fn new(config: WebConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// 공유 상태 참조
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// 라우터 구성
    pub fn router(&self) -> Router {
        routes::traffic_routes(self.config.allow_reset)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 서버 실행
    ///
    /// 설정 포트부터 시작해 사용 중이면 다음 포트를 시도한다.
    /// `MAX_PORT_ATTEMPTS`번 모두 실패하면 에러를 반환한다.
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let base_port = self.config.port;
        let mut last_error = None;

        for (attempt, port) in candidate_ports(base_port).enumerate() {
            let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {}:{}: {}", host, port, e);
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {} 사용 불가, 대체 포트 {} 사용", base_port, port);
                    }
                    return self.serve(listener, shutdown_rx).await;
                }
                Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                    warn!("포트 {} 이미 사용 중, 다음 포트 시도...", port);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    candidate_ports(base_port).last().unwrap_or(base_port)
                ),
            )
        }))
    }

    /// 이미 바인드된 리스너로 서버 실행
    ///
    /// 종료 신호를 받으면 진행 중인 요청을 마무리하고 반환한다.
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        let app = self.router();
        info!("chaffer 서버 시작: http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("웹 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("chaffer 서버 종료");
        Ok(())
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}
