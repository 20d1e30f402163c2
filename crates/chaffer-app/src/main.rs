//! # chaffer-app
//!
//! chaffer 서버 바이너리 진입점.
//! 설정 로드, 상태 조립, 보정 루프와 웹 서버 실행, 시그널 대기.

mod calibrator;
mod lifecycle;

use anyhow::{anyhow, Context, Result};
use chaffer_core::config::AppConfig;
use chaffer_core::config_manager::ConfigManager;
use chaffer_tracker::OsEntropy;
use chaffer_web::{AppState, WebServer};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// 백그라운드 태스크 정리 유예 시간
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// 트래픽 분석 대응용 지연/패딩 HTTP 서버
///
/// 실제 응답의 지연과 크기를 무작위화하고, 관측 분포를 흉내 내는 디코이를 제공한다.
#[derive(Parser, Debug)]
#[command(name = "chaffer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 리슨 포트
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 기본 지연 위에 더해지는 최대 무작위 지연 (밀리초)
    #[arg(long)]
    max_delay_ms: Option<u64>,

    /// 디코이 응답도 통계에 반영
    #[arg(long)]
    feedback: bool,

    /// 외부 인터페이스(0.0.0.0)에서 수신
    #[arg(long)]
    allow_external: bool,

    /// POST /stats/reset 허용
    #[arg(long)]
    allow_reset: bool,
}

impl Args {
    /// CLI 인자를 설정 위에 덮어쓴다 (파일에는 저장하지 않음)
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if let Some(max_delay_ms) = self.max_delay_ms {
            config.traffic.max_delay_ms = max_delay_ms;
        }
        if self.feedback {
            config.chaff.feedback_enabled = true;
        }
        if self.allow_external {
            config.web.allow_external = true;
        }
        if self.allow_reset {
            config.web.allow_reset = true;
        }
    }
}

/// 설정 로드 + CLI 덮어쓰기 + 검증
fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    }
    .context("설정 로드 실패")?;
    info!("설정 파일: {}", manager.config_path().display());

    let mut config = manager.get();
    args.apply_overrides(&mut config);
    config.validate().context("설정 검증 실패")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "chaffer={lvl},chaffer_app={lvl},chaffer_core={lvl},chaffer_tracker={lvl},chaffer_web={lvl},tower_http={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config = load_config(&args)?;

    // 보안 난수원 사용 가능 여부를 시작 시점에 확인
    let entropy = OsEntropy::new();
    entropy
        .probe()
        .map_err(|e| anyhow!("보안 난수원 사용 불가: {e}"))?;

    let state = AppState::build(&config, Arc::new(entropy));
    let mut lifecycle = LifecycleManager::new();

    match config.chaff.calibration_interval() {
        Some(interval) => lifecycle.track(
            "보정 루프",
            calibrator::spawn_calibration_loop(
                state.synthesizer.clone(),
                interval,
                lifecycle.subscribe(),
            ),
        ),
        None => info!("보정 주기 0: 디코이 요청마다 보정"),
    }

    let server = WebServer::new(config.web.clone(), state);
    info!("chaffer 실행 중: {} (Ctrl+C로 종료)", server.url());
    let mut server_task = tokio::spawn(server.run(lifecycle.subscribe()));

    // 서버가 먼저 끝나면(바인드 실패 등) 그 결과를, 아니면 시그널 후 graceful 종료 결과를 쓴다
    let early_exit = tokio::select! {
        result = &mut server_task => Some(result),
        stop = lifecycle.wait_for_stop() => {
            match stop {
                Ok(reason) => info!("{reason} 수신"),
                Err(e) => error!("시그널 핸들러 등록 실패: {e}"),
            }
            None
        }
    };

    lifecycle.drain(SHUTDOWN_GRACE).await;

    let server_result = match early_exit {
        Some(result) => result,
        None => server_task.await,
    };
    server_result
        .context("웹 서버 태스크 비정상 종료")?
        .context("웹 서버 오류")?;

    info!("chaffer 종료");
    Ok(())
}
