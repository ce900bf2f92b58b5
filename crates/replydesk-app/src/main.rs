//! # replydesk-app
//!
//! REPLYDESK 상담 콘솔 바이너리 진입점.
//! DI 컨테이너 역할, 설정 로드, 폴링 스케줄러 오케스트레이션.

mod console;
mod scheduler;

use anyhow::Result;
use clap::Parser;
use replydesk_core::config_manager::ConfigManager;
use replydesk_core::ports::api_client::TriageApi;
use replydesk_metrics::MetricsAggregator;
use replydesk_network::HttpTriageClient;
use replydesk_session::{TicketCatalog, TriageFlow};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::Console;
use crate::scheduler::{PollingScheduler, SchedulerConfig};

/// REPLYDESK 상담 콘솔
///
/// 지원 티켓 트리아지 — AI 답변 제안 수락/수정 및 운영 지표 패널
#[derive(Parser, Debug)]
#[command(name = "replydesk")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 서버 URL 지정 (기본: 설정 파일 값)
    #[arg(long, short = 's')]
    server: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 지표 폴링 주기 (초)
    #[arg(long)]
    refresh_interval: Option<u64>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };
    let mut config = config_manager.get();

    // CLI 인자가 설정 파일보다 우선
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(secs) = args.refresh_interval {
        config.metrics.refresh_interval_secs = secs;
    }

    info!("서버: {}", config.server.base_url);

    let api: Arc<dyn TriageApi> =
        Arc::new(HttpTriageClient::new(&config.server.base_url, config.server.timeout())?);

    let catalog = TicketCatalog::load(api.as_ref()).await;
    if catalog.is_empty() {
        warn!("빈 카탈로그로 시작합니다");
    }

    let metrics = Arc::new(MetricsAggregator::new(api.clone()));
    let flow = Arc::new(TriageFlow::new(api, metrics.clone()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poller = PollingScheduler::new(
        SchedulerConfig {
            refresh_interval: Duration::from_secs(config.metrics.refresh_interval_secs),
        },
        metrics,
    );
    let poll_rx = shutdown_rx.clone();
    let poll_task = tokio::spawn(async move { poller.run(poll_rx).await });

    // 콘솔 루프 — quit/EOF 또는 Ctrl+C에서 반환
    let console = Console::new(catalog, flow, config.metrics.top_tags_limit);
    tokio::select! {
        result = console.run(shutdown_rx) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C 수신");
        }
    }

    let _ = shutdown_tx.send(true);
    poll_task.await?;
    info!("종료 완료");

    Ok(())
}
