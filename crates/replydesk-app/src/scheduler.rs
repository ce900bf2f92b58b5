//! 지표 폴링 스케줄러.
//!
//! 고정 주기로 서버 집계를 가져와 병합기에 반영한다. 확정 직후의
//! 수동 refresh와 겹쳐도 병합이 전체 교체라 상호 배제가 필요 없다.

use replydesk_metrics::MetricsAggregator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// 스케줄러 설정
pub struct SchedulerConfig {
    /// 지표 폴링 주기
    pub refresh_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(8),
        }
    }
}

/// 지표 폴링 스케줄러
pub struct PollingScheduler {
    config: SchedulerConfig,
    metrics: Arc<MetricsAggregator>,
}

impl PollingScheduler {
    /// 새 스케줄러 생성
    pub fn new(config: SchedulerConfig, metrics: Arc<MetricsAggregator>) -> Self {
        Self { config, metrics }
    }

    /// 폴링 루프 시작.
    ///
    /// 종료 신호 수신 즉시 중단된다. 중단 이후에는 어떤 refresh도
    /// 발화하지 않는다.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            "지표 폴링 시작: 주기={}ms",
            self.config.refresh_interval.as_millis()
        );

        let mut interval = tokio::time::interval(self.config.refresh_interval);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.metrics.refresh().await;
                }
                _ = shutdown_rx.changed() => {
                    info!("지표 폴링 종료");
                    break;
                }
            }
        }
    }
}
