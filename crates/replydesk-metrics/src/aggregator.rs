//! 지표 병합기.
//!
//! 스냅샷의 유일한 변경 창구. 세 변경 경로(표시 카운트 증가, 응답 시간
//! 추가, 서버 집계 교체)를 모두 이 타입을 통해 직렬화한다.

use parking_lot::RwLock;
use replydesk_core::models::metrics::MetricsSnapshot;
use replydesk_core::ports::api_client::TriageApi;
use std::sync::Arc;
use tracing::{debug, warn};

/// 지표 병합기 — 프로세스 전역 스냅샷 소유자
pub struct MetricsAggregator {
    api: Arc<dyn TriageApi>,
    snapshot: RwLock<MetricsSnapshot>,
}

impl MetricsAggregator {
    /// 새 병합기 생성 (스냅샷은 전부 0/빈 값으로 시작)
    pub fn new(api: Arc<dyn TriageApi>) -> Self {
        Self {
            api,
            snapshot: RwLock::new(MetricsSnapshot::default()),
        }
    }

    /// 제안 표시 횟수 +1
    ///
    /// 제안 요청이 성공적으로 반영될 때마다 정확히 1회 호출된다.
    /// 실패/스테일 응답에서는 호출되지 않는다.
    pub fn record_shown(&self) {
        self.snapshot.write().suggestions_shown += 1;
    }

    /// 확정 전송이 성공한 결정의 응답 시간(분) 추가
    pub fn record_response_time(&self, minutes: u32) {
        self.snapshot.write().response_times_min.push(minutes);
    }

    /// 서버 집계 조회 및 병합 (best-effort)
    ///
    /// 성공 시 서버 권위 필드를 전체 교체한다. 교체는 멱등이라 동시
    /// refresh 간 순서가 결과를 깨뜨리지 않는다. 실패 시 스냅샷을
    /// 건드리지 않고 경고만 남긴다.
    pub async fn refresh(&self) {
        let total_shown = self.snapshot.read().suggestions_shown;

        match self.api.get_metrics(total_shown).await {
            Ok(report) => {
                let mut snapshot = self.snapshot.write();
                snapshot.suggestions_accepted = report.suggestions_accepted;
                snapshot.tag_counts = report.tag_counts;
                debug!(
                    "지표 갱신: accepted={} tags={}",
                    snapshot.suggestions_accepted,
                    snapshot.tag_counts.len()
                );
            }
            Err(e) => {
                warn!("지표 갱신 실패 (이전 값 유지): {e}");
            }
        }
    }

    /// 현재 스냅샷 (복제본)
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.read().clone()
    }

    /// 수락률 (%) = round(100 × accepted / shown), shown=0이면 0
    pub fn acceptance_rate(&self) -> u32 {
        let snapshot = self.snapshot.read();
        if snapshot.suggestions_shown == 0 {
            return 0;
        }
        let rate =
            100.0 * snapshot.suggestions_accepted as f64 / snapshot.suggestions_shown as f64;
        rate.round() as u32
    }

    /// 평균 응답 시간 (분) = round(산술 평균), 목록이 비면 0
    pub fn average_response_time(&self) -> u32 {
        let snapshot = self.snapshot.read();
        if snapshot.response_times_min.is_empty() {
            return 0;
        }
        let sum: u64 = snapshot.response_times_min.iter().map(|&m| m as u64).sum();
        let mean = sum as f64 / snapshot.response_times_min.len() as f64;
        mean.round() as u32
    }

    /// 카운트 상위 `limit`개 태그.
    ///
    /// 내림차순, 동률은 서버 응답에서 먼저 본 태그가 앞선다 (안정 정렬).
    pub fn top_tags(&self, limit: usize) -> Vec<(String, u64)> {
        let snapshot = self.snapshot.read();
        let mut entries: Vec<(String, u64)> = snapshot
            .tag_counts
            .iter()
            .map(|(tag, &count)| (tag.clone(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}
