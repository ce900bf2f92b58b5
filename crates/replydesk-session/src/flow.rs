//! 확정 플로우 드라이버.
//!
//! 세션 상태 기계를 Mutex 뒤에 두고 네트워크 호출을 오케스트레이션한다.
//! 락은 네트워크 await를 가로질러 잡지 않는다. 응답 도착 시 요청
//! 시퀀스를 재확인해서 스테일 응답을 폐기한다.

use rand::RngExt;
use replydesk_core::error::CoreError;
use replydesk_core::models::ticket::Ticket;
use replydesk_core::ports::api_client::TriageApi;
use replydesk_metrics::MetricsAggregator;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::presenter::{self, SuggestionView};
use crate::session::{FinalizeKind, SessionError, SessionState, SuggestionSession};

/// 응답 소요 시간 시뮬레이션 범위 (분, 양끝 포함)
const RESPONSE_TIME_MIN: u32 = 5;
const RESPONSE_TIME_MAX: u32 = 60;

/// 플로우 에러 — 세션 전이 에러 또는 백엔드 호출 에러
#[derive(Debug, Error)]
pub enum FlowError {
    /// 세션 상태 전이 거부
    #[error(transparent)]
    Session(#[from] SessionError),

    /// 백엔드 호출 실패
    #[error(transparent)]
    Api(#[from] CoreError),
}

/// 확정 플로우 — 세션/지표/백엔드를 묶는 콘솔 진입점
pub struct TriageFlow {
    api: Arc<dyn TriageApi>,
    metrics: Arc<MetricsAggregator>,
    session: Mutex<SuggestionSession>,
}

impl TriageFlow {
    /// 새 플로우 생성
    pub fn new(api: Arc<dyn TriageApi>, metrics: Arc<MetricsAggregator>) -> Self {
        Self {
            api,
            metrics,
            session: Mutex::new(SuggestionSession::new()),
        }
    }

    /// 지표 병합기 참조
    pub fn metrics(&self) -> &MetricsAggregator {
        &self.metrics
    }

    /// 현재 세션 상태
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// 현재 선택된 티켓 ID
    pub async fn selected_ticket_id(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .selected()
            .map(|t| t.ticket_id.clone())
    }

    /// 현재 초안 텍스트 (Ready 상태에서만 Some)
    pub async fn draft(&self) -> Option<String> {
        self.session.lock().await.draft().map(str::to_string)
    }

    /// 표시용 제안 뷰 (Ready 상태에서만 Some)
    pub async fn suggestion_view(&self) -> Option<SuggestionView> {
        let session = self.session.lock().await;
        let suggestion = session.suggestion()?;
        let received_at = session.received_at()?;
        Some(presenter::present(suggestion, received_at))
    }

    /// 티켓 선택 변경 — 비행 중인 요청의 응답은 도착 시 폐기된다
    pub async fn select_ticket(&self, ticket: Option<Ticket>) {
        self.session.lock().await.select_ticket(ticket);
    }

    /// 선택된 티켓에 대한 제안 요청.
    ///
    /// 반환값: `Ok(true)` 반영 완료(Ready), `Ok(false)` 응답이 도착했지만
    /// 그 사이 선택이 바뀌어 폐기됨. 표시 카운트는 반영된 경우에만 +1.
    pub async fn request_suggestion(&self) -> Result<bool, FlowError> {
        let pending = self.session.lock().await.begin_request()?;

        match self.api.generate_suggestion(&pending.ticket_id).await {
            Ok(suggestion) => {
                let mut session = self.session.lock().await;
                if session.apply_response(pending.seq, suggestion) {
                    drop(session);
                    self.metrics.record_shown();
                    Ok(true)
                } else {
                    debug!(
                        "스테일 제안 응답 폐기: ticket_id={} seq={}",
                        pending.ticket_id, pending.seq
                    );
                    Ok(false)
                }
            }
            Err(e) => {
                self.session.lock().await.fail_request(pending.seq);
                Err(e.into())
            }
        }
    }

    /// 초안 편집
    pub async fn edit_draft(&self, text: impl Into<String>) -> Result<(), FlowError> {
        self.session.lock().await.edit_draft(text)?;
        Ok(())
    }

    /// 확정: 결정을 서버로 전송하고 지표를 갱신한다.
    ///
    /// 소요 시간은 확정 시점에 1회만 샘플링되어 결정 페이로드와 로컬
    /// 지표에 같은 값으로 들어간다. 전송 실패 시 세션은 이미 Idle이고
    /// (at-most-once) 로컬 소요 시간은 기록하지 않는다.
    pub async fn finalize(&self, kind: FinalizeKind) -> Result<(), FlowError> {
        let minutes = rand::rng().random_range(RESPONSE_TIME_MIN..=RESPONSE_TIME_MAX);
        let decision = self.session.lock().await.finalize(kind, minutes)?;

        match self.api.record_decision(&decision).await {
            Ok(()) => {
                self.metrics.record_response_time(minutes);
                self.metrics.refresh().await;
                Ok(())
            }
            Err(e) => {
                warn!("결정 전송 실패 (재시도 없음): ticket_id={}: {e}", decision.ticket_id);
                Err(e.into())
            }
        }
    }
}
