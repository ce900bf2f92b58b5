//! 트리아지 백엔드 포트.
//!
//! 구현: `replydesk-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::decision::Decision;
use crate::models::metrics::MetricsReport;
use crate::models::suggestion::Suggestion;
use crate::models::ticket::Ticket;

/// 트리아지 백엔드 클라이언트
#[async_trait]
pub trait TriageApi: Send + Sync {
    /// 전체 티켓 목록 조회
    ///
    /// 클라이언트 시작 시 1회 호출한다.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, CoreError>;

    /// 티켓에 대한 AI 답변 제안 생성
    async fn generate_suggestion(&self, ticket_id: &str) -> Result<Suggestion, CoreError>;

    /// 확정된 처리 결정 기록
    ///
    /// 결정은 Ready 에피소드당 최대 1회만 전송된다. 실패해도 재전송하지 않는다.
    async fn record_decision(&self, decision: &Decision) -> Result<(), CoreError>;

    /// 서버 집계 지표 조회
    ///
    /// `total_shown`은 클라이언트가 집계한 표시 횟수. 서버가 수락률을
    /// 자체 계산할 수 있도록 함께 보낸다.
    async fn get_metrics(&self, total_shown: u64) -> Result<MetricsReport, CoreError>;
}
