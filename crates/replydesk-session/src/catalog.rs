//! 티켓 카탈로그.
//!
//! 시작 시 1회 로드, 이후 읽기 전용. 로드 실패는 빈 목록으로 처리해서
//! 콘솔의 나머지 기능이 계속 동작하게 한다.

use replydesk_core::models::ticket::Ticket;
use replydesk_core::ports::api_client::TriageApi;
use tracing::{info, warn};

/// 티켓 카탈로그 — 로드 이후 불변
pub struct TicketCatalog {
    tickets: Vec<Ticket>,
}

impl TicketCatalog {
    /// 빈 카탈로그 생성
    pub fn empty() -> Self {
        Self { tickets: Vec::new() }
    }

    /// 백엔드에서 전체 티켓 로드
    ///
    /// 실패 시 경고만 남기고 빈 카탈로그를 반환한다 (비차단).
    pub async fn load(api: &dyn TriageApi) -> Self {
        match api.list_tickets().await {
            Ok(tickets) => {
                info!("티켓 카탈로그 로드: {}건", tickets.len());
                Self { tickets }
            }
            Err(e) => {
                warn!("티켓 카탈로그 로드 실패, 빈 목록으로 시작: {e}");
                Self::empty()
            }
        }
    }

    /// 전체 티켓 목록
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// ID로 티켓 조회
    pub fn get(&self, ticket_id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.ticket_id == ticket_id)
    }

    /// 티켓 수
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}
