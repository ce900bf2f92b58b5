//! 제안 세션 상태 기계.
//!
//! 선택된 티켓 하나에 대한 제안 라이프사이클: Idle → Pending → Ready → Idle.
//! 순수 동기 타입이다. 네트워크 호출과 락 관리는 `flow` 모듈이 담당한다.

use chrono::{DateTime, Utc};
use replydesk_core::models::decision::{Decision, DecisionAction};
use replydesk_core::models::suggestion::Suggestion;
use replydesk_core::models::ticket::Ticket;
use thiserror::Error;

/// 세션 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// 선택 없음 또는 제안 없음
    Idle,
    /// 제안 요청 발신, 응답 대기
    Pending,
    /// 제안 수신 완료, 초안 편집 가능
    Ready,
}

/// 확정 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeKind {
    /// 제안 원문 그대로
    Unchanged,
    /// 초안 수정본으로
    Edited,
}

/// 세션 상태 전이 에러
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// 선택된 티켓 없이 제안 요청
    #[error("선택된 티켓이 없습니다")]
    NoTicketSelected,

    /// 현재 상태에서 허용되지 않는 조작
    #[error("잘못된 상태 전이: {state:?} 상태에서 {op} 불가")]
    InvalidState {
        /// 조작 시점의 세션 상태
        state: SessionState,
        /// 시도한 조작 이름
        op: &'static str,
    },
}

/// 발신된 제안 요청의 식별 정보.
///
/// `seq`는 응답 도착 시점에 세션의 현재 시퀀스와 비교된다.
/// 불일치하면 스테일 응답이므로 폐기해야 한다.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// 요청 시퀀스 (단조 증가)
    pub seq: u64,
    /// 요청 대상 티켓 ID
    pub ticket_id: String,
}

/// 제안 세션 — 선택된 티켓의 제안/초안 소유자
pub struct SuggestionSession {
    state: SessionState,
    selected: Option<Ticket>,
    suggestion: Option<Suggestion>,
    draft: String,
    received_at: Option<DateTime<Utc>>,
    /// 선택 변경과 요청 발신마다 증가. 스테일 응답 판별 기준.
    seq: u64,
}

impl SuggestionSession {
    /// 새 세션 생성 (Idle, 선택 없음)
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            selected: None,
            suggestion: None,
            draft: String::new(),
            received_at: None,
            seq: 0,
        }
    }

    /// 현재 상태
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 현재 선택된 티켓
    pub fn selected(&self) -> Option<&Ticket> {
        self.selected.as_ref()
    }

    /// 수신된 제안 (Ready 상태에서만 Some)
    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    /// 현재 초안 텍스트 (Ready 상태에서만 Some)
    pub fn draft(&self) -> Option<&str> {
        match self.state {
            SessionState::Ready => Some(&self.draft),
            _ => None,
        }
    }

    /// 제안 수신 시각 (Ready 상태에서만 Some)
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    /// 티켓 선택 변경.
    ///
    /// 어느 상태에서든 유효하다. 무조건 Idle로 리셋하고 제안/초안을
    /// 버린다. 시퀀스를 증가시켜 비행 중인 요청의 응답을 무효화한다.
    pub fn select_ticket(&mut self, ticket: Option<Ticket>) {
        self.seq += 1;
        self.state = SessionState::Idle;
        self.selected = ticket;
        self.suggestion = None;
        self.draft.clear();
        self.received_at = None;
    }

    /// 제안 요청 시작.
    ///
    /// 선택이 있는 Idle 상태에서만 유효. Pending으로 전이하고 드라이버가
    /// 응답 도착 시 넘겨줄 요청 식별 정보를 반환한다.
    pub fn begin_request(&mut self) -> Result<PendingRequest, SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::InvalidState {
                state: self.state,
                op: "제안 요청",
            });
        }
        let ticket = self.selected.as_ref().ok_or(SessionError::NoTicketSelected)?;

        self.seq += 1;
        self.state = SessionState::Pending;
        Ok(PendingRequest {
            seq: self.seq,
            ticket_id: ticket.ticket_id.clone(),
        })
    }

    /// 제안 응답 반영.
    ///
    /// `seq`가 현재 시퀀스와 일치하고 아직 Pending일 때만 반영된다.
    /// 반영되면 Ready로 전이하고 초안을 제안 답변으로 초기화한다.
    /// 반환값은 반영 여부 — `false`면 스테일 응답이므로 호출자는
    /// 아무 부수효과도 만들면 안 된다.
    pub fn apply_response(&mut self, seq: u64, suggestion: Suggestion) -> bool {
        if self.state != SessionState::Pending || seq != self.seq {
            return false;
        }

        self.draft = suggestion.reply.clone();
        self.suggestion = Some(suggestion);
        self.received_at = Some(Utc::now());
        self.state = SessionState::Ready;
        true
    }

    /// 제안 요청 실패 처리.
    ///
    /// `seq`가 현재 시퀀스와 일치하는 Pending에서만 Idle로 되돌린다.
    /// 반환값은 처리 여부 (스테일 실패는 무시).
    pub fn fail_request(&mut self, seq: u64) -> bool {
        if self.state != SessionState::Pending || seq != self.seq {
            return false;
        }
        self.state = SessionState::Idle;
        true
    }

    /// 초안 편집. Ready 상태에서만 유효하며 제안 원문은 건드리지 않는다.
    pub fn edit_draft(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::InvalidState {
                state: self.state,
                op: "초안 편집",
            });
        }
        self.draft = text.into();
        Ok(())
    }

    /// 확정: 결정 레코드를 만들고 즉시 Idle로 전이한다.
    ///
    /// Ready 상태에서만 유효. 전이가 전송보다 먼저 일어나므로 같은
    /// Ready 에피소드에서 이중 확정은 불가능하다 (at-most-once).
    /// 전송 실패 시에도 세션은 재무장되지 않는다. 선택은 유지된다.
    pub fn finalize(
        &mut self,
        kind: FinalizeKind,
        response_time_min: u32,
    ) -> Result<Decision, SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::InvalidState {
                state: self.state,
                op: "확정",
            });
        }
        // Ready 불변식: suggestion은 항상 Some
        let suggestion = self.suggestion.take().ok_or(SessionError::InvalidState {
            state: self.state,
            op: "확정",
        })?;

        let (action, final_reply) = match kind {
            FinalizeKind::Unchanged => (DecisionAction::Accepted, suggestion.reply.clone()),
            FinalizeKind::Edited => (DecisionAction::Edited, std::mem::take(&mut self.draft)),
        };

        let decision = Decision {
            ticket_id: suggestion.ticket_id.clone(),
            action,
            tags: suggestion.tags,
            response_time_min,
            final_reply,
        };

        self.state = SessionState::Idle;
        self.draft.clear();
        self.received_at = None;
        Ok(decision)
    }
}

impl Default for SuggestionSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use replydesk_core::models::suggestion::Tag;

    fn ticket(id: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            subject: format!("제목 {id}"),
            body: "본문".to_string(),
            status: Some("open".to_string()),
        }
    }

    fn suggestion(ticket_id: &str, reply: &str) -> Suggestion {
        Suggestion {
            ticket_id: ticket_id.to_string(),
            reply: reply.to_string(),
            explanation: "근거".to_string(),
            confidence: 0.75,
            tags: vec![Tag::Bare("billing".to_string())],
        }
    }

    #[test]
    fn starts_idle() {
        let session = SuggestionSession::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.selected().is_none());
        assert!(session.draft().is_none());
    }

    #[test]
    fn request_without_selection_rejected() {
        let mut session = SuggestionSession::new();
        assert_matches!(session.begin_request(), Err(SessionError::NoTicketSelected));
    }

    #[test]
    fn request_then_response_reaches_ready() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));

        let pending = session.begin_request().unwrap();
        assert_eq!(session.state(), SessionState::Pending);
        assert_eq!(pending.ticket_id, "tkt_001");

        assert!(session.apply_response(pending.seq, suggestion("tkt_001", "안내문")));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.draft(), Some("안내문"));
        assert!(session.received_at().is_some());
    }

    #[test]
    fn request_while_pending_rejected() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));
        session.begin_request().unwrap();

        assert_matches!(
            session.begin_request(),
            Err(SessionError::InvalidState { state: SessionState::Pending, .. })
        );
    }

    #[test]
    fn reselect_always_resets_to_idle() {
        let mut session = SuggestionSession::new();

        // Pending에서 재선택
        session.select_ticket(Some(ticket("tkt_001")));
        session.begin_request().unwrap();
        session.select_ticket(Some(ticket("tkt_002")));
        assert_eq!(session.state(), SessionState::Idle);

        // Ready에서 재선택
        let pending = session.begin_request().unwrap();
        session.apply_response(pending.seq, suggestion("tkt_002", "x"));
        session.select_ticket(Some(ticket("tkt_001")));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.suggestion().is_none());
        assert!(session.draft().is_none());
    }

    #[test]
    fn stale_response_discarded_after_reselect() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));
        let pending = session.begin_request().unwrap();

        // 응답 도착 전에 다른 티켓 선택
        session.select_ticket(Some(ticket("tkt_002")));

        assert!(!session.apply_response(pending.seq, suggestion("tkt_001", "늦은 응답")));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.suggestion().is_none());
        assert_eq!(session.selected().unwrap().ticket_id, "tkt_002");
    }

    #[test]
    fn stale_failure_ignored_after_reselect() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));
        let pending = session.begin_request().unwrap();

        session.select_ticket(Some(ticket("tkt_002")));
        let fresh = session.begin_request().unwrap();

        // 이전 요청의 실패가 새 Pending을 깨면 안 된다
        assert!(!session.fail_request(pending.seq));
        assert_eq!(session.state(), SessionState::Pending);

        assert!(session.fail_request(fresh.seq));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn edit_draft_only_in_ready() {
        let mut session = SuggestionSession::new();
        assert_matches!(
            session.edit_draft("x"),
            Err(SessionError::InvalidState { state: SessionState::Idle, .. })
        );

        session.select_ticket(Some(ticket("tkt_001")));
        let pending = session.begin_request().unwrap();
        session.apply_response(pending.seq, suggestion("tkt_001", "원문"));

        session.edit_draft("수정본").unwrap();
        assert_eq!(session.draft(), Some("수정본"));
        // 제안 원문은 그대로
        assert_eq!(session.suggestion().unwrap().reply, "원문");
    }

    #[test]
    fn finalize_unchanged_uses_original_reply() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));
        let pending = session.begin_request().unwrap();
        session.apply_response(pending.seq, suggestion("tkt_001", "원문"));
        session.edit_draft("버려질 수정본").unwrap();

        let decision = session.finalize(FinalizeKind::Unchanged, 12).unwrap();
        assert_eq!(decision.action, DecisionAction::Accepted);
        assert_eq!(decision.final_reply, "원문");
        assert_eq!(decision.tags, vec![Tag::Bare("billing".to_string())]);
        assert_eq!(decision.response_time_min, 12);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn finalize_edited_uses_draft() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));
        let pending = session.begin_request().unwrap();
        session.apply_response(pending.seq, suggestion("tkt_001", "원문"));
        session.edit_draft("new text").unwrap();

        let decision = session.finalize(FinalizeKind::Edited, 7).unwrap();
        assert_eq!(decision.action, DecisionAction::Edited);
        assert_eq!(decision.final_reply, "new text");
    }

    #[test]
    fn finalize_is_at_most_once() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));
        let pending = session.begin_request().unwrap();
        session.apply_response(pending.seq, suggestion("tkt_001", "원문"));

        session.finalize(FinalizeKind::Unchanged, 5).unwrap();
        assert_matches!(
            session.finalize(FinalizeKind::Unchanged, 5),
            Err(SessionError::InvalidState { state: SessionState::Idle, .. })
        );
    }

    #[test]
    fn finalize_keeps_selection() {
        let mut session = SuggestionSession::new();
        session.select_ticket(Some(ticket("tkt_001")));
        let pending = session.begin_request().unwrap();
        session.apply_response(pending.seq, suggestion("tkt_001", "원문"));
        session.finalize(FinalizeKind::Unchanged, 5).unwrap();

        // 같은 티켓으로 바로 재요청 가능
        assert_eq!(session.selected().unwrap().ticket_id, "tkt_001");
        assert!(session.begin_request().is_ok());
    }
}
