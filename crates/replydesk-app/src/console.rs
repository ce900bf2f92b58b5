//! 라인 기반 상담 콘솔.
//!
//! 브라우저 프런트엔드가 붙기 전까지의 최소 프레젠테이션 계층.
//! 세션/지표 조작은 전부 `TriageFlow`/프레젠터를 거친다.

use anyhow::Result;
use replydesk_session::presenter;
use replydesk_session::{FinalizeKind, TicketCatalog, TriageFlow};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::debug;

/// 상담 콘솔 — stdin 명령 루프
pub struct Console {
    catalog: TicketCatalog,
    flow: Arc<TriageFlow>,
    top_tags_limit: usize,
}

impl Console {
    /// 새 콘솔 생성
    pub fn new(catalog: TicketCatalog, flow: Arc<TriageFlow>, top_tags_limit: usize) -> Self {
        Self {
            catalog,
            flow,
            top_tags_limit,
        }
    }

    /// 명령 루프 시작. stdin EOF, `quit`, 또는 종료 신호에서 반환한다.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("REPLYDESK 상담 콘솔 — 명령: tickets, select <id>, suggest, edit <text>, accept, send, metrics, quit");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("stdin EOF");
                        break;
                    };
                    if !self.handle(line.trim()).await {
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// 명령 한 줄 처리. `false`를 반환하면 루프 종료.
    async fn handle(&self, line: &str) -> bool {
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "tickets" => {
                if self.catalog.is_empty() {
                    println!("티켓 없음");
                }
                for ticket in self.catalog.tickets() {
                    println!("{}  {}", ticket.ticket_id, ticket.subject);
                }
            }
            "select" => match self.catalog.get(rest) {
                Some(ticket) => {
                    self.flow.select_ticket(Some(ticket.clone())).await;
                    println!("선택: {} — {}", ticket.ticket_id, ticket.subject);
                }
                None => println!("티켓 미발견: {rest}"),
            },
            "suggest" => match self.flow.request_suggestion().await {
                Ok(true) => {
                    if let Some(view) = self.flow.suggestion_view().await {
                        println!("제안 (신뢰도 {}):", view.confidence_text);
                        println!("  {}", view.reply);
                        println!("  근거: {}", view.explanation);
                        println!("  태그: {}", view.tag_labels.join(", "));
                    }
                }
                Ok(false) => println!("응답이 폐기되었습니다 (선택 변경)"),
                Err(e) => println!("제안 요청 실패: {e}"),
            },
            "edit" => match self.flow.edit_draft(rest).await {
                Ok(()) => println!("초안 갱신"),
                Err(e) => println!("편집 불가: {e}"),
            },
            "accept" => match self.flow.finalize(FinalizeKind::Unchanged).await {
                Ok(()) => println!("수락 기록 완료"),
                Err(e) => println!("확정 실패: {e}"),
            },
            "send" => match self.flow.finalize(FinalizeKind::Edited).await {
                Ok(()) => println!("수정본 기록 완료"),
                Err(e) => println!("확정 실패: {e}"),
            },
            "metrics" => {
                let panel = presenter::present_metrics(self.flow.metrics(), self.top_tags_limit);
                println!("표시 {}건 / 수락률 {}", panel.suggestions_shown, panel.acceptance_rate_text);
                println!("평균 응답 {}", panel.avg_response_text);
                if !panel.top_tags.is_empty() {
                    println!("상위 태그: {}", panel.top_tags.join(", "));
                }
            }
            "quit" | "exit" => return false,
            _ => println!("알 수 없는 명령: {command}"),
        }

        true
    }
}
