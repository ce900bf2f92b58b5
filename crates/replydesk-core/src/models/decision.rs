//! 처리 결정 모델.
//!
//! 상담원이 제안을 수락/수정 확정할 때 서버로 1회 전송하는 불변 기록.

use serde::{Deserialize, Serialize};

use super::suggestion::Tag;

/// 결정 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionAction {
    /// 제안 원문 그대로 수락
    Accepted,
    /// 초안을 수정해서 확정
    Edited,
}

/// 확정된 처리 결정 (POST /accept 요청 본문)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// 대상 티켓 ID
    pub ticket_id: String,
    /// 결정 종류
    pub action: DecisionAction,
    /// 제안에서 그대로 넘겨받은 태그 (원형 유지)
    pub tags: Vec<Tag>,
    /// 응답 소요 시간 (분, 확정 시점에 1회 생성)
    pub response_time_min: u32,
    /// 최종 답변 텍스트
    pub final_reply: String,
}
