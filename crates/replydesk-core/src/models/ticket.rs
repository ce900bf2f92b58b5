//! 티켓 모델.
//!
//! 백엔드에서 시작 시 1회 수신하는 고객 문의 단위. 수신 후 읽기 전용.

use serde::{Deserialize, Serialize};

/// 고객 지원 티켓
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// 티켓 고유 ID (서버 발급, 불변)
    pub ticket_id: String,
    /// 제목
    pub subject: String,
    /// 본문
    pub body: String,
    /// 처리 상태 (서버 관리, 예: "open")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
