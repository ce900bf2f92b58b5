//! 제안 모델.
//!
//! 백엔드가 티켓별로 생성하는 답변 제안과 분류 태그 구조체.

use serde::{Deserialize, Serialize};

/// 분류 태그.
///
/// 서버가 두 형태를 혼용해서 보낸다: `"billing"` 같은 맨 라벨, 또는
/// `{"tag": "billing", "score": 0.4}` 레코드. 수신 형태 그대로 보관해서
/// 서버로 되돌릴 때 원형이 유지되어야 한다. 정규화는 표시 시점에만.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    /// 맨 라벨 형태
    Bare(String),
    /// 라벨 레코드 형태
    Labeled {
        /// 태그 라벨
        tag: String,
        /// 분류 신뢰도 (서버 선택 제공)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
    },
}

impl Tag {
    /// 표시용 라벨
    pub fn label(&self) -> &str {
        match self {
            Tag::Bare(label) => label,
            Tag::Labeled { tag, .. } => tag,
        }
    }
}

/// AI 답변 제안 (POST /suggest 응답)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// 대상 티켓 ID
    pub ticket_id: String,
    /// 제안 답변 텍스트
    #[serde(rename = "suggestion")]
    pub reply: String,
    /// 제안 근거 설명
    pub explanation: String,
    /// AI 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
    /// 분류 태그 목록 (수신 순서 유지)
    #[serde(default)]
    pub tags: Vec<Tag>,
}
