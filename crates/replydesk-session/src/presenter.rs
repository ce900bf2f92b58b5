//! 제안/지표 프레젠터.
//!
//! Suggestion → UI 표시용 데이터 변환. 태그 형태 정규화는 여기서만
//! 일어난다 (저장 계층은 수신 형태를 그대로 보존).

use chrono::{DateTime, Utc};
use replydesk_core::models::suggestion::Suggestion;
use replydesk_metrics::MetricsAggregator;

/// UI 표시용 제안 데이터
#[derive(Debug, Clone)]
pub struct SuggestionView {
    /// 대상 티켓 ID
    pub ticket_id: String,
    /// 제안 답변 본문
    pub reply: String,
    /// 제안 근거 설명
    pub explanation: String,
    /// 신뢰도 텍스트
    pub confidence_text: String,
    /// 정규화된 태그 라벨 목록
    pub tag_labels: Vec<String>,
    /// 수신 시각 텍스트 (상대)
    pub time_text: String,
}

/// Suggestion → SuggestionView 변환
pub fn present(suggestion: &Suggestion, received_at: DateTime<Utc>) -> SuggestionView {
    SuggestionView {
        ticket_id: suggestion.ticket_id.clone(),
        reply: suggestion.reply.clone(),
        explanation: suggestion.explanation.clone(),
        confidence_text: format!("{:.0}%", suggestion.confidence * 100.0),
        tag_labels: suggestion.tags.iter().map(|t| t.label().to_string()).collect(),
        time_text: format_relative_time(received_at),
    }
}

/// 지표 패널 표시용 데이터
#[derive(Debug, Clone)]
pub struct MetricsPanelView {
    /// 표시된 제안 수
    pub suggestions_shown: u64,
    /// 수락률 텍스트
    pub acceptance_rate_text: String,
    /// 평균 응답 시간 텍스트
    pub avg_response_text: String,
    /// 상위 태그 라벨 (카운트 포함)
    pub top_tags: Vec<String>,
}

/// 지표 스냅샷 → 패널 뷰 변환
pub fn present_metrics(aggregator: &MetricsAggregator, limit: usize) -> MetricsPanelView {
    let snapshot = aggregator.snapshot();
    MetricsPanelView {
        suggestions_shown: snapshot.suggestions_shown,
        acceptance_rate_text: format!("{}%", aggregator.acceptance_rate()),
        avg_response_text: format!("{}분", aggregator.average_response_time()),
        top_tags: aggregator
            .top_tags(limit)
            .into_iter()
            .map(|(tag, count)| format!("{tag} ({count})"))
            .collect(),
    }
}

fn format_relative_time(dt: DateTime<Utc>) -> String {
    let diff = Utc::now() - dt;

    if diff.num_seconds() < 60 {
        "방금 전".to_string()
    } else if diff.num_minutes() < 60 {
        format!("{}분 전", diff.num_minutes())
    } else {
        format!("{}시간 전", diff.num_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replydesk_core::models::suggestion::Tag;

    fn make_suggestion() -> Suggestion {
        Suggestion {
            ticket_id: "tkt_001".to_string(),
            reply: "확인 중입니다.".to_string(),
            explanation: "샘플 제안".to_string(),
            confidence: 0.75,
            tags: vec![
                Tag::Labeled { tag: "support".to_string(), score: Some(0.9) },
                Tag::Bare("billing".to_string()),
            ],
        }
    }

    #[test]
    fn present_suggestion() {
        let view = present(&make_suggestion(), Utc::now());
        assert_eq!(view.ticket_id, "tkt_001");
        assert_eq!(view.confidence_text, "75%");
        assert_eq!(view.time_text, "방금 전");
    }

    #[test]
    fn both_tag_shapes_normalized() {
        let view = present(&make_suggestion(), Utc::now());
        assert_eq!(view.tag_labels, vec!["support", "billing"]);
    }

    #[test]
    fn relative_time_minutes() {
        let earlier = Utc::now() - chrono::Duration::minutes(12);
        assert_eq!(format_relative_time(earlier), "12분 전");
    }
}
