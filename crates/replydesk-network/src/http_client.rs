//! HTTP REST API 클라이언트.
//!
//! `TriageApi` 포트 구현. 상태 코드별 에러 매핑.

use async_trait::async_trait;
use replydesk_core::error::CoreError;
use replydesk_core::models::decision::Decision;
use replydesk_core::models::metrics::MetricsReport;
use replydesk_core::models::suggestion::Suggestion;
use replydesk_core::models::ticket::Ticket;
use replydesk_core::ports::api_client::TriageApi;
use std::time::Duration;
use tracing::{debug, warn};

/// REST API 클라이언트 — `TriageApi` 포트 구현
pub struct HttpTriageClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTriageClient {
    /// 새 HTTP 클라이언트 생성
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });

        match status.as_u16() {
            404 => Err(CoreError::NotFound {
                resource_type: "API".to_string(),
                id: text,
            }),
            503 => Err(CoreError::ServiceUnavailable(text)),
            _ => Err(CoreError::Internal(format!("API 에러 ({status}): {text}"))),
        }
    }
}

#[async_trait]
impl TriageApi for HttpTriageClient {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, CoreError> {
        debug!("티켓 목록 요청");

        let resp = self
            .client
            .get(self.url("/tickets"))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("티켓 목록 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let tickets: Vec<Ticket> = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("티켓 목록 파싱 실패: {e}")))?;

        debug!("티켓 {}건 수신", tickets.len());
        Ok(tickets)
    }

    async fn generate_suggestion(&self, ticket_id: &str) -> Result<Suggestion, CoreError> {
        debug!("제안 생성 요청: ticket_id={ticket_id}");

        let body = serde_json::json!({ "ticket_id": ticket_id });
        let resp = self
            .client
            .post(self.url("/suggest"))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("제안 생성 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let suggestion: Suggestion = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("제안 응답 파싱 실패: {e}")))?;

        debug!(
            "제안 수신: ticket_id={} confidence={:.2}",
            suggestion.ticket_id, suggestion.confidence
        );
        Ok(suggestion)
    }

    async fn record_decision(&self, decision: &Decision) -> Result<(), CoreError> {
        debug!(
            "결정 기록: ticket_id={} action={:?}",
            decision.ticket_id, decision.action
        );

        let resp = self
            .client
            .post(self.url("/accept"))
            .json(decision)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("결정 기록 요청 실패: {e}")))?;

        self.check_response(resp).await?;
        debug!("결정 기록 성공");
        Ok(())
    }

    async fn get_metrics(&self, total_shown: u64) -> Result<MetricsReport, CoreError> {
        debug!("지표 조회: total_shown={total_shown}");

        let resp = self
            .client
            .get(self.url("/metrics"))
            .query(&[("total_shown", total_shown)])
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("지표 조회 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let report: MetricsReport = resp
            .json()
            .await
            .map_err(|e| CoreError::Internal(format!("지표 응답 파싱 실패: {e}")))?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replydesk_core::models::decision::DecisionAction;
    use replydesk_core::models::suggestion::Tag;

    fn make_client(server: &mockito::ServerGuard) -> HttpTriageClient {
        HttpTriageClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client =
            HttpTriageClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[tokio::test]
    async fn list_tickets_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tickets")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"ticket_id":"tkt_001","subject":"Internet not working","body":"...","status":"open"}]"#,
            )
            .create_async()
            .await;

        let client = make_client(&server);
        let tickets = client.list_tickets().await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].ticket_id, "tkt_001");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_suggestion_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/suggest")
            .match_body(mockito::Matcher::JsonString(
                r#"{"ticket_id":"tkt_001"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ticket_id":"tkt_001","suggestion":"Hi","explanation":"e","confidence":0.75,"tags":[{"tag":"support","score":0.9},"billing"]}"#,
            )
            .create_async()
            .await;

        let client = make_client(&server);
        let suggestion = client.generate_suggestion("tkt_001").await.unwrap();
        assert_eq!(suggestion.reply, "Hi");
        assert_eq!(suggestion.tags[1], Tag::Bare("billing".to_string()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_suggestion_unknown_ticket_404() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/suggest")
            .with_status(404)
            .with_body(r#"{"error": "Ticket not found"}"#)
            .create_async()
            .await;

        let client = make_client(&server);
        let result = client.generate_suggestion("tkt_999").await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn record_decision_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/accept")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"ticket_id":"tkt_001","action":"accepted","response_time_min":12}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"ok": true}"#)
            .create_async()
            .await;

        let decision = Decision {
            ticket_id: "tkt_001".to_string(),
            action: DecisionAction::Accepted,
            tags: vec![Tag::Bare("billing".to_string())],
            response_time_min: 12,
            final_reply: "Hi".to_string(),
        };

        let client = make_client(&server);
        client.record_decision(&decision).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn record_decision_server_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/accept")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let decision = Decision {
            ticket_id: "tkt_001".to_string(),
            action: DecisionAction::Edited,
            tags: vec![],
            response_time_min: 5,
            final_reply: "x".to_string(),
        };

        let client = make_client(&server);
        let result = client.record_decision(&decision).await;
        assert!(matches!(result, Err(CoreError::ServiceUnavailable(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_metrics_sends_total_shown() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/metrics")
            .match_query(mockito::Matcher::UrlEncoded(
                "total_shown".to_string(),
                "10".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"suggestions_accepted":3,"tag_counts":{"billing":5,"bug":5,"ui":2}}"#)
            .create_async()
            .await;

        let client = make_client(&server);
        let report = client.get_metrics(10).await.unwrap();
        assert_eq!(report.suggestions_accepted, 3);
        let keys: Vec<&str> = report.tag_counts.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["billing", "bug", "ui"]);
        mock.assert_async().await;
    }
}
