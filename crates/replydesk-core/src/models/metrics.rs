//! 운영 지표 모델.
//!
//! 서버 집계 응답과 클라이언트 측 병합 스냅샷.
//! `tag_counts`는 동률 정렬 기준이 "먼저 본 순서"라서 IndexMap으로 보관한다.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 서버 집계 응답 (GET /metrics)
///
/// 서버가 함께 계산해 주는 파생 필드(acceptance_rate_percent 등)는
/// 클라이언트가 직접 도출하므로 역직렬화에서 무시한다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsReport {
    /// 서버가 집계한 수락 건수
    pub suggestions_accepted: u64,
    /// 태그별 누적 카운트 (응답 JSON의 키 순서 유지)
    #[serde(default)]
    pub tag_counts: IndexMap<String, u64>,
}

/// 병합된 운영 지표 스냅샷.
///
/// 소유권 규칙:
/// - `suggestions_shown`, `response_times_min` — 클라이언트 권위. 증가/추가만.
/// - `suggestions_accepted`, `tag_counts` — 서버 권위. refresh마다 전체 교체.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// 제안이 화면에 표시된 누적 횟수
    pub suggestions_shown: u64,
    /// 서버가 집계한 수락 건수 (마지막 refresh 값)
    pub suggestions_accepted: u64,
    /// 태그별 누적 카운트 (마지막 refresh 값)
    pub tag_counts: IndexMap<String, u64>,
    /// 확정된 결정의 응답 시간 목록 (분)
    pub response_times_min: Vec<u32>,
}
