//! 애플리케이션 설정 구조체.
//!
//! 서버 URL, 폴링 주기 등 런타임 설정을 정의한다.
//! `ConfigManager`를 통해 플랫폼별 설정 디렉토리의 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 서버 연결 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 지표 패널 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// 서버 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 트리아지 백엔드 base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// 지표 패널 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// 서버 지표 폴링 주기 (초)
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// 패널에 표시할 상위 태그 개수
    #[serde(default = "default_top_tags_limit")]
    pub top_tags_limit: usize,
}

impl MetricsConfig {
    /// 폴링 주기를 Duration으로 반환
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            top_tags_limit: default_top_tags_limit(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_refresh_interval_secs() -> u64 {
    8
}

fn default_top_tags_limit() -> usize {
    5
}
