//! # replydesk-network
//!
//! 트리아지 백엔드 HTTP 어댑터. `TriageApi` 포트의 reqwest 구현을 제공한다.

pub mod http_client;

pub use http_client::HttpTriageClient;
