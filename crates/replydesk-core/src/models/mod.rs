//! 도메인 데이터 모델.

pub mod decision;
pub mod metrics;
pub mod suggestion;
pub mod ticket;
