//! API Server Library Module
//!
//! 폼 검증 기반 SQL API 서버. 테스트와 바이너리가 같은 모듈을 사용합니다.

pub mod api;
pub mod auth;
pub mod client;
pub mod server;

pub use api::{HandlerContext, Registry};
pub use server::{configure_routes, run_server, AppState};
