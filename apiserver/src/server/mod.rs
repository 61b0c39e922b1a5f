//! HTTP 서버
//!
//! 루트 아래 모든 경로의 GET/POST를 하나의 요청 처리기로 받습니다.

pub mod request_handler;
pub mod response;
pub mod state;

pub use state::AppState;

use actix_cors::Cors;
use actix_web::http::{header, Method};
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use tracing::info;

pub const CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, private";

/// 라우트 설정 (서버와 테스트가 같이 사용)
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .route(web::get().to(request_handler::handle_request))
            .route(web::post().to(request_handler::handle_request))
            .route(web::method(Method::OPTIONS).to(request_handler::preflight))
            .default_service(web::to(request_handler::method_not_allowed)),
    );
}

/// 모든 응답에 붙는 공통 헤더
pub fn default_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CACHE_CONTROL, CACHE_CONTROL))
        .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::COOKIE,
        ])
        .supports_credentials()
        .max_age(3600)
}

/// 서버를 실행하고 종료될 때까지 기다립니다.
pub async fn run_server(state: AppState) -> Result<()> {
    let port = state.config.port;
    let env = state.config.env.clone().unwrap_or_default();
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .wrap(default_headers())
            .wrap(cors())
            .configure(configure_routes)
    })
    .bind(("0.0.0.0", port))
    .with_context(|| format!("Failed to bind port {}", port))?;

    info!(
        "API server is started. [Exec env: {} Listening port: {}]",
        env, port
    );

    server.run().await.context("API server failed")
}
