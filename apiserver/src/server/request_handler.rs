//! 요청 처리
//!
//! 모든 API 요청은 같은 순서로 처리됩니다:
//! 루트/favicon/헬스체크 → JSON 파싱 → 인증 → 라우트 테이블 조회 → 핸들러 실행 → 응답 전송.

use super::response::{send, send_empty, ResponseMeta};
use super::state::AppState;
use crate::auth::authenticate;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::{json, Value};
use shared::config::AppConfig;
use shared::logging::with_trace_id;
use shared::tool::messages::{INVALID_JSON, METHOD_NOT_ALLOWED, URL_NOT_FOUND};
use shared::{ExecOutcome, ResStatus};
use tracing::{error, info, warn};
use uuid::Uuid;

const AMZN_TRACE_ID_HEADER: &str = "X-Amzn-Trace-Id";

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

fn response_meta(req: &HttpRequest) -> ResponseMeta {
    let trace_id = header_value(req, AMZN_TRACE_ID_HEADER)
        .unwrap_or_default()
        .to_string();
    ResponseMeta::new(Uuid::new_v4().to_string(), trace_id)
}

fn accepted_line(req: &HttpRequest) -> String {
    let connection = req.connection_info();
    format!(
        "Request accepted. [Method: {} URL: {} User-Agent: {} Client-IP: {} x-forwarded-for: {}]",
        req.method(),
        req.uri(),
        header_value(req, header::USER_AGENT.as_str()).unwrap_or("undefined"),
        connection.peer_addr().unwrap_or("undefined"),
        header_value(req, "x-forwarded-for").unwrap_or("undefined"),
    )
}

/// 상태 코드만 돌려주는 경로 (루트 경로 자체, 루트 아래 favicon, 헬스체크)
fn is_bare_path(config: &AppConfig, path: &str) -> bool {
    if path == config.health_check_path {
        return true;
    }
    match path.strip_prefix(config.root_path.as_str()) {
        Some(rest) => matches!(rest, "" | "/" | "/favicon.ico"),
        None => false,
    }
}

/// 요청 바디 파싱. 비어 있으면 `{}`.
pub fn parse_body(body: &[u8]) -> Result<Value, ExecOutcome> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(json!({}));
    }
    serde_json::from_slice(body).map_err(|e| {
        error!("Error occurred. Invalid JSON. : {}", e);
        ExecOutcome::error(ResStatus::BadRequest, INVALID_JSON.plain())
    })
}

async fn process(req: &HttpRequest, body: &[u8], state: &AppState, meta: &ResponseMeta) -> HttpResponse {
    let path = req.path();

    if is_bare_path(&state.config, path) {
        info!("{} Response sended [Status code: 200]", accepted_line(req));
        return send_empty(meta);
    }
    info!("{}", accepted_line(req));

    let body = match parse_body(body) {
        Ok(body) => body,
        Err(outcome) => return send(outcome, meta),
    };

    let authorization = header_value(req, header::AUTHORIZATION.as_str());
    if let Err(outcome) = authenticate(authorization, &state.config, Utc::now()) {
        return send(outcome, meta);
    }

    let key = state.config.route_key(path);
    let outcome = match state.registry.get(key) {
        Some(handler) => handler(&state.context, body).await,
        None => {
            warn!("No handler for requested path. [Path: {}]", path);
            ExecOutcome::error(ResStatus::NotFound, URL_NOT_FOUND.render(&[path]))
        }
    };

    send(outcome, meta)
}

/// GET/POST 공통 처리
pub async fn handle_request(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let meta = response_meta(&req);
    let trace_id = meta.trace_id.clone();

    with_trace_id(trace_id, async {
        process(&req, &body, state.get_ref(), &meta).await
    })
    .await
}

/// OPTIONS (프리플라이트)
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// 처리 대상이 아닌 메서드
pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    let meta = response_meta(&req);
    let trace_id = meta.trace_id.clone();

    with_trace_id(trace_id, async {
        info!("{}", accepted_line(&req));
        warn!("Requested method is not a processing target.");
        let method = req.method().to_string();
        send(
            ExecOutcome::error(
                ResStatus::MethodNotAllowed,
                METHOD_NOT_ALLOWED.render(&[&method]),
            ),
            &meta,
        )
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_empty_is_object() {
        assert_eq!(parse_body(b"").unwrap(), json!({}));
        assert_eq!(parse_body(b" \n").unwrap(), json!({}));
    }

    #[test]
    fn test_parse_body_invalid_json() {
        let outcome = parse_body(b"{\"event_id\": ").unwrap_err();
        assert_eq!(outcome.status, ResStatus::BadRequest);
        assert_eq!(outcome.data["message_code"], "400_0008");
    }

    fn config(root_path: &str) -> AppConfig {
        AppConfig {
            port: 3000,
            root_path: root_path.to_string(),
            health_check_path: "/health".to_string(),
            app_key: "app".to_string(),
            secret_key: "secret".to_string(),
            mypage_url: String::new(),
            mypage_authorization_key: String::new(),
            env: None,
        }
    }

    #[test]
    fn test_bare_paths_follow_root_path() {
        let cfg = config("/ocrs");
        assert!(is_bare_path(&cfg, "/ocrs"));
        assert!(is_bare_path(&cfg, "/ocrs/"));
        assert!(is_bare_path(&cfg, "/ocrs/favicon.ico"));
        assert!(is_bare_path(&cfg, "/health"));

        assert!(!is_bare_path(&cfg, "/"));
        assert!(!is_bare_path(&cfg, "/favicon.ico"));
        assert!(!is_bare_path(&cfg, "/ocrs/api/ocrs_f/get_event_tt_event"));
    }

    #[test]
    fn test_bare_paths_without_root_path() {
        let cfg = config("");
        assert!(is_bare_path(&cfg, "/"));
        assert!(is_bare_path(&cfg, "/favicon.ico"));
        assert!(!is_bare_path(&cfg, "/api/ocrs_f/get_event_tt_event"));
    }

    #[test]
    fn test_parse_body_keeps_arrays() {
        assert_eq!(parse_body(b"[{\"a\":1}]").unwrap(), json!([{"a": 1}]));
    }
}
