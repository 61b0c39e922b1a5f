//! 응답 전송
//!
//! 모든 응답에 요청 ID/트레이스 ID 헤더를 붙이고, 상태 코드와 처리 시간을 로그로 남깁니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, HttpResponseBuilder};
use shared::{ExecOutcome, ResStatus};
use std::time::Instant;
use tracing::info;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// 요청 하나의 응답 정보
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub request_id: String,
    pub trace_id: String,
    started: Instant,
}

impl ResponseMeta {
    pub fn new(request_id: String, trace_id: String) -> Self {
        Self {
            request_id,
            trace_id,
            started: Instant::now(),
        }
    }

    /// 처리 시간 (초, 소수점 9자리)
    pub fn processing_time(&self) -> String {
        format!("{:.9}", self.started.elapsed().as_secs_f64())
    }

    fn builder(&self, status: StatusCode) -> HttpResponseBuilder {
        let mut builder = HttpResponse::build(status);
        builder
            .insert_header((REQUEST_ID_HEADER, self.request_id.as_str()))
            .insert_header((TRACE_ID_HEADER, self.trace_id.as_str()));
        builder
    }
}

pub fn status_code(status: ResStatus) -> StatusCode {
    StatusCode::from_u16(status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// 처리 결과를 `{name, count, data}` 바디로 보냅니다.
pub fn send(outcome: ExecOutcome, meta: &ResponseMeta) -> HttpResponse {
    let (status, envelope) = outcome.into_envelope();
    let body = serde_json::to_string(&envelope).unwrap_or_default();

    info!(
        "Response sended. [Status code: {} Processing time: {} seconds]",
        status.code(),
        meta.processing_time()
    );

    meta.builder(status_code(status))
        .content_type(JSON_CONTENT_TYPE)
        .body(body)
}

/// 바디 없는 200 (루트, favicon, 헬스체크)
pub fn send_empty(meta: &ResponseMeta) -> HttpResponse {
    meta.builder(StatusCode::OK).finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_send_writes_envelope_and_headers() {
        let meta = ResponseMeta::new("req-1".to_string(), "Root=1-abc".to_string());
        let resp = send(ExecOutcome::ok("get_event_tt_event", 1, json!([{"A": 1}])), &meta);

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "req-1");
        assert_eq!(resp.headers().get(TRACE_ID_HEADER).unwrap(), "Root=1-abc");

        let bytes = to_bytes(resp.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({"name": "get_event_tt_event", "count": 1, "data": [{"A": 1}]})
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_code(ResStatus::MethodNotAllowed), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(status_code(ResStatus::UnsupportedMediaType).as_u16(), 415);
    }
}
