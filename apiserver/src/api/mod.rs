//! API 엔드포인트
//!
//! 경로 → 핸들러 테이블은 시작할 때 한 번 만들어지고 이후에는 읽기 전용입니다.
//! 모든 핸들러는 같은 모양(검증 → 문장 조립 → 실행 → 정규화)을 따르며
//! 어떤 경우에도 [`ExecOutcome`]을 돌려줍니다.

pub mod ocrs_f;

use crate::client::MyPageClient;
use futures::future::BoxFuture;
use serde_json::Value;
use shared::validation::ParamRules;
use shared::{ExecOutcome, RequestParams, SqlExecutor};
use std::collections::HashMap;
use std::sync::Arc;

/// 핸들러가 사용하는 외부 자원
#[derive(Clone)]
pub struct HandlerContext {
    pub db: Arc<dyn SqlExecutor>,
    pub mypage: Arc<dyn MyPageClient>,
}

impl HandlerContext {
    pub fn new(db: Arc<dyn SqlExecutor>, mypage: Arc<dyn MyPageClient>) -> Self {
        Self { db, mypage }
    }
}

/// 엔드포인트 핸들러 (요청 바디를 받아 처리 결과를 돌려줌)
pub type HandlerFn = for<'a> fn(&'a HandlerContext, Value) -> BoxFuture<'a, ExecOutcome>;

/// 라우트 테이블
#[derive(Default)]
pub struct Registry {
    routes: HashMap<&'static str, HandlerFn>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 전체 엔드포인트를 등록한 테이블
    pub fn with_default_routes() -> Self {
        let mut registry = Self::new();
        ocrs_f::register(&mut registry);
        registry
    }

    pub fn register(&mut self, path: &'static str, handler: HandlerFn) {
        self.routes.insert(path, handler);
    }

    pub fn get(&self, path: &str) -> Option<HandlerFn> {
        self.routes.get(path).copied()
    }

    pub fn paths(&self) -> Vec<&'static str> {
        let mut paths: Vec<&'static str> = self.routes.keys().copied().collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// 객체 바디를 파라미터로 바꾸고 규칙을 검사합니다. 실패하면 400 응답.
pub fn validated(body: Value, rules: &ParamRules) -> Result<RequestParams, ExecOutcome> {
    let params = RequestParams::from_body(body).map_err(ExecOutcome::bad_request)?;
    rules.check(&params).map_err(ExecOutcome::bad_request)?;
    Ok(params)
}

/// 배열 바디의 모든 행을 검사합니다. 한 행이라도 실패하면 전체가 400.
pub fn validated_rows(body: Value, rules: &ParamRules) -> Result<Vec<RequestParams>, ExecOutcome> {
    let rows = RequestParams::list_from_body(body).map_err(ExecOutcome::bad_request)?;
    rules.check_each(&rows).map_err(ExecOutcome::bad_request)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::validation::ParamType;
    use shared::ResStatus;

    const RULES: ParamRules = ParamRules::allow(&["event_id"])
        .required(&["event_id"])
        .types(&[("event_id", ParamType::String)]);

    #[test]
    fn test_default_routes() {
        let registry = Registry::with_default_routes();
        assert_eq!(
            registry.paths(),
            vec![
                "api/ocrs_f/get_event_tt_event",
                "api/ocrs_f/get_event_tt_yoyaku_moshikomi",
                "api/ocrs_f/patch_tt_event",
                "api/ocrs_f/patch_tt_yoyaku_moshikomi",
                "api/ocrs_f/post_kamoku_reserve_status",
                "api/ocrs_f/post_school_tt_moshikomi",
            ]
        );
        assert!(registry.get("api/ocrs_f/unknown").is_none());
    }

    #[test]
    fn test_validated_rejects_non_object() {
        let outcome = validated(json!(["E-0001"]), &RULES).unwrap_err();
        assert_eq!(outcome.status, ResStatus::BadRequest);
        assert_eq!(outcome.data["message_code"], "400_0008");
    }

    #[test]
    fn test_validated_rows_requires_array() {
        let outcome = validated_rows(json!({"event_id": "E"}), &RULES).unwrap_err();
        assert_eq!(outcome.data["message_code"], "400_0004");

        let rows = validated_rows(json!([{"event_id": "A"}, {"event_id": "B"}]), &RULES).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
