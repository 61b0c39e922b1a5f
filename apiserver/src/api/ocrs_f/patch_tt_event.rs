//! 이벤트 예약 기한/설문 URL 갱신

use crate::api::{validated, HandlerContext};
use futures::future::BoxFuture;
use serde_json::Value;
use shared::service::db::ParamSpec;
use shared::service::normalizer::handle_sql_result;
use shared::validation::{ParamRules, ParamType};
use shared::{ExecOutcome, SqlTemplate};

pub const NAME: &str = "patch_tt_event";
pub const PATH: &str = "api/ocrs_f/patch_tt_event";

const SQL: &str = "
UPDATE `TT_EVENT`
SET
   `YOYAKU_KIGEN` = @YOYAKU_KIGEN
  ,`QUALTRICS_URL` = @QUALTRICS_URL
WHERE `EVENT_ID` = @EVENT_ID
";

const PARAMS: &[ParamSpec] = &[
    ParamSpec::varchar("EVENT_ID"),
    ParamSpec::varchar("YOYAKU_KIGEN"),
    ParamSpec::varchar("QUALTRICS_URL"),
    ParamSpec::varchar("KOSHIN_ID"),
];

pub const TEMPLATE: SqlTemplate = SqlTemplate::new(SQL, PARAMS);

const KEYS: &[&str] = &["event_id", "yoyaku_kigen", "qualtrics_url", "koshin_id"];

pub const RULES: ParamRules = ParamRules::allow(KEYS)
    .required(KEYS)
    .types(&[
        ("event_id", ParamType::String),
        ("yoyaku_kigen", ParamType::String),
        ("qualtrics_url", ParamType::String),
        ("koshin_id", ParamType::String),
    ])
    .sizes(&[("event_id", 12), ("qualtrics_url", 244), ("koshin_id", 30)]);

pub async fn handle(ctx: &HandlerContext, body: Value) -> ExecOutcome {
    let request = match validated(body, &RULES) {
        Ok(request) => request,
        Err(outcome) => return outcome,
    };

    let statement = TEMPLATE.build(&request);
    handle_sql_result(NAME, ctx.db.execute(&statement).await)
}

pub fn route(ctx: &HandlerContext, body: Value) -> BoxFuture<'_, ExecOutcome> {
    Box::pin(handle(ctx, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::RequestParams;

    fn body() -> Value {
        json!({
            "event_id": "E-0001",
            "yoyaku_kigen": "2025-09-30T00:00:00.000Z",
            "qualtrics_url": "https://example.qualtrics.com/jfe/form/SV_1",
            "koshin_id": "admin"
        })
    }

    #[test]
    fn test_bindings_follow_placeholder_order() {
        let request = RequestParams::from_body(body()).unwrap();
        assert!(RULES.check(&request).is_ok());

        let statement = TEMPLATE.build(&request);
        let names: Vec<&str> = statement.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["EVENT_ID", "YOYAKU_KIGEN", "QUALTRICS_URL", "KOSHIN_ID"]);

        let compiled = statement.compile();
        let bound: Vec<&str> = compiled.bindings.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(bound, vec!["YOYAKU_KIGEN", "QUALTRICS_URL", "EVENT_ID"]);
    }

    #[test]
    fn test_oversized_url_rejected() {
        let mut body = body();
        body["qualtrics_url"] = json!("x".repeat(245));
        let request = RequestParams::from_body(body).unwrap();
        let msg = RULES.check(&request).unwrap_err();
        assert_eq!(msg.message_code, "400_0006");
        assert!(msg.message_detail.contains("qualtrics_url"));
    }
}
