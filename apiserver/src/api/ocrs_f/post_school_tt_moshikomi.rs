//! 신청/신청 상세 일괄 등록 (SCHOOLDB)
//!
//! 바디는 객체 배열입니다. 모든 행을 먼저 검사하고, 통과하면 행마다 프로시저 호출 한 건을
//! 만들어 하나의 트랜잭션으로 실행합니다.

use crate::api::{validated_rows, HandlerContext};
use futures::future::BoxFuture;
use serde_json::Value;
use shared::service::db::ParamSpec;
use shared::service::normalizer::handle_sql_result;
use shared::validation::{ParamRules, ParamType};
use shared::{ExecOutcome, SqlTemplate, TransactionUnit};

pub const NAME: &str = "post_school_tt_moshikomi";
pub const PATH: &str = "api/ocrs_f/post_school_tt_moshikomi";

const SQL: &str = "
CALL SP_INSERT_SCHOOLDB_TT_MOSHIKOMI(
      @EVENT_ID
    , @GMS_KOKYAKU_ID
    , @KOSHIN_ID
)
";

const PARAMS: &[ParamSpec] = &[
    ParamSpec::varchar("EVENT_ID"),
    ParamSpec::varchar("GMS_KOKYAKU_ID"),
    ParamSpec::varchar("KOSHIN_ID"),
];

pub const TEMPLATE: SqlTemplate = SqlTemplate::new(SQL, PARAMS);

const KEYS: &[&str] = &["event_id", "gms_kokyaku_id", "koshin_id"];

pub const RULES: ParamRules = ParamRules::allow(KEYS)
    .required(KEYS)
    .types(&[
        ("event_id", ParamType::String),
        ("gms_kokyaku_id", ParamType::String),
        ("koshin_id", ParamType::String),
    ])
    .sizes(&[("event_id", 12), ("gms_kokyaku_id", 10), ("koshin_id", 30)]);

pub async fn handle(ctx: &HandlerContext, body: Value) -> ExecOutcome {
    let rows = match validated_rows(body, &RULES) {
        Ok(rows) => rows,
        Err(outcome) => return outcome,
    };

    let unit = TransactionUnit::new(rows.iter().map(|row| TEMPLATE.build(row)).collect());
    handle_sql_result(NAME, ctx.db.execute_transaction(&unit).await)
}

pub fn route(ctx: &HandlerContext, body: Value) -> BoxFuture<'_, ExecOutcome> {
    Box::pin(handle(ctx, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::RequestParams;

    fn row(event_id: &str, koshin_id: &str) -> Value {
        json!({"event_id": event_id, "gms_kokyaku_id": "0123456789", "koshin_id": koshin_id})
    }

    #[test]
    fn test_one_statement_per_row() {
        let rows = RequestParams::list_from_body(json!([row("E-1", "a"), row("E-2", "b")])).unwrap();
        assert!(RULES.check_each(&rows).is_ok());

        let statements: Vec<_> = rows.iter().map(|r| TEMPLATE.build(r)).collect();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].params()[0].value, json!("E-2"));
        assert_eq!(
            statements[0].sql_for_log(),
            "CALL SP_INSERT_SCHOOLDB_TT_MOSHIKOMI( @EVENT_ID , @GMS_KOKYAKU_ID , @KOSHIN_ID )"
        );
    }

    #[test]
    fn test_invalid_row_fails_whole_batch() {
        let body = json!([row("E-1", "a"), row("E-2", &"k".repeat(31)), row("E-3", "c")]);
        let outcome = validated_rows(body, &RULES).unwrap_err();
        assert_eq!(outcome.data["message_code"], "400_0006");
        let detail = outcome.data["message_detail"].as_str().unwrap();
        assert!(detail.starts_with("rows[1]: "));
        assert!(detail.contains("koshin_id"));
    }
}
