//! 이벤트 목록 조회
//!
//! `event_id`가 있으면 해당 이벤트만, 없으면 전체를 시작 시각 순으로 돌려줍니다.

use crate::api::{validated, HandlerContext};
use futures::future::BoxFuture;
use serde_json::Value;
use shared::service::db::{ClauseToken, ParamSpec};
use shared::service::normalizer::handle_sql_result;
use shared::validation::{ParamRules, ParamType};
use shared::{ExecOutcome, SqlTemplate};

pub const NAME: &str = "get_event_tt_event";
pub const PATH: &str = "api/ocrs_f/get_event_tt_event";

const SQL: &str = "
SELECT
       `EVENT_ID`
      ,`EVENT_MEI`
      ,`EVENT_KBN`
      ,`EVENT_KBN_MEI`
      ,`KAISAI_KO_CD`
      ,`KAISAI_KO_MEI`
      ,`EVENT_START_TIME`
      ,`EVENT_END_TIME`
      ,`YUKO_KIGEN`
      ,`URL`
      ,`YOYAKU_KIGEN`
      ,`QUALTRICS_URL`
FROM `EVENTDB`.`VT_EVENT`
WHERE 0=0
$event_id$
ORDER BY
    `EVENT_START_TIME`
";

const PARAMS: &[ParamSpec] = &[ParamSpec::varchar("EVENT_ID")];
const CLAUSES: &[ClauseToken] = &[ClauseToken::new(
    "$event_id$",
    "event_id",
    "AND `EVENT_ID` = @EVENT_ID",
)];

pub const TEMPLATE: SqlTemplate = SqlTemplate::new(SQL, PARAMS).with_clauses(CLAUSES);

pub const RULES: ParamRules =
    ParamRules::allow(&["event_id"]).types(&[("event_id", ParamType::String)]);

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
