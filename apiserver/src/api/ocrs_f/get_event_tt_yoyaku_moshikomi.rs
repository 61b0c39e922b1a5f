//! 이벤트별 예약 신청 목록 조회

use crate::api::{validated, HandlerContext};
use futures::future::BoxFuture;
use serde_json::Value;
use shared::service::db::ParamSpec;
use shared::service::normalizer::handle_sql_result;
use shared::validation::{ParamRules, ParamType};
use shared::{ExecOutcome, SqlTemplate};

pub const NAME: &str = "get_event_tt_yoyaku_moshikomi";
pub const PATH: &str = "api/ocrs_f/get_event_tt_yoyaku_moshikomi";

const SQL: &str = "
SELECT
       `EVENT_ID`
      ,`ID`
      ,`EMAIL`
      ,`SHIMEI`
      ,`CLASS_CD`
      ,`CLASS_HYOJI`
      ,`PRIORITY`
      ,`WAITING_FLG`
      ,`GMS_KOKYAKU_ID`
      ,`MOSHIKOMI_NO`
      ,`MOSHIKOMI_GYO`
      ,`RENKEI_ZUMI_FLG`
  FROM `EVENTDB`.`VT_YOYAKU_MOSHIKOMI`
WHERE
    `EVENT_ID` = @EVENT_ID
";

const PARAMS: &[ParamSpec] = &[ParamSpec::varchar("EVENT_ID")];

pub const TEMPLATE: SqlTemplate = SqlTemplate::new(SQL, PARAMS);

pub const RULES: ParamRules = ParamRules::allow(&["event_id"])
    .required(&["event_id"])
    .types(&[("event_id", ParamType::String)]);

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

    #[test]
    fn test_event_id_is_required() {
        let msg = RULES.check(&RequestParams::new()).unwrap_err();
        assert_eq!(msg.message_code, "400_0001");
        assert_eq!(msg.message_detail, "「event_id」を指定して下さい。");

        let null_id = RequestParams::from_body(json!({"event_id": null})).unwrap();
        assert_eq!(RULES.check(&null_id).unwrap_err().message_code, "400_0001");
    }

    #[test]
    fn test_extra_key_reported_before_required() {
        let request = RequestParams::from_body(json!({"eventid": "E-0001"})).unwrap();
        assert_eq!(RULES.check(&request).unwrap_err().message_code, "400_0002");
    }
}
