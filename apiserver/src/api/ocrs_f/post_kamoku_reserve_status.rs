//! 과목 예약 상태 MyPage 연동
//!
//! 예약 신청의 주소/전화번호와 이벤트 예약 기한을 조회한 뒤 MyPage API에 상태 변경을
//! 보내고, MyPage 응답을 그대로 돌려줍니다.

use crate::api::HandlerContext;
use futures::future::BoxFuture;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};
use shared::service::db::core::connection::parse_datetime;
use shared::service::db::ParamSpec;
use shared::service::normalizer::{handle_sql_result, ERROR_NAME};
use shared::validation::{FieldRule, Schema};
use shared::{AppError, ExecOutcome, RequestParams, ResStatus, SqlTemplate};
use tracing::info;

pub const NAME: &str = "post_kamoku_reserve_status";
pub const PATH: &str = "api/ocrs_f/post_kamoku_reserve_status";

/// GMS 경유 예약 신청 구분
const YOYAKU_MOSHIKOMI_KBN_GMS: &str = "02";

const SQL: &str = "
SELECT
    `YUBIN_NO`,
    `JYUSYO`,
    `TEL_NO`,
    (
        SELECT
            `YOYAKU_KIGEN`
        FROM
            `EVENTDB`.`TT_EVENT`
        WHERE
            `EVENT_ID` = @EVENT_ID
    ) AS `YOYAKUKIJITSU`
FROM
    `EVENTDB`.`TT_YOYAKU_MOSHIKOMI`
WHERE
    `GMS_KOKYAKU_ID` = @GMS_KOKYAKU_ID
    AND
    `EVENT_ID` = @EVENT_ID
LIMIT 1
";

const PARAMS: &[ParamSpec] = &[
    ParamSpec::varchar("EVENT_ID"),
    ParamSpec::varchar("GMS_KOKYAKU_ID"),
];

pub const TEMPLATE: SqlTemplate = SqlTemplate::new(SQL, PARAMS);

// 조회 컬럼 → MyPage 필드 (값이 있을 때만 보냄)
const OPTIONAL_FIELDS: &[(&str, &str)] = &[
    ("YUBIN_NO", "syosekiSoufusakiYubinNo"),
    ("JYUSYO", "syosekiSoufusakiJusyo"),
    ("TEL_NO", "syosekiSoufusakiTelNo"),
];

lazy_static! {
    pub static ref SCHEMA: Schema = Schema::object(vec![
        FieldRule::string("gmsKokyakuId")
            .regex(Regex::new(r"^\d{10}$").expect("고객 ID 정규식"))
            .length(10),
        FieldRule::string("eventCd").length(12),
    ])
    .strict();
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        _ => true,
    }
}

/// MyPage 요청 바디
///
/// 예약 기한을 읽을 수 없으면 에러 문자열을 돌려줍니다.
pub fn reserve_status_body(body: &Value, row: &Value) -> Result<Value, String> {
    let kijitsu = row
        .get("YOYAKUKIJITSU")
        .and_then(Value::as_str)
        .and_then(parse_datetime)
        .ok_or_else(|| format!("Invalid time value: {}", row["YOYAKUKIJITSU"]))?;

    let mut request = Map::new();
    request.insert("gmsKokyakuId".to_string(), body["gmsKokyakuId"].clone());
    request.insert("eventCd".to_string(), body["eventCd"].clone());
    request.insert(
        "yoyakuMoshikomiKbn".to_string(),
        json!(YOYAKU_MOSHIKOMI_KBN_GMS),
    );
    request.insert(
        "yoyakuKijitsu".to_string(),
        json!(kijitsu.format("%Y-%m-%d").to_string()),
    );
    for (column, field) in OPTIONAL_FIELDS {
        if let Some(value) = row.get(*column).filter(|v| is_truthy(v)) {
            request.insert(field.to_string(), value.clone());
        }
    }

    Ok(Value::Object(request))
}

pub async fn handle(ctx: &HandlerContext, body: Value) -> ExecOutcome {
    if let Err(msg) = SCHEMA.check(&body) {
        return ExecOutcome::bad_request(msg);
    }

    let mut request = RequestParams::new();
    request.insert("event_id", body["eventCd"].clone());
    request.insert("gms_kokyaku_id", body["gmsKokyakuId"].clone());

    let lookup = handle_sql_result(NAME, ctx.db.execute(&TEMPLATE.build(&request)).await);
    let first_row = if lookup.is_ok() {
        lookup.data.as_array().and_then(|rows| rows.first())
    } else {
        None
    };
    let Some(row) = first_row else {
        return ExecOutcome::new(ResStatus::BadRequest, ERROR_NAME, 1, lookup.data);
    };

    let request_body = match reserve_status_body(&body, row) {
        Ok(request_body) => request_body,
        Err(detail) => return ExecOutcome::internal(NAME, &detail),
    };
    info!("requestBody: {}", request_body);

    match ctx.mypage.update_kamoku_reserve_status(&request_body).await {
        Ok(reply) if reply.is_success() => ExecOutcome::ok(NAME, 0, json!([reply.body])),
        Ok(reply) => ExecOutcome::new(ResStatus::BadRequest, ERROR_NAME, 1, json!([reply.body])),
        Err(err) => {
            let err = AppError::from(err);
            err.log(NAME);
            ExecOutcome::internal(NAME, &err.to_string())
        }
    }
}

pub fn route(ctx: &HandlerContext, body: Value) -> BoxFuture<'_, ExecOutcome> {
    Box::pin(handle(ctx, body))
}
