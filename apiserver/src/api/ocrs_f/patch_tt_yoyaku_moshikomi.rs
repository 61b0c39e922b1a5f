//! 예약 신청 갱신 (저장 프로시저)

use crate::api::{validated, HandlerContext};
use futures::future::BoxFuture;
use serde_json::Value;
use shared::service::db::ProcParamSpec;
use shared::service::normalizer::handle_procedure_result;
use shared::validation::{ParamRules, ParamType};
use shared::{ExecOutcome, SqlType, StoredProcedure};

pub const NAME: &str = "patch_tt_yoyaku_moshikomi";
pub const PATH: &str = "api/ocrs_f/patch_tt_yoyaku_moshikomi";

const PARAMS: &[ProcParamSpec] = &[
    ProcParamSpec::input("ID", SqlType::VarChar).with_length(10),
    ProcParamSpec::input("EVENT_ID", SqlType::VarChar).with_length(12),
    ProcParamSpec::input("CLASS_CD", SqlType::VarChar).with_length(10),
    ProcParamSpec::input("PRIORITY", SqlType::VarChar).with_length(10),
    ProcParamSpec::input("GMS_KOKYAKU_ID", SqlType::VarChar).with_length(10),
    ProcParamSpec::input("KOSHIN_ID", SqlType::VarChar).with_length(30),
];

pub const PROCEDURE: StoredProcedure =
    StoredProcedure::new("SP_UPDATE_TT_YOYAKU_MOSHIKOMI", PARAMS);

const KEYS: &[&str] = &[
    "id",
    "event_id",
    "class_cd",
    "priority",
    "gms_kokyaku_id",
    "koshin_id",
];

pub const RULES: ParamRules = ParamRules::allow(KEYS)
    .required(KEYS)
    .types(&[
        ("id", ParamType::String),
        ("event_id", ParamType::String),
        ("class_cd", ParamType::String),
        ("priority", ParamType::String),
        ("gms_kokyaku_id", ParamType::String),
        ("koshin_id", ParamType::String),
    ])
    .sizes(&[
        ("id", 10),
        ("event_id", 12),
        ("class_cd", 10),
        ("priority", 10),
        ("gms_kokyaku_id", 10),
        ("koshin_id", 30),
    ]);

pub async fn handle(ctx: &HandlerContext, body: Value) -> ExecOutcome {
    let request = match validated(body, &RULES) {
        Ok(request) => request,
        Err(outcome) => return outcome,
    };

    let call = PROCEDURE.build(&request);
    handle_procedure_result(NAME, ctx.db.call_procedure(&call).await)
}

pub fn route(ctx: &HandlerContext, body: Value) -> BoxFuture<'_, ExecOutcome> {
    Box::pin(handle(ctx, body))
}
