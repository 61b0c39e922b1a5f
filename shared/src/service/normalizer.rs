//! 실행 결과 정규화
//!
//! 실행 결과(성공/실패)를 `(상태 코드, name, count, data)` 형태로 바꿉니다.
//! 드라이버 에러 원문은 로그에만 남기고 응답에는 일반 DB 에러 메시지만 싣습니다.

use crate::service::db::core::types::{ProcedureResult, QueryResult};
use crate::tool::error::AppError;
use crate::tool::messages::{ResMessage, ResStatus, INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_DB};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

/// 오류 응답의 `name`
pub const ERROR_NAME: &str = "error";

/// 응답 바디
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub name: String,
    pub count: u64,
    pub data: Value,
}

/// 엔드포인트 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutcome {
    pub status: ResStatus,
    pub name: String,
    pub count: u64,
    pub data: Value,
}

impl ExecOutcome {
    pub fn new(status: ResStatus, name: impl Into<String>, count: u64, data: Value) -> Self {
        Self {
            status,
            name: name.into(),
            count,
            data,
        }
    }

    /// 200 성공
    pub fn ok(name: impl Into<String>, count: u64, data: Value) -> Self {
        Self::new(ResStatus::Ok, name, count, data)
    }

    /// 400 검증 실패 (`data`는 메시지 객체)
    pub fn bad_request(msg: ResMessage) -> Self {
        Self::error(ResStatus::BadRequest, msg)
    }

    /// 상태 코드와 메시지로 만드는 오류 응답
    pub fn error(status: ResStatus, msg: ResMessage) -> Self {
        Self::new(status, ERROR_NAME, 1, message_value(&msg))
    }

    /// 500 DB 실행 실패 (`data`는 일반 DB 에러 메시지 한 건의 배열)
    pub fn db_error() -> Self {
        let msg = INTERNAL_SERVER_ERROR_DB.plain();
        Self::new(
            ResStatus::InternalServerError,
            ERROR_NAME,
            1,
            Value::Array(vec![message_value(&msg)]),
        )
    }

    /// 500 예상하지 못한 내부 에러
    pub fn internal(function: &str, detail: &str) -> Self {
        let msg = INTERNAL_SERVER_ERROR.render(&[&format!("Function: {}", function), detail]);
        Self::error(ResStatus::InternalServerError, msg)
    }

    /// 에러 종류에 맞는 응답 (검증 에러는 400, 나머지는 500)
    pub fn from_error(err: &AppError) -> Self {
        match err {
            AppError::Validation(msg) => Self::bad_request(msg.clone()),
            e if e.is_execution_failure() => Self::db_error(),
            e => Self::internal("handler", &e.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResStatus::Ok
    }

    pub fn envelope(&self) -> ResponseEnvelope {
        ResponseEnvelope {
            name: self.name.clone(),
            count: self.count,
            data: self.data.clone(),
        }
    }

    pub fn into_envelope(self) -> (ResStatus, ResponseEnvelope) {
        (
            self.status,
            ResponseEnvelope {
                name: self.name,
                count: self.count,
                data: self.data,
            },
        )
    }
}

fn message_value(msg: &ResMessage) -> Value {
    json!({
        "message_code": msg.message_code,
        "message": msg.message,
        "message_detail": msg.message_detail,
    })
}

/// 단일 문장/트랜잭션 결과 정규화
pub fn handle_sql_result(name: &str, result: Result<QueryResult, AppError>) -> ExecOutcome {
    match result {
        Ok(result) => {
            info!("Rows Returned : {}", result.row_count);
            let data = Value::Array(result.rows.into_iter().map(Value::Object).collect());
            debug!("Response Data : {}", data);
            ExecOutcome::ok(name, result.row_count, data)
        }
        Err(err) => failure(err),
    }
}

/// 저장 프로시저 결과 정규화
///
/// `data`는 `{"rows": [...], "output_parameters": {...}}` 입니다.
pub fn handle_procedure_result(
    name: &str,
    result: Result<ProcedureResult, AppError>,
) -> ExecOutcome {
    match result {
        Ok(result) => {
            info!("Rows Returned : {}", result.row_count);
            let rows: Vec<Value> = result.rows.into_iter().map(Value::Object).collect();
            let data = json!({
                "rows": rows,
                "output_parameters": Value::Object(result.output_parameters),
            });
            debug!("Response Data : {}", data);
            ExecOutcome::ok(name, result.row_count, data)
        }
        Err(err) => failure(err),
    }
}

fn failure(err: AppError) -> ExecOutcome {
    error!("Error Message : {}", err);
    let outcome = ExecOutcome::from_error(&err);
    debug!("Error Data    : {}", outcome.data);
    outcome
}
