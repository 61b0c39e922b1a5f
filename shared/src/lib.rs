//! 공유 라이브러리
//!
//! 폼 검증 → SQL 조립 → 실행 → 응답 정규화 파이프라인의 공통 코어입니다.
//! 엔드포인트 핸들러는 이 크레이트의 구성요소만 조합해서 만들어집니다.

pub mod config;
pub mod logging;
pub mod service;
pub mod tool;
pub mod validation;

pub use service::db::{
    Connector, DbSession, MySqlConnector, ProcedureCall, ProcedureResult, QueryExecutor,
    QueryResult, RequestParams, SqlExecutor, SqlParam, SqlTemplate, SqlType, Statement,
    StoredProcedure, TransactionUnit,
};
pub use service::normalizer::{ExecOutcome, ResponseEnvelope};
pub use tool::error::AppError;
pub use tool::messages::{ResMessage, ResStatus};
pub use validation::{ParamRules, ParamType, Schema};
