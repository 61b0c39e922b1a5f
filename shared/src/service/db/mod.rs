//! 데이터베이스 서비스 모듈
//!
//! MySQL 데이터베이스와의 모든 상호작용을 처리합니다.
//! 엔드포인트는 템플릿에서 문장을 만들고 [`SqlExecutor`]로 실행합니다.

pub mod core;

pub use core::{
    // 설정
    config::QueryConfig,
    // 연결
    connection::{Connector, DbSession, MySqlConnector, MySqlSession},
    // 실행
    executor::{QueryExecutor, SqlExecutor},
    // 저장 프로시저
    procedure::{ParamDirection, ProcParamSpec, ProcedureCall, ProcedureParam, StoredProcedure},
    // 문장 조립
    statement::{ClauseToken, ParamSpec, SqlParam, SqlTemplate, Statement},
    // 트랜잭션
    transaction::TransactionUnit,
    // 데이터 타입들
    types::{json_type_name, ProcedureResult, QueryResult, QueryRow, RequestParams, SqlType},
};
