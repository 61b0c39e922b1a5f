//! Core database service modules
//!
//! 문장 조립, 연결, 실행, 트랜잭션을 관심사별로 나눈 모듈입니다.

pub mod config;
pub mod connection;
pub mod executor;
pub mod procedure;
pub mod statement;
pub mod transaction;
pub mod types;

pub use config::QueryConfig;
pub use connection::{Connector, DbSession, MySqlConnector, MySqlSession};
pub use executor::{QueryExecutor, SqlExecutor};
pub use procedure::{ParamDirection, ProcParamSpec, ProcedureCall, ProcedureParam, StoredProcedure};
pub use statement::{ClauseToken, CompiledStatement, ParamSpec, SqlParam, SqlTemplate, Statement};
pub use transaction::TransactionUnit;
pub use types::*;
