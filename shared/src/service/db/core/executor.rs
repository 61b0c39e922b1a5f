//! 쿼리 실행 모듈
//!
//! 호출마다 연결 → 실행 → 연결 해제를 수행합니다. 연결 해제는 성공/실패와 관계없이 항상 실행됩니다.

use crate::service::db::core::config::QueryConfig;
use crate::service::db::core::connection::{Connector, DbSession};
use crate::service::db::core::procedure::ProcedureCall;
use crate::service::db::core::statement::Statement;
use crate::service::db::core::transaction::TransactionUnit;
use crate::service::db::core::types::{ProcedureResult, QueryResult};
use crate::tool::error::AppError;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{error, info, warn};

/// 엔드포인트가 사용하는 실행기 인터페이스
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// 단일 문장 실행
    async fn execute(&self, statement: &Statement) -> Result<QueryResult, AppError>;

    /// 트랜잭션 실행 (전부 커밋 또는 전부 롤백)
    async fn execute_transaction(&self, unit: &TransactionUnit) -> Result<QueryResult, AppError>;

    /// 저장 프로시저 실행
    async fn call_procedure(&self, call: &ProcedureCall) -> Result<ProcedureResult, AppError>;
}

/// SQL 텍스트(한 줄)와 바인딩 파라미터를 로그로 남깁니다.
pub fn log_statement(statement: &Statement) {
    info!("SQL: {}", statement.sql_for_log());
    if !statement.params().is_empty() {
        let params = statement
            .params()
            .iter()
            .enumerate()
            .map(|(index, p)| {
                format!(
                    "[{}] name: {} type: {:?} value: {} ",
                    index, p.name, p.sql_type, p.value
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        info!("PRM: {}", params);
    }
}

/// 데이터베이스 작업을 위한 쿼리 실행기
pub struct QueryExecutor<C: Connector> {
    /// 연결 생성기
    connector: C,

    /// 쿼리 설정
    config: QueryConfig,
}

impl<C: Connector> QueryExecutor<C> {
    /// 새 쿼리 실행기 생성
    pub fn new(connector: C, config: QueryConfig) -> Self {
        Self { connector, config }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// 연결을 닫습니다. 닫기 실패는 결과에 영향을 주지 않습니다.
    async fn disconnect(&self, mut session: Box<dyn DbSession>) {
        if let Err(e) = session.close().await {
            warn!("Failed to close database connection: {}", e);
        }
    }

    fn log_failure(&self, context: &str, err: &AppError) {
        error!("Error occurred. [Function: {}]", context);
        err.log(context);
    }

    /// Check for slow queries
    fn check_slow_query(&self, label: &str, started: Instant) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if elapsed_ms > self.config.slow_query_threshold_ms {
            warn!(
                "Slow query detected ({} ms): {}",
                elapsed_ms,
                label.chars().take(200).collect::<String>()
            );
        }
    }
}

#[async_trait]
impl<C: Connector> SqlExecutor for QueryExecutor<C> {
    async fn execute(&self, statement: &Statement) -> Result<QueryResult, AppError> {
        let started = Instant::now();
        let mut session = self.connector.connect().await.map_err(|e| {
            self.log_failure("execute", &e);
            e
        })?;

        if self.config.enable_query_logging {
            log_statement(statement);
        }
        let result = session.run(statement).await;
        self.disconnect(session).await;

        self.check_slow_query(&statement.sql_for_log(), started);
        result.map_err(|e| {
            self.log_failure("execute", &e);
            e
        })
    }

    async fn execute_transaction(&self, unit: &TransactionUnit) -> Result<QueryResult, AppError> {
        let started = Instant::now();
        let mut session = self.connector.connect().await.map_err(|e| {
            self.log_failure("execute_transaction", &e);
            e
        })?;

        let result = unit
            .run(session.as_mut(), self.config.enable_query_logging)
            .await;
        self.disconnect(session).await;

        self.check_slow_query(&format!("transaction of {} statements", unit.len()), started);
        result.map_err(|e| {
            self.log_failure("execute_transaction", &e);
            e
        })
    }

    async fn call_procedure(&self, call: &ProcedureCall) -> Result<ProcedureResult, AppError> {
        let started = Instant::now();
        let mut session = self.connector.connect().await.map_err(|e| {
            self.log_failure("call_procedure", &e);
            e
        })?;

        if self.config.enable_query_logging {
            info!("SP: {}", call.name());
            info!("PRM: {}", call.describe_params());
        }
        let result = session.call(call).await;
        self.disconnect(session).await;

        self.check_slow_query(call.name(), started);
        result.map_err(|e| {
            self.log_failure("call_procedure", &e);
            e
        })
    }
}
