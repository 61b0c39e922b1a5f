//! Transaction management module
//!
//! 여러 문장을 하나의 트랜잭션으로 실행합니다. 전부 성공하면 커밋, 하나라도 실패하면 롤백합니다.

use crate::service::db::core::connection::DbSession;
use crate::service::db::core::executor::log_statement;
use crate::service::db::core::statement::Statement;
use crate::service::db::core::types::QueryResult;
use crate::tool::error::AppError;
use tracing::{debug, error, info};

/// 한 번에 커밋/롤백되는 문장 묶음
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUnit {
    statements: Vec<Statement>,
}

impl TransactionUnit {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// 열린 세션에서 트랜잭션을 실행합니다.
    ///
    /// 성공하면 모든 문장의 영향 행 수 합계를 돌려줍니다. 실패하면 롤백을 시도하고
    /// 원래 에러를 돌려줍니다 (롤백 자체의 실패는 로그로만 남깁니다).
    pub async fn run(
        &self,
        session: &mut dyn DbSession,
        log_queries: bool,
    ) -> Result<QueryResult, AppError> {
        session.begin().await?;
        debug!("Transaction started ({} statements)", self.statements.len());

        let mut total = 0u64;
        for (index, statement) in self.statements.iter().enumerate() {
            if log_queries {
                log_statement(statement);
            }
            match session.run(statement).await {
                Ok(result) => total += result.row_count,
                Err(err) => {
                    error!(
                        "An error occurred during database processing. Performing rollback. [statement {}/{}] : {}",
                        index + 1,
                        self.statements.len(),
                        err
                    );
                    Self::rollback(session).await;
                    return Err(err);
                }
            }
        }

        if let Err(err) = session.commit().await {
            error!("Commit failed. Performing rollback. : {}", err);
            Self::rollback(session).await;
            return Err(err);
        }

        info!("Transaction committed. [Rows Affected: {}]", total);
        Ok(QueryResult::new(total, Vec::new()))
    }

    async fn rollback(session: &mut dyn DbSession) {
        match session.rollback().await {
            Ok(()) => debug!("Rollback Ended."),
            Err(e) => AppError::RollbackFailed(e.to_string()).log("Rollback failed"),
        }
    }
}
