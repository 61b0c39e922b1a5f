//! Error Management System
//!
//! 파이프라인에서 발생하는 모든 에러를 체계적으로 관리합니다.
//! 검증 실패는 클라이언트가 고칠 수 있는 400 계열, 나머지는 500 계열로 분류되며
//! 드라이버 에러 원문은 로그에만 남기고 응답에는 싣지 않습니다.

use crate::tool::messages::ResMessage;
use thiserror::Error;
use tracing::{error, info, warn};

/// 공통 애플리케이션 에러 정의
#[derive(Error, Debug, Clone)]
pub enum AppError {
    // 입력값 검증 에러 (클라이언트 책임)
    #[error("파라미터 검증 실패: {} {}", .0.message_code, .0.message_detail)]
    Validation(ResMessage),

    // 데이터베이스 관련 에러
    #[error("데이터베이스 연결 실패: {0}")]
    DatabaseConnection(String),

    #[error("데이터베이스 쿼리 실패: {0}")]
    DatabaseQuery(String),

    #[error("롤백 실패: {0}")]
    RollbackFailed(String),

    #[error("타임아웃: {0}")]
    Timeout(String),

    // 외부 서비스 에러
    #[error("외부 API 호출 실패: {0}")]
    ExternalApiError(String),

    // 시스템 에러
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// 에러의 심각도를 반환합니다.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: 시스템 장애
            AppError::DatabaseConnection(_)
            | AppError::RollbackFailed(_)
            | AppError::Configuration(_) => ErrorSeverity::Critical,

            // High: 실행 실패
            AppError::DatabaseQuery(_) | AppError::Timeout(_) => ErrorSeverity::High,

            // Medium: 외부 연동 실패
            AppError::ExternalApiError(_) => ErrorSeverity::Medium,

            // Low: 클라이언트가 고치면 되는 검증 오류
            AppError::Validation(_) => ErrorSeverity::Low,
        }
    }

    /// 에러를 로깅합니다.
    ///
    /// 심각도에 따라 적절한 로깅 레벨을 사용합니다.
    pub fn log(&self, context: &str) {
        let error_msg = self.to_string();

        match self.severity() {
            ErrorSeverity::Critical => error!("[CRITICAL] {} - {}", context, error_msg),
            ErrorSeverity::High => error!("[HIGH] {} - {}", context, error_msg),
            ErrorSeverity::Medium => warn!("[MEDIUM] {} - {}", context, error_msg),
            ErrorSeverity::Low => info!("[LOW] {} - {}", context, error_msg),
        }
    }

    /// 드라이버 수준의 실행 실패인지 여부
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self,
            AppError::DatabaseConnection(_)
                | AppError::DatabaseQuery(_)
                | AppError::RollbackFailed(_)
                | AppError::Timeout(_)
        )
    }
}

/// 에러 심각도 레벨
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorSeverity {
    Critical, // 시스템 장애
    High,     // 실행 실패
    Medium,   // 외부 연동 실패
    Low,      // 일반적인 경고
}

impl From<ResMessage> for AppError {
    fn from(msg: ResMessage) -> Self {
        AppError::Validation(msg)
    }
}

// SqlxError conversion
//
// 연결 계층 에러와 문장 실행 에러를 구분하지만 응답에서는 같은 실패로 취급됩니다.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(io_err) => AppError::DatabaseConnection(io_err.to_string()),
            sqlx::Error::Tls(tls_err) => AppError::DatabaseConnection(tls_err.to_string()),
            sqlx::Error::Protocol(msg) => AppError::DatabaseConnection(msg),
            sqlx::Error::Configuration(e) => {
                AppError::DatabaseConnection(format!("Database configuration error: {}", e))
            }
            sqlx::Error::Database(db_err) => AppError::DatabaseQuery(db_err.to_string()),
            _ => AppError::DatabaseQuery(err.to_string()),
        }
    }
}
