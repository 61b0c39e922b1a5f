//! 쿼리 실행 설정

use serde::{Deserialize, Serialize};

/// 쿼리 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// SQL/파라미터 로깅 활성화
    pub enable_query_logging: bool,

    /// 느린 쿼리 로깅 (임계값: ms)
    pub slow_query_threshold_ms: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            enable_query_logging: true,
            slow_query_threshold_ms: 1000,
        }
    }
}

impl QueryConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DB_QUERY_LOGGING") {
            config.enable_query_logging = val.to_lowercase() != "false";
        }

        if let Ok(val) = std::env::var("DB_SLOW_QUERY_MS") {
            if let Ok(ms) = val.parse() {
                config.slow_query_threshold_ms = ms;
            }
        }

        config
    }
}
