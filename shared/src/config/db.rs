//! Database Configuration
//!
//! .env 파일에서 데이터베이스 연결 정보를 읽어옵니다.
//! 요청마다 새 연결을 열고 닫기 때문에 연결 풀은 만들지 않고 접속 옵션만 보관합니다.

use super::{env_value, env_value_or};
use crate::tool::error::AppError;
use sqlx::mysql::MySqlConnectOptions;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// 데이터베이스 접속 설정
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// 접속 대기 시간 (초)
    pub connect_timeout_secs: u64,
}

impl DbConfig {
    /// 환경변수에서 설정을 읽어옵니다.
    ///
    /// 숫자여야 하는 값이 숫자가 아니면 `Configuration` 에러를 반환합니다.
    pub fn from_env() -> Result<Self, AppError> {
        let host = env_value_or("DB_SERVER", "localhost");
        let port = parse_number(&env_value_or("DB_PORT", "3306"), "DB_PORT")?;
        let user = env_value_or("DB_USER", "root");
        let password = env_value("DB_PASS").unwrap_or_else(|| {
            warn!("DB_PASS 환경변수가 비어 있습니다.");
            String::new()
        });
        let database = env_value_or("DB_NAME", "schooldb");
        let connect_timeout_secs = parse_number(
            &env_value_or("DB_CONNECT_TIMEOUT_SECS", "15"),
            "DB_CONNECT_TIMEOUT_SECS",
        )?;

        let config = Self {
            host,
            port,
            user,
            password,
            database,
            connect_timeout_secs,
        };
        info!("데이터베이스 설정 로드: {:?}", config);
        Ok(config)
    }

    /// sqlx 접속 옵션
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

// 비밀번호는 로그에 남기지 않음
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::Configuration(format!("{}는 숫자여야 함: {}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DbConfig {
        DbConfig {
            host: "db.local".to_string(),
            port: 3307,
            user: "app".to_string(),
            password: "secret".to_string(),
            database: "schooldb".to_string(),
            connect_timeout_secs: 5,
        }
    }

    #[test]
    fn test_debug_masks_password() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("db.local"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_connect_timeout() {
        assert_eq!(sample().connect_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_number_rejects_text() {
        assert!(parse_number::<u16>("abc", "DB_PORT").is_err());
        assert_eq!(parse_number::<u16>(" 3306 ", "DB_PORT").ok(), Some(3306));
    }
}
