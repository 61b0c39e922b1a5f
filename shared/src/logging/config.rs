//! 로깅 설정 관리

use serde::{Deserialize, Serialize};

/// 로깅 시스템 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 필터 지시어 (`LOG` 또는 `RUST_LOG`, 기본값: info)
    pub filter: String,

    /// 타임스탬프에 더할 UTC 오프셋 (시간 단위, 기본값: 9 = JST)
    pub utc_offset_hours: i32,

    /// 트레이스 ID 출력 폭 (기본값: 40)
    pub trace_id_width: usize,

    /// ANSI 색상 사용 여부 (기본값: false)
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            utc_offset_hours: 9,
            trace_id_width: 40,
            ansi: false,
        }
    }
}

impl LoggingConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LOG").or_else(|_| std::env::var("RUST_LOG")) {
            if !val.trim().is_empty() {
                config.filter = val.trim().to_lowercase();
            }
        }

        if let Ok(val) = std::env::var("LOG_UTC_OFFSET_HOURS") {
            if let Ok(hours) = val.parse() {
                config.utc_offset_hours = hours;
            }
        }

        if let Ok(val) = std::env::var("LOG_ANSI") {
            config.ansi = val.to_lowercase() == "true";
        }

        config
    }

    /// 설정 유효성 검사
    pub fn validate(&self) -> Result<(), String> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(format!(
                "UTC 오프셋은 -12 ~ 14 사이여야 합니다: {}",
                self.utc_offset_hours
            ));
        }
        if self.trace_id_width == 0 {
            return Err("트레이스 ID 출력 폭은 0보다 커야 합니다".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.filter, "info");
        assert_eq!(config.utc_offset_hours, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_offset() {
        let config = LoggingConfig {
            utc_offset_hours: 20,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
