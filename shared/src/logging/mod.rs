//! 통합 로깅 시스템
//!
//! `tracing` 이벤트를 운영 로그 형식(JST 시각, 트레이스 ID, 레벨, 메시지)으로 표준 출력에 씁니다.
//!
//! # 사용 예시
//! ```rust,no_run
//! use shared::logging::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::from_env()).ok();
//! tracing::info!("서버 시작");
//! ```

pub mod config;
pub mod formatter;

pub use config::LoggingConfig;
pub use formatter::{current_trace_id, with_trace_id, JstFormatter};

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// 로깅 시스템 초기화 함수
///
/// 전역 subscriber는 한 번만 설치됩니다. 이미 설치되어 있으면 에러를 반환합니다.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    config.validate().map_err(|e| anyhow!(e))?;

    let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .event_format(JstFormatter::new(
            config.utc_offset_hours,
            config.trace_id_width,
        ))
        .try_init()
        .map_err(|e| anyhow!("로깅 초기화 실패: {}", e))
}
