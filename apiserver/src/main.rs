//! API 서버
//!
//! 환경 설정과 로깅을 초기화한 뒤 HTTP 서버를 실행합니다.

use anyhow::{Context, Result};
use apiserver::{run_server, AppState};
use shared::config::{load_env_file, AppConfig, DbConfig};
use shared::logging::{init_logging, LoggingConfig};
use shared::service::db::QueryConfig;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> Result<()> {
    load_env_file();
    init_logging(&LoggingConfig::from_env())?;

    let config = AppConfig::from_env().context("서버 설정 로드 실패")?;
    let db_config = DbConfig::from_env().context("DB 설정 로드 실패")?;
    info!("DB 설정: {:?}", db_config);

    let state = AppState::from_config(config, &db_config, QueryConfig::from_env())
        .context("서버 상태 생성 실패")?;

    if let Err(e) = run_server(state).await {
        error!("API server stopped with error: {:#}", e);
        return Err(e);
    }

    info!("API server stopped.");
    Ok(())
}
