//! 환경 설정
//!
//! `.env` 파일과 환경변수에서 설정을 읽어옵니다.
//! 배포 환경(`ENV`)마다 값을 나눌 수 있도록 `NAME_{ENV}`를 먼저 찾고, 없으면 `NAME`을 사용합니다.

pub mod app;
pub mod db;

pub use app::AppConfig;
pub use db::DbConfig;

use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// `.env` 파일을 로드합니다.
///
/// 현재 디렉토리, 상위 디렉토리(서브패키지에서 실행되는 경우) 순서로 찾습니다.
pub fn load_env_file() {
    let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let candidates = [
        Some(current_dir.join(".env")),
        current_dir.parent().map(|p| p.join(".env")),
    ];

    for path in candidates.iter().flatten() {
        if path.exists() {
            dotenv::from_path(path).ok();
            info!("환경 파일 로드: {:?}", path);
            return;
        }
    }

    if dotenv::dotenv().is_err() {
        warn!(".env 파일을 찾을 수 없어서 환경 변수를 직접 사용합니다.");
    }
}

/// 현재 배포 환경 이름 (`ENV`)
pub fn current_env() -> Option<String> {
    env::var("ENV").ok().filter(|v| !v.is_empty())
}

/// `NAME_{ENV}` → `NAME` 순서로 환경변수를 조회합니다.
pub fn env_value(name: &str) -> Option<String> {
    env_value_for(name, current_env().as_deref())
}

/// 배포 환경을 명시해서 조회합니다.
pub fn env_value_for(name: &str, environment: Option<&str>) -> Option<String> {
    if let Some(environment) = environment {
        if let Ok(value) = env::var(format!("{}_{}", name, environment)) {
            return Some(value);
        }
    }
    env::var(name).ok()
}

/// 값이 없으면 기본값을 쓰고 경고를 남깁니다.
pub fn env_value_or(name: &str, default: &str) -> String {
    env_value(name).unwrap_or_else(|| {
        warn!("{} 환경변수가 없어서 {}을(를) 사용합니다.", name, default);
        default.to_string()
    })
}
