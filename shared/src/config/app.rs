//! API 서버 설정

use super::{current_env, env_value, env_value_or};
use crate::tool::error::AppError;
use tracing::info;

/// 서버 실행 설정
///
/// 시작할 때 한 번 읽고 이후에는 읽기 전용으로 공유합니다.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// 모든 API 경로 앞에 붙는 루트 경로 (예: `/ocrs`)
    pub root_path: String,
    pub health_check_path: String,
    pub app_key: String,
    pub secret_key: String,
    /// MyPage API 기본 URL
    pub mypage_url: String,
    pub mypage_authorization_key: String,
    pub env: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let port_str = env_value_or("PORT", "3000");
        let port = port_str
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::Configuration(format!("PORT는 숫자여야 함: {}", port_str)))?;

        let app_key = env_value("APP_KEY")
            .ok_or_else(|| AppError::Configuration("APP_KEY 환경변수가 필요합니다.".to_string()))?;
        let secret_key = env_value("SECRET_KEY").ok_or_else(|| {
            AppError::Configuration("SECRET_KEY 환경변수가 필요합니다.".to_string())
        })?;

        let config = Self {
            port,
            root_path: normalize_root_path(&env_value("ROOT_PATH").unwrap_or_default()),
            health_check_path: env_value_or("HEALTH_CHECK_PATH", "/health"),
            app_key,
            secret_key,
            mypage_url: env_value("MYPAGE_URL").unwrap_or_default(),
            mypage_authorization_key: env_value("MYPAGE_AUTHORIZATION_KEY").unwrap_or_default(),
            env: current_env(),
        };

        info!(
            "서버 설정 로드: port={}, root_path='{}', env={:?}",
            config.port, config.root_path, config.env
        );
        Ok(config)
    }

    /// 요청 경로에서 루트 경로를 떼어낸 라우트 키를 만듭니다.
    ///
    /// `/ocrs/api/ocrs_f/get_event_tt_event` → `api/ocrs_f/get_event_tt_event`
    pub fn route_key<'a>(&self, path: &'a str) -> &'a str {
        let rest = if self.root_path.is_empty() {
            path
        } else {
            path.strip_prefix(self.root_path.as_str()).unwrap_or(path)
        };
        rest.trim_matches('/')
    }
}

/// 앞에 `/`가 있고 뒤에는 없도록 맞춥니다. 빈 값은 그대로 둡니다.
fn normalize_root_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
