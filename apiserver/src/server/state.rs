//! 서버 공유 상태
//!
//! 시작할 때 한 번 만들어지고 요청 사이에서는 읽기만 합니다.

use crate::api::{HandlerContext, Registry};
use crate::client::HttpMyPageClient;
use shared::config::{AppConfig, DbConfig};
use shared::service::db::QueryConfig;
use shared::{AppError, MySqlConnector, QueryExecutor};
use std::sync::Arc;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<Registry>,
    pub context: HandlerContext,
}

impl AppState {
    pub fn new(config: AppConfig, registry: Registry, context: HandlerContext) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            context,
        }
    }

    /// 실제 MySQL 실행기와 MyPage 클라이언트로 상태를 만듭니다.
    pub fn from_config(
        config: AppConfig,
        db_config: &DbConfig,
        query_config: QueryConfig,
    ) -> Result<Self, AppError> {
        let executor = QueryExecutor::new(MySqlConnector::new(db_config), query_config);
        let mypage = HttpMyPageClient::new(&config)?;
        let context = HandlerContext::new(Arc::new(executor), Arc::new(mypage));

        Ok(Self::new(config, Registry::with_default_routes(), context))
    }
}
