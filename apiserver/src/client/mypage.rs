//! MyPage 외부 API 클라이언트
//!
//! 과목 예약 상태 변경을 MyPage에 통지합니다. 엔드포인트는 [`MyPageClient`] 트레이트에만
//! 의존하므로 테스트에서는 HTTP 호출 없이 응답을 바꿔 끼울 수 있습니다.

use async_trait::async_trait;
use serde_json::Value;
use shared::config::AppConfig;
use shared::tool::error::AppError;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// 예약 상태 변경 API 경로
pub const UPDATE_KAMOKU_RESERVE_STATUS_PATH: &str = "/api/ext/v1/updateKamokuReserveStatus";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// MyPage 응답 (상태 코드와 JSON 바디)
#[derive(Debug, Clone, PartialEq)]
pub struct MyPageReply {
    pub status: u16,
    pub body: Value,
}

impl MyPageReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum MyPageError {
    #[error("MyPage URL is not configured")]
    NotConfigured,

    #[error("MyPage request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("MyPage response is not JSON: {0}")]
    InvalidResponse(String),
}

impl From<MyPageError> for AppError {
    fn from(err: MyPageError) -> Self {
        match err {
            MyPageError::NotConfigured => AppError::Configuration(err.to_string()),
            other => AppError::ExternalApiError(other.to_string()),
        }
    }
}

#[async_trait]
pub trait MyPageClient: Send + Sync {
    async fn update_kamoku_reserve_status(&self, body: &Value) -> Result<MyPageReply, MyPageError>;
}

/// reqwest 기반 구현
pub struct HttpMyPageClient {
    client: reqwest::Client,
    base_url: String,
    authorization_key: String,
}

impl HttpMyPageClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.mypage_url.trim_end_matches('/').to_string(),
            authorization_key: config.mypage_authorization_key.clone(),
        })
    }

    fn endpoint(&self) -> Result<String, MyPageError> {
        if self.base_url.is_empty() {
            return Err(MyPageError::NotConfigured);
        }
        Ok(format!("{}{}", self.base_url, UPDATE_KAMOKU_RESERVE_STATUS_PATH))
    }
}

#[async_trait]
impl MyPageClient for HttpMyPageClient {
    async fn update_kamoku_reserve_status(&self, body: &Value) -> Result<MyPageReply, MyPageError> {
        let endpoint = self.endpoint()?;
        info!("MyPage request: {}", body);

        let response = self
            .client
            .post(&endpoint)
            .header("authorizationkey", &self.authorization_key)
            .header("Charset", "UTF-8")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: Value =
            serde_json::from_str(&text).map_err(|e| MyPageError::InvalidResponse(e.to_string()))?;

        let reply = MyPageReply { status, body };
        if reply.is_success() {
            info!("MyPage success response: {}", reply.body);
        } else {
            error!("MyPage error response [{}]: {}", status, reply.body);
        }
        Ok(reply)
    }
}
