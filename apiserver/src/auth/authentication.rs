//! 요청 인증
//!
//! `Authorization: <방식> <base64("앱키,인증키")>` 헤더를 검사합니다.
//! 인증키는 비밀키로 계산한 `YYYYMMDD`(JST)의 HMAC-SHA256 16진수 값이며,
//! 전날/당일/다음날 중 하나와 일치하면 통과합니다.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared::config::AppConfig;
use shared::tool::messages::{
    AUTH_BASE64_DECODE_ERROR, AUTH_DECODED_STRING_INVALID, AUTH_FORMAT_INVALID,
    AUTH_NOT_SPECIFIED, AUTH_UNAUTHORIZED, MessageTemplate,
};
use shared::{ExecOutcome, ResStatus};
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

const JST_OFFSET_HOURS: i64 = 9;

/// 현재 시각의 JST 날짜
pub fn jst_date(now: DateTime<Utc>) -> NaiveDate {
    (now + Duration::hours(JST_OFFSET_HOURS)).date_naive()
}

/// 날짜의 인증키 (`YYYYMMDD`의 HMAC-SHA256, 소문자 16진수)
pub fn date_hash(secret_key: &str, date: NaiveDate) -> Option<String> {
    hmac_hex(secret_key, &date.format("%Y%m%d").to_string())
}

fn hmac_hex(secret_key: &str, message: &str) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes()).ok()?;
    mac.update(message.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn unauthorized(template: MessageTemplate) -> ExecOutcome {
    ExecOutcome::error(ResStatus::Unauthorized, template.plain())
}

/// 인증 헤더를 검사합니다. 실패하면 그대로 돌려줄 응답을 반환합니다.
pub fn authenticate(
    header: Option<&str>,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> Result<(), ExecOutcome> {
    debug!("Authorization: {:?}", header);

    let Some(header) = header else {
        warn!("Authentication information is not set in the HTTP request header.");
        return Err(unauthorized(AUTH_NOT_SPECIFIED));
    };

    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 {
        warn!(
            "Authentication information was not one set. [Number of set : {}]",
            parts.len()
        );
        return Err(unauthorized(AUTH_FORMAT_INVALID));
    }

    let decoded = STANDARD
        .decode(parts[1])
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok());
    let Some(decoded) = decoded else {
        warn!("Authentication information could not be decoded.");
        return Err(unauthorized(AUTH_BASE64_DECODE_ERROR));
    };

    let keys: Vec<&str> = decoded.split(',').collect();
    let [app_key, auth_key] = keys.as_slice() else {
        warn!(
            "Decoded authentication information was not one set. [Number of set : {}]",
            keys.len()
        );
        return Err(unauthorized(AUTH_DECODED_STRING_INVALID));
    };

    if *app_key != config.app_key {
        warn!("Application key did not match. [Set value : {}]", app_key);
        return Err(unauthorized(AUTH_UNAUTHORIZED));
    }

    let today = jst_date(now);
    let matched = [today - Duration::days(1), today, today + Duration::days(1)]
        .iter()
        .filter_map(|date| date_hash(&config.secret_key, *date))
        .any(|hash| hash == *auth_key);

    if !matched {
        warn!("Authentication key did not match. [Set value : {}]", auth_key);
        return Err(unauthorized(AUTH_UNAUTHORIZED));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio_test::assert_ok;

    fn config() -> AppConfig {
        AppConfig {
            port: 3000,
            root_path: String::new(),
            health_check_path: "/health".to_string(),
            app_key: "ocrs-app".to_string(),
            secret_key: "secret".to_string(),
            mypage_url: String::new(),
            mypage_authorization_key: String::new(),
            env: None,
        }
    }

    fn header_for(app_key: &str, auth_key: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{},{}", app_key, auth_key)))
    }

    fn code(result: Result<(), ExecOutcome>) -> String {
        let outcome = result.unwrap_err();
        assert_eq!(outcome.status, ResStatus::Unauthorized);
        outcome.data["message_code"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_hmac_known_vector() {
        assert_eq!(
            hmac_hex("key", "The quick brown fox jumps over the lazy dog").unwrap(),
            "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8"
        );
    }

    #[test]
    fn test_jst_date_crosses_midnight() {
        // 2025-09-01 16:00 UTC = 2025-09-02 01:00 JST
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 16, 0, 0).unwrap();
        assert_eq!(jst_date(now), NaiveDate::from_ymd_opt(2025, 9, 2).unwrap());
    }

    #[test]
    fn test_accepts_yesterday_today_tomorrow() {
        let cfg = config();
        let now = Utc.with_ymd_and_hms(2025, 9, 1, 3, 0, 0).unwrap();
        let today = jst_date(now);

        for offset in [-1, 0, 1] {
            let key = date_hash(&cfg.secret_key, today + Duration::days(offset)).unwrap();
            let header = header_for(&cfg.app_key, &key);
            assert_ok!(authenticate(Some(&header), &cfg, now));
        }

        let stale = date_hash(&cfg.secret_key, today - Duration::days(2)).unwrap();
        let header = header_for(&cfg.app_key, &stale);
        assert_eq!(code(authenticate(Some(&header), &cfg, now)), "401_0005");
    }

    #[test]
    fn test_failure_codes_in_order() {
        let cfg = config();
        let now = Utc::now();

        assert_eq!(code(authenticate(None, &cfg, now)), "401_0001");
        assert_eq!(code(authenticate(Some("token-only"), &cfg, now)), "401_0002");
        assert_eq!(code(authenticate(Some("Basic a b"), &cfg, now)), "401_0002");
        assert_eq!(code(authenticate(Some("Basic %%%"), &cfg, now)), "401_0003");

        let no_comma = format!("Basic {}", STANDARD.encode("ocrs-app"));
        assert_eq!(code(authenticate(Some(&no_comma), &cfg, now)), "401_0004");

        let wrong_app = header_for("other-app", "whatever");
        assert_eq!(code(authenticate(Some(&wrong_app), &cfg, now)), "401_0005");
    }
}
