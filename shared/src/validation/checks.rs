//! 파라미터 검사 함수
//!
//! 모든 검사는 통과하면 `None`, 실패하면 메시지 하나를 돌려줍니다.
//! 위반한 키가 여럿이면 한 메시지에 `, `로 묶어서 보고합니다.
//! 필수 검사 외의 검사는 값이 없거나 `null`인 키를 건너뜁니다.

use super::ParamType;
use crate::service::db::core::types::{json_type_name, RequestParams};
use crate::tool::messages::{
    ResMessage, DATE_TYPE_INVALID, NOT_SPECIFIED, SIZE_INVALID, TYPE_INVALID, UNDEFINED,
    VALUE_INVALID,
};
use chrono::{Datelike, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // YYYY-MM-DDTHH:mm:ss.SSSZ
    static ref ISO_DATE_FORMAT: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").expect("ISO 날짜 정규식");
}

const DATE_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";
const MIN_YEAR: i32 = 1753;
const MAX_YEAR: i32 = 9999;

/// 값을 메시지에 넣을 문자열로 (문자열은 따옴표 없이)
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 값의 바이트 크기 (문자열은 UTF-8 기준)
pub fn byte_size(value: &Value) -> usize {
    match value {
        Value::String(s) => s.len(),
        other => other.to_string().len(),
    }
}

/// 허용 목록에 없는 키 검사
pub fn validate_extra_keys(params: &RequestParams, allowed: &[&str]) -> Option<ResMessage> {
    let extra: Vec<&str> = params
        .keys()
        .map(String::as_str)
        .filter(|key| !allowed.contains(key))
        .collect();

    if extra.is_empty() {
        None
    } else {
        Some(UNDEFINED.render(&[&extra.join(", ")]))
    }
}

/// 필수 키 검사 (선언 순서대로 보고)
pub fn validate_required_keys(params: &RequestParams, keys: &[&str]) -> Option<ResMessage> {
    let missing: Vec<&str> = keys
        .iter()
        .copied()
        .filter(|key| !params.is_present(key))
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(NOT_SPECIFIED.render(&[&missing.join(", ")]))
    }
}

/// 타입 검사
pub fn validate_key_types(
    params: &RequestParams,
    checks: &[(&str, ParamType)],
) -> Option<ResMessage> {
    let mut keys = Vec::new();
    let mut expected = Vec::new();
    let mut actual = Vec::new();

    for (key, param_type) in checks {
        if !params.is_present(key) {
            continue;
        }
        let value = params.get(key);
        if !param_type.matches(value) {
            keys.push(*key);
            expected.push(param_type.as_str());
            actual.push(json_type_name(value));
        }
    }

    if keys.is_empty() {
        None
    } else {
        Some(TYPE_INVALID.render(&[&keys.join(", "), &expected.join(", "), &actual.join(", ")]))
    }
}

/// 크기 검사 (UTF-8 바이트 수)
pub fn validate_key_sizes(params: &RequestParams, checks: &[(&str, usize)]) -> Option<ResMessage> {
    let mut keys = Vec::new();
    let mut allowed = Vec::new();
    let mut actual = Vec::new();

    for (key, limit) in checks {
        let Some(value) = params.get(key).filter(|v| !v.is_null()) else {
            continue;
        };
        let size = byte_size(value);
        if size > *limit {
            keys.push(key.to_string());
            allowed.push(limit.to_string());
            actual.push(size.to_string());
        }
    }

    if keys.is_empty() {
        None
    } else {
        Some(SIZE_INVALID.render(&[&keys.join(", "), &allowed.join(", "), &actual.join(", ")]))
    }
}

/// 정수 범위 검사 (signed 32bit)
pub fn validate_int_range(params: &RequestParams, keys: &[&str]) -> Option<ResMessage> {
    let mut invalid_keys = Vec::new();
    let mut invalid_values = Vec::new();

    for key in keys {
        let Some(value) = params.get(key).filter(|v| !v.is_null()) else {
            continue;
        };
        if !is_int32(value) {
            invalid_keys.push(*key);
            invalid_values.push(display_value(value));
        }
    }

    if invalid_keys.is_empty() {
        None
    } else {
        Some(VALUE_INVALID.render(&[&invalid_keys.join(", "), &invalid_values.join(", ")]))
    }
}

fn is_int32(value: &Value) -> bool {
    let Value::Number(number) = value else {
        return false;
    };
    if let Some(i) = number.as_i64() {
        return i >= i32::MIN as i64 && i <= i32::MAX as i64;
    }
    match number.as_f64() {
        Some(f) => {
            f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64
        }
        None => false,
    }
}

/// 날짜 형식과 범위 검사
///
/// 문자열 여부 → 형식 → 달력상 유효성 → 연도 범위 순서로 보고 첫 실패에서 멈춥니다.
pub fn validate_date_time_format_and_range(
    params: &RequestParams,
    keys: &[&str],
) -> Option<ResMessage> {
    for &key in keys {
        let Some(value) = params.get(key).filter(|v| !v.is_null()) else {
            continue;
        };

        let Value::String(text) = value else {
            return Some(DATE_TYPE_INVALID.render(&[key, "文字列", json_type_name(Some(value))]));
        };

        if !ISO_DATE_FORMAT.is_match(text) {
            return Some(DATE_TYPE_INVALID.render(&[key, "YYYY-MM-DDTHH:mm:ss.SSSZ", text]));
        }

        let parsed = match NaiveDateTime::parse_from_str(text, DATE_PARSE_FORMAT) {
            Ok(parsed) => parsed,
            Err(_) => return Some(VALUE_INVALID.render(&[key, text])),
        };

        if parsed.year() < MIN_YEAR || parsed.year() > MAX_YEAR {
            return Some(VALUE_INVALID.render(&[key, text]));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> RequestParams {
        RequestParams::from_body(value).unwrap()
    }

    #[test]
    fn test_extra_keys_lists_all_offenders() {
        let p = params(json!({"event_id": "E1", "foo": 1, "bar": 2}));
        let err = validate_extra_keys(&p, &["event_id"]).unwrap();
        assert_eq!(err.message_code, "400_0002");
        assert_eq!(err.message_detail, "「foo, bar」を削除して下さい。");
        assert!(validate_extra_keys(&params(json!({})), &["event_id"]).is_none());
    }

    #[test]
    fn test_required_keys_in_declared_order() {
        let p = params(json!({"b": "x", "c": null}));
        let err = validate_required_keys(&p, &["c", "b", "a"]).unwrap();
        assert_eq!(err.message_code, "400_0001");
        assert_eq!(err.message_detail, "「c, a」を指定して下さい。");
    }

    #[test]
    fn test_key_types_are_batched() {
        let p = params(json!({"a": 1, "b": "ok", "c": [1]}));
        let err = validate_key_types(
            &p,
            &[("a", ParamType::String), ("b", ParamType::String), ("c", ParamType::String)],
        )
        .unwrap();
        assert_eq!(err.message_code, "400_0004");
        assert_eq!(
            err.message_detail,
            "「a, c」はstring, string形式で設定して下さい。「number, array」形式で設定されていました。"
        );
    }

    #[test]
    fn test_key_types_skip_absent_keys() {
        let p = params(json!({"a": null}));
        assert!(validate_key_types(&p, &[("a", ParamType::String), ("b", ParamType::Number)]).is_none());
    }

    #[test]
    fn test_sizes_use_utf8_bytes() {
        // 3 byte x 4 = 12 byte
        let p = params(json!({"name": "あいうえ", "id": "1234567890"}));
        assert!(validate_key_sizes(&p, &[("name", 12), ("id", 10)]).is_none());

        let err = validate_key_sizes(&p, &[("name", 11), ("id", 9)]).unwrap();
        assert_eq!(err.message_code, "400_0006");
        assert_eq!(
            err.message_detail,
            "「name, id」は11, 9byte以下で設定して下さい。設定値は12, 10byteでした。"
        );
    }

    #[test]
    fn test_int_range() {
        let p = params(json!({"a": 2147483647, "b": -2147483648, "c": 3.0}));
        assert!(validate_int_range(&p, &["a", "b", "c"]).is_none());

        let p = params(json!({"a": 2147483648i64, "b": 1.5, "c": "7"}));
        let err = validate_int_range(&p, &["a", "b", "c"]).unwrap();
        assert_eq!(err.message_code, "400_0007");
        assert_eq!(err.message_detail, "「a, b, c」の設定値が「2147483648, 1.5, 7」でした。");
    }

    #[test]
    fn test_date_accepts_iso_millis() {
        let p = params(json!({"d": "2025-09-01T00:00:00.000Z"}));
        assert!(validate_date_time_format_and_range(&p, &["d"]).is_none());
    }

    #[test]
    fn test_date_failure_stages() {
        let err = validate_date_time_format_and_range(&params(json!({"d": 20250901})), &["d"]).unwrap();
        assert_eq!(err.message_code, "400_0005");
        assert!(err.message_detail.contains("文字列"));
        assert!(err.message_detail.contains("「number」"));

        let err =
            validate_date_time_format_and_range(&params(json!({"d": "2025-09-01"})), &["d"]).unwrap();
        assert_eq!(err.message_code, "400_0005");
        assert!(err.message_detail.contains("YYYY-MM-DDTHH:mm:ss.SSSZ"));

        let err = validate_date_time_format_and_range(
            &params(json!({"d": "2025-13-01T00:00:00.000Z"})),
            &["d"],
        )
        .unwrap();
        assert_eq!(err.message_code, "400_0007");

        let err = validate_date_time_format_and_range(
            &params(json!({"d": "1752-12-31T23:59:59.999Z"})),
            &["d"],
        )
        .unwrap();
        assert_eq!(err.message_code, "400_0007");
        assert_eq!(err.message_detail, "「d」の設定値が「1752-12-31T23:59:59.999Z」でした。");
    }
}
