//! 선언형 객체 스키마 검사
//!
//! 필드 목록(타입, 정규식, 길이)으로 요청 전체를 한 번에 검사합니다.
//! 모든 필드의 위반 메시지를 모아 `INVALID_PARAM` 하나로 합칩니다.

use crate::service::db::core::types::json_type_name;
use crate::tool::messages::{ResMessage, INVALID_PARAM};
use regex::Regex;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
}

/// 필드 규칙
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub pattern: Option<Regex>,
    pub length: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub optional: bool,
}

impl FieldRule {
    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            pattern: None,
            length: None,
            min_length: None,
            max_length: None,
            optional: false,
        }
    }

    pub fn regex(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn min(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn collect_issues(&self, value: Option<&Value>, issues: &mut Vec<String>) {
        let value = match value {
            None if self.optional => return,
            None => {
                issues.push(format!("{}: Required", self.name));
                return;
            }
            Some(v) => v,
        };

        match self.kind {
            FieldKind::String => self.check_string(value, issues),
            FieldKind::Integer => self.check_integer(value, issues),
        }
    }

    fn check_string(&self, value: &Value, issues: &mut Vec<String>) {
        let Value::String(text) = value else {
            issues.push(format!(
                "{}: Expected string, received {}",
                self.name,
                json_type_name(Some(value))
            ));
            return;
        };

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(text) {
                issues.push(format!("{}: Invalid", self.name));
            }
        }

        let chars = text.chars().count();
        if let Some(length) = self.length {
            if chars != length {
                issues.push(format!(
                    "{}: String must contain exactly {} character(s)",
                    self.name, length
                ));
            }
        }
        if let Some(min) = self.min_length {
            if chars < min {
                issues.push(format!(
                    "{}: String must contain at least {} character(s)",
                    self.name, min
                ));
            }
        }
        if let Some(max) = self.max_length {
            if chars > max {
                issues.push(format!(
                    "{}: String must contain at most {} character(s)",
                    self.name, max
                ));
            }
        }
    }

    fn check_integer(&self, value: &Value, issues: &mut Vec<String>) {
        match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => {}
            Value::Number(_) => {
                issues.push(format!("{}: Expected integer, received float", self.name));
            }
            other => issues.push(format!(
                "{}: Expected number, received {}",
                self.name,
                json_type_name(Some(other))
            )),
        }
    }
}

/// 객체 스키마
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub fields: Vec<FieldRule>,
    /// 선언되지 않은 키를 거부할지 여부
    pub strict: bool,
}

impl Schema {
    pub fn object(fields: Vec<FieldRule>) -> Self {
        Self {
            fields,
            strict: false,
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// 위반 메시지 목록 (통과하면 빈 벡터)
    pub fn issues(&self, body: &Value) -> Vec<String> {
        let Value::Object(map) = body else {
            return vec![format!(
                "Expected object, received {}",
                json_type_name(Some(body))
            )];
        };

        let mut issues = Vec::new();
        for field in &self.fields {
            field.collect_issues(map.get(field.name), &mut issues);
        }

        if self.strict {
            let unknown: Vec<String> = map
                .keys()
                .filter(|key| !self.fields.iter().any(|f| f.name == key.as_str()))
                .map(|key| format!("'{}'", key))
                .collect();
            if !unknown.is_empty() {
                issues.push(format!("Unrecognized key(s) in object: {}", unknown.join(", ")));
            }
        }

        issues
    }

    /// 검사 결과를 응답 메시지로
    pub fn check(&self, body: &Value) -> Result<(), ResMessage> {
        let issues = self.issues(body);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(INVALID_PARAM.render(&[&issues.join(", ")]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reserve_schema() -> Schema {
        Schema::object(vec![
            FieldRule::string("gmsKokyakuId")
                .regex(Regex::new(r"^\d{10}$").unwrap())
                .length(10),
            FieldRule::string("eventCd").length(12),
        ])
        .strict()
    }

    #[test]
    fn test_valid_body_passes() {
        let body = json!({"gmsKokyakuId": "0123456789", "eventCd": "EV0000000001"});
        assert!(reserve_schema().check(&body).is_ok());
    }

    #[test]
    fn test_issues_are_merged() {
        let body = json!({"gmsKokyakuId": "12ab", "extra": true});
        let err = reserve_schema().check(&body).unwrap_err();
        assert_eq!(err.message_code, "400_0009");
        assert_eq!(
            err.message_detail,
            "gmsKokyakuId: Invalid, gmsKokyakuId: String must contain exactly 10 character(s), \
             eventCd: Required, Unrecognized key(s) in object: 'extra'"
        );
    }

    #[test]
    fn test_wrong_type() {
        let body = json!({"gmsKokyakuId": 123, "eventCd": "EV0000000001"});
        let issues = reserve_schema().issues(&body);
        assert_eq!(issues, vec!["gmsKokyakuId: Expected string, received number"]);
    }

    #[test]
    fn test_integer_and_optional_fields() {
        let schema = Schema::object(vec![
            FieldRule::integer("count"),
            FieldRule::string("memo").optional().max(3),
        ]);
        assert!(schema.issues(&json!({"count": 1})).is_empty());
        assert_eq!(
            schema.issues(&json!({"count": 1.5, "memo": "abcd"})),
            vec![
                "count: Expected integer, received float",
                "memo: String must contain at most 3 character(s)"
            ]
        );
    }

    #[test]
    fn test_non_object_body() {
        let issues = reserve_schema().issues(&json!([1]));
        assert_eq!(issues, vec!["Expected object, received array"]);
    }
}
