//! 요청 파라미터 검증
//!
//! 엔드포인트마다 [`ParamRules`]를 정적으로 선언하고 [`ParamRules::check`]로 검사합니다.
//! 검사 순서는 허용 키 → 필수 키 → 타입 → 크기 → 정수 범위 → 날짜이며,
//! 첫 번째 실패에서 바로 멈춥니다.

pub mod checks;
pub mod schema;

pub use checks::{
    validate_date_time_format_and_range, validate_extra_keys, validate_int_range,
    validate_key_sizes, validate_key_types, validate_required_keys,
};
pub use schema::{FieldKind, FieldRule, Schema};

use crate::service::db::core::types::RequestParams;
use crate::tool::messages::ResMessage;
use serde_json::Value;

/// 기대하는 파라미터 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }

    pub fn matches(&self, value: Option<&Value>) -> bool {
        matches!(
            (self, value),
            (ParamType::String, Some(Value::String(_)))
                | (ParamType::Number, Some(Value::Number(_)))
                | (ParamType::Boolean, Some(Value::Bool(_)))
                | (ParamType::Array, Some(Value::Array(_)))
                | (ParamType::Object, Some(Value::Object(_)))
        )
    }
}

/// 엔드포인트 파라미터 규칙
#[derive(Debug, Clone, Copy)]
pub struct ParamRules {
    pub allowed: &'static [&'static str],
    pub required: &'static [&'static str],
    pub types: &'static [(&'static str, ParamType)],
    pub sizes: &'static [(&'static str, usize)],
    pub int_keys: &'static [&'static str],
    pub date_keys: &'static [&'static str],
}

impl ParamRules {
    /// 허용 키만 지정한 규칙
    pub const fn allow(allowed: &'static [&'static str]) -> Self {
        Self {
            allowed,
            required: &[],
            types: &[],
            sizes: &[],
            int_keys: &[],
            date_keys: &[],
        }
    }

    pub const fn required(mut self, keys: &'static [&'static str]) -> Self {
        self.required = keys;
        self
    }

    pub const fn types(mut self, types: &'static [(&'static str, ParamType)]) -> Self {
        self.types = types;
        self
    }

    pub const fn sizes(mut self, sizes: &'static [(&'static str, usize)]) -> Self {
        self.sizes = sizes;
        self
    }

    pub const fn ints(mut self, keys: &'static [&'static str]) -> Self {
        self.int_keys = keys;
        self
    }

    pub const fn dates(mut self, keys: &'static [&'static str]) -> Self {
        self.date_keys = keys;
        self
    }

    /// 검사 체인을 실행합니다. 첫 번째 실패를 그대로 돌려줍니다.
    pub fn check(&self, params: &RequestParams) -> Result<(), ResMessage> {
        let failure = validate_extra_keys(params, self.allowed)
            .or_else(|| validate_required_keys(params, self.required))
            .or_else(|| validate_key_types(params, self.types))
            .or_else(|| validate_key_sizes(params, self.sizes))
            .or_else(|| validate_int_range(params, self.int_keys))
            .or_else(|| validate_date_time_format_and_range(params, self.date_keys));

        match failure {
            Some(msg) => Err(msg),
            None => Ok(()),
        }
    }

    /// 일괄 요청의 모든 행을 검사합니다.
    ///
    /// 실패한 첫 행의 메시지에 `rows[n]: ` 접두어를 붙여 돌려줍니다.
    pub fn check_each(&self, rows: &[RequestParams]) -> Result<(), ResMessage> {
        for (index, row) in rows.iter().enumerate() {
            self.check(row)
                .map_err(|msg| msg.with_detail_prefix(&format!("rows[{}]: ", index)))?;
        }
        Ok(())
    }
}
