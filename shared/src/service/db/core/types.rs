//! Common type definitions for database service
//!
//! Shared types used across database service modules

use crate::tool::messages::{ResMessage, INVALID_JSON, TYPE_INVALID};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query result row type - column name to value, in select order
pub type QueryRow = Map<String, Value>;

/// JSON 값의 타입 이름 (검증 메시지용)
///
/// 키가 없으면 `undefined`를 돌려줍니다.
pub fn json_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// 요청 파라미터 집합
///
/// 요청 바디(JSON 객체)의 키-값을 그대로 보관합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(Map<String, Value>);

impl RequestParams {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// 요청 바디를 파라미터 집합으로 변환합니다. 객체가 아니면 `INVALID_JSON`.
    pub fn from_body(body: Value) -> Result<Self, ResMessage> {
        match body {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(INVALID_JSON.plain()),
        }
    }

    /// 일괄 요청(객체 배열) 바디를 변환합니다.
    pub fn list_from_body(body: Value) -> Result<Vec<Self>, ResMessage> {
        let items = match body {
            Value::Array(items) => items,
            other => {
                return Err(TYPE_INVALID.render(&[
                    "body",
                    "array",
                    json_type_name(Some(&other)),
                ]))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                Self::from_body(item)
                    .map_err(|msg| msg.with_detail_prefix(&format!("rows[{}]: ", index)))
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 키가 있고 값이 `null`이 아닌지
    pub fn is_present(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(v) if !v.is_null())
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// 드라이버 수준 바인딩 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// 가변 길이 문자열
    VarChar,
    /// 가변 길이 유니코드 문자열
    NVarChar,
    Int,
    BigInt,
    DateTime,
    Bit,
}

impl SqlType {
    /// `CAST(? AS ...)` 에 쓰는 타입 이름
    pub fn cast_target(&self, length: Option<u32>) -> String {
        match (self, length) {
            (SqlType::VarChar, Some(len)) => format!("CHAR({})", len),
            (SqlType::NVarChar, Some(len)) => format!("CHAR({}) CHARACTER SET utf8mb4", len),
            (SqlType::VarChar, None) => "CHAR".to_string(),
            (SqlType::NVarChar, None) => "CHAR CHARACTER SET utf8mb4".to_string(),
            (SqlType::Int, _) | (SqlType::Bit, _) => "SIGNED".to_string(),
            (SqlType::BigInt, _) => "SIGNED".to_string(),
            (SqlType::DateTime, _) => "DATETIME(3)".to_string(),
        }
    }
}

/// 단일 문장 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// 반환 행 수, 반환 행이 없으면 영향 받은 행 수
    pub row_count: u64,
    pub rows: Vec<QueryRow>,
}

impl QueryResult {
    pub fn new(row_count: u64, rows: Vec<QueryRow>) -> Self {
        Self { row_count, rows }
    }
}

/// 저장 프로시저 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureResult {
    pub row_count: u64,
    pub rows: Vec<QueryRow>,
    /// 출력 파라미터 이름 → 값 (실행 성공 시에만 채워짐)
    pub output_parameters: Map<String, Value>,
}
