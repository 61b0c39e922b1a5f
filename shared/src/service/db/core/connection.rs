//! 연결 관리 모듈
//!
//! 요청마다 새 연결을 열고, 작업이 끝나면 성공/실패와 관계없이 닫습니다.
//! 실행기는 [`Connector`]/[`DbSession`] 트레이트에만 의존하므로
//! 테스트에서는 실제 데이터베이스 없이 세션을 바꿔 끼울 수 있습니다.

use crate::config::db::DbConfig;
use crate::service::db::core::procedure::ProcedureCall;
use crate::service::db::core::statement::{SqlParam, Statement};
use crate::service::db::core::types::{ProcedureResult, QueryResult, QueryRow, SqlType};
use crate::tool::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use futures::TryStreamExt;
use serde_json::{Map, Number, Value};
use sqlx::mysql::{MySqlArguments, MySqlColumn, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Connection, Either, Executor, MySql, Row, TypeInfo};
use std::time::Duration;
use tracing::{debug, error};

/// 열린 데이터베이스 세션 하나
#[async_trait]
pub trait DbSession: Send {
    /// 문장 하나를 실행하고 결과 행과 건수를 돌려줍니다.
    async fn run(&mut self, statement: &Statement) -> Result<QueryResult, AppError>;

    async fn begin(&mut self) -> Result<(), AppError>;

    async fn commit(&mut self) -> Result<(), AppError>;

    async fn rollback(&mut self) -> Result<(), AppError>;

    /// 세션을 닫습니다. 이미 닫혀 있으면 아무것도 하지 않습니다.
    async fn close(&mut self) -> Result<(), AppError>;

    /// 저장 프로시저 호출
    ///
    /// 출력 변수 초기화 → `CALL` → 출력 변수 조회 순서로 같은 세션에서 실행합니다.
    async fn call(&mut self, call: &ProcedureCall) -> Result<ProcedureResult, AppError> {
        for init in call.output_initializers() {
            self.run(&init).await?;
        }

        let result = self.run(&call.call_statement()).await?;

        let mut output_parameters = Map::new();
        if let Some(select) = call.output_select() {
            let outputs = self.run(&select).await?;
            if let Some(row) = outputs.rows.into_iter().next() {
                output_parameters = row;
            }
        }

        Ok(ProcedureResult {
            row_count: result.row_count,
            rows: result.rows,
            output_parameters,
        })
    }
}

/// 세션 생성기
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn DbSession>, AppError>;
}

/// MySQL 연결 생성기
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    options: MySqlConnectOptions,
    connect_timeout: Duration,
}

impl MySqlConnector {
    pub fn new(config: &DbConfig) -> Self {
        Self {
            options: config.connect_options(),
            connect_timeout: config.connect_timeout(),
        }
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(&self) -> Result<Box<dyn DbSession>, AppError> {
        let connecting = MySqlConnection::connect_with(&self.options);

        match tokio::time::timeout(self.connect_timeout, connecting).await {
            Ok(Ok(conn)) => {
                debug!("Database connection established.");
                Ok(Box::new(MySqlSession::new(conn)))
            }
            Ok(Err(e)) => {
                error!("Database connection established error. : {}", e);
                Err(AppError::DatabaseConnection(e.to_string()))
            }
            Err(_) => {
                error!(
                    "Database connection timed out after {:?}",
                    self.connect_timeout
                );
                Err(AppError::Timeout("Database connection timeout".to_string()))
            }
        }
    }
}

/// MySQL 세션
pub struct MySqlSession {
    conn: Option<MySqlConnection>,
}

impl MySqlSession {
    pub fn new(conn: MySqlConnection) -> Self {
        Self { conn: Some(conn) }
    }

    fn conn(&mut self) -> Result<&mut MySqlConnection, AppError> {
        self.conn
            .as_mut()
            .ok_or_else(|| AppError::DatabaseConnection("Connection is already closed.".to_string()))
    }

    /// 트랜잭션 제어문은 텍스트 프로토콜로 실행합니다.
    async fn execute_raw(&mut self, sql: &str) -> Result<(), AppError> {
        let conn = self.conn()?;
        conn.execute(sql).await.map_err(|e| {
            error!("SQL execution error. [{}] : {}", sql, e);
            AppError::from(e)
        })?;
        Ok(())
    }
}

#[async_trait]
impl DbSession for MySqlSession {
    async fn run(&mut self, statement: &Statement) -> Result<QueryResult, AppError> {
        let compiled = statement.compile();
        let conn = self.conn()?;

        let mut query = sqlx::query(&compiled.sql);
        for param in &compiled.bindings {
            query = bind_param(query, param);
        }

        let mut rows = Vec::new();
        let mut rows_affected = 0u64;
        let mut stream = query.fetch_many(&mut *conn);

        while let Some(item) = stream.try_next().await.map_err(|e| {
            error!("SQL execution error. Error on Request. : {}", e);
            AppError::from(e)
        })? {
            match item {
                Either::Left(done) => rows_affected += done.rows_affected(),
                Either::Right(row) => rows.push(row_to_map(&row)?),
            }
        }

        let row_count = if rows.is_empty() {
            rows_affected
        } else {
            rows.len() as u64
        };
        debug!("CNT: {}", row_count);

        Ok(QueryResult::new(row_count, rows))
    }

    async fn begin(&mut self) -> Result<(), AppError> {
        self.execute_raw("START TRANSACTION").await
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        self.execute_raw("COMMIT").await
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        self.execute_raw("ROLLBACK").await
    }

    async fn close(&mut self) -> Result<(), AppError> {
        match self.conn.take() {
            Some(conn) => {
                conn.close().await.map_err(|e| {
                    error!("Error while closing connection: {}", e);
                    AppError::DatabaseConnection(e.to_string())
                })?;
                debug!("Connection closed successfully.");
            }
            None => debug!("Connection is already closed."),
        }
        Ok(())
    }
}

/// 선언 타입에 맞춰 값을 바인딩합니다.
fn bind_param<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    param: &SqlParam,
) -> Query<'q, MySql, MySqlArguments> {
    let is_integer = matches!(param.sql_type, SqlType::Int | SqlType::BigInt | SqlType::Bit);

    match (&param.value, param.sql_type) {
        (Value::Null, SqlType::DateTime) => query.bind(None::<NaiveDateTime>),
        (Value::Null, _) if is_integer => query.bind(None::<i64>),
        (Value::Null, _) => query.bind(None::<String>),

        (Value::Bool(b), _) if is_integer => query.bind(i64::from(*b)),
        (Value::Number(n), _) if is_integer && n.as_i64().is_some() => query.bind(n.as_i64()),
        (Value::String(s), _) if is_integer => match s.trim().parse::<i64>() {
            Ok(i) => query.bind(i),
            Err(_) => query.bind(s.clone()),
        },

        (Value::String(s), SqlType::DateTime) => match parse_datetime(s) {
            Some(dt) => query.bind(dt),
            None => query.bind(s.clone()),
        },

        (Value::String(s), _) => query.bind(s.clone()),
        (Value::Number(n), SqlType::VarChar | SqlType::NVarChar) => query.bind(n.to_string()),
        (Value::Number(n), _) => match n.as_f64() {
            Some(f) => query.bind(f),
            None => query.bind(n.to_string()),
        },
        (Value::Bool(b), _) => query.bind(*b),
        (other, _) => query.bind(other.to_string()),
    }
}

/// ISO 8601 / `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DD` 문자열을 UTC 기준 시각으로
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// 날짜/시각 응답 형식 (`YYYY-MM-DDTHH:mm:ss.SSSZ`)
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// 결과 행을 컬럼 순서를 유지한 맵으로 변환
///
/// 컬럼 하나라도 디코딩에 실패하면 행 전체가 실패합니다.
fn row_to_map(row: &MySqlRow) -> Result<QueryRow, AppError> {
    let mut result = Map::new();

    for column in row.columns() {
        let value = column_value(row, column).map_err(|e| {
            error!("Column decode error. [{}] : {}", column.name(), e);
            AppError::DatabaseQuery(format!("Failed to decode column `{}`: {}", column.name(), e))
        })?;
        result.insert(column.name().to_string(), value.unwrap_or(Value::Null));
    }

    Ok(result)
}

fn column_value(row: &MySqlRow, column: &MySqlColumn) -> Result<Option<Value>, sqlx::Error> {
    let index = column.ordinal();
    let type_name = column.type_info().name().to_uppercase();

    let value = match type_name.as_str() {
        "BOOLEAN" => row.try_get::<Option<bool>, _>(index)?.map(Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)?
            .map(|v| Value::Number(Number::from(v))),
        // YEAR는 바이너리 프로토콜에서 2바이트 정수
        "YEAR" => row
            .try_get_unchecked::<Option<u16>, _>(index)?
            .map(|v| Value::Number(Number::from(v))),
        name if name.ends_with("UNSIGNED") => row
            .try_get::<Option<u64>, _>(index)?
            .map(|v| Value::Number(Number::from(v))),
        "FLOAT" | "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)?
            .and_then(Number::from_f64)
            .map(Value::Number),
        "DECIMAL" => row
            .try_get_unchecked::<Option<String>, _>(index)?
            .map(decimal_value),
        "DATETIME" | "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|dt| Value::String(format_datetime(&dt))),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string())),
        "TIME" => row
            .try_get::<Option<NaiveTime>, _>(index)?
            .map(|t| Value::String(format_time(&t))),
        "BIT" => row
            .try_get_unchecked::<Option<Vec<u8>>, _>(index)?
            .map(|bytes| bit_value(&bytes)),
        _ => text_value(row, index)?,
    };

    Ok(value)
}

// Default: 문자열, 문자 집합이 없는 컬럼(BLOB 등)은 바이트를 UTF-8로
fn text_value(row: &MySqlRow, index: usize) -> Result<Option<Value>, sqlx::Error> {
    match row.try_get::<Option<String>, _>(index) {
        Ok(val) => Ok(val.map(Value::String)),
        Err(sqlx::Error::ColumnDecode { .. }) => Ok(row
            .try_get_unchecked::<Option<Vec<u8>>, _>(index)?
            .map(|bytes| Value::String(String::from_utf8_lossy(&bytes).into_owned()))),
        Err(e) => Err(e),
    }
}

/// DECIMAL 문자열 → 숫자 (f64로 표현할 수 없으면 문자열 그대로)
fn decimal_value(text: String) -> Value {
    match text.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(text),
    }
}

/// 시각 응답 형식 (`HH:mm:ss`, 소수 초가 있으면 붙음)
pub fn format_time(t: &NaiveTime) -> String {
    t.format("%H:%M:%S%.f").to_string()
}

/// BIT(n) 값은 빅엔디언 바이트열
fn bit_value(bytes: &[u8]) -> Value {
    let value = bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Value::Number(Number::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_milli_opt(12, 30, 0, 500)
            .unwrap();
        assert_eq!(parse_datetime("2025-09-01T12:30:00.500Z"), Some(expected));
        assert_eq!(parse_datetime("2025-09-01 12:30:00.5"), Some(expected));
        assert_eq!(
            parse_datetime("2025-09-01"),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("not a date"), None);
    }

    #[test]
    fn test_format_datetime_has_millis_and_z() {
        let dt = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(format_datetime(&dt), "2025-09-01T09:00:00.000Z");
    }

    #[test]
    fn test_time_keeps_clock_value() {
        let t = NaiveTime::from_hms_opt(9, 5, 30).unwrap();
        assert_eq!(format_time(&t), "09:05:30");

        let t = NaiveTime::from_hms_milli_opt(23, 59, 59, 250).unwrap();
        assert_eq!(format_time(&t), "23:59:59.250");
    }

    #[test]
    fn test_bit_is_big_endian_number() {
        assert_eq!(bit_value(&[0x01]), Value::from(1));
        assert_eq!(bit_value(&[0x01, 0x02]), Value::from(258));
        assert_eq!(bit_value(&[]), Value::from(0));
    }

    #[test]
    fn test_decimal_value() {
        assert_eq!(decimal_value("12.50".to_string()), Value::from(12.5));
        assert_eq!(decimal_value("abc".to_string()), Value::from("abc"));
    }
}
