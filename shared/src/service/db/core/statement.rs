//! SQL 문장 조립
//!
//! 템플릿의 `@NAME` 플레이스홀더에는 요청 값이 바인딩으로만 전달됩니다.
//! 텍스트로 치환되는 것은 선택 조건 토큰(`$event_id$` 등)뿐이며,
//! 치환 여부는 값의 내용이 아니라 존재 여부로만 결정됩니다.

use crate::service::db::core::types::{RequestParams, SqlType};
use serde_json::Value;

/// 템플릿의 고정 파라미터 선언
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub sql_type: SqlType,
}

impl ParamSpec {
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self { name, sql_type }
    }

    pub const fn varchar(name: &'static str) -> Self {
        Self::new(name, SqlType::VarChar)
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, SqlType::Int)
    }
}

/// 선택 조건 토큰
///
/// `param` 요청 값이 있으면 `token`을 `fragment`로 바꾸고, 없으면 지웁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClauseToken {
    pub token: &'static str,
    pub param: &'static str,
    pub fragment: &'static str,
}

impl ClauseToken {
    pub const fn new(token: &'static str, param: &'static str, fragment: &'static str) -> Self {
        Self {
            token,
            param,
            fragment,
        }
    }
}

/// SQL 템플릿 (불변, 요청마다 새 [`Statement`]를 만듭니다)
#[derive(Debug, Clone, Copy)]
pub struct SqlTemplate {
    pub sql: &'static str,
    pub clauses: &'static [ClauseToken],
    pub params: &'static [ParamSpec],
}

impl SqlTemplate {
    pub const fn new(sql: &'static str, params: &'static [ParamSpec]) -> Self {
        Self {
            sql,
            clauses: &[],
            params,
        }
    }

    pub const fn with_clauses(mut self, clauses: &'static [ClauseToken]) -> Self {
        self.clauses = clauses;
        self
    }

    /// 조건 토큰을 처리한 SQL 텍스트
    pub fn render_sql(&self, request: &RequestParams) -> String {
        self.clauses.iter().fold(self.sql.to_string(), |sql, clause| {
            let replacement = if request.is_present(clause.param) {
                clause.fragment
            } else {
                ""
            };
            sql.replace(clause.token, replacement)
        })
    }

    /// 요청으로 실행할 문장을 만듭니다.
    ///
    /// 각 파라미터 값은 이름을 소문자로 바꾼 요청 키에서 가져오고, 없으면 `null`입니다.
    pub fn build(&self, request: &RequestParams) -> Statement {
        let params = self
            .params
            .iter()
            .map(|spec| SqlParam::from_request(spec.name, spec.sql_type, request))
            .collect();
        Statement::new(self.render_sql(request), params)
    }
}

/// 바인딩 파라미터
#[derive(Debug, Clone, PartialEq)]
pub struct SqlParam {
    pub name: String,
    pub sql_type: SqlType,
    pub value: Value,
}

impl SqlParam {
    pub fn new(name: impl Into<String>, sql_type: SqlType, value: Value) -> Self {
        Self {
            name: name.into(),
            sql_type,
            value,
        }
    }

    pub fn from_request(name: &str, sql_type: SqlType, request: &RequestParams) -> Self {
        let value = request
            .get(&name.to_lowercase())
            .cloned()
            .unwrap_or(Value::Null);
        Self::new(name, sql_type, value)
    }
}

/// 한 번의 왕복으로 실행되는 문장
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlParam>,
}

/// 위치 기반(`?`)으로 바꾼 문장
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement<'a> {
    pub sql: String,
    pub bindings: Vec<&'a SqlParam>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// 로그용 한 줄 SQL
    pub fn sql_for_log(&self) -> String {
        self.sql
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// `@NAME` 플레이스홀더를 `?`로 바꾸고 바인딩 순서를 정합니다.
    ///
    /// - 이름은 대소문자를 구분하지 않습니다.
    /// - 같은 이름이 여러 번 나오면 나온 횟수만큼 바인딩합니다.
    /// - 따옴표/백틱 안, `@@` 시스템 변수, 선언되지 않은 `@변수`는 그대로 둡니다.
    pub fn compile(&self) -> CompiledStatement<'_> {
        let chars: Vec<char> = self.sql.chars().collect();
        let mut sql = String::with_capacity(self.sql.len());
        let mut bindings = Vec::new();
        let mut quote: Option<char> = None;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if let Some(q) = quote {
                sql.push(c);
                if c == q {
                    quote = None;
                }
                i += 1;
                continue;
            }

            match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    sql.push(c);
                    i += 1;
                }
                '@' if chars.get(i + 1) == Some(&'@') => {
                    sql.push_str("@@");
                    i += 2;
                }
                '@' => {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && is_ident_char(chars[end]) {
                        end += 1;
                    }
                    let name: String = chars[start..end].iter().collect();
                    match self.find_param(&name) {
                        Some(param) if !name.is_empty() => {
                            sql.push('?');
                            bindings.push(param);
                        }
                        _ => {
                            sql.push('@');
                            sql.push_str(&name);
                        }
                    }
                    i = end;
                }
                _ => {
                    sql.push(c);
                    i += 1;
                }
            }
        }

        CompiledStatement { sql, bindings }
    }

    fn find_param(&self, name: &str) -> Option<&SqlParam> {
        self.params
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EVENT_PARAMS: &[ParamSpec] = &[ParamSpec::varchar("EVENT_ID")];
    const EVENT_CLAUSES: &[ClauseToken] = &[ClauseToken::new(
        "$event_id$",
        "event_id",
        "AND EVENT_ID = @EVENT_ID",
    )];
    const EVENT_TEMPLATE: SqlTemplate = SqlTemplate::new(
        "SELECT * FROM VT_EVENT WHERE 0=0 $event_id$ ORDER BY EVENT_START_TIME",
        EVENT_PARAMS,
    )
    .with_clauses(EVENT_CLAUSES);

    fn request(value: Value) -> RequestParams {
        RequestParams::from_body(value).unwrap()
    }

    #[test]
    fn test_clause_is_substituted_when_present() {
        let stmt = EVENT_TEMPLATE.build(&request(json!({"event_id": "E-0001"})));
        assert_eq!(
            stmt.sql(),
            "SELECT * FROM VT_EVENT WHERE 0=0 AND EVENT_ID = @EVENT_ID ORDER BY EVENT_START_TIME"
        );
        assert_eq!(stmt.params()[0].value, json!("E-0001"));
    }

    #[test]
    fn test_clause_is_removed_when_absent_or_null() {
        for body in [json!({}), json!({"event_id": null})] {
            let stmt = EVENT_TEMPLATE.build(&request(body));
            assert_eq!(
                stmt.sql(),
                "SELECT * FROM VT_EVENT WHERE 0=0  ORDER BY EVENT_START_TIME"
            );
            assert_eq!(stmt.params()[0].value, Value::Null);
        }
    }

    #[test]
    fn test_request_values_never_reach_sql_text() {
        let stmt = EVENT_TEMPLATE.build(&request(json!({"event_id": "x' OR '1'='1"})));
        assert!(!stmt.sql().contains("OR '1'"));
        assert_eq!(stmt.compile().sql.matches('?').count(), 1);
    }

    #[test]
    fn test_params_are_exactly_the_declared_names() {
        const PARAMS: &[ParamSpec] = &[ParamSpec::varchar("A"), ParamSpec::int("B")];
        let template = SqlTemplate::new("UPDATE T SET A = @A WHERE B = @B", PARAMS);
        let stmt = template.build(&request(json!({"a": "x"})));
        let pairs: Vec<(&str, &Value)> = stmt
            .params()
            .iter()
            .map(|p| (p.name.as_str(), &p.value))
            .collect();
        assert_eq!(pairs, vec![("A", &json!("x")), ("B", &Value::Null)]);
    }

    #[test]
    fn test_compile_positional_placeholders() {
        let stmt = Statement::new(
            "SELECT '@A', @@version, @a, `@B` FROM T WHERE X = @A AND Y = @b AND Z = @other",
            vec![
                SqlParam::new("A", SqlType::VarChar, json!("1")),
                SqlParam::new("B", SqlType::Int, json!(2)),
            ],
        );
        let compiled = stmt.compile();
        assert_eq!(
            compiled.sql,
            "SELECT '@A', @@version, ?, `@B` FROM T WHERE X = ? AND Y = ? AND Z = @other"
        );
        let names: Vec<&str> = compiled.bindings.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "A", "B"]);
    }

    #[test]
    fn test_sql_for_log_is_single_line() {
        let stmt = Statement::new("SELECT\n    A\n  FROM T\n", vec![]);
        assert_eq!(stmt.sql_for_log(), "SELECT A FROM T");
    }
}
