//! 저장 프로시저 호출
//!
//! `CALL name(?, CAST(? AS CHAR(n)), @out_X)` 형태로 호출하고,
//! 출력 파라미터는 세션 변수 `@out_X`로 받아 `SELECT`로 읽어옵니다.

use crate::service::db::core::statement::{SqlParam, Statement};
use crate::service::db::core::types::{RequestParams, SqlType};

/// 파라미터 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDirection {
    Input,
    Output,
}

/// 프로시저 파라미터 선언
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcParamSpec {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub direction: ParamDirection,
    /// 가변 길이 타입의 최대 길이
    pub length: Option<u32>,
}

impl ProcParamSpec {
    pub const fn input(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            direction: ParamDirection::Input,
            length: None,
        }
    }

    pub const fn output(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            direction: ParamDirection::Output,
            length: None,
        }
    }

    pub const fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// 저장 프로시저 선언
#[derive(Debug, Clone, Copy)]
pub struct StoredProcedure {
    pub name: &'static str,
    pub params: &'static [ProcParamSpec],
}

impl StoredProcedure {
    pub const fn new(name: &'static str, params: &'static [ProcParamSpec]) -> Self {
        Self { name, params }
    }

    /// 요청 값으로 호출을 만듭니다 (값은 소문자 요청 키에서, 없으면 `null`).
    pub fn build(&self, request: &RequestParams) -> ProcedureCall {
        let params = self
            .params
            .iter()
            .map(|spec| ProcedureParam {
                param: SqlParam::from_request(spec.name, spec.sql_type, request),
                direction: spec.direction,
                length: spec.length,
            })
            .collect();
        ProcedureCall {
            name: self.name.to_string(),
            params,
        }
    }
}

/// 값이 채워진 프로시저 파라미터
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureParam {
    pub param: SqlParam,
    pub direction: ParamDirection,
    pub length: Option<u32>,
}

impl ProcedureParam {
    pub fn is_output(&self) -> bool {
        self.direction == ParamDirection::Output
    }

    fn session_variable(&self) -> String {
        format!("@out_{}", self.param.name)
    }
}

/// 실행할 프로시저 호출
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    name: String,
    params: Vec<ProcedureParam>,
}

impl ProcedureCall {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ProcedureParam] {
        &self.params
    }

    pub fn has_outputs(&self) -> bool {
        self.params.iter().any(ProcedureParam::is_output)
    }

    /// 출력 변수 초기화 (`SET @out_X = NULL`)
    ///
    /// 요청 값은 바인딩하지 않습니다. 출력 변수는 항상 NULL에서 시작합니다.
    pub fn output_initializers(&self) -> Vec<Statement> {
        self.params
            .iter()
            .filter(|p| p.is_output())
            .map(|p| Statement::new(format!("SET {} = NULL", p.session_variable()), vec![]))
            .collect()
    }

    /// `CALL` 문장
    pub fn call_statement(&self) -> Statement {
        let args: Vec<String> = self
            .params
            .iter()
            .map(|p| match (p.direction, p.length) {
                (ParamDirection::Output, _) => p.session_variable(),
                (ParamDirection::Input, Some(length)) => format!(
                    "CAST(@{} AS {})",
                    p.param.name,
                    p.param.sql_type.cast_target(Some(length))
                ),
                (ParamDirection::Input, None) => format!("@{}", p.param.name),
            })
            .collect();

        let inputs = self
            .params
            .iter()
            .filter(|p| !p.is_output())
            .map(|p| p.param.clone())
            .collect();

        Statement::new(format!("CALL {}({})", self.name, args.join(", ")), inputs)
    }

    /// 출력 변수 조회 (`SELECT @out_X AS \`X\``)
    pub fn output_select(&self) -> Option<Statement> {
        let columns: Vec<String> = self
            .params
            .iter()
            .filter(|p| p.is_output())
            .map(|p| format!("{} AS `{}`", p.session_variable(), p.param.name))
            .collect();

        if columns.is_empty() {
            None
        } else {
            Some(Statement::new(format!("SELECT {}", columns.join(", ")), vec![]))
        }
    }

    /// 로그용 파라미터 설명
    pub fn describe_params(&self) -> String {
        self.params
            .iter()
            .enumerate()
            .map(|(index, p)| {
                format!(
                    "[{}] name: {} type: {:?} value: {} output: {} length: {}",
                    index,
                    p.param.name,
                    p.param.sql_type,
                    p.param.value,
                    p.is_output(),
                    p.length.map(|l| l.to_string()).unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const PARAMS: &[ProcParamSpec] = &[
        ProcParamSpec::input("ID", SqlType::VarChar).with_length(10),
        ProcParamSpec::input("PRIORITY", SqlType::Int),
        ProcParamSpec::output("RESULT_CD", SqlType::Int),
    ];
    const PROC: StoredProcedure = StoredProcedure::new("SP_TEST", PARAMS);

    #[test]
    fn test_call_statement_binds_inputs_only() {
        let call = PROC.build(&RequestParams::from_body(json!({"id": "0000000001"})).unwrap());
        let stmt = call.call_statement();
        assert_eq!(
            stmt.sql(),
            "CALL SP_TEST(CAST(@ID AS CHAR(10)), @PRIORITY, @out_RESULT_CD)"
        );

        let compiled = stmt.compile();
        assert_eq!(
            compiled.sql,
            "CALL SP_TEST(CAST(? AS CHAR(10)), ?, @out_RESULT_CD)"
        );
        assert_eq!(compiled.bindings[0].value, json!("0000000001"));
        assert_eq!(compiled.bindings[1].value, Value::Null);
    }

    #[test]
    fn test_output_statements() {
        let call = PROC.build(&RequestParams::new());
        assert!(call.has_outputs());

        let init = call.output_initializers();
        assert_eq!(init.len(), 1);
        assert_eq!(init[0].compile().sql, "SET @out_RESULT_CD = NULL");

        let select = call.output_select().unwrap();
        assert_eq!(select.sql(), "SELECT @out_RESULT_CD AS `RESULT_CD`");
    }

    #[test]
    fn test_request_value_never_seeds_output() {
        let request =
            RequestParams::from_body(json!({"id": "0000000001", "result_cd": 9})).unwrap();
        let init = PROC.build(&request).output_initializers();

        assert_eq!(init[0].sql(), "SET @out_RESULT_CD = NULL");
        assert!(init[0].params().is_empty());
        assert!(init[0].compile().bindings.is_empty());
    }

    #[test]
    fn test_no_outputs() {
        const INPUTS: &[ProcParamSpec] = &[ProcParamSpec::input("A", SqlType::VarChar)];
        let call = StoredProcedure::new("SP_A", INPUTS).build(&RequestParams::new());
        assert!(call.output_select().is_none());
        assert!(call.output_initializers().is_empty());
    }
}
