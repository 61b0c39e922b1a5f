//! 응답 메시지 카탈로그
//!
//! 클라이언트에 돌려주는 모든 오류 메시지(`message_code`, `message`, `message_detail`)와
//! HTTP 상태 코드를 한 곳에서 관리합니다. 메시지 본문은 화면에 그대로 표시되므로
//! 운영 중인 클라이언트와 동일한 문구를 유지해야 합니다.

use serde::{Deserialize, Serialize};

/// 응답에 사용하는 HTTP 상태 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResStatus {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    MethodNotAllowed,
    UnsupportedMediaType,
    InternalServerError,
}

impl ResStatus {
    pub fn code(&self) -> u16 {
        match self {
            ResStatus::Ok => 200,
            ResStatus::BadRequest => 400,
            ResStatus::Unauthorized => 401,
            ResStatus::NotFound => 404,
            ResStatus::MethodNotAllowed => 405,
            ResStatus::UnsupportedMediaType => 415,
            ResStatus::InternalServerError => 500,
        }
    }
}

/// 클라이언트에 반환하는 오류 페이로드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResMessage {
    pub message_code: String,
    pub message: String,
    pub message_detail: String,
}

impl ResMessage {
    /// `message_detail` 앞에 접두어를 붙입니다 (일괄 요청의 행 번호 표시용).
    pub fn with_detail_prefix(mut self, prefix: &str) -> Self {
        self.message_detail = format!("{}{}", prefix, self.message_detail);
        self
    }
}

/// 메시지 정의
///
/// `detail`에는 `{1}`, `{2}`, `{3}` 위치 플레이스홀더가 들어갑니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTemplate {
    pub code: &'static str,
    pub message: &'static str,
    pub detail: &'static str,
}

impl MessageTemplate {
    /// 플레이스홀더를 채워 응답 메시지를 만듭니다.
    ///
    /// `args[0]`이 `{1}`, `args[1]`이 `{2}`에 대응하며 같은 번호는 모두 치환됩니다.
    pub fn render(&self, args: &[&str]) -> ResMessage {
        let mut detail = self.detail.to_string();
        for (index, arg) in args.iter().enumerate() {
            detail = detail.replace(&format!("{{{}}}", index + 1), arg);
        }
        ResMessage {
            message_code: self.code.to_string(),
            message: self.message.to_string(),
            message_detail: detail,
        }
    }

    /// 플레이스홀더가 없는 메시지
    pub fn plain(&self) -> ResMessage {
        self.render(&[])
    }
}

// 요청 파라미터 오류 (400)
pub const NOT_SPECIFIED: MessageTemplate = MessageTemplate {
    code: "400_0001",
    message: "指定が必須のパラメータが指定されていません。",
    detail: "「{1}」を指定して下さい。",
};
pub const UNDEFINED: MessageTemplate = MessageTemplate {
    code: "400_0002",
    message: "不要なパラメータが指定されています。",
    detail: "「{1}」を削除して下さい。",
};
pub const TYPE_INVALID: MessageTemplate = MessageTemplate {
    code: "400_0004",
    message: "パラメータの形式が正しくありません。",
    detail: "「{1}」は{2}形式で設定して下さい。「{3}」形式で設定されていました。",
};
pub const DATE_TYPE_INVALID: MessageTemplate = MessageTemplate {
    code: "400_0005",
    message: "パラメータの日付形式が正しくありません。",
    detail: "「{1}」は{2}形式で設定して下さい。「{3}」が設定されていました。",
};
pub const SIZE_INVALID: MessageTemplate = MessageTemplate {
    code: "400_0006",
    message: "パラメータのサイズが正しくありません。",
    detail: "「{1}」は{2}byte以下で設定して下さい。設定値は{3}byteでした。",
};
pub const VALUE_INVALID: MessageTemplate = MessageTemplate {
    code: "400_0007",
    message: "パラメータの値が有効ではありません。",
    detail: "「{1}」の設定値が「{2}」でした。",
};
pub const INVALID_JSON: MessageTemplate = MessageTemplate {
    code: "400_0008",
    message: "リクエストボディのJSON形式が正しくありません。",
    detail: "正しいJSON形式で指定して下さい。",
};
pub const INVALID_PARAM: MessageTemplate = MessageTemplate {
    code: "400_0009",
    message: "パラメータのチェックでエラーが発生しました。",
    detail: "{1}",
};

// 인증 오류 (401)
pub const AUTH_NOT_SPECIFIED: MessageTemplate = MessageTemplate {
    code: "401_0001",
    message: "認証情報が設定されていません。",
    detail: "認証情報を設定して下さい。",
};
pub const AUTH_FORMAT_INVALID: MessageTemplate = MessageTemplate {
    code: "401_0002",
    message: "認証情報の形式が正しくありません。",
    detail: "認証情報を正しい形式で設定して下さい。",
};
pub const AUTH_BASE64_DECODE_ERROR: MessageTemplate = MessageTemplate {
    code: "401_0003",
    message: "認証情報を復号できませんでした。",
    detail: "認証情報を正しい形式で設定して下さい。",
};
pub const AUTH_DECODED_STRING_INVALID: MessageTemplate = MessageTemplate {
    code: "401_0004",
    message: "認証キーの形式が正しくありません。",
    detail: "認証キーを正しい形式で設定して下さい。",
};
pub const AUTH_UNAUTHORIZED: MessageTemplate = MessageTemplate {
    code: "401_0005",
    message: "認証に失敗しました。",
    detail: "正しい認証キーを設定して下さい。",
};

// 그 외
pub const URL_NOT_FOUND: MessageTemplate = MessageTemplate {
    code: "404_0001",
    message: "リクエストされたURLは存在しません。",
    detail: "正しいURLにリクエストを送って下さい。リクエストURLは「{1}」でした。",
};
pub const METHOD_NOT_ALLOWED: MessageTemplate = MessageTemplate {
    code: "405_0001",
    message: "リクエストされたメソッドは使用できません。",
    detail: "正しいメソッドでリクエストを送って下さい。リクエストメソッドは「{1}」でした。",
};
pub const INTERNAL_SERVER_ERROR: MessageTemplate = MessageTemplate {
    code: "500_0001",
    message: "リクエストの処理中にエラーが発生しました。",
    detail: "{1} {2}",
};
pub const INTERNAL_SERVER_ERROR_DB: MessageTemplate = MessageTemplate {
    code: "500_0002",
    message: "リクエストの処理中にエラーが発生しました。",
    detail: "データベースの処理でエラーが発生しました。",
};
