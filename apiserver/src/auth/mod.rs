//! 인증 모듈

pub mod authentication;

pub use authentication::{authenticate, date_hash, jst_date};
