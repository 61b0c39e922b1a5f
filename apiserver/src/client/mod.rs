//! 외부 API 클라이언트

pub mod mypage;

pub use mypage::{HttpMyPageClient, MyPageClient, MyPageError, MyPageReply};
