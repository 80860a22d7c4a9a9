//! # 요청 미들웨어
//!
//! - `auth`: JWT 세션 토큰 발급/검증과 세션 추출기(`SessionContext`, `AuthUser`)

pub mod auth;
