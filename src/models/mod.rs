//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `resume`: 이력서 문서와 DB 행, 대시보드 요약
//! - `resume_data`: 이력서 본문(인적 사항/학력/경력/기술)과 슬라이스
//! - `template`: 템플릿 참조 데이터
//! - `user`: 사용자와 인증 요청/응답
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Resume`처럼 짧게 접근합니다.

pub mod resume;
pub mod resume_data;
pub mod template;
pub mod user;

pub use resume::*;
pub use resume_data::*;
pub use template::*;
pub use user::*;
