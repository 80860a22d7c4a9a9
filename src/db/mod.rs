//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러와 컨트롤러는 이 모듈의 함수(또는 `ResumeStore`)를 통해 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `resumes`: 이력서 문서 조회/생성/데이터 갱신. 모든 쿼리는 소유자 조건을 함께 겁니다.
//! - `templates`: 템플릿 참조 데이터 조회
//! - `users`: 사용자 계정 쿼리
//! - `store`: 컨트롤러가 의존하는 저장소 경계(`ResumeStore`)와 SQLite 구현

pub mod resumes;
pub mod store;
pub mod templates;
pub mod users;

pub use store::{ResumeStore, SqliteResumeStore};
pub use templates::*;
