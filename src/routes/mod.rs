//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 API 라우터 구성입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 내 정보
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `resumes`: 대시보드, 이력서 생성/조회, 섹션 편집, 미리보기, PDF 내보내기
//! - `templates`: 템플릿 목록

pub mod auth;
pub mod health;
pub mod resumes;
pub mod templates;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub use health::*;
pub use resumes::*;
pub use templates::*;

/// `/api/v1` 아래의 모든 API 라우트
pub fn api_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me));

    let api_routes = Router::new()
        .merge(auth_routes)
        .route("/templates", get(list_templates))
        .route("/resumes", get(list_resumes).post(create_resume))
        .route("/resumes/{id}", get(get_resume))
        .route("/resumes/{id}/sections/{section}/form", get(get_section_form))
        .route("/resumes/{id}/sections/{section}", put(save_section))
        .route("/resumes/{id}/preview", get(get_preview))
        .route("/resumes/{id}/export", get(export_resume))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes)
}
