//! # 템플릿 라우트 핸들러
//!
//! - `GET /api/v1/templates` → 템플릿 목록 (최근 추가된 것 먼저)

use crate::{db::ResumeStore, error::AppError, middleware::auth::AuthUser, state::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn list_templates(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let templates = state.store().find_many_templates().await?;
    Ok(Json(json!({ "templates": templates })))
}
