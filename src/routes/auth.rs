//! # 인증 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST /api/v1/auth/register` → 회원가입 후 토큰 발급
//! - `POST /api/v1/auth/login`    → 이메일/비밀번호 확인 후 토큰 발급
//! - `GET  /api/v1/auth/me`       → 현재 세션 사용자

use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{create_access_token, AuthUser, SessionUser},
    models::user::*,
    services::identity,
    state::AppState,
};
use axum::{extract::State, http::StatusCode, Json};

fn issue_token(state: &AppState, user: &SessionUser) -> Result<String, AppError> {
    create_access_token(user, &state.jwt_secret, state.session_ttl_minutes)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let user = identity::register(&state.pool, &req).await?;
    tracing::info!(user_id = %user.id, "User registered");

    let access_token = issue_token(&state, &SessionUser::from(user.clone()))?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            access_token,
        }),
    ))
}

/// 자격 증명이 맞지 않으면 401. 사용자가 없는 경우와 비밀번호가 틀린 경우를 구분하지 않습니다.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    let session = identity::authenticate(&state.pool, &credentials)
        .await?
        .ok_or(AppError::Unauthorized("Invalid email or password".to_string()))?;

    let user = db_users::find_by_id(&state.pool, &session.id)
        .await?
        .ok_or(AppError::Unauthorized("Invalid email or password".to_string()))?;
    let access_token = issue_token(&state, &session)?;

    Ok(Json(AuthResponse {
        user: user.into(),
        access_token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user.id)
        .await?
        .ok_or(AppError::Unauthorized("User no longer exists".to_string()))?;

    Ok(Json(user.into()))
}
