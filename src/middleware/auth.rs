//! # 세션 인증
//!
//! `Authorization: Bearer <JWT>` 헤더로 세션을 표현합니다.
//!
//! 추출기 두 가지:
//! - `SessionContext`: 절대 거부하지 않습니다. 토큰이 없거나 잘못되면 `Unauthenticated`.
//!   이력서 편집 화면처럼 "로그인으로 보내기"를 컨트롤러가 직접 결정하는 곳에서 씁니다.
//! - `AuthUser`: 세션이 없으면 401로 거부합니다. 대시보드, 템플릿 목록 등에 씁니다.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub name: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// 인증된 사용자 `{id, name, email}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
        }
    }
}

/// 세션 상태. 컨트롤러는 생성 시 이 값을 받아 모든 동작을 이 상태로 제한합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    /// 세션 확인이 끝나지 않음
    Loading,
    Authenticated(SessionUser),
    Unauthenticated,
}

impl SessionContext {
    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            SessionContext::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, &state.jwt_secret) {
            Ok(user) => Ok(SessionContext::Authenticated(user)),
            Err(e) => {
                tracing::debug!("No session: {:?}", e);
                Ok(SessionContext::Unauthenticated)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: SessionUser,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = session_from_parts(parts, &state.jwt_secret)?;
        Ok(AuthUser { user })
    }
}

fn session_from_parts(parts: &Parts, secret: &str) -> Result<SessionUser, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?;

    verify_access_token(token, secret).map(SessionUser::from)
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

pub fn create_access_token(
    user: &SessionUser,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
