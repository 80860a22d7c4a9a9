//! # 신원 확인
//!
//! - `authenticate`: 이메일/비밀번호가 맞으면 `SessionUser`, 아니면 `None`.
//!   사용자가 없거나 비밀번호가 틀린 경우를 구분하지 않으며, 에러로 취급하지도 않습니다.
//! - `register`: 입력 검증 후 Argon2id 해시로 계정을 만듭니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::SqlitePool;

use crate::db::users as db_users;
use crate::error::AppError;
use crate::middleware::auth::SessionUser;
use crate::models::{Credentials, RegisterRequest, User};
use crate::schema::{check_field, Email, FieldErrors, Required};

const MIN_PASSWORD_LEN: usize = 8;

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

pub async fn authenticate(
    pool: &SqlitePool,
    credentials: &Credentials,
) -> Result<Option<SessionUser>, AppError> {
    let Some(user) = db_users::find_by_email(pool, credentials.email.trim()).await? else {
        return Ok(None);
    };

    let parsed_hash = match PasswordHash::new(&user.password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(user_id = %user.id, "Unreadable password hash: {}", e);
            return Ok(None);
        }
    };

    if Argon2::default()
        .verify_password(credentials.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Ok(None);
    }

    Ok(Some(user.into()))
}

pub async fn register(pool: &SqlitePool, req: &RegisterRequest) -> Result<User, AppError> {
    let name = req.name.trim();
    let email = req.email.trim();

    let mut errors = FieldErrors::new();
    check_field(&mut errors, "name", name, &[&Required("Name is required")]);
    check_field(&mut errors, "email", email, &[&Email("Invalid email address")]);
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("password", "Password must be at least 8 characters");
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if db_users::find_by_email(pool, email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = uuid::Uuid::now_v7().to_string();
    db_users::create_user(pool, &user_id, name, email, &password_hash).await
}
