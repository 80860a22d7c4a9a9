//! # 이력서 쿼리 모듈
//!
//! `resumes` 테이블에 대한 쿼리 함수들입니다.
//!
//! 모든 조회/갱신은 `WHERE id = ? AND user_id = ?` 조건 하나로 소유권을 확인합니다.
//! 문서가 없는 경우와 다른 사용자의 문서인 경우를 구분하지 않고 둘 다 `None`을 돌려줍니다.

use crate::error::AppError;
use crate::models::{Resume, ResumeData, ResumeRow, ResumeSummary};
use sqlx::SqlitePool;

/// 소유자의 이력서 하나를 조회합니다.
pub async fn find_resume(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<Resume>, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        SELECT id, name, user_id, template_id, data, created_at, updated_at
        FROM resumes
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(Resume::try_from).transpose()
}

/// 이력서 데이터 블롭 전체를 교체합니다.
///
/// 일치하는 행이 없으면(없는 문서이거나 소유자가 다름) `None`을 반환하며,
/// 이때 어떤 행도 바뀌지 않습니다.
pub async fn update_resume_data(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    data: &ResumeData,
) -> Result<Option<Resume>, AppError> {
    let json = serde_json::to_string(data)
        .map_err(|e| AppError::Internal(format!("Failed to encode resume data: {}", e)))?;

    let result = sqlx::query(
        r#"
        UPDATE resumes
        SET data = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(&json)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    find_resume(pool, id, user_id).await
}

/// 소유자의 이력서 목록. 최근 생성된 것이 먼저 옵니다.
pub async fn list_resumes(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ResumeSummary>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeSummary>(
        r#"
        SELECT id, name, template_id, created_at, updated_at
        FROM resumes
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(resumes)
}

/// 빈 데이터(`{}`)로 새 이력서를 만듭니다.
pub async fn create_resume(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    template_id: &str,
    name: &str,
) -> Result<Resume, AppError> {
    sqlx::query(
        r#"
        INSERT INTO resumes (id, name, user_id, template_id, data)
        VALUES (?, ?, ?, ?, '{}')
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(user_id)
    .bind(template_id)
    .execute(pool)
    .await?;

    find_resume(pool, id, user_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created resume".to_string()))
}
