//! # 템플릿 쿼리
//!
//! 템플릿은 마이그레이션으로 심어지는 읽기 전용 참조 데이터입니다.

use crate::error::AppError;
use crate::models::Template;
use sqlx::SqlitePool;

/// 모든 템플릿을 조회합니다. 최근 추가된 템플릿이 먼저 옵니다.
pub async fn list_templates(pool: &SqlitePool) -> Result<Vec<Template>, AppError> {
    let templates = sqlx::query_as::<_, Template>(
        r#"
        SELECT id, name, description, thumbnail_url, file_url, created_at
        FROM templates
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(templates)
}

pub async fn get_template(pool: &SqlitePool, id: &str) -> Result<Option<Template>, AppError> {
    let template = sqlx::query_as::<_, Template>(
        r#"
        SELECT id, name, description, thumbnail_url, file_url, created_at
        FROM templates
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(template)
}
