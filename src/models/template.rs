use serde::{Deserialize, Serialize};

/// 이력서 템플릿 (읽기 전용 참조 데이터)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub file_url: String,
    pub created_at: String,
}
