use serde::{Deserialize, Serialize};

use super::{ResumeData, Template};
use crate::error::AppError;

/// `resumes` 테이블의 한 행. `data`는 아직 파싱하지 않은 JSON 문자열입니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ResumeRow {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub template_id: Option<String>,
    pub data: String,
    pub created_at: String,
    pub updated_at: String,
}

/// 이력서 문서
///
/// 소유자(`user_id`)는 생성 후 바뀌지 않으며, 템플릿은 최대 하나입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resume {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub template_id: Option<String>,
    pub data: ResumeData,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ResumeRow> for Resume {
    type Error = AppError;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        let data = serde_json::from_str(&row.data).map_err(|e| {
            AppError::Internal(format!("Corrupt resume data for {}: {}", row.id, e))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            user_id: row.user_id,
            template_id: row.template_id,
            data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// 템플릿 정보를 포함한 이력서 (`findOne(..., includeTemplate)`의 결과)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumeWithTemplate {
    #[serde(flatten)]
    pub resume: Resume,
    pub template: Option<Template>,
}

/// 대시보드 목록용 요약 (데이터 블롭 제외)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ResumeSummary {
    pub id: String,
    pub name: String,
    pub template_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub template_id: String,
    pub name: Option<String>,
}
