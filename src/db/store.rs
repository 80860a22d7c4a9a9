//! # 저장소 경계 (ResumeStore)
//!
//! 이력서 컨트롤러는 SQL을 직접 알지 못하고 이 트레이트만 봅니다.
//! 모든 메서드는 소유자 ID를 받으며, 소유자가 다르면 없는 문서와 똑같이 취급합니다.
//!
//! 실제 구현은 `SqliteResumeStore` 하나이고, 테스트에서는 메모리 SQLite 풀을 씁니다.

use std::future::Future;

use sqlx::SqlitePool;

use super::{resumes, templates};
use crate::error::AppError;
use crate::models::{Resume, ResumeData, ResumeSummary, ResumeWithTemplate, Template};

pub trait ResumeStore: Send + Sync {
    /// `(id, owner)`로 문서 하나를 찾습니다. `include_template`이면 템플릿도 함께 싣습니다.
    fn find_one(
        &self,
        id: &str,
        owner: &str,
        include_template: bool,
    ) -> impl Future<Output = Result<Option<ResumeWithTemplate>, AppError>> + Send;

    /// `(id, owner)`가 일치하는 문서의 데이터를 통째로 교체합니다. 일치하는 문서가 없으면 `None`.
    fn update(
        &self,
        id: &str,
        owner: &str,
        data: &ResumeData,
    ) -> impl Future<Output = Result<Option<Resume>, AppError>> + Send;

    fn find_many(
        &self,
        owner: &str,
    ) -> impl Future<Output = Result<Vec<ResumeSummary>, AppError>> + Send;

    fn find_many_templates(&self) -> impl Future<Output = Result<Vec<Template>, AppError>> + Send;

    fn create(
        &self,
        owner: &str,
        template_id: &str,
        name: &str,
    ) -> impl Future<Output = Result<Resume, AppError>> + Send;
}

/// SQLite 풀 위의 `ResumeStore`
#[derive(Debug, Clone)]
pub struct SqliteResumeStore {
    pool: SqlitePool,
}

impl SqliteResumeStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ResumeStore for SqliteResumeStore {
    async fn find_one(
        &self,
        id: &str,
        owner: &str,
        include_template: bool,
    ) -> Result<Option<ResumeWithTemplate>, AppError> {
        let Some(resume) = resumes::find_resume(&self.pool, id, owner).await? else {
            return Ok(None);
        };

        let template = match (&resume.template_id, include_template) {
            (Some(template_id), true) => templates::get_template(&self.pool, template_id).await?,
            _ => None,
        };

        Ok(Some(ResumeWithTemplate { resume, template }))
    }

    async fn update(
        &self,
        id: &str,
        owner: &str,
        data: &ResumeData,
    ) -> Result<Option<Resume>, AppError> {
        resumes::update_resume_data(&self.pool, id, owner, data).await
    }

    async fn find_many(&self, owner: &str) -> Result<Vec<ResumeSummary>, AppError> {
        resumes::list_resumes(&self.pool, owner).await
    }

    async fn find_many_templates(&self) -> Result<Vec<Template>, AppError> {
        templates::list_templates(&self.pool).await
    }

    async fn create(&self, owner: &str, template_id: &str, name: &str) -> Result<Resume, AppError> {
        let id = uuid::Uuid::now_v7().to_string();
        resumes::create_resume(&self.pool, &id, owner, template_id, name).await
    }
}
