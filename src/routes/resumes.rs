//! # 이력서 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET  /api/v1/resumes`                               → 대시보드 목록
//! - `POST /api/v1/resumes`                               → 템플릿을 골라 새 이력서 생성
//! - `GET  /api/v1/resumes/{id}`                          → 이력서 (템플릿 포함)
//! - `GET  /api/v1/resumes/{id}/sections/{section}/form`  → 섹션 에디터 초기 폼 값
//! - `PUT  /api/v1/resumes/{id}/sections/{section}`       → 섹션 제출 (검증 → 저장)
//! - `GET  /api/v1/resumes/{id}/preview`                  → 미리보기 화면
//! - `GET  /api/v1/resumes/{id}/export`                   → PDF 다운로드
//!
//! 편집/미리보기/내보내기는 모두 `ResumeController`를 거칩니다.
//! 컨트롤러 상태는 다음처럼 응답으로 바뀝니다:
//! - `Redirecting(Login)` → 401
//! - `Redirecting(Dashboard)` → 404 (없는 문서와 남의 문서를 구분하지 않음)
//! - `Error` → 500 `store_error`

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::{
    controller::{ControllerState, Redirect, ResumeController},
    db::{self, ResumeStore, SqliteResumeStore},
    editor::{ListForm, SectionEditor, SectionForm, SubmitOutcome},
    error::AppError,
    middleware::auth::{AuthUser, SessionContext},
    models::*,
    schema::{EducationDraft, ExperienceDraft, PersonalInfoDraft, SkillCategoryDraft},
    services::{export, render},
    state::AppState,
};

const DEFAULT_RESUME_NAME: &str = "Untitled Resume";

pub async fn list_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let resumes = state.store().find_many(&auth.user.id).await?;
    Ok(Json(json!({ "resumes": resumes })))
}

pub async fn create_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    if db::get_template(&state.pool, &req.template_id).await?.is_none() {
        return Err(AppError::BadRequest("Unknown template".to_string()));
    }

    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_RESUME_NAME);

    let resume = state
        .store()
        .create(&auth.user.id, &req.template_id, name)
        .await?;
    tracing::info!(resume_id = %resume.id, template_id = %req.template_id, "Resume created");

    Ok((StatusCode::CREATED, Json(resume)))
}

/// 컨트롤러를 만들고 불러옵니다. `Ready`가 아니면 해당하는 에러로 끝냅니다.
async fn open(
    state: &AppState,
    session: SessionContext,
    id: &str,
) -> Result<ResumeController<SqliteResumeStore>, AppError> {
    let mut controller = ResumeController::new(state.store(), state.gate.clone(), session, id);

    let loaded_state = controller.load().await.clone();
    match loaded_state {
        ControllerState::Ready => Ok(controller),
        ControllerState::Redirecting(Redirect::Login) => {
            Err(AppError::Unauthorized("Session required".to_string()))
        }
        ControllerState::Redirecting(Redirect::Dashboard) => Err(AppError::NotFound),
        ControllerState::Error(message) => Err(AppError::Store(message)),
        ControllerState::Loading => Err(AppError::Conflict("Session is still loading".to_string())),
    }
}

fn loaded(controller: ResumeController<SqliteResumeStore>) -> Result<ResumeWithTemplate, AppError> {
    controller
        .into_document()
        .ok_or(AppError::Internal("Loaded controller has no document".to_string()))
}

pub async fn get_resume(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
) -> Result<Json<ResumeWithTemplate>, AppError> {
    let controller = open(&state, session, &id).await?;
    Ok(Json(loaded(controller)?))
}

/// 섹션 에디터의 초기 폼 값. 목록 섹션은 비어 있어도 빈 행 하나를 돌려줍니다.
pub async fn get_section_form(
    State(state): State<AppState>,
    session: SessionContext,
    Path((id, section)): Path<(String, Section)>,
) -> Result<Json<Value>, AppError> {
    let data = loaded(open(&state, session, &id).await?)?.resume.data;

    let values = match section {
        Section::Personal => SectionEditor::personal(data.personal.as_ref())
            .form()
            .to_form_values(),
        Section::Education => {
            SectionEditor::<ListForm<EducationDraft>>::list(section, &data.education)
                .form()
                .to_form_values()
        }
        Section::Experience => {
            SectionEditor::<ListForm<ExperienceDraft>>::list(section, &data.experience)
                .form()
                .to_form_values()
        }
        Section::Skills => {
            SectionEditor::<ListForm<SkillCategoryDraft>>::list(section, &data.skills)
                .form()
                .to_form_values()
        }
    };

    Ok(Json(json!({ "section": section, "values": values })))
}

/// 섹션 제출. 검증 실패는 422와 필드 경로별 메시지로 돌려줍니다.
pub async fn save_section(
    State(state): State<AppState>,
    session: SessionContext,
    Path((id, section)): Path<(String, Section)>,
    Json(body): Json<Value>,
) -> Result<Json<Resume>, AppError> {
    let controller = open(&state, session, &id).await?;

    match section {
        Section::Personal => submit::<PersonalInfoDraft>(controller, section, body).await,
        Section::Education => submit::<ListForm<EducationDraft>>(controller, section, body).await,
        Section::Experience => submit::<ListForm<ExperienceDraft>>(controller, section, body).await,
        Section::Skills => submit::<ListForm<SkillCategoryDraft>>(controller, section, body).await,
    }
}

async fn submit<F: SectionForm>(
    mut controller: ResumeController<SqliteResumeStore>,
    section: Section,
    body: Value,
) -> Result<Json<Resume>, AppError> {
    let form = F::from_form_values(body)
        .map_err(|e| AppError::BadRequest(format!("Malformed {} form: {}", section, e)))?;
    let editor = SectionEditor::new(section, form);

    let ctl = &mut controller;
    let outcome = editor
        .submit(move |output| async move {
            ctl.save_section(F::into_slice(output)).await.map(|_| ())
        })
        .await;

    match outcome {
        SubmitOutcome::Saved => Ok(Json(loaded(controller)?.resume)),
        SubmitOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        SubmitOutcome::SaveFailed(e) => Err(e),
        SubmitOutcome::Ignored => Err(AppError::Conflict(
            "A save is already in progress".to_string(),
        )),
    }
}

/// 응답 본문의 SHA-256으로 만든 강한 ETag
fn etag(bytes: &[u8]) -> String {
    format!("\"{:x}\"", Sha256::digest(bytes))
}

fn not_modified(headers: &HeaderMap, tag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.split(',').any(|candidate| candidate.trim() == tag))
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(format!("Invalid header value: {}", e)))
}

pub async fn get_preview(
    State(state): State<AppState>,
    session: SessionContext,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let document = loaded(open(&state, session, &id).await?)?;
    let surface = render::render(&document.resume.data, document.template.as_ref());

    let body = json!({
        "resumeId": document.resume.id,
        "name": document.resume.name,
        "surface": surface,
        "text": surface.to_text(),
    });
    let bytes = serde_json::to_vec(&body)
        .map_err(|e| AppError::Internal(format!("Failed to encode preview: {}", e)))?;
    let tag = etag(&bytes);

    if not_modified(&headers, &tag) {
        return Ok(
            (StatusCode::NOT_MODIFIED, [(header::ETAG, header_value(&tag)?)]).into_response(),
        );
    }

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::ETAG, header_value(&tag)?),
        ],
        bytes,
    )
        .into_response())
}

/// RFC 5987 `filename*` 값 (UTF-8 퍼센트 인코딩)
fn encode_ext_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// `attachment; filename="ascii.pdf"; filename*=UTF-8''원래이름.pdf`
fn content_disposition(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".pdf").unwrap_or(file_name);
    let ascii = match slug::slugify(stem) {
        s if s.is_empty() => "resume".to_string(),
        s => s,
    };
    format!(
        "attachment; filename=\"{}.pdf\"; filename*=UTF-8''{}",
        ascii,
        encode_ext_value(file_name)
    )
}

pub async fn export_resume(
    State(state): State<AppState>,
    session: SessionContext,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let document = loaded(open(&state, session, &id).await?)?;
    let surface = render::render(&document.resume.data, document.template.as_ref());
    let name = document.resume.name;

    let file = tokio::task::spawn_blocking(move || export::export_pdf(&surface, &name))
        .await
        .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;
    let tag = etag(&file.bytes);

    if not_modified(&headers, &tag) {
        return Ok(
            (StatusCode::NOT_MODIFIED, [(header::ETAG, header_value(&tag)?)]).into_response(),
        );
    }

    tracing::debug!(
        resume_id = %id,
        bytes = file.bytes.len(),
        cropped = file.placement.cropped,
        "Resume exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (
                header::CONTENT_DISPOSITION,
                header_value(&content_disposition(&file.file_name))?,
            ),
            (header::ETAG, header_value(&tag)?),
        ],
        file.bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_disposition_has_ascii_fallback() {
        assert_eq!(
            content_disposition("Ada's CV.pdf"),
            "attachment; filename=\"ada-s-cv.pdf\"; filename*=UTF-8''Ada%27s%20CV.pdf"
        );
        assert_eq!(
            content_disposition("!!!.pdf"),
            "attachment; filename=\"resume.pdf\"; filename*=UTF-8''%21%21%21.pdf"
        );
    }

    #[test]
    fn etag_matches_if_none_match_list() {
        let tag = etag(b"hello");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_NONE_MATCH,
            HeaderValue::from_str(&format!("\"other\", {tag}")).unwrap(),
        );
        assert!(not_modified(&headers, &tag));
        assert!(!not_modified(&HeaderMap::new(), &tag));
    }
}
