//! # 이력서 컨트롤러
//!
//! 열린 이력서 하나의 작업 사본(`ResumeData`)을 소유하고, 불러오기와
//! 섹션 저장을 조율합니다.
//!
//! ## 상태 전이
//! ```text
//! Loading ──load──▶ Ready                  (세션 있음 + 본인 문서)
//!    │      ├─────▶ Redirecting(Login)     (세션 없음)
//!    │      ├─────▶ Redirecting(Dashboard) (없는 문서 또는 남의 문서)
//!    │      └─────▶ Error                  (저장소 장애)
//! Ready/Error ──save_section──▶ Ready | Error
//! ```
//! `Error`는 끝 상태가 아닙니다. 어떤 섹션이든 다시 저장하면 문서 전체 저장을 재시도합니다.
//!
//! ## 저장
//! 섹션 저장은 작업 사본의 슬라이스 하나만 교체한 뒤 문서 전체를 덮어씁니다.
//! 같은 문서의 저장은 `PersistGate`로 한 번에 하나씩만 진행되고, 쓰기 직전에
//! 저장소의 최신 데이터를 다시 읽어 이 컨트롤러가 바꾼 슬라이스만 얹습니다.
//! 그래서 거의 동시에 저장된 서로 다른 섹션이 서로를 지우지 않습니다.
//!
//! 저장에 실패해도 작업 사본은 되돌리지 않습니다. 다음 저장이 성공할 때까지
//! 화면과 저장소가 다를 수 있으며, 바뀐 섹션은 다음 저장에 함께 실립니다.

pub mod gate;

use std::collections::BTreeSet;

use crate::db::ResumeStore;
use crate::error::AppError;
use crate::middleware::auth::SessionContext;
use crate::models::{Resume, ResumeData, ResumeWithTemplate, Section, SectionSlice};

pub use gate::PersistGate;

/// 리다이렉트 대상
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Loading,
    Ready,
    Redirecting(Redirect),
    /// 저장소 장애. 화면에 닫을 수 있는 메시지로 보여줍니다.
    Error(String),
}

pub struct ResumeController<S: ResumeStore> {
    store: S,
    gate: PersistGate,
    session: SessionContext,
    resume_id: String,
    state: ControllerState,
    document: Option<ResumeWithTemplate>,
    /// 마지막 성공 저장 이후 작업 사본에서 바뀐 섹션
    dirty: BTreeSet<Section>,
}

impl<S: ResumeStore> ResumeController<S> {
    pub fn new(
        store: S,
        gate: PersistGate,
        session: SessionContext,
        resume_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gate,
            session,
            resume_id: resume_id.into(),
            state: ControllerState::Loading,
            document: None,
            dirty: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// 불러온 문서 (템플릿 포함)
    pub fn document(&self) -> Option<&ResumeWithTemplate> {
        self.document.as_ref()
    }

    /// 작업 사본
    pub fn data(&self) -> Option<&ResumeData> {
        self.document.as_ref().map(|doc| &doc.resume.data)
    }

    pub fn into_document(self) -> Option<ResumeWithTemplate> {
        self.document
    }

    /// 세션과 소유권을 확인하며 문서를 불러옵니다.
    pub async fn load(&mut self) -> &ControllerState {
        let user_id = match &self.session {
            SessionContext::Loading => return &self.state,
            SessionContext::Unauthenticated => {
                self.state = ControllerState::Redirecting(Redirect::Login);
                return &self.state;
            }
            SessionContext::Authenticated(user) => user.id.clone(),
        };

        match self.store.find_one(&self.resume_id, &user_id, true).await {
            Ok(Some(document)) => {
                self.document = Some(document);
                self.dirty.clear();
                self.state = ControllerState::Ready;
            }
            Ok(None) => {
                tracing::warn!(resume_id = %self.resume_id, "Resume not found for current user");
                self.state = ControllerState::Redirecting(Redirect::Dashboard);
            }
            Err(e) => {
                self.fail(e);
            }
        }

        &self.state
    }

    /// 섹션 하나를 작업 사본에 반영하고 문서 전체를 저장합니다.
    pub async fn save_section(&mut self, slice: SectionSlice) -> Result<Resume, AppError> {
        let Some(user_id) = self.session.user().map(|user| user.id.clone()) else {
            self.state = ControllerState::Redirecting(Redirect::Login);
            return Err(AppError::Unauthorized("Session required".to_string()));
        };

        if !matches!(self.state, ControllerState::Ready | ControllerState::Error(_)) {
            return Err(AppError::Conflict("Resume is not loaded".to_string()));
        }
        let Some(document) = self.document.as_mut() else {
            return Err(AppError::Conflict("Resume is not loaded".to_string()));
        };

        let section = slice.section();
        document.resume.data.replace(slice);
        self.dirty.insert(section);

        let _guard = self.gate.acquire(&self.resume_id).await;

        let latest = match self.store.find_one(&self.resume_id, &user_id, false).await {
            Ok(Some(latest)) => latest.resume.data,
            Ok(None) => return Err(self.lost_document()),
            Err(e) => return Err(self.fail(e)),
        };
        let mut merged = latest.clone();
        if let Some(working) = self.data() {
            for section in &self.dirty {
                if let Some(slice) = working.slice(*section) {
                    merged.replace(slice);
                }
            }
        }
        merged.assign_item_ids(&latest);

        match self.store.update(&self.resume_id, &user_id, &merged).await {
            Ok(Some(resume)) => {
                tracing::debug!(resume_id = %self.resume_id, %section, "Resume saved");
                if let Some(document) = self.document.as_mut() {
                    document.resume = resume.clone();
                }
                self.dirty.clear();
                self.state = ControllerState::Ready;
                Ok(resume)
            }
            Ok(None) => Err(self.lost_document()),
            Err(e) => Err(self.fail(e)),
        }
    }

    /// 저장 도중 문서가 사라졌거나 소유권이 바뀜
    fn lost_document(&mut self) -> AppError {
        tracing::warn!(resume_id = %self.resume_id, "Resume disappeared while saving");
        self.state = ControllerState::Redirecting(Redirect::Dashboard);
        AppError::NotFound
    }

    /// 저장소 장애를 `Error` 상태로 바꾸고, 호출자에게 돌려줄 에러를 만듭니다.
    fn fail(&mut self, e: AppError) -> AppError {
        tracing::error!(resume_id = %self.resume_id, "Resume store fault: {}", e);
        let message = e.to_string();
        self.state = ControllerState::Error(message.clone());
        AppError::Store(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::db::SqliteResumeStore;
    use crate::middleware::auth::SessionUser;
    use crate::models::{
        EducationItem, ExperienceItem, PersonalInfo, ResumeSummary, SkillCategory, Template,
    };
    use crate::editor::{ListForm, SectionEditor, SectionForm, SubmitOutcome};
    use crate::schema::EducationDraft;
    use crate::test_support::{seed_user, test_pool, CLASSIC_TEMPLATE_ID};
    use serde_json::json;

    fn session(user_id: &str) -> SessionContext {
        SessionContext::Authenticated(SessionUser {
            id: user_id.to_string(),
            name: "Tester".into(),
            email: "tester@x.com".into(),
        })
    }

    fn ada() -> SectionSlice {
        SectionSlice::Personal(PersonalInfo {
            full_name: "Ada Lovelace".into(),
            email: "ada@x.com".into(),
            ..Default::default()
        })
    }

    fn acme() -> SectionSlice {
        SectionSlice::Experience(vec![ExperienceItem {
            company: "Acme".into(),
            position: "Engineer".into(),
            start_date: Some("Jan 2020".into()),
            ..Default::default()
        }])
    }

    /// 앞의 `failures`번의 update를 실패시키는 저장소
    struct FlakyStore {
        inner: SqliteResumeStore,
        failures: AtomicUsize,
    }

    impl ResumeStore for FlakyStore {
        async fn find_one(
            &self,
            id: &str,
            owner: &str,
            include_template: bool,
        ) -> Result<Option<ResumeWithTemplate>, AppError> {
            self.inner.find_one(id, owner, include_template).await
        }

        async fn update(
            &self,
            id: &str,
            owner: &str,
            data: &ResumeData,
        ) -> Result<Option<Resume>, AppError> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(AppError::Internal("connection reset".into()));
            }
            self.inner.update(id, owner, data).await
        }

        async fn find_many(&self, owner: &str) -> Result<Vec<ResumeSummary>, AppError> {
            self.inner.find_many(owner).await
        }

        async fn find_many_templates(&self) -> Result<Vec<Template>, AppError> {
            self.inner.find_many_templates().await
        }

        async fn create(
            &self,
            owner: &str,
            template_id: &str,
            name: &str,
        ) -> Result<Resume, AppError> {
            self.inner.create(owner, template_id, name).await
        }
    }

    #[tokio::test]
    async fn load_resolves_to_ready_for_owner() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let store = SqliteResumeStore::new(pool);
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();

        let mut ctl = ResumeController::new(store, PersistGate::new(), session(&alice), &resume.id);
        assert_eq!(ctl.load().await, &ControllerState::Ready);
        assert_eq!(ctl.data(), Some(&ResumeData::default()));
        assert!(ctl.document().and_then(|d| d.template.as_ref()).is_some());
    }

    #[tokio::test]
    async fn load_redirects_without_session() {
        let pool = test_pool().await;
        let store = SqliteResumeStore::new(pool);

        let mut ctl = ResumeController::new(
            store.clone(),
            PersistGate::new(),
            SessionContext::Unauthenticated,
            "any",
        );
        assert_eq!(ctl.load().await, &ControllerState::Redirecting(Redirect::Login));

        let mut ctl =
            ResumeController::new(store, PersistGate::new(), SessionContext::Loading, "any");
        assert_eq!(ctl.load().await, &ControllerState::Loading);
    }

    #[tokio::test]
    async fn foreign_and_missing_documents_look_the_same() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let bob = seed_user(&pool, "bob@x.com").await;
        let store = SqliteResumeStore::new(pool);
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();

        let mut foreign =
            ResumeController::new(store.clone(), PersistGate::new(), session(&bob), &resume.id);
        let mut missing =
            ResumeController::new(store, PersistGate::new(), session(&bob), "missing");

        let foreign_state = foreign.load().await.clone();
        let missing_state = missing.load().await.clone();
        assert_eq!(foreign_state, ControllerState::Redirecting(Redirect::Dashboard));
        assert_eq!(foreign_state, missing_state);
    }

    #[tokio::test]
    async fn load_fault_enters_error_state() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let store = SqliteResumeStore::new(pool.clone());
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();
        pool.close().await;

        let mut ctl = ResumeController::new(store, PersistGate::new(), session(&alice), &resume.id);
        assert!(matches!(ctl.load().await, ControllerState::Error(_)));
    }

    #[tokio::test]
    async fn save_before_load_is_rejected() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let store = SqliteResumeStore::new(pool);
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();

        let mut ctl = ResumeController::new(store, PersistGate::new(), session(&alice), &resume.id);
        assert!(matches!(ctl.save_section(ada()).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn saved_items_round_trip_in_order_with_stable_ids() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let store = SqliteResumeStore::new(pool);
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();

        let items: Vec<EducationItem> = ["MIT", "ETH", "KAIST"]
            .into_iter()
            .map(|institution| EducationItem {
                institution: institution.into(),
                degree: "BSc".into(),
                ..Default::default()
            })
            .collect();

        let mut ctl =
            ResumeController::new(store.clone(), PersistGate::new(), session(&alice), &resume.id);
        ctl.load().await;
        let saved = ctl.save_section(SectionSlice::Education(items)).await.unwrap();
        assert!(saved.data.education.iter().all(|item| !item.identity.is_new()));

        let mut fresh =
            ResumeController::new(store, PersistGate::new(), session(&alice), &resume.id);
        fresh.load().await;
        let loaded = fresh.data().unwrap();
        let names: Vec<&str> = loaded.education.iter().map(|e| e.institution.as_str()).collect();
        assert_eq!(names, vec!["MIT", "ETH", "KAIST"]);
        assert_eq!(loaded.education, saved.data.education);

        // 같은 데이터를 다시 저장해도 항목이 늘거나 ID가 바뀌지 않음
        let education = loaded.education.clone();
        let again = fresh.save_section(SectionSlice::Education(education)).await.unwrap();
        assert_eq!(again.data, saved.data);
    }

    #[tokio::test]
    async fn submitted_ids_must_be_persisted_and_unique() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let store = SqliteResumeStore::new(pool);
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();

        let mut ctl =
            ResumeController::new(store.clone(), PersistGate::new(), session(&alice), &resume.id);
        ctl.load().await;
        let first = ctl
            .save_section(SectionSlice::Education(vec![EducationItem {
                institution: "MIT".into(),
                degree: "BSc".into(),
                ..Default::default()
            }]))
            .await
            .unwrap();
        let mit_id = first.data.education[0].identity.id().unwrap().to_string();

        // 폼에서 같은 ID를 두 번 보내고, 저장된 적 없는 ID도 섞어 보냄
        let form = ListForm::<EducationDraft>::from_form_values(json!({
            "items": [
                { "id": mit_id, "institution": "MIT", "degree": "BSc" },
                { "id": mit_id, "institution": "ETH", "degree": "MSc" },
                { "id": "forged-never-persisted", "institution": "EPFL", "degree": "PhD" }
            ]
        }))
        .unwrap();
        let editor = SectionEditor::new(Section::Education, form);
        let controller = &mut ctl;
        let outcome = editor
            .submit(move |items| async move {
                controller
                    .save_section(ListForm::<EducationDraft>::into_slice(items))
                    .await
                    .map(|_| ())
            })
            .await;
        assert!(matches!(outcome, SubmitOutcome::Saved));

        let stored = store.find_one(&resume.id, &alice, false).await.unwrap().unwrap();
        let ids: Vec<&str> = stored
            .resume
            .data
            .education
            .iter()
            .filter_map(|item| item.identity.id())
            .collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], mit_id);
        assert_ne!(ids[1], mit_id);
        assert_ne!(ids[2], "forged-never-persisted");
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[tokio::test]
    async fn save_replaces_only_the_named_slice() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let store = SqliteResumeStore::new(pool);
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();

        let mut ctl = ResumeController::new(store, PersistGate::new(), session(&alice), &resume.id);
        ctl.load().await;
        ctl.save_section(ada()).await.unwrap();
        let saved = ctl
            .save_section(SectionSlice::Skills(vec![SkillCategory {
                name: "Languages".into(),
                skills: "Rust, SQL".into(),
                ..Default::default()
            }]))
            .await
            .unwrap();

        assert_eq!(saved.data.personal.map(|p| p.full_name), Some("Ada Lovelace".into()));
        assert_eq!(saved.data.skills.len(), 1);
        assert!(saved.data.experience.is_empty());
    }

    #[tokio::test]
    async fn failed_persist_keeps_working_copy_and_can_be_retried() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let inner = SqliteResumeStore::new(pool);
        let resume = inner.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();
        let store = FlakyStore {
            inner: inner.clone(),
            failures: AtomicUsize::new(1),
        };

        let mut ctl = ResumeController::new(store, PersistGate::new(), session(&alice), &resume.id);
        ctl.load().await;

        let err = ctl.save_section(ada()).await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
        assert!(matches!(ctl.state(), ControllerState::Error(_)));
        // 작업 사본은 되돌리지 않음
        assert!(ctl.data().and_then(|d| d.personal.as_ref()).is_some());
        let stored = inner.find_one(&resume.id, &alice, false).await.unwrap().unwrap();
        assert!(stored.resume.data.personal.is_none());

        // 다른 섹션을 저장해도 실패했던 섹션이 함께 실림
        let saved = ctl.save_section(acme()).await.unwrap();
        assert_eq!(ctl.state(), &ControllerState::Ready);
        assert!(saved.data.personal.is_some());
        assert_eq!(saved.data.experience.len(), 1);
    }

    #[tokio::test]
    async fn back_to_back_saves_of_different_sections_are_both_kept() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice@x.com").await;
        let store = SqliteResumeStore::new(pool);
        let resume = store.create(&alice, CLASSIC_TEMPLATE_ID, "CV").await.unwrap();
        let gate = PersistGate::new();

        // 두 요청이 같은 (빈) 문서를 각각 불러온 상태
        let mut first =
            ResumeController::new(store.clone(), gate.clone(), session(&alice), &resume.id);
        let mut second =
            ResumeController::new(store.clone(), gate.clone(), session(&alice), &resume.id);
        first.load().await;
        second.load().await;

        let (a, b) = tokio::join!(first.save_section(ada()), second.save_section(acme()));
        a.unwrap();
        b.unwrap();

        let stored = store.find_one(&resume.id, &alice, false).await.unwrap().unwrap();
        assert!(stored.resume.data.personal.is_some());
        assert_eq!(stored.resume.data.experience.len(), 1);
    }

    #[tokio::test]
    async fn save_without_session_redirects_to_login() {
        let pool = test_pool().await;
        let store = SqliteResumeStore::new(pool);

        let mut ctl = ResumeController::new(
            store,
            PersistGate::new(),
            SessionContext::Unauthenticated,
            "any",
        );
        assert!(matches!(ctl.save_section(ada()).await, Err(AppError::Unauthorized(_))));
        assert_eq!(ctl.state(), &ControllerState::Redirecting(Redirect::Login));
    }
}
