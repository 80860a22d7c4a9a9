//! # 섹션 에디터
//!
//! 네 개의 편집 화면(인적 사항, 학력, 경력, 기술)이 공통으로 쓰는 편집 상태입니다.
//!
//! 에디터 하나는 다음을 책임집니다:
//! 1. 초기값으로 폼을 채움 (목록 섹션은 비어 있어도 빈 행 하나를 보여줌)
//! 2. 필드별 입력 상태(draft)와 검증 에러 보관
//! 3. 목록 섹션의 행 추가/삭제 (마지막 한 행은 삭제 불가)
//! 4. 제출: 검증 → 성공 시 `on_save` 콜백 호출, 실패 시 필드 에러만 기록
//!
//! ## 저장 중 상태
//! 제출이 진행 중인 동안 `is_saving()`이 true이며, 이때 들어온 두 번째 제출은
//! 무시됩니다(`SubmitOutcome::Ignored`). 콜백 실패는 로그에 남기고 저장 중 상태를
//! 해제하며, 재시도하지 않습니다. 실패 자체는 `SubmitOutcome::SaveFailed`로
//! 호출자에게 돌려주지만 에디터 상태에는 배너 같은 에러를 남기지 않습니다.

pub mod form;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::AppError;
use crate::models::{PersonalInfo, Section};
use crate::schema::{FieldErrors, PersonalInfoDraft, RowDraft};

pub use form::{ListForm, SectionForm};

/// 제출 결과
#[derive(Debug)]
pub enum SubmitOutcome {
    /// 검증 통과 후 `on_save`가 성공함
    Saved,
    /// 검증 실패. 콜백은 호출되지 않음
    Invalid(FieldErrors),
    /// `on_save`가 실패함. 이미 로그에 기록됨
    SaveFailed(AppError),
    /// 이전 제출이 아직 진행 중이라 무시됨
    Ignored,
}

/// 섹션 에디터
pub struct SectionEditor<F: SectionForm> {
    section: Section,
    form: F,
    errors: Mutex<FieldErrors>,
    saving: AtomicBool,
}

/// drop될 때 저장 중 플래그를 내립니다. 콜백이 실패하거나 future가 취소돼도 해제됩니다.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<F: SectionForm> SectionEditor<F> {
    pub fn new(section: Section, form: F) -> Self {
        Self {
            section,
            form,
            errors: Mutex::new(FieldErrors::new()),
            saving: AtomicBool::new(false),
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// 필드 입력을 바꿀 때 사용합니다.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// 마지막 제출에서 기록된 필드 에러
    pub fn errors(&self) -> FieldErrors {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    fn set_errors(&self, errors: FieldErrors) {
        *self.errors.lock().unwrap_or_else(PoisonError::into_inner) = errors;
    }

    /// 폼을 검증하고, 통과하면 `on_save`에 검증된 슬라이스를 넘깁니다.
    pub async fn submit<C, Fut>(&self, on_save: C) -> SubmitOutcome
    where
        C: FnOnce(F::Output) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        if self
            .saving
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(section = %self.section, "submit ignored while a save is pending");
            return SubmitOutcome::Ignored;
        }
        let _guard = SavingGuard(&self.saving);

        let value = match self.form.validate().into_result() {
            Ok(value) => value,
            Err(errors) => {
                self.set_errors(errors.clone());
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.set_errors(FieldErrors::new());

        match on_save(value).await {
            Ok(()) => SubmitOutcome::Saved,
            Err(e) => {
                tracing::error!(section = %self.section, "Error saving section: {}", e);
                SubmitOutcome::SaveFailed(e)
            }
        }
    }
}

impl SectionEditor<PersonalInfoDraft> {
    /// 인적 사항 에디터. 저장된 값이 없으면 빈 폼으로 시작합니다.
    pub fn personal(initial: Option<&PersonalInfo>) -> Self {
        let draft = initial.map(PersonalInfoDraft::from).unwrap_or_default();
        Self::new(Section::Personal, draft)
    }
}

impl<R: RowDraft> SectionEditor<ListForm<R>> {
    /// 목록 에디터. 저장된 항목이 없으면 빈 행 하나로 시작합니다.
    pub fn list(section: Section, items: &[R::Item]) -> Self {
        Self::new(section, ListForm::from_items(items))
    }

    pub fn append(&mut self, row: R) {
        self.form.append(row);
    }

    pub fn append_blank(&mut self) {
        self.form.append(R::default());
    }

    /// 행을 삭제합니다. 마지막 한 행이거나 범위를 벗어나면 아무것도 하지 않고 false.
    pub fn remove(&mut self, index: usize) -> bool {
        self.form.remove(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceItem, SectionSlice};
    use crate::schema::{EducationDraft, ExperienceDraft, SkillCategoryDraft};
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn empty_list_starts_with_one_blank_row() {
        let editor = SectionEditor::<ListForm<EducationDraft>>::list(Section::Education, &[]);
        assert_eq!(editor.form().rows(), &[EducationDraft::default()]);
    }

    #[test]
    fn last_row_cannot_be_removed() {
        let mut editor = SectionEditor::<ListForm<SkillCategoryDraft>>::list(Section::Skills, &[]);
        assert!(!editor.remove(0));
        assert_eq!(editor.form().rows().len(), 1);

        editor.append_blank();
        editor.append(SkillCategoryDraft {
            name: "Tools".into(),
            skills: "Git".into(),
            ..Default::default()
        });
        assert_eq!(editor.form().rows().len(), 3);

        assert!(editor.remove(0));
        assert!(!editor.remove(5));
        assert!(editor.remove(0));
        assert!(!editor.remove(0));
        assert_eq!(editor.form().rows()[0].name, "Tools");
    }

    #[tokio::test]
    async fn invalid_submit_skips_callback_and_records_errors() {
        let editor = SectionEditor::personal(None);
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        let outcome = editor
            .submit(move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(editor.errors().contains("fullName"));
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn valid_submit_passes_slice_and_clears_errors() {
        let mut editor = SectionEditor::<ListForm<ExperienceDraft>>::list(Section::Experience, &[]);

        // 먼저 빈 행으로 제출해 에러를 남긴다
        let outcome = editor.submit(|_| async { Ok(()) }).await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert!(editor.errors().contains("items.0.company"));

        if let Some(row) = editor.form_mut().row_mut(0) {
            row.company = "Acme".into();
            row.position = "Engineer".into();
        }

        let mut saved: Option<SectionSlice> = None;
        let outcome = editor
            .submit(|items| {
                saved = Some(ListForm::<ExperienceDraft>::into_slice(items));
                async { Ok(()) }
            })
            .await;

        assert!(matches!(outcome, SubmitOutcome::Saved));
        assert!(editor.errors().is_empty());
        match saved {
            Some(SectionSlice::Experience(items)) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].company, "Acme");
            }
            other => panic!("unexpected slice: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_save_is_reported_and_clears_saving_state() {
        let editor = SectionEditor::<ListForm<ExperienceDraft>>::list(
            Section::Experience,
            &[ExperienceItem {
                company: "Acme".into(),
                position: "Engineer".into(),
                ..Default::default()
            }],
        );

        let outcome = editor
            .submit(|_| async { Err(AppError::Store("disk full".into())) })
            .await;

        assert!(matches!(outcome, SubmitOutcome::SaveFailed(AppError::Store(_))));
        assert!(!editor.is_saving());
        assert!(editor.errors().is_empty());
    }

    #[tokio::test]
    async fn second_submit_while_saving_is_ignored() {
        let editor = SectionEditor::personal(Some(&PersonalInfo {
            full_name: "Ada Lovelace".into(),
            email: "ada@x.com".into(),
            ..Default::default()
        }));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let slow = editor.submit(|_| async move {
            let _ = rx.await;
            Ok(())
        });
        let fast = editor.submit(|_| async { Ok(()) });
        let release = async {
            tokio::task::yield_now().await;
            assert!(editor.is_saving());
            let _ = tx.send(());
        };

        let (first, second, ()) = tokio::join!(slow, fast, release);
        assert!(matches!(first, SubmitOutcome::Saved));
        assert!(matches!(second, SubmitOutcome::Ignored));
        assert!(!editor.is_saving());
    }
}
