//! 섹션별 폼 입력(draft)과 검증
//!
//! 입력 구조체의 모든 필드는 문자열이며, 빠진 필드는 빈 문자열로 채워집니다.
//! 검증을 통과하면 선택 필드의 빈 문자열은 `None`으로 정리됩니다.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{check_field, Email, FieldErrors, Required, UrlOrEmpty, Validated};
use crate::models::{
    EducationItem, ExperienceItem, ItemIdentity, PersonalInfo, SectionSlice, SkillCategory,
};

/// 빈 문자열(공백만 있는 경우 포함)을 `None`으로 바꿉니다.
fn optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ── 인적 사항 ──

/// 인적 사항 폼 입력
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfoDraft {
    pub full_name: String,
    pub job_title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    pub summary: String,
}

impl PersonalInfoDraft {
    pub fn validate(&self) -> Validated<PersonalInfo> {
        let mut errors = FieldErrors::new();
        check_field(
            &mut errors,
            "fullName",
            &self.full_name,
            &[&Required("Full name is required")],
        );
        check_field(&mut errors, "email", &self.email, &[&Email("Invalid email address")]);
        check_field(&mut errors, "website", &self.website, &[&UrlOrEmpty("Invalid URL")]);
        check_field(&mut errors, "linkedin", &self.linkedin, &[&UrlOrEmpty("Invalid URL")]);

        Validated::from_errors(errors, || PersonalInfo {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: optional(&self.phone),
            location: optional(&self.location),
            website: optional(&self.website),
            linkedin: optional(&self.linkedin),
            summary: optional(&self.summary),
            job_title: optional(&self.job_title),
        })
    }
}

impl From<&PersonalInfo> for PersonalInfoDraft {
    fn from(info: &PersonalInfo) -> Self {
        Self {
            full_name: info.full_name.clone(),
            job_title: text(&info.job_title),
            email: info.email.clone(),
            phone: text(&info.phone),
            location: text(&info.location),
            website: text(&info.website),
            linkedin: text(&info.linkedin),
            summary: text(&info.summary),
        }
    }
}

// ── 반복 목록 섹션 ──

/// 반복 목록(학력/경력/기술) 폼의 한 행
///
/// `Default`는 폼에 처음 보이는 빈 행입니다.
pub trait RowDraft: Clone + Default + Serialize + DeserializeOwned + Send + Sync {
    type Item: Send;

    /// 폼 값에서 목록이 들어 있는 필드 이름. 에러 경로의 접두사로도 쓰입니다.
    const LIST_FIELD: &'static str;

    /// 행 하나를 검증하여 `{LIST_FIELD}.{index}.{field}` 경로로 에러를 기록합니다.
    fn check(&self, index: usize, errors: &mut FieldErrors);

    /// 검증을 통과한 행을 슬라이스 항목으로 바꿉니다.
    fn into_item(self) -> Self::Item;

    fn from_item(item: &Self::Item) -> Self;

    fn into_slice(items: Vec<Self::Item>) -> SectionSlice;
}

fn row_path<R: RowDraft>(index: usize, field: &str) -> String {
    format!("{}.{}.{}", R::LIST_FIELD, index, field)
}

/// 목록 전체를 검증합니다. 행 순서는 그대로 유지됩니다.
pub fn validate_rows<R: RowDraft>(rows: &[R]) -> Validated<Vec<R::Item>> {
    let mut errors = FieldErrors::new();
    for (index, row) in rows.iter().enumerate() {
        row.check(index, &mut errors);
    }

    Validated::from_errors(errors, || rows.iter().cloned().map(R::into_item).collect())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
    pub gpa: String,
}

impl RowDraft for EducationDraft {
    type Item = EducationItem;
    const LIST_FIELD: &'static str = "items";

    fn check(&self, index: usize, errors: &mut FieldErrors) {
        check_field(
            errors,
            &row_path::<Self>(index, "institution"),
            &self.institution,
            &[&Required("Institution name is required")],
        );
        check_field(
            errors,
            &row_path::<Self>(index, "degree"),
            &self.degree,
            &[&Required("Degree is required")],
        );
    }

    fn into_item(self) -> EducationItem {
        EducationItem {
            identity: ItemIdentity::from(self.id),
            field_of_study: optional(&self.field_of_study),
            start_date: optional(&self.start_date),
            end_date: optional(&self.end_date),
            location: optional(&self.location),
            description: optional(&self.description),
            gpa: optional(&self.gpa),
            institution: self.institution,
            degree: self.degree,
        }
    }

    fn from_item(item: &EducationItem) -> Self {
        Self {
            id: item.identity.id().map(str::to_string),
            institution: item.institution.clone(),
            degree: item.degree.clone(),
            field_of_study: text(&item.field_of_study),
            start_date: text(&item.start_date),
            end_date: text(&item.end_date),
            location: text(&item.location),
            description: text(&item.description),
            gpa: text(&item.gpa),
        }
    }

    fn into_slice(items: Vec<EducationItem>) -> SectionSlice {
        SectionSlice::Education(items)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperienceDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub company: String,
    pub position: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
}

impl RowDraft for ExperienceDraft {
    type Item = ExperienceItem;
    const LIST_FIELD: &'static str = "items";

    fn check(&self, index: usize, errors: &mut FieldErrors) {
        check_field(
            errors,
            &row_path::<Self>(index, "company"),
            &self.company,
            &[&Required("Company name is required")],
        );
        check_field(
            errors,
            &row_path::<Self>(index, "position"),
            &self.position,
            &[&Required("Position is required")],
        );
    }

    fn into_item(self) -> ExperienceItem {
        ExperienceItem {
            identity: ItemIdentity::from(self.id),
            start_date: optional(&self.start_date),
            end_date: optional(&self.end_date),
            location: optional(&self.location),
            description: optional(&self.description),
            company: self.company,
            position: self.position,
        }
    }

    fn from_item(item: &ExperienceItem) -> Self {
        Self {
            id: item.identity.id().map(str::to_string),
            company: item.company.clone(),
            position: item.position.clone(),
            start_date: text(&item.start_date),
            end_date: text(&item.end_date),
            location: text(&item.location),
            description: text(&item.description),
        }
    }

    fn into_slice(items: Vec<ExperienceItem>) -> SectionSlice {
        SectionSlice::Experience(items)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillCategoryDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// 쉼표로 구분된 기술 목록 (예: "Rust, SQL, Docker")
    pub skills: String,
}

impl RowDraft for SkillCategoryDraft {
    type Item = SkillCategory;
    const LIST_FIELD: &'static str = "categories";

    fn check(&self, index: usize, errors: &mut FieldErrors) {
        check_field(
            errors,
            &row_path::<Self>(index, "name"),
            &self.name,
            &[&Required("Category name is required")],
        );
        check_field(
            errors,
            &row_path::<Self>(index, "skills"),
            &self.skills,
            &[&Required("At least one skill is required")],
        );
    }

    fn into_item(self) -> SkillCategory {
        SkillCategory {
            identity: ItemIdentity::from(self.id),
            name: self.name,
            skills: self.skills,
        }
    }

    fn from_item(item: &SkillCategory) -> Self {
        Self {
            id: item.identity.id().map(str::to_string),
            name: item.name.clone(),
            skills: item.skills.clone(),
        }
    }

    fn into_slice(items: Vec<SkillCategory>) -> SectionSlice {
        SectionSlice::Skills(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_personal() -> PersonalInfoDraft {
        PersonalInfoDraft {
            full_name: "Ada Lovelace".into(),
            email: "ada@x.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn personal_with_blank_links_is_valid() {
        let info = valid_personal().validate().into_result().unwrap();
        assert_eq!(info.full_name, "Ada Lovelace");
        assert_eq!(info.website, None);
        assert_eq!(info.linkedin, None);
        assert_eq!(info.job_title, None);
    }

    #[test]
    fn malformed_website_is_a_field_error_only() {
        let draft = PersonalInfoDraft {
            website: "ada.dev".into(),
            linkedin: "https://linkedin.com/in/ada".into(),
            ..valid_personal()
        };

        let errors = draft.validate().into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("website").unwrap(), ["Invalid URL".to_string()]);
        assert!(!errors.contains("linkedin"));
    }

    #[test]
    fn missing_required_personal_fields() {
        let errors = PersonalInfoDraft::default().validate().into_result().unwrap_err();
        assert_eq!(errors.get("fullName").unwrap(), ["Full name is required".to_string()]);
        assert_eq!(errors.get("email").unwrap(), ["Invalid email address".to_string()]);
    }

    #[test]
    fn row_errors_are_keyed_by_position() {
        let rows = vec![
            EducationDraft {
                institution: "MIT".into(),
                degree: "BSc".into(),
                ..Default::default()
            },
            EducationDraft::default(),
            EducationDraft {
                degree: "PhD".into(),
                ..Default::default()
            },
        ];

        let errors = validate_rows(&rows).into_result().unwrap_err();
        let paths: Vec<&str> = errors.paths().collect();
        assert_eq!(
            paths,
            vec!["items.1.degree", "items.1.institution", "items.2.institution"]
        );
        assert_eq!(
            errors.get("items.2.institution").unwrap(),
            ["Institution name is required".to_string()]
        );
    }

    #[test]
    fn skills_use_categories_prefix() {
        let rows = vec![SkillCategoryDraft {
            name: "Languages".into(),
            ..Default::default()
        }];
        let errors = validate_rows(&rows).into_result().unwrap_err();
        assert_eq!(
            errors.get("categories.0.skills").unwrap(),
            ["At least one skill is required".to_string()]
        );
    }

    #[test]
    fn valid_rows_keep_order_and_identity() {
        let rows = vec![
            ExperienceDraft {
                id: Some("exp-1".into()),
                company: "Acme".into(),
                position: "Engineer".into(),
                start_date: "Jan 2020".into(),
                ..Default::default()
            },
            ExperienceDraft {
                company: "Globex".into(),
                position: "Lead".into(),
                ..Default::default()
            },
        ];

        let items = validate_rows(&rows).into_result().unwrap();
        assert_eq!(items[0].identity.id(), Some("exp-1"));
        assert_eq!(items[0].start_date.as_deref(), Some("Jan 2020"));
        assert_eq!(items[0].end_date, None);
        assert!(items[1].identity.is_new());
        assert_eq!(items[1].company, "Globex");
    }

    #[test]
    fn draft_round_trips_through_item() {
        let item = EducationItem {
            identity: ItemIdentity::Existing("edu-9".into()),
            institution: "ETH".into(),
            degree: "MSc".into(),
            gpa: Some("5.5/6".into()),
            ..Default::default()
        };
        let draft = EducationDraft::from_item(&item);
        assert_eq!(draft.gpa, "5.5/6");
        assert_eq!(draft.field_of_study, "");
        assert_eq!(draft.into_item(), item);
    }
}
