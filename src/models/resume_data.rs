//! # 이력서 데이터(ResumeData) 모델
//!
//! 하나의 이력서 문서가 담는 네 개의 슬라이스(slice)를 정의합니다.
//! - `personal`: 인적 사항 (최대 하나)
//! - `education`: 학력 목록 (입력 순서 = 표시 순서)
//! - `experience`: 경력 목록
//! - `skills`: 기술 카테고리 목록
//!
//! 각 슬라이스는 서로 독립적이며, 언제든 비어 있을 수 있습니다.
//! DB에는 이 구조체 전체가 camelCase JSON 블롭으로 저장됩니다.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// 반복 항목(학력/경력/기술 카테고리)의 식별 상태
///
/// JSON에서는 선택적인 `id` 필드 하나로 표현됩니다.
/// - `id`가 없으면 아직 저장된 적 없는 새 항목(`New`)
/// - `id`가 있으면 이미 저장된 항목(`Existing`)
///
/// 새 항목은 처음으로 저장에 성공할 때 고정 ID를 부여받습니다.
/// 클라이언트가 보낸 `id`는 저장소에 실제로 있는 ID일 때만 유지됩니다
/// (`ResumeData::assign_item_ids` 참고).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ItemIdentity {
    #[default]
    New,
    Existing(String),
}

impl ItemIdentity {
    pub fn is_new(&self) -> bool {
        matches!(self, ItemIdentity::New)
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            ItemIdentity::New => None,
            ItemIdentity::Existing(id) => Some(id),
        }
    }

    fn fresh() -> Self {
        ItemIdentity::Existing(uuid::Uuid::now_v7().to_string())
    }
}

impl From<Option<String>> for ItemIdentity {
    fn from(id: Option<String>) -> Self {
        match id {
            Some(id) if !id.is_empty() => ItemIdentity::Existing(id),
            _ => ItemIdentity::New,
        }
    }
}

impl From<ItemIdentity> for Option<String> {
    fn from(identity: ItemIdentity) -> Self {
        match identity {
            ItemIdentity::New => None,
            ItemIdentity::Existing(id) => Some(id),
        }
    }
}

/// 인적 사항 슬라이스
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

/// 학력 항목
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    #[serde(default, rename = "id", skip_serializing_if = "ItemIdentity::is_new")]
    pub identity: ItemIdentity,
    pub institution: String,
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    /// 자유 형식 문자열 (날짜로 파싱하지 않음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
}

/// 경력 항목
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    #[serde(default, rename = "id", skip_serializing_if = "ItemIdentity::is_new")]
    pub identity: ItemIdentity,
    pub company: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// 기술 카테고리
///
/// `skills`는 쉼표로 구분된 자유 텍스트이며 개별 기술로 분해하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    #[serde(default, rename = "id", skip_serializing_if = "ItemIdentity::is_new")]
    pub identity: ItemIdentity,
    pub name: String,
    pub skills: String,
}

/// 이력서 데이터 전체 (문서 집합체)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal: Option<PersonalInfo>,
    pub education: Vec<EducationItem>,
    pub experience: Vec<ExperienceItem>,
    pub skills: Vec<SkillCategory>,
}

/// 슬라이스 이름. URL 경로(`/sections/{section}`)에서도 이 이름을 씁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Personal,
    Education,
    Experience,
    Skills,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Personal => "personal",
            Section::Education => "education",
            Section::Experience => "experience",
            Section::Skills => "skills",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 검증을 통과한 슬라이스 하나. 섹션 에디터가 저장할 때 컨트롤러로 넘깁니다.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionSlice {
    Personal(PersonalInfo),
    Education(Vec<EducationItem>),
    Experience(Vec<ExperienceItem>),
    Skills(Vec<SkillCategory>),
}

impl SectionSlice {
    pub fn section(&self) -> Section {
        match self {
            SectionSlice::Personal(_) => Section::Personal,
            SectionSlice::Education(_) => Section::Education,
            SectionSlice::Experience(_) => Section::Experience,
            SectionSlice::Skills(_) => Section::Skills,
        }
    }
}

impl ResumeData {
    /// 슬라이스 하나를 통째로 교체합니다. 나머지 세 슬라이스는 건드리지 않습니다.
    pub fn replace(&mut self, slice: SectionSlice) {
        match slice {
            SectionSlice::Personal(info) => self.personal = Some(info),
            SectionSlice::Education(items) => self.education = items,
            SectionSlice::Experience(items) => self.experience = items,
            SectionSlice::Skills(categories) => self.skills = categories,
        }
    }

    /// 지정한 섹션의 현재 값을 슬라이스로 꺼냅니다.
    /// 인적 사항이 아직 없으면 `None`입니다.
    pub fn slice(&self, section: Section) -> Option<SectionSlice> {
        match section {
            Section::Personal => self.personal.clone().map(SectionSlice::Personal),
            Section::Education => Some(SectionSlice::Education(self.education.clone())),
            Section::Experience => Some(SectionSlice::Experience(self.experience.clone())),
            Section::Skills => Some(SectionSlice::Skills(self.skills.clone())),
        }
    }

    /// 반복 항목의 ID를 확정합니다. `persisted`는 저장소에 있는 현재 문서입니다.
    ///
    /// 목록마다 다음 항목은 새 UUIDv7을 받습니다:
    /// - ID가 없는 새 항목
    /// - `persisted`의 같은 목록에 없는 ID (저장된 적 없는 ID)
    /// - 같은 목록 안에서 앞 항목이 이미 쓴 ID (두 번째부터)
    pub fn assign_item_ids(&mut self, persisted: &ResumeData) {
        assign_list_ids(
            self.education.iter_mut().map(|item| &mut item.identity),
            persisted.education.iter().map(|item| &item.identity),
        );
        assign_list_ids(
            self.experience.iter_mut().map(|item| &mut item.identity),
            persisted.experience.iter().map(|item| &item.identity),
        );
        assign_list_ids(
            self.skills.iter_mut().map(|item| &mut item.identity),
            persisted.skills.iter().map(|item| &item.identity),
        );
    }
}

fn assign_list_ids<'a, 'b>(
    items: impl Iterator<Item = &'a mut ItemIdentity>,
    persisted: impl Iterator<Item = &'b ItemIdentity>,
) {
    let known: HashSet<&str> = persisted.filter_map(ItemIdentity::id).collect();
    let mut seen: HashSet<String> = HashSet::new();

    for identity in items {
        let keep = identity
            .id()
            .is_some_and(|id| known.contains(id) && seen.insert(id.to_string()));
        if !keep {
            *identity = ItemIdentity::fresh();
        }
    }
}
