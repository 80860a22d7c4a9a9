//! # 미리보기 렌더링
//!
//! `ResumeData`를 줄 단위의 미리보기 화면(`PreviewSurface`)으로 바꾸는 순수 함수입니다.
//! 같은 입력이면 항상 같은 결과를 돌려줍니다.
//!
//! ## 규칙
//! - 섹션 순서: 인적 사항 → 경력 → 학력 → 기술
//! - 비어 있거나 없는 섹션은 제목도 자리표시자도 그리지 않음
//! - 목록 항목은 저장된 순서대로
//! - 빈 문자열 필드는 없는 필드와 같게 취급
//! - 기간: 시작/종료가 모두 있으면 `시작 – 종료`, 하나만 있으면 그 값만, 둘 다 없으면 줄 없음

use serde::Serialize;

use crate::models::{
    EducationItem, ExperienceItem, PersonalInfo, ResumeData, SkillCategory, Template,
};

/// 시작일과 종료일 사이 구분자 (en dash)
pub const DATE_SEPARATOR: &str = " – ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// 이름
    Title,
    /// 직함
    Subtitle,
    /// 연락처 한 줄
    Contact,
    /// 섹션 제목
    Heading,
    /// 항목 제목 (직위, 학위, 카테고리 이름)
    ItemTitle,
    /// 항목 부제 (회사, 학교)
    ItemSubtitle,
    /// 위치, 기간, GPA
    Meta,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceLine {
    pub kind: LineKind,
    pub text: String,
}

/// 렌더링된 미리보기 화면
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSurface {
    /// 템플릿 이름 (본문이 아닌 장식용 정보)
    pub template: Option<String>,
    pub lines: Vec<SurfaceLine>,
}

impl PreviewSurface {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 한 줄에 하나씩 이어 붙인 일반 텍스트
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

struct SurfaceBuilder {
    lines: Vec<SurfaceLine>,
}

impl SurfaceBuilder {
    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(SurfaceLine {
            kind,
            text: text.into(),
        });
    }

    /// 값이 있고 비어 있지 않을 때만 줄을 추가합니다.
    fn push_opt(&mut self, kind: LineKind, text: Option<&str>) {
        if let Some(text) = present(text) {
            self.push(kind, text);
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// 기간 표시. 둘 다 없으면 `None`.
pub fn date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (present(start), present(end)) {
        (Some(start), Some(end)) => Some(format!("{start}{DATE_SEPARATOR}{end}")),
        (Some(one), None) | (None, Some(one)) => Some(one.to_string()),
        (None, None) => None,
    }
}

pub fn render(data: &ResumeData, template: Option<&Template>) -> PreviewSurface {
    let mut out = SurfaceBuilder { lines: Vec::new() };

    if let Some(personal) = &data.personal {
        render_personal(&mut out, personal);
    }
    if !data.experience.is_empty() {
        out.push(LineKind::Heading, "Work Experience");
        data.experience.iter().for_each(|item| render_experience(&mut out, item));
    }
    if !data.education.is_empty() {
        out.push(LineKind::Heading, "Education");
        data.education.iter().for_each(|item| render_education(&mut out, item));
    }
    if !data.skills.is_empty() {
        out.push(LineKind::Heading, "Skills");
        data.skills.iter().for_each(|category| render_skills(&mut out, category));
    }

    PreviewSurface {
        template: template.map(|t| t.name.clone()),
        lines: out.lines,
    }
}

fn render_personal(out: &mut SurfaceBuilder, personal: &PersonalInfo) {
    let name = present(Some(personal.full_name.as_str())).unwrap_or("Your Name");
    out.push(LineKind::Title, name);
    out.push_opt(LineKind::Subtitle, personal.job_title.as_deref());

    let contact: Vec<&str> = [
        Some(personal.email.as_str()),
        personal.phone.as_deref(),
        personal.location.as_deref(),
        personal.website.as_deref(),
        personal.linkedin.as_deref(),
    ]
    .into_iter()
    .filter_map(present)
    .collect();
    if !contact.is_empty() {
        out.push(LineKind::Contact, contact.join(" | "));
    }

    if let Some(summary) = present(personal.summary.as_deref()) {
        out.push(LineKind::Heading, "Professional Summary");
        out.push(LineKind::Body, summary);
    }
}

fn render_experience(out: &mut SurfaceBuilder, item: &ExperienceItem) {
    out.push(LineKind::ItemTitle, item.position.as_str());
    out.push(LineKind::ItemSubtitle, item.company.as_str());
    out.push_opt(LineKind::Meta, item.location.as_deref());
    out.push_opt(
        LineKind::Meta,
        date_range(item.start_date.as_deref(), item.end_date.as_deref()).as_deref(),
    );
    out.push_opt(LineKind::Body, item.description.as_deref());
}

fn render_education(out: &mut SurfaceBuilder, item: &EducationItem) {
    let title = match present(item.field_of_study.as_deref()) {
        Some(field) => format!("{}, {}", item.degree, field),
        None => item.degree.clone(),
    };
    out.push(LineKind::ItemTitle, title);
    out.push(LineKind::ItemSubtitle, item.institution.as_str());
    out.push_opt(LineKind::Meta, item.location.as_deref());
    out.push_opt(
        LineKind::Meta,
        date_range(item.start_date.as_deref(), item.end_date.as_deref()).as_deref(),
    );
    if let Some(gpa) = present(item.gpa.as_deref()) {
        out.push(LineKind::Meta, format!("GPA: {gpa}"));
    }
    out.push_opt(LineKind::Body, item.description.as_deref());
}

fn render_skills(out: &mut SurfaceBuilder, category: &SkillCategory) {
    out.push(LineKind::ItemTitle, category.name.as_str());
    out.push(LineKind::Body, category.skills.as_str());
}
