//! # 스키마 & 검증
//!
//! 폼에서 올라온 섹션 입력(draft)을 타입이 있는 슬라이스로 바꾸거나,
//! 실패한 필드 경로별 메시지 맵을 돌려줍니다. 검증은 절대 패닉하거나
//! 에러를 던지지 않고 항상 `Validated` 값으로 끝납니다.
//!
//! - `rules`: 필드 하나에 적용하는 선언적 규칙 (필수, 이메일, URL 또는 빈 문자열)
//! - `sections`: 섹션별 입력 구조체와 검증 함수
//!
//! 필드 간 교차 검증은 없습니다. 각 필드는 독립적으로 평가됩니다.

pub mod rules;
pub mod sections;

use std::collections::BTreeMap;

use serde::Serialize;

pub use rules::{Email, Required, Rule, UrlOrEmpty};
pub use sections::*;

/// 필드 경로 → 에러 메시지 목록
///
/// 경로 예시: `fullName`, `items.2.institution`, `categories.0.skills`.
/// UI가 반복 목록 안의 필드를 위치로 찾을 수 있도록 인덱스를 포함합니다.
/// `BTreeMap`이므로 직렬화 순서가 항상 같습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_default().push(message.into());
    }

    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 에러가 있는 필드 수
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// 검증 결과. `Valid`면 타입이 있는 값, `Invalid`면 필드별 에러입니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    Valid(T),
    Invalid(FieldErrors),
}

impl<T> Validated<T> {
    /// 수집된 에러가 없으면 `build`로 값을 만들고, 있으면 `Invalid`를 반환합니다.
    pub fn from_errors(errors: FieldErrors, build: impl FnOnce() -> T) -> Self {
        if errors.is_empty() {
            Validated::Valid(build())
        } else {
            Validated::Invalid(errors)
        }
    }

    pub fn into_result(self) -> Result<T, FieldErrors> {
        match self {
            Validated::Valid(value) => Ok(value),
            Validated::Invalid(errors) => Err(errors),
        }
    }
}

/// 필드 하나에 규칙들을 순서대로 적용하고, 실패한 규칙의 메시지를 모두 기록합니다.
pub fn check_field(errors: &mut FieldErrors, path: &str, value: &str, rules: &[&dyn Rule]) {
    for rule in rules {
        if let Err(message) = rule.check(value) {
            errors.push(path, message);
        }
    }
}
