//! 에디터가 다루는 폼 값
//!
//! 폼 값의 JSON 모양은 화면의 폼과 같습니다.
//! - 인적 사항: `{ "fullName": "...", "email": "...", ... }`
//! - 학력/경력: `{ "items": [ {...}, ... ] }`
//! - 기술: `{ "categories": [ {...}, ... ] }`

use serde_json::{json, Value};

use crate::models::{PersonalInfo, SectionSlice};
use crate::schema::{validate_rows, PersonalInfoDraft, RowDraft, Validated};

/// 섹션 하나의 폼 상태
pub trait SectionForm: Sized + Send + Sync {
    /// 검증을 통과했을 때 얻는 슬라이스 값
    type Output: Send;

    fn validate(&self) -> Validated<Self::Output>;

    fn into_slice(output: Self::Output) -> SectionSlice;

    /// 요청 본문(폼 값 JSON)에서 폼 상태를 만듭니다.
    fn from_form_values(values: Value) -> Result<Self, serde_json::Error>;

    fn to_form_values(&self) -> Value;
}

impl SectionForm for PersonalInfoDraft {
    type Output = PersonalInfo;

    fn validate(&self) -> Validated<PersonalInfo> {
        PersonalInfoDraft::validate(self)
    }

    fn into_slice(output: PersonalInfo) -> SectionSlice {
        SectionSlice::Personal(output)
    }

    fn from_form_values(values: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(values)
    }

    fn to_form_values(&self) -> Value {
        json!(self)
    }
}

/// 반복 목록 폼. 항상 한 행 이상을 가집니다.
#[derive(Debug, Clone, PartialEq)]
pub struct ListForm<R: RowDraft> {
    rows: Vec<R>,
}

impl<R: RowDraft> ListForm<R> {
    /// 빈 목록이 들어오면 빈 행 하나로 채웁니다.
    pub fn new(rows: Vec<R>) -> Self {
        if rows.is_empty() {
            Self { rows: vec![R::default()] }
        } else {
            Self { rows }
        }
    }

    pub fn from_items(items: &[R::Item]) -> Self {
        Self::new(items.iter().map(R::from_item).collect())
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut R> {
        self.rows.get_mut(index)
    }

    pub fn append(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        true
    }
}

impl<R: RowDraft> SectionForm for ListForm<R> {
    type Output = Vec<R::Item>;

    fn validate(&self) -> Validated<Vec<R::Item>> {
        validate_rows(&self.rows)
    }

    fn into_slice(output: Vec<R::Item>) -> SectionSlice {
        R::into_slice(output)
    }

    /// `LIST_FIELD` 배열이 없거나 null이면 빈 목록으로 봅니다 (빈 행 하나가 됨).
    fn from_form_values(mut values: Value) -> Result<Self, serde_json::Error> {
        let rows = match values.get_mut(R::LIST_FIELD).map(Value::take) {
            Some(Value::Null) | None => Vec::new(),
            Some(list) => serde_json::from_value(list)?,
        };
        Ok(Self::new(rows))
    }

    fn to_form_values(&self) -> Value {
        json!({ R::LIST_FIELD: self.rows })
    }
}
