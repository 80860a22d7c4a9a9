//! # 서비스 계층
//!
//! DB나 HTTP에 묶이지 않는 도메인 로직입니다.
//! - `identity`: 비밀번호 해싱과 자격 증명 확인
//! - `render`: 이력서 데이터 → 미리보기 화면
//! - `export`: 미리보기 화면 → 래스터 → 한 페이지 PDF
//! - `pdf`: PDF 바이트 작성기

pub mod export;
pub mod identity;
pub mod pdf;
pub mod render;
