//! # PDF 내보내기
//!
//! 미리보기 화면을 래스터로 그린 뒤(2배 배율) A4 한 장짜리 문서에 배치합니다.
//!
//! ```text
//! PreviewSurface ──Rasterizer──▶ Raster ──place──▶ Placement ──PageWriter──▶ PDF 바이트
//! ```
//!
//! - 래스터 너비를 페이지 너비(210mm)에 맞추고 높이는 비율대로 늘립니다.
//! - 한 페이지를 넘는 내용은 잘리며, `Placement::cropped`로 표시됩니다. 여러 페이지로 나누지 않습니다.
//! - 파일 이름은 `{표시 이름}.pdf`, 이름이 비어 있으면 `resume.pdf`입니다.

use serde::Serialize;
use thiserror::Error;

use super::pdf::PdfPageWriter;
use super::render::{LineKind, PreviewSurface};

/// 래스터 배율
pub const RASTER_SCALE: f32 = 2.0;

/// A4 (mm)
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// 미리보기 캔버스 너비 (CSS px, A4 폭 @96dpi)
const CANVAS_WIDTH_PX: f32 = 794.0;
/// 미리보기 캔버스 최소 높이 (CSS px, A4 높이 @96dpi)
const CANVAS_MIN_HEIGHT_PX: f32 = 1123.0;
const PADDING_PX: f32 = 32.0;
const LINE_HEIGHT: f32 = 1.5;
/// 평균 글자 폭 (폰트 크기 대비)
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    #[error("Failed to write document: {0}")]
    Write(String),
}

/// 래스터 위의 텍스트 한 조각. 좌표는 래스터 픽셀, `y_px`는 기준선입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub x_px: f32,
    pub y_px: f32,
    pub font_px: f32,
    pub bold: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Raster {
    pub width_px: u32,
    pub height_px: u32,
    pub scale: f32,
    pub runs: Vec<TextRun>,
}

/// 래스터가 페이지에 놓이는 위치와 크기
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub image_width_mm: f32,
    pub image_height_mm: f32,
    /// 이미지가 페이지 높이를 넘어 아래가 잘렸는지
    pub cropped: bool,
}

impl Placement {
    /// 너비를 페이지에 맞추고 높이는 비율대로 계산합니다.
    pub fn fit_width(raster: &Raster) -> Self {
        let image_width_mm = PAGE_WIDTH_MM;
        let image_height_mm = raster.height_px as f32 * image_width_mm / raster.width_px as f32;
        Self {
            page_width_mm: PAGE_WIDTH_MM,
            page_height_mm: PAGE_HEIGHT_MM,
            image_width_mm,
            image_height_mm,
            cropped: image_height_mm > PAGE_HEIGHT_MM,
        }
    }

    /// 래스터 1픽셀의 크기 (mm)
    pub fn mm_per_px(&self, raster: &Raster) -> f32 {
        self.image_width_mm / raster.width_px as f32
    }
}

pub trait Rasterizer {
    fn rasterize(&self, surface: &PreviewSurface, scale: f32) -> Result<Raster, ExportError>;
}

pub trait PageWriter {
    fn write_page(&self, raster: &Raster, placement: &Placement) -> Result<Vec<u8>, ExportError>;
}

/// 미리보기 화면을 고정 폭 캔버스에 배치하는 기본 래스터라이저
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceRasterizer;

struct LineStyle {
    font_px: f32,
    bold: bool,
    centered: bool,
    /// 줄 위 여백
    margin_top_px: f32,
}

fn style(kind: LineKind) -> LineStyle {
    let (font_px, bold, centered, margin_top_px) = match kind {
        LineKind::Title => (30.0, true, true, 0.0),
        LineKind::Subtitle => (20.0, false, true, 0.0),
        LineKind::Contact => (14.0, false, true, 4.0),
        LineKind::Heading => (18.0, true, false, 20.0),
        LineKind::ItemTitle => (16.0, true, false, 10.0),
        LineKind::ItemSubtitle | LineKind::Meta | LineKind::Body => (14.0, false, false, 0.0),
    };
    LineStyle {
        font_px,
        bold,
        centered,
        margin_top_px,
    }
}

fn text_width(text: &str, font_px: f32) -> f32 {
    text.chars().count() as f32 * font_px * AVG_CHAR_WIDTH_EM
}

/// 단어 단위 탐욕적 줄바꿈. 한 단어가 폭보다 길면 그 단어만으로 한 줄을 씁니다.
fn wrap(text: &str, font_px: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate_width = if current.is_empty() {
                text_width(word, font_px)
            } else {
                text_width(&current, font_px) + text_width(" ", font_px) + text_width(word, font_px)
            };
            if !current.is_empty() && candidate_width > max_width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

impl Rasterizer for SurfaceRasterizer {
    fn rasterize(&self, surface: &PreviewSurface, scale: f32) -> Result<Raster, ExportError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ExportError::Rasterize(format!("invalid scale {scale}")));
        }

        let content_width = CANVAS_WIDTH_PX - PADDING_PX * 2.0;
        let mut runs = Vec::new();
        let mut y = PADDING_PX;

        for line in &surface.lines {
            let style = style(line.kind);
            let line_height = style.font_px * LINE_HEIGHT;
            if !runs.is_empty() {
                y += style.margin_top_px;
            }

            for text in wrap(&line.text, style.font_px, content_width) {
                let x = if style.centered {
                    PADDING_PX + ((content_width - text_width(&text, style.font_px)) / 2.0).max(0.0)
                } else {
                    PADDING_PX
                };
                // 기준선은 줄 상자 아래쪽에서 글자 크기의 1/4 위
                let baseline = y + line_height - style.font_px * 0.25;
                runs.push(TextRun {
                    x_px: x * scale,
                    y_px: baseline * scale,
                    font_px: style.font_px * scale,
                    bold: style.bold,
                    text,
                });
                y += line_height;
            }
        }

        let height = (y + PADDING_PX).max(CANVAS_MIN_HEIGHT_PX);
        Ok(Raster {
            width_px: (CANVAS_WIDTH_PX * scale).round() as u32,
            height_px: (height * scale).ceil() as u32,
            scale,
            runs,
        })
    }
}

/// 내보낸 파일
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub placement: Placement,
}

/// `{표시 이름}.pdf`. 이름이 비어 있으면 `resume.pdf`.
pub fn export_file_name(display_name: &str) -> String {
    let name = display_name.trim();
    if name.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{name}.pdf")
    }
}

pub fn export_with(
    surface: &PreviewSurface,
    display_name: &str,
    rasterizer: &impl Rasterizer,
    writer: &impl PageWriter,
) -> Result<ExportedFile, ExportError> {
    let raster = rasterizer.rasterize(surface, RASTER_SCALE)?;
    let placement = Placement::fit_width(&raster);
    if placement.cropped {
        tracing::warn!(
            height_mm = placement.image_height_mm,
            "Resume is taller than one page; content below the page is cropped"
        );
    }

    let bytes = writer.write_page(&raster, &placement)?;
    Ok(ExportedFile {
        file_name: export_file_name(display_name),
        bytes,
        placement,
    })
}

/// 기본 래스터라이저와 PDF 작성기로 내보냅니다.
pub fn export_pdf(
    surface: &PreviewSurface,
    display_name: &str,
) -> Result<ExportedFile, ExportError> {
    export_with(surface, display_name, &SurfaceRasterizer, &PdfPageWriter)
}
