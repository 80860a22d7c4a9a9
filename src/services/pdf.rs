//! 한 페이지짜리 PDF 작성기
//!
//! 래스터의 텍스트 조각을 표준 14 폰트(Helvetica, Helvetica-Bold)로 A4 페이지에 씁니다.
//! 폰트를 내장하지 않으므로 WinAnsi(Latin-1 계열) 밖의 글자는 `?`로 바뀝니다.
//! 같은 입력이면 항상 같은 바이트가 나옵니다 (생성 시각 등 가변 메타데이터 없음).

use std::fmt::Write;

use super::export::{ExportError, PageWriter, Placement, Raster};

/// 1mm = 72/25.4 pt
const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfPageWriter;

/// PDF 문자열 리터럴 `( ... )` 안에 들어갈 수 있게 바꿉니다.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            '\t' => out.push(' '),
            ' '..='~' => out.push(c),
            // WinAnsiEncoding의 en dash
            '–' => out.push_str("\\226"),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

fn fmt_err(e: std::fmt::Error) -> ExportError {
    ExportError::Write(e.to_string())
}

impl PdfPageWriter {
    fn content_stream(
        &self,
        raster: &Raster,
        placement: &Placement,
    ) -> Result<String, ExportError> {
        let page_height_pt = placement.page_height_mm * PT_PER_MM;
        let mm_per_px = placement.mm_per_px(raster);
        let mut stream = String::new();

        for run in &raster.runs {
            let y_mm = run.y_px * mm_per_px;
            // 페이지 아래로 벗어난 조각은 그리지 않음
            if y_mm > placement.page_height_mm {
                continue;
            }
            let font = if run.bold { "F2" } else { "F1" };
            let size_pt = run.font_px * mm_per_px * PT_PER_MM;
            let x_pt = run.x_px * mm_per_px * PT_PER_MM;
            let y_pt = page_height_pt - y_mm * PT_PER_MM;

            writeln!(
                stream,
                "BT /{} {:.2} Tf {:.2} {:.2} Td ({}) Tj ET",
                font,
                size_pt,
                x_pt,
                y_pt,
                escape_text(&run.text)
            )
            .map_err(fmt_err)?;
        }

        Ok(stream)
    }
}

impl PageWriter for PdfPageWriter {
    fn write_page(&self, raster: &Raster, placement: &Placement) -> Result<Vec<u8>, ExportError> {
        if raster.width_px == 0 {
            return Err(ExportError::Write("raster has zero width".to_string()));
        }

        let stream = self.content_stream(raster, placement)?;
        let width_pt = placement.page_width_mm * PT_PER_MM;
        let height_pt = placement.page_height_mm * PT_PER_MM;

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width_pt:.2} {height_pt:.2}] \
                 /Resources << /Font << /F1 5 0 R /F2 6 0 R >> >> /Contents 4 0 R >>"
            ),
            format!("<< /Length {} >>\nstream\n{}endstream", stream.len(), stream),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (index, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            write!(out, "{} 0 obj\n{}\nendobj\n", index + 1, body).map_err(fmt_err)?;
        }

        let xref_offset = out.len();
        write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).map_err(fmt_err)?;
        for offset in offsets {
            write!(out, "{offset:010} 00000 n \n").map_err(fmt_err)?;
        }
        write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .map_err(fmt_err)?;

        Ok(out.into_bytes())
    }
}
