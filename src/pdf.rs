use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::error::PdfError;

/// Per-page text provider. Pages are 1-based.
pub trait PageSource {
    fn page_numbers(&self) -> Vec<u32>;
    fn page_text(&self, page: u32) -> Result<String, PdfError>;
}

pub struct PdfDocument {
    doc: Document,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let doc = Document::load(path).map_err(|source| PdfError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let pages = doc.get_pages();
        Ok(PdfDocument { doc, pages })
    }

    pub fn inner(&self) -> &Document {
        &self.doc
    }

    /// Page number → page object, ascending.
    pub fn pages(&self) -> &BTreeMap<u32, ObjectId> {
        &self.pages
    }
}

impl PageSource for PdfDocument {
    fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    fn page_text(&self, page: u32) -> Result<String, PdfError> {
        let page_id = *self.pages.get(&page).ok_or(PdfError::NoSuchPage(page))?;
        page_text(&self.doc, page_id).map_err(|source| PdfError::PageText { page, source })
    }
}

/// Text of one page with a line break at every line move of the content stream
/// (`Td`/`TD` with a vertical offset, `T*`, `'`, `"`, a `Tm` on a new baseline, `ET`).
fn page_text(doc: &Document, page_id: ObjectId) -> lopdf::Result<String> {
    let encodings: BTreeMap<Vec<u8>, String> = doc
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding().to_string()))
        .collect();
    let content = Content::decode(&doc.get_page_content(page_id)?)?;

    let mut out = TextSink::default();
    let mut encoding: Option<&str> = None;
    let mut baseline: Option<f32> = None;

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "Tf" => {
                encoding = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| encodings.get(name))
                    .map(String::as_str);
            }
            "Tj" | "TJ" => out.show(encoding, operands),
            "'" => {
                out.newline();
                out.show(encoding, operands);
            }
            "\"" => {
                out.newline();
                out.show(encoding, operands.get(2..).unwrap_or(&[]));
            }
            "T*" => out.newline(),
            "Td" | "TD" => {
                let ty = operands.get(1).and_then(|o| o.as_float().ok()).unwrap_or(0.0);
                if ty != 0.0 {
                    out.newline();
                } else {
                    out.space();
                }
            }
            "Tm" => {
                let y = operands.get(5).and_then(|o| o.as_float().ok());
                if y != baseline {
                    out.newline();
                }
                baseline = y;
            }
            "ET" => {
                out.newline();
                baseline = None;
            }
            _ => {}
        }
    }
    Ok(out.text)
}

#[derive(Default)]
struct TextSink {
    text: String,
}

impl TextSink {
    fn show(&mut self, encoding: Option<&str>, operands: &[Object]) {
        for operand in operands {
            match operand {
                Object::String(bytes, _) => {
                    self.text.push_str(&Document::decode_text(encoding, bytes));
                }
                Object::Array(items) => self.show(encoding, items),
                // large negative kerning in a TJ array is a word gap
                Object::Integer(i) if *i < -100 => self.space(),
                Object::Real(r) if *r < -100.0 => self.space(),
                _ => {}
            }
        }
    }

    fn newline(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
    }

    fn space(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with([' ', '\n']) {
            self.text.push(' ');
        }
    }
}

/// Trimmed, non-empty lines of a page's text.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_trims_and_drops_blanks() {
        let lines = split_lines("  A \r\n\n\t\nB\r\n  ");
        assert_eq!(lines, vec!["A", "B"]);
    }

    #[test]
    fn split_empty() {
        assert!(split_lines("").is_empty());
        assert!(split_lines(" \n \n").is_empty());
    }

    #[test]
    fn open_missing_file_is_an_error() {
        let err = PdfDocument::open(Path::new("tests/fixtures/does_not_exist.pdf")).err();
        assert!(matches!(err, Some(PdfError::Open { .. })));
    }

    #[test]
    fn line_moves_inside_one_text_object_break_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("faucets.pdf");
        testing::write_pdf(&path, &[&["ABCD-EFGH-12345", "Deluxe Faucet", "MRP: 500"]], false);

        let pdf = PdfDocument::open(&path).unwrap();
        assert_eq!(pdf.page_numbers(), vec![1]);
        let text = pdf.page_text(1).unwrap();
        assert_eq!(split_lines(&text), vec!["ABCD-EFGH-12345", "Deluxe Faucet", "MRP: 500"]);
        assert!(matches!(pdf.page_text(2), Err(PdfError::NoSuchPage(2))));
    }

    #[test]
    fn tj_kerning_gap_is_a_space() {
        let mut sink = TextSink::default();
        sink.show(
            None,
            &[Object::Array(vec![
                Object::string_literal("Wall"),
                Object::Integer(-250),
                Object::string_literal("Mixer"),
                Object::Integer(-20),
                Object::string_literal("s"),
            ])],
        );
        assert_eq!(sink.text, "Wall Mixers");
    }
}
