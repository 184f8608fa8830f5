use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::parser::ProductRecord;

const COLUMNS: &[&str] = &[
    "sku",
    "name",
    "description",
    "mrp",
    "page",
    "source_pdf",
    "images",
    "confidence",
    "explanation",
];

#[derive(Debug)]
pub struct ExportPaths {
    pub table: PathBuf,
    pub json: PathBuf,
}

/// Drop 0x00-0x08, 0x0B-0x0C and 0x0E-0x1F. Tab and line breaks survive.
pub fn sanitize_cell(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(*c, '\u{0}'..='\u{8}' | '\u{b}'..='\u{c}' | '\u{e}'..='\u{1f}'))
        .collect()
}

/// Write `<stem>_products.xlsx` and `<stem>_products.json`. Nothing is written
/// for an empty list.
pub fn export_catalog_data(
    products: &[ProductRecord],
    stem: &str,
    table_dir: &Path,
    json_dir: &Path,
) -> Result<Option<ExportPaths>> {
    if products.is_empty() {
        info!("No products to export.");
        return Ok(None);
    }

    let table = table_dir.join(format!("{}_products.xlsx", stem));
    let json = json_dir.join(format!("{}_products.json", stem));

    write_table(products, &table)?;
    info!("Table saved: {}", display_name(&table));
    write_json(products, &json)?;
    info!("JSON saved: {}", display_name(&json));

    Ok(Some(ExportPaths { table, json }))
}

/// One worksheet: header row, then one row per record. `page` and `confidence`
/// are numeric cells, everything else is sanitized text.
fn write_table(products: &[ProductRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("products")?;

    for (col, name) in (0u16..).zip(COLUMNS) {
        sheet.write_string(0, col, *name)?;
    }
    for (row, p) in (1u32..).zip(products) {
        sheet.write_string(row, 0, sanitize_cell(p.sku()))?;
        sheet.write_string(row, 1, sanitize_cell(p.name()))?;
        sheet.write_string(row, 2, sanitize_cell(p.description()))?;
        sheet.write_string(row, 3, sanitize_cell(p.mrp()))?;
        sheet.write_number(row, 4, p.page())?;
        sheet.write_string(row, 5, sanitize_cell(p.source_document()))?;
        sheet.write_string(row, 6, sanitize_cell(&p.images().join(";")))?;
        sheet.write_number(row, 7, p.confidence())?;
        sheet.write_string(row, 8, sanitize_cell(p.explanation()))?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

fn write_json(products: &[ProductRecord], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), products)
        .with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{finalize, images::PageImageIndex};

    fn sample() -> Vec<ProductRecord> {
        let mut a = ProductRecord::new("AB-CD-1111", "450", 1, "cat.pdf");
        a.set_name("Wall\u{7} Mixer");
        a.append_description("Brass\tbody\nchrome\u{1b}");
        let b = ProductRecord::new("AB-CD-2222", "", 2, "cat.pdf");
        let mut products = vec![a, b];
        finalize(&mut products, &PageImageIndex::default());
        products
    }

    #[test]
    fn sanitize_removes_control_chars_only() {
        assert_eq!(sanitize_cell("a\u{0}b\u{8}c\u{b}d\u{c}e\u{e}f\u{1f}g"), "abcdefg");
        assert_eq!(sanitize_cell("tab\there\nline\rfeed"), "tab\there\nline\rfeed");
        assert_eq!(sanitize_cell("₹ 450"), "₹ 450");
    }

    #[test]
    fn empty_list_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = export_catalog_data(&[], "cat", tmp.path(), tmp.path()).unwrap();
        assert!(out.is_none());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn json_reads_back_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let products = sample();
        let paths = export_catalog_data(&products, "cat", tmp.path(), tmp.path())
            .unwrap()
            .unwrap();
        let raw = std::fs::read_to_string(&paths.json).unwrap();
        let back: Vec<ProductRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, products);
        // unsanitized in JSON
        assert_eq!(back[0].name(), "Wall\u{7} Mixer");
    }

    #[test]
    fn table_is_sanitized() {
        use calamine::{open_workbook, Data, Reader, Xlsx};

        let tmp = tempfile::tempdir().unwrap();
        let paths = export_catalog_data(&sample(), "cat", tmp.path(), tmp.path())
            .unwrap()
            .unwrap();
        assert!(paths.table.ends_with("cat_products.xlsx"));

        let mut book: Xlsx<_> = open_workbook(&paths.table).unwrap();
        let range = book.worksheet_range("products").unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 3);

        let headers: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(headers, COLUMNS);
        assert_eq!(rows[1][1], Data::String("Wall Mixer".into()));
        assert_eq!(rows[1][2], Data::String(" Brass\tbody\nchrome".into()));
        assert_eq!(rows[1][4], Data::Float(1.0));
        assert_eq!(rows[1][7], Data::Float(0.9));
        assert_eq!(rows[2][0], Data::String("AB-CD-2222".into()));
        assert_eq!(rows[2][7], Data::Float(0.4));
    }
}
