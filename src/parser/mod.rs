pub mod lines;
pub mod patterns;
pub mod record;

use tracing::warn;

use crate::pdf::{split_lines, PageSource};
use lines::LineClassifier;
pub use record::ProductRecord;

/// Page text → lines → records, in page order. A page whose text cannot be
/// extracted is logged and skipped; blank pages contribute nothing.
pub fn extract_products<S: PageSource + ?Sized>(source: &S, source_name: &str) -> Vec<ProductRecord> {
    let mut classifier = LineClassifier::new(source_name);

    for page in source.page_numbers() {
        let text = match source.page_text(page) {
            Ok(t) => t,
            Err(e) => {
                warn!("Text extraction failed on page {}: {}", page, e);
                continue;
            }
        };
        if text.trim().is_empty() {
            continue;
        }
        classifier.feed_page(page, &split_lines(&text));
    }

    classifier.finish()
}


#[cfg(test)]
mod tests {
    use super::testing::FakePages;
    use super::*;

    #[test]
    fn failed_page_is_skipped_without_renumbering() {
        let pages = FakePages::new(&[
            (1, Some("AB-CD-1111 MRP 10\nTap One")),
            (2, None),
            (3, Some("AB-CD-3333\nTap Three")),
        ]);
        let r = extract_products(&pages, "cat.pdf");
        assert_eq!(r.len(), 2);
        assert_eq!(r[0].page(), 1);
        assert_eq!(r[0].name(), "Tap One");
        assert_eq!(r[1].page(), 3);
        assert_eq!(r[1].name(), "Tap Three");
    }

    #[test]
    fn blank_pages_contribute_nothing() {
        let pages = FakePages::new(&[(1, Some("   \n\n")), (2, Some("")), (3, Some("AB-CD-1234"))]);
        let r = extract_products(&pages, "cat.pdf");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].page(), 3);
    }

    #[test]
    fn no_skus_no_records() {
        let pages = FakePages::new(&[(1, Some("About our company\nMRP 100\nWe make taps"))]);
        assert!(extract_products(&pages, "cat.pdf").is_empty());
    }

    #[test]
    fn crlf_page_text() {
        let pages = FakePages::new(&[(1, Some("AB-CD-1234\r\nMRP: 75\r\nPillar Cock\r\n"))]);
        let r = extract_products(&pages, "cat.pdf");
        assert_eq!(r[0].mrp(), "75");
        assert_eq!(r[0].name(), "Pillar Cock");
    }

    #[test]
    fn records_from_a_real_pdf() {
        use crate::pdf::{testing::write_pdf, PdfDocument};

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("faucets.pdf");
        write_pdf(
            &path,
            &[
                &["ABCD-EFGH-12345", "Deluxe Faucet", "MRP: 500"],
                &["Chrome finish, 1/2 inch"],
            ],
            false,
        );

        let pdf = PdfDocument::open(&path).unwrap();
        let r = extract_products(&pdf, "faucets.pdf");
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].sku(), "ABCD-EFGH-12345");
        assert_eq!(r[0].name(), "Deluxe Faucet");
        assert_eq!(r[0].mrp(), "500");
        assert_eq!(r[0].page(), 1);
        assert_eq!(r[0].description(), " Chrome finish, 1/2 inch");
    }
}
