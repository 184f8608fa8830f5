use std::fmt;

use crate::pdf::PageSource;

const CATALOG_KEYWORDS: &[&str] = &["faucet", "sanitary", "bath", "mrp", "catalog", "product"];
const PROFILE_KEYWORDS: &[&str] = &[
    "company profile",
    "who we are",
    "about us",
    "our values",
    "mission",
    "vision",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    ProductCatalog,
    CompanyProfile,
    Unknown,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentType::ProductCatalog => "PRODUCT_CATALOG",
            DocumentType::CompanyProfile => "COMPANY_PROFILE",
            DocumentType::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Keyword sniff of the first page; catalog keywords win.
pub fn classify_text(first_page: &str) -> DocumentType {
    let lower = first_page.to_lowercase();
    if CATALOG_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        DocumentType::ProductCatalog
    } else if PROFILE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        DocumentType::CompanyProfile
    } else {
        DocumentType::Unknown
    }
}

pub fn detect_document_type<S: PageSource + ?Sized>(source: &S) -> DocumentType {
    let Some(first) = source.page_numbers().first().copied() else {
        return DocumentType::Unknown;
    };
    let text = source.page_text(first).unwrap_or_default();
    classify_text(&text)
}
