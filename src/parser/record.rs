use serde::{Deserialize, Serialize};

/// One product pulled out of a catalog page.
///
/// `sku` is fixed at construction. `name` and `mrp` only accept their first
/// non-empty value; `description` only grows. `images`, `confidence` and
/// `explanation` stay at their defaults until the enrichment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    sku: String,
    name: String,
    description: String,
    mrp: String,
    page: u32,
    #[serde(rename = "source_pdf")]
    source_document: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    explanation: String,
}

impl ProductRecord {
    pub fn new(sku: &str, mrp: &str, page: u32, source_document: &str) -> Self {
        ProductRecord {
            sku: sku.to_string(),
            name: String::new(),
            description: String::new(),
            mrp: mrp.to_string(),
            page,
            source_document: source_document.to_string(),
            images: Vec::new(),
            confidence: 0.0,
            explanation: String::new(),
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mrp(&self) -> &str {
        &self.mrp
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn source_document(&self) -> &str {
        &self.source_document
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_mrp(&self) -> bool {
        !self.mrp.is_empty()
    }

    /// Returns false (and leaves the record alone) if a name is already set.
    pub fn set_name(&mut self, name: &str) -> bool {
        if self.has_name() {
            return false;
        }
        self.name = name.to_string();
        true
    }

    /// Returns false (and leaves the record alone) if a price is already set.
    pub fn set_mrp(&mut self, mrp: &str) -> bool {
        if self.has_mrp() {
            return false;
        }
        self.mrp = mrp.to_string();
        true
    }

    pub fn append_description(&mut self, line: &str) {
        self.description.push(' ');
        self.description.push_str(line);
    }

    pub(crate) fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
    }

    pub(crate) fn set_annotation(&mut self, confidence: f64, explanation: String) {
        self.confidence = confidence;
        self.explanation = explanation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_write_once() {
        let mut r = ProductRecord::new("ABCD-EFGH-12345", "", 1, "cat.pdf");
        assert!(r.set_name("Deluxe Faucet"));
        assert!(!r.set_name("Something Else"));
        assert_eq!(r.name(), "Deluxe Faucet");
    }

    #[test]
    fn prefilled_mrp_is_kept() {
        let mut r = ProductRecord::new("ABCD-EFGH-12345", "500", 1, "cat.pdf");
        assert!(!r.set_mrp("300"));
        assert_eq!(r.mrp(), "500");
    }

    #[test]
    fn description_accumulates_with_leading_space() {
        let mut r = ProductRecord::new("ABCD-EFGH-12345", "", 1, "cat.pdf");
        r.append_description("Chrome finish");
        r.append_description("1/2 inch");
        assert_eq!(r.description(), " Chrome finish 1/2 inch");
    }

    #[test]
    fn json_uses_source_pdf_key() {
        let r = ProductRecord::new("ABCD-EFGH-12345", "500", 3, "cat.pdf");
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["source_pdf"], "cat.pdf");
        assert_eq!(v["page"], 3);
        assert!(v["images"].as_array().unwrap().is_empty());
        assert!(v.get("source_document").is_none());
    }
}
