use std::sync::LazyLock;

use regex::Regex;

static SKU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,4}-[A-Z]{2,4}-\d{4,6}\b").unwrap());
static SKU_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<sku>[A-Z]{2,4}-[A-Z]{2,4}-\d{4,6})\s*(?i:MRP)\s*[:\-]?\s*(?P<mrp>\d+)")
        .unwrap()
});
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)MRP\s*[:\-]?\s*(\d+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuPrice<'a> {
    pub sku: &'a str,
    pub mrp: &'a str,
}

/// Every non-overlapping `SKU ... MRP <digits>` pair on the line, left to right.
pub fn sku_price_pairs(line: &str) -> Vec<SkuPrice<'_>> {
    SKU_PRICE_RE
        .captures_iter(line)
        .filter_map(|caps| {
            Some(SkuPrice {
                sku: caps.name("sku")?.as_str(),
                mrp: caps.name("mrp")?.as_str(),
            })
        })
        .collect()
}

/// Every whole-word SKU token on the line, left to right.
pub fn bare_skus(line: &str) -> Vec<&str> {
    SKU_RE.find_iter(line).map(|m| m.as_str()).collect()
}

/// First `MRP <digits>` on the line, digits only.
pub fn standalone_price(line: &str) -> Option<&str> {
    PRICE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
