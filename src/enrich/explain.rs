use super::confidence::Signals;
use crate::parser::ProductRecord;

pub const SKU_REASON: &str = "SKU pattern detected";
pub const NAME_REASON: &str = "Product name detected";
pub const MRP_REASON: &str = "Price (MRP) detected";
pub const IMAGES_REASON: &str = "Images found on same page";

/// Reasons in fixed order (SKU, name, price, images), joined with "; ".
pub fn explain(signals: Signals) -> String {
    let reasons: Vec<&str> = [
        (signals.sku, SKU_REASON),
        (signals.name, NAME_REASON),
        (signals.mrp, MRP_REASON),
        (signals.images, IMAGES_REASON),
    ]
    .into_iter()
    .filter_map(|(present, reason)| present.then_some(reason))
    .collect();
    reasons.join("; ")
}

pub fn explain_product(product: &ProductRecord) -> String {
    explain(Signals::of(product))
}
