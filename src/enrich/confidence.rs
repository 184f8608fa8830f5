use crate::parser::ProductRecord;

// Weights in hundredths so the sum stays exact.
const SKU_WEIGHT: u32 = 40;
const NAME_WEIGHT: u32 = 30;
const MRP_WEIGHT: u32 = 20;
const IMAGES_WEIGHT: u32 = 10;

/// The four signals both the score and the explanation are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signals {
    pub sku: bool,
    pub name: bool,
    pub mrp: bool,
    pub images: bool,
}

impl Signals {
    pub fn of(product: &ProductRecord) -> Self {
        Signals {
            sku: !product.sku().is_empty(),
            name: product.has_name(),
            mrp: product.has_mrp(),
            images: !product.images().is_empty(),
        }
    }
}

/// Weighted completeness in [0, 1], two decimal places.
pub fn score(signals: Signals) -> f64 {
    let mut hundredths = 0;
    if signals.sku {
        hundredths += SKU_WEIGHT;
    }
    if signals.name {
        hundredths += NAME_WEIGHT;
    }
    if signals.mrp {
        hundredths += MRP_WEIGHT;
    }
    if signals.images {
        hundredths += IMAGES_WEIGHT;
    }
    f64::from(hundredths) / 100.0
}

pub fn calculate_confidence(product: &ProductRecord) -> f64 {
    score(Signals::of(product))
}
