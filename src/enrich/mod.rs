pub mod confidence;
pub mod explain;
pub mod images;

use confidence::calculate_confidence;
use explain::explain_product;
use images::{attach_images, PageImageIndex};

use crate::parser::ProductRecord;

/// Image attachment, then score and explanation for every record.
pub fn finalize(products: &mut [ProductRecord], index: &PageImageIndex) {
    attach_images(products, index);
    for product in products.iter_mut() {
        let confidence = calculate_confidence(product);
        let explanation = explain_product(product);
        product.set_annotation(confidence, explanation);
    }
}
