use tracing::trace;

use super::patterns::{bare_skus, sku_price_pairs, standalone_price};
use super::record::ProductRecord;

/// Index of the record that contextual lines attach to. Empty until the
/// first SKU of the document is seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(Option<usize>);

impl Cursor {
    pub fn index(&self) -> Option<usize> {
        self.0
    }
}

/// What a single line did to the record list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// New records created from `SKU MRP <digits>` pairs.
    PricedSkus(usize),
    /// New records created from bare SKU tokens.
    BareSkus(usize),
    Price,
    Name,
    Description,
    /// Contextual line seen before any record exists.
    Orphan,
}

/// Classify one trimmed line and apply it to `records`.
///
/// The cursor goes in and comes back out; nothing else carries state
/// between lines.
pub fn step(
    records: &mut Vec<ProductRecord>,
    cursor: Cursor,
    page: u32,
    source: &str,
    line: &str,
) -> (Cursor, LineEvent) {
    let pairs = sku_price_pairs(line);
    if !pairs.is_empty() {
        let n = pairs.len();
        for pair in pairs {
            records.push(ProductRecord::new(pair.sku, pair.mrp, page, source));
        }
        return (Cursor(Some(records.len() - 1)), LineEvent::PricedSkus(n));
    }

    let skus = bare_skus(line);
    if !skus.is_empty() {
        let n = skus.len();
        for sku in skus {
            records.push(ProductRecord::new(sku, "", page, source));
        }
        return (Cursor(Some(records.len() - 1)), LineEvent::BareSkus(n));
    }

    let current = match cursor.0 {
        Some(i) => records.get_mut(i),
        None => None,
    };
    let Some(current) = current else {
        return (cursor, LineEvent::Orphan);
    };

    if !current.has_mrp() {
        if let Some(mrp) = standalone_price(line) {
            current.set_mrp(mrp);
            return (cursor, LineEvent::Price);
        }
    }

    if current.set_name(line) {
        return (cursor, LineEvent::Name);
    }

    current.append_description(line);
    (cursor, LineEvent::Description)
}

/// Accumulates records across the pages of one document.
pub struct LineClassifier {
    source: String,
    records: Vec<ProductRecord>,
    cursor: Cursor,
}

impl LineClassifier {
    pub fn new(source: &str) -> Self {
        LineClassifier {
            source: source.to_string(),
            records: Vec::new(),
            cursor: Cursor::default(),
        }
    }

    /// Feed the ordered lines of one page. Returns how many records the page created.
    pub fn feed_page<S: AsRef<str>>(&mut self, page: u32, lines: &[S]) -> usize {
        let before = self.records.len();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let (cursor, event) = step(&mut self.records, self.cursor, page, &self.source, line);
            trace!(page, ?event, current = ?cursor.index(), line, "classified line");
            self.cursor = cursor;
        }
        self.records.len() - before
    }

    pub fn finish(self) -> Vec<ProductRecord> {
        self.records
    }
}
