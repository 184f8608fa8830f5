use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::image_store::parse_image_file_name;
use crate::parser::ProductRecord;

/// Page number → image file names already saved for one document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageImageIndex {
    pages: BTreeMap<u32, Vec<String>>,
}

impl PageImageIndex {
    /// Scan `image_dir` for `<stem>_page_<p>_img_<i>.<ext>` files whose
    /// extension is one of `extensions`. A missing directory is an empty index.
    pub fn scan(image_dir: &Path, stem: &str, extensions: &[String]) -> Result<Self> {
        let entries = match std::fs::read_dir(image_dir) {
            Ok(e) => e,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {:?}", image_dir))
            }
        };

        let mut found: BTreeMap<u32, Vec<(usize, String)>> = BTreeMap::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to read {:?}", image_dir))?;
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            let Some((page, index, ext)) = parse_image_file_name(stem, &name) else {
                continue;
            };
            if !extensions.iter().any(|e| e == ext) {
                continue;
            }
            found.entry(page).or_default().push((index, name));
        }

        let pages = found
            .into_iter()
            .map(|(page, mut imgs)| {
                imgs.sort();
                (page, imgs.into_iter().map(|(_, name)| name).collect())
            })
            .collect();
        Ok(PageImageIndex { pages })
    }

    pub fn images_for(&self, page: u32) -> &[String] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Every record gets its page's images, or an empty list.
pub fn attach_images(products: &mut [ProductRecord], index: &PageImageIndex) {
    for product in products.iter_mut() {
        product.set_images(index.images_for(product.page()).to_vec());
    }
}
