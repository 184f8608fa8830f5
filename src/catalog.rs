use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::detect::{detect_document_type, DocumentType};
use crate::enrich::{self, images::PageImageIndex};
use crate::export::{export_catalog_data, ExportPaths};
use crate::image_store::extract_images;
use crate::parser::{self, ProductRecord};
use crate::pdf::{PageSource, PdfDocument};
use crate::profile::process_profile;

pub struct CatalogOutput {
    pub products: Vec<ProductRecord>,
    pub exported: Option<ExportPaths>,
}

pub struct DocumentOutcome {
    pub file_name: String,
    pub doc_type: DocumentType,
    pub images: usize,
    pub products: usize,
    pub exported: Option<ExportPaths>,
}

/// Parse, locate images, score, explain and export one catalog.
pub fn run_catalog<S: PageSource + ?Sized>(
    source: &S,
    file_name: &str,
    stem: &str,
    settings: &Settings,
) -> Result<CatalogOutput> {
    info!("Extracting data from: {}", file_name);
    let mut products = parser::extract_products(source, file_name);
    info!("Products extracted: {}", products.len());

    let index = PageImageIndex::scan(&settings.image_dir(), stem, &settings.image_extensions)?;
    if index.is_empty() {
        debug!("No images indexed for {}", stem);
    }
    enrich::finalize(&mut products, &index);

    let exported = export_catalog_data(&products, stem, &settings.table_dir(), &settings.json_dir())?;
    Ok(CatalogOutput { products, exported })
}

/// Detect, extract images, then dispatch on document type. With `force_catalog`
/// the catalog pipeline runs whatever the detected type.
pub fn process_document(path: &Path, settings: &Settings, force_catalog: bool) -> Result<DocumentOutcome> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pdf = PdfDocument::open(path)?;
    let doc_type = detect_document_type(&pdf);
    info!("Detected type for {}: {}", file_name, doc_type);

    let mut outcome = DocumentOutcome {
        file_name,
        doc_type,
        images: 0,
        products: 0,
        exported: None,
    };

    if doc_type == DocumentType::Unknown && !force_catalog {
        info!("Unknown document type. Skipping {}.", outcome.file_name);
        return Ok(outcome);
    }

    outcome.images = match extract_images(&pdf, &stem, &settings.image_dir()) {
        Ok(n) => n,
        Err(e) => {
            warn!("Image extraction failed for {}: {:#}", outcome.file_name, e);
            0
        }
    };

    if doc_type == DocumentType::CompanyProfile && !force_catalog {
        process_profile(path);
        return Ok(outcome);
    }

    let output = run_catalog(&pdf, &outcome.file_name, &stem, settings)?;
    outcome.products = output.products.len();
    outcome.exported = output.exported;
    Ok(outcome)
}
