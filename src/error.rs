use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("text extraction failed on page {page}: {source}")]
    PageText {
        page: u32,
        #[source]
        source: lopdf::Error,
    },

    #[error("page {0} does not exist")]
    NoSuchPage(u32),

    #[error("image extraction failed on page {page}: {source}")]
    Image {
        page: u32,
        #[source]
        source: lopdf::Error,
    },
}
