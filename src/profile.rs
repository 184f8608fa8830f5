use std::path::Path;

use tracing::info;

/// Company profiles are acknowledged only; nothing is extracted yet.
pub fn process_profile(path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("Ready to process profile: {}", name);
}
