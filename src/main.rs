mod catalog;
mod config;
mod detect;
mod enrich;
mod error;
mod export;
mod image_store;
mod parser;
mod pdf;
mod profile;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::Settings;
use crate::detect::DocumentType;

#[derive(Parser)]
#[command(name = "catalog_extractor", about = "Product records from PDF catalogs")]
struct Cli {
    /// Optional TOML settings file (CATALOG_* env vars still apply on top)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect, extract and export every PDF in the input directory
    Run {
        /// Input directory (default: settings input_dir)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Max documents to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Run the catalog pipeline on one PDF regardless of its detected type
    Extract { file: PathBuf },
    /// Print the detected document type
    Detect { file: PathBuf },
    /// Extract embedded images only
    Images { file: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Run { input, limit } => {
            settings.ensure_dirs()?;
            let input_dir = input.unwrap_or_else(|| settings.input_dir.clone());
            let docs = list_pdfs(&input_dir, limit)?;
            if docs.is_empty() {
                println!("No PDF files in {:?}.", input_dir);
                return Ok(());
            }
            println!("Processing {} documents...", docs.len());
            let counts = process_documents(&docs, &settings)?;
            counts.print();
            Ok(())
        }
        Commands::Extract { file } => {
            settings.ensure_dirs()?;
            let outcome = catalog::process_document(&file, &settings, true)?;
            println!(
                "{}: {} products, {} images extracted.",
                outcome.file_name, outcome.products, outcome.images
            );
            if let Some(paths) = outcome.exported {
                println!("  table: {:?}", paths.table);
                println!("  json:  {:?}", paths.json);
            }
            Ok(())
        }
        Commands::Detect { file } => {
            let pdf = pdf::PdfDocument::open(&file)?;
            println!("{}", detect::detect_document_type(&pdf));
            Ok(())
        }
        Commands::Images { file } => {
            settings.ensure_dirs()?;
            let pdf = pdf::PdfDocument::open(&file)?;
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let n = image_store::extract_images(&pdf, &stem, &settings.image_dir())?;
            println!("Extracted {} images to {:?}", n, settings.image_dir());
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

#[derive(Default)]
struct RunCounts {
    documents: usize,
    catalogs: usize,
    profiles: usize,
    unknown: usize,
    failed: usize,
    products: usize,
    images: usize,
}

impl RunCounts {
    fn print(&self) {
        println!(
            "Processed {} documents ({} catalogs, {} profiles, {} unknown, {} failed): {} products, {} images.",
            self.documents,
            self.catalogs,
            self.profiles,
            self.unknown,
            self.failed,
            self.products,
            self.images,
        );
    }
}

/// `*.pdf` files of the directory, sorted by name.
fn list_pdfs(dir: &Path, limit: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut docs: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {:?}", dir))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "pdf"))
        .collect();
    docs.sort();
    if let Some(n) = limit {
        docs.truncate(n);
    }
    Ok(docs)
}

/// Every document runs on its own; one failure is logged and counted, never fatal.
fn process_documents(docs: &[PathBuf], settings: &Settings) -> Result<RunCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    #[cfg(feature = "rayon")]
    use rayon::prelude::*;

    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let run_one = |path: &PathBuf| {
        let result = catalog::process_document(path, settings, false);
        pb.inc(1);
        (path.clone(), result)
    };

    #[cfg(feature = "rayon")]
    let results: Vec<_> = docs.par_iter().map(run_one).collect();
    #[cfg(not(feature = "rayon"))]
    let results: Vec<_> = docs.iter().map(run_one).collect();

    pb.finish_and_clear();

    let mut counts = RunCounts {
        documents: docs.len(),
        ..Default::default()
    };
    for (path, result) in results {
        match result {
            Ok(outcome) => {
                match outcome.doc_type {
                    DocumentType::ProductCatalog => counts.catalogs += 1,
                    DocumentType::CompanyProfile => counts.profiles += 1,
                    DocumentType::Unknown => counts.unknown += 1,
                }
                counts.products += outcome.products;
                counts.images += outcome.images;
            }
            Err(e) => {
                warn!("Failed to process {}: {:#}", path.display(), e);
                counts.failed += 1;
            }
        }
    }
    Ok(counts)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_pdfs_sorted_and_limited() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.pdf", "notes.txt", "c.pdf"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }
        let all = list_pdfs(tmp.path(), None).unwrap();
        let names: Vec<_> = all.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf", "c.pdf"]);
        assert_eq!(list_pdfs(tmp.path(), Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn broken_document_does_not_stop_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = Settings {
            input_dir: tmp.path().join("in"),
            output_dir: tmp.path().join("out"),
            image_extensions: vec!["jpeg".into()],
        };
        settings.ensure_dirs().unwrap();
        let a = tmp.path().join("a.pdf");
        let b = tmp.path().join("b.pdf");
        std::fs::write(&a, b"garbage").unwrap();
        std::fs::write(&b, b"more garbage").unwrap();

        let counts = process_documents(&[a, b], &settings).unwrap();
        assert_eq!(counts.documents, 2);
        assert_eq!(counts.failed, 2);
        assert_eq!(counts.products, 0);
    }

    #[test]
    fn durations() {
        use std::time::Duration;
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
    }
}
