use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "CATALOG";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Extensions the image locator groups; `jpeg` only unless widened.
    pub image_extensions: Vec<String>,
}

impl Settings {
    /// Defaults, then the optional TOML file, then `CATALOG_*` env vars.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("input_dir", "data/input")?
            .set_default("output_dir", "data/output")?
            .set_default("image_extensions", vec!["jpeg"])?;
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("image_extensions"),
            )
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn table_dir(&self) -> PathBuf {
        self.output_dir.join("excel")
    }

    pub fn json_dir(&self) -> PathBuf {
        self.output_dir.join("json")
    }

    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join("images")
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.table_dir(), self.json_dir(), self.image_dir()] {
            std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("catalog.toml");
        std::fs::write(
            &path,
            "output_dir = \"out\"\nimage_extensions = [\"jpeg\", \"png\"]\n",
        )
        .unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.output_dir, PathBuf::from("out"));
        assert_eq!(s.image_extensions, vec!["jpeg", "png"]);
        assert_eq!(s.json_dir(), PathBuf::from("out/json"));
    }

    #[test]
    fn defaults_without_file() {
        let s = Settings::load(None).unwrap();
        assert!(!s.image_extensions.is_empty());
        assert_eq!(s.image_dir(), s.output_dir.join("images"));
    }

    #[test]
    fn ensure_dirs_creates_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let s = Settings {
            input_dir: tmp.path().join("in"),
            output_dir: tmp.path().join("out"),
            image_extensions: vec!["jpeg".into()],
        };
        s.ensure_dirs().unwrap();
        assert!(s.table_dir().is_dir());
        assert!(s.json_dir().is_dir());
        assert!(s.image_dir().is_dir());
    }
}
