use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "middelbare.toml";
const ENV_PREFIX: &str = "MIDDELBARE";

/// Paths and the target year, layered as: defaults, `middelbare.toml` in
/// the base directory, `MIDDELBARE_*` variables, command line flags.
/// Relative paths are resolved against `base_dir`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_dir: PathBuf,
    pub html_dir: PathBuf,
    pub json_dir: PathBuf,
    pub scholen_db: PathBuf,
    pub loting_db: PathBuf,
    pub update_dir: PathBuf,
    pub update_year: i64,
}

impl Settings {
    pub fn load(base_dir: Option<&Path>, year: Option<i64>) -> Result<Self> {
        // The config file location depends on the base directory, so that
        // one key is settled before the layers are built.
        let base = match base_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::var_os(format!("{ENV_PREFIX}_BASE_DIR"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        let mut builder = Config::builder()
            .set_default("base_dir", ".")?
            .set_default("html_dir", "html")?
            .set_default("json_dir", "json")?
            .set_default("scholen_db", "scholen.sqlite")?
            .set_default("loting_db", "loting_matching.sqlite")?
            .set_default("update_dir", "json/matching_en_plaatsing")?
            .set_default("update_year", 2025_i64)?
            .add_source(File::from(base.join(CONFIG_FILE)).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override("base_dir", base.to_string_lossy().into_owned())?;
        if let Some(year) = year {
            builder = builder.set_override("update_year", year)?;
        }

        let mut settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.resolve_paths();
        Ok(settings)
    }

    fn resolve_paths(&mut self) {
        let base = self.base_dir.clone();
        for path in [
            &mut self.html_dir,
            &mut self.json_dir,
            &mut self.scholen_db,
            &mut self.loting_db,
            &mut self.update_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
