use std::env;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("No {0} was set!")]
    MissingCredential(&'static str),
}

/// Collector configuration derived from environment variables.
///
/// A `.env` file in the working directory is loaded first when present.
#[derive(Debug, Clone)]
pub struct Config {
    /// Market-data API key
    pub cmc_api_key: String,
    /// Currency-conversion API key
    pub cca_api_key: String,

    // ── Output locations ───────────────────────────────────────────
    pub output_dir: PathBuf,
    pub manifest_file: String,
    pub history_dir: String,
    pub fiat_manifest_file: String,

    // ── Icon processing ────────────────────────────────────────────
    pub icon_scratch_dir: PathBuf,
    pub icon_bundle_url: String,
    pub magick_bin: String,

    // ── Fan-out ────────────────────────────────────────────────────
    pub enrich_workers: usize,
    pub listing_limit: u32,
}

pub const DEFAULT_ENRICH_WORKERS: usize = 40;
pub const DEFAULT_ICON_BUNDLE_URL: &str =
    "https://codeload.github.com/spothq/cryptocurrency-icons/zip/master";

fn lookup_str(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_str(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup_str(lookup, name).unwrap_or_else(|| default.to_string())
}

fn env_required(lookup: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String, ConfigError> {
    lookup_str(lookup, name).ok_or(ConfigError::MissingCredential(name))
}

fn env_parse<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    lookup_str(lookup, name)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = &lookup;

        Ok(Self {
            cmc_api_key: env_required(lookup, "CMC_API_KEY")?,
            cca_api_key: env_required(lookup, "CCA_API_KEY")?,
            output_dir: PathBuf::from(env_str(lookup, "OUTPUT_DIR", ".")),
            manifest_file: env_str(lookup, "MANIFEST_FILE", "cryptocurrency.json"),
            history_dir: env_str(lookup, "HISTORY_DIR", "cryptocurrency"),
            fiat_manifest_file: env_str(lookup, "FIAT_MANIFEST_FILE", "currency.json"),
            icon_scratch_dir: PathBuf::from(env_str(lookup, "ICON_SCRATCH_DIR", "/tmp/_cryptoicons")),
            icon_bundle_url: env_str(lookup, "ICON_BUNDLE_URL", DEFAULT_ICON_BUNDLE_URL),
            magick_bin: env_str(lookup, "MAGICK_BIN", "magick"),
            enrich_workers: env_parse(lookup, "ENRICH_WORKERS", DEFAULT_ENRICH_WORKERS).max(1),
            listing_limit: env_parse(lookup, "LISTING_LIMIT", 5000u32),
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.manifest_file)
    }

    pub fn history_path(&self) -> PathBuf {
        self.output_dir.join(&self.history_dir)
    }

    pub fn fiat_manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.fiat_manifest_file)
    }
}
