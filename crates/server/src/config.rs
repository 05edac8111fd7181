//! Configuration for the recommendation server
//!
//! Read once at startup from the process environment, after the optional
//! env file has been merged into it. The two credentials are required;
//! everything else has a default. A value that is present but malformed is
//! a startup error rather than a silent fallback.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use ml_client::{GEMINI_BASE_URL, GEMINI_MODEL, PINECONE_CONTROL_URL};

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Env file read when `DOTENV_PATH` is not set
pub const DEFAULT_DOTENV_PATH: &str = "../.env";

/// Merge `KEY=value` pairs from the env file into the process environment.
///
/// The file is `$DOTENV_PATH`, else `../.env`. Variables already set in the
/// environment keep their values. Returns the path that was loaded, or
/// `None` when the file does not exist.
pub fn load_env_file() -> Result<Option<PathBuf>> {
    let path = std::env::var_os("DOTENV_PATH")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOTENV_PATH));
    load_env_file_from(&path)
}

pub fn load_env_file_from(path: &Path) -> Result<Option<PathBuf>> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to load env file {}", path.display())),
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub pinecone_api_key: String,
    pub google_api_key: String,
    pub pinecone_index: String,
    pub pinecone_index_host: Option<String>,
    pub pinecone_control_url: String,
    pub embedding_base_url: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub embedding_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub catalog_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub top_k: usize,
    pub upstream_timeout: Duration,
    pub generation_timeout: Duration,
    pub request_deadline: Duration,
    pub generation_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process
    /// environment. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let allowed_origins = match get("CORS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let generation_concurrency: usize = parse_or(&get, "GENERATION_CONCURRENCY", 4)?;
        if generation_concurrency == 0 {
            bail!("GENERATION_CONCURRENCY must be at least 1");
        }

        Ok(Self {
            pinecone_api_key: required("PINECONE_API_KEY")?,
            google_api_key: required("GOOGLE_API_KEY")?,
            pinecone_index: or("PINECONE_INDEX", "product-recommendations"),
            pinecone_index_host: get("PINECONE_INDEX_HOST"),
            pinecone_control_url: or("PINECONE_CONTROL_URL", PINECONE_CONTROL_URL),
            embedding_base_url: or("EMBEDDING_BASE_URL", "http://localhost:8080/v1"),
            embedding_model: or("EMBEDDING_MODEL", "sentence-transformers/all-MiniLM-L6-v2"),
            embedding_dimensions: parse_or(&get, "EMBEDDING_DIMENSIONS", 384)?,
            embedding_api_key: get("EMBEDDING_API_KEY"),
            gemini_base_url: or("GEMINI_BASE_URL", GEMINI_BASE_URL),
            gemini_model: or("GEMINI_MODEL", GEMINI_MODEL),
            catalog_path: PathBuf::from(or("CATALOG_PATH", "../products.jsonl")),
            host: or("HOST", "127.0.0.1"),
            port: parse_or(&get, "PORT", 8000)?,
            allowed_origins,
            top_k: parse_or(&get, "RECOMMEND_TOP_K", 5)?,
            upstream_timeout: Duration::from_secs(parse_or(&get, "UPSTREAM_TIMEOUT_SECS", 10)?),
            generation_timeout: Duration::from_secs(parse_or(&get, "GENERATION_TIMEOUT_SECS", 30)?),
            request_deadline: Duration::from_secs(parse_or(&get, "REQUEST_DEADLINE_SECS", 60)?),
            generation_concurrency,
        })
    }

    /// Listen address, e.g. `127.0.0.1:8000`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

// Keeps the credentials out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("pinecone_api_key", &"<redacted>")
            .field("google_api_key", &"<redacted>")
            .field("pinecone_index", &self.pinecone_index)
            .field("pinecone_index_host", &self.pinecone_index_host)
            .field("embedding_base_url", &self.embedding_base_url)
            .field("embedding_model", &self.embedding_model)
            .field("gemini_model", &self.gemini_model)
            .field("catalog_path", &self.catalog_path)
            .field("address", &self.address())
            .field("allowed_origins", &self.allowed_origins)
            .field("top_k", &self.top_k)
            .field("request_deadline", &self.request_deadline)
            .field("generation_concurrency", &self.generation_concurrency)
            .finish_non_exhaustive()
    }
}
