//! Source resolution and local download cache.
//!
//! Sales tables and tract geometry can live on disk or behind an `http(s)`
//! URL. Remote sources are downloaded once into the cache directory and
//! reused on every later load; local paths are passed through unchanged.

use crate::config;
use crate::error::{HousingError, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Resolves data sources to local files, downloading remote ones on demand.
pub struct CacheManager {
    /// Directory where downloaded files are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use cached files only).
    pub offline: bool,
    timeout: Duration,
    client: Option<Client>,
}

impl CacheManager {
    /// Create a new cache manager.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache directory.
    /// Creates the cache directory if it does not exist.
    pub fn new(cache_dir: Option<PathBuf>, offline: bool, timeout: Duration) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        Ok(Self {
            cache_dir: dir,
            offline,
            timeout,
            client: None,
        })
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// Whether a source string names a remote `http(s)` resource.
    pub fn is_remote(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    /// Local path a remote source is cached under.
    ///
    /// The URL (minus scheme) is flattened into a single file name so two
    /// sources with the same base name never collide.
    pub fn cached_path(&self, url: &str) -> PathBuf {
        let trimmed = url
            .trim_start_matches("https://")
            .trim_start_matches("http://");
        let name: String = trimmed
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.cache_dir.join(name)
    }

    /// Resolve a source to a readable local file.
    ///
    /// Local paths must exist. Remote sources are downloaded unless already
    /// cached; in offline mode a missing cache entry is an error.
    pub fn ensure_local(&mut self, source: &str) -> Result<PathBuf> {
        if !Self::is_remote(source) {
            let path = PathBuf::from(source);
            if !path.exists() {
                return Err(HousingError::NotFound(format!(
                    "Source file does not exist: {}",
                    source
                )));
            }
            return Ok(path);
        }

        let local_path = self.cached_path(source);
        if local_path.exists() {
            return Ok(local_path);
        }
        if self.offline {
            return Err(HousingError::NotFound(format!(
                "{} not cached and offline mode is enabled",
                source
            )));
        }
        self.download_file(source, &local_path)?;
        Ok(local_path)
    }

    /// Download a single file.
    ///
    /// Downloads to a temp file first and renames on success, so an
    /// interrupted download never leaves a corrupt partial file behind.
    fn download_file(&mut self, url: &str, dest: &Path) -> Result<()> {
        info!(url, "downloading source");

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_dest = dest.with_extension(format!(
            "{}.tmp",
            dest.extension().and_then(|e| e.to_str()).unwrap_or("")
        ));

        let client = self.client()?;
        let result = (|| -> Result<()> {
            let resp = client.get(url).send()?.error_for_status()?;
            let bytes = resp.bytes()?;
            fs::write(&tmp_dest, &bytes)?;
            fs::rename(&tmp_dest, dest)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp_dest);
        }

        result
    }

    /// Read a source as text, decompressing `.gz` files transparently.
    pub fn read_text(&mut self, source: &str) -> Result<String> {
        let path = self.ensure_local(source)?;
        read_maybe_gz(&path)
    }

    /// Load and parse a JSON source.
    ///
    /// A downloaded copy that fails to parse is deleted so the next call
    /// fetches it again. Local files are never removed.
    pub fn load_json(&mut self, source: &str) -> Result<serde_json::Value> {
        let path = self.ensure_local(source)?;
        let contents = read_maybe_gz(&path)?;

        match serde_json::from_str(&contents) {
            Ok(value) => Ok(value),
            Err(e) if Self::is_remote(source) => {
                warn!(path = %path.display(), error = %e, "corrupt cached file, removing");
                let _ = fs::remove_file(&path);
                Err(HousingError::NotFound(format!(
                    "Cached copy of '{}' was corrupt and has been removed. \
                     Retry to re-download. Original error: {}",
                    source, e
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove all cached files and recreate the cache directory.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Close the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}

fn read_maybe_gz(path: &Path) -> Result<String> {
    let mut contents = String::new();
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        let file = fs::File::open(path)?;
        let mut decoder = BufReader::new(GzDecoder::new(BufReader::new(file)));
        decoder.read_to_string(&mut contents)?;
    } else {
        contents = fs::read_to_string(path)?;
    }
    Ok(contents)
}
