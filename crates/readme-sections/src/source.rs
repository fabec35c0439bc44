//! Document sources.
//!
//! A [`DocumentSource`] fetches the raw markdown text. Sources do not retry
//! and do not cache; [`crate::DocumentCache`] memoizes on top of them.

use std::path::{Path, PathBuf};

use log::debug;

use crate::{Error, Result};

/// Fetch the raw text of a document
pub trait DocumentSource: Send + Sync {
    /// Fetch the whole document. Transport failures map to [`Error::Fetch`].
    fn fetch(&self) -> Result<String>;

    /// Human readable name used in logs and errors
    fn name(&self) -> String {
        "document".to_string()
    }
}

impl<F> DocumentSource for F
where
    F: Fn() -> Result<String> + Send + Sync,
{
    fn fetch(&self) -> Result<String> {
        self()
    }
}

/// Markdown held in memory
#[derive(Debug, Clone)]
pub struct StaticSource {
    text: String,
}

impl StaticSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DocumentSource for StaticSource {
    fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn name(&self) -> String {
        "static text".to_string()
    }
}

/// Markdown read from a local file on every fetch
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self) -> Result<String> {
        debug!("reading {}", self.path.display());
        std::fs::read_to_string(&self.path).map_err(|e| Error::fetch(self.name(), e))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Markdown fetched with an HTTP GET.
///
/// The request asks intermediaries not to serve a cached copy. Non-2xx
/// responses are fetch failures.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(feature = "http")]
impl DocumentSource for HttpSource {
    fn fetch(&self) -> Result<String> {
        debug!("GET {}", self.url);
        let response = self
            .agent
            .get(&self.url)
            .set("Cache-Control", "no-cache")
            .call()
            .map_err(|e| Error::fetch(&self.url, e))?;
        response
            .into_string()
            .map_err(|e| Error::fetch(&self.url, e))
    }

    fn name(&self) -> String {
        self.url.clone()
    }
}
