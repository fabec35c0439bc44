//! Memoized fetch → parse → segment.
//!
//! [`DocumentCache`] owns one entry holding the raw text and the sections
//! derived from it. The entry is written whole and dropped whole, so the text
//! and the sections can never disagree.
//!
//! ```text
//! Empty ──sections()──▶ Fetching ──ok──▶ Populated ──invalidate()──▶ Empty
//!                          │
//!                          └──err──▶ Empty (error returned to the caller)
//! ```
//!
//! Fetching happens outside the lock. Callers racing on an empty cache may
//! each fetch; the last one to finish stores its entry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use readme_sections_core::Section;

use crate::parse::parse_sections;
use crate::source::DocumentSource;
use crate::Result;

/// Observable cache state. Fetching is transient and reported as `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Populated,
}

struct CacheEntry {
    raw_text: Arc<str>,
    sections: Arc<Vec<Section>>,
    fetched_at: Instant,
}

/// Process-wide memo of one document and its sections
pub struct DocumentCache<S> {
    source: S,
    max_age: Option<Duration>,
    entry: Mutex<Option<CacheEntry>>,
}

impl<S: DocumentSource> DocumentCache<S> {
    /// Cache that keeps its entry until [`DocumentCache::invalidate`]
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_age: None,
            entry: Mutex::new(None),
        }
    }

    /// Cache whose entry is dropped once it is older than `max_age`
    pub fn with_max_age(source: S, max_age: Duration) -> Self {
        Self {
            max_age: Some(max_age),
            ..Self::new(source)
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Sections of the document, fetching and parsing it on first use
    pub fn sections(&self) -> Result<Arc<Vec<Section>>> {
        if let Some(sections) = self.with_fresh_entry(|entry| Arc::clone(&entry.sections)) {
            debug!("sections of {} served from cache", self.source.name());
            return Ok(sections);
        }
        Ok(self.load()?.sections)
    }

    /// Raw text of the document, fetching and parsing it on first use
    pub fn raw_text(&self) -> Result<Arc<str>> {
        if let Some(text) = self.with_fresh_entry(|entry| Arc::clone(&entry.raw_text)) {
            return Ok(text);
        }
        Ok(self.load()?.raw_text)
    }

    /// Drop the memoized text and sections together
    pub fn invalidate(&self) {
        if self.lock().take().is_some() {
            info!("invalidated cached {}", self.source.name());
        }
    }

    pub fn state(&self) -> CacheState {
        match self.with_fresh_entry(|_| ()) {
            Some(()) => CacheState::Populated,
            None => CacheState::Empty,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry>> {
        // The entry is replaced in one assignment, a panic cannot leave it half-written
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_fresh_entry<T>(&self, f: impl FnOnce(&CacheEntry) -> T) -> Option<T> {
        let mut guard = self.lock();
        let expired = match (guard.as_ref(), self.max_age) {
            (Some(entry), Some(max_age)) => entry.fetched_at.elapsed() >= max_age,
            _ => false,
        };
        if expired {
            debug!("cached {} is stale", self.source.name());
            *guard = None;
        }
        guard.as_ref().map(f)
    }

    fn load(&self) -> Result<LoadedEntry> {
        let name = self.source.name();
        let raw_text = self.source.fetch().inspect_err(|e| {
            warn!("{e}");
        })?;
        let sections = parse_sections(&raw_text).inspect_err(|e| {
            warn!("failed to parse {name}: {e}");
        })?;
        info!("loaded {name}: {} sections", sections.len());

        let loaded = LoadedEntry {
            raw_text: Arc::from(raw_text),
            sections: Arc::new(sections),
        };
        *self.lock() = Some(CacheEntry {
            raw_text: Arc::clone(&loaded.raw_text),
            sections: Arc::clone(&loaded.sections),
            fetched_at: Instant::now(),
        });
        Ok(loaded)
    }
}

struct LoadedEntry {
    raw_text: Arc<str>,
    sections: Arc<Vec<Section>>,
}
