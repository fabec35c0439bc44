//! # readme-sections
//!
//! Split a README-style markdown document into heading-anchored sections.
//!
//! The pipeline is fetch → parse → segment → serialize:
//!
//! - a [`DocumentSource`] produces the raw text (a file, a string, or an HTTP
//!   URL with the `http` feature),
//! - [`parse_markdown`] builds the block tree with pulldown-cmark,
//! - [`segment`] groups top-level blocks into [`Section`]s,
//! - [`Section::markdown`] and [`Section::heading_text`] regenerate markdown
//!   and display labels.
//!
//! [`DocumentCache`] wraps fetch, parse and segment as one memoized unit.
//!
//! ## Example
//!
//! ```rust
//! use readme_sections::{DocumentCache, StaticSource};
//!
//! let cache = DocumentCache::new(StaticSource::new("# Hello\n\nWorld\n\n## Next\n"));
//!
//! let sections = cache.sections().unwrap();
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].heading_text(), "Hello");
//! assert_eq!(sections[0].markdown(), "World");
//! ```

pub mod cache;
pub mod config;
pub mod parse;
pub mod source;

pub use cache::{CacheState, DocumentCache};
pub use config::{ConfigError, SourceConfig};
pub use parse::{parse_markdown, parse_sections};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{DocumentSource, FileSource, StaticSource};

pub use readme_sections_core::{
    heading_text, render_block, render_blocks, render_inline, render_inlines, segment, Block,
    Heading, Image, Inline, ListItem, Section,
};

/// Error type for readme-sections operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch {source_name}: {message}")]
    Fetch {
        source_name: String,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn fetch(source_name: impl Into<String>, message: impl ToString) -> Self {
        Error::Fetch {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
