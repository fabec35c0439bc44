//! readme-sections-core - Markdown tree, segmentation and serialization
//!
//! This crate provides the data structures and pure transformations behind
//! `readme-sections`: grouping a parsed document into heading-bounded
//! sections and regenerating markdown for each section body.
//!
//! # Architecture
//!
//! ```text
//!                 ┌───────────┐   Vec<Section>   ┌────────────┐
//! Vec<Block> ───▶ │ segment() │ ───────────────▶ │ serializer │ ──▶ Markdown per section
//!                 └───────────┘                  └────────────┘ ──▶ heading labels
//! ```
//!
//! # Example
//!
//! ```rust
//! use readme_sections_core::{segment, Block, Inline};
//!
//! let sections = segment(vec![
//!     Block::paragraph("Intro"),
//!     Block::heading(2, vec![Inline::Strong(vec![Inline::text("About")])]),
//!     Block::Paragraph(vec![
//!         Inline::text("Hello "),
//!         Inline::Emphasis(vec![Inline::text("world")]),
//!     ]),
//! ]);
//!
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[0].heading_text(), "");
//! assert_eq!(sections[1].heading_text(), "**About**");
//! assert_eq!(sections[1].markdown(), "Hello *world*");
//! ```

mod ast;
mod segment;
mod serialize;

pub use ast::{Block, Heading, Image, Inline, ListItem, Section};
pub use segment::segment;
pub use serialize::{heading_text, render_block, render_blocks, render_inline, render_inlines};
