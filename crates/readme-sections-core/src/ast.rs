//! Markdown document tree
//!
//! This module defines the closed set of node kinds the segmenter and the
//! serializers operate on. The tree is produced by an external tree builder
//! (see the `readme-sections` crate) and only its shape matters here.

/// A block-level Markdown node
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// ATX or setext heading
    Heading(Heading),

    /// Paragraph containing inline content
    Paragraph(Vec<Inline>),

    /// List (ordered or unordered)
    List { ordered: bool, items: Vec<ListItem> },

    /// Fenced or indented code block, `value` kept verbatim
    Code { lang: Option<String>, value: String },

    /// Block quote containing nested blocks
    BlockQuote(Vec<Block>),

    /// Thematic break (horizontal rule)
    ThematicBreak,

    /// Raw HTML block
    HtmlBlock(String),

    /// Image standing on its own at block level
    Image(Image),

    /// Any block kind the serializer does not know about. Renders as the
    /// empty string.
    Other { kind: String, children: Vec<Block> },
}

/// A heading with depth (1-6) and inline content
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub depth: u8,
    pub children: Vec<Inline>,
}

impl Heading {
    /// Create a heading, clamping `depth` into 1..=6
    pub fn new(depth: u8, children: Vec<Inline>) -> Self {
        Self {
            depth: depth.clamp(1, 6),
            children,
        }
    }

    /// The empty level-1 heading that holds content appearing before any
    /// real heading.
    pub fn synthetic() -> Self {
        Self {
            depth: 1,
            children: vec![Inline::Text(String::new())],
        }
    }

    /// Check whether this heading has the shape of [`Heading::synthetic`]
    pub fn is_synthetic(&self) -> bool {
        self.depth == 1
            && matches!(self.children.as_slice(), [Inline::Text(text)] if text.is_empty())
    }
}

/// A list item containing blocks.
///
/// Only the first [`Block::Paragraph`] among the children contributes to
/// serialized output.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub children: Vec<Block>,
}

impl ListItem {
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }

    pub fn from_inlines(inlines: Vec<Inline>) -> Self {
        Self {
            children: vec![Block::Paragraph(inlines)],
        }
    }
}

/// Image with URL, alt text and optional title
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub url: String,
    pub alt: String,
    pub title: Option<String>,
}

impl Image {
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// An inline (phrasing) Markdown node
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Plain text, never escaped
    Text(String),

    /// Strong emphasis (bold)
    Strong(Vec<Inline>),

    /// Emphasis (italic)
    Emphasis(Vec<Inline>),

    /// Link with URL and inline content
    Link { url: String, children: Vec<Inline> },

    /// Inline image
    Image(Image),

    /// Raw inline HTML
    HtmlInline(String),

    /// Any other phrasing kind (inline code, strikethrough, breaks, ...).
    /// Renders as its children, or as the empty string when it has none.
    Other { kind: String, children: Vec<Inline> },
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(value.into())
    }

    pub fn link(url: impl Into<String>, children: Vec<Inline>) -> Self {
        Inline::Link {
            url: url.into(),
            children,
        }
    }

    pub fn other(kind: impl Into<String>, children: Vec<Inline>) -> Self {
        Inline::Other {
            kind: kind.into(),
            children,
        }
    }
}

impl Block {
    pub fn heading(depth: u8, children: Vec<Inline>) -> Self {
        Block::Heading(Heading::new(depth, children))
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph(vec![Inline::text(text)])
    }

    pub fn other(kind: impl Into<String>) -> Self {
        Block::Other {
            kind: kind.into(),
            children: Vec::new(),
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading(_))
    }
}

/// A heading plus the ordered run of blocks between it and the next heading
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// The real heading, or [`Heading::synthetic`] for a preamble
    pub heading: Heading,
    /// Heading depth, 1-6
    pub level: u8,
    /// Never contains a [`Block::Heading`]
    pub content: Vec<Block>,
}

impl Section {
    pub(crate) fn new(heading: Heading) -> Self {
        Self {
            level: heading.depth,
            heading,
            content: Vec::new(),
        }
    }

    pub(crate) fn preamble() -> Self {
        Self::new(Heading::synthetic())
    }

    /// True for the section synthesized for content before the first heading
    pub fn is_synthetic(&self) -> bool {
        self.heading.is_synthetic()
    }

    /// Heading label, see [`crate::heading_text`]
    pub fn heading_text(&self) -> String {
        crate::serialize::heading_text(&self.heading)
    }

    /// Section body regenerated as markdown, see [`crate::render_blocks`]
    pub fn markdown(&self) -> String {
        crate::serialize::render_blocks(&self.content)
    }

    /// Element id used for in-page navigation to the section at `index`
    pub fn anchor(index: usize) -> String {
        format!("section-{index}")
    }
}
