//! Markdown parsing.
//!
//! This module builds the block tree used by `readme-sections-core` from the
//! pulldown-cmark event stream. The tree follows the shape of a markdown
//! syntax tree (mdast) rather than pulldown-cmark's own: tight list items still
//! get a paragraph, adjacent text is merged, and code/HTML values lose their
//! trailing newline.
//!
//! Only CommonMark is recognised. Tables, strikethrough, task list markers and
//! footnotes stay in the tree as literal paragraph text, so a section's
//! markdown still carries them.

use log::debug;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use readme_sections_core::{segment, Block, Heading, Image, Inline, ListItem, Section};

use crate::{Error, Result};

/// Parse markdown text into its top-level blocks.
///
/// # Example
///
/// ```rust
/// use readme_sections::{parse_markdown, Block};
///
/// let blocks = parse_markdown("Hello\n\n---\n").unwrap();
/// assert_eq!(blocks, vec![Block::paragraph("Hello"), Block::ThematicBreak]);
/// ```
pub fn parse_markdown(text: &str) -> Result<Vec<Block>> {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(text, Options::empty()) {
        builder.process_event(event)?;
    }
    let blocks = builder.finish()?;
    debug!("parsed {} top-level blocks", blocks.len());
    Ok(blocks)
}

/// Parse markdown text and group it into sections.
pub fn parse_sections(text: &str) -> Result<Vec<Section>> {
    Ok(segment(parse_markdown(text)?))
}

/// An element still open while its events are being consumed
enum Frame {
    Document(Vec<Block>),
    Paragraph(Vec<Inline>),
    Heading { depth: u8, children: Vec<Inline> },
    BlockQuote(Vec<Block>),
    List { ordered: bool, items: Vec<ListItem> },
    /// `pending` holds inline content of a tight item until a block starts
    /// or the item ends
    Item { children: Vec<Block>, pending: Vec<Inline> },
    Code { lang: Option<String>, value: String },
    Html(String),
    Inline { kind: InlineKind, children: Vec<Inline> },
    Image { url: String, title: String, children: Vec<Inline> },
    /// A block kind with no serialized form; everything inside is skipped
    Opaque { kind: &'static str, depth: usize },
}

enum InlineKind {
    Strong,
    Emphasis,
    Link(String),
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::Document(_) => "document",
            Frame::Paragraph(_) => "paragraph",
            Frame::Heading { .. } => "heading",
            Frame::BlockQuote(_) => "blockquote",
            Frame::List { .. } => "list",
            Frame::Item { .. } => "list item",
            Frame::Code { .. } => "code block",
            Frame::Html(_) => "html block",
            Frame::Inline { .. } => "inline",
            Frame::Image { .. } => "image",
            Frame::Opaque { kind, .. } => *kind,
        }
    }
}

/// Finished node handed to the parent frame
enum Node {
    Block(Block),
    Inline(Inline),
    Item(ListItem),
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::Document(Vec::new())],
        }
    }

    fn process_event(&mut self, event: Event) -> Result<()> {
        if let Some(Frame::Opaque { depth, .. }) = self.stack.last_mut() {
            match event {
                Event::Start(_) => *depth += 1,
                Event::End(_) if *depth > 0 => *depth -= 1,
                Event::End(_) => self.close()?,
                _ => {}
            }
            return Ok(());
        }

        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close()?,
            Event::Text(text) => match self.stack.last_mut() {
                Some(Frame::Code { value, .. }) => value.push_str(&text),
                Some(Frame::Html(html)) => html.push_str(&text),
                _ => self.push_text(&text)?,
            },
            Event::Code(code) => self.push_inline(Inline::other(
                "inlineCode",
                vec![Inline::text(code.to_string())],
            ))?,
            Event::Html(html) => match self.stack.last_mut() {
                Some(Frame::Html(value)) => value.push_str(&html),
                _ => self.push_inline(Inline::HtmlInline(html.to_string()))?,
            },
            Event::InlineHtml(html) => self.push_inline(Inline::HtmlInline(html.to_string()))?,
            Event::SoftBreak => self.push_text("\n")?,
            Event::HardBreak => self.push_inline(Inline::other("break", Vec::new()))?,
            Event::Rule => self.push_block(Block::ThematicBreak)?,
            // Extension events; never emitted without their parser option
            Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::FootnoteReference(_)
            | Event::TaskListMarker(_) => {}
        }
        Ok(())
    }

    fn open(&mut self, tag: Tag) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph(Vec::new()),
            Tag::Heading { level, .. } => Frame::Heading {
                depth: level as u8,
                children: Vec::new(),
            },
            Tag::BlockQuote(_) => Frame::BlockQuote(Vec::new()),
            Tag::CodeBlock(kind) => Frame::Code {
                lang: match kind {
                    // The info string may carry metadata after the language
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                },
                value: String::new(),
            },
            Tag::HtmlBlock => Frame::Html(String::new()),
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                items: Vec::new(),
            },
            Tag::Item => Frame::Item {
                children: Vec::new(),
                pending: Vec::new(),
            },
            Tag::Emphasis => inline_frame(InlineKind::Emphasis),
            Tag::Strong => inline_frame(InlineKind::Strong),
            Tag::Link { dest_url, .. } => inline_frame(InlineKind::Link(dest_url.to_string())),
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                url: dest_url.to_string(),
                title: title.to_string(),
                children: Vec::new(),
            },
            // Extension blocks; never opened without their parser option
            _ => opaque("extension"),
        };

        // Block content ends the inline run of a tight list item
        if is_block_frame(&frame) {
            self.flush_pending();
        }
        self.stack.push(frame);
    }

    fn close(&mut self) -> Result<()> {
        // The document frame at the bottom is never closed by an end tag
        if self.stack.len() < 2 {
            return Err(Error::Parse("end tag without matching start".to_string()));
        }
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::Parse("empty parser stack".to_string()))?;

        match finish_frame(frame)? {
            Node::Block(block) => self.push_block(block),
            Node::Inline(inline) => self.push_inline(inline),
            Node::Item(item) => match self.stack.last_mut() {
                Some(Frame::List { items, .. }) => {
                    items.push(item);
                    Ok(())
                }
                Some(other) => Err(Error::Parse(format!(
                    "list item inside {}",
                    other.name()
                ))),
                None => Err(Error::Parse("list item outside document".to_string())),
            },
        }
    }

    fn finish(mut self) -> Result<Vec<Block>> {
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(Frame::Document(blocks)), true) => Ok(blocks),
            (Some(frame), _) => Err(Error::Parse(format!("unclosed {}", frame.name()))),
            (None, _) => Err(Error::Parse("empty parser stack".to_string())),
        }
    }

    fn flush_pending(&mut self) {
        if let Some(Frame::Item { children, pending }) = self.stack.last_mut() {
            if !pending.is_empty() {
                children.push(Block::Paragraph(std::mem::take(pending)));
            }
        }
    }

    fn push_block(&mut self, block: Block) -> Result<()> {
        self.flush_pending();
        match self.stack.last_mut() {
            Some(Frame::Document(blocks))
            | Some(Frame::BlockQuote(blocks))
            | Some(Frame::Item {
                children: blocks, ..
            }) => {
                blocks.push(block);
                Ok(())
            }
            Some(other) => Err(Error::Parse(format!(
                "block element inside {}",
                other.name()
            ))),
            None => Err(Error::Parse("block outside document".to_string())),
        }
    }

    fn push_text(&mut self, text: &str) -> Result<()> {
        if let Some(Inline::Text(last)) = self.inline_target().and_then(|t| t.last_mut()) {
            last.push_str(text);
            return Ok(());
        }
        self.push_inline(Inline::text(text))
    }

    fn push_inline(&mut self, inline: Inline) -> Result<()> {
        if let Some(target) = self.inline_target() {
            target.push(inline);
            return Ok(());
        }
        match self.stack.last() {
            // Stray phrasing content at block level becomes its own paragraph
            Some(Frame::Document(_)) | Some(Frame::BlockQuote(_)) => {
                self.push_block(Block::Paragraph(vec![inline]))
            }
            Some(other) => Err(Error::Parse(format!(
                "inline element inside {}",
                other.name()
            ))),
            None => Err(Error::Parse("inline outside document".to_string())),
        }
    }

    fn inline_target(&mut self) -> Option<&mut Vec<Inline>> {
        match self.stack.last_mut()? {
            Frame::Paragraph(children)
            | Frame::Heading { children, .. }
            | Frame::Inline { children, .. }
            | Frame::Image { children, .. }
            | Frame::Item {
                pending: children, ..
            } => Some(children),
            _ => None,
        }
    }
}

fn inline_frame(kind: InlineKind) -> Frame {
    Frame::Inline {
        kind,
        children: Vec::new(),
    }
}

fn opaque(kind: &'static str) -> Frame {
    Frame::Opaque { kind, depth: 0 }
}

fn is_block_frame(frame: &Frame) -> bool {
    !matches!(frame, Frame::Inline { .. } | Frame::Image { .. })
}

fn finish_frame(frame: Frame) -> Result<Node> {
    let node = match frame {
        Frame::Paragraph(children) => Node::Block(Block::Paragraph(children)),
        Frame::Heading { depth, children } => {
            Node::Block(Block::Heading(Heading::new(depth, children)))
        }
        Frame::BlockQuote(children) => Node::Block(Block::BlockQuote(children)),
        Frame::List { ordered, items } => Node::Block(Block::List { ordered, items }),
        Frame::Item {
            mut children,
            pending,
        } => {
            if !pending.is_empty() {
                children.push(Block::Paragraph(pending));
            }
            Node::Item(ListItem::new(children))
        }
        Frame::Code { lang, mut value } => {
            if value.ends_with('\n') {
                value.pop();
            }
            Node::Block(Block::Code { lang, value })
        }
        Frame::Html(mut html) => {
            html.truncate(html.trim_end_matches('\n').len());
            Node::Block(Block::HtmlBlock(html))
        }
        Frame::Inline { kind, children } => Node::Inline(match kind {
            InlineKind::Strong => Inline::Strong(children),
            InlineKind::Emphasis => Inline::Emphasis(children),
            InlineKind::Link(url) => Inline::Link { url, children },
        }),
        Frame::Image {
            url,
            title,
            children,
        } => Node::Inline(Inline::Image(Image {
            url,
            alt: plain_text(&children),
            title: Some(title).filter(|t| !t.is_empty()),
        })),
        Frame::Opaque { kind, .. } => Node::Block(Block::other(kind)),
        Frame::Document(_) => {
            return Err(Error::Parse("document closed by an end tag".to_string()))
        }
    };
    Ok(node)
}

/// Text content of inline nodes without any markup, used for image alt text
fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Link { children, .. }
            | Inline::Other { children, .. } => out.push_str(&plain_text(children)),
            Inline::Image(image) => out.push_str(&image.alt),
            Inline::HtmlInline(_) => {}
        }
    }
    out
}
