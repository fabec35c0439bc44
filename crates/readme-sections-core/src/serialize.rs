//! Markdown tree serialization
//!
//! Converts tree nodes back into Markdown text. Output is a pure function of
//! the tree: nothing is escaped, trimmed or collapsed, so a node's text comes
//! out exactly as the tree builder recorded it.

use crate::ast::{Block, Heading, Image, Inline, ListItem};

/// Render a single inline node
pub fn render_inline(inline: &Inline) -> String {
    let mut out = String::new();
    write_inline(inline, &mut out);
    out
}

/// Render inline nodes, concatenated without separator
pub fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    write_inlines(inlines, &mut out);
    out
}

/// Render a single block node
pub fn render_block(block: &Block) -> String {
    let mut out = String::with_capacity(256);
    write_block(block, &mut out);
    out
}

/// Render blocks separated by a blank line, as used for a section body
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::with_capacity(blocks.len() * 128);
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        write_block(block, &mut out);
    }
    out
}

/// Heading label for display.
///
/// This is the markdown rendering of the heading's children, so emphasis and
/// links keep their `**`, `*` and `[..](..)` syntax.
pub fn heading_text(heading: &Heading) -> String {
    render_inlines(&heading.children)
}

fn write_block(block: &Block, out: &mut String) {
    match block {
        Block::Paragraph(inlines) => write_inlines(inlines, out),

        Block::Heading(heading) => {
            for _ in 0..heading.depth {
                out.push('#');
            }
            out.push(' ');
            write_inlines(&heading.children, out);
        }

        Block::List { ordered, items } => write_list(*ordered, items, out),

        Block::Code { lang, value } => {
            out.push_str("```");
            if let Some(lang) = lang {
                out.push_str(lang);
            }
            out.push('\n');
            out.push_str(value);
            out.push_str("\n```");
        }

        Block::BlockQuote(children) => {
            // Only the first line of each child gets the marker
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                out.push_str("> ");
                write_block(child, out);
            }
        }

        Block::HtmlBlock(html) => out.push_str(html),

        Block::ThematicBreak => out.push_str("---"),

        Block::Image(image) => write_image(image, out),

        Block::Other { .. } => {}
    }
}

fn write_list(ordered: bool, items: &[ListItem], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }

        if ordered {
            out.push_str(&(i + 1).to_string());
            out.push_str(". ");
        } else {
            out.push_str("- ");
        }

        // Only the first paragraph is rendered; lists, code and quotes are skipped
        let first_paragraph = item.children.iter().find_map(|block| match block {
            Block::Paragraph(inlines) => Some(inlines),
            _ => None,
        });
        if let Some(inlines) = first_paragraph {
            write_inlines(inlines, out);
        }
    }
}

fn write_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        write_inline(inline, out);
    }
}

fn write_inline(inline: &Inline, out: &mut String) {
    match inline {
        Inline::Text(text) => out.push_str(text),

        Inline::Strong(children) => {
            out.push_str("**");
            write_inlines(children, out);
            out.push_str("**");
        }

        Inline::Emphasis(children) => {
            out.push('*');
            write_inlines(children, out);
            out.push('*');
        }

        Inline::Link { url, children } => {
            out.push('[');
            write_inlines(children, out);
            out.push_str("](");
            out.push_str(url);
            out.push(')');
        }

        Inline::Image(image) => write_image(image, out),

        Inline::HtmlInline(html) => out.push_str(html),

        Inline::Other { children, .. } => write_inlines(children, out),
    }
}

fn write_image(image: &Image, out: &mut String) {
    out.push_str("![");
    out.push_str(&image.alt);
    out.push_str("](");
    out.push_str(&image.url);
    if let Some(title) = image.title.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(" \"");
        out.push_str(title);
        out.push('"');
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn text(value: &str) -> Inline {
        Inline::text(value)
    }

    fn items(values: &[&str]) -> Vec<ListItem> {
        values
            .iter()
            .map(|v| ListItem::from_inlines(vec![text(v)]))
            .collect()
    }

    #[test]
    fn test_paragraph() {
        let block = Block::Paragraph(vec![text("hello")]);
        assert_eq!(render_block(&block), "hello");
    }

    #[test]
    fn test_strong_then_text() {
        let block = Block::Paragraph(vec![Inline::Strong(vec![text("a")]), text(" b")]);
        assert_eq!(render_block(&block), "**a** b");
    }

    #[test]
    fn test_text_is_not_escaped() {
        let block = Block::Paragraph(vec![text("*not* [a](link) #1")]);
        assert_eq!(render_block(&block), "*not* [a](link) #1");
    }

    #[test]
    fn test_nested_inline_formatting() {
        let inline = Inline::link(
            "https://example.com",
            vec![
                Inline::Strong(vec![Inline::Emphasis(vec![text("deep")])]),
                text(" link"),
            ],
        );
        assert_eq!(render_inline(&inline), "[***deep*** link](https://example.com)");
    }

    #[rstest]
    #[case::image_without_title(Inline::Image(Image::new("a.png", "Alt")), "![Alt](a.png)")]
    #[case::image_with_title(
        Inline::Image(Image::new("a.png", "Alt").with_title("T")),
        "![Alt](a.png \"T\")"
    )]
    #[case::image_without_alt(Inline::Image(Image::new("a.png", "")), "![](a.png)")]
    #[case::html(Inline::HtmlInline("<br/>".to_string()), "<br/>")]
    #[case::emphasis(Inline::Emphasis(vec![Inline::text("i")]), "*i*")]
    #[case::unknown_with_children(Inline::other("delete", vec![Inline::text("gone")]), "gone")]
    #[case::unknown_without_children(Inline::other("break", Vec::new()), "")]
    fn test_render_inline(#[case] inline: Inline, #[case] expected: &str) {
        assert_eq!(render_inline(&inline), expected);
    }

    #[test]
    fn test_render_inlines_concatenates() {
        let inlines = vec![text("a"), Inline::Emphasis(vec![text("b")]), text("c")];
        assert_eq!(render_inlines(&inlines), "a*b*c");
    }

    #[rstest]
    #[case(1, "# Title")]
    #[case(3, "### Title")]
    #[case(6, "###### Title")]
    fn test_heading(#[case] depth: u8, #[case] expected: &str) {
        let block = Block::heading(depth, vec![text("Title")]);
        assert_eq!(render_block(&block), expected);
    }

    #[test]
    fn test_ordered_list() {
        let block = Block::List {
            ordered: true,
            items: items(&["one", "two"]),
        };
        assert_eq!(render_block(&block), "1. one\n2. two");
    }

    #[test]
    fn test_unordered_list() {
        let block = Block::List {
            ordered: false,
            items: items(&["one", "two"]),
        };
        assert_eq!(render_block(&block), "- one\n- two");
    }

    #[test]
    fn test_list_item_without_paragraph_is_empty() {
        let block = Block::List {
            ordered: false,
            items: vec![
                ListItem::new(vec![Block::Code {
                    lang: None,
                    value: "x".to_string(),
                }]),
                ListItem::new(vec![
                    Block::paragraph("kept"),
                    Block::List {
                        ordered: false,
                        items: items(&["nested"]),
                    },
                ]),
                ListItem::new(Vec::new()),
            ],
        };
        assert_eq!(render_block(&block), "- \n- kept\n- ");
    }

    #[test]
    fn test_list_item_text_comes_from_first_paragraph() {
        let block = Block::List {
            ordered: true,
            items: vec![ListItem::new(vec![
                Block::Code {
                    lang: None,
                    value: "x".to_string(),
                },
                Block::paragraph("after"),
                Block::paragraph("ignored"),
            ])],
        };
        assert_eq!(render_block(&block), "1. after");
    }

    #[test]
    fn test_code_fence_with_lang() {
        let block = Block::Code {
            lang: Some("js".to_string()),
            value: "let x=1;\nlet y=2;".to_string(),
        };
        let result = render_block(&block);
        assert!(result.starts_with("```js"));
        assert!(result.contains("let x=1;\nlet y=2;"));
        assert!(result.ends_with("```"));
        assert_eq!(result, "```js\nlet x=1;\nlet y=2;\n```");
    }

    #[test]
    fn test_code_fence_without_lang() {
        let block = Block::Code {
            lang: None,
            value: "a  *b*\n\n  c".to_string(),
        };
        assert_eq!(render_block(&block), "```\na  *b*\n\n  c\n```");
    }

    #[test]
    fn test_blockquote() {
        let block = Block::BlockQuote(vec![Block::paragraph("Quote")]);
        assert_eq!(render_block(&block), "> Quote");
    }

    #[test]
    fn test_blockquote_prefixes_first_line_of_each_child_only() {
        let block = Block::BlockQuote(vec![
            Block::Paragraph(vec![text("line one\nline two")]),
            Block::List {
                ordered: true,
                items: items(&["a", "b"]),
            },
        ]);
        assert_eq!(render_block(&block), "> line one\nline two\n> 1. a\n2. b");
    }

    #[test]
    fn test_nested_blockquote() {
        let block = Block::BlockQuote(vec![Block::BlockQuote(vec![Block::paragraph("deep")])]);
        assert_eq!(render_block(&block), "> > deep");
    }

    #[rstest]
    #[case::thematic_break(Block::ThematicBreak, "---")]
    #[case::html(Block::HtmlBlock("<div>\n<p>x</p>\n</div>".to_string()), "<div>\n<p>x</p>\n</div>")]
    #[case::image(Block::Image(Image::new("b.png", "B").with_title("t")), "![B](b.png \"t\")")]
    #[case::unknown(Block::other("table"), "")]
    fn test_render_block(#[case] block: Block, #[case] expected: &str) {
        assert_eq!(render_block(&block), expected);
    }

    #[test]
    fn test_render_blocks_joins_with_blank_line() {
        let blocks = vec![
            Block::paragraph("first"),
            Block::List {
                ordered: false,
                items: items(&["a", "b"]),
            },
            Block::ThematicBreak,
        ];
        assert_eq!(render_blocks(&blocks), "first\n\n- a\n- b\n\n---");
    }

    #[test]
    fn test_render_blocks_keeps_empty_output_of_unknown_blocks() {
        let blocks = vec![Block::paragraph("a"), Block::other("table"), Block::paragraph("b")];
        assert_eq!(render_blocks(&blocks), "a\n\n\n\nb");
    }

    #[test]
    fn test_render_blocks_empty() {
        assert_eq!(render_blocks(&[]), "");
    }

    #[test]
    fn test_heading_text_keeps_markdown_syntax() {
        let heading = Heading::new(
            2,
            vec![
                Inline::Strong(vec![text("Bold")]),
                text(" and "),
                Inline::link("/x", vec![text("link")]),
            ],
        );
        assert_eq!(heading_text(&heading), "**Bold** and [link](/x)");
    }

    #[test]
    fn test_heading_text_of_synthetic_heading_is_empty() {
        assert_eq!(heading_text(&Heading::synthetic()), "");
    }
}
