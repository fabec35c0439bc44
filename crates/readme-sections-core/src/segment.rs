//! Heading-bounded segmentation
//!
//! Groups the top-level blocks of a document into [`Section`]s. Every heading
//! opens a new section; content before the first heading goes into a
//! synthetic preamble section.

use crate::ast::{Block, Section};

/// Split top-level blocks into sections, in document order.
///
/// Single pass over `nodes`. No block is dropped or duplicated: each heading
/// becomes the heading of exactly one section and every other block lands in
/// the content of the section opened most recently before it.
pub fn segment(nodes: Vec<Block>) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for node in nodes {
        match node {
            Block::Heading(heading) => {
                if let Some(done) = current.take() {
                    sections.push(done);
                }
                current = Some(Section::new(heading));
            }
            other => current
                .get_or_insert_with(Section::preamble)
                .content
                .push(other),
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }

    sections
}
