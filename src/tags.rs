//! Element tag enumeration and the nesting legality table.
//!
//! The schema answers one question: which tags (and whether plain text) may be
//! inserted as direct children of a given tag. The editor consults it before
//! offering an insert action and the store re-checks it at the mutation
//! boundary, so an illegal nesting can never enter the tree.

use crate::error::{TreeError, TreeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of element tags a document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    A,
    Button,
    Div,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Img,
    P,
    Video,
}

impl Tag {
    /// Every tag, in the order the editor lists them.
    pub const ALL: [Tag; 12] = [
        Tag::A,
        Tag::Button,
        Tag::Div,
        Tag::H1,
        Tag::H2,
        Tag::H3,
        Tag::H4,
        Tag::H5,
        Tag::H6,
        Tag::Img,
        Tag::P,
        Tag::Video,
    ];

    /// The lowercase markup name of the tag.
    pub fn name(self) -> &'static str {
        match self {
            Tag::A => "a",
            Tag::Button => "button",
            Tag::Div => "div",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Img => "img",
            Tag::P => "p",
            Tag::Video => "video",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = TreeError;

    fn from_str(s: &str) -> TreeResult<Tag> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| TreeError::ValidationError(format!("Unknown tag '{}'", s)))
    }
}

// Legality sets, precomputed. Interactive tags exclude each other, paragraphs
// carry inline-only content, media tags are childless.
const NON_INTERACTIVE: [Tag; 10] = [
    Tag::Div,
    Tag::H1,
    Tag::H2,
    Tag::H3,
    Tag::H4,
    Tag::H5,
    Tag::H6,
    Tag::Img,
    Tag::P,
    Tag::Video,
];

const INLINE_ONLY: [Tag; 10] = [
    Tag::A,
    Tag::Button,
    Tag::H1,
    Tag::H2,
    Tag::H3,
    Tag::H4,
    Tag::H5,
    Tag::H6,
    Tag::Img,
    Tag::Video,
];

/// Tags legally insertable as direct children of `tag`.
pub fn valid_child_tags(tag: Tag) -> &'static [Tag] {
    match tag {
        Tag::A | Tag::Button => &NON_INTERACTIVE,
        Tag::P => &INLINE_ONLY,
        Tag::Img | Tag::Video => &[],
        _ => &Tag::ALL,
    }
}

/// Whether a plain text child may be inserted under `tag`.
pub fn allows_text(tag: Tag) -> bool {
    !is_void(tag)
}

/// Void/media tags carry no children at all and render without content.
pub fn is_void(tag: Tag) -> bool {
    matches!(tag, Tag::Img | Tag::Video)
}

/// Attributes a tag requires before it renders meaningfully.
///
/// Currently empty for every tag; the table exists so per-tag requirements
/// (e.g. `src` on img/video) can be added without touching call sites.
pub fn required_attrs(_tag: Tag) -> &'static [&'static str] {
    &[]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_tags_reject_each_other() {
        assert!(!valid_child_tags(Tag::A).contains(&Tag::A));
        assert!(!valid_child_tags(Tag::A).contains(&Tag::Button));
        assert!(!valid_child_tags(Tag::Button).contains(&Tag::A));
        assert!(!valid_child_tags(Tag::Button).contains(&Tag::Button));
        assert!(valid_child_tags(Tag::Button).contains(&Tag::P));
    }

    #[test]
    fn test_paragraph_is_inline_only() {
        assert!(!valid_child_tags(Tag::P).contains(&Tag::P));
        assert!(!valid_child_tags(Tag::P).contains(&Tag::Div));
        assert!(valid_child_tags(Tag::P).contains(&Tag::A));
    }

    #[test]
    fn test_void_tags_have_no_children() {
        assert!(valid_child_tags(Tag::Img).is_empty());
        assert!(valid_child_tags(Tag::Video).is_empty());
        assert!(!allows_text(Tag::Img));
        assert!(!allows_text(Tag::Video));
        assert!(allows_text(Tag::P));
    }

    #[test]
    fn test_containers_accept_everything() {
        assert_eq!(valid_child_tags(Tag::Div), &Tag::ALL);
        assert_eq!(valid_child_tags(Tag::H1), &Tag::ALL);
    }

    #[test]
    fn test_tag_round_trips_through_name() {
        for tag in Tag::ALL {
            assert_eq!(tag.name().parse::<Tag>().unwrap(), tag);
        }
        assert!("span".parse::<Tag>().is_err());
    }
}
