//! Defines the [`Tag`] type, which represents a blog page tag.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Represents a blog page tag. Tags are compared by their `slug`, so `macOS`
/// and `MacOS` are the same tag.
#[derive(Clone, Debug)]
pub struct Tag {
    /// The tag as it was written in the front matter.
    pub name: String,

    /// The slugified name. This is what goes into output paths and URLs, so
    /// it never contains separators or `..` segments.
    pub slug: String,
}

impl Tag {
    /// Creates a [`Tag`] from its front matter spelling. Returns [`None`] if
    /// nothing of the name survives slugification (e.g., an empty list
    /// element).
    pub fn new(name: &str) -> Option<Tag> {
        let slug = slug::slugify(name);
        if slug.is_empty() {
            return None;
        }
        Some(Tag {
            name: name.to_owned(),
            slug,
        })
    }

    /// The tag's listing path relative to the output root.
    pub fn path(&self) -> String {
        format!("tags/{}", self.slug)
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating directly to the `slug`
    /// field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slug.hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by delegating directly
    /// to the `slug` field.
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}
impl Eq for Tag {}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.slug.cmp(&other.slug)
    }
}
