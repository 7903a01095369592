//! Groups blog pages into listings: one listing of every blog page plus one
//! listing per tag. A listing is rendered as a single index page.

use crate::page::{Page, BLOG_PREFIX};
use crate::tag::Tag;
use std::collections::{BTreeMap, HashSet};

/// What a [`Listing`] is scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Every blog page.
    All,

    /// The blog pages carrying a tag.
    Tag(Tag),
}

/// A set of blog pages presented as one index page. `pages` keeps the order
/// of the blog pages it was built from (most recent first).
#[derive(Debug)]
pub struct Listing<'a> {
    pub kind: Kind,
    pub pages: Vec<&'a Page>,
}

impl Listing<'_> {
    /// The listing's path relative to the output root: `blog` for the listing
    /// of every blog page and `tags/{slug}` for a tag.
    pub fn path(&self) -> String {
        match &self.kind {
            Kind::All => BLOG_PREFIX.to_owned(),
            Kind::Tag(tag) => tag.path(),
        }
    }
}

/// Maps each tag to the blog pages that carry it, in `blog_pages` order.
pub type TagIndex<'a> = BTreeMap<Tag, Vec<&'a Page>>;

/// Indexes `blog_pages` by tag. A page is added to each of its tags at most
/// once, even if two of its tags slugify to the same value. Tags with an
/// empty slug are ignored.
pub fn index_by_tag(blog_pages: &[Page]) -> TagIndex {
    let mut index = TagIndex::new();
    for page in blog_pages {
        let mut seen = HashSet::new();
        for tag in page.tags().iter().filter_map(|name| Tag::new(name)) {
            if !seen.insert(tag.slug.clone()) {
                continue;
            }
            index.entry(tag).or_insert_with(Vec::new).push(page);
        }
    }
    index
}

/// Builds every listing for `blog_pages`, which must already be sorted. The
/// listing of every page comes first, followed by the tag listings ordered by
/// slug.
pub fn listings(blog_pages: &[Page]) -> Vec<Listing> {
    let index = index_by_tag(blog_pages);
    let mut listings = Vec::with_capacity(index.len() + 1);
    listings.push(Listing {
        kind: Kind::All,
        pages: blog_pages.iter().collect(),
    });
    listings.extend(index.into_iter().map(|(tag, pages)| Listing {
        kind: Kind::Tag(tag),
        pages,
    }));
    listings
}
