//! The library code for the `ppg` static site generator. The architecture can
//! be generally broken down into two distinct steps:
//!
//! 1. Parsing pages from source files on disk ([`crate::site`])
//! 2. Converting the pages into output files on disk ([`crate::write`])
//!
//! Parsing a page means splitting off its `+++`-fenced front matter
//! ([`crate::header`]), prefixing the body with the title
//! ([`crate::content`]), and rendering the Markdown ([`crate::markdown`]).
//! Pages below the source directory's `blog` folder are blog pages; they are
//! sorted by date and grouped by tag into listings ([`crate::listing`]).
//!
//! Writing applies the theme's templates ([`crate::theme`]) to every page and
//! listing. [`crate::build`] ties both steps together with the static asset
//! copy.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod content;
pub mod diagnostic;
pub mod header;
pub mod listing;
pub mod markdown;
pub mod page;
pub mod site;
pub mod tag;
pub mod theme;
pub mod write;
