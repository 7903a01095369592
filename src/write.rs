use crate::config::Config;
use crate::listing::{self, Kind, Listing};
use crate::page::Page;
use crate::site::Site;
use crate::tag::Tag;
use crate::theme::{
    self, array, FooterData, HeadData, HeaderData, ListData, ListItem, MenuLink, PageData,
    PageMetadataData, TagLink, Theme,
};
use chrono::NaiveDate;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How publish dates are displayed, e.g. `January 2, 2006`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

const INDEX_FILE_NAME: &str = "index.html";

/// Responsible for templating pages and listings and writing them to disk.
pub struct Writer<'a> {
    /// The templates pages and listings are rendered with.
    pub theme: &'a Theme,

    /// Site-wide settings: the domain for absolute URLs, the menu, the
    /// footer, and the author.
    pub config: &'a Config,

    /// The root of the output tree.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Writes every regular page, then every blog page, then every listing.
    /// Stops at the first failure.
    pub fn write_site(&self, site: &Site) -> Result<()> {
        for page in site.all_pages() {
            self.write_page(page)?;
        }
        for listing in listing::listings(&site.blog_pages) {
            self.write_listing(&listing)?;
        }
        Ok(())
    }

    /// Takes a single [`Page`], templates it, and writes it to disk.
    pub fn write_page(&self, page: &Page) -> Result<()> {
        let page_details = match page.publish_timestamp() {
            0 => String::new(),
            _ => self.theme.render_page_metadata(PageMetadataData {
                publish_date: display_date(page.publish_date),
                tags: array(self.tag_links(page)?),
            })?,
        };

        let html = self.theme.render_page(PageData {
            header: self.header()?,
            content: page.html.clone(),
            footer: self.footer()?,
            page_details,
            head_metadata: self.theme.render_head(HeadData {
                title: page.title.clone(),
                description: page.description().to_owned(),
                author: page.author().to_owned(),
                domain_url: self.config.site_url(),
                canonical_url: self.config.url_for(&page_url_path(page))?,
            })?,
            main_page: page.is_main_page(),
        })?;

        self.write_file(&page_output_path(self.output_directory, page), &html)
    }

    /// Takes a single [`Listing`], templates it, and writes it to disk.
    pub fn write_listing(&self, listing: &Listing) -> Result<()> {
        let author = &self.config.author;
        let (title, description) = match &listing.kind {
            Kind::All => (
                format!("{}'s Blog", author),
                format!("Welcome to {}'s Blog", author),
            ),
            Kind::Tag(tag) => (
                format!("{}'s Blog: {}", author, tag.name),
                format!("Posts tagged \"{}\" on {}'s Blog", tag.name, author),
            ),
        };

        let items = listing
            .pages
            .iter()
            .map(|page| -> Result<ListItem> {
                Ok(ListItem {
                    title: page.title.clone(),
                    url: self.config.url_for(&page_url_path(page))?,
                    date: display_date(page.publish_date),
                })
            })
            .collect::<Result<Vec<ListItem>>>()?;

        let path = listing.path();
        let html = self.theme.render_list(ListData {
            header: self.header()?,
            pages: array(items),
            footer: self.footer()?,
            head_metadata: self.theme.render_head(HeadData {
                title: title.clone(),
                description,
                author: author.clone(),
                domain_url: self.config.site_url(),
                canonical_url: self.config.url_for(&format!("{}/", path))?,
            })?,
            title,
        })?;

        self.write_file(
            &self.output_directory.join(&path).join(INDEX_FILE_NAME),
            &html,
        )
    }

    fn header(&self) -> Result<String> {
        let menu = self
            .config
            .menu
            .iter()
            .map(|item| -> Result<MenuLink> {
                Ok(MenuLink {
                    title: item.title.clone(),
                    url: self.config.url_for(&item.path)?,
                })
            })
            .collect::<Result<Vec<MenuLink>>>()?;
        Ok(self.theme.render_header(HeaderData {
            domain_url: self.config.site_url(),
            menu: array(menu),
        })?)
    }

    fn footer(&self) -> Result<String> {
        Ok(self.theme.render_footer(FooterData {
            data: self.config.footer.clone(),
        })?)
    }

    fn tag_links(&self, page: &Page) -> Result<Vec<TagLink>> {
        page.tags()
            .iter()
            .filter_map(|name| Tag::new(name))
            .map(|tag| -> Result<TagLink> {
                Ok(TagLink {
                    url: self.config.url_for(&format!("{}/", tag.path()))?,
                    name: tag.name,
                })
            })
            .collect()
    }

    fn write_file(&self, path: &Path, html: &str) -> Result<()> {
        // there should always be a parent since `path` is below the output
        // directory
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|err| Error::Io {
                path: dir.to_owned(),
                err,
            })?;
        }
        std::fs::write(path, html).map_err(|err| Error::Io {
            path: path.to_owned(),
            err,
        })?;
        debug!(path = %path.display(), "wrote page");
        Ok(())
    }
}

/// The path of a page's URL relative to the site root: empty for the main
/// page, `{path}/` otherwise.
pub fn page_url_path(page: &Page) -> String {
    match page.is_main_page() {
        true => String::new(),
        false => format!("{}/", page.path),
    }
}

/// Where a page is written: `{output}/index.html` for the main page,
/// `{output}/{path}/index.html` otherwise.
pub fn page_output_path(output_directory: &Path, page: &Page) -> PathBuf {
    match page.is_main_page() {
        true => output_directory.join(INDEX_FILE_NAME),
        false => output_directory.join(&page.path).join(INDEX_FILE_NAME),
    }
}

/// Formats a publish date for display. Undated pages display nothing.
pub fn display_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => String::new(),
    }
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// An error during templating.
    Template(theme::Error),

    /// An error composing a page URL.
    Url(url::ParseError),

    /// An error writing the output files.
    Io { path: PathBuf, err: io::Error },
}

impl From<theme::Error> for Error {
    /// Converts a [`theme::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator for fallible template operations.
    fn from(err: theme::Error) -> Error {
        Error::Template(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Error {
        Error::Url(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "{}", err),
            Error::Url(err) => write!(f, "composing page URL: {}", err),
            Error::Io { path, err } => {
                write!(f, "writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(err) => Some(err),
            Error::Url(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}
