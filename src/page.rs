//! Defines the [`Page`] type: one parsed and rendered source document.

use crate::content;
use crate::diagnostic::{Diagnostic, Kind};
use crate::header::{self, Header};
use crate::markdown;
use chrono::NaiveDate;
use std::path::Path;

/// The page path of the site's home page. It's written to the output root
/// rather than to a subdirectory.
pub const MAIN_PAGE_PATH: &str = "index";

/// Pages whose path starts with this prefix are blog pages.
pub const BLOG_PREFIX: &str = "blog";

/// The format of the `date` attribute.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Returns whether a page at `path` is a blog page. This is the only place
/// where the classification rule lives.
pub fn is_blog_path(path: &str) -> bool {
    path.starts_with(BLOG_PREFIX)
}

/// Parses a `date` attribute. Months and days must be zero-padded.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(DateError::Parse)?;
    match date.format(DATE_FORMAT).to_string() == value {
        true => Ok(date),
        false => Err(DateError::NotZeroPadded),
    }
}

/// A parsed source document.
#[derive(Clone, Debug)]
pub struct Page {
    pub header: Header,

    /// The `title` attribute without surrounding quotes, or empty.
    pub title: String,

    /// The path relative to the source directory, `/`-separated, without the
    /// `.md` extension.
    pub path: String,

    /// The `date` attribute; [`None`] if it's missing or unparsable.
    pub publish_date: Option<NaiveDate>,

    pub raw_content: String,

    /// The title heading followed by the rendered body.
    pub html: String,
}

impl Page {
    /// Parses a page from its source. Recoverable header problems are pushed
    /// onto `diagnostics` (attributed to `source_path`). Returns `Ok(None)` if
    /// the body renders to nothing.
    pub fn parse(
        source_path: &Path,
        path: String,
        raw_content: String,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Option<Page>, Error> {
        let (header, warnings) = header::parse_header(&raw_content)?;
        diagnostics.extend(warnings.into_iter().map(|w| Diagnostic {
            path: source_path.to_owned(),
            kind: Kind::Attribute {
                line: w.line,
                error: w.error,
            },
        }));

        let title = header.title().to_owned();
        let body = content::extract_body(&raw_content, &title)?;
        let html = markdown::to_html(&body);
        if html.is_empty() {
            return Ok(None);
        }

        let publish_date = match header.value("date") {
            None => None,
            Some(value) => match parse_date(value) {
                Ok(date) => Some(date),
                Err(error) => {
                    diagnostics.push(Diagnostic {
                        path: source_path.to_owned(),
                        kind: Kind::InvalidDate {
                            value: value.to_owned(),
                            error,
                        },
                    });
                    None
                }
            },
        };

        Ok(Some(Page {
            header,
            title,
            path,
            publish_date,
            raw_content,
            html,
        }))
    }

    /// The publish date as a Unix timestamp at midnight UTC, or `0` if the
    /// page is undated.
    pub fn publish_timestamp(&self) -> i64 {
        match self.publish_date {
            Some(date) => date.and_hms(0, 0, 0).timestamp(),
            None => 0,
        }
    }

    pub fn is_main_page(&self) -> bool {
        self.path == MAIN_PAGE_PATH
    }

    pub fn is_blog_page(&self) -> bool {
        is_blog_path(&self.path)
    }

    pub fn author(&self) -> &str {
        self.header.value("author").unwrap_or("Unknown")
    }

    pub fn description(&self) -> &str {
        self.header.value("description").unwrap_or("Unknown")
    }

    /// The raw values of the `tags` attribute.
    pub fn tags(&self) -> &[String] {
        self.header.values("tags")
    }
}

/// Represents an unusable `date` attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum DateError {
    /// The value isn't a `YYYY-MM-DD` date.
    Parse(chrono::ParseError),

    /// The value is a date, but not in the `YYYY-MM-DD` layout (e.g.,
    /// `2024-3-1`).
    NotZeroPadded,
}

impl std::fmt::Display for DateError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DateError::Parse(err) => write!(f, "{}", err),
            DateError::NotZeroPadded => write!(f, "expected the layout YYYY-MM-DD"),
        }
    }
}

impl std::error::Error for DateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DateError::Parse(err) => Some(err),
            DateError::NotZeroPadded => None,
        }
    }
}

/// Represents a fatal problem parsing a [`Page`].
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Header(header::Error),
    Content(content::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Header(err) => write!(f, "{}", err),
            Error::Content(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Header(err) => Some(err),
            Error::Content(err) => Some(err),
        }
    }
}

impl From<header::Error> for Error {
    fn from(err: header::Error) -> Error {
        Error::Header(err)
    }
}

impl From<content::Error> for Error {
    fn from(err: content::Error) -> Error {
        Error::Content(err)
    }
}
