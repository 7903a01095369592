//! Separates a document's Markdown body from its front matter.

use crate::header::DELIMITER;
use std::fmt;

/// Returns the part of `input` after the closing front matter delimiter,
/// prefixed with a level-one heading for `title`. The heading is added whether
/// or not the body already has one.
pub fn extract_body(input: &str, title: &str) -> Result<String, Error> {
    let mut delimiters = 0;
    let mut offset = 0;
    for line in input.split('\n') {
        offset += line.len() + 1;
        if line == DELIMITER {
            delimiters += 1;
            if delimiters == 2 {
                let body = input.get(offset..).unwrap_or_default();
                return Ok(format!("# {}\n{}", title, body));
            }
        }
    }
    Err(Error::HeaderEndNotFound)
}

/// Represents a problem extracting a document body.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the document has fewer than two delimiter lines.
    HeaderEndNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::HeaderEndNotFound => {
                write!(f, "header end `{}` not found", DELIMITER)
            }
        }
    }
}

impl std::error::Error for Error {}
