//! Defines the [`Header`] and [`HeaderAttribute`] types and the logic for
//! parsing a document's front matter. The front matter is a block of
//! `key = value` lines fenced by [`DELIMITER`] lines:
//!
//! ```md
//! +++
//! title = "Hello, world!"
//! date = 2021-04-16
//! tags = [greet, misc]
//! +++
//! # Hello
//! ```
//!
//! A value wrapped in `[` and `]` is a list. Malformed lines don't fail the
//! document; they are returned as [`Warning`]s and skipped.

use std::collections::HashMap;
use std::fmt;

/// The line which opens and closes the front matter block.
pub const DELIMITER: &str = "+++";

/// A named attribute from a document's front matter. An attribute always has
/// at least one value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderAttribute {
    name: String,
    values: Vec<String>,
}

impl HeaderAttribute {
    /// The attribute's name (the part left of the first `=`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first value. For scalar attributes this is the only value.
    pub fn value(&self) -> &str {
        // `values` is never empty; see `parse_header_attribute`.
        &self.values[0]
    }

    /// All of the attribute's values, in source order.
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl fmt::Display for HeaderAttribute {
    /// Serializes the attribute back into its front matter form.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.values.as_slice() {
            [value] if !value.is_empty() => write!(f, "{} = {}", self.name, value),
            values => write!(f, "{} = [{}]", self.name, values.join(", ")),
        }
    }
}

/// The parsed front matter of a document, keyed by attribute name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    attributes: HashMap<String, HeaderAttribute>,
}

impl Header {
    pub fn get(&self, name: &str) -> Option<&HeaderAttribute> {
        self.attributes.get(name)
    }

    /// Returns the first value of the attribute `name`, if present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(HeaderAttribute::value)
    }

    /// Returns every value of the attribute `name`, or an empty slice.
    pub fn values(&self, name: &str) -> &[String] {
        match self.get(name) {
            Some(attribute) => attribute.values(),
            None => &[],
        }
    }

    /// The `title` attribute with surrounding double quotes removed, or the
    /// empty string.
    pub fn title(&self) -> &str {
        self.value("title").unwrap_or_default().trim_matches('"')
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A header line that couldn't be parsed. `line` is 1-based and counts the
/// opening delimiter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub error: AttributeError,
}

/// Parses the front matter at the start of `input`. Lines are read until the
/// closing [`DELIMITER`]; if there is none, every remaining line is treated as
/// part of the header. When an attribute is repeated, the last definition wins.
pub fn parse_header(input: &str) -> Result<(Header, Vec<Warning>), Error> {
    let mut lines = input.split('\n');
    if lines.next() != Some(DELIMITER) {
        return Err(Error::MalformedHeader);
    }

    let mut header = Header::default();
    let mut warnings = Vec::new();
    for (i, line) in lines.enumerate() {
        if line == DELIMITER {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        // +2: one for the opening delimiter and one for 1-based numbering
        let line_number = i + 2;
        match parse_header_attribute(line) {
            Ok(attribute) => {
                if header.attributes.contains_key(&attribute.name) {
                    warnings.push(Warning {
                        line: line_number,
                        error: AttributeError::Duplicate(attribute.name.clone()),
                    });
                }
                header.attributes.insert(attribute.name.clone(), attribute);
            }
            Err(error) => warnings.push(Warning {
                line: line_number,
                error,
            }),
        }
    }
    Ok((header, warnings))
}

/// Parses a single `key = value` or `key = [a, b, c]` line.
pub fn parse_header_attribute(line: &str) -> Result<HeaderAttribute, AttributeError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(AttributeError::EmptyLine);
    }

    let (name, value) = match line.find('=') {
        Some(i) => (line[..i].trim(), line[i + 1..].trim()),
        None => return Err(AttributeError::MissingSeparator(line.to_owned())),
    };
    if name.is_empty() {
        return Err(AttributeError::EmptyName(line.to_owned()));
    }
    if value.is_empty() {
        return Err(AttributeError::EmptyValue(name.to_owned()));
    }

    let values = match (value.starts_with('['), value.ends_with(']')) {
        (true, true) => value[1..value.len() - 1]
            .split(',')
            .map(|v| v.trim().to_owned())
            .collect(),
        (false, false) => vec![value.to_owned()],
        _ => return Err(AttributeError::InvalidList(name.to_owned())),
    };

    Ok(HeaderAttribute {
        name: name.to_owned(),
        values,
    })
}

/// Represents a problem with a single header line. These are recoverable:
/// the offending line is skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeError {
    /// The line is blank.
    EmptyLine,

    /// The line has no `=`.
    MissingSeparator(String),

    /// Nothing precedes the `=`.
    EmptyName(String),

    /// Nothing follows the `=`.
    EmptyValue(String),

    /// The value has an opening `[` without a closing `]` or vice versa.
    InvalidList(String),

    /// The attribute was already defined earlier in the header. The later
    /// definition replaces the earlier one.
    Duplicate(String),
}

impl fmt::Display for AttributeError {
    /// Displays an [`AttributeError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AttributeError::EmptyLine => write!(f, "empty line"),
            AttributeError::MissingSeparator(line) => {
                write!(f, "cannot parse line `{}`: missing `=`", line)
            }
            AttributeError::EmptyName(line) => {
                write!(f, "cannot parse line `{}`: missing attribute name", line)
            }
            AttributeError::EmptyValue(name) => {
                write!(f, "attribute `{}` has no value", name)
            }
            AttributeError::InvalidList(name) => {
                write!(f, "attribute `{}` has an invalid list format", name)
            }
            AttributeError::Duplicate(name) => {
                write!(f, "attribute `{}` is defined more than once", name)
            }
        }
    }
}

impl std::error::Error for AttributeError {}

/// Represents a fatal problem parsing a header.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// Returned when the document doesn't begin with a [`DELIMITER`] line.
    MalformedHeader,
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedHeader => {
                write!(f, "header does not start with `{}`", DELIMITER)
            }
        }
    }
}

impl std::error::Error for Error {}
