//! Recoverable problems found while building a site. They don't stop the
//! build; they are collected and handed back to the caller for reporting.

use crate::header::AttributeError;
use crate::page::DateError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// The source document the problem was found in.
    pub path: PathBuf,
    pub kind: Kind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// A header line was skipped. `line` is 1-based.
    Attribute { line: usize, error: AttributeError },

    /// The `date` attribute isn't a `YYYY-MM-DD` date; the page is treated as
    /// undated.
    InvalidDate { value: String, error: DateError },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            Kind::Attribute { line, error } => {
                write!(f, "{}:{}: {}", self.path.display(), line, error)
            }
            Kind::InvalidDate { value, error } => write!(
                f,
                "{}: invalid date `{}`: {}",
                self.path.display(),
                value,
                error
            ),
        }
    }
}
