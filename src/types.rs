//! Core types used throughout the project.

use std::fmt;

/// A `<location>` reference: where the application code uses a string.
///
/// Both attributes are optional in the file format. Purely informational;
/// lookups never consult it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<u32>,
}

impl Location {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: u32) -> Self {
        Self { filename: Some(filename.into()), line: Some(line) }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.filename, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => f.write_str(file),
            (None, Some(line)) => write!(f, "<current file>:{line}"),
            (None, None) => f.write_str("<unknown>"),
        }
    }
}
