use thiserror::Error;

/// Errors raised while reading or writing a `.ts` catalog
#[derive(Error, Debug)]
pub enum TsError {
    /// Error when failing to read or write the catalog file
    #[error("Failed to access catalog file: {0}")]
    Io(#[from] std::io::Error),
    /// The file does not start with markup, e.g. a TypeScript source
    #[error("Not an XML document")]
    NotXml,
    /// The document is not well-formed XML
    #[error("Failed to parse catalog XML: {0}")]
    Xml(#[from] xmltree::ParseError),
    /// Error when failing to emit the XML tree
    #[error("Failed to write catalog XML: {0}")]
    Write(String),
    /// The root element is something other than `<TS>`
    #[error("Expected <TS> root element, found <{0}>")]
    UnexpectedRoot(String),
    /// An element that the format does not allow at this position
    #[error("Unexpected element <{element}> inside <{parent}>")]
    UnexpectedElement { parent: &'static str, element: String },
    /// A mandatory child element is absent
    #[error("<{parent}> is missing its <{element}> element")]
    MissingElement { parent: &'static str, element: &'static str },
    /// An attribute value that cannot be interpreted
    #[error("Invalid value '{value}' for attribute '{attribute}' on <{element}>")]
    InvalidAttribute { element: &'static str, attribute: &'static str, value: String },
}

impl TsError {
    /// Whether the file is some other kind of document rather than a broken catalog.
    #[must_use]
    pub const fn is_foreign(&self) -> bool {
        matches!(self, Self::NotXml | Self::UnexpectedRoot(_))
    }
}
