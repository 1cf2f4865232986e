//! Indexer type definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::{
    Catalog,
    LookupOptions,
};
use crate::config::MatcherError;
use crate::input::language::document_language;
use crate::input::{
    TsDocument,
    TsError,
    load_document,
};

/// A catalog file read during indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub path: PathBuf,
    /// The `language` attribute, else the code detected from the file name.
    pub language: String,
    pub document: TsDocument,
}

impl LoadedDocument {
    /// Reads and parses `path`, detecting its language.
    ///
    /// # Errors
    /// The file cannot be read or is not a valid catalog.
    pub fn load(path: PathBuf) -> Result<Self, TsError> {
        let document = load_document(&path)?;
        let language = document_language(&document, &path);
        Ok(Self { path, language, document })
    }

    /// Lookup table for this document, named after the file.
    #[must_use]
    pub fn catalog(&self, options: LookupOptions) -> Catalog {
        Catalog::from_document(self.name(), self.language.as_str(), &self.document, options)
    }

    /// File stem used to name the catalog, e.g. `notesplugin-cs_cz`.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.file_stem().map_or_else(
            || self.path.display().to_string(),
            |stem| stem.to_string_lossy().into_owned(),
        )
    }
}

#[derive(Error, Debug)]
pub enum IndexerError {
    /// The workspace root is not a readable directory
    #[error("Invalid workspace path: {0}")]
    InvalidPath(String),
    /// Configured globs could not be compiled
    #[error(transparent)]
    Pattern(#[from] MatcherError),
}
