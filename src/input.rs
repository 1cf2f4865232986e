//! Reading and writing Qt Linguist `.ts` catalogs.

/// In-memory document model
pub mod document;
/// Reader and writer errors
pub mod error;
/// Language detection from attributes and file paths
pub mod language;
/// XML → document
pub mod reader;
/// Document → XML
pub mod writer;

pub use document::{
    Context,
    Message,
    Translation,
    TranslationBody,
    TranslationKind,
    TsDocument,
};
pub use error::TsError;
pub use reader::{
    load_document,
    parse_document,
};
pub use writer::{
    save_document,
    write_document,
};
