//! ts-catalog
//!
//! Reader, writer and runtime lookup for Qt Linguist `.ts` translation catalogs.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod indexer;
pub mod input;
#[cfg(test)]
mod test_utils;
pub mod types;

pub use catalog::{
    Catalog,
    LookupOptions,
    TranslatorStack,
};
pub use input::{
    TsDocument,
    TsError,
    load_document,
    parse_document,
    write_document,
};
