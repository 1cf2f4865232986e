//! Workspace discovery and loading of translation catalogs.

/// Indexer type definitions
pub mod types;
/// Workspace walking and concurrent loading
pub mod workspace;

pub use types::{
    IndexerError,
    LoadedDocument,
};
pub use workspace::WorkspaceIndexer;
