//! Helpers shared by test modules.
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::path::{
    Path,
    PathBuf,
};

use crate::input::{
    Message,
    TranslationKind,
    TsDocument,
};

/// Writes `content` to `relative_path` under `root`, creating parent directories.
pub(crate) fn write_catalog(root: &Path, relative_path: &str, content: &str) -> PathBuf {
    let path = root.join(relative_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Builds a Czech document from `(context, source, translation)` triples.
///
/// All translations are finished.
pub(crate) fn create_document(entries: &[(&str, &str, &str)]) -> TsDocument {
    let mut document = TsDocument::new(Some("cs_CZ".to_string()), Some("en".to_string()));
    for (context, source, translation) in entries {
        document.push_message(
            context,
            Message::new(*source).with_translation(TranslationKind::Finished, *translation),
        );
    }
    document
}
