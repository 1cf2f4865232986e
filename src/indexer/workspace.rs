//! Finds the translation files of a workspace and loads them concurrently.

use std::path::{
    Path,
    PathBuf,
};

use futures::StreamExt;
use ignore::WalkBuilder;

use crate::config::{
    ConfigManager,
    FileMatcher,
};
use crate::indexer::types::{
    IndexerError,
    LoadedDocument,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct WorkspaceIndexer;

impl WorkspaceIndexer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads every translation file under `workspace_path`.
    ///
    /// Files that cannot be read or parsed are logged and skipped. The result
    /// is sorted by path.
    ///
    /// # Errors
    /// - `workspace_path` is not a directory
    /// - The configured patterns are invalid
    pub async fn index_workspace(
        &self,
        workspace_path: &Path,
        config_manager: &ConfigManager,
    ) -> Result<Vec<LoadedDocument>, IndexerError> {
        tracing::debug!(workspace_path = %workspace_path.display(), "Indexing workspace");
        if !workspace_path.is_dir() {
            return Err(IndexerError::InvalidPath(workspace_path.display().to_string()));
        }

        let settings = config_manager.get_settings();
        let matcher = FileMatcher::new(workspace_path.to_path_buf(), settings)?;
        let files = Self::find_translation_files(&matcher);
        let num_threads = settings.indexing.effective_threads();
        tracing::debug!(files = files.len(), num_threads, "Found translation files");

        let mut documents: Vec<LoadedDocument> = futures::stream::iter(files)
            .map(Self::index_file)
            .buffer_unordered(num_threads)
            .filter_map(|loaded| async move { loaded })
            .collect()
            .await;
        documents.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::info!(documents = documents.len(), "Workspace indexed");
        Ok(documents)
    }

    /// Loads one file on the blocking pool.
    async fn index_file(file_path: PathBuf) -> Option<LoadedDocument> {
        let task_path = file_path.clone();
        match tokio::task::spawn_blocking(move || LoadedDocument::load(task_path)).await {
            Ok(Ok(loaded)) => Some(loaded),
            // `**/*.ts` also matches TypeScript sources
            Ok(Err(e)) if e.is_foreign() => {
                tracing::debug!("Skipping {:?}: {}", file_path, e);
                None
            }
            Ok(Err(e)) => {
                tracing::warn!("Failed to load catalog {:?}: {}", file_path, e);
                None
            }
            Err(e) => {
                tracing::warn!("Loading task for {:?} failed: {}", file_path, e);
                None
            }
        }
    }

    fn find_translation_files(matcher: &FileMatcher) -> Vec<PathBuf> {
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(matcher.workspace_root())
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if matcher.is_translation_file(path) {
                found_files.push(path.to_path_buf());
            }
        }

        found_files
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{
        CatalogSettings,
        IndexingConfig,
    };
    use crate::test_utils::write_catalog;

    const CS_CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="cs_CZ">
<context>
    <name>MainWindow</name>
    <message>
        <source>Exit</source>
        <translation>Ukončit program</translation>
    </message>
</context>
</TS>
"#;

    const UNTAGGED_CATALOG: &str = r#"<TS version="2.1">
<context>
    <name>CNotesPluginPanel</name>
    <message>
        <source>Name</source>
        <translation>Název</translation>
    </message>
</context>
</TS>
"#;

    fn manager_for(root: &Path, settings: CatalogSettings) -> ConfigManager {
        let mut manager = ConfigManager::new();
        manager.load_settings(Some(root.to_path_buf())).unwrap();
        manager.update_settings(settings).unwrap();
        manager
    }

    #[tokio::test]
    async fn test_index_workspace_loads_matching_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_catalog(root, "locale/3DimViewer-cs_cz.ts", CS_CATALOG);
        write_catalog(root, "plugins/Notes/locale/notesplugin-cs_cz.ts", UNTAGGED_CATALOG);
        write_catalog(root, "locale/readme.txt", "not a catalog");
        let manager = manager_for(root, CatalogSettings::default());

        let documents = WorkspaceIndexer::new().index_workspace(root, &manager).await.unwrap();

        assert_that!(documents, len(eq(2)));
        assert_eq!(documents[0].path, root.join("locale/3DimViewer-cs_cz.ts"));
        assert_that!(documents[0].language, eq("cs_CZ"));
        assert_that!(documents[1].language, eq("cs_cz"));
        assert_that!(documents[1].name(), eq("notesplugin-cs_cz"));
    }

    #[tokio::test]
    async fn test_index_workspace_skips_broken_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_catalog(root, "a/cs_cz.ts", CS_CATALOG);
        write_catalog(root, "b/broken.ts", "<TS><context>");
        write_catalog(root, "c/other.ts", "<qresource/>");
        let manager = manager_for(root, CatalogSettings::default());

        let documents = WorkspaceIndexer::new().index_workspace(root, &manager).await.unwrap();

        assert_that!(documents, len(eq(1)));
        assert_that!(documents[0].document.message_count(), eq(1));
    }

    #[tokio::test]
    async fn test_index_workspace_skips_typescript_sources() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_catalog(root, "translations/cs_cz.ts", CS_CATALOG);
        write_catalog(root, "web/src/main.ts", "import { app } from './app';\napp.start();\n");
        write_catalog(root, "web/src/types.ts", "export type Id = string;\n");
        let manager = manager_for(root, CatalogSettings::default());

        let documents = WorkspaceIndexer::new().index_workspace(root, &manager).await.unwrap();

        let names: Vec<String> = documents.iter().map(LoadedDocument::name).collect();
        assert_that!(names, elements_are![eq("cs_cz")]);
    }

    #[tokio::test]
    async fn test_index_workspace_respects_excludes_and_threads() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        for index in 0..6 {
            write_catalog(root, &format!("locale/part{index}-cs_cz.ts"), CS_CATALOG);
        }
        write_catalog(root, "target/locale/cs_cz.ts", CS_CATALOG);
        let settings = CatalogSettings {
            indexing: IndexingConfig { num_threads: Some(1) },
            ..CatalogSettings::default()
        };
        let manager = manager_for(root, settings);

        let documents = WorkspaceIndexer::new().index_workspace(root, &manager).await.unwrap();

        assert_that!(documents, len(eq(6)));
        let names: Vec<String> = documents.iter().map(LoadedDocument::name).collect();
        assert_that!(names[0], eq("part0-cs_cz"));
        assert_that!(names[5], eq("part5-cs_cz"));
    }

    #[tokio::test]
    async fn test_index_workspace_rejects_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let result = WorkspaceIndexer::new().index_workspace(&missing, &ConfigManager::new()).await;

        assert!(matches!(result, Err(IndexerError::InvalidPath(_))));
    }
}
