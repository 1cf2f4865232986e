//! Command-line front end of the `ts-catalog` binary.
//!
//! Commands write their report to any [`Write`] so they can be driven from
//! tests as well as from `main`.

use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::catalog::{
    TranslatorStack,
    substitute,
};
use crate::config::{
    ConfigError,
    ConfigManager,
    Severity,
};
use crate::diagnostics::{
    CatalogStats,
    has_errors,
    validate_document,
};
use crate::indexer::{
    IndexerError,
    LoadedDocument,
    WorkspaceIndexer,
};
use crate::input::{
    TranslationBody,
    TsError,
    save_document,
};

#[derive(Debug, Parser)]
#[command(
    name = "ts-catalog",
    version,
    about = "Inspect, query and rewrite Qt Linguist .ts catalogs"
)]
pub struct Cli {
    /// Workspace root holding `.ts-catalog.json` (defaults to the current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate one message through the given catalogs.
    ///
    /// Later files take precedence over earlier ones.
    Lookup {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
        #[arg(long)]
        context: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        disambiguation: Option<String>,
        /// Count selecting the plural form.
        #[arg(short = 'n', long = "count", allow_negative_numbers = true)]
        count: Option<i64>,
        /// Values for `%1`, `%2`, ... in order.
        #[arg(long = "arg", value_name = "VALUE")]
        args: Vec<String>,
    },
    /// Print translation statistics.
    Stats {
        /// Catalog file or directory to scan (defaults to the workspace).
        path: Option<PathBuf>,
    },
    /// Validate translations; exits with status 1 when errors are found.
    Check {
        /// Catalog file or directory to scan (defaults to the workspace).
        path: Option<PathBuf>,
    },
    /// Rewrite a catalog in canonical form.
    Normalize {
        file: PathBuf,
        /// Destination (defaults to rewriting FILE in place).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Remove vanished and obsolete messages.
        #[arg(long)]
        drop_obsolete: bool,
    },
    /// List contexts, or the messages of one context.
    List {
        file: PathBuf,
        #[arg(long)]
        context: Option<String>,
    },
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] TsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Indexer(#[from] IndexerError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("No translation files found in {0}")]
    NoCatalogs(PathBuf),

    #[error("Context '{0}' not found")]
    UnknownContext(String),
}

/// Result of a command that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `check` found error-level diagnostics.
    ValidationFailed,
}

/// Runs `cli.command`, writing its report to `out`.
///
/// # Errors
/// Loading settings or catalogs failed, or `out` could not be written.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<Outcome, CliError> {
    let workspace = match cli.workspace {
        Some(workspace) => workspace,
        None => std::env::current_dir()?,
    };
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(workspace.clone()))?;

    match cli.command {
        Command::Lookup { files, context, source, disambiguation, count, args } => {
            let request = LookupRequest {
                context: &context,
                source: &source,
                disambiguation: disambiguation.as_deref(),
                count,
                args: &args,
            };
            lookup(&files, &request, &config_manager, out)?;
            Ok(Outcome::Success)
        }
        Command::Stats { path } => {
            let root = path.unwrap_or(workspace);
            stats(&collect_documents(&root, &config_manager).await?, out)?;
            Ok(Outcome::Success)
        }
        Command::Check { path } => {
            let root = path.unwrap_or(workspace);
            check(&collect_documents(&root, &config_manager).await?, &config_manager, out)
        }
        Command::Normalize { file, output, drop_obsolete } => {
            normalize(file, output, drop_obsolete, out)?;
            Ok(Outcome::Success)
        }
        Command::List { file, context } => {
            list(&LoadedDocument::load(file)?, context.as_deref(), out)?;
            Ok(Outcome::Success)
        }
    }
}

/// Arguments of the `lookup` command.
#[derive(Debug)]
struct LookupRequest<'a> {
    context: &'a str,
    source: &'a str,
    disambiguation: Option<&'a str>,
    count: Option<i64>,
    args: &'a [String],
}

fn lookup(
    files: &[PathBuf],
    request: &LookupRequest<'_>,
    config_manager: &ConfigManager,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let options = config_manager.get_settings().lookup;
    let mut stack = TranslatorStack::new();
    for file in files {
        stack.install(LoadedDocument::load(file.clone())?.catalog(options));
    }

    let LookupRequest { context, source, disambiguation, .. } = *request;
    let text = match request.count {
        Some(n) => stack.translate_plural(context, source, disambiguation, n),
        None => stack.translate(context, source, disambiguation).to_string(),
    };
    let args: Vec<&str> = request.args.iter().map(String::as_str).collect();
    writeln!(out, "{}", substitute(&text, &args))?;
    Ok(())
}

/// A single file, or every translation file below a directory.
async fn collect_documents(
    path: &Path,
    config_manager: &ConfigManager,
) -> Result<Vec<LoadedDocument>, CliError> {
    if !path.is_dir() {
        return Ok(vec![LoadedDocument::load(path.to_path_buf())?]);
    }
    let documents = WorkspaceIndexer::new().index_workspace(path, config_manager).await?;
    if documents.is_empty() {
        return Err(CliError::NoCatalogs(path.to_path_buf()));
    }
    Ok(documents)
}

fn stats(documents: &[LoadedDocument], out: &mut impl Write) -> Result<(), CliError> {
    let mut total = CatalogStats::default();
    for loaded in documents {
        let stats = CatalogStats::from_document(&loaded.document);
        writeln!(out, "{} [{}]: {stats}", loaded.path.display(), loaded.language)?;
        total += stats;
    }
    if documents.len() > 1 {
        writeln!(out, "total: {total}")?;
    }
    Ok(())
}

fn check(
    documents: &[LoadedDocument],
    config_manager: &ConfigManager,
    out: &mut impl Write,
) -> Result<Outcome, CliError> {
    let config = &config_manager.get_settings().diagnostics;
    let mut errors = 0_usize;
    let mut warnings = 0_usize;
    for loaded in documents {
        let diagnostics = validate_document(&loaded.document, &loaded.language, config);
        for diagnostic in &diagnostics {
            match diagnostic.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Hint | Severity::Off => {}
            }
            writeln!(out, "{}: {diagnostic}", loaded.path.display())?;
        }
        if has_errors(&diagnostics) {
            tracing::debug!(path = %loaded.path.display(), "Catalog has errors");
        }
    }
    writeln!(out, "{} files checked: {errors} errors, {warnings} warnings", documents.len())?;

    Ok(if errors > 0 { Outcome::ValidationFailed } else { Outcome::Success })
}

fn normalize(
    file: PathBuf,
    output: Option<PathBuf>,
    drop_obsolete: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut loaded = LoadedDocument::load(file)?;
    if drop_obsolete {
        let removed = loaded.document.purge_inactive();
        writeln!(out, "Removed {removed} vanished or obsolete messages")?;
    }
    let destination = output.unwrap_or(loaded.path);
    save_document(&destination, &loaded.document)?;
    writeln!(out, "Wrote {}", destination.display())?;
    Ok(())
}

fn list(
    loaded: &LoadedDocument,
    context: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let Some(name) = context else {
        for context in &loaded.document.contexts {
            writeln!(out, "{}\t{}", context.name, context.messages.len())?;
        }
        return Ok(());
    };

    let context =
        loaded.document.context(name).ok_or_else(|| CliError::UnknownContext(name.to_string()))?;
    for message in &context.messages {
        let translation = match &message.translation.body {
            TranslationBody::Text(text) => text.clone(),
            TranslationBody::Numerus(forms) => forms.join(" | "),
        };
        writeln!(out, "[{}] {:?} => {:?}", message.translation.kind, message.source, translation)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::input::load_document;
    use crate::test_utils::write_catalog;

    const VIEWER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="cs_CZ">
<context>
    <name>MainWindow</name>
    <message>
        <location filename="../src/mainwindow.cpp" line="120"/>
        <source>Exit</source>
        <translation>Ukončit program</translation>
    </message>
    <message>
        <source>Save slice</source>
        <translation type="vanished">Uložit řez</translation>
    </message>
    <message numerus="yes">
        <source>%n slice(s)</source>
        <translation>
            <numerusform>%n řez</numerusform>
            <numerusform>%n řezy</numerusform>
            <numerusform>%n řezů</numerusform>
        </translation>
    </message>
    <message>
        <source>Loading %1...</source>
        <translation>Načítání…</translation>
    </message>
</context>
</TS>
"#;

    const NOTES: &str = r#"<TS version="2.1" language="cs_CZ">
<context>
    <name>MainWindow</name>
    <message>
        <source>Exit</source>
        <translation>Konec</translation>
    </message>
</context>
</TS>
"#;

    fn cli(workspace: &Path, args: &[&str]) -> Cli {
        let workspace = workspace.display().to_string();
        let mut argv = vec!["ts-catalog", "--workspace", workspace.as_str()];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    async fn run_to_string(cli: Cli) -> (Result<Outcome, CliError>, String) {
        let mut out = Vec::new();
        let result = run(cli, &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_lookup_prefers_later_files() {
        let temp_dir = TempDir::new().unwrap();
        let viewer = write_catalog(temp_dir.path(), "viewer-cs_cz.ts", VIEWER);
        let notes = write_catalog(temp_dir.path(), "notes-cs_cz.ts", NOTES);
        let viewer = viewer.display().to_string();
        let notes = notes.display().to_string();

        let (result, output) = run_to_string(cli(
            temp_dir.path(),
            &["lookup", &viewer, &notes, "--context", "MainWindow", "--source", "Exit"],
        ))
        .await;

        assert_that!(result.unwrap(), eq(Outcome::Success));
        assert_that!(output, eq("Konec\n"));
    }

    #[tokio::test]
    async fn test_lookup_plural_and_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let viewer = write_catalog(temp_dir.path(), "viewer-cs_cz.ts", VIEWER);
        let viewer = viewer.display().to_string();

        let (_, plural) = run_to_string(cli(
            temp_dir.path(),
            &["lookup", &viewer, "--context", "MainWindow", "--source", "%n slice(s)", "-n", "3"],
        ))
        .await;
        let (_, vanished) = run_to_string(cli(
            temp_dir.path(),
            &["lookup", &viewer, "--context", "MainWindow", "--source", "Save slice"],
        ))
        .await;
        let (_, args) = run_to_string(cli(
            temp_dir.path(),
            &["lookup", &viewer, "--context", "X", "--source", "Open %1", "--arg", "CT.dcm"],
        ))
        .await;

        assert_that!(plural, eq("3 řezy\n"));
        assert_that!(vanished, eq("Save slice\n"));
        assert_that!(args, eq("Open CT.dcm\n"));
    }

    #[tokio::test]
    async fn test_stats_scans_workspace() {
        let temp_dir = TempDir::new().unwrap();
        write_catalog(temp_dir.path(), "locale/viewer-cs_cz.ts", VIEWER);
        write_catalog(temp_dir.path(), "locale/notes-cs_cz.ts", NOTES);

        let (result, output) = run_to_string(cli(temp_dir.path(), &["stats"])).await;

        assert_that!(result.unwrap(), eq(Outcome::Success));
        assert_that!(output, contains_substring("notes-cs_cz.ts [cs_CZ]: 1 finished"));
        assert_that!(output, contains_substring("viewer-cs_cz.ts [cs_CZ]: 3 finished"));
        assert_that!(output, contains_substring("total: 4 finished, 0 unfinished"));
    }

    #[tokio::test]
    async fn test_stats_empty_directory_fails() {
        let temp_dir = TempDir::new().unwrap();

        let (result, _) = run_to_string(cli(temp_dir.path(), &["stats"])).await;

        assert!(matches!(result, Err(CliError::NoCatalogs(_))));
    }

    #[tokio::test]
    async fn test_check_reports_errors() {
        let temp_dir = TempDir::new().unwrap();
        let viewer = write_catalog(temp_dir.path(), "viewer-cs_cz.ts", VIEWER);
        let viewer = viewer.display().to_string();

        let (result, output) = run_to_string(cli(temp_dir.path(), &["check", &viewer])).await;

        assert_that!(result.unwrap(), eq(Outcome::ValidationFailed));
        assert_that!(output, contains_substring("placeholder-mismatch"));
        assert_that!(output, contains_substring("1 files checked: 1 errors, 0 warnings"));
    }

    #[tokio::test]
    async fn test_check_clean_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let notes = write_catalog(temp_dir.path(), "notes-cs_cz.ts", NOTES);
        let notes = notes.display().to_string();

        let (result, output) = run_to_string(cli(temp_dir.path(), &["check", &notes])).await;

        assert_that!(result.unwrap(), eq(Outcome::Success));
        assert_that!(output, eq("1 files checked: 0 errors, 0 warnings\n"));
    }

    #[tokio::test]
    async fn test_normalize_drops_inactive_messages() {
        let temp_dir = TempDir::new().unwrap();
        let viewer = write_catalog(temp_dir.path(), "viewer-cs_cz.ts", VIEWER);
        let output_path = temp_dir.path().join("out.ts");
        let input = viewer.display().to_string();
        let output_arg = output_path.display().to_string();

        let (result, output) = run_to_string(cli(
            temp_dir.path(),
            &["normalize", &input, "--output", &output_arg, "--drop-obsolete"],
        ))
        .await;

        assert_that!(result.unwrap(), eq(Outcome::Success));
        assert_that!(output, contains_substring("Removed 1 vanished or obsolete messages"));
        let normalized = load_document(&output_path).unwrap();
        assert_that!(normalized.message_count(), eq(3));
        let original = load_document(&viewer).unwrap();
        assert_that!(original.message_count(), eq(4));
    }

    #[tokio::test]
    async fn test_list_contexts_and_messages() {
        let temp_dir = TempDir::new().unwrap();
        let viewer = write_catalog(temp_dir.path(), "viewer-cs_cz.ts", VIEWER);
        let viewer = viewer.display().to_string();

        let (_, contexts) = run_to_string(cli(temp_dir.path(), &["list", &viewer])).await;
        let (_, messages) = run_to_string(cli(
            temp_dir.path(),
            &["list", &viewer, "--context", "MainWindow"],
        ))
        .await;
        let (missing, _) =
            run_to_string(cli(temp_dir.path(), &["list", &viewer, "--context", "Nope"])).await;

        assert_that!(contexts, eq("MainWindow\t4\n"));
        assert_that!(messages, contains_substring("[finished] \"Exit\" => \"Ukončit program\""));
        assert_that!(messages, contains_substring("[vanished] \"Save slice\" => \"Uložit řez\""));
        assert_that!(messages, contains_substring("\"%n řez | %n řezy | %n řezů\""));
        assert!(matches!(missing, Err(CliError::UnknownContext(_))));
    }
}
