//! Entry point of the `ts-catalog` command.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use ts_catalog::cli::{
    Cli,
    CliError,
    Outcome,
    run,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_tracing(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Failed to open log file: {e}");
            return ExitCode::from(2);
        }
    };

    let logs_to_file = cli.log_file.is_some();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(cli, &mut out).await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::ValidationFailed) => ExitCode::FAILURE,
        Err(e) => {
            report_error(&e, logs_to_file, &mut std::io::stderr());
            ExitCode::from(2)
        }
    }
}

/// Prints a failure once on `stderr`, and also to the log file if there is one.
fn report_error(error: &CliError, logs_to_file: bool, stderr: &mut impl Write) {
    if logs_to_file {
        tracing::error!("{error}");
    }
    let _ = writeln!(stderr, "error: {error}");
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the level chosen by `verbose`. The returned guard
/// flushes the log file on drop.
fn init_tracing(verbose: bool, log_file: Option<&Path>) -> std::io::Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    Ok(Some(guard))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_report_error_prints_once_without_log_file() {
        let error = CliError::NoCatalogs(PathBuf::from("/workspace"));
        let mut stderr = Vec::new();

        report_error(&error, false, &mut stderr);

        expect_that!(
            String::from_utf8(stderr).unwrap(),
            eq("error: No translation files found in /workspace\n")
        );
    }
}
