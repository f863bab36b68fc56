mod registry;
mod settings;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pecasql_core::{
    DEFAULT_OUTPUT_FILE, DEFAULT_PREVIEW_CHARS, GenerateOptions, LoadOptions, PipelineError,
    UpdateGenerator, load_rows, normalize_rows,
};
use registry::{RegistryError, RunReport, init_logging, write_report};
use settings::{Settings, SettingsError};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Parser, Debug)]
#[command(
    name = "pecasql",
    version,
    about = "Generate UPDATE statements for CTE_peca from a CSV export"
)]
struct Cli {
    /// Settings file (defaults to ./pecasql.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append JSON log lines to this file.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Log pipeline progress to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the SQL file.
    Generate(GenerateArgs),
    /// Validate the input without generating anything.
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Semicolon-delimited input file with a header row.
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Field delimiter (single ASCII character, or `tab`).
    #[arg(long)]
    delimiter: Option<String>,
    /// Strip whitespace around headers and values.
    #[arg(long, default_value_t = false)]
    trim: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Output SQL file.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
    /// Number of characters of the generated SQL to print.
    #[arg(long, value_name = "N", conflicts_with = "no_preview")]
    preview_chars: Option<usize>,
    /// Do not print a preview.
    #[arg(long, default_value_t = false)]
    no_preview: bool,
    /// Generate without writing the SQL file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Write a JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    input: InputArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let outcome = Settings::load(cli.config.as_deref())
        .map_err(CliError::from)
        .and_then(|settings| match cli.command {
            Command::Generate(args) => run_generate(args, &settings),
            Command::Check(args) => run_check(args, &settings),
        });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_generate(args: GenerateArgs, settings: &Settings) -> Result<(), CliError> {
    let load = load_options(&args.input, settings)?;
    let output_path = if args.dry_run {
        None
    } else {
        Some(
            args.out
                .or_else(|| settings.output.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
        )
    };
    let preview_chars = if args.no_preview {
        0
    } else {
        args.preview_chars
            .or(settings.preview_chars)
            .unwrap_or(DEFAULT_PREVIEW_CHARS)
    };

    let run_id = Uuid::new_v4().to_string();
    let started_at = chrono::Utc::now();
    tracing::info!(event = "generate_started", run_id = %run_id, dry_run = args.dry_run);

    let generator = UpdateGenerator::new(GenerateOptions {
        load,
        output_path,
        preview_chars,
    });

    let result = match generator.run(&args.input.input) {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(
                event = "run_failed",
                run_id = %run_id,
                kind = ?err.kind(),
                error = %err
            );
            if let Some(path) = &args.report {
                save_report(path, &RunReport::failure(run_id, started_at, &err));
            }
            return Err(err.into());
        }
    };

    if let Some(path) = &args.report {
        write_report(path, &RunReport::success(run_id, started_at, result.report.clone()))?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    if !result.preview.is_empty() {
        println!("{}", result.preview.trim_end());
        let total = result.sql.text.chars().count();
        let shown = result.preview.chars().count();
        if shown < total {
            println!("-- preview truncated: {shown} of {total} characters");
        }
        println!();
    }

    match &result.sql.output_path {
        Some(path) => println!(
            "SQL file generated successfully: {} ({} statements)",
            path.display(),
            result.sql.statement_count
        ),
        None => println!(
            "Generated {} statements (dry run, nothing written)",
            result.sql.statement_count
        ),
    }

    Ok(())
}

fn run_check(args: CheckArgs, settings: &Settings) -> Result<(), CliError> {
    let load = load_options(&args.input, settings)?;
    let rows = load_rows(&args.input.input, &load)?;
    let normalized = normalize_rows(&rows)?;
    println!("{} rows valid", normalized.len());
    Ok(())
}

fn load_options(args: &InputArgs, settings: &Settings) -> Result<LoadOptions, CliError> {
    Ok(settings.load_options(args.delimiter.as_deref(), args.trim)?)
}

// A failed report must not mask the pipeline error that triggered it.
fn save_report(path: &Path, report: &RunReport) {
    if let Err(err) = write_report(path, report) {
        tracing::warn!(event = "report_failed", path = %path.display(), error = %err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "pecasql",
            "generate",
            "pecas.csv",
            "--out",
            "out.sql",
            "--delimiter",
            ",",
            "--preview-chars",
            "100",
            "--report",
            "report.json",
        ])
        .expect("parse");
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.input.input, PathBuf::from("pecas.csv"));
                assert_eq!(args.input.delimiter.as_deref(), Some(","));
                assert_eq!(args.out, Some(PathBuf::from("out.sql")));
                assert_eq!(args.preview_chars, Some(100));
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn preview_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "pecasql",
            "generate",
            "pecas.csv",
            "--preview-chars",
            "10",
            "--no-preview",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn pipeline_errors_render_verbatim() {
        let err = CliError::from(PipelineError::FieldFormat {
            row: 0,
            column: "NRO_PECA".to_string(),
            reason: "value is empty".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "invalid value in column NRO_PECA at row 0: value is empty"
        );
    }
}
