/*!
# Indent Analyzer CLI

Command-line interface for checking and fixing JavaScript indentation.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use walkdir::WalkDir;

use indent_analyzer::cli_common::output::FileReport;
use indent_analyzer::cli_common::{self, CommonArgs, ConfigArgs, OutputFormat, OutputWriter};
use indent_analyzer::core::{read_source, write_source};
use indent_analyzer::{apply_fixes, IndentChecker, IndentOptions, JsParser};

#[derive(Parser)]
#[command(
    name = "indent-analyzer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Structural indentation checker for JavaScript"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the indentation of files or directories
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Rewrite files with the fixed indentation
        #[arg(long)]
        fix: bool,

        #[command(flatten)]
        config: ConfigArgs,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print the effective indent options as TOML
    PrintConfig {
        #[command(flatten)]
        config: ConfigArgs,

        /// Write the options to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Check { paths, fix, config, common } => check_command(&paths, fix, &config, &common),
        Commands::PrintConfig { config, output, verbose } => {
            print_config_command(&config, output.as_deref(), verbose).map(|()| true)
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            cli_common::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    }
}

/// Returns `false` when problems remain
fn check_command(paths: &[PathBuf], fix: bool, config: &ConfigArgs, common: &CommonArgs) -> Result<bool> {
    cli_common::init_logging(common.verbose)?;
    let format: OutputFormat = common.format.parse()?;
    let options = config.load()?;

    for path in paths {
        cli_common::validate_path(path, "Input path")?;
    }
    let files = collect_sources(paths);
    info!("Checking {} files", files.len());

    let start = Instant::now();
    let checker = IndentChecker::new(options);
    let results: Vec<(PathBuf, Result<FileReport>)> = files
        .par_iter()
        .map(|path| (path.clone(), check_file(&checker, path, fix)))
        .collect();

    let mut reports = Vec::new();
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                failures += 1;
                cli_common::print_error(&format!("{}: {:#}", path.display(), e));
            }
        }
    }

    let mut writer = OutputWriter::stdout(format).with_pretty(true);
    writer.write_reports(&reports)?;
    writer.flush()?;

    let problems: usize = reports.iter().map(|r| r.diagnostics.len()).sum();
    let fixed: usize = reports.iter().map(|r| r.fixed).sum();
    info!("Checked {} files in {}", files.len(), cli_common::format_duration(start.elapsed()));

    if !common.quiet && format == OutputFormat::Human {
        if fix && fixed > 0 {
            cli_common::print_success(&format!("Fixed {} lines", fixed));
        }
        if problems == 0 && failures == 0 {
            cli_common::print_success(&format!("{} files checked, no indentation problems", files.len()));
        } else if problems > 0 {
            cli_common::print_warning(&format!("{} indentation problems in {} files", problems, files.len()));
        }
    }

    Ok(problems == 0 && failures == 0)
}

/// Checks one file; under `fix` the file is rewritten in its original
/// encoding and only the remaining problems are reported.
fn check_file(checker: &IndentChecker, path: &Path, fix: bool) -> Result<FileReport> {
    let source = read_source(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = &source.text;
    let parser = JsParser::new();
    let file = parser.parse_text(text)?;
    let diagnostics = checker.check(&file);

    if !fix || diagnostics.is_empty() {
        return Ok(FileReport { path: path.to_path_buf(), diagnostics, fixed: 0 });
    }

    let fixes: Vec<_> = diagnostics.iter().map(|d| d.fix.clone()).collect();
    let (fixed_text, applied) = apply_fixes(text, &fixes);
    write_source(path, &source, &fixed_text).with_context(|| format!("Failed to write {}", path.display()))?;
    let remaining = checker.check(&parser.parse_text(&fixed_text)?);
    Ok(FileReport { path: path.to_path_buf(), diagnostics: remaining, fixed: applied })
}

/// Expands directories into the `.js` files below them; explicit file
/// arguments are kept whatever their extension.
fn collect_sources(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let is_js = entry.path().extension().and_then(|e| e.to_str()) == Some("js");
            if entry.file_type().is_file() && is_js {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    files
}

fn print_config_command(config: &ConfigArgs, output: Option<&Path>, verbose: bool) -> Result<()> {
    cli_common::init_logging(verbose)?;
    let options: IndentOptions = config.load()?;
    match output {
        Some(path) => {
            options.save_to_file(path)?;
            info!("Wrote indent options to {}", path.display());
        }
        None => print!("{}", options.to_toml_string()?),
    }
    Ok(())
}
