//! Formatting and printing of check results

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::diagnostics::IndentDiagnostic;

/// Output format of the results
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!("Unknown output format: {}", s)),
        }
    }
}

/// Diagnostics of one checked file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<IndentDiagnostic>,
    /// Fixes written back under `--fix`
    pub fixed: usize,
}

/// Writer for results
pub struct OutputWriter {
    writer: Box<dyn Write>,
    format: OutputFormat,
    pretty: bool,
}

impl OutputWriter {
    /// Writer on stdout
    pub fn stdout(format: OutputFormat) -> Self {
        Self {
            writer: Box::new(io::stdout()),
            format,
            pretty: false,
        }
    }

    /// Writer on any sink
    pub fn new(writer: Box<dyn Write>, format: OutputFormat) -> Self {
        Self { writer, format, pretty: false }
    }

    /// Enables pretty-printed JSON
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes a serializable object as JSON
    pub fn write_object<T: Serialize>(&mut self, obj: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(obj)?
        } else {
            serde_json::to_string(obj)?
        };
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    /// Writes the diagnostics of one file in the human format
    pub fn write_file_report(&mut self, report: &FileReport) -> Result<()> {
        if report.diagnostics.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "{}", display_path(&report.path).underline())?;
        for diagnostic in &report.diagnostics {
            writeln!(
                self.writer,
                "  {:>5}:{:<3} {}  {}",
                diagnostic.line,
                diagnostic.end_column + 1,
                diagnostic.level.to_string().red(),
                diagnostic.message
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Writes all reports in the configured format
    pub fn write_reports(&mut self, reports: &[FileReport]) -> Result<()> {
        match self.format {
            OutputFormat::Json => self.write_object(&reports),
            OutputFormat::Human => {
                for report in reports {
                    self.write_file_report(report)?;
                }
                Ok(())
            }
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
