//! Command-line arguments shared by the subcommands

use clap::Parser;
use std::path::PathBuf;

use crate::rules::IndentOptions;

/// Arguments common to every subcommand
#[derive(Parser, Debug, Clone)]
pub struct CommonArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format (human, json)
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Suppress the summary line
    #[arg(short, long)]
    pub quiet: bool,
}

/// Where the indent options come from
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    /// Indent options file (TOML, YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Indent width in spaces, or "tab"; overrides the config file
    #[arg(long)]
    pub indent: Option<String>,
}

impl ConfigArgs {
    /// Options from the config file (or defaults) with command-line overrides
    pub fn load(&self) -> anyhow::Result<IndentOptions> {
        let mut options = match &self.config {
            Some(path) => IndentOptions::load_from_file(path)?,
            None => IndentOptions::default(),
        };
        if let Some(indent) = &self.indent {
            options.indent = serde_json::from_value(match indent.parse::<usize>() {
                Ok(width) => serde_json::Value::from(width),
                Err(_) => serde_json::Value::from(indent.as_str()),
            })
            .map_err(|e| anyhow::anyhow!("Invalid --indent value '{}': {}", indent, e))?;
            options.validate()?;
        }
        Ok(options)
    }
}
