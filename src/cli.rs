//! CLI - Command Line Interface for caper
//!
//! `open` launches the interactive detail page; `info` runs the same page
//! logic once and prints what it would show, as JSON when piped.
//!
//! # Examples
//!
//! ```bash
//! caper open movie 438631
//! caper info tv 94605 --json
//! caper info movie 438631 --full-overview
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// caper - movie and TV detail pages in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "caper",
    version,
    author = "Gorka & Hermes",
    about = "Movie and TV detail pages in the terminal",
    after_help = "EXAMPLES:\n\
                  caper open movie 438631         Open the detail page\n\
                  caper info tv 94605 --json      Print the page as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive detail page
    #[command(visible_alias = "o")]
    Open(OpenCmd),

    /// Print the detail page once and exit
    #[command(visible_alias = "i")]
    Info(InfoCmd),
}

/// Route of a detail page: `<category> <id>`
#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Category segment ("movie" or "tv")
    #[arg(required = true)]
    pub category: String,

    /// TMDB id
    #[arg(required = true)]
    pub id: String,
}

#[derive(Args, Debug)]
pub struct OpenCmd {
    #[command(flatten)]
    pub route: RouteArgs,
}

#[derive(Args, Debug)]
pub struct InfoCmd {
    #[command(flatten)]
    pub route: RouteArgs,

    /// Print the overview untruncated
    #[arg(long)]
    pub full_overview: bool,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }
}

impl JsonOutput<()> {
    pub fn failure(msg: impl Into<String>, code: ExitCode) -> Self {
        Self {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Output helper for CLI commands
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as JSON
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::failure(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_open_command() {
        let cli = Cli::parse_from(["caper", "open", "movie", "438631"]);
        let Command::Open(cmd) = cli.command else {
            panic!("Expected Open command");
        };
        assert_eq!(cmd.route.category, "movie");
        assert_eq!(cmd.route.id, "438631");
    }

    #[test]
    fn test_info_command_flags() {
        let cli = Cli::parse_from([
            "caper",
            "--json",
            "--quiet",
            "info",
            "tv",
            "94605",
            "--full-overview",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        let Command::Info(cmd) = cli.command else {
            panic!("Expected Info command");
        };
        assert_eq!(cmd.route.category, "tv");
        assert!(cmd.full_overview);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["caper", "i", "movie", "1", "-v", "-c", "/tmp/c.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(Cli::try_parse_from(["caper", "open", "movie"]).is_err());
        assert!(Cli::try_parse_from(["caper"]).is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
    }

    #[test]
    fn test_json_output_shape() {
        let ok = serde_json::to_value(JsonOutput::success("Dune")).unwrap();
        assert_eq!(ok["data"], "Dune");
        assert!(ok.get("exit_code").is_none());

        let err = serde_json::to_value(JsonOutput::failure("boom", ExitCode::NetworkError)).unwrap();
        assert_eq!(err["error"], "boom");
        assert_eq!(err["exit_code"], 3);
    }
}
