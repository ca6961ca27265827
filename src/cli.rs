use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "thanks",
    about = "Give thanks to the open source maintainers you depend on",
    version
)]
pub struct Cli {
    /// Project path; the nearest package.json at or above it is used
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Do not offer to open the donate pages in a web browser
    #[arg(long)]
    pub no_open: bool,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Config file [default: ./.thanks/config.toml, fallback ~/.config/thanks/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Registry URL [default: from .npmrc, fallback https://registry.npmjs.org/]
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Log registry lookups (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print a summary line
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["thanks"]);
        assert_eq!(cli.path, PathBuf::from("."));
        assert!(!cli.no_open);
        assert_eq!(cli.report, ReportFormat::Terminal);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "thanks",
            "some/dir",
            "--no-open",
            "--report",
            "json",
            "--registry",
            "https://npm.example.com",
        ]);
        assert_eq!(cli.path, PathBuf::from("some/dir"));
        assert!(cli.no_open);
        assert_eq!(cli.report, ReportFormat::Json);
        assert_eq!(cli.registry.as_deref(), Some("https://npm.example.com"));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["thanks", "-q", "-v"]).is_err());
    }
}
