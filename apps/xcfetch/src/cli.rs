//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xcfetch_types::PackageKind;

/// xcfetch - Authorize and download Apple developer packages
#[derive(Parser)]
#[command(name = "xcfetch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Authorize and download Apple developer packages")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write debug logs to the log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the authentication and download URLs for a package path
    Urls {
        /// Server-side package path, e.g. /Developer_Tools/Xcode_15/Xcode_15.xip
        path: String,
    },

    /// Request a download authorization cookie without downloading
    Auth {
        /// Server-side package path
        path: String,

        /// Cookie header of a signed-in developer session
        #[arg(long, value_name = "VALUE")]
        cookie: Option<String>,
    },

    /// Authorize and download a package
    #[command(alias = "dl")]
    Download {
        /// Server-side package path
        path: String,

        /// Package kind, used in progress output and reports
        #[arg(long, value_enum, default_value_t = PackageKind::Xcode)]
        kind: PackageKind,

        /// Package version label
        #[arg(long)]
        version: Option<String>,

        /// Output file or directory
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Progress bar width in cells
        #[arg(long, value_parser = parse_width_arg)]
        width: Option<usize>,

        /// Title shown above the progress bar
        #[arg(long)]
        title: Option<String>,

        /// Cookie header of a signed-in developer session
        #[arg(long, value_name = "VALUE")]
        cookie: Option<String>,
    },
}

fn parse_width_arg(value: &str) -> Result<usize, String> {
    xcfetch_config::parse_width("--width", value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_download_args() {
        let cli = Cli::try_parse_from([
            "xcfetch",
            "--json",
            "download",
            "/Developer_Tools/CLT/CLT.dmg",
            "--kind",
            "command-line-tools",
            "--width",
            "40",
        ])
        .unwrap();
        assert!(cli.global.json);
        match cli.command {
            Commands::Download {
                kind, width, path, ..
            } => {
                assert_eq!(kind, PackageKind::CommandLineTools);
                assert_eq!(width, Some(40));
                assert_eq!(path, "/Developer_Tools/CLT/CLT.dmg");
            }
            _ => panic!("expected download command"),
        }
    }

    #[test]
    fn test_zero_width_rejected() {
        let result = Cli::try_parse_from(["xcfetch", "download", "/a/b.xip", "--width", "0"]);
        assert!(result.is_err());
    }
}
