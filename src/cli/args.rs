//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// p4reg - Perforce-backed package registry
///
/// Resolves package versions from p4 labels and materializes them by
/// syncing the package subtree of a client workspace.
#[derive(Parser, Debug)]
#[command(name = "p4reg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "P4REG_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the versions of a package
    Lookup(LookupArgs),

    /// Copy a package version into a directory
    Download(DownloadArgs),

    /// Print the manifest of a package version
    Manifest(ManifestArgs),

    /// Interactively set up the registry
    Configure,

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Manage the lookup cache
    Cache(CacheArgs),
}

/// Arguments for the lookup command
#[derive(Parser, Debug)]
pub struct LookupArgs {
    /// Package name (e.g. acme/widget or @scope/name)
    pub package: String,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the download command
#[derive(Parser, Debug)]
#[command(disable_version_flag = true)]
pub struct DownloadArgs {
    /// Package name
    pub package: String,

    /// Version (a label or the development tag)
    pub version: String,

    /// Destination directory
    #[arg(short, long)]
    pub out: PathBuf,

    /// Content hash reported by lookup
    #[arg(long)]
    pub hash: Option<String>,
}

/// Arguments for the manifest command
#[derive(Parser, Debug)]
#[command(disable_version_flag = true)]
pub struct ManifestArgs {
    /// Package name
    pub package: String,

    /// Version (a label or the development tag)
    pub version: String,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., registry.workspace)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for lookup
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one version per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Show the lookup cache directory
    Path,

    /// Delete every cached lookup
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_lookup() {
        let cli = Cli::parse_from(["p4reg", "lookup", "@acme/widget"]);
        match cli.command {
            Commands::Lookup(args) => {
                assert_eq!(args.package, "@acme/widget");
                assert!(matches!(args.format, OutputFormat::Table));
            }
            _ => panic!("expected Lookup command"),
        }
    }

    #[test]
    fn cli_parses_lookup_json() {
        let cli = Cli::parse_from(["p4reg", "lookup", "widget", "--format", "json"]);
        match cli.command {
            Commands::Lookup(args) => assert!(matches!(args.format, OutputFormat::Json)),
            _ => panic!("expected Lookup command"),
        }
    }

    #[test]
    fn cli_parses_download() {
        let cli = Cli::parse_from([
            "p4reg", "download", "acme/widget", "1.1.0", "--out", "/tmp/w", "--hash", "ab12",
        ]);
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.package, "acme/widget");
                assert_eq!(args.version, "1.1.0");
                assert_eq!(args.out, PathBuf::from("/tmp/w"));
                assert_eq!(args.hash.as_deref(), Some("ab12"));
            }
            _ => panic!("expected Download command"),
        }
    }

    #[test]
    fn cli_download_requires_out() {
        assert!(Cli::try_parse_from(["p4reg", "download", "widget", "dev"]).is_err());
    }

    #[test]
    fn cli_parses_manifest() {
        let cli = Cli::parse_from(["p4reg", "manifest", "widget", "dev"]);
        match cli.command {
            Commands::Manifest(args) => {
                assert_eq!(args.package, "widget");
                assert_eq!(args.version, "dev");
            }
            _ => panic!("expected Manifest command"),
        }
    }

    #[test]
    fn cli_parses_configure() {
        let cli = Cli::parse_from(["p4reg", "configure"]);
        assert!(matches!(cli.command, Commands::Configure));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["p4reg", "config", "set", "registry.workspace", "pkg_ws"]);
        match cli.command {
            Commands::Config(args) => match args.action {
                Some(ConfigAction::Set { key, value }) => {
                    assert_eq!(key, "registry.workspace");
                    assert_eq!(value, "pkg_ws");
                }
                _ => panic!("expected Set action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn cli_parses_cache_clear() {
        let cli = Cli::parse_from(["p4reg", "cache", "clear", "--yes"]);
        match cli.command {
            Commands::Cache(args) => assert!(matches!(args.action, CacheAction::Clear { yes: true })),
            _ => panic!("expected Cache command"),
        }
    }

    #[test]
    fn cli_global_verbose_and_config() {
        let cli = Cli::parse_from(["p4reg", "-vv", "--config", "/etc/p4reg.toml", "cache", "path"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/p4reg.toml")));
    }
}
