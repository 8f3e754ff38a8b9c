use crate::store::stores;
use crate::{ConfigFile, Dialect, GetOptions, Overrides, Secrets, Settings};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use colored::Colorize;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Long options that older scripts spell with a single dash (`-api URL`).
const SINGLE_DASH_LONG_FLAGS: &[&str] = &["api", "config", "separator", "spread"];

/// Main CLI structure for the privx-secrets application.
///
/// Global options configure how the vault is reached; the subcommand says
/// what to do with it.
#[derive(Parser)]
#[command(name = "privx-secrets")]
#[command(about = "Fetch PrivX vault secrets and export them to shells", long_about = None)]
#[command(version)]
struct Cli {
    /// API endpoint URL
    #[arg(long = "api", global = true)]
    api: Option<String>,
    /// Configuration file (default: ~/.privx-secrets.toml)
    #[arg(long, global = true, env = "PRIVX_SECRETS_CONFIG")]
    config: Option<PathBuf>,
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the privx-secrets CLI.
#[derive(Subcommand)]
enum Commands {
    /// Acquire an access token to check the configured credentials
    Login,
    /// Print secrets, or shell assignments for them
    Get {
        /// Key expressions: [ENVNAME=]NAME[.SEGMENT...]
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
        /// Data element separator
        #[arg(long, default_value = ".")]
        separator: String,
        /// Assign every leaf of a compound value to its own variable
        #[arg(long)]
        spread: bool,
        /// Generate C-shell commands on stdout
        #[arg(short = 'c')]
        cshell: bool,
        /// Generate Bourne shell commands on stdout
        #[arg(short = 's')]
        bourne: bool,
    },
    /// List the secret stores this build supports
    Stores,
}

/// Rewrites `-flag` and `-flag=value` to their `--` form for the long
/// options in [`SINGLE_DASH_LONG_FLAGS`]. Arguments after `--` are left alone.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let flag = rest.split_once('=').map_or(rest, |(flag, _)| flag);
                    if SINGLE_DASH_LONG_FLAGS.contains(&flag) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads the configuration file and applies environment and command-line
/// overrides.
fn load_settings(config: Option<PathBuf>, api: Option<String>) -> Result<Settings> {
    let path = config.unwrap_or_else(ConfigFile::default_path);
    let file = ConfigFile::load(&path)
        .wrap_err_with(|| format!("failed to read config file '{}'", path.display()))?;
    let settings = Settings::from_process_env(file, &Overrides { endpoint: api })
        .wrap_err("Failed to resolve configuration")?;
    Ok(settings)
}

/// Main entry point for the privx-secrets CLI application.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Returns
///
/// * `Ok(())` - If the command executed successfully
/// * `Err` - If any error occurred during execution
pub fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_tracing(cli.verbose);

    match cli.command {
        // Verify the configured credentials against the token endpoint
        Commands::Login => {
            let settings = load_settings(cli.config, cli.api)?;
            let secrets = Secrets::from_settings(&settings)
                .wrap_err("Failed to set up secret store")?;
            secrets.login().wrap_err("Failed to log in")?;
            println!("{}", "ok".green());
            Ok(())
        }
        // Render each key expression to stdout
        Commands::Get {
            keys,
            separator,
            spread,
            cshell,
            bourne,
        } => {
            let dialect = Dialect::from_flags(cshell, bourne);
            let options = GetOptions {
                separator,
                spread,
                dialect,
            };

            let settings = load_settings(cli.config, cli.api)?;
            let secrets = Secrets::from_settings(&settings)
                .wrap_err("Failed to set up secret store")?;

            let stdout = io::stdout();
            let mut out = stdout.lock();
            secrets.get(&keys, &options, &mut out)?;
            Ok(())
        }
        // Show the registered stores
        Commands::Stores => {
            for info in stores() {
                println!("{}", info.display_with_examples());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_normalize_single_dash_long_flags() {
        let normalized = normalize_args(args(&[
            "privx-secrets",
            "-api",
            "https://privx.example.com",
            "get",
            "-separator=/",
            "-spread",
            "-s",
            "DB=app/db",
        ]));
        assert_eq!(
            normalized,
            args(&[
                "privx-secrets",
                "--api",
                "https://privx.example.com",
                "get",
                "--separator=/",
                "--spread",
                "-s",
                "DB=app/db",
            ])
        );
    }

    #[test]
    fn test_normalize_leaves_other_arguments() {
        let unchanged = args(&["privx-secrets", "--config", "c.toml", "-v", "get", "-c", "-x", "--", "-spread"]);
        assert_eq!(normalize_args(unchanged.clone()), unchanged);
    }

    #[test]
    fn test_parse_get_flags() {
        let cli = Cli::parse_from(normalize_args(args(&[
            "privx-secrets",
            "get",
            "-separator",
            "/",
            "-c",
            "A=secret/a",
            "secret/b",
        ])));

        match cli.command {
            Commands::Get {
                keys,
                separator,
                spread,
                cshell,
                bourne,
            } => {
                assert_eq!(keys, ["A=secret/a", "secret/b"]);
                assert_eq!(separator, "/");
                assert!(!spread);
                assert!(cshell);
                assert!(!bourne);
            }
            _ => panic!("Expected get command"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(args(&[
            "privx-secrets",
            "get",
            "--api",
            "file:///tmp/secrets",
            "secret.user",
        ]));
        assert_eq!(cli.api.as_deref(), Some("file:///tmp/secrets"));
    }

    #[test]
    fn test_get_requires_a_key() {
        assert!(Cli::try_parse_from(args(&["privx-secrets", "get"])).is_err());
    }
}
