//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments.

use std::fs::File;
use std::io;
use std::os::fd::AsFd;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::{self, PortalConfig};
use crate::core::constants::{APP_NAME, APP_VERSION};
use crate::core::{Error, Result};
use crate::host::HostServices;
use crate::portal::descriptor::uri_scheme;
use crate::portal::{NotificationEmitter, PortalDispatcher, ResourceDescriptor, ResourceInput, policy_for};
use crate::{bus, logging};

/// termappchooser - xdg-desktop-portal backend for AppChooser and OpenURI.
#[derive(Parser, Debug)]
#[command(name = "termappchooser")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file to use instead of the default locations.
    #[arg(long, short, global = true, env = "TERMAPPCHOOSER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Run the portal backend on the session bus.
    ///
    /// This is what runs when no command is given. The service claims
    /// org.freedesktop.impl.portal.desktop.termappchooser and exits on
    /// SIGINT or SIGTERM.
    Serve,

    /// Show how a URI or local path would be opened, without launching anything.
    #[command(after_long_help = r#"Examples:
  termappchooser resolve https://example.com       # Browser for web links
  termappchooser resolve mailto:me@example.com     # Mail client
  termappchooser resolve ~/Documents/report.pdf    # Handler for a local file
  termappchooser resolve ~/Pictures --json         # Machine-readable output"#)]
    Resolve {
        /// URI or path to resolve.
        target: String,

        /// Output in JSON format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// List every application registered for a content type.
    ///
    /// The default handler is listed first and marked.
    #[command(after_long_help = r#"Examples:
  termappchooser handlers text/html          # Browsers
  termappchooser handlers inode/directory    # File managers
  termappchooser handlers image/png --json   # JSON output"#)]
    Handlers {
        /// MIME type to look up, e.g. text/plain.
        content_type: String,

        /// Output in JSON format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Output the configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(termappchooser completions --shell zsh)"
    ///   termappchooser completions --shell fish > ~/.config/fish/completions/termappchooser.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

/// Result of the `resolve` command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolution {
    target: String,
    content_type: String,
    handler: Option<String>,
    handler_name: Option<String>,
}

/// One row of the `handlers` table.
#[derive(Debug, Serialize, Tabled)]
struct HandlerRow {
    #[tabled(rename = "Default")]
    #[serde(rename = "default")]
    is_default: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Desktop ID")]
    id: String,
}

impl Cli {
    /// Returns the selected command; `serve` when none was given.
    #[must_use]
    pub fn selected_command(&self) -> &Commands { self.command.as_ref().unwrap_or(&Commands::Serve) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<()> {
        match self.selected_command() {
            Commands::Serve => self.execute_serve()?,
            Commands::Resolve { target, json } => self.execute_resolve(target, *json)?,
            Commands::Handlers { content_type, json } => self.execute_handlers(content_type, *json)?,
            Commands::Schema => println!("{}", config::generate_schema_json()),
            Commands::Completions { shell } => Self::print_completions(*shell),
        }

        Ok(())
    }

    fn load_config(&self) -> Result<PortalConfig> { Ok(config::load(self.config.as_deref())?) }

    /// A dispatcher for read-only queries; never launches or notifies.
    fn offline_dispatcher(&self) -> Result<PortalDispatcher> {
        let config = self.load_config()?;
        Ok(PortalDispatcher::new(
            HostServices::xdg(&config),
            policy_for(config.chooser.policy),
            NotificationEmitter::disabled(),
        ))
    }

    fn execute_serve(&self) -> Result<()> {
        logging::init();
        tracing::info!("{APP_NAME} {APP_VERSION} starting");

        let config = self.load_config()?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name(APP_NAME)
            .build()?;

        runtime.block_on(bus::serve(&config))
    }

    fn execute_resolve(&self, target: &str, json: bool) -> Result<()> {
        let dispatcher = self.offline_dispatcher()?;
        let descriptor = resolve_target(&dispatcher, target)?;
        let handler = dispatcher.handlers().default_handler_for(&descriptor.content_class).ok();

        let resolution = Resolution {
            target: descriptor.target(),
            content_type: descriptor.content_class,
            handler_name: handler.as_ref().map(|h| h.display_name.clone()),
            handler: handler.map(|h| h.id),
        };

        if json {
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            return Ok(());
        }

        println!("{} {}", "Target:".bold(), resolution.target);
        println!("{} {}", "Content type:".bold(), resolution.content_type.cyan());
        match (&resolution.handler_name, &resolution.handler) {
            (Some(name), Some(id)) => println!("{} {} ({id})", "Handler:".bold(), name.green()),
            _ => println!("{} {}", "Handler:".bold(), "none registered".red()),
        }

        Ok(())
    }

    fn execute_handlers(&self, content_type: &str, json: bool) -> Result<()> {
        let handlers = self.offline_dispatcher()?.handlers().all_handlers_for(content_type);
        if handlers.is_empty() {
            return Err(Error::other(format!("no application found for content type: {content_type}")));
        }

        let rows: Vec<HandlerRow> = handlers
            .into_iter()
            .enumerate()
            .map(|(index, handler)| HandlerRow {
                is_default: if index == 0 { "*".to_string() } else { String::new() },
                name: handler.display_name,
                id: handler.id,
            })
            .collect();

        if json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Ok(())
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, APP_NAME, &mut io::stdout());
    }
}

/// Resolves a CLI target the same way the portal resolves a request.
///
/// Anything with a URI scheme is treated as a URI; everything else is opened
/// and resolved through its descriptor.
fn resolve_target(dispatcher: &PortalDispatcher, target: &str) -> Result<ResourceDescriptor> {
    let resolver = dispatcher.resolver();
    if uri_scheme(target).is_some() {
        return resolver.resolve(ResourceInput::Uri(target)).map_err(|err| Error::other(err.to_string()));
    }

    let path = Path::new(target);
    let file = File::open(path)
        .map_err(|err| Error::invalid_args(format!("cannot open {}: {err}", path.display())))?;
    let input = if file.metadata()?.is_dir() {
        ResourceInput::Directory(file.as_fd())
    } else {
        ResourceInput::File(file.as_fd())
    };

    resolver.resolve(input).map_err(|err| Error::other(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_means_serve() {
        let cli = Cli::try_parse_from(["termappchooser"]).unwrap();
        assert_eq!(cli.selected_command(), &Commands::Serve);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_serve_with_config() {
        let cli =
            Cli::try_parse_from(["termappchooser", "serve", "--config", "/tmp/portal.jsonc"]).unwrap();
        assert_eq!(cli.selected_command(), &Commands::Serve);
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/portal.jsonc")));
    }

    #[test]
    fn test_resolve_parse() {
        let cli = Cli::try_parse_from(["termappchooser", "resolve", "https://example.com", "-j"]).unwrap();
        assert_eq!(cli.selected_command(), &Commands::Resolve {
            target: "https://example.com".into(),
            json: true
        });
    }

    #[test]
    fn test_handlers_requires_content_type() {
        assert!(Cli::try_parse_from(["termappchooser", "handlers"]).is_err());

        let cli = Cli::try_parse_from(["termappchooser", "handlers", "text/html"]).unwrap();
        assert_eq!(cli.selected_command(), &Commands::Handlers {
            content_type: "text/html".into(),
            json: false
        });
    }

    #[test]
    fn test_completions_parse() {
        let cli = Cli::try_parse_from(["termappchooser", "completions", "--shell", "zsh"]).unwrap();
        assert_eq!(cli.selected_command(), &Commands::Completions { shell: Shell::Zsh });
    }

    #[test]
    fn test_unknown_command_fails() {
        assert!(Cli::try_parse_from(["termappchooser", "frobnicate"]).is_err());
    }

    #[test]
    fn test_missing_explicit_config_stops_the_command() {
        let cli = Cli::try_parse_from([
            "termappchooser",
            "--config",
            "/nonexistent/termappchooser/config.jsonc",
            "handlers",
            "text/plain",
        ])
        .unwrap();

        let err = cli.execute().unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn test_cli_definition_is_valid() { Cli::command().debug_assert(); }

    #[test]
    fn test_resolve_target_uri_and_directory() {
        let dispatcher = PortalDispatcher::new(
            HostServices::xdg(&PortalConfig::default()),
            policy_for(config::ChooserPolicyKind::First),
            NotificationEmitter::disabled(),
        );

        let uri = resolve_target(&dispatcher, "mailto:me@example.com").unwrap();
        assert_eq!(uri.content_class, "message/rfc822");

        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_target(&dispatcher, dir.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved.content_class, "inode/directory");

        assert!(resolve_target(&dispatcher, "/nonexistent/file/for/sure").is_err());
    }
}
