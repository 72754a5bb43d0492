//! Command line interface definition

use clap::{Parser, Subcommand};
use officetpl_types::ColorChoice;
use std::path::PathBuf;

/// officetpl - Install custom Microsoft Office templates as the new defaults
#[derive(Parser)]
#[command(name = "officetpl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install custom Microsoft Office templates as the new defaults")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// Check the author of a template file or folder, print TRUE or FALSE and exit
    #[arg(long, value_name = "PATH")]
    pub check_author: Option<PathBuf>,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write a JSON debug log with every channel enabled
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show diagnostic output for the enabled log channels
    #[arg(long, global = true)]
    pub design_mode: bool,

    /// Semicolon-separated list of allowed template authors
    #[arg(long, global = true, value_name = "LIST")]
    pub allowed_authors: Option<String>,
}

/// Available commands
#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Copy the payload templates into the Office folders
    #[command(alias = "i")]
    Install {
        /// Folder holding the templates (defaults to the current folder)
        #[arg(long, value_name = "DIR")]
        payload: Option<PathBuf>,

        /// Skip document author validation
        #[arg(long)]
        no_validation: bool,
    },

    /// Remove installed templates and restore the Office defaults
    #[command(alias = "rm")]
    Uninstall {
        /// Folder holding the templates (defaults to the current folder)
        #[arg(long, value_name = "DIR")]
        payload: Option<PathBuf>,
    },

    /// Check the author of a template file or folder
    CheckAuthor {
        /// Template file or folder to inspect
        path: PathBuf,
    },

    /// Show the resolved Office template folders
    Paths,
}

impl Cli {
    /// The command to run; a bare invocation installs from the current folder
    #[must_use]
    pub fn resolved_command(&self) -> Commands {
        if let Some(command) = &self.command {
            return command.clone();
        }
        match &self.check_author {
            Some(path) => Commands::CheckAuthor { path: path.clone() },
            None => Commands::Install {
                payload: None,
                no_validation: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_invocation_installs() {
        let cli = Cli::try_parse_from(["officetpl"]).unwrap();
        assert_eq!(
            cli.resolved_command(),
            Commands::Install {
                payload: None,
                no_validation: false
            }
        );
    }

    #[test]
    fn legacy_check_author_flag_maps_to_command() {
        let cli = Cli::try_parse_from([
            "officetpl",
            "--check-author",
            "Normal.dotx",
            "--allowed-authors",
            "a;b",
        ])
        .unwrap();
        assert_eq!(
            cli.resolved_command(),
            Commands::CheckAuthor {
                path: PathBuf::from("Normal.dotx")
            }
        );
        assert_eq!(cli.global.allowed_authors.as_deref(), Some("a;b"));
    }

    #[test]
    fn subcommand_wins_and_globals_follow_it() {
        let cli = Cli::try_parse_from([
            "officetpl",
            "install",
            "--payload",
            "dist",
            "--no-validation",
            "--design-mode",
        ])
        .unwrap();
        assert!(cli.global.design_mode);
        assert_eq!(
            cli.resolved_command(),
            Commands::Install {
                payload: Some(PathBuf::from("dist")),
                no_validation: true
            }
        );
    }
}
