//! Command-line arguments and subcommands of the `webidl` tool.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use termcolor::ColorChoice;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "webidl",
    version,
    about = "Parse, validate and rewrite Web IDL without losing formatting."
)]
pub struct WebIdlArgs {
    /// Log more (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to colour output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse files and report syntax errors.
    Parse {
        /// Files or directories; directories are searched for `.webidl` and `.idl` files.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Accept `typedef` inside container bodies.
        #[arg(long)]
        allow_nested_typedefs: bool,
    },
    /// Report validation diagnostics.
    Validate {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Apply automatic fixes and rewrite the files in place.
        #[arg(long)]
        fix: bool,
    },
    /// Dump the syntax tree of a file.
    Ast {
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = TreeFormat::Json)]
        format: TreeFormat,
        /// Include the end-of-input node carrying trailing trivia.
        #[arg(long)]
        concrete: bool,
    },
    /// Check that writing a parsed file reproduces it exactly.
    Roundtrip {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Fold partials and mixins into their targets and print the result.
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolves `auto` against whether `stream` is a terminal.
    pub fn choice(self, stream: atty::Stream) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if atty::is(stream) => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_follow_the_subcommand() {
        let args = WebIdlArgs::try_parse_from(["webidl", "validate", "a.webidl", "--fix", "-vv", "--color", "never"])
            .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.color, ColorMode::Never);
        assert!(matches!(args.command, Command::Validate { fix: true, .. }));
    }

    #[test]
    fn paths_are_required() {
        assert!(WebIdlArgs::try_parse_from(["webidl", "parse"]).is_err());
    }

    #[test]
    fn explicit_modes_ignore_the_terminal() {
        assert_eq!(ColorMode::Always.choice(atty::Stream::Stdout), ColorChoice::Always);
        assert_eq!(ColorMode::Never.choice(atty::Stream::Stdout), ColorChoice::Never);
    }
}
