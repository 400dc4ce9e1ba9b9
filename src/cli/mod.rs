//! The `webidl` command line tool.
//!
//! Each subcommand reads its inputs, runs one library operation over them and
//! reports per file. Syntax and validation problems are printed as miette
//! diagnostics; the process fails if any file had one.

use clap::Parser;
use log::info;
use miette::Diagnostic;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use walkdir::WalkDir;

use crate::ast::Definition;
use crate::cli::args::{Command, TreeFormat, WebIdlArgs};
use crate::cli::output::{report, Output};
use crate::grammar::parse;
use crate::merge::merge;
use crate::options::ParseOptions;
use crate::validation::{autofix_all, validate_with_source};
use crate::writer::write;

pub mod args;
pub mod logger;
pub mod output;

/// File extensions picked up when a directory is given.
const EXTENSIONS: &[&str] = &["webidl", "idl"];

/// Failures of the tool itself, as opposed to problems in the inputs.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("cannot read {}", path.display())]
    #[diagnostic(code(webidl::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {}", path.display())]
    #[diagnostic(code(webidl::io))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot walk directory")]
    #[diagnostic(code(webidl::io))]
    Walk(#[from] walkdir::Error),
    #[error("cannot serialise the tree: {0}")]
    #[diagnostic(code(webidl::serialise))]
    Serialise(String),
}

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args = WebIdlArgs::parse();
    logger::init(args.verbose, args.color.choice(atty::Stream::Stderr));
    output::install_report_hook(args.color);
    let mut out = Output::new(args.color.choice(atty::Stream::Stdout));

    let result = match args.command {
        Command::Parse {
            paths,
            allow_nested_typedefs,
        } => parse_files(&mut out, &paths, allow_nested_typedefs),
        Command::Validate { paths, fix } => validate_files(&mut out, &paths, fix),
        Command::Ast {
            file,
            format,
            concrete,
        } => dump_tree(&mut out, &file, format, concrete),
        Command::Roundtrip { paths } => roundtrip_files(&mut out, &paths),
        Command::Merge { files } => merge_files(&mut out, &files),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            report(error);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// SUBCOMMANDS
// ============================================================================

fn parse_files(out: &mut Output, paths: &[PathBuf], allow_nested_typedefs: bool) -> Result<bool, CliError> {
    let mut clean = true;
    for path in collect_files(paths)? {
        let options = options_for(&path).allow_nested_typedefs(allow_nested_typedefs);
        match parse(&read(&path)?, &options) {
            Ok(definitions) => out.status(true, &path, &format!("{} definitions", definitions.len())),
            Err(error) => {
                out.status(false, &path, "syntax error");
                report(error);
                clean = false;
            }
        }
    }
    Ok(clean)
}

fn validate_files(out: &mut Output, paths: &[PathBuf], fix: bool) -> Result<bool, CliError> {
    let mut clean = true;
    for path in collect_files(paths)? {
        let Some(mut definitions) = parse_or_report(out, &path)? else {
            clean = false;
            continue;
        };
        if fix {
            let applied = autofix_all(&mut definitions);
            if applied > 0 {
                fs::write(&path, write(&definitions)).map_err(|source| CliError::Write {
                    path: path.clone(),
                    source,
                })?;
                info!("rewrote {} with {applied} fixes", path.display());
            }
        }

        let name = path.display().to_string();
        let diagnostics = validate_with_source(&definitions, Some(&name));
        let errors = diagnostics.iter().filter(|diagnostic| !diagnostic.is_warning()).count();
        let detail = match (errors, diagnostics.len()) {
            (_, 0) => String::new(),
            (errors, total) => format!("{errors} errors, {} warnings", total - errors),
        };
        out.status(errors == 0, &path, &detail);
        for diagnostic in diagnostics {
            report(diagnostic);
        }
        clean &= errors == 0;
    }
    Ok(clean)
}

fn dump_tree(out: &mut Output, path: &Path, format: TreeFormat, concrete: bool) -> Result<bool, CliError> {
    let options = options_for(path).concrete(concrete);
    let definitions = match parse(&read(path)?, &options) {
        Ok(definitions) => definitions,
        Err(error) => {
            report(error);
            return Ok(false);
        }
    };
    let text = match format {
        TreeFormat::Json => serde_json::to_string_pretty(&definitions).map_err(|e| CliError::Serialise(e.to_string()))?,
        TreeFormat::Yaml => serde_yaml::to_string(&definitions).map_err(|e| CliError::Serialise(e.to_string()))?,
    };
    out.text(&text);
    Ok(true)
}

fn roundtrip_files(out: &mut Output, paths: &[PathBuf]) -> Result<bool, CliError> {
    let mut clean = true;
    for path in collect_files(paths)? {
        let text = read(&path)?;
        let Some(definitions) = parse_or_report(out, &path)? else {
            clean = false;
            continue;
        };
        let written = write(&definitions);
        if written == text {
            out.status(true, &path, "");
        } else {
            out.status(false, &path, "output differs from input");
            out.diff(&text, &written);
            clean = false;
        }
    }
    Ok(clean)
}

fn merge_files(out: &mut Output, paths: &[PathBuf]) -> Result<bool, CliError> {
    let mut all: Vec<Definition> = Vec::new();
    for path in paths {
        match parse(&read(path)?, &options_for(path).concrete(true)) {
            Ok(definitions) => all.extend(definitions),
            Err(error) => {
                report(error);
                return Ok(false);
            }
        }
    }
    out.text(&write(&merge(all)));
    Ok(true)
}

// ============================================================================
// HELPERS
// ============================================================================

fn options_for(path: &Path) -> ParseOptions {
    ParseOptions::new().source_name(path.display().to_string())
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses `path` in concrete mode, reporting a syntax error as a failed file.
fn parse_or_report(out: &mut Output, path: &Path) -> Result<Option<Vec<Definition>>, CliError> {
    match parse(&read(path)?, &options_for(path).concrete(true)) {
        Ok(definitions) => Ok(Some(definitions)),
        Err(error) => {
            out.status(false, path, "syntax error");
            report(error);
            Ok(None)
        }
    }
}

/// Expands directories into the Web IDL files below them, sorted by path.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            let matches = entry
                .path()
                .extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| EXTENSIONS.contains(&extension));
            if entry.file_type().is_file() && matches {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}
