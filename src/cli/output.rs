//! Handles all user-facing output for the CLI.
//!
//! Results go to stdout through [`Output`]; diagnostics are rendered by
//! miette and go to stderr.

use difference::{Changeset, Difference};
use miette::Diagnostic;
use std::io::Write;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::args::ColorMode;

pub struct Output {
    stdout: StandardStream,
}

impl Output {
    pub fn new(color: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(color),
        }
    }

    /// One line per processed file: `ok` or `FAIL`, the path and a detail.
    pub fn status(&mut self, ok: bool, path: &Path, detail: &str) {
        let (label, color) = if ok { ("ok", Color::Green) } else { ("FAIL", Color::Red) };
        let _ = self
            .stdout
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(self.stdout, "{label:>4}");
        let _ = self.stdout.reset();
        if detail.is_empty() {
            let _ = writeln!(self.stdout, " {}", path.display());
        } else {
            let _ = writeln!(self.stdout, " {} ({detail})", path.display());
        }
    }

    pub fn text(&mut self, text: &str) {
        let _ = write!(self.stdout, "{text}");
        if !text.ends_with('\n') {
            let _ = writeln!(self.stdout);
        }
    }

    /// Line diff between `expected` and `actual`.
    pub fn diff(&mut self, expected: &str, actual: &str) {
        let changeset = Changeset::new(expected, actual, "\n");
        for diff in &changeset.diffs {
            let (prefix, color, text) = match diff {
                Difference::Same(text) => (' ', None, text),
                Difference::Add(text) => ('+', Some(Color::Green), text),
                Difference::Rem(text) => ('-', Some(Color::Red), text),
            };
            let _ = self.stdout.set_color(ColorSpec::new().set_fg(color));
            for line in text.split('\n') {
                let _ = writeln!(self.stdout, "{prefix}{line}");
            }
        }
        let _ = self.stdout.reset();
    }
}

/// Prints a diagnostic with source excerpt to stderr.
pub fn report<D>(diagnostic: D)
where
    D: Diagnostic + Send + Sync + 'static,
{
    eprintln!("{:?}", miette::Report::new(diagnostic));
}

/// Makes miette follow `--color`. `auto` keeps miette's own detection.
pub fn install_report_hook(mode: ColorMode) {
    let color = match mode {
        ColorMode::Auto => return,
        ColorMode::Always => true,
        ColorMode::Never => false,
    };
    let _ = miette::set_hook(Box::new(move |_| {
        Box::new(miette::MietteHandlerOpts::new().color(color).build())
    }));
}
