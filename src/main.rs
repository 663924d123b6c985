// ABOUTME: Command-line entry point selecting an interactive or raw byte-stream host

use cellisp::config::{self, Style};
use cellisp::editor::LineEditor;
use cellisp::error::HostError;
use cellisp::interp::Interp;
use cellisp::io::{Io, StdIo};
use clap::Parser;
use std::io::IsTerminal;

/// Tiny cell-heap Lisp with a line-oriented REPL
#[derive(Parser, Debug)]
#[command(name = "cellisp")]
#[command(version = config::VERSION)]
#[command(about = "A tiny cell-heap Lisp interpreter")]
struct CliArgs {
    /// Disable ANSI colour in the prompt and diagnostics
    #[arg(long)]
    plain: bool,

    /// Read raw bytes from stdin even on a terminal (no line editing)
    #[arg(long = "no-editor")]
    no_editor: bool,
}

fn main() -> Result<(), HostError> {
    let args = CliArgs::parse();
    let interactive = std::io::stdin().is_terminal() && !args.no_editor;
    let color = !args.plain && std::io::stdout().is_terminal();

    let (io, style): (Box<dyn Io>, Style) = if interactive {
        let style = if color { Style::editor() } else { Style::plain() };
        (Box::new(LineEditor::new(color)?), style)
    } else {
        let style = if color { Style::color() } else { Style::plain() };
        (Box::new(StdIo::new()), style)
    };

    let mut interp = Interp::new(io, style);
    interp.repl();
    Ok(())
}
