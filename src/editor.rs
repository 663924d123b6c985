// ABOUTME: Interactive host built on rustyline, feeding lines into the byte stream
// The core keeps its byte-at-a-time contract; each accepted line (plus a
// newline byte) is queued for get_byte, and the core's prompt is handed to
// readline instead of being written to stdout.

use crate::io::Io;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::Write;

const HISTORY_FILE: &str = ".cellisp_history";

/// Rustyline helper that colours the prompt; the line itself is left alone.
#[derive(Completer, Helper, Hinter, Validator)]
pub struct PromptHelper {
    color: bool,
}

impl Highlighter for PromptHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if self.color && default {
            Cow::Owned(format!("\x1b[32m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }
}

/// Line-editing implementation of the interpreter's byte streams.
pub struct LineEditor {
    editor: Editor<PromptHelper, DefaultHistory>,
    buffer: VecDeque<u8>,
    pending: Option<u8>,
    next_prompt: String,
    done: bool,
}

impl LineEditor {
    pub fn new(color: bool) -> Result<Self, ReadlineError> {
        let config = Config::builder().auto_add_history(true).build();
        let mut editor: Editor<PromptHelper, DefaultHistory> = Editor::with_config(config)?;
        editor.set_helper(Some(PromptHelper { color }));
        let _ = editor.load_history(HISTORY_FILE);
        Ok(LineEditor {
            editor,
            buffer: VecDeque::new(),
            pending: None,
            next_prompt: String::new(),
            done: false,
        })
    }
}

impl Io for LineEditor {
    fn get_byte(&mut self) -> Option<u8> {
        if let Some(byte) = self.pending.take() {
            return Some(byte);
        }
        loop {
            if let Some(byte) = self.buffer.pop_front() {
                return Some(byte);
            }
            if self.done {
                return None;
            }
            match self.editor.readline(&self.next_prompt) {
                Ok(line) => {
                    self.next_prompt.clear();
                    self.buffer.extend(line.bytes());
                    self.buffer.push_back(b'\n');
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C reads as an empty line
                    self.next_prompt.clear();
                    self.buffer.push_back(b'\n');
                }
                Err(_) => {
                    self.done = true;
                }
            }
        }
    }

    fn unget_byte(&mut self, byte: u8) {
        self.pending = Some(byte);
    }

    fn put_byte(&mut self, byte: u8) {
        let _ = std::io::stdout().write_all(&[byte]);
    }

    fn flush(&mut self) {
        let _ = std::io::stdout().flush();
    }

    fn prompt(&mut self, text: &str) {
        self.flush();
        self.next_prompt = text.to_string();
    }
}

impl Drop for LineEditor {
    fn drop(&mut self) {
        let _ = self.editor.save_history(HISTORY_FILE);
    }
}
