// ABOUTME: Constants and output styling for the interpreter
// Version info, prompt and diagnostic byte sequences, reader limits

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest accepted identifier, first byte included. Further identifier bytes
/// are left in the stream and read as a separate token.
pub const SYMBOL_MAX: usize = 32;

pub const PROMPT_PLAIN: &str = "=> ";
pub const PROMPT_COLOR: &str = "\x1b[31m\u{3bb} \x1b[32m=> \x1b[0m";

pub const OOPS_PLAIN: &str = "oops!";
pub const OOPS_COLOR: &str = "\x1b[33moops!\x1b[0m";

pub const BAD_CELL_PLAIN: &str = "?";
pub const BAD_CELL_COLOR: &str = "\x1b[31m?\x1b[0m";

/// Byte sequences the REPL emits for its prompt and diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub prompt: &'static str,
    pub oops: &'static str,
    pub bad_cell: &'static str,
}

impl Style {
    /// ANSI colour escapes, for a terminal on raw stdio.
    pub fn color() -> Self {
        Style {
            prompt: PROMPT_COLOR,
            oops: OOPS_COLOR,
            bad_cell: BAD_CELL_COLOR,
        }
    }

    /// Plain text only, for pipes and tests.
    pub fn plain() -> Self {
        Style {
            prompt: PROMPT_PLAIN,
            oops: OOPS_PLAIN,
            bad_cell: BAD_CELL_PLAIN,
        }
    }

    /// For the line-editing host: the editor colours the prompt itself, so
    /// the core hands it plain text; diagnostics keep their colour.
    pub fn editor() -> Self {
        Style {
            prompt: PROMPT_PLAIN,
            oops: OOPS_COLOR,
            bad_cell: BAD_CELL_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_style_has_no_escapes() {
        let style = Style::plain();
        assert!(!style.prompt.contains('\x1b'));
        assert!(!style.oops.contains('\x1b'));
        assert!(!style.bad_cell.contains('\x1b'));
    }

    #[test]
    fn test_color_style_resets_after_marker() {
        let style = Style::color();
        assert!(style.oops.ends_with("\x1b[0m"));
        assert!(style.prompt.ends_with("\x1b[0m"));
    }
}
