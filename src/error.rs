// ABOUTME: Host-level error types for session start-up
// The interpreter core never raises; failures degrade to the empty reference
// or the oops! marker. These errors cover the host wiring around it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("failed to initialize the line editor: {0}")]
    Editor(#[from] rustyline::error::ReadlineError),

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
