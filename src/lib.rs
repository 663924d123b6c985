// ABOUTME: Library surface exposing the interpreter components

pub mod cell;
pub mod config;
pub mod editor;
pub mod env;
pub mod error;
pub mod eval;
pub mod interp;
pub mod io;
pub mod printer;
pub mod reader;
pub mod repl;

pub use cell::{CellRef, Heap, Tag, NIL};
pub use config::Style;
pub use interp::Interp;
pub use io::{Io, MemIo, StdIo};
