// ABOUTME: Lexer and reader turning the input byte stream into cell structure

use crate::cell::{CellRef, NIL};
use crate::config::SYMBOL_MAX;
use crate::interp::Interp;
use crate::io::Io;

/// Classification of the next non-whitespace byte. Classifying peeks: the
/// byte stays in the stream and the individual readers consume what they
/// need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Eot,
    Err,
    Quoted,
    Lparen,
    Rparen,
    Alpha,
    Digit,
    Eol,
}

/// Letters and the identifier extension characters.
fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || b"!*+-/<=>?_".contains(&byte)
}

fn is_ident(byte: u8) -> bool {
    is_ident_start(byte) || byte.is_ascii_digit()
}

/// One open list while reading: the spine built so far, the slot a pending
/// quote is waiting to capture, and the cell whose head receives the spine
/// when the list closes.
struct OpenList {
    first: CellRef,
    last: CellRef,
    quote_slot: CellRef,
    target: CellRef,
}

impl OpenList {
    fn new(target: CellRef) -> Self {
        OpenList {
            first: NIL,
            last: NIL,
            quote_slot: NIL,
            target,
        }
    }
}

impl Interp {
    /// Skips spaces, tabs, carriage returns, and commas, then pushes the next
    /// byte back and returns it. `None` at end of input.
    fn skip_blanks(&mut self) -> Option<u8> {
        loop {
            match self.io.get_byte() {
                None => return None,
                Some(b' ' | b'\t' | b'\r' | b',') => continue,
                Some(byte) => {
                    self.io.unget_byte(byte);
                    return Some(byte);
                }
            }
        }
    }

    /// Classifies the next token without consuming it.
    pub(crate) fn peek_token(&mut self) -> Token {
        match self.skip_blanks() {
            None => Token::Eot,
            Some(byte) if is_ident_start(byte) => Token::Alpha,
            Some(byte) if byte.is_ascii_digit() => Token::Digit,
            Some(b'(' | b'[') => Token::Lparen,
            Some(b')' | b']') => Token::Rparen,
            Some(b'\'') => Token::Quoted,
            Some(b'\n') => Token::Eol,
            Some(_) => Token::Err,
        }
    }

    /// Accumulates decimal digits into a `Number` cell, pushing the first
    /// non-digit back. No sign; negatives only arise from evaluation.
    pub(crate) fn read_number(&mut self) -> CellRef {
        let mut value: i64 = 0;
        loop {
            match self.io.get_byte() {
                Some(byte) if byte.is_ascii_digit() => {
                    value = value
                        .wrapping_mul(10)
                        .wrapping_add(i64::from(byte - b'0'));
                }
                Some(byte) => {
                    self.io.unget_byte(byte);
                    break;
                }
                None => break,
            }
        }
        self.heap.number(value)
    }

    /// Reads an identifier, resolves it against the root environment
    /// (declaring it on first sight), and returns a wrapper cell whose tag is
    /// copied from the binding, so later dispatch goes by tag, not by name.
    ///
    /// The first byte is always taken, which is how a lone apostrophe becomes
    /// the one-byte `'` symbol.
    pub(crate) fn read_symbol(&mut self) -> CellRef {
        let mut name = String::new();
        if let Some(first) = self.io.get_byte() {
            name.push(first as char);
            if first != b'\'' {
                while name.len() < SYMBOL_MAX {
                    match self.io.get_byte() {
                        Some(byte) if is_ident(byte) => name.push(byte as char),
                        Some(byte) => {
                            self.io.unget_byte(byte);
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        let id = self.heap.intern(&name);
        let mut binding = self.lookup(self.env, id);
        if binding.is_nil() {
            binding = self.declare_id(id);
        }

        let wrapper = self.heap.cons(binding, NIL);
        let tag = self.heap.tag(binding);
        self.heap.set_tag(wrapper, tag);
        wrapper
    }

    /// Reads one list spine from the stream. The caller has already consumed
    /// the opening paren (or wants a top-level spine for `read`).
    ///
    /// A closing paren ends the innermost open list; so do end of line, end
    /// of input, and an unrecognised byte. An explicit stack of open lists
    /// replaces reader recursion, so nesting depth is bounded by memory
    /// rather than the call stack.
    pub fn read(&mut self) -> CellRef {
        let mut open = OpenList::new(NIL);
        let mut stack: Vec<OpenList> = Vec::new();

        loop {
            match self.peek_token() {
                Token::Alpha => {
                    let element = self.read_symbol();
                    self.place(&mut open, element);
                }
                Token::Digit => {
                    let element = self.read_number();
                    self.place(&mut open, element);
                }
                Token::Quoted => {
                    // 'x becomes the element (quote x); the slot captures
                    // whatever the stream produces next
                    let quote = self.read_symbol();
                    let slot = self.heap.cons(NIL, NIL);
                    let form = self.heap.cons(quote, slot);
                    self.place(&mut open, form);
                    open.quote_slot = slot;
                }
                Token::Lparen => {
                    self.io.get_byte();
                    let target = if open.quote_slot.is_nil() {
                        let node = self.heap.cons(NIL, NIL);
                        self.append(&mut open, node);
                        node
                    } else {
                        std::mem::replace(&mut open.quote_slot, NIL)
                    };
                    stack.push(std::mem::replace(&mut open, OpenList::new(target)));
                }
                Token::Rparen | Token::Eol | Token::Eot | Token::Err => {
                    self.io.get_byte();
                    match stack.pop() {
                        Some(outer) => {
                            self.heap.set_head(open.target, open.first);
                            open = outer;
                        }
                        None => return open.first,
                    }
                }
            }
        }
    }

    /// Adds an element to the open list: normally as a fresh spine node, but
    /// a pending quote captures it instead.
    fn place(&mut self, open: &mut OpenList, element: CellRef) {
        if open.quote_slot.is_nil() {
            let node = self.heap.cons(element, NIL);
            self.append(open, node);
        } else {
            let slot = std::mem::replace(&mut open.quote_slot, NIL);
            self.heap.set_head(slot, element);
        }
    }

    fn append(&mut self, open: &mut OpenList, node: CellRef) {
        if open.last.is_nil() {
            open.first = node;
        } else {
            self.heap.set_tail(open.last, node);
        }
        open.last = node;
    }
}
