// ABOUTME: Canonical printer walking cell structure back into bytes

use crate::cell::{CellRef, NameId, Tag};
use crate::interp::Interp;
use crate::io::Io;

/// Work item for the print walk: a cell to render, or a close paren owed
/// after a nested list.
enum Step {
    Cell(CellRef),
    Close,
}

impl Interp {
    pub fn write_str(&mut self, text: &str) {
        for byte in text.bytes() {
            self.io.put_byte(byte);
        }
    }

    fn write_number(&mut self, value: i64) {
        self.write_str(&value.to_string());
    }

    fn write_name(&mut self, id: NameId) {
        let Interp { io, heap, .. } = self;
        for byte in heap.name_str(id).bytes() {
            io.put_byte(byte);
        }
    }

    /// Emits the canonical text of a cell. Parentheses appear only around a
    /// cell whose head is itself a `List`; sibling cells concatenate flat.
    /// Anything unrecognised prints the diagnostic marker.
    pub fn print(&mut self, cell: CellRef) {
        let mut steps = vec![Step::Cell(cell)];
        while let Some(step) = steps.pop() {
            let cell = match step {
                Step::Close => {
                    self.io.put_byte(b')');
                    continue;
                }
                Step::Cell(cell) => cell,
            };
            if cell.is_nil() {
                continue;
            }
            match self.heap.tag(cell) {
                Tag::Number => {
                    let value = self.heap.number_of(cell);
                    self.write_number(value);
                }
                Tag::Symbol => {
                    let binding = self.heap.head(cell);
                    if let Some(id) = self.heap.name_of(binding) {
                        self.write_name(id);
                    } else if let Some(value) = self.heap.number_payload(cell) {
                        // a quoted number: demoted to Symbol but still a number
                        self.write_number(value);
                    }
                }
                _ if self.heap.tag(self.heap.head(cell)) == Tag::List => {
                    self.io.put_byte(b'(');
                    steps.push(Step::Cell(self.heap.tail(cell)));
                    steps.push(Step::Close);
                    steps.push(Step::Cell(self.heap.head(cell)));
                }
                Tag::List => {
                    steps.push(Step::Cell(self.heap.tail(cell)));
                    steps.push(Step::Cell(self.heap.head(cell)));
                }
                _ => {
                    let marker = self.style.bad_cell;
                    self.write_str(marker);
                }
            }
        }
    }
}
