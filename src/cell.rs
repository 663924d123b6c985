// ABOUTME: Cell heap and tag model backing every interpreter value

/// Discriminator for a heap cell.
///
/// The declaration order is load-bearing: every tag from `User` onward names
/// something that can sit in operator position and be applied, so callability
/// is an ordering test rather than a membership list. A cell's tag may be
/// rewritten in place over its lifetime; `defun` turns a variable into a
/// user-function header and `prog` turns one into a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tag {
    List,
    Number,
    Symbol,
    Var,
    Quote,
    Nil,
    True,
    Cond,
    Defun,
    Setq,
    Null,
    Funcall,
    Prog,
    Go,
    Return,
    Label,
    Rplaca,
    Rplacd,
    Apply,
    ListFn,
    Hook,
    User,
    Add1,
    Sub1,
    Plus,
    Diff,
    Times,
    Quot,
    Lessp,
    Eq,
    Greaterp,
    Zerop,
    Numberp,
    And,
    Or,
    Not,
    Cons,
    Car,
    Cdr,
    Read,
    Eval,
    Print,
    Atom,
}

impl Tag {
    /// True for user functions and every built-in that may be applied.
    pub fn is_callable(self) -> bool {
        self >= Tag::User
    }
}

/// Index of an interned name in the heap's name pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameId(u32);

/// Reference to a heap cell, or the distinguished empty reference.
///
/// The empty reference simultaneously denotes `nil`, falsehood, and the empty
/// list. Accessors treat it as an inert cell: empty head and tail, zero
/// number, no name. Mutating it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef(u32);

/// The empty reference.
pub const NIL: CellRef = CellRef(u32::MAX);

impl CellRef {
    pub fn is_nil(self) -> bool {
        self == NIL
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Extra slot of a cell: an integer for numbers, an interned name for
/// environment bindings, nothing for plain pairs.
///
/// The payload survives tag rewrites. A number cell demoted to `Symbol` by
/// `quote` still carries its integer, and the printer falls back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    None,
    Number(i64),
    Name(NameId),
}

#[derive(Debug, Clone)]
struct Cell {
    tag: Tag,
    payload: Payload,
    head: CellRef,
    tail: CellRef,
}

/// Arena of cells plus the growing pool of interned names.
///
/// Cells are allocated by the reader, by `cons`, by number construction, and
/// by call-frame setup, and are never freed; the heap only grows. Names are
/// interned once and referenced by id for the rest of the session.
pub struct Heap {
    cells: Vec<Cell>,
    names: Vec<String>,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            cells: Vec::new(),
            names: Vec::new(),
        }
    }

    /// Allocates a fresh pair with the given head and tail, tagged `List`.
    pub fn cons(&mut self, head: CellRef, tail: CellRef) -> CellRef {
        let index = u32::try_from(self.cells.len()).expect("cell heap exhausted");
        self.cells.push(Cell {
            tag: Tag::List,
            payload: Payload::None,
            head,
            tail,
        });
        CellRef(index)
    }

    /// Allocates a `Number` cell carrying `value`.
    pub fn number(&mut self, value: i64) -> CellRef {
        let cell = self.cons(NIL, NIL);
        self.cells[cell.index()].tag = Tag::Number;
        self.cells[cell.index()].payload = Payload::Number(value);
        cell
    }

    pub fn tag(&self, cell: CellRef) -> Tag {
        if cell.is_nil() {
            Tag::Nil
        } else {
            self.cells[cell.index()].tag
        }
    }

    pub fn head(&self, cell: CellRef) -> CellRef {
        if cell.is_nil() {
            NIL
        } else {
            self.cells[cell.index()].head
        }
    }

    pub fn tail(&self, cell: CellRef) -> CellRef {
        if cell.is_nil() {
            NIL
        } else {
            self.cells[cell.index()].tail
        }
    }

    /// Integer payload of a cell, regardless of its current tag.
    pub fn number_payload(&self, cell: CellRef) -> Option<i64> {
        if cell.is_nil() {
            return None;
        }
        match self.cells[cell.index()].payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Integer payload, defaulting to zero where none is present.
    pub fn number_of(&self, cell: CellRef) -> i64 {
        self.number_payload(cell).unwrap_or(0)
    }

    /// Name payload of a binding cell, if any.
    pub fn name_of(&self, cell: CellRef) -> Option<NameId> {
        if cell.is_nil() {
            return None;
        }
        match self.cells[cell.index()].payload {
            Payload::Name(id) => Some(id),
            _ => None,
        }
    }

    pub fn set_head(&mut self, cell: CellRef, value: CellRef) {
        if !cell.is_nil() {
            self.cells[cell.index()].head = value;
        }
    }

    pub fn set_tail(&mut self, cell: CellRef, value: CellRef) {
        if !cell.is_nil() {
            self.cells[cell.index()].tail = value;
        }
    }

    pub fn set_tag(&mut self, cell: CellRef, tag: Tag) {
        if !cell.is_nil() {
            self.cells[cell.index()].tag = tag;
        }
    }

    pub fn set_name(&mut self, cell: CellRef, id: NameId) {
        if !cell.is_nil() {
            self.cells[cell.index()].payload = Payload::Name(id);
        }
    }

    /// Interns a name, returning the id of the existing entry when the exact
    /// byte sequence is already in the pool.
    pub fn intern(&mut self, name: &str) -> NameId {
        if let Some(position) = self.names.iter().position(|n| n == name) {
            return NameId(position as u32);
        }
        let id = u32::try_from(self.names.len()).expect("name pool exhausted");
        self.names.push(name.to_string());
        NameId(id)
    }

    pub fn name_str(&self, id: NameId) -> &str {
        &self.names[id.0 as usize]
    }

    /// Number of cells allocated so far. Monotonically increasing.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cons_defaults() {
        let mut heap = Heap::new();
        let cell = heap.cons(NIL, NIL);
        assert_eq!(heap.tag(cell), Tag::List);
        assert!(heap.head(cell).is_nil());
        assert!(heap.tail(cell).is_nil());
        assert_eq!(heap.number_payload(cell), None);
    }

    #[test]
    fn test_number_cell() {
        let mut heap = Heap::new();
        let cell = heap.number(42);
        assert_eq!(heap.tag(cell), Tag::Number);
        assert_eq!(heap.number_of(cell), 42);
    }

    #[test]
    fn test_retag_keeps_payload() {
        let mut heap = Heap::new();
        let cell = heap.number(7);
        heap.set_tag(cell, Tag::Symbol);
        assert_eq!(heap.tag(cell), Tag::Symbol);
        assert_eq!(heap.number_payload(cell), Some(7));
    }

    #[test]
    fn test_empty_reference_accessors() {
        let heap = Heap::new();
        assert_eq!(heap.tag(NIL), Tag::Nil);
        assert!(heap.head(NIL).is_nil());
        assert!(heap.tail(NIL).is_nil());
        assert_eq!(heap.number_of(NIL), 0);
        assert_eq!(heap.name_of(NIL), None);
    }

    #[test]
    fn test_empty_reference_mutation_is_noop() {
        let mut heap = Heap::new();
        heap.set_tag(NIL, Tag::Number);
        heap.set_head(NIL, NIL);
        assert_eq!(heap.tag(NIL), Tag::Nil);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_intern_dedupes() {
        let mut heap = Heap::new();
        let a = heap.intern("plus");
        let b = heap.intern("plus");
        let c = heap.intern("diff");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(heap.name_str(a), "plus");
        assert_eq!(heap.name_str(c), "diff");
    }

    #[test]
    fn test_callable_ordering() {
        assert!(Tag::User.is_callable());
        assert!(Tag::Car.is_callable());
        assert!(Tag::Atom.is_callable());
        assert!(!Tag::Cond.is_callable());
        assert!(!Tag::Quote.is_callable());
        assert!(!Tag::Label.is_callable());
        assert!(!Tag::Hook.is_callable());
    }

    #[test]
    fn test_heap_only_grows() {
        let mut heap = Heap::new();
        let before = heap.len();
        let a = heap.cons(NIL, NIL);
        let b = heap.number(1);
        heap.set_head(a, b);
        heap.set_tag(a, Tag::Var);
        assert_eq!(heap.len(), before + 2);
    }
}
