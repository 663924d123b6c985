// ABOUTME: The interpreter state, bootstrap table, and host-command registration

use crate::cell::{CellRef, Heap, Tag, NIL};
use crate::config::Style;
use crate::io::Io;

/// A host command invoked by name from the evaluated program. Hooks run with
/// full access to the interpreter and their result is always the empty
/// reference.
pub type HostFn = fn(&mut Interp);

/// Built-in names and their operator tags, aliases included.
const PRIMITIVES: &[(&str, Tag)] = &[
    ("'", Tag::Quote),
    ("quote", Tag::Quote),
    ("add1", Tag::Add1),
    ("inc", Tag::Add1),
    ("and", Tag::And),
    ("apply", Tag::Apply),
    ("atom", Tag::Atom),
    ("car", Tag::Car),
    ("first", Tag::Car),
    ("cdr", Tag::Cdr),
    ("next", Tag::Cdr),
    ("cond", Tag::Cond),
    ("cons", Tag::Cons),
    ("defun", Tag::Defun),
    ("defn", Tag::Defun),
    ("diff", Tag::Diff),
    ("-", Tag::Diff),
    ("eq", Tag::Eq),
    ("=", Tag::Eq),
    ("eval", Tag::Eval),
    ("funcall", Tag::Funcall),
    ("go", Tag::Go),
    ("greaterp", Tag::Greaterp),
    (">", Tag::Greaterp),
    ("lessp", Tag::Lessp),
    ("<", Tag::Lessp),
    ("list", Tag::ListFn),
    ("nil", Tag::Nil),
    ("not", Tag::Not),
    ("null", Tag::Null),
    ("nil?", Tag::Null),
    ("numberp", Tag::Numberp),
    ("number?", Tag::Numberp),
    ("or", Tag::Or),
    ("plus", Tag::Plus),
    ("+", Tag::Plus),
    ("print", Tag::Print),
    ("prog", Tag::Prog),
    ("quot", Tag::Quot),
    ("/", Tag::Quot),
    ("read", Tag::Read),
    ("return", Tag::Return),
    ("rplaca", Tag::Rplaca),
    ("rplacd", Tag::Rplacd),
    ("setq", Tag::Setq),
    ("sub1", Tag::Sub1),
    ("dec", Tag::Sub1),
    ("times", Tag::Times),
    ("*", Tag::Times),
    ("zerop", Tag::Zerop),
    ("zero?", Tag::Zerop),
];

/// One interpreter session: the cell heap, the root environment chain, the
/// truth sentinel, the prog-active flag, and the host's byte streams.
///
/// Single-threaded and synchronous; each top-level form is fully read, fully
/// evaluated, and fully printed before the next one begins.
pub struct Interp {
    pub(crate) heap: Heap,
    pub(crate) io: Box<dyn Io>,
    pub(crate) style: Style,
    pub(crate) env: CellRef,
    pub(crate) truth: CellRef,
    pub(crate) prog_active: bool,
    pub(crate) hooks: Vec<HostFn>,
}

impl Interp {
    /// Builds a session with every primitive and the `t` sentinel installed.
    pub fn new(io: Box<dyn Io>, style: Style) -> Self {
        let mut interp = Interp {
            heap: Heap::new(),
            io,
            style,
            env: NIL,
            truth: NIL,
            prog_active: true,
            hooks: Vec::new(),
        };

        // `t` is a unique Symbol cell pointing at its own binding; `eq`
        // compares symbols by binding identity, which keeps truth a singleton.
        let t = interp.define("t", Tag::True);
        interp.truth = interp.heap.cons(t, NIL);
        interp.heap.set_tag(interp.truth, Tag::Symbol);

        for &(name, tag) in PRIMITIVES {
            interp.define(name, tag);
        }

        interp
    }

    /// Declares `name` in the root environment and stamps it with `tag`.
    pub fn define(&mut self, name: &str, tag: Tag) -> CellRef {
        let binding = self.declare(name);
        self.heap.set_tag(binding, tag);
        binding
    }

    /// Registers a host command. The binding gets the `Hook` tag and its head
    /// points at a number cell holding the hook's table index; the evaluator
    /// arm for `Hook` dispatches through that index.
    pub fn register_host(&mut self, name: &str, hook: HostFn) {
        let binding = self.define(name, Tag::Hook);
        let index = self.heap.number(self.hooks.len() as i64);
        self.heap.set_head(binding, index);
        self.hooks.push(hook);
    }

    /// The truth sentinel.
    pub fn truth(&self) -> CellRef {
        self.truth
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The root environment chain.
    pub fn root_env(&self) -> CellRef {
        self.env
    }
}
