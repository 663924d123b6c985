// ABOUTME: Tree-walking evaluator: operator dispatch, built-ins, user calls, prog

use crate::cell::{CellRef, Tag, NIL};
use crate::interp::Interp;
use crate::io::Io;

impl Interp {
    /// Evaluates a form in the given environment.
    ///
    /// A form is a spine of `List` cells; dispatch goes by the tag of the
    /// first element, which the reader copied from the name's binding.
    /// Anything that goes wrong degrades to the empty reference; the
    /// evaluator never raises.
    pub fn eval(&mut self, form: CellRef, env: CellRef) -> CellRef {
        if form.is_nil() {
            return NIL;
        }
        match self.heap.tag(form) {
            Tag::Var => return self.binding_value(env, self.heap.head(form)),
            Tag::Number => return form,
            Tag::Label => return NIL,
            _ => {}
        }

        let op = self.heap.head(form);
        let rest = self.heap.tail(form);
        match self.heap.tag(op) {
            Tag::True => self.truth,
            Tag::Nil => NIL,

            // Quoting demotes every non-list, non-callable cell (and every
            // user-function reference) to an inert symbol, in place.
            Tag::Quote => {
                let arg = self.heap.head(rest);
                self.vars_to_symbols(arg);
                arg
            }

            Tag::Car => {
                let value = self.eval(rest, env);
                self.heap.head(value)
            }
            Tag::Cdr => {
                let value = self.eval(rest, env);
                self.heap.tail(value)
            }

            Tag::Atom => {
                let value = self.eval(rest, env);
                let atomic = value.is_nil()
                    || matches!(self.heap.tag(value), Tag::Number | Tag::Symbol);
                self.truth_if(atomic)
            }

            // The second operand is the spine tail, not its first element.
            Tag::Eq => {
                let a = self.eval(self.heap.head(rest), env);
                let b = self.eval(self.heap.tail(rest), env);
                self.eq_cells(a, b)
            }
            Tag::Null => {
                let value = self.eval(self.heap.head(rest), env);
                self.eq_cells(value, NIL)
            }

            Tag::Cons => {
                let head = self.eval(self.heap.head(rest), env);
                let tail = self.eval(self.heap.tail(rest), env);
                self.heap.cons(head, tail)
            }

            Tag::ListFn => self.build_list(rest),
            Tag::Cond => self.eval_cond(rest, env),

            Tag::Setq => {
                let value = self.eval(self.heap.tail(rest), env);
                let reference = self.heap.head(self.heap.head(rest));
                if let Some(id) = self.heap.name_of(reference) {
                    let binding = self.lookup(env, id);
                    self.heap.set_tail(binding, value);
                }
                value
            }

            Tag::Defun => {
                let binding = self.heap.head(self.heap.head(rest));
                self.heap.set_tag(binding, Tag::User);
                let def = self.heap.tail(rest); // (params . body)
                self.heap.set_tail(binding, def);
                // rewrite references to the new function inside its own body
                // so it can call itself
                let body = self.heap.tail(def);
                self.vars_to_user(body);
                NIL
            }

            Tag::User => {
                let def = self.heap.tail(self.heap.head(op));
                let args = self.eval_args(rest, env);
                let params = self.heap.head(def);
                let frame = self.bind_params(params, args, env);
                let body = self.heap.head(self.heap.tail(def));
                self.eval(body, frame)
            }

            Tag::Funcall | Tag::Apply => {
                let callee = self.eval(self.heap.head(rest), env);
                let tag = self.heap.tag(self.heap.head(callee));
                if tag.is_callable() {
                    let call = self.heap.cons(callee, self.heap.tail(rest));
                    if tag == Tag::User {
                        self.heap.set_tag(callee, Tag::User);
                    }
                    let value = self.eval(call, env);
                    self.heap.set_tag(callee, tag);
                    value
                } else {
                    NIL
                }
            }

            Tag::Eval => {
                let value = self.eval(rest, env);
                if self.heap.tag(value) == Tag::Symbol {
                    self.binding_value(env, self.heap.head(value))
                } else {
                    self.eval(value, env)
                }
            }

            Tag::Print => {
                let value = self.eval(self.heap.head(rest), env);
                self.print(value);
                self.io.put_byte(b'\n');
                NIL
            }

            Tag::Read => self.read(),

            // and/or/not evaluate their forms in the empty environment
            Tag::And => self.eval_and(rest),
            Tag::Or => self.eval_or(rest),
            Tag::Not => {
                let value = self.eval(rest, NIL);
                self.truth_if(value.is_nil())
            }

            Tag::Plus | Tag::Diff | Tag::Times | Tag::Quot | Tag::Lessp | Tag::Greaterp => {
                let a = self.eval(self.heap.head(rest), env);
                let b = self.eval(self.heap.tail(rest), env);
                self.arith(self.heap.tag(op), a, b)
            }
            Tag::Add1 | Tag::Sub1 => {
                let a = self.eval(self.heap.head(rest), env);
                self.arith(self.heap.tag(op), a, NIL)
            }

            Tag::Zerop => {
                let value = self.eval(self.heap.head(rest), env);
                self.truth_if(self.heap.number_of(value) == 0)
            }
            Tag::Numberp => {
                let value = self.eval(self.heap.head(rest), env);
                self.truth_if(self.heap.tag(value) == Tag::Number)
            }

            Tag::Prog => self.eval_prog(form, env),

            // go hands the prog executor the statements after the label
            Tag::Go => {
                let label = self.heap.head(rest);
                self.heap.tail(self.heap.head(label))
            }
            Tag::Return => {
                self.prog_active = false;
                self.eval(rest, env)
            }

            Tag::Hook => {
                let index = self.heap.number_of(self.heap.head(self.heap.head(op)));
                if let Ok(index) = usize::try_from(index) {
                    if let Some(hook) = self.hooks.get(index).copied() {
                        hook(self);
                    }
                }
                NIL
            }

            Tag::List => {
                if rest.is_nil() {
                    self.eval(op, env)
                } else {
                    let head = self.eval(op, env);
                    let tail = self.eval(rest, env);
                    self.heap.cons(head, tail)
                }
            }
            Tag::Var => self.binding_value(env, self.heap.head(op)),
            Tag::Number => op,

            _ => NIL,
        }
    }

    fn truth_if(&self, condition: bool) -> CellRef {
        if condition {
            self.truth
        } else {
            NIL
        }
    }

    /// Identity-based equality: both empty, or both symbols sharing one
    /// environment binding.
    fn eq_cells(&self, a: CellRef, b: CellRef) -> CellRef {
        if a.is_nil() || b.is_nil() {
            return self.truth_if(a == b);
        }
        let same = self.heap.tag(a) == Tag::Symbol
            && self.heap.tag(b) == Tag::Symbol
            && self.heap.head(a) == self.heap.head(b);
        self.truth_if(same)
    }

    fn arith(&mut self, op: Tag, x: CellRef, y: CellRef) -> CellRef {
        let a = self.heap.number_of(x);
        let b = self.heap.number_of(y);
        match op {
            Tag::Lessp => return self.truth_if(a < b),
            Tag::Greaterp => return self.truth_if(a > b),
            _ => {}
        }
        let value = match op {
            Tag::Plus => a.wrapping_add(b),
            Tag::Diff => a.wrapping_sub(b),
            Tag::Times => a.wrapping_mul(b),
            Tag::Quot => {
                if b == 0 {
                    0
                } else {
                    a.wrapping_div(b)
                }
            }
            Tag::Add1 => a.wrapping_add(1),
            Tag::Sub1 => a.wrapping_sub(1),
            _ => 0,
        };
        self.heap.number(value)
    }

    /// Walks clauses `(p e)` in order, returning the value of the first `e`
    /// whose `p` evaluates non-empty.
    fn eval_cond(&mut self, mut clauses: CellRef, env: CellRef) -> CellRef {
        while !clauses.is_nil() {
            let clause = self.heap.head(clauses);
            let test = self.eval(self.heap.head(clause), env);
            if !test.is_nil() {
                let consequent = self.heap.head(self.heap.tail(clause));
                return self.eval(consequent, env);
            }
            clauses = self.heap.tail(clauses);
        }
        NIL
    }

    fn eval_and(&mut self, mut items: CellRef) -> CellRef {
        while !items.is_nil() {
            let item = self.heap.head(items);
            if self.eval(item, NIL).is_nil() {
                return NIL;
            }
            items = self.heap.tail(items);
        }
        self.truth
    }

    fn eval_or(&mut self, mut items: CellRef) -> CellRef {
        while !items.is_nil() {
            let item = self.heap.head(items);
            if !self.eval(item, NIL).is_nil() {
                return self.truth;
            }
            items = self.heap.tail(items);
        }
        NIL
    }

    /// Folds the raw argument spine with `list = cons(list, element)`,
    /// yielding a reversed, left-nested chain. Arguments are not evaluated.
    fn build_list(&mut self, mut items: CellRef) -> CellRef {
        let mut list = NIL;
        while !items.is_nil() {
            let element = self.heap.head(items);
            list = self.heap.cons(list, element);
            items = self.heap.tail(items);
        }
        list
    }

    /// Evaluates each element of the argument spine in order and returns a
    /// fresh spine of the results.
    fn eval_args(&mut self, mut args: CellRef, env: CellRef) -> CellRef {
        let mut first = NIL;
        let mut last = NIL;
        while !args.is_nil() {
            let arg = self.heap.head(args);
            let value = self.eval(arg, env);
            let node = self.heap.cons(value, NIL);
            if last.is_nil() {
                first = node;
            } else {
                self.heap.set_tail(last, node);
            }
            last = node;
            args = self.heap.tail(args);
        }
        first
    }

    /// Runs a `(prog (locals…) statements…)` body: locals bound empty,
    /// labels rewritten, then a cursor walk with `go` jumps until the
    /// statements run out or `return` clears the prog-active flag.
    fn eval_prog(&mut self, form: CellRef, env: CellRef) -> CellRef {
        let rest = self.heap.tail(form);
        let params = self.heap.head(rest);
        let frame = self.bind_params(params, NIL, env);
        self.prog_active = true;

        let mut cursor = self.heap.tail(rest);
        self.find_labels(cursor);

        let mut value = NIL;
        while !cursor.is_nil() && self.prog_active {
            let statement = self.heap.head(cursor);
            value = self.eval(statement, frame);
            if self.heap.tag(self.heap.head(statement)) == Tag::Go {
                cursor = value;
            } else {
                cursor = self.heap.tail(cursor);
            }
        }

        // nested progs must find the flag set again
        self.prog_active = true;
        value
    }

    /// Retags every bare name in statement position to a label and points its
    /// binding at the following statement. Runs on each prog entry.
    fn find_labels(&mut self, mut cursor: CellRef) {
        while !cursor.is_nil() {
            let statement = self.heap.head(cursor);
            if self.heap.tag(statement) == Tag::Var {
                self.heap.set_tag(statement, Tag::Label);
                let binding = self.heap.head(statement);
                let next = self.heap.tail(cursor);
                self.heap.set_tail(binding, next);
            }
            cursor = self.heap.tail(cursor);
        }
    }

    /// The quote walk: variable references and other non-list, non-callable
    /// cells become symbols; user-function references do too, which also
    /// stops the walk from chasing a function's self-reference cycle.
    fn vars_to_symbols(&mut self, root: CellRef) {
        let mut pending = vec![root];
        while let Some(cell) = pending.pop() {
            if cell.is_nil() {
                continue;
            }
            let tag = self.heap.tag(cell);
            if (tag != Tag::List && !tag.is_callable()) || tag == Tag::User {
                self.heap.set_tag(cell, Tag::Symbol);
            } else {
                pending.push(self.heap.head(cell));
                pending.push(self.heap.tail(cell));
            }
        }
    }

    /// The defun walk: any reference whose binding now holds a user function
    /// is retagged so the body dispatches straight into the function.
    fn vars_to_user(&mut self, root: CellRef) {
        let mut pending = vec![root];
        while let Some(cell) = pending.pop() {
            if cell.is_nil() {
                continue;
            }
            match self.heap.tag(cell) {
                Tag::Var => {
                    if self.heap.tag(self.heap.head(cell)) == Tag::User {
                        self.heap.set_tag(cell, Tag::User);
                    }
                }
                Tag::List => {
                    pending.push(self.heap.head(cell));
                    pending.push(self.heap.tail(cell));
                }
                _ => {}
            }
        }
    }
}
