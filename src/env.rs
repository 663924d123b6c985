// ABOUTME: Environment operations over the chain of binding cells

use crate::cell::{CellRef, NameId, Tag, NIL};
use crate::interp::Interp;

impl Interp {
    /// Declares a fresh binding for `name` at the front of the root
    /// environment and returns it. The binding starts as an unbound variable.
    pub fn declare(&mut self, name: &str) -> CellRef {
        let id = self.heap.intern(name);
        self.declare_id(id)
    }

    pub(crate) fn declare_id(&mut self, id: NameId) -> CellRef {
        let binding = self.heap.cons(NIL, NIL);
        self.heap.set_name(binding, id);
        self.heap.set_tag(binding, Tag::Var);
        self.env = self.heap.cons(binding, self.env);
        binding
    }

    /// Walks the chain head-first and returns the first binding carrying
    /// `id`, or the empty reference. Interning is deduplicated, so id
    /// equality is byte-exact name equality.
    pub(crate) fn lookup(&self, env: CellRef, id: NameId) -> CellRef {
        let mut entry = env;
        while !entry.is_nil() {
            let binding = self.heap.head(entry);
            if self.heap.name_of(binding) == Some(id) {
                return binding;
            }
            entry = self.heap.tail(entry);
        }
        NIL
    }

    /// Current value of the binding `reference` points at, resolved by name
    /// in `env` so call frames shadow the root chain.
    pub(crate) fn binding_value(&self, env: CellRef, reference: CellRef) -> CellRef {
        match self.heap.name_of(reference) {
            Some(id) => self.heap.tail(self.lookup(env, id)),
            None => NIL,
        }
    }

    /// Layers one binding per parameter in front of `env` and returns the new
    /// frame. Values are taken positionally from the `args` spine; a missing
    /// argument (or the empty spine a `prog` passes) binds the parameter to
    /// the empty reference.
    pub(crate) fn bind_params(
        &mut self,
        params: CellRef,
        args: CellRef,
        env: CellRef,
    ) -> CellRef {
        let mut bound = Vec::new();
        let mut param = params;
        let mut arg = args;
        while !param.is_nil() {
            let name = self.heap.name_of(self.heap.head(self.heap.head(param)));
            bound.push((name, self.heap.head(arg)));
            param = self.heap.tail(param);
            arg = self.heap.tail(arg);
        }

        let mut frame = env;
        for (name, value) in bound.into_iter().rev() {
            let binding = self.heap.cons(NIL, value);
            if let Some(id) = name {
                self.heap.set_name(binding, id);
            }
            self.heap.set_tag(binding, Tag::Var);
            frame = self.heap.cons(binding, frame);
        }
        frame
    }
}
