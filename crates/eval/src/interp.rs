use crate::{Evaluator, dump};
use lunar_interface::{
    GcStats, NodeArena, NodeId, Result, Session, SymbolTable, Value,
    diagnostics::ErrorKind,
    render,
};
use lunar_parse::{Reader, preprocess};
use std::io::{self, Write};

/// The top-level interpreter: owns the session, the node arena, and the
/// symbol table, and runs complete commands through preprocess, read, and
/// eval.
///
/// The parse tree under construction is deliberately not a GC root, so
/// collection happens only at command boundaries: a command that trips the
/// arena's low-water mark is discarded, a collection rooted at the symbol
/// bindings runs, and the whole command is retried once from its source
/// text. A second trip is [`ErrorKind::ArenaExhausted`].
pub struct Interp {
    session: Session,
    arena: NodeArena,
    symbols: SymbolTable,
}

impl Interp {
    /// Creates an interpreter with the session's configured limits.
    pub fn new(session: Session) -> Self {
        let arena = NodeArena::new(session.opts.arena_cells);
        let symbols = SymbolTable::new(session.opts.symbol_slots, session.opts.max_symbol_len);
        Self { session, arena, symbols }
    }

    /// The interpreter session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The node arena.
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// The symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Executes one complete top-level command and returns its value.
    pub fn execute(&mut self, command: &str) -> Result<Value> {
        match self.execute_once(command) {
            Err(e) if e.is_need_gc() => {
                self.collect()?;
                match self.execute_once(command) {
                    Err(e) if e.is_need_gc() => {
                        Err(ErrorKind::ArenaExhausted(self.arena.capacity()).into())
                    }
                    result => result,
                }
            }
            result => result,
        }
    }

    fn execute_once(&mut self, command: &str) -> Result<Value> {
        let source = preprocess(command);
        let tree = Reader::new(&mut self.arena, &mut self.symbols, &source).read()?;
        let max_params = self.session.opts.max_params;
        Evaluator::new(&mut self.arena, &mut self.symbols, max_params).eval(tree)
    }

    /// Collects garbage, rooted at the deduplicated non-nil symbol bindings.
    pub fn collect(&mut self) -> Result<GcStats> {
        let mut roots: Vec<NodeId> =
            self.symbols.bindings().filter_map(Value::as_node).collect();
        roots.sort_unstable();
        roots.dedup();
        debug!(roots = roots.len(), "collecting");
        self.arena.collect(&roots)
    }

    /// Renders a value against this interpreter's arena and symbol table.
    pub fn render(&self, value: Value) -> String {
        render(&self.arena, &self.symbols, value)
    }

    /// Writes the state tables selected by the session's dump option.
    pub fn dump_to(&self, out: &mut impl Write) -> io::Result<()> {
        let Some(selection) = self.session.opts.dump else { return Ok(()) };
        if selection.arena() {
            dump::dump_arena(&self.arena, out)?;
        }
        if selection.symbols() {
            dump::dump_symbols(&self.symbols, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lunar_interface::config::Opts;

    fn interp_with_cells(cells: usize) -> Interp {
        let opts = Opts { arena_cells: cells, ..Default::default() };
        Interp::new(Session::builder().opts(opts).without_color().build())
    }

    fn interp() -> Interp {
        interp_with_cells(Opts::DEFAULT_ARENA_CELLS)
    }

    #[test]
    fn executes_commands() {
        let mut i = interp();
        let v = i.execute("(+ 1 2)").unwrap();
        assert_eq!(i.render(v), "3");
        i.execute("(define (square x) (* x x))").unwrap();
        let v = i.execute("(square 5)").unwrap();
        assert_eq!(i.render(v), "25");
    }

    #[test]
    fn commands_retry_after_collection() {
        // Small arena: each command's discarded parse trees pile up until a
        // command trips the low-water mark mid-parse and succeeds on retry.
        let mut i = interp_with_cells(32);
        for n in 0..8 {
            let v = i.execute("(cons 1 (cons 2 ()))").unwrap();
            assert_eq!(i.render(v), "(1 2)", "iteration {n}");
        }
    }

    #[test]
    fn oversized_command_exhausts_arena() {
        let mut i = interp_with_cells(8);
        let err = i.execute("(cons 1 (cons 2 (cons 3 (cons 4 (cons 5 ())))))").unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ArenaExhausted(8));
    }

    #[test]
    fn defined_bindings_survive_collection() {
        let mut i = interp_with_cells(64);
        i.execute("(define l '(a b c))").unwrap();
        i.collect().unwrap();
        let v = i.execute("l").unwrap();
        assert_eq!(i.render(v), "(a b c)");
        let v = i.execute("(car l)").unwrap();
        assert_eq!(i.render(v), "a");
    }

    #[test]
    fn quiescent_partition_invariant() {
        let mut i = interp_with_cells(128);
        i.execute("(define l '(a b))").unwrap();
        i.execute("(define (f x) (cons x l))").unwrap();
        i.execute("(f 1)").unwrap();
        i.collect().unwrap();

        // Between commands, free cells and binding-reachable cells are
        // disjoint and cover everything.
        let arena = i.arena();
        let mut free = vec![false; arena.capacity()];
        let mut next = arena.free_root();
        while let Some(id) = next {
            free[id.index()] = true;
            next = arena.tail(id).as_node();
        }
        let mut reachable = vec![false; arena.capacity()];
        let mut stack: Vec<NodeId> =
            i.symbols().bindings().filter_map(Value::as_node).collect();
        while let Some(id) = stack.pop() {
            if reachable[id.index()] {
                continue;
            }
            reachable[id.index()] = true;
            for v in [arena.head(id), arena.tail(id)] {
                if let Value::Node(n) = v {
                    stack.push(n);
                }
            }
        }
        for idx in 1..arena.capacity() {
            assert!(
                free[idx] ^ reachable[idx],
                "cell {idx} must be on the free list or reachable, not both"
            );
        }
    }

    #[test]
    fn gc_preserves_bound_structure() {
        let mut i = interp_with_cells(256);
        i.execute("(define l '(1 (2 3) 4))").unwrap();
        let before = i.execute("l").unwrap();
        let before_render = i.render(before);
        i.collect().unwrap();
        let after = i.execute("l").unwrap();
        assert_eq!(before, after, "binding still points at the same cells");
        assert_eq!(i.render(after), before_render);
    }
}
