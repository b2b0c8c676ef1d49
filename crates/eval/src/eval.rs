use crate::Builtin;
use lunar_interface::{
    NodeArena, NodeId, Result, SymbolId, SymbolTable, Value,
    diagnostics::ErrorKind,
    num, render,
};
use smallvec::SmallVec;

/// A saved or pending symbol binding during a user-function call.
type BindingStack = SmallVec<[(SymbolId, Value); 8]>;

/// The tree-walking evaluator.
///
/// Walks a parse tree in the arena, dispatching applications on the operator
/// symbol. User-defined functions are implemented by dynamic save/restore of
/// the global binding slots, not lexical environments: free variables
/// resolve against the slot's contents at call time. This matters only for
/// programs returning closures, which this dialect does not support.
pub struct Evaluator<'a> {
    arena: &'a mut NodeArena,
    symbols: &'a mut SymbolTable,
    max_params: usize,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over the shared arena and symbol table.
    pub fn new(arena: &'a mut NodeArena, symbols: &'a mut SymbolTable, max_params: usize) -> Self {
        Self { arena, symbols, max_params }
    }

    /// Evaluates an expression.
    ///
    /// On error, the rendering of `expr` is appended to the error's eval
    /// stack, so the trace grows one frame per unwound call.
    pub fn eval(&mut self, expr: Value) -> Result<Value> {
        self.eval_inner(expr).map_err(|e| {
            if e.is_need_gc() {
                e
            } else {
                e.with_frame(render(self.arena, self.symbols, expr))
            }
        })
    }

    fn eval_inner(&mut self, expr: Value) -> Result<Value> {
        match expr {
            Value::Nil => Ok(Value::Nil),
            // Numbers evaluate to themselves; other symbols auto-dereference
            // to their binding.
            Value::Sym(s) => {
                if num::is_number(self.symbols.text(s)) {
                    Ok(expr)
                } else {
                    Ok(self.symbols.binding(s))
                }
            }
            Value::Node(form) => self.apply(form),
        }
    }

    fn apply(&mut self, form: NodeId) -> Result<Value> {
        let Some(op) = self.arena.head(form).as_sym() else {
            let rendered = render(self.arena, self.symbols, self.arena.head(form));
            return Err(ErrorKind::UnknownIdentifier(rendered).into());
        };
        let builtin = Builtin::from_name(self.symbols.text(op));
        if let Some(builtin) = builtin {
            return self.builtin(builtin, form);
        }
        if !self.symbols.binding(op).is_nil() {
            return self.call(op, form);
        }
        Err(ErrorKind::UnknownIdentifier(self.symbols.text(op).to_string()).into())
    }

    fn builtin(&mut self, builtin: Builtin, form: NodeId) -> Result<Value> {
        use Builtin::*;
        match builtin {
            Add | Sub | Mul | Div => self.arith(builtin, form),
            // Reserved but unimplemented.
            Rem => Err(ErrorKind::UnknownIdentifier("%".into()).into()),
            Lt | Gt => self.compare(builtin, form),
            NumEq => self.numeric_eq(form),
            Eq => self.identity_eq(form),
            Equal => self.structural_eq(form),
            IsNumber => {
                let [arg] = self.args::<1>(form)?;
                let value = self.eval(arg)?;
                let numeric = matches!(value, Value::Sym(s) if num::is_number(self.symbols.text(s)));
                self.bool_sym(numeric)
            }
            IsSymbol => self.is_symbol(form),
            IsNull => self.is_null(form),
            Cons => self.cons(form),
            Car | Cdr => self.car_cdr(builtin, form),
            Quote => {
                let [arg] = self.args::<1>(form)?;
                Ok(arg)
            }
            Cond => self.cond(form),
            Define => self.define(form),
            Print | Display => {
                let [arg] = self.args::<1>(form)?;
                self.eval(arg)
            }
        }
    }

    /// Extracts exactly `N` argument expressions from the form's argv list,
    /// verifying the count.
    fn args<const N: usize>(&self, form: NodeId) -> Result<[Value; N]> {
        let mut out = [Value::Nil; N];
        let mut list = self.argv(form);
        let mut actual = 0;
        while let Value::Node(cell) = list {
            if actual < N {
                out[actual] = self.arena.head(cell);
            }
            actual += 1;
            list = self.arena.tail(cell);
        }
        if actual != N {
            return Err(ErrorKind::ArityMismatch { expected: N, actual }.into());
        }
        Ok(out)
    }

    /// The argument list of an application form.
    fn argv(&self, form: NodeId) -> Value {
        self.arena.tail(form)
    }

    fn list_len(&self, mut list: Value) -> usize {
        let mut n = 0;
        while let Value::Node(cell) = list {
            n += 1;
            list = self.arena.tail(cell);
        }
        n
    }

    fn bool_sym(&mut self, value: bool) -> Result<Value> {
        Ok(Value::Sym(self.symbols.intern(if value { "#t" } else { "#f" })?))
    }

    /// Reads a strictly numeric operand; anything else is `NotNumber`.
    fn number_of(&self, value: Value) -> Result<f64> {
        if let Value::Sym(s) = value {
            if let Some(n) = num::parse(self.symbols.text(s)) {
                return Ok(n);
            }
        }
        Err(ErrorKind::NotNumber(render(self.arena, self.symbols, value)).into())
    }

    /// Coerces an operand's value-text for arithmetic: non-numeric symbol
    /// text goes through as 0, like `strtod` on garbage.
    fn coerce_number(&self, value: Value) -> Result<f64> {
        match value {
            Value::Sym(s) => {
                let text = self.symbols.text(s);
                Ok(num::parse(text).unwrap_or_else(|| {
                    debug!(%text, "not a pure number, coercing to 0");
                    0.0
                }))
            }
            _ => Err(ErrorKind::NotNumber(render(self.arena, self.symbols, value)).into()),
        }
    }

    fn arith(&mut self, op: Builtin, form: NodeId) -> Result<Value> {
        let [a, b] = self.args::<2>(form)?;
        let a = self.eval(a)?;
        let x = self.coerce_number(a)?;
        let b = self.eval(b)?;
        let y = self.coerce_number(b)?;
        let result = match op {
            Builtin::Add => x + y,
            Builtin::Sub => x - y,
            Builtin::Mul => x * y,
            Builtin::Div => x / y,
            _ => unreachable!("non-arithmetic operator {op:?}"),
        };
        let text = num::format(result);
        Ok(Value::Sym(self.symbols.intern(&text)?))
    }

    fn compare(&mut self, op: Builtin, form: NodeId) -> Result<Value> {
        let [a, b] = self.args::<2>(form)?;
        let a = self.eval(a)?;
        let x = self.number_of(a)?;
        let b = self.eval(b)?;
        let y = self.number_of(b)?;
        let result = match op {
            Builtin::Lt => x < y,
            Builtin::Gt => x > y,
            _ => unreachable!("non-comparison operator {op:?}"),
        };
        self.bool_sym(result)
    }

    /// `=`: numeric equality by symbol-tag identity. Canonicalisation
    /// guarantees equal numbers intern into the same slot.
    fn numeric_eq(&mut self, form: NodeId) -> Result<Value> {
        let [a, b] = self.args::<2>(form)?;
        let a = self.eval(a)?;
        self.number_of(a)?;
        let b = self.eval(b)?;
        self.number_of(b)?;
        self.bool_sym(a == b)
    }

    /// `eq?`: identity on tagged values after one level of binding
    /// dereference on each operand, without evaluation.
    fn identity_eq(&mut self, form: NodeId) -> Result<Value> {
        let [a, b] = self.args::<2>(form)?;
        let a = self.deref_once(a);
        let b = self.deref_once(b);
        self.bool_sym(a == b)
    }

    fn deref_once(&self, value: Value) -> Value {
        match value {
            Value::Sym(s) if !self.symbols.binding(s).is_nil() => self.symbols.binding(s),
            _ => value,
        }
    }

    fn structural_eq(&mut self, form: NodeId) -> Result<Value> {
        let [a, b] = self.args::<2>(form)?;
        let a = self.eval(a)?;
        let b = self.eval(b)?;
        let equal = self.values_equal(a, b);
        self.bool_sym(equal)
    }

    fn values_equal(&self, a: Value, b: Value) -> bool {
        match (a, b) {
            (Value::Nil, Value::Nil) => true,
            (Value::Sym(x), Value::Sym(y)) => x == y,
            (Value::Node(x), Value::Node(y)) => {
                self.values_equal(self.arena.head(x), self.arena.head(y))
                    && self.values_equal(self.arena.tail(x), self.arena.tail(y))
            }
            _ => false,
        }
    }

    /// `symbol?`: true iff the unevaluated argument is a symbol with a
    /// non-nil binding, or a pair whose evaluation is non-nil. Inherited
    /// behavior: a defined name and a non-nil-evaluating expression are not
    /// distinguished.
    fn is_symbol(&mut self, form: NodeId) -> Result<Value> {
        let [arg] = self.args::<1>(form)?;
        let result = match arg {
            Value::Sym(s) => !self.symbols.binding(s).is_nil(),
            Value::Node(_) => !self.eval(arg)?.is_nil(),
            Value::Nil => false,
        };
        self.bool_sym(result)
    }

    /// `null?`: true iff the argv is empty or the evaluated argument is nil.
    fn is_null(&mut self, form: NodeId) -> Result<Value> {
        let result = match self.argv(form) {
            Value::Nil => true,
            Value::Node(cell) => {
                let arg = self.arena.head(cell);
                self.eval(arg)?.is_nil()
            }
            Value::Sym(_) => false,
        };
        self.bool_sym(result)
    }

    fn cons(&mut self, form: NodeId) -> Result<Value> {
        let [a, b] = self.args::<2>(form)?;
        let cell = self.alloc()?;
        let head = self.eval(a)?;
        self.arena.set_head(cell, head);
        let tail = self.eval(b)?;
        self.arena.set_tail(cell, tail);
        Ok(Value::Node(cell))
    }

    fn car_cdr(&mut self, op: Builtin, form: NodeId) -> Result<Value> {
        let [arg] = self.args::<1>(form)?;
        let value = self.eval(arg)?;
        let Value::Node(cell) = value else {
            return Err(
                ErrorKind::NotPair(render(self.arena, self.symbols, value)).into()
            );
        };
        Ok(match op {
            Builtin::Car => self.arena.head(cell),
            _ => self.arena.tail(cell),
        })
    }

    /// `cond`: walk the clause list evaluating each test; a result printing
    /// as `#t` selects the clause, and a test that is the literal symbol
    /// `else` matches unconditionally.
    fn cond(&mut self, form: NodeId) -> Result<Value> {
        let mut clauses = self.argv(form);
        while let Value::Node(cell) = clauses {
            let clause = self.arena.head(cell);
            let Value::Node(clause) = clause else {
                let rendered = render(self.arena, self.symbols, clause);
                return Err(ErrorKind::NotPair(rendered).into());
            };
            let test = self.arena.head(clause);
            let body = match self.arena.tail(clause) {
                Value::Node(rest) => self.arena.head(rest),
                _ => Value::Nil,
            };
            let matched = if self.symbol_text_is(test, "else") {
                true
            } else {
                let value = self.eval(test)?;
                self.symbol_text_is(value, "#t")
            };
            if matched {
                return self.eval(body);
            }
            clauses = self.arena.tail(cell);
        }
        Err(ErrorKind::NoMatchingClause.into())
    }

    fn symbol_text_is(&self, value: Value, text: &str) -> bool {
        value.as_sym().is_some_and(|s| self.symbols.text(s) == text)
    }

    /// `define`: a `(lambda …)` second argument is recorded by its pair
    /// index; a symbol binds directly; any other pair is evaluated first.
    /// Returns the entire form.
    fn define(&mut self, form: NodeId) -> Result<Value> {
        let [target, value] = self.args::<2>(form)?;
        let Value::Sym(name) = target else {
            let rendered = render(self.arena, self.symbols, target);
            return Err(ErrorKind::UnexpectedToken(rendered).into());
        };
        let binding = match value {
            Value::Node(cell) if self.is_lambda(cell) => value,
            Value::Node(_) => self.eval(value)?,
            Value::Sym(_) | Value::Nil => value,
        };
        self.symbols.set_binding(name, binding);
        trace!(name = %self.symbols.text(name), "defined");
        Ok(Value::Node(form))
    }

    fn is_lambda(&self, cell: NodeId) -> bool {
        self.symbol_text_is(self.arena.head(cell), "lambda")
    }

    /// Applies a user-defined function.
    ///
    /// Two-phase discipline: every actual is evaluated against the caller's
    /// bindings before any formal's slot is overwritten, then the new
    /// bindings are installed, the body runs, and the saved bindings are
    /// restored in reverse.
    fn call(&mut self, op: SymbolId, form: NodeId) -> Result<Value> {
        let unknown =
            |symbols: &SymbolTable| ErrorKind::UnknownIdentifier(symbols.text(op).to_string());

        let Value::Node(lambda) = self.symbols.binding(op) else {
            return Err(unknown(self.symbols).into());
        };
        if !self.is_lambda(lambda) {
            return Err(unknown(self.symbols).into());
        }
        let Value::Node(rest) = self.arena.tail(lambda) else {
            return Err(unknown(self.symbols).into());
        };
        let params = self.arena.head(rest);
        let body = match self.arena.tail(rest) {
            Value::Node(cell) => self.arena.head(cell),
            _ => Value::Nil,
        };

        let expected = self.list_len(params);
        let actual = self.list_len(self.argv(form));
        if expected != actual {
            return Err(ErrorKind::ArityMismatch { expected, actual }.into());
        }

        let mut saved = BindingStack::new();
        let mut pending = BindingStack::new();
        let mut param = params;
        let mut arg = self.argv(form);
        while let (Value::Node(p), Value::Node(a)) = (param, arg) {
            let Value::Sym(formal) = self.arena.head(p) else {
                let rendered = render(self.arena, self.symbols, self.arena.head(p));
                return Err(ErrorKind::UnexpectedToken(rendered).into());
            };
            if saved.len() >= self.max_params {
                return Err(ErrorKind::StackOverflow(self.max_params).into());
            }
            saved.push((formal, self.symbols.binding(formal)));
            let value = self.eval(self.arena.head(a))?;
            pending.push((formal, value));
            param = self.arena.tail(p);
            arg = self.arena.tail(a);
        }

        for &(formal, value) in &pending {
            self.symbols.set_binding(formal, value);
        }
        let result = self.eval(body);
        for &(formal, value) in saved.iter().rev() {
            self.symbols.set_binding(formal, value);
        }
        result
    }

    /// Allocates a cell during evaluation, converting the arena's low-water
    /// state into the `NeedGc` signal; the top-level driver retries the
    /// whole command after collecting.
    fn alloc(&mut self) -> Result<NodeId> {
        let id = self.arena.alloc()?;
        if self.arena.needs_gc() {
            return Err(ErrorKind::NeedGc.into());
        }
        Ok(id)
    }
}
