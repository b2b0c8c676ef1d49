use crate::{Token, Tokens};
use lunar_interface::{
    NodeArena, NodeId, Result, SymbolTable, Value,
    diagnostics::ErrorKind,
};

/// Recursive-descent reader.
///
/// Consumes preprocessed source text and materialises the S-expression tree
/// directly in the node arena, interning atoms into the symbol table. The
/// first element of a list occupies the head of a fresh cell; each sibling
/// hangs off the previous cell's tail.
pub struct Reader<'a, 'src> {
    arena: &'a mut NodeArena,
    symbols: &'a mut SymbolTable,
    tokens: Tokens<'src>,
}

impl<'a, 'src> Reader<'a, 'src> {
    /// Creates a reader over preprocessed source text.
    pub fn new(arena: &'a mut NodeArena, symbols: &'a mut SymbolTable, src: &'src str) -> Self {
        Self { arena, symbols, tokens: Tokens::new(src) }
    }

    /// Reads one top-level datum. Empty input reads as nil; a bare atom
    /// interns without allocating.
    pub fn read(&mut self) -> Result<Value> {
        match self.tokens.next_token() {
            Token::Eof => Ok(Value::Nil),
            Token::Open => self.read_list(),
            Token::Quote => Ok(Value::Sym(self.symbols.intern("'")?)),
            Token::Atom(text) => Ok(Value::Sym(self.symbols.intern(&text)?)),
            token @ Token::Close => {
                Err(ErrorKind::UnexpectedToken(token.text().into()).into())
            }
        }
    }

    /// Reads the elements of a list after its `(` has been consumed.
    fn read_list(&mut self) -> Result<Value> {
        let mut root: Option<NodeId> = None;
        let mut prev: Option<NodeId> = None;
        loop {
            let token = self.tokens.next_token();
            let head = match token {
                Token::Close => return Ok(root.map(Value::Node).unwrap_or(Value::Nil)),
                Token::Eof => {
                    return Err(ErrorKind::UnexpectedToken(token.text().into()).into());
                }
                Token::Open => None,
                Token::Quote => Some(self.symbols.intern("'")?),
                Token::Atom(ref text) => Some(self.symbols.intern(text)?),
            };

            let cell = self.alloc()?;
            match prev {
                None => root = Some(cell),
                Some(p) => self.arena.set_tail(p, Value::Node(cell)),
            }
            prev = Some(cell);

            let head = match head {
                Some(sym) => Value::Sym(sym),
                // Nested list: recurse, then store the returned index.
                None => self.read_list()?,
            };
            self.arena.set_head(cell, head);
        }
    }

    /// Allocates a cell, converting the arena's low-water state into the
    /// `NeedGc` control signal. The cell just allocated is unrooted and is
    /// reclaimed by the collection that follows.
    fn alloc(&mut self) -> Result<NodeId> {
        let id = self.arena.alloc()?;
        if self.arena.needs_gc() {
            return Err(ErrorKind::NeedGc.into());
        }
        Ok(id)
    }
}
