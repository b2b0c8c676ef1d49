use crate::{
    Result, SymbolId, Value,
    diagnostics::ErrorKind,
};

/// A symbol table slot: the interned text and its binding.
///
/// An empty `text` marks a vacant slot. A [`Value::Nil`] binding means the
/// symbol has no user definition; GC roots are derived from non-nil bindings
/// only.
#[derive(Clone, Debug, Default)]
pub struct Slot {
    text: String,
    binding: Value,
}

impl Slot {
    /// The interned symbol text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The symbol's binding.
    pub fn binding(&self) -> Value {
        self.binding
    }

    fn is_vacant(&self) -> bool {
        self.text.is_empty()
    }
}

/// Fixed-capacity closed-addressed symbol table with linear probing.
///
/// Symbols are interned at most once: interning the same (possibly
/// truncated) text twice yields the same slot and leaves the binding
/// untouched. Slots are never removed.
pub struct SymbolTable {
    slots: Box<[Slot]>,
    max_symbol_len: usize,
    occupied: usize,
}

impl SymbolTable {
    /// Creates an empty table with `slots` slots and the given symbol length
    /// limit. `slots` should be prime so probing cycles the whole table.
    pub fn new(slots: usize, max_symbol_len: usize) -> Self {
        assert!(slots > 0, "symbol table must have at least one slot");
        assert!(max_symbol_len > 0, "symbol length limit must be positive");
        Self {
            slots: vec![Slot::default(); slots].into_boxed_slice(),
            max_symbol_len,
            occupied: 0,
        }
    }

    /// The total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The number of occupied slots.
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns `true` if no symbol has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Truncates `text` to the symbol length limit. The truncated form is the
    /// symbol's identity.
    pub fn truncated<'t>(&self, text: &'t str) -> &'t str {
        if text.len() <= self.max_symbol_len {
            return text;
        }
        let mut end = self.max_symbol_len;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }

    /// Byte-pair fold hash: the truncated text taken as little-endian 16-bit
    /// pairs, an odd trailing byte added alone, summed and reduced modulo the
    /// table size.
    ///
    /// Bit-exact portability matters: slot assignments are part of the test
    /// vectors.
    pub fn hash(&self, text: &str) -> usize {
        let bytes = self.truncated(text).as_bytes();
        let mut sum = 0u32;
        let mut chunks = bytes.chunks_exact(2);
        for pair in &mut chunks {
            sum += pair[0] as u32 + ((pair[1] as u32) << 8);
        }
        if let [last] = *chunks.remainder() {
            sum += last as u32;
        }
        sum as usize % self.slots.len()
    }

    /// Interns `text`, truncating it to the length limit first.
    ///
    /// Probes linearly from the hash slot; the first vacant or matching slot
    /// wins. Fails with [`ErrorKind::TableFull`] once every slot holds a
    /// different symbol.
    pub fn intern(&mut self, text: &str) -> Result<SymbolId> {
        let text = self.truncated(text);
        let start = self.hash(text);
        let n = self.slots.len();
        for probe in 0..n {
            let i = (start + probe) % n;
            let slot = &mut self.slots[i];
            if slot.is_vacant() {
                slot.text.push_str(text);
                self.occupied += 1;
                trace!(symbol = %text, slot = i, "interned");
                return Ok(SymbolId::new(i as u32));
            }
            if slot.text == text {
                return Ok(SymbolId::new(i as u32));
            }
        }
        Err(ErrorKind::TableFull(n).into())
    }

    /// Looks `text` up without interning it.
    ///
    /// Probes like [`intern`](Self::intern) but stops at the first vacant
    /// slot.
    pub fn lookup(&self, text: &str) -> Option<SymbolId> {
        let text = self.truncated(text);
        let start = self.hash(text);
        let n = self.slots.len();
        for probe in 0..n {
            let i = (start + probe) % n;
            let slot = &self.slots[i];
            if slot.is_vacant() {
                return None;
            }
            if slot.text == text {
                return Some(SymbolId::new(i as u32));
            }
        }
        None
    }

    /// The interned text of `id`.
    pub fn text(&self, id: SymbolId) -> &str {
        &self.slots[id.index()].text
    }

    /// The binding of `id`.
    pub fn binding(&self, id: SymbolId) -> Value {
        self.slots[id.index()].binding
    }

    /// Overwrites the binding of `id`.
    pub fn set_binding(&mut self, id: SymbolId, value: Value) {
        self.slots[id.index()].binding = value;
    }

    /// All non-nil bindings, in slot order. The GC derives its roots from
    /// these.
    pub fn bindings(&self) -> impl Iterator<Item = Value> + '_ {
        self.slots.iter().map(|s| s.binding).filter(|b| !b.is_nil())
    }

    /// All occupied slots with their indices, in slot order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = (SymbolId, &Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_vacant())
            .map(|(i, s)| (SymbolId::new(i as u32), s))
    }

    /// Clears every slot and binding.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.text.clear();
            slot.binding = Value::Nil;
        }
        self.occupied = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    fn table() -> SymbolTable {
        SymbolTable::new(101, 10)
    }

    #[test]
    fn hash_vectors() {
        // Computed from the byte-pair fold: lo + (hi << 8) per pair, odd
        // trailing byte alone, mod 101.
        let t = table();
        for &(text, expected) in &[
            ("a", 97),
            ("ab", 36),
            ("abc", 34),
            ("+", 43),
            ("#t", 37),
            ("define", 23),
        ] {
            assert_eq!(t.hash(text), expected, "{text:?}");
        }
    }

    #[test]
    fn intern_idempotent() {
        let mut t = table();
        let a = t.intern("square").unwrap();
        t.set_binding(a, Value::Node(NodeId::new(7)));
        let b = t.intern("square").unwrap();
        assert_eq!(a, b);
        assert_eq!(t.binding(b), Value::Node(NodeId::new(7)));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn truncation_is_identity() {
        let mut t = table();
        let a = t.intern("abcdefghijk").unwrap();
        let b = t.intern("abcdefghijXYZ").unwrap();
        assert_eq!(a, b, "both truncate to the same 10 bytes");
        assert_eq!(t.text(a), "abcdefghij");
    }

    #[test]
    fn collisions_probe_linearly() {
        // 3 slots: everything collides quickly.
        let mut t = SymbolTable::new(3, 10);
        let a = t.intern("a").unwrap();
        let b = t.intern("b").unwrap();
        let c = t.intern("c").unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(t.text(a), "a");
        assert_eq!(t.text(b), "b");
        assert_eq!(t.text(c), "c");
        assert!(t.intern("d").is_err(), "table is full");
        // Existing symbols still intern fine.
        assert_eq!(t.intern("b").unwrap(), b);
    }

    #[test]
    fn lookup_does_not_insert() {
        let mut t = table();
        assert_eq!(t.lookup("car"), None);
        let id = t.intern("car").unwrap();
        assert_eq!(t.lookup("car"), Some(id));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn numeric_text_is_a_symbol() {
        let mut t = table();
        let five = t.intern("5").unwrap();
        assert_eq!(t.text(five), "5");
        assert_eq!(t.binding(five), Value::Nil);
    }
}
