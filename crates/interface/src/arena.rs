use crate::{
    NodeId, Result, Value,
    diagnostics::ErrorKind,
};

/// A cons cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    head: Value,
    tail: Value,
}

impl Cell {
    /// The cell's head.
    pub fn head(&self) -> Value {
        self.head
    }

    /// The cell's tail.
    pub fn tail(&self) -> Value {
        self.tail
    }
}

/// Statistics of a completed collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GcStats {
    /// Cells reachable from the roots.
    pub live: usize,
    /// Cells returned to the free list.
    pub freed: usize,
}

/// Fixed-capacity arena of cons cells managed as a free list with a
/// mark-sweep collector.
///
/// Cell 0 is a reserved sentinel and is never allocated. Unused cells form a
/// singly-linked list threaded through their `tail` fields: `Value::Node` is
/// the next free cell and `Value::Nil` terminates the chain. Every cell is
/// either on the free list or reachable from a live root, never both.
pub struct NodeArena {
    cells: Box<[Cell]>,
    free_root: Option<NodeId>,
    free_len: usize,
    live: usize,
}

impl NodeArena {
    /// Creates an arena with `capacity` cells, all free.
    ///
    /// # Panics
    ///
    /// Panics if `capacity < 2` (the sentinel plus at least one usable cell).
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 2, "arena needs the sentinel plus at least one cell");
        let mut arena = Self {
            cells: vec![Cell::default(); capacity].into_boxed_slice(),
            free_root: None,
            free_len: 0,
            live: 0,
        };
        arena.reset();
        arena
    }

    /// The total number of cells, including the sentinel.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// The number of cells on the free list.
    pub fn free_len(&self) -> usize {
        self.free_len
    }

    /// The number of allocated cells.
    pub fn live(&self) -> usize {
        self.live
    }

    /// The current free list root, if any cell is free.
    pub fn free_root(&self) -> Option<NodeId> {
        self.free_root
    }

    /// Returns `true` when the free list is nearly empty and the caller
    /// should collect before continuing. Converted into the `NeedGc` control
    /// signal at the reader/evaluator allocation sites.
    pub fn needs_gc(&self) -> bool {
        self.free_len <= 1
    }

    /// Unlinks and returns the head of the free list, initialised to
    /// `(nil, nil)`.
    ///
    /// Fails with [`ErrorKind::ArenaExhausted`] when no cell is free.
    pub fn alloc(&mut self) -> Result<NodeId> {
        let Some(id) = self.free_root else {
            return Err(ErrorKind::ArenaExhausted(self.capacity()).into());
        };
        self.free_root = self.cells[id.index()].tail.as_node();
        self.cells[id.index()] = Cell::default();
        self.free_len -= 1;
        self.live += 1;
        Ok(id)
    }

    /// The head of cell `id`.
    #[inline]
    pub fn head(&self, id: NodeId) -> Value {
        self.cells[id.index()].head
    }

    /// The tail of cell `id`.
    #[inline]
    pub fn tail(&self, id: NodeId) -> Value {
        self.cells[id.index()].tail
    }

    /// Overwrites the head of cell `id`.
    #[inline]
    pub fn set_head(&mut self, id: NodeId, value: Value) {
        self.cells[id.index()].head = value;
    }

    /// Overwrites the tail of cell `id`.
    #[inline]
    pub fn set_tail(&mut self, id: NodeId, value: Value) {
        self.cells[id.index()].tail = value;
    }

    /// Returns every cell to the free list, chained in ascending order.
    pub fn reset(&mut self) {
        let n = self.cells.len();
        self.cells[0] = Cell::default();
        for i in 1..n {
            self.cells[i] = Cell {
                head: Value::Nil,
                tail: if i + 1 < n { Value::Node(NodeId::new((i + 1) as u32)) } else { Value::Nil },
            };
        }
        self.free_root = Some(NodeId::new(1));
        self.free_len = n - 1;
        self.live = 0;
    }

    /// Mark-sweep collection.
    ///
    /// Marks every cell reachable from `roots` by following pair-valued head
    /// and tail edges (symbols and nil carry no references), then rebuilds
    /// the free list from the unmarked cells in ascending index order, the
    /// lowest becoming the new free root.
    ///
    /// Fails with [`ErrorKind::ArenaExhausted`] if no cell is free after the
    /// sweep.
    pub fn collect(&mut self, roots: &[NodeId]) -> Result<GcStats> {
        let n = self.cells.len();
        let mut marked = vec![false; n];
        let mut worklist: Vec<NodeId> = roots.to_vec();
        while let Some(id) = worklist.pop() {
            let i = id.index();
            if marked[i] {
                continue;
            }
            marked[i] = true;
            let cell = self.cells[i];
            if let Value::Node(h) = cell.head {
                worklist.push(h);
            }
            if let Value::Node(t) = cell.tail {
                worklist.push(t);
            }
        }

        // Sweep in ascending order so allocation stays deterministic and the
        // diagnostic dump stable.
        let mut first_free = None;
        let mut prev: Option<NodeId> = None;
        let mut freed = 0usize;
        for i in 1..n {
            if marked[i] {
                continue;
            }
            let id = NodeId::new(i as u32);
            self.cells[i] = Cell::default();
            match prev {
                None => first_free = Some(id),
                Some(p) => self.cells[p.index()].tail = Value::Node(id),
            }
            prev = Some(id);
            freed += 1;
        }

        if first_free.is_none() {
            return Err(ErrorKind::ArenaExhausted(n).into());
        }
        self.free_root = first_free;
        self.free_len = freed;
        self.live = n - 1 - freed;
        let stats = GcStats { live: self.live, freed };
        debug!(live = stats.live, freed = stats.freed, "collected");
        Ok(stats)
    }

    /// All cells except the sentinel, with their indices, in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = (NodeId, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| (NodeId::new(i as u32), c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: u32) -> Value {
        Value::Node(NodeId::new(i))
    }

    #[test]
    fn reset_chains_ascending() {
        let arena = NodeArena::new(5);
        assert_eq!(arena.free_root(), Some(NodeId::new(1)));
        assert_eq!(arena.free_len(), 4);
        assert_eq!(arena.tail(NodeId::new(1)), node(2));
        assert_eq!(arena.tail(NodeId::new(2)), node(3));
        assert_eq!(arena.tail(NodeId::new(3)), node(4));
        assert_eq!(arena.tail(NodeId::new(4)), Value::Nil);
    }

    #[test]
    fn alloc_is_deterministic() {
        let mut arena = NodeArena::new(8);
        for expected in 1..8u32 {
            assert_eq!(arena.alloc().unwrap(), NodeId::new(expected));
        }
        assert!(arena.alloc().is_err(), "exhausted");
    }

    #[test]
    fn needs_gc_low_water() {
        let mut arena = NodeArena::new(4);
        assert!(!arena.needs_gc());
        arena.alloc().unwrap();
        assert!(!arena.needs_gc());
        arena.alloc().unwrap();
        assert!(arena.needs_gc(), "one free cell left");
    }

    #[test]
    fn collect_preserves_reachable() {
        let mut arena = NodeArena::new(16);
        // (1 2) as head-spine: a -> b.
        let a = arena.alloc().unwrap();
        let b = arena.alloc().unwrap();
        let junk = arena.alloc().unwrap();
        arena.set_head(a, Value::Nil);
        arena.set_tail(a, Value::Node(b));
        arena.set_head(b, Value::Nil);
        arena.set_head(junk, Value::Node(a));

        let stats = arena.collect(&[a]).unwrap();
        assert_eq!(stats.live, 2);
        assert_eq!(stats.freed, 13);
        assert_eq!(arena.tail(a), Value::Node(b));
        // The junk cell was unrooted and becomes the new free root: it is the
        // lowest unmarked index.
        assert_eq!(arena.free_root(), Some(junk));
    }

    #[test]
    fn collect_rebuilds_free_list_ascending() {
        let mut arena = NodeArena::new(8);
        let kept: Vec<_> = (0..4).map(|_| arena.alloc().unwrap()).collect();
        // Keep cells 2 and 4 only.
        let roots = [kept[1], kept[3]];
        arena.collect(&roots).unwrap();
        assert_eq!(arena.free_root(), Some(NodeId::new(1)));
        assert_eq!(arena.tail(NodeId::new(1)), node(3));
        assert_eq!(arena.tail(NodeId::new(3)), node(5));
        assert_eq!(arena.tail(NodeId::new(5)), node(6));
        assert_eq!(arena.tail(NodeId::new(6)), node(7));
        assert_eq!(arena.tail(NodeId::new(7)), Value::Nil);
        // Allocation resumes at the lowest freed index.
        assert_eq!(arena.alloc().unwrap(), NodeId::new(1));
    }

    #[test]
    fn collect_survives_cycles() {
        let mut arena = NodeArena::new(8);
        let a = arena.alloc().unwrap();
        let b = arena.alloc().unwrap();
        arena.set_tail(a, Value::Node(b));
        arena.set_tail(b, Value::Node(a));
        let stats = arena.collect(&[a]).unwrap();
        assert_eq!(stats.live, 2);
    }

    #[test]
    fn collect_with_no_garbage_is_exhausted() {
        let mut arena = NodeArena::new(3);
        let a = arena.alloc().unwrap();
        let b = arena.alloc().unwrap();
        arena.set_tail(a, Value::Node(b));
        assert!(arena.collect(&[a]).is_err());
    }

    #[test]
    fn fill_collect_fill() {
        // A 31-cell arena holds 30 usable cells: fill it, drop every
        // reference, collect, and fill it again.
        let mut arena = NodeArena::new(31);
        for _ in 0..30 {
            arena.alloc().unwrap();
        }
        assert!(arena.alloc().is_err());
        arena.collect(&[]).unwrap();
        assert_eq!(arena.free_len(), 30);
        for expected in 1..=30u32 {
            assert_eq!(arena.alloc().unwrap(), NodeId::new(expected));
        }
    }

    #[test]
    fn partition_invariant() {
        let mut arena = NodeArena::new(16);
        let a = arena.alloc().unwrap();
        let b = arena.alloc().unwrap();
        arena.set_tail(a, Value::Node(b));
        arena.collect(&[a]).unwrap();

        // Free cells and root-reachable cells are disjoint and cover all
        // non-sentinel cells.
        let mut free = vec![false; arena.capacity()];
        let mut next = arena.free_root();
        while let Some(id) = next {
            assert!(!free[id.index()], "free list has no duplicates");
            free[id.index()] = true;
            next = arena.tail(id).as_node();
        }
        let mut reachable = vec![false; arena.capacity()];
        let mut stack = vec![a];
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
        for i in 1..arena.capacity() {
            assert!(free[i] ^ reachable[i], "cell {i} must be in exactly one set");
        }
    }
}
