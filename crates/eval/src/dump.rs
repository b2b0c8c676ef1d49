//! Diagnostic state tables.
//!
//! Values print in the classic signed convention: `0` is nil, a positive
//! integer an arena cell, a negative integer a symbol slot.

use lunar_interface::{NodeArena, SymbolTable};
use std::io::{self, Write};

fn width_of(n: i64) -> usize {
    n.to_string().len()
}

/// Writes the `Index | Head | Tail` table of the arena's allocated-prefix
/// cells.
pub fn dump_arena(arena: &NodeArena, out: &mut impl Write) -> io::Result<()> {
    let rows: Vec<(i64, i64, i64)> = arena
        .cells()
        .take(arena.live())
        .map(|(id, cell)| (id.get() as i64, cell.head().tagged(), cell.tail().tagged()))
        .collect();

    let idx_w = rows.iter().map(|r| width_of(r.0)).max().unwrap_or(0).max("Index".len());
    let head_w = rows.iter().map(|r| width_of(r.1)).max().unwrap_or(0).max("Head".len());
    let tail_w = rows.iter().map(|r| width_of(r.2)).max().unwrap_or(0).max("Tail".len());

    writeln!(
        out,
        "Free list's root = {}",
        arena.free_root().map(|id| id.get() as i64).unwrap_or(0)
    )?;
    writeln!(out, "Node array:")?;
    writeln!(out, "{:>idx_w$} | {:>head_w$} | {:>tail_w$}", "Index", "Head", "Tail")?;
    writeln!(out, "{}", "-".repeat(idx_w + head_w + tail_w + 6))?;
    for (index, head, tail) in rows {
        writeln!(out, "{index:>idx_w$} | {head:>head_w$} | {tail:>tail_w$}")?;
    }
    writeln!(out)
}

/// Writes the `Index | Symbol | Link` table of the occupied symbol slots.
pub fn dump_symbols(symbols: &SymbolTable, out: &mut impl Write) -> io::Result<()> {
    let rows: Vec<(i64, &str, i64)> = symbols
        .occupied_slots()
        .map(|(id, slot)| (-(id.get() as i64), slot.text(), slot.binding().tagged()))
        .collect();

    let idx_w = rows.iter().map(|r| width_of(r.0)).max().unwrap_or(0).max("Index".len());
    let sym_w = rows.iter().map(|r| r.1.len()).max().unwrap_or(0).max("Symbol".len());
    let link_w = rows.iter().map(|r| width_of(r.2)).max().unwrap_or(0).max("Link".len());

    writeln!(out, "Hash table:")?;
    writeln!(out, "{:>idx_w$} | {:>sym_w$} | {:>link_w$}", "Index", "Symbol", "Link")?;
    writeln!(out, "{}", "-".repeat(idx_w + sym_w + link_w + 6))?;
    for (index, symbol, link) in rows {
        writeln!(out, "{index:>idx_w$} | {symbol:>sym_w$} | {link:>link_w$}")?;
    }
    writeln!(out)
}
