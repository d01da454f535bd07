//! Text map of one packed sheet.
//!
//! Each placement is filled with its own marker letter and listed in a legend
//! below the map. Offcut is shown as `.`.

use crate::types::{PlacedPiece, Rect, SheetLayout};
use std::fmt::Write;

const MAX_COLS: f64 = 80.0;
const MAX_ROWS: f64 = 40.0;
const OFFCUT: char = '.';

/// Header, scaled map and legend for `sheet`. The map fits in 80x40 cells
/// and row 0 is `y = 0`.
pub fn render_sheet(sheet: &SheetLayout) -> String {
    let scale = f64::min(MAX_COLS / sheet.width, MAX_ROWS / sheet.height);
    let cols = ((sheet.width * scale).round() as usize).max(1);
    let rows = ((sheet.height * scale).round() as usize).max(1);

    let mut grid = vec![vec![OFFCUT; cols]; rows];
    for (i, p) in sheet.placements.iter().enumerate() {
        let mark = marker(i);
        let (c0, c1) = cell_span(p.x, p.right(), scale, cols);
        let (r0, r1) = cell_span(p.y, p.top(), scale, rows);
        for row in &mut grid[r0..r1] {
            row[c0..c1].fill(mark);
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} sheet {}: {} piece{}, {:.1}% waste",
        sheet.material,
        Rect::new(sheet.width, sheet.height),
        sheet.piece_count,
        if sheet.piece_count == 1 { "" } else { "s" },
        sheet.waste_percentage,
    );
    for row in &grid {
        out.extend(row.iter());
        out.push('\n');
    }
    for (i, p) in sheet.placements.iter().enumerate() {
        let _ = writeln!(out, "{}", legend_line(marker(i), p));
    }
    out
}

fn legend_line(mark: char, p: &PlacedPiece) -> String {
    let rot = if p.rotated { " [rotated]" } else { "" };
    format!("  {mark}  {} {} @ ({}, {}){rot}", p.label, p.rect, p.x, p.y)
}

/// A-Z, then a-z, then `#` for everything after.
fn marker(i: usize) -> char {
    match i {
        0..26 => (b'A' + i as u8) as char,
        26..52 => (b'a' + (i - 26) as u8) as char,
        _ => '#',
    }
}

/// Cells covered by `start..end` after scaling. Never empty, never past `limit`.
fn cell_span(start: f64, end: f64, scale: f64, limit: usize) -> (usize, usize) {
    let lo = ((start * scale).round() as usize).min(limit - 1);
    let hi = ((end * scale).round() as usize).clamp(lo + 1, limit);
    (lo, hi)
}
