//! Flattens a panel list into a cut list.

use crate::layout::Panel;
use crate::types::{CutPiece, quantize};
use std::collections::BTreeMap;

/// Identity of a cut piece. Width and height keep the panel's own order, so
/// a 10x20 and a 20x10 piece stay separate lines.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct PieceKey {
    width: i64,
    height: i64,
    thickness: i64,
    material: String,
}

impl PieceKey {
    fn of(panel: &Panel) -> Self {
        Self {
            width: quantize(panel.width),
            height: quantize(panel.height),
            thickness: quantize(panel.thickness),
            material: panel.material.clone(),
        }
    }
}

/// Group panels by kind (sides, top/bottom, back, dividers, shelves, fronts),
/// keep tree order within a group, and merge identical geometry into one
/// line in first-seen order.
pub fn extract_cut_pieces(panels: &[Panel]) -> Vec<CutPiece> {
    let mut ordered: Vec<&Panel> = panels.iter().collect();
    ordered.sort_by_key(|p| p.kind.group());

    let mut pieces: Vec<CutPiece> = Vec::new();
    let mut seen: BTreeMap<PieceKey, usize> = BTreeMap::new();

    for panel in ordered {
        let label = panel.kind.label();
        match seen.get(&PieceKey::of(panel)) {
            Some(&idx) => {
                let piece = &mut pieces[idx];
                piece.quantity += 1;
                if !piece.label.split('/').any(|l| l == label) {
                    piece.label = format!("{}/{}", piece.label, label);
                }
            }
            None => {
                seen.insert(PieceKey::of(panel), pieces.len());
                pieces.push(CutPiece {
                    label: label.to_string(),
                    width: panel.width,
                    height: panel.height,
                    thickness: panel.thickness,
                    material: panel.material.clone(),
                    quantity: 1,
                    notes: panel.notes.clone(),
                });
            }
        }
    }

    tracing::debug!(
        panels = panels.len(),
        lines = pieces.len(),
        "extracted cut pieces"
    );
    pieces
}
