use crate::error::{Error, Result};
use crate::guillotine::GuillotineBin;
use crate::types::{
    CutPiece, EPSILON, Material, MaterialSummary, PackingResult, Rect, SheetLayout, SheetStock,
    waste_percent,
};

/// One physical rectangle to cut, expanded from a cut list line.
#[derive(Debug, Clone)]
struct Item<'a> {
    piece_index: usize,
    label: &'a str,
    rect: Rect,
}

/// Packs cut pieces onto stock sheets, one material at a time.
///
/// Pieces go largest first into the first free rectangle that takes them,
/// scanning sheets in the order they were opened. The result depends only
/// on the cut list order and the stock, so repeated runs are identical.
pub struct Packer {
    stock: SheetStock,
}

impl Packer {
    pub fn new(stock: SheetStock) -> Self {
        Self { stock }
    }

    pub fn pack(&self, pieces: &[CutPiece]) -> Result<PackingResult> {
        self.validate(pieces)?;

        let mut sheets = Vec::new();
        let mut materials = Vec::new();
        for (material, items) in self.group_by_material(pieces) {
            let bins = self.pack_group(&items)?;
            let group: Vec<SheetLayout> = bins
                .into_iter()
                .map(|bin| SheetLayout::new(material.clone(), &self.stock, bin.placements))
                .collect();
            materials.push(self.summarize(material, &group));
            sheets.extend(group);
        }

        let used: f64 = sheets.iter().map(|s| s.used_area).sum();
        let total: f64 = sheets.iter().map(SheetLayout::area).sum();
        let result = PackingResult {
            total_waste_percentage: waste_percent(used, total),
            sheets,
            materials,
        };
        tracing::debug!(
            sheets = result.sheet_count(),
            pieces = result.piece_count(),
            waste = result.total_waste_percentage,
            "packed cut list"
        );
        Ok(result)
    }

    fn validate(&self, pieces: &[CutPiece]) -> Result<()> {
        let usable = self.stock.usable();
        if self.stock.kerf < 0.0 || self.stock.kerf.is_nan() || usable.w <= EPSILON || usable.h <= EPSILON {
            return Err(Error::invalid(
                "sheet stock",
                format!(
                    "{} with {}in kerf leaves no usable area",
                    self.stock.rect(),
                    self.stock.kerf
                ),
            ));
        }

        // Fail before packing anything: no number of sheets fixes these.
        for piece in pieces {
            let rect = piece.rect();
            if rect.w <= 0.0 || rect.h <= 0.0 {
                return Err(Error::invalid(
                    &piece.label,
                    format!("piece {rect} has a non-positive side"),
                ));
            }
            let fits = rect.fits_in(&usable) || (self.stock.allow_rotation && rect.rotated().fits_in(&usable));
            if !fits {
                return Err(Error::unplaceable(
                    &piece.label,
                    format!(
                        "piece {rect} does not fit the usable {usable} of a {} sheet",
                        self.stock.rect()
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Expand every line into `quantity` items, grouped by material in
    /// first-seen order and sorted largest first within each group.
    fn group_by_material<'a>(&self, pieces: &'a [CutPiece]) -> Vec<(Material, Vec<Item<'a>>)> {
        let mut groups: Vec<(Material, Vec<Item<'a>>)> = Vec::new();
        for (piece_index, piece) in pieces.iter().enumerate() {
            let material = piece.material();
            let pos = match groups.iter().position(|(m, _)| m.same_stock(&material)) {
                Some(pos) => pos,
                None => {
                    groups.push((material, Vec::new()));
                    groups.len() - 1
                }
            };
            let items = &mut groups[pos].1;
            for _ in 0..piece.quantity {
                items.push(Item {
                    piece_index,
                    label: &piece.label,
                    rect: piece.rect(),
                });
            }
        }

        // Stable sort: ties keep cut list order.
        for (_, items) in &mut groups {
            items.sort_by(|a, b| {
                b.rect
                    .area()
                    .total_cmp(&a.rect.area())
                    .then(b.rect.long_side().total_cmp(&a.rect.long_side()))
            });
        }
        groups
    }

    fn pack_group(&self, items: &[Item<'_>]) -> Result<Vec<GuillotineBin>> {
        let allow_rotate = self.stock.allow_rotation;
        let mut bins: Vec<GuillotineBin> = Vec::new();

        for item in items {
            let existing = bins
                .iter()
                .enumerate()
                .find_map(|(bi, bin)| bin.find_first(item.rect, allow_rotate).map(|fit| (bi, fit)));

            if let Some((bi, fit)) = existing {
                bins[bi].place(fit, item.rect, item.label, item.piece_index);
            } else {
                // Open new bin
                let mut bin = GuillotineBin::new(&self.stock);
                let fit = bin.find_first(item.rect, allow_rotate).ok_or_else(|| {
                    Error::unplaceable(item.label, format!("piece {} does not fit an empty sheet", item.rect))
                })?;
                bin.place(fit, item.rect, item.label, item.piece_index);
                bins.push(bin);
                tracing::debug!(sheet = bins.len(), piece = item.label, "opened sheet");
            }
        }

        Ok(bins)
    }

    fn summarize(&self, material: Material, sheets: &[SheetLayout]) -> MaterialSummary {
        let used_area: f64 = sheets.iter().map(|s| s.used_area).sum();
        let total_area: f64 = sheets.iter().map(SheetLayout::area).sum();
        MaterialSummary {
            material,
            sheet_count: sheets.len(),
            piece_count: sheets.iter().map(|s| s.piece_count).sum(),
            used_area,
            waste_percentage: waste_percent(used_area, total_area),
        }
    }
}

/// Pack `pieces` onto sheets of `stock`.
pub fn pack(pieces: &[CutPiece], stock: &SheetStock) -> Result<PackingResult> {
    Packer::new(*stock).pack(pieces)
}
