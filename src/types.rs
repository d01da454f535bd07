use serde::{Deserialize, Serialize};

/// Tolerance for comparing lengths in inches.
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn rotated(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
        }
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w + EPSILON && self.h <= other.h + EPSILON
    }

    pub fn long_side(&self) -> f64 {
        self.w.max(self.h)
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Sheet good identity: pieces only share a sheet when both fields match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub thickness: f64,
}

impl Material {
    pub fn new(name: impl Into<String>, thickness: f64) -> Self {
        Self {
            name: name.into(),
            thickness,
        }
    }

    pub fn plywood(thickness: f64) -> Self {
        Self::new("plywood", thickness)
    }

    /// Thickness in ten-thousandths of an inch, used as an exact ordering key.
    pub(crate) fn thickness_key(&self) -> i64 {
        quantize(self.thickness)
    }

    pub fn same_stock(&self, other: &Material) -> bool {
        self.name == other.name && self.thickness_key() == other.thickness_key()
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}in {}", self.thickness, self.name)
    }
}

pub(crate) fn quantize(v: f64) -> i64 {
    (v * 10_000.0).round() as i64
}

/// One line of the cut list: `quantity` identical rectangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutPiece {
    pub label: String,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    pub material: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CutPiece {
    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn material(&self) -> Material {
        Material::new(self.material.clone(), self.thickness)
    }
}

/// Stock sheet size, blade kerf and rotation policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetStock {
    pub width: f64,
    pub height: f64,
    pub kerf: f64,
    pub allow_rotation: bool,
}

impl Default for SheetStock {
    fn default() -> Self {
        Self {
            width: 48.0,
            height: 96.0,
            kerf: 0.125,
            allow_rotation: true,
        }
    }
}

impl SheetStock {
    pub fn new(width: f64, height: f64, kerf: f64) -> Self {
        Self {
            width,
            height,
            kerf,
            allow_rotation: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.width, self.height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Region available for pieces once one kerf is trimmed off each axis.
    pub fn usable(&self) -> Rect {
        Rect::new(self.width - self.kerf, self.height - self.kerf)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub label: String,
    /// Index of the source line in the cut list.
    pub piece_index: usize,
    /// Dimensions as placed (already swapped when rotated).
    pub rect: Rect,
    pub x: f64,
    pub y: f64,
    pub rotated: bool,
}

impl PlacedPiece {
    pub fn right(&self) -> f64 {
        self.x + self.rect.w
    }

    pub fn top(&self) -> f64 {
        self.y + self.rect.h
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub material: Material,
    pub width: f64,
    pub height: f64,
    pub placements: Vec<PlacedPiece>,
    pub piece_count: usize,
    pub used_area: f64,
    pub waste_percentage: f64,
}

impl SheetLayout {
    pub fn new(material: Material, stock: &SheetStock, placements: Vec<PlacedPiece>) -> Self {
        let used_area: f64 = placements.iter().map(|p| p.rect.area()).sum();
        let sheet_area = stock.area();
        Self {
            material,
            width: stock.width,
            height: stock.height,
            piece_count: placements.len(),
            used_area,
            waste_percentage: waste_percent(used_area, sheet_area),
            placements,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Area-weighted totals for all sheets of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSummary {
    pub material: Material,
    pub sheet_count: usize,
    pub piece_count: usize,
    pub used_area: f64,
    pub waste_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingResult {
    pub sheets: Vec<SheetLayout>,
    pub materials: Vec<MaterialSummary>,
    pub total_waste_percentage: f64,
}

impl PackingResult {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn piece_count(&self) -> usize {
        self.sheets.iter().map(|s| s.piece_count).sum()
    }
}

pub(crate) fn waste_percent(used_area: f64, total_area: f64) -> f64 {
    if total_area <= 0.0 {
        return 0.0;
    }
    (100.0 * (1.0 - used_area / total_area)).max(0.0)
}
