//! Declarative cabinet description.
//!
//! This is the input to [`crate::layout::resolve_and_build`]. It mirrors the
//! JSON accepted by the CLI and the HTTP server.

use crate::error::{Error, Result};
use crate::resolver::SizeSpec;
use crate::types::Material;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MIN_THICKNESS: f64 = 0.25;
pub const MAX_THICKNESS: f64 = 2.0;

/// A length in inches, or `"fill"` to take a share of the leftover space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "DimensionRepr", into = "DimensionRepr")]
pub enum Dimension {
    Fixed(f64),
    #[default]
    Fill,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f64),
    Keyword(String),
}

impl TryFrom<DimensionRepr> for Dimension {
    type Error = String;

    fn try_from(repr: DimensionRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            DimensionRepr::Number(v) => Ok(Dimension::Fixed(v)),
            DimensionRepr::Keyword(s) if s.eq_ignore_ascii_case("fill") => Ok(Dimension::Fill),
            DimensionRepr::Keyword(s) => {
                Err(format!("invalid dimension '{s}', expected a number or \"fill\""))
            }
        }
    }
}

impl From<Dimension> for DimensionRepr {
    fn from(d: Dimension) -> Self {
        match d {
            Dimension::Fixed(v) => DimensionRepr::Number(v),
            Dimension::Fill => DimensionRepr::Keyword("fill".to_string()),
        }
    }
}

impl Dimension {
    pub fn to_size_spec(self, min: Option<f64>, max: Option<f64>) -> SizeSpec {
        match self {
            Dimension::Fixed(v) => SizeSpec::Fixed(v),
            Dimension::Fill => SizeSpec::Fill { min, max },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    pub count: u32,
    /// How far the doors extend past the opening on every edge.
    pub overlay: f64,
    /// Gap between neighbouring doors.
    pub reveal: f64,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            count: 1,
            overlay: 0.25,
            reveal: 0.125,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawerConfig {
    pub count: u32,
    pub overlay: f64,
    pub reveal: f64,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            count: 3,
            overlay: 0.25,
            reveal: 0.125,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubbyConfig {
    pub columns: u32,
}

impl Default for CubbyConfig {
    fn default() -> Self {
        Self { columns: 2 }
    }
}

/// What fills a simple section or row besides its shelves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentConfig {
    #[default]
    Open,
    Door(DoorConfig),
    Drawer(DrawerConfig),
    Cubby(CubbyConfig),
}

impl ComponentConfig {
    fn validate(&self, subject: &str) -> Result<()> {
        let (count, overlay, reveal) = match self {
            ComponentConfig::Open => return Ok(()),
            ComponentConfig::Cubby(c) => {
                if c.columns == 0 {
                    return Err(Error::invalid(subject, "cubby needs at least one column"));
                }
                return Ok(());
            }
            ComponentConfig::Door(d) => (d.count, d.overlay, d.reveal),
            ComponentConfig::Drawer(d) => (d.count, d.overlay, d.reveal),
        };
        if count == 0 {
            return Err(Error::invalid(subject, "front count must be at least 1"));
        }
        if overlay < 0.0 || reveal < 0.0 {
            return Err(Error::invalid(subject, "overlay and reveal must be non-negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleSection {
    #[serde(default)]
    pub width: Dimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default)]
    pub shelves: u32,
    #[serde(default)]
    pub component: ComponentConfig,
}

/// One horizontal band of a composite section.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowSpec {
    #[serde(default)]
    pub height: Dimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    #[serde(default)]
    pub shelves: u32,
    #[serde(default)]
    pub component: ComponentConfig,
}

impl RowSpec {
    pub fn size_spec(&self) -> SizeSpec {
        self.height.to_size_spec(self.min_height, self.max_height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeSection {
    #[serde(default)]
    pub width: Dimension,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    pub rows: Vec<RowSpec>,
}

/// A vertical section: either one content type, or rows stacked top to bottom.
///
/// In JSON a section with a `rows` key is composite, anything else simple.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionSpec {
    Composite(CompositeSection),
    Simple(SimpleSection),
}

impl<'de> Deserialize<'de> for SectionSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let fields = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        let section = if fields.contains_key("rows") {
            serde_json::from_value(Value::Object(fields)).map(SectionSpec::Composite)
        } else {
            serde_json::from_value(Value::Object(fields)).map(SectionSpec::Simple)
        };
        section.map_err(D::Error::custom)
    }
}

impl SectionSpec {
    pub fn size_spec(&self) -> SizeSpec {
        match self {
            SectionSpec::Simple(s) => s.width.to_size_spec(s.min_width, s.max_width),
            SectionSpec::Composite(c) => c.width.to_size_spec(c.min_width, c.max_width),
        }
    }
}

fn default_material() -> Material {
    Material::plywood(0.75)
}

fn default_back() -> Option<Material> {
    Some(Material::plywood(0.25))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CabinetSpec {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Carcass material: sides, top, bottom, dividers, shelves and fronts.
    #[serde(default = "default_material")]
    pub material: Material,
    /// Back panel material; `null` builds an open-backed cabinet.
    #[serde(default = "default_back")]
    pub back: Option<Material>,
    pub sections: Vec<SectionSpec>,
}

impl CabinetSpec {
    pub fn new(width: f64, height: f64, depth: f64, sections: Vec<SectionSpec>) -> Self {
        Self {
            width,
            height,
            depth,
            material: default_material(),
            back: default_back(),
            sections,
        }
    }

    pub fn thickness(&self) -> f64 {
        self.material.thickness
    }

    pub fn back_thickness(&self) -> f64 {
        self.back.as_ref().map_or(0.0, |m| m.thickness)
    }

    /// Depth of the carcass panels once the back is applied behind them.
    pub fn carcass_depth(&self) -> f64 {
        self.depth - self.back_thickness()
    }

    pub fn validate(&self) -> Result<()> {
        let t = self.thickness();
        if !(MIN_THICKNESS..=MAX_THICKNESS).contains(&t) {
            return Err(Error::invalid(
                "material",
                format!("thickness {t} outside {MIN_THICKNESS}..={MAX_THICKNESS}"),
            ));
        }
        if let Some(back) = &self.back
            && !(back.thickness > 0.0 && back.thickness <= MAX_THICKNESS)
        {
            return Err(Error::invalid(
                "back",
                format!("thickness {} outside 0..={MAX_THICKNESS}", back.thickness),
            ));
        }
        if self.width <= 2.0 * t || self.height <= 2.0 * t {
            return Err(Error::invalid(
                "cabinet",
                format!(
                    "{}x{} leaves no interior with {t}in material",
                    self.width, self.height
                ),
            ));
        }
        if self.carcass_depth() <= 0.0 {
            return Err(Error::invalid(
                "cabinet",
                format!("depth {} leaves no room behind the back", self.depth),
            ));
        }
        if self.sections.is_empty() {
            return Err(Error::invalid("cabinet", "at least one section is required"));
        }
        for (i, section) in self.sections.iter().enumerate() {
            let subject = section_subject(i);
            match section {
                SectionSpec::Simple(s) => s.component.validate(&subject)?,
                SectionSpec::Composite(c) => {
                    if c.rows.is_empty() {
                        return Err(Error::invalid(subject, "composite section has no rows"));
                    }
                    for (r, row) in c.rows.iter().enumerate() {
                        row.component.validate(&row_subject(i, r))?;
                    }
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn section_subject(index: usize) -> String {
    format!("section {}", index + 1)
}

pub(crate) fn row_subject(section: usize, row: usize) -> String {
    format!("section {} row {}", section + 1, row + 1)
}
