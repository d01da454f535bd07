//! Cabinet geometry: resolves section and row sizes, then lays out every panel.
//!
//! Coordinates are inches with the origin at the back-bottom-left corner:
//! `x` runs to the right, `y` up and `z` toward the front.

use crate::cabinet::{CabinetSpec, ComponentConfig, SectionSpec, row_subject, section_subject};
use crate::components;
use crate::error::Error;
use crate::resolver::{self, SizeSpec};
use crate::types::EPSILON;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    Side,
    Top,
    Bottom,
    Back,
    Divider,
    Shelf,
    Door,
    DrawerFront,
}

impl PanelKind {
    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Side => "Side",
            PanelKind::Top => "Top",
            PanelKind::Bottom => "Bottom",
            PanelKind::Back => "Back",
            PanelKind::Divider => "Divider",
            PanelKind::Shelf => "Shelf",
            PanelKind::Door => "Door",
            PanelKind::DrawerFront => "Drawer Front",
        }
    }

    /// Cut list ordering: sides, top/bottom, back, dividers, shelves, fronts.
    pub fn group(self) -> u8 {
        match self {
            PanelKind::Side => 0,
            PanelKind::Top | PanelKind::Bottom => 1,
            PanelKind::Back => 2,
            PanelKind::Divider => 3,
            PanelKind::Shelf => 4,
            PanelKind::Door | PanelKind::DrawerFront => 5,
        }
    }
}

/// Which axis a panel's thickness runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plane {
    /// Thickness along `x`: sides and vertical dividers. `width` is depth.
    Vertical,
    /// Thickness along `y`: top, bottom, shelves, row dividers. `height` is depth.
    Horizontal,
    /// Thickness along `z`: back and fronts.
    Frontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A rectangle in the front elevation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub kind: PanelKind,
    pub name: String,
    /// Minimum corner.
    pub origin: Point3,
    pub plane: Plane,
    /// Cut width.
    pub width: f64,
    /// Cut height.
    pub height: f64,
    pub thickness: f64,
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Panel {
    /// Size along `x`, `y` and `z`.
    pub fn extent(&self) -> Point3 {
        match self.plane {
            Plane::Vertical => Point3::new(self.thickness, self.height, self.width),
            Plane::Horizontal => Point3::new(self.width, self.thickness, self.height),
            Plane::Frontal => Point3::new(self.width, self.height, self.thickness),
        }
    }

    /// True when the interiors of the two boxes intersect.
    pub fn intersects(&self, other: &Panel) -> bool {
        let (a, ae) = (self.origin, self.extent());
        let (b, be) = (other.origin, other.extent());
        a.x + EPSILON < b.x + be.x
            && b.x + EPSILON < a.x + ae.x
            && a.y + EPSILON < b.y + be.y
            && b.y + EPSILON < a.y + ae.y
            && a.z + EPSILON < b.z + be.z
            && b.z + EPSILON < a.z + ae.z
    }
}

/// A box holding shelves and one component: a simple section or one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBay {
    pub name: String,
    pub bounds: Bounds,
    pub shelves: u32,
    pub component: ComponentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedContent {
    Simple(ResolvedBay),
    Composite { rows: Vec<ResolvedBay> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSection {
    pub index: usize,
    pub bounds: Bounds,
    pub content: ResolvedContent,
}

impl ResolvedSection {
    pub fn bays(&self) -> &[ResolvedBay] {
        match &self.content {
            ResolvedContent::Simple(bay) => std::slice::from_ref(bay),
            ResolvedContent::Composite { rows } => rows,
        }
    }
}

/// Output of [`resolve_and_build`]. `panels` is empty whenever `errors` is not.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    pub sections: Vec<ResolvedSection>,
    pub panels: Vec<Panel>,
    pub errors: Vec<Error>,
}

impl LayoutResult {
    fn failed(sections: Vec<ResolvedSection>, errors: Vec<Error>) -> Self {
        for e in &errors {
            tracing::warn!(kind = ?e.kind(), subject = e.subject(), "{e}");
        }
        Self {
            sections,
            panels: Vec::new(),
            errors,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<Self, Vec<Error>> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(self.errors)
        }
    }
}

/// Resolve all sizes, then build panels. Stops at the first failing stage.
pub fn resolve_and_build(spec: &CabinetSpec) -> LayoutResult {
    if let Err(e) = spec.validate() {
        return LayoutResult::failed(Vec::new(), vec![e]);
    }

    let sections = match resolve_sections(spec) {
        Ok(sections) => sections,
        Err(errors) => return LayoutResult::failed(Vec::new(), errors),
    };

    match build_panels(spec, &sections) {
        Ok(panels) => {
            tracing::debug!(
                sections = sections.len(),
                panels = panels.len(),
                "built cabinet layout"
            );
            LayoutResult {
                sections,
                panels,
                errors: Vec::new(),
            }
        }
        Err(errors) => LayoutResult::failed(sections, errors),
    }
}

/// Assign every section a width and every row a height.
///
/// Errors from independent resolutions are collected rather than stopping
/// at the first one.
pub fn resolve_sections(spec: &CabinetSpec) -> Result<Vec<ResolvedSection>, Vec<Error>> {
    let t = spec.thickness();
    let interior_w = spec.width - 2.0 * t;
    let interior_h = spec.height - 2.0 * t;
    let mut errors = Vec::new();

    let count = spec.sections.len();
    let specs: Vec<SizeSpec> = spec.sections.iter().map(SectionSpec::size_spec).collect();
    let available = interior_w - (count as f64 - 1.0) * t;
    let widths = resolver::resolve("cabinet", available, &specs)
        .map_err(|e| errors.push(e))
        .ok();

    let mut row_heights = Vec::with_capacity(count);
    for (i, section) in spec.sections.iter().enumerate() {
        let heights = match section {
            SectionSpec::Simple(_) => Some(Vec::new()),
            SectionSpec::Composite(c) => {
                let specs: Vec<SizeSpec> = c.rows.iter().map(|r| r.size_spec()).collect();
                let available = interior_h - (c.rows.len() as f64 - 1.0) * t;
                resolver::resolve(&section_subject(i), available, &specs)
                    .map_err(|e| errors.push(e))
                    .ok()
            }
        };
        row_heights.push(heights);
    }

    let Some(widths) = widths.filter(|_| errors.is_empty()) else {
        return Err(errors);
    };

    let mut sections = Vec::with_capacity(count);
    let mut x = t;
    for (i, ((section, width), heights)) in spec
        .sections
        .iter()
        .zip(widths)
        .zip(row_heights.into_iter().flatten())
        .enumerate()
    {
        let bounds = Bounds::new(x, t, width, interior_h);
        let content = match section {
            SectionSpec::Simple(s) => ResolvedContent::Simple(ResolvedBay {
                name: section_subject(i),
                bounds,
                shelves: s.shelves,
                component: s.component.clone(),
            }),
            SectionSpec::Composite(c) => {
                let mut top = bounds.top();
                let rows = c
                    .rows
                    .iter()
                    .zip(heights)
                    .enumerate()
                    .map(|(r, (row, h))| {
                        let y = top - h;
                        top = y - t;
                        ResolvedBay {
                            name: row_subject(i, r),
                            bounds: Bounds::new(x, y, width, h),
                            shelves: row.shelves,
                            component: row.component.clone(),
                        }
                    })
                    .collect();
                ResolvedContent::Composite { rows }
            }
        };
        sections.push(ResolvedSection {
            index: i,
            bounds,
            content,
        });
        x += width + t;
    }

    Ok(sections)
}

/// Shared panel parameters for one cabinet.
pub(crate) struct PanelContext<'a> {
    pub thickness: f64,
    pub depth: f64,
    /// `z` of the carcass back edge.
    pub z: f64,
    /// `z` of the carcass front face, where fronts are hung.
    pub front_z: f64,
    pub material: &'a str,
}

impl PanelContext<'_> {
    pub fn panel(
        &self,
        kind: PanelKind,
        name: String,
        origin: Point3,
        plane: Plane,
        width: f64,
        height: f64,
    ) -> Panel {
        Panel {
            kind,
            name,
            origin,
            plane,
            width,
            height,
            thickness: self.thickness,
            material: self.material.to_string(),
            notes: None,
        }
    }
}

/// Lay out carcass, dividers, shelves and fronts in tree order.
pub fn build_panels(spec: &CabinetSpec, sections: &[ResolvedSection]) -> Result<Vec<Panel>, Vec<Error>> {
    let t = spec.thickness();
    let ctx = PanelContext {
        thickness: t,
        depth: spec.carcass_depth(),
        z: spec.back_thickness(),
        front_z: spec.depth,
        material: &spec.material.name,
    };
    let (w, h) = (spec.width, spec.height);
    let mut panels = Vec::new();
    let mut errors = Vec::new();

    panels.push(ctx.panel(
        PanelKind::Side,
        "Left Side".into(),
        Point3::new(0.0, t, ctx.z),
        Plane::Vertical,
        ctx.depth,
        h - 2.0 * t,
    ));
    panels.push(ctx.panel(
        PanelKind::Side,
        "Right Side".into(),
        Point3::new(w - t, t, ctx.z),
        Plane::Vertical,
        ctx.depth,
        h - 2.0 * t,
    ));
    panels.push(ctx.panel(
        PanelKind::Top,
        "Top".into(),
        Point3::new(0.0, h - t, ctx.z),
        Plane::Horizontal,
        w,
        ctx.depth,
    ));
    panels.push(ctx.panel(
        PanelKind::Bottom,
        "Bottom".into(),
        Point3::new(0.0, 0.0, ctx.z),
        Plane::Horizontal,
        w,
        ctx.depth,
    ));
    if let Some(back) = &spec.back {
        panels.push(Panel {
            kind: PanelKind::Back,
            name: "Back".into(),
            origin: Point3::default(),
            plane: Plane::Frontal,
            width: w,
            height: h,
            thickness: back.thickness,
            material: back.name.clone(),
            notes: None,
        });
    }

    for (i, section) in sections.iter().enumerate() {
        if let ResolvedContent::Composite { rows } = &section.content {
            for (r, pair) in rows.windows(2).enumerate() {
                panels.push(ctx.panel(
                    PanelKind::Divider,
                    format!("{} Divider {}", capitalize(&section_subject(i)), r + 1),
                    Point3::new(section.bounds.x, pair[1].bounds.top(), ctx.z),
                    Plane::Horizontal,
                    section.bounds.width,
                    ctx.depth,
                ));
            }
        }
        for bay in section.bays() {
            match build_bay(&ctx, bay) {
                Ok(bay_panels) => panels.extend(bay_panels),
                Err(e) => errors.push(e),
            }
        }
        if i + 1 < sections.len() {
            panels.push(ctx.panel(
                PanelKind::Divider,
                format!("Divider {}", i + 1),
                Point3::new(section.bounds.right(), t, ctx.z),
                Plane::Vertical,
                ctx.depth,
                section.bounds.height,
            ));
        }
    }

    if errors.is_empty() {
        Ok(panels)
    } else {
        Err(errors)
    }
}

fn build_bay(ctx: &PanelContext<'_>, bay: &ResolvedBay) -> crate::error::Result<Vec<Panel>> {
    let t = ctx.thickness;
    let b = bay.bounds;
    let mut panels = Vec::new();
    let title = capitalize(&bay.name);

    let columns = match &bay.component {
        ComponentConfig::Cubby(c) => c.columns,
        _ => 1,
    };
    let column_w = (b.width - (columns as f64 - 1.0) * t) / columns as f64;
    if column_w <= EPSILON {
        return Err(Error::geometry(
            &bay.name,
            format!("{columns} cubby columns do not fit in {}in", b.width),
        ));
    }
    for k in 1..columns {
        let x = b.x + k as f64 * column_w + (k - 1) as f64 * t;
        panels.push(ctx.panel(
            PanelKind::Divider,
            format!("{title} Cubby Divider {k}"),
            Point3::new(x, b.y, ctx.z),
            Plane::Vertical,
            ctx.depth,
            b.height,
        ));
    }

    let ys = shelf_positions(&bay.name, b, bay.shelves, t)?;
    for k in 0..columns {
        let x = b.x + k as f64 * (column_w + t);
        for (j, &y) in ys.iter().enumerate() {
            let name = if columns > 1 {
                format!("{title} Column {} Shelf {}", k + 1, j + 1)
            } else {
                format!("{title} Shelf {}", j + 1)
            };
            panels.push(ctx.panel(
                PanelKind::Shelf,
                name,
                Point3::new(x, y, ctx.z),
                Plane::Horizontal,
                column_w,
                ctx.depth,
            ));
        }
    }

    panels.extend(components::fronts(ctx, bay)?);
    Ok(panels)
}

/// Bottom faces of `count` shelves evenly spaced inside `bounds`.
pub fn shelf_positions(subject: &str, bounds: Bounds, count: u32, thickness: f64) -> crate::error::Result<Vec<f64>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let n = count as f64;
    let spacing = (bounds.height - n * thickness) / (n + 1.0);
    if spacing <= EPSILON {
        return Err(Error::geometry(
            subject,
            format!(
                "{count} shelves need more than {}in, bay is {}in tall",
                n * thickness,
                bounds.height
            ),
        ));
    }
    Ok((0..count)
        .map(|j| bounds.y + (j as f64 + 1.0) * spacing + j as f64 * thickness)
        .collect())
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
