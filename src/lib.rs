//! Cabinet layout and sheet-goods planning.
//!
//! A [`CabinetSpec`] goes through four stages: fill sizes are resolved,
//! panels are laid out, panels are flattened into a cut list, and the cut
//! list is packed onto stock sheets. [`resolve_and_build`] and [`pack`] are
//! the two halves; [`plan`] runs them back to back.

pub mod cabinet;
mod components;
pub mod cutlist;
pub mod error;
pub mod guillotine;
pub mod layout;
pub mod packer;
pub mod render;
pub mod resolver;
pub mod types;

use serde::{Deserialize, Serialize};

pub use cabinet::{CabinetSpec, ComponentConfig, Dimension, SectionSpec};
pub use cutlist::extract_cut_pieces;
pub use error::{Error, ErrorKind, Result};
pub use layout::{LayoutResult, Panel, resolve_and_build};
pub use packer::{Packer, pack};
pub use types::{CutPiece, Material, PackingResult, SheetLayout, SheetStock};

/// Everything needed to build one cabinet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub layout: LayoutResult,
    pub cut_list: Vec<CutPiece>,
    pub packing: PackingResult,
}

/// Lay out the cabinet, extract its cut list and pack it onto `stock`.
/// Stops at the first stage that fails.
pub fn plan(spec: &CabinetSpec, stock: &SheetStock) -> std::result::Result<Plan, Vec<Error>> {
    let layout = resolve_and_build(spec).into_result()?;
    let cut_list = extract_cut_pieces(&layout.panels);
    let packing = pack(&cut_list, stock).map_err(|e| {
        tracing::warn!(kind = ?e.kind(), subject = e.subject(), "{e}");
        vec![e]
    })?;
    Ok(Plan {
        layout,
        cut_list,
        packing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_runs_every_stage() {
        let spec: CabinetSpec = serde_json::from_str(
            r#"{
                "width": 36, "height": 30, "depth": 12,
                "sections": [
                    { "shelves": 2 },
                    { "width": 15, "component": { "type": "door" } }
                ]
            }"#,
        )
        .unwrap();
        let plan = plan(&spec, &SheetStock::default()).unwrap();
        let quantity: u32 = plan.cut_list.iter().map(|p| p.quantity).sum();
        assert_eq!(quantity as usize, plan.layout.panels.len());
        assert_eq!(plan.packing.piece_count(), plan.layout.panels.len());
    }

    #[test]
    fn test_plan_reports_layout_errors() {
        let spec: CabinetSpec = serde_json::from_str(
            r#"{
                "width": 36, "height": 30, "depth": 12,
                "sections": [ { "width": 20 }, { "width": 20 } ]
            }"#,
        )
        .unwrap();
        let errors = plan(&spec, &SheetStock::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::Overconstrained);
    }

    #[test]
    fn test_plan_reports_unplaceable_pieces() {
        let section = SectionSpec::Simple(cabinet::SimpleSection::default());
        let spec = CabinetSpec::new(36.0, 30.0, 12.0, vec![section]);
        let stock = SheetStock::new(24.0, 24.0, 0.125);
        let errors = plan(&spec, &stock).unwrap_err();
        assert_eq!(errors[0].kind(), ErrorKind::UnplaceablePiece);
    }
}
