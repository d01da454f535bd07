use cabinet_planner::layout::PanelKind;
use cabinet_planner::{
    CabinetSpec, ErrorKind, SheetStock, extract_cut_pieces, pack, plan, resolve_and_build,
};

const KITCHEN_BASE: &str = r#"{
    "width": 60,
    "height": 34.5,
    "depth": 24,
    "sections": [
        { "width": 18, "component": { "type": "drawer", "count": 4 } },
        { "shelves": 1, "component": { "type": "door", "count": 2 } },
        {
            "width": 18,
            "rows": [
                { "height": 6, "component": { "type": "drawer", "count": 1 } },
                { "component": { "type": "door" } }
            ]
        }
    ]
}"#;

const BOOKCASE: &str = r#"{
    "width": 36,
    "height": 72,
    "depth": 12,
    "back": null,
    "sections": [
        { "shelves": 4, "component": { "type": "cubby", "columns": 2 } }
    ]
}"#;

fn parse(json: &str) -> CabinetSpec {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_kitchen_base_end_to_end() {
    let spec = parse(KITCHEN_BASE);
    let layout = resolve_and_build(&spec);
    assert!(layout.is_ok(), "{:?}", layout.errors);

    // 60 - 2 * 0.75 - 2 * 0.75 - 36 leaves 21 for the middle section.
    let widths: Vec<f64> = layout.sections.iter().map(|s| s.bounds.width).collect();
    assert_eq!(widths, vec![18.0, 21.0, 18.0]);

    // Composite rows: 33 - 0.75 - 6 leaves 26.25 for the door row.
    let rows = layout.sections[2].bays();
    assert!((rows[0].bounds.height - 6.0).abs() < 1e-9);
    assert!((rows[1].bounds.height - 26.25).abs() < 1e-9);
    assert!(rows[0].bounds.y > rows[1].bounds.y);

    for (i, a) in layout.panels.iter().enumerate() {
        for b in &layout.panels[i + 1..] {
            assert!(!a.intersects(b), "{} overlaps {}", a.name, b.name);
        }
    }

    let count = |kind: PanelKind| layout.panels.iter().filter(|p| p.kind == kind).count();
    assert_eq!(count(PanelKind::DrawerFront), 5);
    assert_eq!(count(PanelKind::Door), 3);
    assert_eq!(count(PanelKind::Back), 1);

    let pieces = extract_cut_pieces(&layout.panels);
    let quantity: u32 = pieces.iter().map(|p| p.quantity).sum();
    assert_eq!(quantity as usize, layout.panels.len());

    let stock = SheetStock::default();
    let packing = pack(&pieces, &stock).unwrap();
    assert_eq!(packing.piece_count(), layout.panels.len());

    let usable = stock.usable();
    for sheet in &packing.sheets {
        for p in &sheet.placements {
            assert!(p.x >= 0.0 && p.y >= 0.0);
            assert!(p.right() <= usable.w + 1e-9, "{} overhangs", p.label);
            assert!(p.top() <= usable.h + 1e-9, "{} overhangs", p.label);
        }
    }

    // Carcass plywood is seen first, the 1/4in back second.
    assert_eq!(packing.materials.len(), 2);
    assert_eq!(packing.materials[0].material.thickness, 0.75);
    assert_eq!(packing.materials[1].material.thickness, 0.25);
    assert_eq!(packing.materials[1].sheet_count, 1);
    for sheet in &packing.sheets {
        let expected = 100.0 * (1.0 - sheet.used_area / (stock.width * stock.height));
        assert!((sheet.waste_percentage - expected).abs() < 1e-9);
    }
}

#[test]
fn test_open_backed_cubby_bookcase() {
    let spec = parse(BOOKCASE);
    let layout = resolve_and_build(&spec);
    assert!(layout.is_ok(), "{:?}", layout.errors);
    assert!(layout.panels.iter().all(|p| p.kind != PanelKind::Back));

    let shelves: Vec<_> = layout.panels.iter().filter(|p| p.kind == PanelKind::Shelf).collect();
    // Four shelves in each of the two columns, (34.5 - 0.75) / 2 wide.
    assert_eq!(shelves.len(), 8);
    assert!(shelves.iter().all(|s| (s.width - 16.875).abs() < 1e-9));
    // No back: carcass panels use the full depth.
    assert!(shelves.iter().all(|s| (s.height - 12.0).abs() < 1e-9));

    let pieces = extract_cut_pieces(&layout.panels);
    let shelf_line = pieces.iter().find(|p| p.label == "Shelf").unwrap();
    assert_eq!(shelf_line.quantity, 8);
}

#[test]
fn test_resolution_errors_are_collected() {
    let spec = parse(
        r#"{
            "width": 36, "height": 30, "depth": 12,
            "sections": [
                { "min_width": 30 },
                { "min_width": 30, "rows": [ { "height": 20 }, { "height": 20 } ] }
            ]
        }"#,
    );
    let layout = resolve_and_build(&spec);
    assert!(layout.panels.is_empty());
    let found: Vec<(ErrorKind, &str)> = layout.errors.iter().map(|e| (e.kind(), e.subject())).collect();
    assert_eq!(
        found,
        vec![
            (ErrorKind::InsufficientSpace, "cabinet"),
            (ErrorKind::Overconstrained, "section 2"),
        ]
    );

    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["errors"][0]["kind"], "insufficient_space");
}

#[test]
fn test_section_with_rows_and_shelves_is_rejected() {
    let json = r#"{
        "width": 36, "height": 30, "depth": 12,
        "sections": [ { "shelves": 2, "rows": [ {} ] } ]
    }"#;
    assert!(serde_json::from_str::<CabinetSpec>(json).is_err());
}

#[test]
fn test_unknown_dimension_keyword_is_rejected() {
    let json = r#"{
        "width": 36, "height": 30, "depth": 12,
        "sections": [ { "width": "auto" } ]
    }"#;
    assert!(serde_json::from_str::<CabinetSpec>(json).is_err());
}

#[test]
fn test_plan_is_deterministic() {
    let spec = parse(KITCHEN_BASE);
    let stock = SheetStock::default();
    let first = serde_json::to_string(&plan(&spec, &stock).unwrap()).unwrap();
    for _ in 0..5 {
        assert_eq!(serde_json::to_string(&plan(&spec, &stock).unwrap()).unwrap(), first);
    }
}

#[test]
fn test_wide_cabinet_needs_rotation() {
    let spec = parse(
        r#"{
            "width": 90, "height": 30, "depth": 12,
            "sections": [ {}, {}, {} ]
        }"#,
    );
    let mut stock = SheetStock::default();
    assert!(plan(&spec, &stock).is_ok());

    stock.allow_rotation = false;
    let errors = plan(&spec, &stock).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind(), ErrorKind::UnplaceablePiece);
}
