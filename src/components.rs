//! Door and drawer fronts hung over a bay's opening.

use crate::cabinet::{ComponentConfig, DoorConfig, DrawerConfig};
use crate::error::{Error, Result};
use crate::layout::{Bounds, Panel, PanelContext, PanelKind, Plane, Point3, ResolvedBay, capitalize};
use crate::types::EPSILON;

/// Front panels for the bay's component. Open and cubby bays have none.
pub(crate) fn fronts(ctx: &PanelContext<'_>, bay: &ResolvedBay) -> Result<Vec<Panel>> {
    match &bay.component {
        ComponentConfig::Open | ComponentConfig::Cubby(_) => Ok(Vec::new()),
        ComponentConfig::Door(cfg) => doors(ctx, bay, cfg),
        ComponentConfig::Drawer(cfg) => drawer_fronts(ctx, bay, cfg),
    }
}

/// The opening grown by `overlay` on every edge.
fn covered(opening: Bounds, overlay: f64) -> Bounds {
    Bounds::new(
        opening.x - overlay,
        opening.y - overlay,
        opening.width + 2.0 * overlay,
        opening.height + 2.0 * overlay,
    )
}

/// Length of each of `count` parts sharing `span` with `gap` between them.
fn split_span(span: f64, count: u32, gap: f64) -> f64 {
    (span - (count as f64 - 1.0) * gap) / count as f64
}

fn doors(ctx: &PanelContext<'_>, bay: &ResolvedBay, cfg: &DoorConfig) -> Result<Vec<Panel>> {
    let area = covered(bay.bounds, cfg.overlay);
    let door_w = split_span(area.width, cfg.count, cfg.reveal);
    if door_w <= EPSILON {
        return Err(Error::geometry(
            &bay.name,
            format!("{} doors do not fit across {}in", cfg.count, area.width),
        ));
    }

    let title = capitalize(&bay.name);
    let notes = format!("{} overlay", cfg.overlay);
    Ok((0..cfg.count)
        .map(|i| {
            let x = area.x + i as f64 * (door_w + cfg.reveal);
            let mut panel = ctx.panel(
                PanelKind::Door,
                format!("{title} Door {}", i + 1),
                Point3::new(x, area.y, ctx.front_z),
                Plane::Frontal,
                door_w,
                area.height,
            );
            panel.notes = Some(notes.clone());
            panel
        })
        .collect())
}

fn drawer_fronts(ctx: &PanelContext<'_>, bay: &ResolvedBay, cfg: &DrawerConfig) -> Result<Vec<Panel>> {
    let area = covered(bay.bounds, cfg.overlay);
    let front_h = split_span(area.height, cfg.count, cfg.reveal);
    if front_h <= EPSILON {
        return Err(Error::geometry(
            &bay.name,
            format!("{} drawers do not fit in {}in", cfg.count, area.height),
        ));
    }

    let title = capitalize(&bay.name);
    let notes = format!("{} overlay", cfg.overlay);
    // Top drawer first.
    Ok((0..cfg.count)
        .map(|i| {
            let y = area.top() - (i as f64 + 1.0) * front_h - i as f64 * cfg.reveal;
            let mut panel = ctx.panel(
                PanelKind::DrawerFront,
                format!("{title} Drawer {}", i + 1),
                Point3::new(area.x, y, ctx.front_z),
                Plane::Frontal,
                area.width,
                front_h,
            );
            panel.notes = Some(notes.clone());
            panel
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ctx() -> PanelContext<'static> {
        PanelContext {
            thickness: 0.75,
            depth: 11.75,
            z: 0.25,
            front_z: 12.0,
            material: "plywood",
        }
    }

    fn bay(component: ComponentConfig) -> ResolvedBay {
        ResolvedBay {
            name: "section 1".into(),
            bounds: Bounds::new(0.75, 0.75, 20.0, 30.0),
            shelves: 0,
            component,
        }
    }

    #[test]
    fn test_pair_of_doors() {
        let cfg = DoorConfig {
            count: 2,
            overlay: 0.5,
            reveal: 0.125,
        };
        let panels = fronts(&ctx(), &bay(ComponentConfig::Door(cfg))).unwrap();
        assert_eq!(panels.len(), 2);
        // (21 - 0.125) / 2
        assert!((panels[0].width - 10.4375).abs() < 1e-9);
        assert!((panels[0].height - 31.0).abs() < 1e-9);
        assert!((panels[0].origin.x - 0.25).abs() < 1e-9);
        assert!((panels[1].origin.x - (0.25 + 10.4375 + 0.125)).abs() < 1e-9);
        assert_eq!(panels[0].origin.z, 12.0);
        assert_eq!(panels[1].name, "Section 1 Door 2");
        assert_eq!(panels[0].notes.as_deref(), Some("0.5 overlay"));
    }

    #[test]
    fn test_drawer_fronts_stack_from_top() {
        let cfg = DrawerConfig {
            count: 3,
            overlay: 0.25,
            reveal: 0.125,
        };
        let panels = fronts(&ctx(), &bay(ComponentConfig::Drawer(cfg))).unwrap();
        assert_eq!(panels.len(), 3);
        // (30.5 - 0.25) / 3
        let h = 30.25 / 3.0;
        for p in &panels {
            assert_eq!(p.kind, PanelKind::DrawerFront);
            assert!((p.height - h).abs() < 1e-9);
            assert!((p.width - 20.5).abs() < 1e-9);
        }
        assert!((panels[0].origin.y + h - 31.0).abs() < 1e-9);
        assert!(panels[0].origin.y > panels[1].origin.y);
        assert!((panels[2].origin.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_open_and_cubby_have_no_fronts() {
        assert!(fronts(&ctx(), &bay(ComponentConfig::Open)).unwrap().is_empty());
        let cubby = ComponentConfig::Cubby(Default::default());
        assert!(fronts(&ctx(), &bay(cubby)).unwrap().is_empty());
    }

    #[test]
    fn test_too_many_drawers() {
        let cfg = DrawerConfig {
            count: 400,
            overlay: 0.0,
            reveal: 0.125,
        };
        let err = fronts(&ctx(), &bay(ComponentConfig::Drawer(cfg))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Geometry);
        assert_eq!(err.subject(), "section 1");
    }
}
