//! Layout composition
//!
//! Turns an overlay into a complete document: one pager filling the canvas,
//! one page per [`PagePlan`], and every [`Placement`] built by its factory
//! and then moved to its offset on the page.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Result;
use crate::factories::FactoryRegistry;
use crate::layout::{Document, Pager, Rect};
use crate::mcu::STRIP_COUNT;
use crate::overlay::Overlay;

pub const CANVAS_WIDTH: f32 = 1024.0;
pub const CANVAS_HEIGHT: f32 = 768.0;

/// Scripts attached to the root, in load order.
pub const ROOT_SCRIPTS: [&str; 2] = ["table_utils.lua", "lcd.lua"];

/// Extension of the saved document.
pub const DOCUMENT_EXTENSION: &str = "tosc";

/// One factory invocation and where its cluster lands on the page
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub factory: &'static str,
    pub index: Option<usize>,
    pub offset: (f32, f32),
}

impl Placement {
    pub fn at(factory: &'static str, x: f32, y: f32) -> Self {
        Self {
            factory,
            index: None,
            offset: (x, y),
        }
    }

    pub fn indexed(factory: &'static str, index: usize, x: f32, y: f32) -> Self {
        Self {
            factory,
            index: Some(index),
            offset: (x, y),
        }
    }
}

/// A page and the clusters on it, in child order
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub name: &'static str,
    pub tab_label: &'static str,
    pub placements: Vec<Placement>,
}

/// The two-page MCU surface.
pub fn mcu_plan() -> Vec<PagePlan> {
    let mut tracks: Vec<Placement> = (0..STRIP_COUNT)
        .map(|i| Placement::indexed("track", i, 2.0 + 102.0 * i as f32, 0.0))
        .collect();
    tracks.extend([
        Placement::at("timecode", 820.0, 0.0),
        Placement::at("assignment", 820.0, 106.0),
        Placement::at("fader_banks", 820.0, 342.0),
        Placement::at("master_fader", 922.0, 342.0),
    ]);

    let transport = vec![
        Placement::at("global_view", 2.0, 2.0),
        Placement::at("function_select", 2.0, 122.0),
        Placement::at("modifiers", 2.0, 242.0),
        Placement::at("automation", 202.0, 242.0),
        Placement::at("utilities", 482.0, 242.0),
        Placement::at("transport", 2.0, 422.0),
        Placement::at("transport_timecode", 678.0, 2.0),
        Placement::at("transport_assignment", 678.0, 122.0),
        Placement::at("jog", 678.0, 242.0),
    ];

    vec![
        PagePlan {
            name: "track_page",
            tab_label: "Tracks",
            placements: tracks,
        },
        PagePlan {
            name: "transport_page",
            tab_label: "Transport",
            placements: transport,
        },
    ]
}

/// Build the document for `overlay`. Nothing is written to disk.
///
/// Any failure aborts the whole composition; no partial document escapes.
pub fn compose(
    overlay: &Overlay,
    script: &str,
    registry: &FactoryRegistry,
    plan: &[PagePlan],
) -> Result<Document> {
    let mut doc = Document::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;
    let root = doc.root();
    doc.set_property(root, "script", script)?;

    let pager = Pager::create(&mut doc, root, "pager", Rect::sized(CANVAS_WIDTH, CANVAS_HEIGHT)?)?;
    let viewport = pager.viewport(&doc)?;

    for page_plan in plan {
        let page = pager.add_page(&mut doc, page_plan.name, page_plan.tab_label, viewport)?;
        for placement in &page_plan.placements {
            let id = registry.build(placement.factory, &mut doc, page, overlay, placement.index)?;
            let (dx, dy) = placement.offset;
            doc.move_node(id, dx, dy)?;
        }
        debug!(
            "page '{}': {} clusters",
            page_plan.name,
            page_plan.placements.len()
        );
    }

    info!(
        "Composed '{}': {} pages, {} nodes",
        overlay.title(),
        plan.len(),
        doc.len()
    );
    Ok(doc)
}

/// Where the document for `overlay` is saved.
pub fn output_path(dir: &Path, overlay: &Overlay) -> PathBuf {
    dir.join(format!("{}.{}", overlay.title(), DOCUMENT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ControlKind, TAB_BAR_SIZE};
    use crate::overlay::OverlaySource;
    use approx::assert_relative_eq;

    fn overlay() -> Overlay {
        OverlaySource::new("does-not-exist").resolve("default").unwrap()
    }

    fn build() -> Document {
        compose(
            &overlay(),
            "-- script",
            &FactoryRegistry::with_defaults(),
            &mcu_plan(),
        )
        .unwrap()
    }

    #[test]
    fn test_pages_follow_plan() {
        let doc = build();
        let pager = doc.find("pager").unwrap();
        let pages = Pager::from_node(&doc, pager).unwrap().pages(&doc).unwrap().to_vec();
        assert_eq!(pages.len(), 2);

        let first = doc.node(pages[0]).unwrap();
        assert_eq!(first.name(), "track_page");
        assert_eq!(first.kind(), ControlKind::Page);
        assert_eq!(
            first.frame(),
            &Rect::new(0.0, TAB_BAR_SIZE, CANVAS_WIDTH, CANVAS_HEIGHT - TAB_BAR_SIZE).unwrap()
        );
        assert_eq!(
            first.property("tabLabel").and_then(|v| v.as_str()),
            Some("Tracks")
        );
        assert_eq!(doc.node(pages[1]).unwrap().name(), "transport_page");
    }

    #[test]
    fn test_clusters_are_placed() {
        let doc = build();
        let strip = doc.find("pager/track_page/track_7").unwrap();
        let frame = doc.node(strip).unwrap().frame();
        assert_relative_eq!(frame.x(), 716.0);
        assert_relative_eq!(frame.y(), 0.0);

        let jog = doc.find("pager/transport_page/jog").unwrap();
        assert_relative_eq!(doc.node(jog).unwrap().frame().x(), 678.0);
        assert_relative_eq!(doc.node(jog).unwrap().frame().y(), 242.0);

        // Children stay relative to their cluster.
        let rec = doc.find("pager/track_page/track_7/rec").unwrap();
        assert_relative_eq!(doc.node(rec).unwrap().frame().x(), 10.0);
    }

    #[test]
    fn test_clusters_fit_the_page() {
        let doc = build();
        let pager = doc.find("pager").unwrap();
        for page in Pager::from_node(&doc, pager).unwrap().pages(&doc).unwrap() {
            let bounds = *doc.node(*page).unwrap().frame();
            for cluster in doc.node(*page).unwrap().children() {
                let frame = doc.node(*cluster).unwrap().frame();
                assert!(frame.right() <= bounds.w(), "{}", doc.path(*cluster).unwrap());
                assert!(frame.bottom() <= bounds.h(), "{}", doc.path(*cluster).unwrap());
            }
        }
    }

    #[test]
    fn test_root_script() {
        let doc = build();
        let root = doc.node(doc.root()).unwrap();
        assert_eq!(root.property("script").and_then(|v| v.as_str()), Some("-- script"));
    }

    #[test]
    fn test_unknown_factory_aborts() {
        let plan = vec![PagePlan {
            name: "page",
            tab_label: "Page",
            placements: vec![Placement::at("mixer", 0.0, 0.0)],
        }];
        let err = compose(&overlay(), "", &FactoryRegistry::with_defaults(), &plan).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_FACTORY");
    }

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("out"), &overlay());
        assert_eq!(path, Path::new("out").join("TouchMCU.tosc"));
    }
}
