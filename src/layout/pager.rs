//! Tabbed multi-page navigation.
//!
//! A pager reserves a band of [`TAB_BAR_SIZE`] pixels along its top edge for
//! tab selection. Pages are its children; tab order is insertion order.
//! Callers size each page to the viewport below the tab bar
//! (`x = 0, y = tab_bar_size, w = pager.w, h = pager.h - tab_bar_size`);
//! nothing enforces this, a misplaced page is still a valid document.

use super::{props, ControlKind, Document, NodeId, Properties, PropertyValue, Rect};
use crate::error::{Result, TouchMcuError};

/// Height of the tab selection band.
pub const TAB_BAR_SIZE: f32 = 30.0;

/// Handle to a pager node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    id: NodeId,
}

impl Pager {
    /// Create a pager under `parent`.
    pub fn create(
        doc: &mut Document,
        parent: NodeId,
        name: impl Into<String>,
        frame: Rect,
    ) -> Result<Self> {
        let id = doc.add_child(
            parent,
            name,
            ControlKind::Pager,
            frame,
            props([("tabbarSize", PropertyValue::Integer(TAB_BAR_SIZE as i64))]),
        )?;
        Ok(Self { id })
    }

    /// Wrap an existing pager node.
    pub fn from_node(doc: &Document, id: NodeId) -> Result<Self> {
        let node = doc.node(id)?;
        if node.kind() != ControlKind::Pager {
            return Err(TouchMcuError::InvalidParent {
                path: doc.path(id)?,
                kind: ControlKind::Page.to_string(),
            });
        }
        Ok(Self { id })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The reserved tab band height recorded on the node.
    pub fn tab_bar_size(&self, doc: &Document) -> Result<f32> {
        doc.node(self.id)?
            .property("tabbarSize")
            .and_then(PropertyValue::as_float)
            .ok_or_else(|| TouchMcuError::MissingProperty {
                path: doc.path(self.id).unwrap_or_default(),
                kind: ControlKind::Pager.to_string(),
                key: "tabbarSize".to_string(),
            })
    }

    /// Frame a page must use to sit below the tab bar.
    pub fn viewport(&self, doc: &Document) -> Result<Rect> {
        let frame = *doc.node(self.id)?.frame();
        let tab = self.tab_bar_size(doc)?;
        Rect::new(0.0, tab, frame.w(), frame.h() - tab)
    }

    /// Append a page. `tab_label` is display-only.
    pub fn add_page(
        &self,
        doc: &mut Document,
        name: impl Into<String>,
        tab_label: &str,
        frame: Rect,
    ) -> Result<NodeId> {
        let mut properties = Properties::new();
        properties.insert("tabLabel".to_string(), tab_label.into());
        doc.add_child(self.id, name, ControlKind::Page, frame, properties)
    }

    /// Pages in tab order.
    pub fn pages<'a>(&self, doc: &'a Document) -> Result<&'a [NodeId]> {
        Ok(doc.node(self.id)?.children())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager_doc() -> (Document, Pager) {
        let mut doc = Document::new(1024.0, 768.0).unwrap();
        let frame = *doc.node(doc.root()).unwrap().frame();
        let root = doc.root();
        let pager = Pager::create(&mut doc, root, "pager", frame).unwrap();
        (doc, pager)
    }

    #[test]
    fn test_viewport_convention() {
        let (doc, pager) = pager_doc();
        assert_eq!(pager.tab_bar_size(&doc).unwrap(), 30.0);
        assert_eq!(
            pager.viewport(&doc).unwrap(),
            Rect::new(0.0, 30.0, 1024.0, 738.0).unwrap()
        );
    }

    #[test]
    fn test_pages_keep_insertion_order() {
        let (mut doc, pager) = pager_doc();
        let viewport = pager.viewport(&doc).unwrap();
        let tracks = pager.add_page(&mut doc, "track_page", "Tracks", viewport).unwrap();
        let transport = pager
            .add_page(&mut doc, "transport_page", "Transport", viewport)
            .unwrap();

        assert_eq!(pager.pages(&doc).unwrap(), &[tracks, transport]);
        let page = doc.node(tracks).unwrap();
        assert_eq!(page.kind(), ControlKind::Page);
        assert_eq!(page.property("tabLabel").and_then(|v| v.as_str()), Some("Tracks"));
        assert_eq!(*page.frame(), Rect::new(0.0, 30.0, 1024.0, 738.0).unwrap());
    }

    #[test]
    fn test_duplicate_page_name() {
        let (mut doc, pager) = pager_doc();
        let viewport = pager.viewport(&doc).unwrap();
        pager.add_page(&mut doc, "page", "A", viewport).unwrap();
        let err = pager.add_page(&mut doc, "page", "B", viewport).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_NAME");
        assert_eq!(pager.pages(&doc).unwrap().len(), 1);
    }

    #[test]
    fn test_from_node_checks_kind() {
        let (doc, pager) = pager_doc();
        assert_eq!(Pager::from_node(&doc, pager.id()).unwrap(), pager);
        assert_eq!(
            Pager::from_node(&doc, doc.root()).unwrap_err().error_code(),
            "INVALID_PARENT"
        );
    }

    #[test]
    fn test_finalised_pager_is_valid() {
        let (mut doc, pager) = pager_doc();
        let viewport = pager.viewport(&doc).unwrap();
        pager.add_page(&mut doc, "page", "Only", viewport).unwrap();
        doc.finalise().unwrap();
    }
}
