//! Widget Factories
//!
//! Each factory builds one control cluster under a parent node, laid out
//! relative to its own origin, and returns the cluster's root. Placement on
//! the page is left to the caller.

mod master;
mod track;
mod transport;
pub mod widgets;

use std::collections::BTreeMap;

use crate::error::{Result, TouchMcuError};
use crate::layout::{Document, NodeId};
use crate::overlay::Overlay;

pub use master::{assignment, fader_banks, master_fader, timecode};
pub use track::{track, STRIP_HEIGHT, STRIP_WIDTH};
pub use transport::{
    automation, function_select, global_view, jog, modifiers, transport, transport_assignment,
    transport_timecode, utilities,
};

/// Builder signature shared by every factory.
///
/// `index` selects an instance for indexed clusters such as channel strips
/// and is ignored elsewhere.
pub type FactoryFn = fn(&mut Document, NodeId, &Overlay, Option<usize>) -> Result<NodeId>;

/// Factories keyed by widget kind
#[derive(Debug, Clone)]
pub struct FactoryRegistry {
    factories: BTreeMap<&'static str, FactoryFn>,
}

impl FactoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with every built-in factory
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register("track", track);
        registry.register("timecode", timecode);
        registry.register("assignment", assignment);
        registry.register("fader_banks", fader_banks);
        registry.register("master_fader", master_fader);

        registry.register("global_view", global_view);
        registry.register("function_select", function_select);
        registry.register("modifiers", modifiers);
        registry.register("automation", automation);
        registry.register("utilities", utilities);
        registry.register("transport", transport);
        registry.register("transport_timecode", transport_timecode);
        registry.register("transport_assignment", transport_assignment);
        registry.register("jog", jog);

        registry
    }

    /// Register a factory, replacing any previous one of the same kind
    pub fn register(&mut self, kind: &'static str, factory: FactoryFn) {
        self.factories.insert(kind, factory);
    }

    /// Get a factory by kind
    pub fn get(&self, kind: &str) -> Result<FactoryFn> {
        self.factories
            .get(kind)
            .copied()
            .ok_or_else(|| TouchMcuError::UnknownFactory {
                kind: kind.to_string(),
            })
    }

    /// Look up `kind` and run it.
    pub fn build(
        &self,
        kind: &str,
        doc: &mut Document,
        parent: NodeId,
        overlay: &Overlay,
        index: Option<usize>,
    ) -> Result<NodeId> {
        let factory = self.get(kind)?;
        factory(doc, parent, overlay, index)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    pub fn has_factory(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use crate::overlay::OverlaySource;

    #[test]
    fn test_default_registry() {
        let registry = FactoryRegistry::with_defaults();
        assert_eq!(registry.kinds().len(), 14);
        assert!(registry.has_factory("track"));
        assert!(registry.has_factory("jog"));
        assert_eq!(
            registry.get("mixer").unwrap_err().error_code(),
            "UNKNOWN_FACTORY"
        );
    }

    #[test]
    fn test_custom_factory() {
        fn spacer(
            doc: &mut Document,
            parent: NodeId,
            _overlay: &Overlay,
            _index: Option<usize>,
        ) -> Result<NodeId> {
            widgets::cluster(doc, parent, "spacer", 10.0, 10.0)
        }

        let mut registry = FactoryRegistry::new();
        registry.register("spacer", spacer);

        let overlay = OverlaySource::new("does-not-exist").resolve("default").unwrap();
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = registry.build("spacer", &mut doc, root, &overlay, None).unwrap();
        assert_eq!(doc.node(id).unwrap().frame(), &Rect::sized(10.0, 10.0).unwrap());
        assert!(registry.build("track", &mut doc, root, &overlay, Some(0)).is_err());
    }

    #[test]
    fn test_every_factory_builds() {
        let overlay = OverlaySource::new("does-not-exist").resolve("default").unwrap();
        let registry = FactoryRegistry::with_defaults();
        for kind in registry.kinds() {
            // Fresh document per kind: some clusters share a name.
            let mut doc = Document::new(1024.0, 738.0).unwrap();
            let root = doc.root();
            let index = (kind == "track").then_some(0);
            let id = registry.build(kind, &mut doc, root, &overlay, index).unwrap();
            assert!(!doc.node(id).unwrap().children().is_empty(), "{kind}");
        }
    }
}
