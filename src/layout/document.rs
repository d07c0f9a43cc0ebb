//! The document tree: a flat arena of control nodes rooted at the canvas.
//!
//! Lifecycle: created empty, mutated by composition calls, finalised
//! (idempotent), saved exactly once, then sealed.

use std::path::{Path, PathBuf};

use log::{debug, info};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::node::RESERVED_KEYS;
use super::property::MIDI_KEY;
use super::{ControlKind, ControlNode, NodeId, Properties, PropertyValue, Rect};
use crate::error::{Result, TouchMcuError};
use crate::{format, storage};

/// Name of the root node.
pub const ROOT_NAME: &str = "root";

/// Namespace for node identifiers derived from node paths.
const NODE_NAMESPACE: Uuid = Uuid::from_u128(0x6d63_7534_746f_7563_686f_7363_6c61_796f);

/// Outcome of a successful [`Document::save`].
#[derive(Debug, Clone)]
pub struct SaveReport {
    pub path: PathBuf,
    pub bytes: usize,
    /// Hex SHA-256 of the bytes on disk.
    pub sha256: String,
}

/// Root container owning the canvas size and the node tree
#[derive(Debug, Clone)]
pub struct Document {
    width: f32,
    height: f32,
    nodes: Vec<ControlNode>,
    finalised: bool,
    sealed: bool,
}

impl Document {
    /// Create a document whose root is sized to the canvas.
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let frame = Rect::sized(width, height)?;
        let root = ControlNode::new(
            ROOT_NAME.to_string(),
            ControlKind::Group,
            frame,
            Properties::new(),
            None,
        );
        Ok(Self {
            width,
            height,
            nodes: vec![root],
            finalised: false,
            sealed: false,
        })
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn is_finalised(&self) -> bool {
        self.finalised
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn node(&self, id: NodeId) -> Result<&ControlNode> {
        self.nodes
            .get(id.0)
            .ok_or(TouchMcuError::UnknownNode { id: id.0 })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut ControlNode> {
        if self.sealed {
            return Err(TouchMcuError::DocumentSealed);
        }
        self.finalised = false;
        self.nodes
            .get_mut(id.0)
            .ok_or(TouchMcuError::UnknownNode { id: id.0 })
    }

    /// Append a new node to `parent`'s children.
    ///
    /// Fails without touching the tree if a sibling already uses `name`, or
    /// if `kind` cannot live under `parent` (a page outside a pager, or
    /// anything other than a page inside one).
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        kind: ControlKind,
        frame: Rect,
        properties: Properties,
    ) -> Result<NodeId> {
        if self.sealed {
            return Err(TouchMcuError::DocumentSealed);
        }
        let name = name.into();
        let parent_node = self.node(parent)?;

        if let Some(key) = properties
            .keys()
            .find(|k| RESERVED_KEYS.contains(&k.as_str()))
        {
            return Err(TouchMcuError::InvalidProperty {
                path: format!("{}/{}", self.path(parent)?, name),
                key: key.clone(),
                reason: "reserved key".to_string(),
            });
        }
        // Pages only live in pagers, and pagers hold nothing else.
        if (parent_node.kind == ControlKind::Pager) != (kind == ControlKind::Page) {
            return Err(TouchMcuError::InvalidParent {
                path: format!("{}/{}", self.path(parent)?, name),
                kind: kind.to_string(),
            });
        }
        frame.validate()?;
        if self.child_by_name(parent, &name).is_some() {
            return Err(TouchMcuError::DuplicateName {
                parent: parent_node.name.clone(),
                name,
            });
        }

        let id = NodeId(self.nodes.len());
        debug!("add {} '{}' under {}", kind, name, parent_node.name);
        self.nodes
            .push(ControlNode::new(name, kind, frame, properties, Some(parent)));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Insert or overwrite a property.
    pub fn set_property(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<()> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(TouchMcuError::InvalidProperty {
                path: self.path(id)?,
                key,
                reason: "reserved key".to_string(),
            });
        }
        self.node_mut(id)?.properties.insert(key, value.into());
        Ok(())
    }

    /// Replace a node's frame.
    pub fn set_frame(&mut self, id: NodeId, frame: Rect) -> Result<()> {
        frame.validate()?;
        self.node_mut(id)?.frame = frame;
        Ok(())
    }

    /// Translate a node (and so its subtree) by an offset.
    ///
    /// An offset that would leave the frame non-finite is rejected and the
    /// node stays where it was.
    pub fn move_node(&mut self, id: NodeId, dx: f32, dy: f32) -> Result<()> {
        let moved = self.node(id)?.frame.translated(dx, dy);
        self.set_frame(id, moved)
    }

    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(parent.0)?.children.iter().copied().find(|c| {
            self.nodes
                .get(c.0)
                .map(|n| n.name == name)
                .unwrap_or(false)
        })
    }

    /// Resolve a `/`-separated path of names below the root.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root(), |node, segment| self.child_by_name(node, segment))
    }

    /// Path of names from the root, e.g. `root/pager/track_page`.
    pub fn path(&self, id: NodeId) -> Result<String> {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            names.push(node.name.as_str());
            cursor = node.parent;
        }
        names.reverse();
        Ok(names.join("/"))
    }

    /// Node ids in depth-first, child-order sequence starting at the root.
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(id.0) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Validate and then normalize the whole tree.
    ///
    /// Every node is checked first (frame, required properties, MIDI key
    /// placement); on failure nothing is modified. Then identifiers are
    /// assigned and absent kind defaults filled. Running it again changes
    /// nothing.
    pub fn finalise(&mut self) -> Result<()> {
        // A sealed document was finalised before it was written.
        if self.finalised || self.sealed {
            return Ok(());
        }

        let order = self.depth_first();
        for id in &order {
            self.validate_node(*id)?;
        }

        // Only a fully valid tree is normalized.
        for id in order {
            let path = self.path(id)?;
            let node = &mut self.nodes[id.0];
            let interactive = node.kind.is_interactive();
            node.properties
                .entry("visible".to_string())
                .or_insert(PropertyValue::Boolean(true));
            node.properties
                .entry("interactive".to_string())
                .or_insert(PropertyValue::Boolean(interactive));
            if node.uid.is_none() {
                node.uid = Some(Uuid::new_v5(&NODE_NAMESPACE, path.as_bytes()).to_string());
            }
        }

        self.finalised = true;
        debug!("finalised {} nodes", self.nodes.len());
        Ok(())
    }

    fn validate_node(&self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        let path = || self.path(id);

        node.frame.validate()?;
        for key in node.kind.required_properties() {
            if !node.properties.contains_key(*key) {
                return Err(TouchMcuError::MissingProperty {
                    path: path()?,
                    kind: node.kind.to_string(),
                    key: key.to_string(),
                });
            }
        }
        for (key, value) in &node.properties {
            let is_midi = matches!(value, PropertyValue::Midi(_));
            if is_midi != (key == MIDI_KEY) {
                return Err(TouchMcuError::InvalidProperty {
                    path: path()?,
                    key: key.clone(),
                    reason: format!("MIDI bindings belong under '{MIDI_KEY}' only"),
                });
            }
        }
        if node.kind == ControlKind::Pager
            && node
                .properties
                .get("tabbarSize")
                .and_then(PropertyValue::as_float)
                .is_none()
        {
            return Err(TouchMcuError::InvalidProperty {
                path: path()?,
                key: "tabbarSize".to_string(),
                reason: "must be numeric".to_string(),
            });
        }
        Ok(())
    }

    /// Finalise, serialize and atomically write the document.
    ///
    /// A document can only be saved once; afterwards it is sealed.
    pub fn save(&mut self, path: &Path) -> Result<SaveReport> {
        if self.sealed {
            return Err(TouchMcuError::DocumentSealed);
        }
        self.finalise()?;
        let bytes = format::encode(self)?;
        storage::write_atomic(path, &bytes)?;
        self.sealed = true;

        let sha256 = format!("{:x}", Sha256::digest(&bytes));
        info!(
            "Saved {} ({} bytes, sha256 {})",
            path.display(),
            bytes.len(),
            sha256
        );
        Ok(SaveReport {
            path: path.to_path_buf(),
            bytes: bytes.len(),
            sha256,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{props, MidiMessage};

    fn leaf(doc: &mut Document, parent: NodeId, name: &str) -> Result<NodeId> {
        doc.add_child(
            parent,
            name,
            ControlKind::Button,
            Rect::sized(10.0, 10.0).unwrap(),
            Properties::new(),
        )
    }

    #[test]
    fn test_new_document() {
        let doc = Document::new(1024.0, 768.0).unwrap();
        let root = doc.node(doc.root()).unwrap();
        assert_eq!(root.name(), ROOT_NAME);
        assert_eq!(*root.frame(), Rect::sized(1024.0, 768.0).unwrap());
        assert!(root.children().is_empty());
        assert!(doc.is_empty());
        assert!(Document::new(-1.0, 10.0).is_err());
    }

    #[test]
    fn test_duplicate_name_leaves_parent_unchanged() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let a = leaf(&mut doc, root, "a").unwrap();
        leaf(&mut doc, root, "b").unwrap();

        let before = doc.node(root).unwrap().children().to_vec();
        let nodes_before = doc.len();
        let err = leaf(&mut doc, root, "a").unwrap_err();

        assert!(matches!(err, TouchMcuError::DuplicateName { .. }));
        assert_eq!(doc.node(root).unwrap().children(), before.as_slice());
        assert_eq!(doc.len(), nodes_before);

        // Same name under a different parent is fine.
        leaf(&mut doc, a, "a").unwrap();
    }

    #[test]
    fn test_reserved_keys_rejected() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let err = doc
            .add_child(
                root,
                "x",
                ControlKind::Label,
                Rect::sized(1.0, 1.0).unwrap(),
                props([("name", "y")]),
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PROPERTY");
        assert!(doc.set_property(root, "frame", 1_i64).is_err());
    }

    #[test]
    fn test_set_property_overwrites() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();
        doc.set_property(id, "label", "one").unwrap();
        doc.set_property(id, "label", "two").unwrap();
        assert_eq!(
            doc.node(id).unwrap().property("label").and_then(|v| v.as_str()),
            Some("two")
        );
    }

    #[test]
    fn test_paths_and_find() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let group = doc
            .add_child(
                root,
                "group",
                ControlKind::Group,
                Rect::sized(50.0, 50.0).unwrap(),
                Properties::new(),
            )
            .unwrap();
        let btn = leaf(&mut doc, group, "btn").unwrap();

        assert_eq!(doc.path(btn).unwrap(), "root/group/btn");
        assert_eq!(doc.find("group/btn"), Some(btn));
        assert_eq!(doc.find("group/nope"), None);
        assert_eq!(doc.find(""), Some(doc.root()));
        assert_eq!(doc.depth_first(), vec![doc.root(), group, btn]);
    }

    #[test]
    fn test_move_node() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();
        doc.move_node(id, 5.0, 7.0).unwrap();
        assert_eq!(*doc.node(id).unwrap().frame(), Rect::new(5.0, 7.0, 10.0, 10.0).unwrap());
    }

    #[test]
    fn test_set_frame_rejects_invalid() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();

        doc.set_frame(id, Rect::new(1.0, 2.0, 3.0, 4.0).unwrap()).unwrap();
        let before = *doc.node(id).unwrap().frame();

        let bad = before.translated(f32::NAN, 0.0);
        let err = doc.set_frame(id, bad).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_FRAME");
        assert_eq!(*doc.node(id).unwrap().frame(), before);
    }

    #[test]
    fn test_move_node_rejects_infinite_offset() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();

        let err = doc.move_node(id, f32::INFINITY, 0.0).unwrap_err();
        assert!(matches!(err, TouchMcuError::InvalidFrame { .. }));
        assert_eq!(*doc.node(id).unwrap().frame(), Rect::sized(10.0, 10.0).unwrap());
    }

    #[test]
    fn test_finalise_checks_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tosc");
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();
        doc.nodes[id.0].frame = Rect::sized(10.0, 10.0).unwrap().translated(0.0, f32::INFINITY);

        assert_eq!(doc.finalise().unwrap_err().error_code(), "INVALID_FRAME");
        assert!(doc.save(&path).is_err());
        assert!(!path.exists());
        assert!(!doc.is_sealed());
    }

    #[test]
    fn test_finalise_failure_applies_no_defaults() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let first = leaf(&mut doc, root, "first").unwrap();
        doc.add_child(
            root,
            "pager",
            ControlKind::Pager,
            Rect::sized(100.0, 100.0).unwrap(),
            Properties::new(),
        )
        .unwrap();

        assert!(doc.finalise().is_err());
        let node = doc.node(first).unwrap();
        assert!(node.property("visible").is_none());
        assert!(node.property("interactive").is_none());
        assert!(node.uid().is_none());
        assert!(doc.node(root).unwrap().property("visible").is_none());
    }

    #[test]
    fn test_page_outside_pager_rejected() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let err = doc
            .add_child(
                root,
                "page",
                ControlKind::Page,
                Rect::sized(10.0, 10.0).unwrap(),
                props([("tabLabel", "One")]),
            )
            .unwrap_err();

        assert!(matches!(err, TouchMcuError::InvalidParent { ref path, .. } if path == "root/page"));
        assert!(doc.node(root).unwrap().children().is_empty());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_pager_holds_only_pages() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let pager = doc
            .add_child(
                root,
                "pager",
                ControlKind::Pager,
                Rect::sized(100.0, 100.0).unwrap(),
                props([("tabbarSize", 30.0_f32)]),
            )
            .unwrap();

        let err = doc
            .add_child(
                pager,
                "group",
                ControlKind::Group,
                Rect::sized(10.0, 10.0).unwrap(),
                Properties::new(),
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARENT");
        assert!(doc.node(pager).unwrap().children().is_empty());

        doc.add_child(
            pager,
            "page",
            ControlKind::Page,
            Rect::sized(10.0, 10.0).unwrap(),
            props([("tabLabel", "One")]),
        )
        .unwrap();
        assert_eq!(doc.node(pager).unwrap().children().len(), 1);
    }

    #[test]
    fn test_finalise_assigns_ids_and_defaults() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();
        doc.finalise().unwrap();

        let node = doc.node(id).unwrap();
        assert!(node.uid().is_some());
        assert_eq!(node.property("interactive").and_then(|v| v.as_bool()), Some(true));
        assert_eq!(node.property("visible").and_then(|v| v.as_bool()), Some(true));

        let uid = node.uid().map(str::to_string);
        let snapshot = doc.clone();
        doc.finalise().unwrap();
        assert_eq!(doc.node(id).unwrap().uid().map(str::to_string), uid);
        assert_eq!(
            doc.node(id).unwrap().properties(),
            snapshot.node(id).unwrap().properties()
        );
    }

    #[test]
    fn test_finalise_keeps_explicit_values() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();
        doc.set_property(id, "interactive", false).unwrap();
        doc.finalise().unwrap();
        assert_eq!(
            doc.node(id).unwrap().property("interactive"),
            Some(&PropertyValue::Boolean(false))
        );
    }

    #[test]
    fn test_finalise_requires_pager_properties() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        doc.add_child(
            root,
            "pager",
            ControlKind::Pager,
            Rect::sized(100.0, 100.0).unwrap(),
            Properties::new(),
        )
        .unwrap();
        let err = doc.finalise().unwrap_err();
        assert!(matches!(err, TouchMcuError::MissingProperty { ref key, .. } if key == "tabbarSize"));
        assert!(!doc.is_finalised());
    }

    #[test]
    fn test_midi_values_only_under_midi_key() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        let id = leaf(&mut doc, root, "btn").unwrap();
        doc.set_property(id, "label", Vec::<MidiMessage>::new()).unwrap();
        assert_eq!(doc.finalise().unwrap_err().error_code(), "INVALID_PROPERTY");

        doc.set_property(id, "label", "ok").unwrap();
        doc.set_property(id, MIDI_KEY, "not midi").unwrap();
        assert_eq!(doc.finalise().unwrap_err().error_code(), "INVALID_PROPERTY");
    }

    #[test]
    fn test_mutation_after_finalise_reopens() {
        let mut doc = Document::new(100.0, 100.0).unwrap();
        doc.finalise().unwrap();
        assert!(doc.is_finalised());
        let root = doc.root();
        leaf(&mut doc, root, "late").unwrap();
        assert!(!doc.is_finalised());
        doc.finalise().unwrap();
        let late = doc.find("late").unwrap();
        assert!(doc.node(late).unwrap().uid().is_some());
    }

    #[test]
    fn test_save_seals_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tosc");
        let mut doc = Document::new(100.0, 100.0).unwrap();
        let root = doc.root();
        leaf(&mut doc, root, "btn").unwrap();

        let report = doc.save(&path).unwrap();
        assert!(path.exists());
        assert_eq!(report.bytes as u64, std::fs::metadata(&path).unwrap().len());
        assert_eq!(report.sha256.len(), 64);
        assert!(doc.is_sealed());

        assert!(matches!(doc.save(&path), Err(TouchMcuError::DocumentSealed)));
        assert!(matches!(
            leaf(&mut doc, root, "more"),
            Err(TouchMcuError::DocumentSealed)
        ));
    }
}
