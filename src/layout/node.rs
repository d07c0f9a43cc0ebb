//! Control nodes stored in the document arena.

use std::fmt;

use super::{Properties, PropertyValue, Rect};

/// Index of a node inside its [`Document`](super::Document)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant of a control node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Group,
    Button,
    Label,
    Fader,
    Encoder,
    Radial,
    Text,
    Box,
    Pager,
    /// Child of a pager; written as a group.
    Page,
}

impl ControlKind {
    /// Type name used in the document format
    pub fn type_name(&self) -> &'static str {
        match self {
            ControlKind::Group | ControlKind::Page => "GROUP",
            ControlKind::Button => "BUTTON",
            ControlKind::Label => "LABEL",
            ControlKind::Fader => "FADER",
            ControlKind::Encoder => "ENCODER",
            ControlKind::Radial => "RADIAL",
            ControlKind::Text => "TEXT",
            ControlKind::Box => "BOX",
            ControlKind::Pager => "PAGER",
        }
    }

    /// Inverse of [`type_name`](Self::type_name); groups under a pager are pages.
    pub fn from_type_name(name: &str, parent_is_pager: bool) -> Option<Self> {
        let kind = match name {
            "GROUP" if parent_is_pager => ControlKind::Page,
            "GROUP" => ControlKind::Group,
            "BUTTON" => ControlKind::Button,
            "LABEL" => ControlKind::Label,
            "FADER" => ControlKind::Fader,
            "ENCODER" => ControlKind::Encoder,
            "RADIAL" => ControlKind::Radial,
            "TEXT" => ControlKind::Text,
            "BOX" => ControlKind::Box,
            "PAGER" => ControlKind::Pager,
            _ => return None,
        };
        Some(kind)
    }

    /// Properties a node of this kind must carry by finalise time
    pub fn required_properties(&self) -> &'static [&'static str] {
        match self {
            ControlKind::Pager => &["tabbarSize"],
            ControlKind::Page => &["tabLabel"],
            _ => &[],
        }
    }

    /// Whether the control reacts to touch by default
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            ControlKind::Button
                | ControlKind::Fader
                | ControlKind::Encoder
                | ControlKind::Radial
                | ControlKind::Pager
        )
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlKind::Page => "page",
            ControlKind::Pager => "pager",
            ControlKind::Group => "group",
            ControlKind::Button => "button",
            ControlKind::Label => "label",
            ControlKind::Fader => "fader",
            ControlKind::Encoder => "encoder",
            ControlKind::Radial => "radial",
            ControlKind::Text => "text",
            ControlKind::Box => "box",
        };
        f.write_str(name)
    }
}

/// Property keys owned by the node itself rather than its bag.
pub const RESERVED_KEYS: [&str; 3] = ["name", "frame", "ID"];

/// One UI region or widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlNode {
    pub(crate) name: String,
    pub(crate) kind: ControlKind,
    pub(crate) frame: Rect,
    pub(crate) properties: Properties,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    /// Assigned during finalise.
    pub(crate) uid: Option<String>,
}

impl ControlNode {
    pub(crate) fn new(
        name: String,
        kind: ControlKind,
        frame: Rect,
        properties: Properties,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            name,
            kind,
            frame,
            properties,
            children: Vec::new(),
            parent,
            uid: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn frame(&self) -> &Rect {
        &self.frame
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Stable identifier, present once the document is finalised.
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_roundtrip() {
        for kind in [
            ControlKind::Group,
            ControlKind::Button,
            ControlKind::Label,
            ControlKind::Fader,
            ControlKind::Encoder,
            ControlKind::Radial,
            ControlKind::Text,
            ControlKind::Box,
            ControlKind::Pager,
        ] {
            assert_eq!(ControlKind::from_type_name(kind.type_name(), false), Some(kind));
        }
        assert_eq!(
            ControlKind::from_type_name("GROUP", true),
            Some(ControlKind::Page)
        );
        assert_eq!(ControlKind::from_type_name("XY", false), None);
    }

    #[test]
    fn test_required_properties() {
        assert_eq!(ControlKind::Pager.required_properties(), &["tabbarSize"]);
        assert_eq!(ControlKind::Page.required_properties(), &["tabLabel"]);
        assert!(ControlKind::Button.required_properties().is_empty());
    }
}
