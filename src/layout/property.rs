//! Tagged property values carried by every control node.

use std::collections::BTreeMap;

use super::{Color, MidiMessage, Rect};

/// Ordered property bag; ordering keeps serialization deterministic.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Property key holding a node's MIDI bindings.
pub const MIDI_KEY: &str = "midi";

/// A single property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f32),
    Boolean(bool),
    Frame(Rect),
    Color(Color),
    Midi(Vec<MidiMessage>),
}

impl PropertyValue {
    /// Single-letter type tag used in the document format
    pub fn type_tag(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "s",
            PropertyValue::Integer(_) => "i",
            PropertyValue::Float(_) => "f",
            PropertyValue::Boolean(_) => "b",
            PropertyValue::Frame(_) => "r",
            PropertyValue::Color(_) => "c",
            PropertyValue::Midi(_) => "m",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            PropertyValue::Integer(i) => Some(*i as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_midi(&self) -> Option<&[MidiMessage]> {
        match self {
            PropertyValue::Midi(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<Rect> for PropertyValue {
    fn from(value: Rect) -> Self {
        PropertyValue::Frame(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        PropertyValue::Color(value)
    }
}

impl From<Vec<MidiMessage>> for PropertyValue {
    fn from(value: Vec<MidiMessage>) -> Self {
        PropertyValue::Midi(value)
    }
}

/// Build a property bag from `(key, value)` pairs.
pub fn props<K, V, I>(pairs: I) -> Properties
where
    K: Into<String>,
    V: Into<PropertyValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
