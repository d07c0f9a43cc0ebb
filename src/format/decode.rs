//! `.tosc` bytes -> node snapshots, for structural re-inspection.

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use midly::num::{u4, u7};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Result, TouchMcuError};
use crate::layout::{
    Color, ControlKind, MidiKind, MidiMessage, Properties, PropertyValue, Rect, MIDI_KEY,
};

/// A node as read back from a saved document
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub uid: String,
    pub kind: ControlKind,
    pub name: String,
    pub frame: Rect,
    /// Everything except `name` and `frame`; MIDI bindings under `midi`.
    pub properties: Properties,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn child(&self, name: &str) -> Option<&NodeSnapshot> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Resolve a `/`-separated path of names below this node.
    pub fn find(&self, path: &str) -> Option<&NodeSnapshot> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::count).sum::<usize>()
    }
}

/// Read a `.tosc` file from disk.
pub fn read(path: &Path) -> Result<NodeSnapshot> {
    let bytes = fs::read(path).map_err(|e| TouchMcuError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode(&bytes)
}

/// Decompress and parse `.tosc` bytes.
pub fn decode(bytes: &[u8]) -> Result<NodeSnapshot> {
    let mut xml = String::new();
    ZlibDecoder::new(bytes).read_to_string(&mut xml)?;
    from_xml(&xml)
}

/// Parse the uncompressed XML form.
pub fn from_xml(xml: &str) -> Result<NodeSnapshot> {
    let root = parse_elements(xml)?;
    if root.name != "lexml" {
        return Err(malformed(format!("unexpected root element <{}>", root.name)));
    }
    let node = root
        .child("node")
        .ok_or_else(|| malformed("document has no root node"))?;
    parse_node(node, false)
}

fn malformed(reason: impl Into<String>) -> TouchMcuError {
    TouchMcuError::MalformedDocument {
        reason: reason.into(),
    }
}

/// Minimal element tree built from the event stream.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(e: &quick_xml::events::BytesStart<'_>) -> Result<Self> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| malformed(err.to_string()))?;
            attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            ));
        }
        Ok(Self {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            attributes,
            ..Default::default()
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn required(&self, name: &str) -> Result<&Element> {
        self.child(name)
            .ok_or_else(|| malformed(format!("<{}> is missing <{}>", self.name, name)))
    }

    fn number<T: std::str::FromStr>(&self, name: &str) -> Result<T> {
        let raw = self.required(name)?.text.trim();
        raw.parse()
            .map_err(|_| malformed(format!("<{name}> is not a number: '{raw}'")))
    }
}

fn parse_elements(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(Element::from_start(&e)?),
            Event::Empty(e) => {
                let element = Element::from_start(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    let content =
                        std::str::from_utf8(&t).map_err(|e| malformed(e.to_string()))?;
                    top.text.push_str(content);
                }
            }
            Event::CData(c) => {
                if let Some(top) = stack.last_mut() {
                    let content =
                        std::str::from_utf8(&c).map_err(|e| malformed(e.to_string()))?;
                    top.text.push_str(content);
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed("unbalanced end tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(malformed("unexpected end of document"));
    }
    root.ok_or_else(|| malformed("empty document"))
}

fn parse_node(element: &Element, parent_is_pager: bool) -> Result<NodeSnapshot> {
    let type_name = element
        .attr("type")
        .ok_or_else(|| malformed("node without type"))?;
    let kind = ControlKind::from_type_name(type_name, parent_is_pager)
        .ok_or_else(|| malformed(format!("unknown node type '{type_name}'")))?;
    let uid = element
        .attr("ID")
        .ok_or_else(|| malformed("node without ID"))?
        .to_string();

    let mut properties = Properties::new();
    if let Some(list) = element.child("properties") {
        for property in list.children_named("property") {
            let key = property.required("key")?.text.clone();
            properties.insert(key, parse_value(property)?);
        }
    }

    let name = match properties.remove("name") {
        Some(PropertyValue::String(name)) => name,
        _ => return Err(malformed("node without a string name")),
    };
    let frame = match properties.remove("frame") {
        Some(PropertyValue::Frame(frame)) => frame,
        _ => return Err(malformed(format!("node '{name}' without a frame"))),
    };

    if let Some(messages) = element.child("messages") {
        let midi = messages
            .children_named("midi")
            .map(parse_midi)
            .collect::<Result<Vec<_>>>()?;
        properties.insert(MIDI_KEY.to_string(), PropertyValue::Midi(midi));
    }

    let children = match element.child("children") {
        Some(list) => list
            .children_named("node")
            .map(|child| parse_node(child, kind == ControlKind::Pager))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(NodeSnapshot {
        uid,
        kind,
        name,
        frame,
        properties,
        children,
    })
}

fn parse_value(property: &Element) -> Result<PropertyValue> {
    let tag = property
        .attr("type")
        .ok_or_else(|| malformed("property without type"))?;
    let value = property.required("value")?;
    let scalar = value.text.trim();

    let parsed = match tag {
        "s" => PropertyValue::String(value.text.clone()),
        "i" => PropertyValue::Integer(
            scalar
                .parse()
                .map_err(|_| malformed(format!("bad integer '{scalar}'")))?,
        ),
        "f" => PropertyValue::Float(
            scalar
                .parse()
                .map_err(|_| malformed(format!("bad float '{scalar}'")))?,
        ),
        "b" => PropertyValue::Boolean(scalar == "1"),
        "r" => PropertyValue::Frame(Rect::new(
            value.number("x")?,
            value.number("y")?,
            value.number("w")?,
            value.number("h")?,
        )?),
        "c" => PropertyValue::Color(Color::rgba(
            value.number("r")?,
            value.number("g")?,
            value.number("b")?,
            value.number("a")?,
        )),
        other => return Err(malformed(format!("unknown property type '{other}'"))),
    };
    Ok(parsed)
}

fn parse_midi(element: &Element) -> Result<MidiMessage> {
    let type_name = element.required("type")?.text.trim();
    let kind = MidiKind::parse(type_name)
        .ok_or_else(|| malformed(format!("unknown MIDI type '{type_name}'")))?;

    let channel: u8 = element.number("channel")?;
    let number: u8 = element.number("data1")?;
    if channel > 15 || number > 127 {
        return Err(malformed(format!(
            "MIDI value out of range: channel {channel}, data1 {number}"
        )));
    }
    let flag = |name: &str| -> Result<bool> { Ok(element.required(name)?.text.trim() == "1") };

    Ok(MidiMessage {
        kind,
        channel: u4::from(channel),
        number: u7::from(number),
        send: flag("send")?,
        receive: flag("receive")?,
        feedback: flag("feedback")?,
    })
}
