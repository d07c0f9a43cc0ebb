//! Document -> lexml -> zlib.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::LEXML_VERSION;
use crate::error::{Result, TouchMcuError};
use crate::layout::{Color, Document, MidiMessage, NodeId, PropertyValue, Rect, MIDI_KEY};

/// Serialize a finalised document to compressed `.tosc` bytes.
pub fn encode(doc: &Document) -> Result<Vec<u8>> {
    let xml = to_xml(doc)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(xml.as_bytes())?;
    Ok(encoder.finish()?)
}

/// Serialize a finalised document to its uncompressed XML form.
pub fn to_xml(doc: &Document) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("lexml").with_attributes([("version", LEXML_VERSION)]),
    ))?;
    write_node(&mut writer, doc, doc.root())?;
    writer.write_event(Event::End(BytesEnd::new("lexml")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| TouchMcuError::MalformedDocument {
        reason: e.to_string(),
    })
}

type XmlWriter = Writer<Vec<u8>>;

fn write_node(w: &mut XmlWriter, doc: &Document, id: NodeId) -> Result<()> {
    let node = doc.node(id)?;
    let uid = node.uid().ok_or_else(|| TouchMcuError::MissingProperty {
        path: doc.path(id).unwrap_or_default(),
        kind: node.kind().to_string(),
        key: "ID".to_string(),
    })?;

    w.write_event(Event::Start(
        BytesStart::new("node").with_attributes([("ID", uid), ("type", node.kind().type_name())]),
    ))?;

    start(w, "properties")?;
    write_property(w, "name", &PropertyValue::String(node.name().to_string()))?;
    write_property(w, "frame", &PropertyValue::Frame(*node.frame()))?;
    for (key, value) in node.properties() {
        if key != MIDI_KEY {
            write_property(w, key, value)?;
        }
    }
    end(w, "properties")?;

    if let Some(messages) = node.property(MIDI_KEY).and_then(PropertyValue::as_midi) {
        start(w, "messages")?;
        for message in messages {
            write_midi(w, message)?;
        }
        end(w, "messages")?;
    }

    if !node.children().is_empty() {
        start(w, "children")?;
        for child in node.children() {
            write_node(w, doc, *child)?;
        }
        end(w, "children")?;
    }

    end(w, "node")
}

fn write_property(w: &mut XmlWriter, key: &str, value: &PropertyValue) -> Result<()> {
    w.write_event(Event::Start(
        BytesStart::new("property").with_attributes([("type", value.type_tag())]),
    ))?;
    start(w, "key")?;
    cdata(w, key)?;
    end(w, "key")?;

    start(w, "value")?;
    match value {
        PropertyValue::String(s) => cdata(w, s)?,
        PropertyValue::Integer(i) => text(w, &i.to_string())?,
        PropertyValue::Float(f) => text(w, &f.to_string())?,
        PropertyValue::Boolean(b) => text(w, flag(*b))?,
        PropertyValue::Frame(rect) => write_rect(w, rect)?,
        PropertyValue::Color(color) => write_color(w, color)?,
        PropertyValue::Midi(_) => {
            return Err(TouchMcuError::InvalidProperty {
                path: String::new(),
                key: key.to_string(),
                reason: format!("MIDI bindings belong under '{MIDI_KEY}' only"),
            })
        }
    }
    end(w, "value")?;
    end(w, "property")
}

fn write_rect(w: &mut XmlWriter, rect: &Rect) -> Result<()> {
    element(w, "x", &rect.x().to_string())?;
    element(w, "y", &rect.y().to_string())?;
    element(w, "w", &rect.w().to_string())?;
    element(w, "h", &rect.h().to_string())
}

fn write_color(w: &mut XmlWriter, color: &Color) -> Result<()> {
    element(w, "r", &color.r.to_string())?;
    element(w, "g", &color.g.to_string())?;
    element(w, "b", &color.b.to_string())?;
    element(w, "a", &color.a.to_string())
}

fn write_midi(w: &mut XmlWriter, message: &MidiMessage) -> Result<()> {
    start(w, "midi")?;
    element(w, "enabled", "1")?;
    element(w, "send", flag(message.send))?;
    element(w, "receive", flag(message.receive))?;
    element(w, "feedback", flag(message.feedback))?;
    element(w, "type", message.kind.as_str())?;
    element(w, "channel", &message.channel.as_int().to_string())?;
    element(w, "data1", &message.number.as_int().to_string())?;
    end(w, "midi")
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn start(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text(w: &mut XmlWriter, content: &str) -> Result<()> {
    w.write_event(Event::Text(BytesText::new(content)))?;
    Ok(())
}

fn element(w: &mut XmlWriter, name: &str, content: &str) -> Result<()> {
    start(w, name)?;
    text(w, content)?;
    end(w, name)
}

/// Write `content` as CDATA, splitting any embedded terminator.
fn cdata(w: &mut XmlWriter, content: &str) -> Result<()> {
    let mut rest = content;
    while let Some(pos) = rest.find("]]>") {
        w.write_event(Event::CData(BytesCData::new(&rest[..pos + 2])))?;
        rest = &rest[pos + 2..];
    }
    w.write_event(Event::CData(BytesCData::new(rest)))?;
    Ok(())
}
