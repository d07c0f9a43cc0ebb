//! Document Format Module
//!
//! TouchOSC `.tosc` files are zlib-compressed "lexml": nested `<node>`
//! elements carrying typed `<properties>`, MIDI `<messages>` and
//! `<children>`. String values are written as CDATA.

mod decode;
mod encode;

pub use decode::{decode, from_xml, read, NodeSnapshot};
pub use encode::{encode, to_xml};

/// Format version written on the root element.
pub const LEXML_VERSION: &str = "3";
