//! Layout Module
//!
//! The document tree and its coordinate model:
//! - Rectangles with in-place relative translation
//! - Control nodes with open, typed property bags
//! - The document root with finalise/save
//! - Pager and pages for tabbed navigation

mod color;
mod document;
mod frame;
mod midi;
mod node;
mod pager;
mod property;

pub use color::{Color, LCD_TEXT, PALETTE, PANEL};
pub use document::{Document, SaveReport, ROOT_NAME};
pub use frame::Rect;
pub use midi::{MidiKind, MidiMessage};
pub use node::{ControlKind, ControlNode, NodeId};
pub use pager::{Pager, TAB_BAR_SIZE};
pub use property::{props, Properties, PropertyValue, MIDI_KEY};
