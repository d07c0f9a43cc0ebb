//! Building blocks shared by the factories.

use crate::error::Result;
use crate::layout::{
    props, Color, ControlKind, Document, MidiMessage, NodeId, PropertyValue, Rect, LCD_TEXT,
    MIDI_KEY, PANEL,
};
use crate::mcu::{McuController, McuNote};
use crate::overlay::{Entry, Section};

/// Button colour when an entry names none.
pub const DEFAULT_BUTTON: Color = Color::rgb(0.5, 0.5, 0.5);

/// Alpha applied to disabled controls.
const DISABLED_ALPHA: f32 = 0.25;

/// Cells laid out left to right, top to bottom.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub columns: usize,
    pub cell_w: f32,
    pub cell_h: f32,
    pub gap: f32,
    pub x: f32,
    pub y: f32,
}

impl Grid {
    pub fn new(columns: usize, cell_w: f32, cell_h: f32) -> Self {
        Self {
            columns: columns.max(1),
            cell_w,
            cell_h,
            gap: 4.0,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn cell(&self, index: usize) -> Result<Rect> {
        let col = (index % self.columns) as f32;
        let row = (index / self.columns) as f32;
        Rect::new(
            self.x + col * (self.cell_w + self.gap),
            self.y + row * (self.cell_h + self.gap),
            self.cell_w,
            self.cell_h,
        )
    }
}

/// Empty panel that a factory fills; positioned at its own origin.
pub fn cluster(doc: &mut Document, parent: NodeId, name: &str, w: f32, h: f32) -> Result<NodeId> {
    doc.add_child(
        parent,
        name,
        ControlKind::Group,
        Rect::sized(w, h)?,
        props([("background", PropertyValue::from(true)), ("color", PANEL.into())]),
    )
}

/// Static text.
pub fn label(
    doc: &mut Document,
    parent: NodeId,
    name: &str,
    frame: Rect,
    text: &str,
    text_size: i64,
) -> Result<NodeId> {
    doc.add_child(
        parent,
        name,
        ControlKind::Label,
        frame,
        props([
            ("text", PropertyValue::from(text)),
            ("textSize", text_size.into()),
            ("textColor", LCD_TEXT.into()),
        ]),
    )
}

/// A button bound to an MCU note, with a caption label on top of it.
pub fn note_button(
    doc: &mut Document,
    parent: NodeId,
    name: &str,
    frame: Rect,
    caption: &str,
    color: Color,
    enabled: bool,
    note: McuNote,
) -> Result<NodeId> {
    let color = if enabled {
        color
    } else {
        color.with_alpha(DISABLED_ALPHA)
    };
    let button = doc.add_child(
        parent,
        name,
        ControlKind::Button,
        frame,
        props([
            ("color", PropertyValue::from(color)),
            ("buttonType", 0_i64.into()),
            ("outline", true.into()),
        ]),
    )?;
    doc.set_property(button, MIDI_KEY, vec![note.message()])?;
    if !enabled {
        doc.set_property(button, "interactive", false)?;
    }
    label(doc, parent, &format!("{name}_label"), frame, caption, 12)?;
    Ok(button)
}

/// Button configured by an overlay entry.
pub fn entry_button(
    doc: &mut Document,
    parent: NodeId,
    name: &str,
    frame: Rect,
    entry: &Entry,
    note: McuNote,
) -> Result<NodeId> {
    note_button(
        doc,
        parent,
        name,
        frame,
        &entry.label,
        entry.color.unwrap_or(DEFAULT_BUTTON),
        entry.enabled,
        note,
    )
}

/// Lay out one button per `(key, note)` pair, labelled from `section`.
pub fn button_grid(
    doc: &mut Document,
    parent: NodeId,
    section: &Section,
    buttons: &[(&str, McuNote)],
    grid: Grid,
) -> Result<Vec<NodeId>> {
    buttons
        .iter()
        .enumerate()
        .map(|(i, (key, note))| {
            let entry = section.entry(key)?;
            entry_button(doc, parent, key, grid.cell(i)?, entry, *note)
        })
        .collect()
}

/// Seven-segment style display: one label per digit, leftmost digit first.
///
/// `digit(k)` yields the controller for digit `k`, where 0 is rightmost.
pub fn digit_display<F>(
    doc: &mut Document,
    parent: NodeId,
    count: u8,
    grid: Grid,
    digit: F,
) -> Result<()>
where
    F: Fn(u8) -> McuController,
{
    for slot in 0..count {
        let k = count - 1 - slot;
        let id = label(
            doc,
            parent,
            &format!("digit_{k}"),
            grid.cell(slot as usize)?,
            "0",
            (grid.cell_h * 0.6) as i64,
        )?;
        doc.set_property(id, MIDI_KEY, vec![digit(k).receive()])?;
    }
    Ok(())
}

/// Fader sending pitch bend, plus a touch note when given.
pub fn fader(
    doc: &mut Document,
    parent: NodeId,
    name: &str,
    frame: Rect,
    color: Color,
    bend: MidiMessage,
    touch: McuNote,
) -> Result<NodeId> {
    let id = doc.add_child(
        parent,
        name,
        ControlKind::Fader,
        frame,
        props([
            ("color", PropertyValue::from(color)),
            ("orientation", 0_i64.into()),
            ("response", 1_i64.into()),
        ]),
    )?;
    doc.set_property(id, MIDI_KEY, vec![bend, touch.message().send_only()])?;
    Ok(id)
}
