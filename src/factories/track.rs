//! Channel strip: LCD, v-pot, strip buttons and fader for one MCU channel.

use super::widgets::{cluster, fader, label, note_button};
use crate::error::{Result, TouchMcuError};
use crate::layout::{props, Color, ControlKind, Document, NodeId, PropertyValue, Rect, MIDI_KEY};
use crate::mcu::{self, McuController, McuNote, STRIP_COUNT};
use crate::overlay::Overlay;

pub const STRIP_WIDTH: f32 = 100.0;
pub const STRIP_HEIGHT: f32 = 734.0;

const STRIP_BUTTON_TOP: f32 = 156.0;
const STRIP_BUTTON_STEP: f32 = 44.0;

/// Build strip `index` as a group named `track_{index}`.
pub fn track(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    index: Option<usize>,
) -> Result<NodeId> {
    let index = index.ok_or_else(|| TouchMcuError::MissingKey {
        key: "tracks[index]".to_string(),
    })?;
    if index >= STRIP_COUNT {
        return Err(TouchMcuError::MissingKey {
            key: format!("tracks[{index}]"),
        });
    }
    let entry = overlay.track(index)?;
    let strip = index as u8;

    let group = cluster(doc, parent, &format!("track_{index}"), STRIP_WIDTH, STRIP_HEIGHT)?;

    label(doc, group, "lcd", Rect::new(0.0, 0.0, 100.0, 40.0)?, &entry.label, 12)?;

    let vpot = doc.add_child(
        group,
        "vpot",
        ControlKind::Radial,
        Rect::new(10.0, 44.0, 80.0, 80.0)?,
        props([
            ("color", PropertyValue::from(entry.color)),
            ("inverted", false.into()),
            ("centered", true.into()),
        ]),
    )?;
    doc.set_property(
        vpot,
        MIDI_KEY,
        vec![
            McuController::VPotRotation(strip).send(),
            McuController::VPotRing(strip).receive(),
        ],
    )?;

    note_button(
        doc,
        group,
        "vpot_select",
        Rect::new(10.0, 128.0, 80.0, 24.0)?,
        "PUSH",
        entry.color,
        entry.enabled,
        McuNote::VPotSelect(strip),
    )?;

    let buttons = [
        ("rec", "REC", Color::rgb(1.0, 0.0, 0.0), McuNote::RecArm(strip)),
        ("solo", "SOLO", Color::rgb(1.0, 0.8, 0.0), McuNote::Solo(strip)),
        ("mute", "MUTE", Color::rgb(1.0, 0.5, 0.0), McuNote::Mute(strip)),
        ("select", "SELECT", entry.color, McuNote::Select(strip)),
    ];
    for (row, (name, caption, color, note)) in buttons.into_iter().enumerate() {
        let y = STRIP_BUTTON_TOP + row as f32 * STRIP_BUTTON_STEP;
        note_button(
            doc,
            group,
            name,
            Rect::new(10.0, y, 80.0, 40.0)?,
            caption,
            color,
            entry.enabled,
            note,
        )?;
    }

    let slider = fader(
        doc,
        group,
        "fader",
        Rect::new(20.0, 336.0, 60.0, 398.0)?,
        entry.color,
        mcu::fader(strip),
        McuNote::FaderTouch(strip),
    )?;

    if !entry.enabled {
        doc.set_property(vpot, "interactive", false)?;
        doc.set_property(slider, "interactive", false)?;
    }
    Ok(group)
}
