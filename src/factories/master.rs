//! Clusters on the right of the tracks page: displays, bank navigation and
//! the master fader.

use super::widgets::{button_grid, cluster, digit_display, fader, label, Grid};
use crate::error::Result;
use crate::layout::{Color, Document, NodeId, Rect};
use crate::mcu::{self, McuController, McuNote, ASSIGNMENT_DIGITS, MASTER_FADER_CHANNEL, TIMECODE_DIGITS};
use crate::overlay::Overlay;

/// Timecode readout with the display mode buttons below it.
pub fn timecode(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("timecode")?;
    let group = cluster(doc, parent, "timecode", 200.0, 100.0)?;

    let mut digits = Grid::new(TIMECODE_DIGITS as usize, 20.0, 60.0);
    digits.gap = 0.0;
    digit_display(doc, group, TIMECODE_DIGITS, digits, McuController::TimecodeDigit)?;

    button_grid(
        doc,
        group,
        section,
        &[
            ("name_value", McuNote::NameValue),
            ("smpte_beats", McuNote::SmpteBeats),
        ],
        Grid::new(2, 98.0, 36.0).at(0.0, 64.0),
    )?;
    Ok(group)
}

/// Two-digit assignment display over the six v-pot assignment buttons.
pub fn assignment(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("assignment")?;
    let group = cluster(doc, parent, "assignment", 200.0, 230.0)?;

    let mut digits = Grid::new(ASSIGNMENT_DIGITS as usize, 40.0, 50.0).at(60.0, 0.0);
    digits.gap = 0.0;
    digit_display(doc, group, ASSIGNMENT_DIGITS, digits, McuController::AssignmentDigit)?;

    button_grid(doc, group, section, &ASSIGNMENT_BUTTONS, Grid::new(2, 98.0, 52.0).at(0.0, 58.0))?;
    Ok(group)
}

pub(crate) const ASSIGNMENT_BUTTONS: [(&str, McuNote); 6] = [
    ("track", McuNote::AssignTrack),
    ("send", McuNote::AssignSend),
    ("pan", McuNote::AssignPan),
    ("plugin", McuNote::AssignPlugin),
    ("eq", McuNote::AssignEq),
    ("instrument", McuNote::AssignInstrument),
];

/// Bank and channel shifting plus flip, stacked vertically.
pub fn fader_banks(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("fader_banks")?;
    let group = cluster(doc, parent, "fader_banks", 100.0, 392.0)?;

    let mut grid = Grid::new(1, 100.0, 60.0);
    grid.gap = 6.0;
    button_grid(
        doc,
        group,
        section,
        &[
            ("bank_left", McuNote::BankLeft),
            ("bank_right", McuNote::BankRight),
            ("channel_left", McuNote::ChannelLeft),
            ("channel_right", McuNote::ChannelRight),
            ("flip", McuNote::Flip),
        ],
        grid,
    )?;
    Ok(group)
}

/// Master fader on its own pitch-bend channel.
pub fn master_fader(
    doc: &mut Document,
    parent: NodeId,
    _overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let group = cluster(doc, parent, "master", 100.0, 392.0)?;
    label(doc, group, "title", Rect::new(0.0, 0.0, 100.0, 30.0)?, "MASTER", 14)?;
    fader(
        doc,
        group,
        "fader",
        Rect::new(20.0, 34.0, 60.0, 358.0)?,
        Color::rgb(0.9, 0.9, 0.9),
        mcu::fader(MASTER_FADER_CHANNEL),
        McuNote::MasterTouch,
    )?;
    Ok(group)
}
