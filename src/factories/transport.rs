//! Transport page clusters.

use super::master::ASSIGNMENT_BUTTONS;
use super::widgets::{button_grid, cluster, digit_display, label, Grid};
use crate::error::Result;
use crate::layout::{props, ControlKind, Document, NodeId, PropertyValue, Rect, MIDI_KEY, PANEL};
use crate::mcu::{McuController, McuNote, ASSIGNMENT_DIGITS, TIMECODE_DIGITS};
use crate::overlay::Overlay;

pub fn global_view(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("global_view")?;
    let group = cluster(doc, parent, "global_view", 662.0, 112.0)?;
    button_grid(
        doc,
        group,
        section,
        &[
            ("global_view", McuNote::GlobalView),
            ("midi_tracks", McuNote::MidiTracks),
            ("inputs", McuNote::Inputs),
            ("audio_tracks", McuNote::AudioTracks),
            ("audio_instruments", McuNote::AudioInstruments),
            ("aux", McuNote::Aux),
            ("busses", McuNote::Busses),
            ("outputs", McuNote::Outputs),
            ("user", McuNote::User),
        ],
        Grid::new(9, 70.0, 112.0),
    )?;
    Ok(group)
}

/// F1 to F8.
pub fn function_select(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("function_select")?;
    let group = cluster(doc, parent, "function_select", 668.0, 112.0)?;
    let keys: Vec<String> = (1..=8).map(|n| format!("f{n}")).collect();
    let buttons: Vec<(&str, McuNote)> = keys
        .iter()
        .enumerate()
        .map(|(i, key)| (key.as_str(), McuNote::Function(i as u8)))
        .collect();
    button_grid(doc, group, section, &buttons, Grid::new(8, 80.0, 112.0))?;
    Ok(group)
}

pub fn modifiers(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("modifiers")?;
    let group = cluster(doc, parent, "modifiers", 196.0, 176.0)?;
    button_grid(
        doc,
        group,
        section,
        &[
            ("shift", McuNote::Shift),
            ("option", McuNote::Option),
            ("control", McuNote::Control),
            ("alt", McuNote::Alt),
        ],
        Grid::new(2, 96.0, 86.0),
    )?;
    Ok(group)
}

pub fn automation(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("automation")?;
    let group = cluster(doc, parent, "automation", 275.0, 176.0)?;
    button_grid(
        doc,
        group,
        section,
        &[
            ("read", McuNote::Read),
            ("write", McuNote::Write),
            ("trim", McuNote::Trim),
            ("touch", McuNote::Touch),
            ("latch", McuNote::Latch),
            ("group", McuNote::Group),
        ],
        Grid::new(3, 89.0, 86.0),
    )?;
    Ok(group)
}

pub fn utilities(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("utilities")?;
    let group = cluster(doc, parent, "utilities", 192.0, 176.0)?;
    button_grid(
        doc,
        group,
        section,
        &[
            ("save", McuNote::Save),
            ("undo", McuNote::Undo),
            ("cancel", McuNote::Cancel),
            ("enter", McuNote::Enter),
        ],
        Grid::new(2, 94.0, 86.0),
    )?;
    Ok(group)
}

/// Marker/edit row on top, the large play controls below.
pub fn transport(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("transport")?;
    let group = cluster(doc, parent, "transport", 671.0, 308.0)?;
    button_grid(
        doc,
        group,
        section,
        &[
            ("marker", McuNote::Marker),
            ("nudge", McuNote::Nudge),
            ("cycle", McuNote::Cycle),
            ("drop", McuNote::Drop),
            ("replace", McuNote::Replace),
            ("click", McuNote::Click),
            ("solo", McuNote::SoloMode),
        ],
        Grid::new(7, 92.0, 100.0),
    )?;
    button_grid(
        doc,
        group,
        section,
        &[
            ("rewind", McuNote::Rewind),
            ("fast_forward", McuNote::FastForward),
            ("stop", McuNote::Stop),
            ("play", McuNote::Play),
            ("record", McuNote::Record),
        ],
        Grid::new(5, 131.0, 204.0).at(0.0, 104.0),
    )?;
    Ok(group)
}

/// Wide timecode readout. Named `timecode` so display updates reach it.
pub fn transport_timecode(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("timecode")?;
    let group = cluster(doc, parent, "timecode", 344.0, 116.0)?;

    let mut digits = Grid::new(TIMECODE_DIGITS as usize, 34.0, 76.0);
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
        Grid::new(2, 168.0, 36.0).at(0.0, 80.0),
    )?;
    Ok(group)
}

pub fn transport_assignment(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("assignment")?;
    let group = cluster(doc, parent, "assignment", 342.0, 112.0)?;

    let mut digits = Grid::new(ASSIGNMENT_DIGITS as usize, 40.0, 112.0);
    digits.gap = 0.0;
    digit_display(doc, group, ASSIGNMENT_DIGITS, digits, McuController::AssignmentDigit)?;

    button_grid(doc, group, section, &ASSIGNMENT_BUTTONS, Grid::new(3, 82.0, 54.0).at(88.0, 0.0))?;
    Ok(group)
}

/// Cursor keys, zoom, scrub and the jog wheel.
pub fn jog(
    doc: &mut Document,
    parent: NodeId,
    overlay: &Overlay,
    _index: Option<usize>,
) -> Result<NodeId> {
    let section = overlay.get("jog")?;
    let group = cluster(doc, parent, "jog", 344.0, 470.0)?;

    let mut keys = Grid::new(3, 100.0, 70.0);
    keys.gap = 22.0;
    button_grid(
        doc,
        group,
        section,
        &[
            ("zoom", McuNote::Zoom),
            ("up", McuNote::CursorUp),
            ("scrub", McuNote::Scrub),
            ("left", McuNote::CursorLeft),
            ("down", McuNote::CursorDown),
            ("right", McuNote::CursorRight),
        ],
        keys,
    )?;

    let wheel = doc.add_child(
        group,
        "jog_wheel",
        ControlKind::Encoder,
        Rect::new(22.0, 170.0, 300.0, 300.0)?,
        props([("color", PropertyValue::from(PANEL.with_alpha(0.8)))]),
    )?;
    doc.set_property(wheel, MIDI_KEY, vec![McuController::JogWheel.send()])?;
    label(doc, group, "jog_label", Rect::new(122.0, 300.0, 100.0, 40.0)?, "JOG", 14)?;
    Ok(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlaySource;

    fn overlay() -> Overlay {
        OverlaySource::new("does-not-exist").resolve("default").unwrap()
    }

    fn frame(doc: &Document, path: &str) -> Rect {
        *doc.node(doc.find(path).unwrap()).unwrap().frame()
    }

    #[test]
    fn test_transport_rows() {
        let mut doc = Document::new(1024.0, 738.0).unwrap();
        let root = doc.root();
        transport(&mut doc, root, &overlay(), None).unwrap();

        assert_eq!(frame(&doc, "transport/solo"), Rect::new(576.0, 0.0, 92.0, 100.0).unwrap());
        assert_eq!(frame(&doc, "transport/record"), Rect::new(540.0, 104.0, 131.0, 204.0).unwrap());
        let play = doc.find("transport/play").unwrap();
        let midi = doc.node(play).unwrap().property(MIDI_KEY).and_then(|v| v.as_midi()).unwrap();
        assert_eq!(midi[0].number.as_int(), 94);
    }

    #[test]
    fn test_function_keys() {
        let mut doc = Document::new(1024.0, 738.0).unwrap();
        let root = doc.root();
        function_select(&mut doc, root, &overlay(), None).unwrap();
        let f8 = doc.find("function_select/f8").unwrap();
        let midi = doc.node(f8).unwrap().property(MIDI_KEY).and_then(|v| v.as_midi()).unwrap();
        assert_eq!(midi[0].number.as_int(), 61);
    }

    #[test]
    fn test_jog_layout() {
        let mut doc = Document::new(1024.0, 738.0).unwrap();
        let root = doc.root();
        jog(&mut doc, root, &overlay(), None).unwrap();
        assert_eq!(frame(&doc, "jog/scrub"), Rect::new(244.0, 0.0, 100.0, 70.0).unwrap());
        assert_eq!(frame(&doc, "jog/down"), Rect::new(122.0, 92.0, 100.0, 70.0).unwrap());
    }

    #[test]
    fn test_clusters_fit_their_group() {
        let overlay = overlay();
        let mut doc = Document::new(1024.0, 738.0).unwrap();
        let root = doc.root();
        let builders: [crate::factories::FactoryFn; 9] = [
            global_view,
            function_select,
            modifiers,
            automation,
            utilities,
            transport,
            transport_timecode,
            transport_assignment,
            jog,
        ];
        for build in builders {
            let id = build(&mut doc, root, &overlay, None).unwrap();
            let bounds = *doc.node(id).unwrap().frame();
            for child in doc.node(id).unwrap().children() {
                let f = doc.node(*child).unwrap().frame();
                assert!(f.right() <= bounds.w() + 0.01, "{}", doc.path(*child).unwrap());
                assert!(f.bottom() <= bounds.h() + 0.01, "{}", doc.path(*child).unwrap());
            }
        }
    }
}
