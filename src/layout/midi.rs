//! MIDI messages attached to controls.

use midly::num::{u4, u7};

/// Which MIDI channel-voice message a control sends or listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiKind {
    Note,
    ControlChange,
    PitchBend,
}

impl MidiKind {
    /// Name used in the document format
    pub fn as_str(&self) -> &'static str {
        match self {
            MidiKind::Note => "NOTE_ON",
            MidiKind::ControlChange => "CONTROLCHANGE",
            MidiKind::PitchBend => "PITCHBEND",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOTE_ON" => Some(MidiKind::Note),
            "CONTROLCHANGE" => Some(MidiKind::ControlChange),
            "PITCHBEND" => Some(MidiKind::PitchBend),
            _ => None,
        }
    }
}

/// One MIDI binding of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiMessage {
    pub kind: MidiKind,
    pub channel: u4,
    /// Note or controller number; zero for pitch bend.
    pub number: u7,
    pub send: bool,
    pub receive: bool,
    pub feedback: bool,
}

impl MidiMessage {
    fn new(kind: MidiKind, channel: u4, number: u7) -> Self {
        Self {
            kind,
            channel,
            number,
            send: true,
            receive: true,
            feedback: false,
        }
    }

    pub fn note(channel: u4, note: u7) -> Self {
        Self::new(MidiKind::Note, channel, note)
    }

    pub fn control_change(channel: u4, controller: u7) -> Self {
        Self::new(MidiKind::ControlChange, channel, controller)
    }

    pub fn pitch_bend(channel: u4) -> Self {
        Self::new(MidiKind::PitchBend, channel, u7::from(0))
    }

    /// Only listen; used for displays driven by the host.
    pub fn receive_only(mut self) -> Self {
        self.send = false;
        self.receive = true;
        self
    }

    /// Only send; used for touch sensing.
    pub fn send_only(mut self) -> Self {
        self.send = true;
        self.receive = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in [MidiKind::Note, MidiKind::ControlChange, MidiKind::PitchBend] {
            assert_eq!(MidiKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MidiKind::parse("SYSEX"), None);
    }

    #[test]
    fn test_direction_helpers() {
        let msg = MidiMessage::control_change(u4::from(0), u7::from(64)).receive_only();
        assert!(!msg.send);
        assert!(msg.receive);

        let touch = MidiMessage::note(u4::from(0), u7::from(104)).send_only();
        assert!(touch.send);
        assert!(!touch.receive);
        assert_eq!(MidiMessage::pitch_bend(u4::from(3)).number.as_int(), 0);
    }
}
