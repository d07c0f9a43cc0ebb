//! Mackie Control Universal catalog
//!
//! Maps logical controls to the note and controller numbers the MCU
//! protocol uses. Buttons are note-on messages on channel 1 (index 0),
//! faders are pitch bend on the strip's own channel, v-pots and displays
//! are control changes.

use midly::num::{u4, u7};

use crate::layout::MidiMessage;

/// Number of channel strips on a surface.
pub const STRIP_COUNT: usize = 8;

/// Pitch-bend channel of the master fader.
pub const MASTER_FADER_CHANNEL: u8 = 8;

/// Channel used for button and controller messages.
pub const BUTTON_CHANNEL: u8 = 0;

/// Buttons and touch sensors, identified by MCU note number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McuNote {
    RecArm(u8),
    Solo(u8),
    Mute(u8),
    Select(u8),
    VPotSelect(u8),
    AssignTrack,
    AssignSend,
    AssignPan,
    AssignPlugin,
    AssignEq,
    AssignInstrument,
    BankLeft,
    BankRight,
    ChannelLeft,
    ChannelRight,
    Flip,
    GlobalView,
    NameValue,
    SmpteBeats,
    Function(u8),
    MidiTracks,
    Inputs,
    AudioTracks,
    AudioInstruments,
    Aux,
    Busses,
    Outputs,
    User,
    Shift,
    Option,
    Control,
    Alt,
    Read,
    Write,
    Trim,
    Touch,
    Latch,
    Group,
    Save,
    Undo,
    Cancel,
    Enter,
    Marker,
    Nudge,
    Cycle,
    Drop,
    Replace,
    Click,
    SoloMode,
    Rewind,
    FastForward,
    Stop,
    Play,
    Record,
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    Zoom,
    Scrub,
    FaderTouch(u8),
    MasterTouch,
}

impl McuNote {
    /// Note number. Strip-indexed variants wrap within their bank of eight.
    pub fn number(&self) -> u8 {
        let strip = |base: u8, index: u8| base + index % STRIP_COUNT as u8;
        match *self {
            McuNote::RecArm(i) => strip(0, i),
            McuNote::Solo(i) => strip(8, i),
            McuNote::Mute(i) => strip(16, i),
            McuNote::Select(i) => strip(24, i),
            McuNote::VPotSelect(i) => strip(32, i),
            McuNote::AssignTrack => 40,
            McuNote::AssignSend => 41,
            McuNote::AssignPan => 42,
            McuNote::AssignPlugin => 43,
            McuNote::AssignEq => 44,
            McuNote::AssignInstrument => 45,
            McuNote::BankLeft => 46,
            McuNote::BankRight => 47,
            McuNote::ChannelLeft => 48,
            McuNote::ChannelRight => 49,
            McuNote::Flip => 50,
            McuNote::GlobalView => 51,
            McuNote::NameValue => 52,
            McuNote::SmpteBeats => 53,
            McuNote::Function(i) => strip(54, i),
            McuNote::MidiTracks => 62,
            McuNote::Inputs => 63,
            McuNote::AudioTracks => 64,
            McuNote::AudioInstruments => 65,
            McuNote::Aux => 66,
            McuNote::Busses => 67,
            McuNote::Outputs => 68,
            McuNote::User => 69,
            McuNote::Shift => 70,
            McuNote::Option => 71,
            McuNote::Control => 72,
            McuNote::Alt => 73,
            McuNote::Read => 74,
            McuNote::Write => 75,
            McuNote::Trim => 76,
            McuNote::Touch => 77,
            McuNote::Latch => 78,
            McuNote::Group => 79,
            McuNote::Save => 80,
            McuNote::Undo => 81,
            McuNote::Cancel => 82,
            McuNote::Enter => 83,
            McuNote::Marker => 84,
            McuNote::Nudge => 85,
            McuNote::Cycle => 86,
            McuNote::Drop => 87,
            McuNote::Replace => 88,
            McuNote::Click => 89,
            McuNote::SoloMode => 90,
            McuNote::Rewind => 91,
            McuNote::FastForward => 92,
            McuNote::Stop => 93,
            McuNote::Play => 94,
            McuNote::Record => 95,
            McuNote::CursorUp => 96,
            McuNote::CursorDown => 97,
            McuNote::CursorLeft => 98,
            McuNote::CursorRight => 99,
            McuNote::Zoom => 100,
            McuNote::Scrub => 101,
            McuNote::FaderTouch(i) => strip(104, i),
            McuNote::MasterTouch => 112,
        }
    }

    pub fn note(&self) -> u7 {
        u7::from(self.number())
    }

    /// Two-way binding: the button sends and the host lights it.
    pub fn message(&self) -> MidiMessage {
        MidiMessage::note(u4::from(BUTTON_CHANNEL), self.note())
    }
}

/// Controllers (CC numbers) used by v-pots, the jog wheel and displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McuController {
    VPotRotation(u8),
    VPotRing(u8),
    JogWheel,
    /// Timecode digit, 0 = rightmost.
    TimecodeDigit(u8),
    /// Assignment display digit, 0 = right.
    AssignmentDigit(u8),
}

/// Number of digits in the timecode display.
pub const TIMECODE_DIGITS: u8 = 10;

/// Number of digits in the assignment display.
pub const ASSIGNMENT_DIGITS: u8 = 2;

impl McuController {
    pub fn number(&self) -> u8 {
        match *self {
            McuController::VPotRotation(i) => 16 + i % STRIP_COUNT as u8,
            McuController::VPotRing(i) => 48 + i % STRIP_COUNT as u8,
            McuController::JogWheel => 60,
            McuController::TimecodeDigit(i) => 64 + i % TIMECODE_DIGITS,
            McuController::AssignmentDigit(i) => 74 + i % ASSIGNMENT_DIGITS,
        }
    }

    pub fn controller(&self) -> u7 {
        u7::from(self.number())
    }

    /// Outgoing relative turns.
    pub fn send(&self) -> MidiMessage {
        MidiMessage::control_change(u4::from(BUTTON_CHANNEL), self.controller()).send_only()
    }

    /// Host-driven display feedback.
    pub fn receive(&self) -> MidiMessage {
        MidiMessage::control_change(u4::from(BUTTON_CHANNEL), self.controller()).receive_only()
    }
}

/// Pitch-bend binding of a channel fader (or the master at channel 8).
pub fn fader(channel: u8) -> MidiMessage {
    MidiMessage::pitch_bend(u4::from(channel.min(15)))
}
