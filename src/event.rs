//! MIDI event model and the per-tick event buffer

use serde::Serialize;

/// One event produced during a tick.
///
/// Consumers map octave + note to a MIDI note number as `12 * octave + note`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Note on, with the scheduler expected to send the matching note off
    /// after `duration` ticks.
    Note {
        channel: u8,
        octave: u8,
        note: u8,
        velocity: u8,
        duration: u8,
        mono: bool,
    },
    /// Control change.
    Cc { channel: u8, control: u8, value: u8 },
    /// Pitch bend.
    PitchBend { channel: u8, msb: u8, lsb: u8 },
}

impl Event {
    /// MIDI note number of a `Note` event, `None` for other kinds.
    pub fn midi_note_number(&self) -> Option<u8> {
        match self {
            Event::Note { octave, note, .. } => Some(octave * 12 + note),
            _ => None,
        }
    }
}

/// Append-only, ordered list of the events generated during one tick.
///
/// The list is owned by the caller, filled by the evaluator, and drained
/// between ticks.
#[derive(Debug, Default, Clone)]
pub struct EventList {
    events: Vec<Event>,
}

impl EventList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Take every event out of the list, leaving it empty.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
