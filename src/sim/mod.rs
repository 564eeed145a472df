//! The tick evaluator

pub mod oper;
pub mod state;

pub use state::SimState;

use crate::event::{Event, EventList};
use crate::field::glyph::VALUE_COUNT;
use crate::field::{Field, Glyph, Mark, MarkBuffer};

/// One simulation: the random seed plus every piece of state that survives
/// between ticks. The grid, marks and event list stay with the caller and
/// are borrowed for the duration of a tick.
#[derive(Debug, Default)]
pub struct Simulation {
    seed: usize,
    state: SimState,
}

impl Simulation {
    pub fn new(seed: usize) -> Self {
        Self {
            seed,
            state: SimState::default(),
        }
    }

    pub fn seed(&self) -> usize {
        self.seed
    }

    /// Drop the unique-random sequence so the next draw reshuffles.
    pub fn reset_unique_random(&mut self) {
        self.state.unique.reset();
    }

    /// Evaluate one tick.
    ///
    /// Clears `marks`, scans the grid row-major, dispatches every cell that
    /// is not empty and not masked, and appends the generated events to
    /// `events`. Writes made by an operator are visible to every cell
    /// dispatched after it in the same tick; the grid is never snapshotted.
    /// On tick 0 a MIDI panic is appended after the scan.
    pub fn run(
        &mut self,
        field: &mut Field,
        marks: &mut MarkBuffer,
        tick: usize,
        events: &mut EventList,
    ) {
        marks.clear();
        let mut vars = [Glyph::EMPTY; VALUE_COUNT];
        for y in 0..field.height() {
            for x in 0..field.width() {
                let glyph = field.get(y, x);
                if glyph.is_empty() {
                    continue;
                }
                if marks.get(y, x).intersects(Mark::MASKED) {
                    continue;
                }
                let mut ctx = OperContext {
                    field: &mut *field,
                    marks: &mut *marks,
                    vars: &mut vars,
                    events: &mut *events,
                    state: &mut self.state,
                    tick,
                    seed: self.seed,
                    y,
                    x,
                    glyph,
                };
                oper::dispatch(&mut ctx);
            }
        }
        if tick == 0 {
            midi_panic(events);
        }
    }
}

/// Silence everything: a velocity-0 note for each of the 128 MIDI notes plus
/// All Sound Off / Reset All Controllers / All Notes Off, on every channel.
pub fn midi_panic(events: &mut EventList) {
    for channel in 0..16u8 {
        for octave in 0..=10u8 {
            for note in 0..12u8 {
                if octave as usize * 12 + note as usize > 127 {
                    continue;
                }
                events.push(Event::Note {
                    channel,
                    octave,
                    note,
                    velocity: 0,
                    duration: 0,
                    mono: false,
                });
            }
        }
        for control in [120, 121, 123] {
            events.push(Event::Cc {
                channel,
                control,
                value: 0,
            });
        }
    }
}

/// Everything an operator body can see: the borrowed buffers, the cell it is
/// running at, and the tick-wide extras.
pub(crate) struct OperContext<'a> {
    pub field: &'a mut Field,
    pub marks: &'a mut MarkBuffer,
    pub vars: &'a mut [Glyph; VALUE_COUNT],
    pub events: &'a mut EventList,
    pub state: &'a mut SimState,
    pub tick: usize,
    pub seed: usize,
    pub y: usize,
    pub x: usize,
    pub glyph: Glyph,
}

impl OperContext<'_> {
    fn at(&self, dy: isize, dx: isize) -> (isize, isize) {
        (self.y as isize + dy, self.x as isize + dx)
    }

    /// Read the glyph at a relative offset; out of bounds reads `'.'`.
    pub fn peek(&self, dy: isize, dx: isize) -> Glyph {
        let (y, x) = self.at(dy, dx);
        self.field.peek(y, x)
    }

    /// Base-36 value of the glyph at a relative offset.
    pub fn peek_value(&self, dy: isize, dx: isize) -> usize {
        self.peek(dy, dx).value()
    }

    /// Write a glyph at a relative offset; out of bounds writes are dropped.
    /// The destination stays eligible for dispatch this tick.
    pub fn poke(&mut self, dy: isize, dx: isize, g: Glyph) {
        let (y, x) = self.at(dy, dx);
        self.field.poke(y, x, g);
    }

    /// Write a glyph and put the destination to sleep for this tick.
    pub fn poke_stunned(&mut self, dy: isize, dx: isize, g: Glyph) {
        let (y, x) = self.at(dy, dx);
        if y >= 0 && x >= 0 {
            self.field.poke(y, x, g);
            self.marks.set(y as usize, x as usize, Mark::SLEEP);
        }
    }

    /// Sleep a cell without writing it.
    pub fn stun(&mut self, dy: isize, dx: isize) {
        self.mark(dy, dx, Mark::SLEEP);
    }

    /// Lock a cell.
    pub fn lock(&mut self, dy: isize, dx: isize) {
        self.mark(dy, dx, Mark::LOCK);
    }

    /// Mark a cell as a port and lock it, the default for operator inputs
    /// and outputs.
    pub fn port(&mut self, dy: isize, dx: isize, flags: Mark) {
        self.mark(dy, dx, flags | Mark::LOCK);
    }

    /// Mark a cell as a port without locking it, for output regions other
    /// operators are still allowed to enter this tick.
    pub fn port_unlocked(&mut self, dy: isize, dx: isize, flags: Mark) {
        self.mark(dy, dx, flags);
    }

    fn mark(&mut self, dy: isize, dx: isize, flags: Mark) {
        let (y, x) = self.at(dy, dx);
        if y >= 0 && x >= 0 {
            self.marks.set(y as usize, x as usize, flags);
        }
    }

    /// True when any orthogonal neighbor holds a bang.
    pub fn has_neighboring_bang(&self) -> bool {
        self.peek(0, 1).is_bang()
            || self.peek(0, -1).is_bang()
            || self.peek(1, 0).is_bang()
            || self.peek(-1, 0).is_bang()
    }

    /// Gate for the alpha operators: a lowercase glyph only runs next to a
    /// bang.
    pub fn gated_off(&self) -> bool {
        self.glyph.is_lowercase() && !self.has_neighboring_bang()
    }
}
