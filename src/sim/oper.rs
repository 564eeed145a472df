//! Operator behaviors and glyph dispatch

use super::OperContext;
use crate::event::Event;
use crate::field::{Glyph, Mark};
use crate::music;

/// Dispatch a cell to its operator behavior. The 26 alpha operators fold
/// case here; their bodies decide what lowercase means.
pub(crate) fn dispatch(ctx: &mut OperContext) {
    match ctx.glyph.0 {
        b'!' => midicc(ctx),
        b'#' => comment(ctx),
        b'*' => bang(ctx),
        b':' | b'%' => midi_note(ctx),
        b';' => bouncer(ctx),
        b'=' => midichord(ctx),
        b'?' => midipb(ctx),
        b'$' => scale(ctx),
        b'&' => arpeggiator(ctx),
        b'A' | b'a' => add(ctx),
        b'B' | b'b' => subtract(ctx),
        b'C' | b'c' => clock(ctx),
        b'D' | b'd' => delay(ctx),
        b'F' | b'f' => if_equal(ctx),
        b'G' | b'g' => generator(ctx),
        b'H' | b'h' => halt(ctx),
        b'I' | b'i' => increment(ctx),
        b'J' | b'j' => jump(ctx),
        b'K' | b'k' => konkat(ctx),
        b'L' | b'l' => lesser(ctx),
        b'M' | b'm' => multiply(ctx),
        b'N' | b'n' | b'E' | b'e' | b'S' | b's' | b'W' | b'w' => movement(ctx),
        b'O' | b'o' => offset(ctx),
        b'P' | b'p' => push(ctx),
        b'Q' | b'q' => query(ctx),
        b'R' => random(ctx),
        b'r' => random_unique(ctx),
        b'T' | b't' => track(ctx),
        b'U' | b'u' => uclid(ctx),
        b'V' | b'v' => variable(ctx),
        b'X' | b'x' => teleport(ctx),
        b'Y' | b'y' => yump(ctx),
        b'Z' | b'z' => lerp(ctx),
        _ => {}
    }
}

// The behaviors stay out of line; inlining them into the dispatch loop
// measurably slows the scan.

#[inline(never)]
fn movement(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let (dy, dx): (isize, isize) = match ctx.glyph.lowered().0 {
        b'n' => (-1, 0),
        b'e' => (0, 1),
        b's' => (1, 0),
        b'w' => (0, -1),
        _ => (0, 0),
    };
    let y0 = ctx.y as isize + dy;
    let x0 = ctx.x as isize + dx;
    if y0 < 0
        || x0 < 0
        || y0 >= ctx.field.height() as isize
        || x0 >= ctx.field.width() as isize
    {
        ctx.field.set(ctx.y, ctx.x, Glyph::BANG);
        return;
    }
    let (y0, x0) = (y0 as usize, x0 as usize);
    if ctx.field.get(y0, x0).is_empty() {
        let glyph = ctx.glyph;
        ctx.field.set(y0, x0, glyph);
        ctx.field.set(ctx.y, ctx.x, Glyph::EMPTY);
        ctx.marks.set(y0, x0, Mark::SLEEP);
    } else {
        ctx.field.set(ctx.y, ctx.x, Glyph::BANG);
    }
}

#[inline(never)]
fn add(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let a = ctx.peek(0, -1);
    let b = ctx.peek(0, 1);
    let g = Glyph::from_value(a.value() + b.value());
    ctx.poke(1, 0, g.with_case_of(b));
}

#[inline(never)]
fn subtract(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let a = ctx.peek(0, -1);
    let b = ctx.peek(0, 1);
    let diff = (b.value() as isize - a.value() as isize).unsigned_abs();
    ctx.poke(1, 0, Glyph::from_value(diff).with_case_of(b));
}

#[inline(never)]
fn multiply(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let a = ctx.peek(0, -1);
    let b = ctx.peek(0, 1);
    let g = Glyph::from_value(a.value() * b.value());
    ctx.poke(1, 0, g.with_case_of(b));
}

#[inline(never)]
fn clock(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let b = ctx.peek(0, 1);
    let rate = ctx.peek_value(0, -1).max(1);
    let modulo = match b.value() {
        0 => 8,
        m => m,
    };
    let g = Glyph::from_value(ctx.tick / rate % modulo);
    ctx.poke(1, 0, g.with_case_of(b));
}

#[inline(never)]
fn delay(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let rate = ctx.peek_value(0, -1).max(1);
    let modulo = match ctx.peek_value(0, 1) {
        0 => 8,
        m => m,
    };
    let g = if ctx.tick % (rate * modulo) == 0 {
        Glyph::BANG
    } else {
        Glyph::EMPTY
    };
    ctx.poke(1, 0, g);
}

#[inline(never)]
fn if_equal(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let g = if ctx.peek(0, -1) == ctx.peek(0, 1) {
        Glyph::BANG
    } else {
        Glyph::EMPTY
    };
    ctx.poke(1, 0, g);
}

#[inline(never)]
fn generator(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let out_x = ctx.peek_value(0, -3) as isize;
    let out_y = ctx.peek_value(0, -2) as isize + 1;
    let len = ctx.peek_value(0, -1) as isize;
    ctx.port(0, -3, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    for i in 0..len {
        ctx.port(0, i + 1, Mark::INPUT);
        ctx.port_unlocked(out_y, out_x + i, Mark::OUTPUT);
        let g = ctx.peek(0, i + 1);
        ctx.poke_stunned(out_y, out_x + i, g);
    }
}

#[inline(never)]
fn halt(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    // the port lock is the whole effect: the cell below sits this tick out
    ctx.port(1, 0, Mark::INPUT | Mark::PARAM);
}

#[inline(never)]
fn increment(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::INPUT | Mark::OUTPUT);
    let ga = ctx.peek(0, -1);
    let gb = ctx.peek(0, 1);
    let rate = if !ga.is_empty() && !ga.is_bang() {
        ga.value()
    } else {
        1
    };
    let max = match gb.value() {
        0 => 36,
        m => m,
    };
    let val = (ctx.peek_value(1, 0) + rate) % max;
    ctx.poke(1, 0, Glyph::from_value(val).with_case_of(gb));
}

#[inline(never)]
fn jump(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let g = ctx.peek(-1, 0);
    if g == ctx.glyph {
        return;
    }
    ctx.port(-1, 0, Mark::INPUT);
    for i in 1..=256isize {
        if ctx.peek(i, 0) != ctx.glyph {
            ctx.port(i, 0, Mark::OUTPUT);
            ctx.poke(i, 0, g);
            break;
        }
        ctx.stun(i, 0);
    }
}

#[inline(never)]
fn yump(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let g = ctx.peek(0, -1);
    if g == ctx.glyph {
        return;
    }
    ctx.port(0, -1, Mark::INPUT);
    for i in 1..=256isize {
        if ctx.peek(0, i) != ctx.glyph {
            ctx.port(0, i, Mark::OUTPUT);
            ctx.poke(0, i, g);
            break;
        }
        ctx.stun(0, i);
    }
}

#[inline(never)]
fn konkat(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let len = (ctx.peek_value(0, -1) as isize).max(1);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    for i in 0..len {
        ctx.port(0, i + 1, Mark::INPUT);
        let name = ctx.peek(0, i + 1);
        if !name.is_empty() {
            let value = ctx.vars[name.value()];
            ctx.port(1, i + 1, Mark::OUTPUT);
            ctx.poke(1, i + 1, value);
        }
    }
}

#[inline(never)]
fn lesser(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let ga = ctx.peek(0, -1);
    let gb = ctx.peek(0, 1);
    if ga.is_empty() || gb.is_empty() {
        ctx.poke(1, 0, Glyph::EMPTY);
    } else {
        let smaller = ga.value().min(gb.value());
        ctx.poke(1, 0, Glyph::from_value(smaller).with_case_of(gb));
    }
}

#[inline(never)]
fn offset(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let in_x = ctx.peek_value(0, -2) as isize + 1;
    let in_y = ctx.peek_value(0, -1) as isize;
    ctx.port(0, -2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(in_y, in_x, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let g = ctx.peek(in_y, in_x);
    ctx.poke(1, 0, g);
}

#[inline(never)]
fn push(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let key = ctx.peek_value(0, -2);
    let len = ctx.peek_value(0, -1);
    ctx.port(0, -2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    if len == 0 {
        return;
    }
    for i in 0..len {
        ctx.lock(1, i as isize);
    }
    let out_x = (key % len) as isize;
    ctx.port(1, out_x, Mark::OUTPUT);
    let g = ctx.peek(0, 1);
    ctx.poke(1, out_x, g);
}

#[inline(never)]
fn query(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let len = ctx.peek_value(0, -3) as isize;
    let in_y = ctx.peek_value(0, -2) as isize;
    let in_x = ctx.peek_value(0, -1) as isize + 1;
    ctx.port(0, -3, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    let out_x = 1 - len;
    for i in 0..len {
        ctx.port(in_y, in_x + i, Mark::INPUT);
        ctx.port(1, out_x + i, Mark::OUTPUT);
        let g = ctx.peek(in_y, in_x + i);
        ctx.poke(1, out_x + i, g);
    }
}

#[inline(never)]
fn random(ctx: &mut OperContext) {
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let gb = ctx.peek(0, 1);
    let a = ctx.peek_value(0, -1);
    let b = match gb.value() {
        0 => 36,
        v => v,
    };
    if a == b {
        ctx.poke(1, 0, Glyph::from_value(a));
        return;
    }
    let (min, max) = if a < b { (a, b) } else { (b, a) };
    let key = ctx
        .seed
        .wrapping_add(ctx.y * ctx.field.width() + ctx.x)
        ^ (ctx.tick << 16);
    let value = music::shift_mult_hash(key) % (max - min) + min;
    ctx.poke(1, 0, Glyph::from_value(value).with_case_of(gb));
}

#[inline(never)]
fn random_unique(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let min_g = ctx.peek(0, -1);
    let max_g = ctx.peek(0, 1);
    if min_g.is_empty() || max_g.is_empty() {
        return;
    }
    let value = ctx.state.unique.next(min_g.value(), max_g.value());
    ctx.poke(1, 0, Glyph::from_value(value));
}

#[inline(never)]
fn track(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let key = ctx.peek_value(0, -2);
    let len = ctx.peek_value(0, -1);
    ctx.port(0, -2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    if len == 0 {
        return;
    }
    for i in 0..len {
        ctx.lock(0, i as isize + 1);
    }
    let read_x = (key % len) as isize + 1;
    ctx.port(0, read_x, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let g = ctx.peek(0, read_x);
    ctx.poke(1, 0, g);
}

#[inline(never)]
fn uclid(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let left = ctx.peek(0, -1);
    let steps = if !left.is_empty() && !left.is_bang() {
        left.value()
    } else {
        1
    };
    let max = match ctx.peek_value(0, 1) {
        0 => 8,
        m => m,
    };
    let bucket = steps * (ctx.tick + max - 1) % max + steps;
    let g = if bucket >= max {
        Glyph::BANG
    } else {
        Glyph::EMPTY
    };
    ctx.poke(1, 0, g);
}

#[inline(never)]
fn variable(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    let left = ctx.peek(0, -1);
    let right = ctx.peek(0, 1);
    if !left.is_empty() {
        ctx.vars[left.value()] = right;
    } else if !right.is_empty() {
        ctx.port(1, 0, Mark::OUTPUT);
        let result = ctx.vars[right.value()];
        ctx.poke(1, 0, result);
    }
}

#[inline(never)]
fn teleport(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    let count = ctx.peek_value(0, -3) as isize;
    let out_y = ctx.peek_value(0, -2) as isize;
    let out_x = ctx.peek_value(0, -1) as isize;
    ctx.port(0, -3, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    if count == 0 {
        return;
    }
    // the destination window must clear the operator and its input row
    if out_x == 0 && out_y < 1 {
        return;
    }
    if out_x == 1 && count != 1 {
        return;
    }
    if out_y == 0 && out_x <= count {
        return;
    }
    for i in 0..count {
        ctx.port(0, 1 + i, Mark::INPUT);
        ctx.port_unlocked(out_y, out_x + i, Mark::OUTPUT);
        let g = ctx.peek(0, 1 + i);
        ctx.poke_stunned(out_y, out_x + i, g);
    }
}

#[inline(never)]
fn lerp(ctx: &mut OperContext) {
    if ctx.gated_off() {
        return;
    }
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::INPUT | Mark::OUTPUT);
    let g = ctx.peek(0, -1);
    let b = ctx.peek(0, 1);
    let rate = if g.is_empty() || g.is_bang() {
        1
    } else {
        g.value() as isize
    };
    let goal = b.value() as isize;
    let val = ctx.peek_value(1, 0) as isize;
    let delta = if val <= goal - rate {
        rate
    } else if val >= goal + rate {
        -rate
    } else {
        goal - val
    };
    ctx.poke(1, 0, Glyph::from_value((val + delta) as usize).with_case_of(b));
}

#[inline(never)]
fn comment(ctx: &mut OperContext) {
    let bound = (ctx.x + 255).min(ctx.field.width());
    for x in ctx.x + 1..bound {
        let g = ctx.field.get(ctx.y, x);
        ctx.marks.set(ctx.y, x, Mark::LOCK);
        if g == ctx.glyph {
            break;
        }
    }
}

#[inline(never)]
fn bang(ctx: &mut OperContext) {
    ctx.poke(0, 0, Glyph::EMPTY);
}

#[inline(never)]
fn midi_note(ctx: &mut OperContext) {
    for i in 1..6 {
        ctx.port(0, i, Mark::INPUT);
    }
    if !ctx.has_neighboring_bang() {
        return;
    }
    let channel_g = ctx.peek(0, 1);
    let octave_g = ctx.peek(0, 2);
    let note_g = ctx.peek(0, 3);
    let velocity_g = ctx.peek(0, 4);
    let length_g = ctx.peek(0, 5);
    if octave_g.is_empty() {
        return;
    }
    let Some(semitone) = note_g.semitone() else {
        return;
    };
    let channel = (channel_g.value() as u8).min(15);
    let velocity = if velocity_g.is_empty() {
        127
    } else {
        let v = velocity_g.value();
        // a zero-velocity note would be a note-off on the wire; drop it
        if v == 0 {
            return;
        }
        (v * 8 - 1).min(127) as u8
    };
    // letters past G spill into the next octave
    let octave = (octave_g.value() as u8).min(9) + semitone / 12;
    let note = semitone % 12;
    ctx.port(0, 0, Mark::OUTPUT);
    ctx.events.push(Event::Note {
        channel,
        octave: octave.min(9),
        note,
        velocity,
        duration: (length_g.value() & 0x7f) as u8,
        mono: ctx.glyph == Glyph(b'%'),
    });
}

#[inline(never)]
fn midicc(ctx: &mut OperContext) {
    for i in 1..6 {
        ctx.port(0, i, Mark::INPUT);
    }
    if ctx.has_neighboring_bang() {
        let channel_g = ctx.peek(0, 1);
        let high_g = ctx.peek(0, 2);
        let low_g = ctx.peek(0, 3);
        let value_g = ctx.peek(0, 4);
        let rate_g = ctx.peek(0, 5);
        if !channel_g.is_empty() && !high_g.is_empty() && channel_g.value() <= 15 {
            let control = ((high_g.value() << 4) | low_g.value()).min(127) as u8;
            let target = value_g.value() as f64 * 127.0 / 35.0;
            let steps = (rate_g.value().min(24) * 2).max(1) as u32;
            ctx.port(0, 0, Mark::OUTPUT);
            ctx.state
                .cc
                .entry((ctx.y, ctx.x))
                .or_default()
                .retarget(channel_g.value() as u8, control, target, steps);
        }
    }
    // an active slide keeps emitting with or without a bang
    if let Some(slide) = ctx.state.cc.get_mut(&(ctx.y, ctx.x)) {
        if let Some(value) = slide.advance() {
            ctx.events.push(Event::Cc {
                channel: slide.channel,
                control: slide.control,
                value,
            });
        }
    }
}

#[inline(never)]
fn midipb(ctx: &mut OperContext) {
    for i in 1..4 {
        ctx.port(0, i, Mark::INPUT);
    }
    if !ctx.has_neighboring_bang() {
        return;
    }
    let channel_g = ctx.peek(0, 1);
    if channel_g.is_empty() {
        return;
    }
    let channel = channel_g.value();
    if channel > 15 {
        return;
    }
    ctx.port(0, 0, Mark::OUTPUT);
    ctx.events.push(Event::PitchBend {
        channel: channel as u8,
        msb: (ctx.peek_value(0, 2) * 127 / 35) as u8,
        lsb: (ctx.peek_value(0, 3) * 127 / 35) as u8,
    });
}

#[inline(never)]
fn midichord(ctx: &mut OperContext) {
    for i in 1..7 {
        ctx.port(0, i, Mark::INPUT);
    }
    if !ctx.has_neighboring_bang() {
        return;
    }
    let channel = (ctx.peek_value(0, 1)).min(15) as u8;
    let base_octave = ctx.peek_value(0, 2).min(9) as i32;
    let root_g = ctx.peek(0, 3);
    let chord_g = ctx.peek(0, 4);
    let velocity_g = ctx.peek(0, 5);
    let length_g = ctx.peek(0, 6);
    let Some(root) = root_g.semitone() else {
        return;
    };
    let Some(index) = music::table_index(chord_g) else {
        return;
    };
    let Some(chord) = music::chord_intervals(index) else {
        return;
    };
    let velocity = if velocity_g.is_empty() {
        127
    } else {
        (velocity_g.value() * 127 / 35) as u8
    };
    let duration = (length_g.value() & 0x7f) as u8;
    ctx.port(0, 0, Mark::OUTPUT);
    // each voice must land strictly above the previous one
    let mut last = -1i32;
    for &interval in chord.as_slice() {
        let mut absolute = base_octave * 12 + root as i32 + interval as i32;
        while absolute <= last {
            absolute += 12;
        }
        last = absolute;
        if absolute > 127 || absolute / 12 > 9 {
            continue;
        }
        ctx.events.push(Event::Note {
            channel,
            octave: (absolute / 12) as u8,
            note: (absolute % 12) as u8,
            velocity,
            duration,
            mono: false,
        });
    }
}

#[inline(never)]
fn scale(ctx: &mut OperContext) {
    ctx.port(0, 1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 3, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 4, Mark::INPUT);
    let octave_g = ctx.peek(0, 1);
    let root_g = ctx.peek(0, 2);
    let table_g = ctx.peek(0, 3);
    let degree_g = ctx.peek(0, 4);
    if degree_g.is_empty() {
        ctx.poke(1, 0, Glyph::EMPTY);
        ctx.lock(1, 0);
        return;
    }
    let Some(root) = root_g.semitone() else {
        return;
    };
    let Some(index) = music::table_index(table_g) else {
        return;
    };
    let Some(table) = music::scale_intervals(index) else {
        return;
    };
    let degree = degree_g.value();
    let octave_inc = degree / table.len();
    let offset = table.as_slice()[degree % table.len()] as usize;
    let total = root as usize + offset + 12 * octave_inc;
    let octave = octave_g.value() + total / 12;
    if octave > 9 {
        return;
    }
    // the outputs are plain note and digit glyphs; lock them so they never
    // run as operators
    ctx.poke(1, 0, music::note_glyph(total % 12));
    ctx.lock(1, 0);
    if !octave_g.is_empty() {
        ctx.poke(1, -1, Glyph::from_value(octave));
        ctx.lock(1, -1);
    }
}

#[inline(never)]
fn bouncer(ctx: &mut OperContext) {
    ctx.port(0, -2, Mark::INPUT | Mark::PARAM);
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(0, 2, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    let start = ctx.peek_value(0, -2) as f64;
    let end = ctx.peek_value(0, -1) as f64;
    let rate_g = ctx.peek(0, 1);
    let shape_g = ctx.peek(0, 2);
    let banged = ctx.has_neighboring_bang();
    let cursor = {
        let wave = ctx.state.bounce.entry((ctx.y, ctx.x)).or_default();
        if banged || rate_g != wave.last_rate || shape_g != wave.last_shape {
            wave.cursor = 0;
            wave.last_rate = rate_g;
            wave.last_shape = shape_g;
        } else if !rate_g.is_empty() && rate_g.value() > 0 {
            wave.cursor = (wave.cursor + rate_g.value()) % music::WAVEFORM_LEN;
        }
        wave.cursor
    };
    let level = music::waveform_level(shape_g.value(), cursor) as f64 / 35.0;
    let value = start + level * (end - start);
    ctx.poke(1, 0, Glyph::from_value(value.round() as usize));
}

#[inline(never)]
fn arpeggiator(ctx: &mut OperContext) {
    ctx.port(0, -1, Mark::INPUT | Mark::PARAM);
    ctx.port(0, 1, Mark::INPUT);
    ctx.port(1, 0, Mark::OUTPUT);
    if !ctx.has_neighboring_bang() {
        return;
    }
    let pattern_g = ctx.peek(0, -1);
    let range_g = ctx.peek(0, 1);
    let step = {
        let arp = ctx.state.arp.entry((ctx.y, ctx.x)).or_default();
        if pattern_g != arp.last_pattern || range_g != arp.last_range {
            arp.step = 0;
            arp.last_pattern = pattern_g;
            arp.last_range = range_g;
        }
        let step = arp.step;
        arp.step += 1;
        step
    };
    let pattern = pattern_g.value() % music::ARP_PATTERN_COUNT;
    let degrees = 7 * range_g.value().clamp(1, 4);
    let degree = music::arp_degree(pattern, step, degrees, ctx.seed);
    ctx.poke(1, 0, Glyph::from_value(degree));
}
