//! Note, scale, chord, waveform and arpeggio tables

use crate::field::glyph::Glyph;

/// Note letters for semitones 0..=11, sharps written as lowercase.
const NOTE_SEQUENCE: [u8; 12] = *b"CcDdEFfGgAaB";

/// Glyph spelling of a semitone within the octave.
pub fn note_glyph(semitone: usize) -> Glyph {
    Glyph(NOTE_SEQUENCE[semitone % 12])
}

/// Entries in the unified scale/chord table: digits, a..z, A..Z.
pub const TABLE_COUNT: usize = 62;

/// Root-position chords, selected by `a..z`.
const CHORDS: [&[u8]; 26] = [
    &[0, 4, 7],         // major
    &[0, 3, 7],         // minor
    &[0, 5, 7],         // sus4
    &[0, 2, 7],         // sus2
    &[0, 4, 7, 11],     // major 7
    &[0, 3, 7, 10],     // minor 7
    &[0, 4, 7, 10],     // dominant 7
    &[0, 3, 7, 11],     // minor-major 7
    &[0, 3, 7, 9],      // minor 6
    &[0, 4, 7, 9],      // major 6
    &[0, 4, 7, 11, 14], // major 9
    &[0, 3, 7, 10, 14], // minor 9
    &[0, 4, 7, 14],     // major add9
    &[0, 3, 7, 14],     // minor add9
    &[0, 3, 6],         // diminished
    &[0, 3, 6, 10],     // half-diminished 7
    &[0, 3, 6, 9],      // diminished 7
    &[0, 4, 8],         // augmented
    &[0, 4, 8, 10],     // augmented 7
    &[0, 4, 7, 10, 14], // dominant 9
    &[0, 4, 7, 10, 13], // dominant 7 flat 9
    &[0, 4, 7, 10, 15], // dominant 7 sharp 9
    &[0, 4, 7, 9, 14],  // major 6/9
    &[0, 3, 7, 9, 14],  // minor 6/9
    &[0, 3, 7, 10, 17], // minor 11
    &[0, 3, 6, 10],     // minor 7 flat 5
];

/// Chords `0..=9` for the chord operator: the first ten chords padded with a
/// doubled root, third or fifth an octave up for a thicker voicing.
const ENRICHED_CHORDS: [&[u8]; 10] = [
    &[0, 4, 7, 12],     // major + octave
    &[0, 3, 7, 12],     // minor + octave
    &[0, 5, 7, 12],     // sus4 + octave
    &[0, 2, 7, 12],     // sus2 + octave
    &[0, 4, 7, 11, 16], // major 7 + octave third
    &[0, 3, 7, 10, 15], // minor 7 + octave third
    &[0, 4, 7, 10, 19], // dominant 7 + octave fifth
    &[0, 4, 7, 9, 12],  // major 6 + octave
    &[0, 3, 7, 9, 12],  // minor 6 + octave
    &[0, 3, 6, 12],     // diminished + octave
];

/// Scales `0..=9` for the scale operator.
const SCALES: [&[u8]; 10] = [
    &[0, 2, 4, 5, 7, 9, 11],  // major
    &[0, 2, 3, 5, 7, 8, 10],  // minor
    &[0, 2, 3, 5, 7, 9, 10],  // dorian
    &[0, 2, 4, 6, 7, 9, 11],  // lydian
    &[0, 2, 4, 5, 7, 9, 10],  // mixolydian
    &[0, 2, 4, 7, 9],         // pentatonic
    &[0, 2, 3, 7, 8],         // hirajoshi
    &[0, 1, 5, 6, 10],        // iwato
    &[0, 4, 7, 11],           // tetratonic
    &[0, 7],                  // fifths
];

/// Semitone offsets of one table entry. Small enough to copy around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intervals {
    len: usize,
    steps: [u8; 8],
}

impl Intervals {
    fn from_slice(source: &[u8]) -> Self {
        let mut steps = [0u8; 8];
        steps[..source.len()].copy_from_slice(source);
        Self {
            len: source.len(),
            steps,
        }
    }

    /// First inversion: the second voice becomes the bass and the root moves
    /// up an octave, re-based so the lowest voice is 0.
    fn first_inversion(source: &[u8]) -> Self {
        let mut steps = [0u8; 8];
        let shift = source[1];
        for i in 0..source.len() {
            let raised = if i + 1 < source.len() {
                source[i + 1]
            } else {
                source[0] + 12
            };
            steps[i] = raised - shift;
        }
        Self {
            len: source.len(),
            steps,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.steps[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Table index for a selector glyph: `0..9` map to 0..=9, `a..z` to 10..=35
/// and `A..Z` to 36..=61. Anything else selects nothing.
pub fn table_index(g: Glyph) -> Option<usize> {
    match g.0 {
        b'0'..=b'9' => Some((g.0 - b'0') as usize),
        b'a'..=b'z' => Some((g.0 - b'a') as usize + 10),
        b'A'..=b'Z' => Some((g.0 - b'A') as usize + 36),
        _ => None,
    }
}

/// Chord intervals for the chord operator: enriched chords on the digits,
/// root-position chords on a..z, first inversions on A..Z.
pub fn chord_intervals(index: usize) -> Option<Intervals> {
    match index {
        0..=9 => Some(Intervals::from_slice(ENRICHED_CHORDS[index])),
        10..=35 => Some(Intervals::from_slice(CHORDS[index - 10])),
        36..=61 => Some(Intervals::first_inversion(CHORDS[index - 36])),
        _ => None,
    }
}

/// Scale or chord intervals for the scale operator: the essential scales on
/// the digits, the same chord partitions as [`chord_intervals`] elsewhere.
pub fn scale_intervals(index: usize) -> Option<Intervals> {
    match index {
        0..=9 => Some(Intervals::from_slice(SCALES[index])),
        _ => chord_intervals(index),
    }
}

/// Samples per waveform.
pub const WAVEFORM_LEN: usize = 128;

/// Eight 128-sample waveforms as base-36 height strings: triangle, sine,
/// square, rising saw, then the four inverted forms.
const WAVEFORMS: [&[u8; WAVEFORM_LEN]; 8] = [
    b"011223344556778899aabbcddeeffgghiijjkkllmmnooppqqrrsstuuvvwwxxyyzyyxxwwvvuutssrrqqppoonmmllkkjjiihggffeeddcbbaa99887765544332211",
    b"iijklmnnopqqrsttuuvwwxxxyyyyzzzzzzzzzyyyyxxxwwvuuttsrqqponnmlkjiihgfedccba998766554332221111000000000111122233455667899abccdefgh",
    b"zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz0000000000000000000000000000000000000000000000000000000000000000",
    b"00111122223334444555666677778889999aaaabbbccccdddeeeeffffggghhhhiiiijjjkkkkllllmmmnnnnoooppppqqqqrrrssssttttuuuvvvvwwwxxxxyyyyzz",
    b"zyyxxwwvvuutssrrqqppoonmmllkkjjihhggffeeddcbbaa99887765544332211011223344556778899aabbcddeeffgghhijjkkllmmnooppqqrrsstuuvvwwxxyy",
    b"hhgfedccba998766554332221111000000000111122233455667899abccdefghhijklmnnopqqrsttuuvwwxxxyyyyzzzzzzzzzyyyyxxxwwvuuttsrqqponnmlkji",
    b"0000000000000000000000000000000000000000000000000000000000000000zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz",
    b"zzyyyyxxxxwwwvvvvuuuttttssssrrrqqqqppppooonnnnmmmllllkkkkjjjiiiihhhhgggffffeeeedddccccbbbaaaa99998887777666655544443332222111100",
];

/// Height of a waveform sample in `0..=35`.
pub fn waveform_level(shape: usize, cursor: usize) -> usize {
    Glyph(WAVEFORMS[shape % WAVEFORMS.len()][cursor % WAVEFORM_LEN]).value()
}

/// Number of arpeggio patterns.
pub const ARP_PATTERN_COUNT: usize = 14;

/// The 32-bit shift-mult hash used by the random operators. Fully determined
/// by its key.
pub(crate) fn shift_mult_hash(mut key: usize) -> usize {
    key = (key ^ 61) ^ (key >> 16);
    key = key.wrapping_add(key << 3);
    key ^= key >> 4;
    key = key.wrapping_mul(0x27d4_eb2d);
    key ^= key >> 15;
    key
}

/// Degree for arpeggio `pattern` at `step` over `degrees` scale degrees.
///
/// Patterns: 0 up, 1 down, 2 up-down, 3 down-up, 4 up-down inclusive,
/// 5 down-up inclusive, 6 converge, 7 diverge, 8 pinky-up, 9 thumb-up,
/// 10 up-down alternating, 11 down-up alternating, 12 random, 13 bounce.
pub fn arp_degree(pattern: usize, step: usize, degrees: usize, seed: usize) -> usize {
    let n = degrees;
    if n == 0 {
        return 0;
    }
    match pattern % ARP_PATTERN_COUNT {
        0 => step % n,
        1 => n - 1 - step % n,
        2 => {
            let period = (2 * n).saturating_sub(2).max(2);
            let p = step % period;
            if p < n {
                p
            } else {
                period - p
            }
        }
        3 => {
            let period = (2 * n).saturating_sub(2).max(2);
            let p = step % period;
            if p < n {
                n - 1 - p
            } else {
                n - 1 - (period - p)
            }
        }
        4 => {
            let period = 2 * n;
            let p = step % period;
            if p < n {
                p
            } else {
                period - p - 1
            }
        }
        5 => {
            let period = 2 * n;
            let p = step % period;
            if p < n {
                n - 1 - p
            } else {
                n - 1 - (period - p - 1)
            }
        }
        6 => converge(step % n, n),
        7 => converge(n - 1 - step % n, n),
        8 => {
            // ascending note alternating with the top note
            let p = step % (2 * n);
            if p % 2 == 1 {
                n - 1
            } else {
                p / 2
            }
        }
        9 => {
            // bottom note alternating with an ascending note
            let p = step % (2 * n);
            if p % 2 == 0 {
                0
            } else {
                (p / 2 + 1) % n
            }
        }
        10 => updown_alt(step % n, n),
        11 => n - 1 - updown_alt(step % n, n),
        12 => shift_mult_hash(seed.wrapping_add(step) ^ (step << 16)) % n,
        13 => {
            // bounce within each third of the range in turn
            let third = (n / 3).max(1);
            let segment_period = 2 * third;
            let k = step % (3 * segment_period);
            let segment = k / segment_period;
            let p = k % segment_period;
            let q = if p < third {
                p
            } else {
                segment_period - 1 - p
            };
            (segment * third + q).min(n - 1)
        }
        _ => unreachable!(),
    }
}

/// Outside-in walk: 0, n-1, 1, n-2, ...
fn converge(k: usize, n: usize) -> usize {
    if k % 2 == 0 {
        k / 2
    } else {
        n - 1 - k / 2
    }
}

/// Ascend the even degrees, then descend the odd ones.
fn updown_alt(k: usize, n: usize) -> usize {
    let half = n.div_ceil(2);
    if k < half {
        (2 * k).min(n - 1)
    } else {
        2 * (n - 1 - k) + 1
    }
}
