//! The playfield: a rectangular grid of glyph bytes

pub mod glyph;
pub mod mark;

pub use glyph::{Glyph, VALUE_COUNT};
pub use mark::{Mark, MarkBuffer};

use crate::error::{Error, Result};
use std::path::Path;

/// Row-major grid of glyphs. Created once at load time; operators mutate it
/// in place during ticks, and outside code reads or rewrites it only between
/// ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    height: usize,
    width: usize,
    cells: Vec<Glyph>,
}

impl Field {
    /// An empty field filled with `'.'`.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Glyph::EMPTY; height * width],
        }
    }

    /// Parse a field from newline-separated rows of glyphs.
    ///
    /// Rows may be ragged; the field is padded with `'.'` to the widest row.
    /// Blank input and non-printable bytes are parse errors.
    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines.iter().map(|l| l.len()).max().unwrap_or(0);
        if width == 0 || lines.is_empty() {
            return Err(Error::Parse {
                line: 1,
                message: "grid is empty".into(),
            });
        }
        let mut field = Field::new(lines.len(), width);
        for (y, line) in lines.iter().enumerate() {
            for (x, byte) in line.bytes().enumerate() {
                if !(b' '..=b'~').contains(&byte) {
                    return Err(Error::Parse {
                        line: y + 1,
                        message: format!("invalid byte 0x{:02x} in grid", byte),
                    });
                }
                // blanks read as empty cells so files can be hand-padded
                let g = if byte == b' ' { Glyph::EMPTY } else { Glyph(byte) };
                field.set(y, x, g);
            }
        }
        Ok(field)
    }

    /// Render the field back to newline-separated rows.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.height * (self.width + 1));
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.get(y, x).0 as char);
            }
            out.push('\n');
        }
        out
    }

    /// Load a field from a text file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let field = Self::from_text(&text)?;
        log::debug!(
            "loaded {}x{} grid from {}",
            field.height,
            field.width,
            path.display()
        );
        Ok(field)
    }

    /// Write the field to a text file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn get(&self, y: usize, x: usize) -> Glyph {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, y: usize, x: usize, g: Glyph) {
        self.cells[y * self.width + x] = g;
    }

    /// Read with bounds clamping: out-of-bounds reads return `'.'`.
    pub fn peek(&self, y: isize, x: isize) -> Glyph {
        if y < 0 || x < 0 || y as usize >= self.height || x as usize >= self.width {
            Glyph::EMPTY
        } else {
            self.get(y as usize, x as usize)
        }
    }

    /// Write with bounds clamping: out-of-bounds writes are dropped.
    pub fn poke(&mut self, y: isize, x: isize, g: Glyph) {
        if y >= 0 && x >= 0 && (y as usize) < self.height && (x as usize) < self.width {
            self.set(y as usize, x as usize, g);
        }
    }

    /// A matching, zeroed mark buffer.
    pub fn mark_buffer(&self) -> MarkBuffer {
        MarkBuffer::new(self.height, self.width)
    }
}
