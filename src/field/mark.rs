//! Per-cell mark flags, reset at the start of every tick

use bitflags::bitflags;

bitflags! {
    /// Transient per-cell flags.
    ///
    /// `LOCK` and `SLEEP` suppress dispatch for the remainder of the tick:
    /// `LOCK` is set ahead of execution by an operator reserving a region,
    /// `SLEEP` is set on a cell an operator has just written. `INPUT`,
    /// `OUTPUT` and `PARAM` are advisory metadata for tooling and have no
    /// effect on evaluation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Mark: u8 {
        const LOCK = 1 << 0;
        const SLEEP = 1 << 1;
        const INPUT = 1 << 2;
        const OUTPUT = 1 << 3;
        const PARAM = 1 << 4;
    }
}

impl Mark {
    /// Flags that block dispatch.
    pub const MASKED: Mark = Mark::LOCK.union(Mark::SLEEP);
}

/// Mark flags for every cell, same shape as the glyph field.
#[derive(Debug, Clone)]
pub struct MarkBuffer {
    height: usize,
    width: usize,
    cells: Vec<Mark>,
}

impl MarkBuffer {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![Mark::empty(); height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Zero every flag. Called at the start of each tick.
    pub fn clear(&mut self) {
        self.cells.fill(Mark::empty());
    }

    pub fn get(&self, y: usize, x: usize) -> Mark {
        self.cells[y * self.width + x]
    }

    /// OR `flags` into the cell at `(y, x)`. Out-of-bounds is ignored.
    pub fn set(&mut self, y: usize, x: usize, flags: Mark) {
        if y < self.height && x < self.width {
            self.cells[y * self.width + x] |= flags;
        }
    }
}
