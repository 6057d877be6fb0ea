use crate::decor::Rgb;

pub const BACKGROUND: Rgb = Rgb(10, 8, 20);
pub const TEXT: Rgb = Rgb(236, 228, 216);
pub const MUTED: Rgb = Rgb(150, 140, 150);
pub const GOLD: Rgb = Rgb(231, 175, 47);
pub const ROSE: Rgb = Rgb(226, 110, 130);
pub const WINE: Rgb = Rgb(183, 46, 69);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: TEXT,
            bold: false,
        }
    }
}

/// Character grid the scene painter draws into. Out-of-bounds writes are clipped.
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        if cols != self.cols || rows != self.rows {
            *self = Self::new(cols, rows);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    pub fn put(&mut self, col: i32, row: i32, ch: char, fg: Rgb) {
        if col < 0 || row < 0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] = Cell { ch, fg, bold: false };
    }

    /// Writes `text` starting at `col`; characters past the right edge are dropped.
    pub fn text(&mut self, col: i32, row: i32, text: &str, fg: Rgb, bold: bool) {
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i32;
            self.put(c, row, ch, fg);
            if bold && c >= 0 && (c as usize) < self.cols && row >= 0 && (row as usize) < self.rows {
                self.cells[row as usize * self.cols + c as usize].bold = true;
            }
        }
    }

    pub fn text_centered(&mut self, row: i32, text: &str, fg: Rgb, bold: bool) {
        let w = text.chars().count() as i32;
        let col = (self.cols as i32 - w) / 2;
        self.text(col, row, text, fg, bold);
    }

    /// Maps a `[0, 100]` percentage onto a column.
    pub fn col_pct(&self, pct: f32) -> i32 {
        ((pct / 100.0) * self.cols.saturating_sub(1) as f32).round() as i32
    }

    pub fn row_pct(&self, pct: f32) -> i32 {
        ((pct / 100.0) * self.rows.saturating_sub(1) as f32).round() as i32
    }

    pub fn row_cells(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }
}

pub fn scale(c: Rgb, k: f32) -> Rgb {
    let k = k.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| (bg as f32 + (fg as f32 - bg as f32) * k).round() as u8;
    Rgb(
        mix(c.0, BACKGROUND.0),
        mix(c.1, BACKGROUND.1),
        mix(c.2, BACKGROUND.2),
    )
}
