use crate::decor::Rgb;
use crate::render::{draw_overlay_popup, Frame, Renderer, BACKGROUND};
use std::io::Write;

/// Paints a [`crate::render::Canvas`] one glyph per cell with 24-bit colour.
pub struct CellRenderer {
    last_fg: Option<Rgb>,
    last_bold: bool,
}

impl CellRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bold: false,
        }
    }
}

impl Default for CellRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CellRenderer {
    fn name(&self) -> &'static str {
        "cells"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let canvas = frame.canvas;
        let cols = canvas.cols();
        let rows = canvas.rows();
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }

        out.write_all(b"\x1b[H\x1b[0m")?;
        // Autowrap off while painting full-width rows, or the last column wraps into a blank line.
        out.write_all(b"\x1b[?7l")?;
        write!(
            out,
            "\x1b[48;2;{};{};{}m",
            BACKGROUND.0, BACKGROUND.1, BACKGROUND.2
        )?;
        self.last_fg = None;
        self.last_bold = false;

        for row in 0..rows {
            for cell in canvas.row_cells(row) {
                if cell.bold != self.last_bold {
                    out.write_all(if cell.bold { b"\x1b[1m" } else { b"\x1b[22m" })?;
                    self.last_bold = cell.bold;
                }
                if self.last_fg != Some(cell.fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", cell.fg.0, cell.fg.1, cell.fg.2)?;
                    self.last_fg = Some(cell.fg);
                }
                write!(out, "{}", cell.ch)?;
            }
            out.write_all(b"\r\n")?;
        }

        let mut hud_lines = frame.hud.lines();
        for i in 0..(frame.hud_rows as usize) {
            write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", rows + i + 1)?;
            if let Some(line) = hud_lines.next() {
                let shown: String = line.chars().take(cols).collect();
                write!(out, "{shown}")?;
            }
        }

        if let Some(text) = frame.overlay {
            let term_rows = (rows + frame.hud_rows as usize).min(u16::MAX as usize) as u16;
            draw_overlay_popup(out, cols.min(u16::MAX as usize) as u16, term_rows, text)?;
        }

        out.write_all(b"\x1b[?7h")?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
