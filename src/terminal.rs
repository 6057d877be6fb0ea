use anyhow::Context;
use crossterm::{cursor, queue, style, terminal};
use std::io::{stdout, Stdout, Write};

/// Smallest terminal the page can be laid out in.
pub const MIN_COLS: u16 = 20;
pub const MIN_ROWS: u16 = 4;

/// Raw mode, alternate screen and window title for the length of a page session. Also tracks the
/// terminal size so the frame loop can size its canvas from one place.
pub struct TerminalSession {
    size: (u16, u16),
}

impl TerminalSession {
    pub fn start(title: &str) -> anyhow::Result<Self> {
        let size = terminal::size().context("get terminal size")?;
        ensure_fits(size)?;

        terminal::enable_raw_mode().context("enable raw mode")?;
        // From here on Drop restores the terminal, even if the setup below fails.
        let session = Self { size };

        let mut out = stdout();
        queue!(
            out,
            terminal::EnterAlternateScreen,
            terminal::SetTitle(title),
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )
        .context("queue session setup")?;
        out.flush().context("flush session setup")?;

        tracing::debug!(cols = size.0, rows = size.1, "terminal session started");
        Ok(session)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }

    /// Records a size reported by a resize event.
    pub fn resized(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != self.size {
            tracing::debug!(cols, rows, "terminal resized");
            self.size = (cols, rows);
        }
    }

    /// Re-reads the size from the terminal; some terminals never send resize events.
    pub fn poll_size(&mut self) -> anyhow::Result<(u16, u16)> {
        let (cols, rows) = terminal::size().context("get terminal size")?;
        self.resized(cols, rows);
        Ok(self.size)
    }

    /// Canvas dimensions once `hud_rows` are reserved at the bottom.
    pub fn canvas_dims(&self, hud_rows: u16) -> (usize, usize) {
        canvas_dims(self.size, hud_rows)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        // The renderer may have left synchronized output on and autowrap off.
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h");
        let _ = queue!(
            out,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = out.flush();
    }
}

fn ensure_fits((cols, rows): (u16, u16)) -> anyhow::Result<()> {
    if cols < MIN_COLS || rows < MIN_ROWS {
        anyhow::bail!(
            "terminal too small (need at least {MIN_COLS}x{MIN_ROWS}, got {cols}x{rows})"
        );
    }
    Ok(())
}

fn canvas_dims((cols, rows): (u16, u16), hud_rows: u16) -> (usize, usize) {
    (cols as usize, rows.saturating_sub(hud_rows) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_terminals_below_the_minimum() {
        assert!(ensure_fits((MIN_COLS, MIN_ROWS)).is_ok());
        assert!(ensure_fits((MIN_COLS - 1, 40)).is_err());
        let err = ensure_fits((80, 2)).unwrap_err();
        assert!(err.to_string().contains("80x2"));
    }

    #[test]
    fn canvas_leaves_room_for_the_hud() {
        assert_eq!(canvas_dims((80, 24), 1), (80, 23));
        assert_eq!(canvas_dims((80, 1), 3), (80, 0));
    }
}
