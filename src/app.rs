use crate::config::Config;
use crate::paint::paint;
use crate::render::{Canvas, CellRenderer, Frame, Renderer};
use crate::scene::{Page, PageOptions, Section, Stage};
use crate::terminal::TerminalSession;
use crate::tracks::{default_catalogue, TrackCatalogue};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io::BufWriter;
use std::time::{Duration, Instant};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let catalogue = load_catalogue(&cfg)?;
    let opts = PageOptions {
        rain: !cfg.no_rain,
        loading_screen: cfg.loading_screen,
    };
    let mut page = Page::new(catalogue, opts, cfg.rng()).context("build page")?;
    tracing::info!(
        tracks = page.catalogue().len(),
        seed = ?cfg.seed,
        fps = cfg.fps,
        "starting birthday reveal"
    );

    let mut term = TerminalSession::start("Happy Birthday ✨")?;
    let mut out = BufWriter::new(TerminalSession::stdout());
    let mut renderer = CellRenderer::new();

    let hud_rows = 1u16;
    let (cols, rows) = term.canvas_dims(hud_rows);
    let mut canvas = Canvas::new(cols, rows);

    let mut show_help = false;
    let mut fps = FpsCounter::new();
    let start = Instant::now();
    let mut last_frame = start;
    let mut last_state = page.playback.state();

    loop {
        let now = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if handle_key(k.code, k.modifiers, &mut page, &mut show_help) {
                        page.playback.shutdown();
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => term.resized(c, r),
                _ => {}
            }
        }

        term.poll_size()?;
        let (cols, rows) = term.canvas_dims(hud_rows);
        canvas.resize(cols, rows);

        let dt = now.duration_since(last_frame).as_secs_f32().max(1e-6);
        last_frame = now;
        page.update(now.duration_since(start), dt);

        let state = page.playback.state();
        if state != last_state {
            tracing::debug!(?state, "playback state changed");
            last_state = state;
        }

        paint(&page, &mut canvas);
        let hud = build_hud(&page, fps.fps());
        let frame = Frame {
            canvas: &canvas,
            hud: &hud,
            hud_rows,
            overlay: show_help.then_some(help_popup_text()),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        fps.tick();

        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn load_catalogue(cfg: &Config) -> anyhow::Result<TrackCatalogue> {
    match cfg.tracks.as_deref() {
        Some(path) => TrackCatalogue::load(path)
            .with_context(|| format!("load track list {}", path.display())),
        None => Ok(default_catalogue()),
    }
}

/// Returns `true` when the user asked to quit.
pub(crate) fn handle_key(
    code: KeyCode,
    mods: KeyModifiers,
    page: &mut Page,
    show_help: &mut bool,
) -> bool {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return true;
    }
    if page.stage() == Stage::Loading {
        return matches!(code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q'));
    }

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) => *show_help = !*show_help,
        KeyCode::Tab | KeyCode::Down => page.cycle_section(),
        KeyCode::BackTab | KeyCode::Up => {
            // Three steps forward is one step back.
            for _ in 0..Section::ALL.len() - 1 {
                page.cycle_section();
            }
        }
        KeyCode::Enter | KeyCode::Char('g') | KeyCode::Char('G') => {
            if page.open_gift() {
                page.set_section(Section::Hero);
            }
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = c as usize - '1' as usize;
            page.set_section(Section::Party);
            page.open_party_box(idx);
        }
        KeyCode::Char(' ') => page.playback.toggle_play_pause(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => page.playback.next(),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Left => page.playback.previous(),
        KeyCode::Char('m') | KeyCode::Char('M') => page.playback.toggle_mute(),
        _ => {}
    }
    false
}

fn build_hud(page: &Page, fps: f32) -> String {
    let state = page.playback.state();
    let track = page
        .catalogue()
        .get(state.current_track)
        .map(|t| t.title.as_str())
        .unwrap_or("-");
    let sections = Section::ALL
        .iter()
        .map(|s| {
            if *s == page.section() {
                format!("[{}]", s.label())
            } else {
                s.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{sections} | {} {track}{} | {fps:.0} fps | ? help",
        if state.is_playing { "▶" } else { "❚❚" },
        if state.is_muted { " (muted)" } else { "" },
    )
}

fn help_popup_text() -> &'static str {
    "Birthday Reveal Keys\n\
enter or g  open the gift\n\
1/2/3/4  open a party box\n\
space  play/pause\n\
n or →  next track\n\
p or ←  previous track\n\
m  mute/unmute\n\
tab/↓  next section, shift-tab/↑  previous section\n\
? or h or F1  toggle this help\n\
q or esc  quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbedCommand;

    fn ready_page() -> Page {
        let opts = PageOptions {
            rain: false,
            loading_screen: false,
        };
        Page::new(default_catalogue(), opts, fastrand::Rng::with_seed(1)).unwrap()
    }

    #[test]
    fn enter_opens_gift_once_and_starts_preview() {
        let mut page = ready_page();
        let mut help = false;
        assert!(!handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut page, &mut help));
        assert!(!handle_key(KeyCode::Enter, KeyModifiers::NONE, &mut page, &mut help));
        page.update(Duration::from_millis(60), 0.06);

        assert!(page.gift_opened());
        assert!(page.playback.is_playing());
        assert_eq!(page.command_log().count(EmbedCommand::Play), 1);
    }

    #[test]
    fn back_tab_steps_to_previous_section() {
        let mut page = ready_page();
        let mut help = false;
        handle_key(KeyCode::BackTab, KeyModifiers::NONE, &mut page, &mut help);
        assert_eq!(page.section(), Section::Final);
    }

    #[test]
    fn quit_keys() {
        let mut page = ready_page();
        let mut help = false;
        assert!(handle_key(KeyCode::Char('q'), KeyModifiers::NONE, &mut page, &mut help));
        assert!(handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL, &mut page, &mut help));
    }
}
