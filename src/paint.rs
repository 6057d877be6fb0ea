//! Paints a [`Page`] into a [`Canvas`]. Pure function of page state and time.

use crate::decor::{EQUALIZER_PEAK, EQUALIZER_REST, Particle, Rgb};
use crate::render::{scale, Canvas, GOLD, MUTED, ROSE, TEXT, WINE};
use crate::scene::{Page, PARTY_MESSAGES, Section, Stage, Variant};
use std::f32::consts::PI;

pub fn paint(page: &Page, canvas: &mut Canvas) {
    canvas.clear();
    if canvas.cols() < 4 || canvas.rows() < 4 {
        return;
    }

    match page.stage() {
        Stage::Loading => paint_loading(page, canvas),
        Stage::Content => {
            paint_ambient(page, canvas);
            match page.section() {
                Section::Hero => paint_hero(page, canvas),
                Section::Party => paint_party(page, canvas),
                Section::Music => paint_music(page, canvas),
                Section::Final => paint_final(page, canvas),
            }
            paint_bursts(page, canvas);
        }
    }
}

fn paint_loading(page: &Page, canvas: &mut Canvas) {
    let t = page.t_s();
    let k = page.loading_opacity();
    let mid = canvas.rows() as i32 / 2;

    let pulse = 0.75 + 0.25 * (t * PI).sin();
    let sparkle = if ((t / 2.0).fract() * 2.0) < 1.0 { '✦' } else { '✧' };
    canvas.text_centered(mid - 2, &sparkle.to_string(), scale(GOLD, k * pulse), true);
    canvas.text_centered(mid, "Preparing something special...", scale(TEXT, k), false);

    let dots: String = (0..3)
        .map(|i| {
            let phase = ((t - i as f32 * 0.2).max(0.0)).fract();
            if phase < 0.5 { '•' } else { '·' }
        })
        .flat_map(|c| [c, ' '])
        .collect();
    canvas.text_centered(mid + 2, dots.trim_end(), scale(GOLD, k), false);
}

fn paint_ambient(page: &Page, canvas: &mut Canvas) {
    let t = page.t_s();
    let rows = canvas.rows() as f32;

    if page.section() == Section::Final {
        for star in page.stars().particles() {
            let Some(p) = star.phase(t) else { continue };
            let glow = 0.2 + 0.5 * (p * PI).sin();
            let col = canvas.col_pct(star.x);
            let row = canvas.row_pct(star.y.unwrap_or(50.0));
            canvas.put(col, row, '*', scale(GOLD, glow));
        }
    }

    for f in page.floating().particles() {
        let Some(p) = f.phase(t) else { continue };
        let bob = (p * PI).sin();
        let col = canvas.col_pct(f.x);
        let row = canvas.row_pct(f.y.unwrap_or(50.0)) - bob.round() as i32;
        let glyph = f.kind.map(|k| k.glyph()).unwrap_or('✦');
        canvas.put(col, row, glyph, scale(GOLD, 0.2 + 0.3 * bob));
    }

    if page.section() == Section::Party {
        for h in page.hearts().particles() {
            let Some(p) = h.phase(t) else { continue };
            let col = canvas.col_pct(h.x);
            let row = ((1.0 - p) * rows) as i32;
            let glyph = if h.size >= 18.0 { '♥' } else { '♡' };
            canvas.put(col, row, glyph, scale(ROSE, 0.35));
        }
    }

    if let Some(rain) = page.rain() {
        for piece in rain.particles() {
            let Some(p) = piece.phase(t) else { continue };
            let row = (-0.1 * rows + p * 1.2 * rows) as i32;
            let col = canvas.col_pct(piece.x);
            let glyph = spin_glyph(piece, p);
            canvas.put(col, row, glyph, piece.color.unwrap_or(GOLD));
        }
    }
}

fn spin_glyph(piece: &Particle, progress: f32) -> char {
    const FRAMES: [char; 4] = ['▪', '◆', '▪', '◇'];
    let turns = piece.rotation_deg.unwrap_or(0.0) / 90.0 * progress;
    let idx = turns as usize % FRAMES.len();
    if piece.size < 8.0 { '·' } else { FRAMES[idx] }
}

fn paint_hero(page: &Page, canvas: &mut Canvas) {
    let mid = canvas.rows() as i32 / 2;
    if page.gift_opened() {
        canvas.text_centered(mid - 2, "✧ Happy Birthday ✧", GOLD, true);
        canvas.text_centered(mid, "A whole year of you, worth celebrating.", TEXT, false);
        canvas.text_centered(mid + 2, "tab: keep scrolling", MUTED, false);
        return;
    }

    const GIFT: [&str; 5] = [
        "  \\ | /  ",
        "+---+---+",
        "|   |   |",
        "|   |   |",
        "+---+---+",
    ];
    canvas.text_centered(mid - 5, "Something is waiting for you", TEXT, true);
    for (i, line) in GIFT.iter().enumerate() {
        let color = if i == 0 { GOLD } else { ROSE };
        canvas.text_centered(mid - 3 + i as i32, line, color, false);
    }
    canvas.text_centered(mid + 4, "press enter to open your gift", MUTED, false);
}

fn variant_color(v: Variant) -> Rgb {
    match v {
        Variant::Gold => GOLD,
        Variant::Rose => ROSE,
        Variant::Wine => WINE,
    }
}

fn paint_party(page: &Page, canvas: &mut Canvas) {
    canvas.text_centered(1, "Let's Party", GOLD, true);

    let mut row = 3;
    for (i, msg) in PARTY_MESSAGES.iter().enumerate() {
        let color = variant_color(msg.variant);
        if page.is_box_open(i) {
            canvas.text_centered(row, msg.message, color, true);
            canvas.text_centered(row + 1, msg.sub_message, MUTED, false);
        } else {
            canvas.text_centered(row, &format!("[{}] a little box, still wrapped", i + 1), color, false);
        }
        row += 3;
    }
}

fn paint_music(page: &Page, canvas: &mut Canvas) {
    let state = page.playback.state();
    let Some(track) = page.catalogue().get(state.current_track) else {
        return;
    };
    let cx = canvas.cols() as i32 / 2;

    canvas.text_centered(1, "The Soundtrack of Your Day", GOLD, true);

    // Record: ring of grooves, label in the middle, spinner on top of it.
    let cy = 6;
    let tt = page.turntable();
    for step in 0..24 {
        let a = step as f32 / 24.0 * 2.0 * PI;
        let col = cx + (a.cos() * 8.0).round() as i32;
        let row = cy + (a.sin() * 3.0).round() as i32;
        canvas.put(col, row, 'o', scale(TEXT, 0.35));
    }
    canvas.put(cx, cy, tt.spinner(), track.accent);
    let arm_col = cx + 10 + (tt.arm_angle() * 10.0).round() as i32;
    canvas.put(arm_col, cy - 2, '\\', MUTED);
    canvas.put(arm_col - 1, cy - 1, '\\', MUTED);

    let play = if state.is_playing { "❚❚ pause" } else { "▶ play" };
    let mute = if state.is_muted { "unmute" } else { "mute" };
    canvas.text_centered(11, &format!("[p] prev   [space] {play}   [n] next   [m] {mute}"), TEXT, false);

    canvas.text_centered(13, "Now Playing", GOLD, false);
    canvas.text_centered(14, &track.title, track.accent, true);
    canvas.text_centered(15, &track.artist, MUTED, false);
    canvas.text_centered(16, &track.album, scale(MUTED, 0.6), false);

    let bars = page.equalizer();
    let span = EQUALIZER_PEAK.max - EQUALIZER_REST;
    let left = cx - bars.len() as i32;
    for (i, h) in bars.iter().enumerate() {
        let level = 1 + (((h - EQUALIZER_REST) / span) * 3.0).round() as i32;
        for r in 0..level {
            canvas.put(left + i as i32 * 2, 21 - r, '█', GOLD);
        }
    }

    let log = page.command_log().tail(3);
    for (i, entry) in log.iter().enumerate() {
        let title = page
            .catalogue()
            .get(entry.track)
            .map(|t| t.title.as_str())
            .unwrap_or("?");
        canvas.text(1, 23 + i as i32, &format!("{} <- {}", title, entry.command), scale(MUTED, 0.5), false);
    }
}

fn paint_final(page: &Page, canvas: &mut Canvas) {
    let mid = canvas.rows() as i32 / 2;
    let glow = 0.75 + 0.25 * (page.t_s() * 0.8).sin();
    canvas.text_centered(mid - 3, "♡  Happy Birthday  ♡", scale(ROSE, glow), true);
    canvas.text_centered(mid - 1, "Here's to the dreams, the music, and every little sparkle.", TEXT, false);
    canvas.text_centered(mid + 1, "May this year be your most cinematic one yet.", TEXT, false);
    canvas.text_centered(mid + 3, "✦ with love ✦", GOLD, false);
}

fn paint_bursts(page: &Page, canvas: &mut Canvas) {
    let now = page.now();
    for burst in [page.hero_burst(), page.party_burst()] {
        let Some(age) = burst.age_s(now) else { continue };
        let reach = canvas.cols() as f32 * 0.3;
        let mid_row = canvas.rows() as f32 / 2.0;
        for piece in burst.particles() {
            let local = age - piece.delay_s;
            if local < 0.0 || local > piece.duration_s {
                continue;
            }
            let p = local / piece.duration_s;
            let angle = piece.rotation_deg.unwrap_or(0.0).to_radians() + piece.id as f32;
            let radius = reach * (1.0 - (1.0 - p) * (1.0 - p));
            let col = canvas.col_pct(piece.x) + (angle.cos() * radius).round() as i32;
            let row = (mid_row + angle.sin() * radius * 0.5).round() as i32;
            let fade = if p > 2.0 / 3.0 { (1.0 - p) * 3.0 } else { 1.0 };
            let color = scale(piece.color.unwrap_or(GOLD), fade);
            canvas.put(col, row, spin_glyph(piece, p), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::PageOptions;
    use crate::tracks::default_catalogue;
    use std::time::Duration;

    fn canvas_text(c: &Canvas) -> String {
        (0..c.rows())
            .map(|r| c.row_cells(r).iter().map(|cell| cell.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn loading_then_hero() {
        let mut page = Page::new(
            default_catalogue(),
            PageOptions::default(),
            fastrand::Rng::with_seed(3),
        )
        .unwrap();
        let mut canvas = Canvas::new(80, 26);

        page.update(Duration::from_millis(500), 0.5);
        paint(&page, &mut canvas);
        assert!(canvas_text(&canvas).contains("Preparing something special"));

        page.update(Duration::from_secs(4), 3.5);
        paint(&page, &mut canvas);
        assert!(canvas_text(&canvas).contains("press enter to open"));
    }

    #[test]
    fn music_section_shows_current_track() {
        let opts = PageOptions {
            rain: false,
            loading_screen: false,
        };
        let mut page = Page::new(default_catalogue(), opts, fastrand::Rng::with_seed(5)).unwrap();
        page.set_section(Section::Music);
        page.playback.next();
        page.update(Duration::from_millis(16), 0.016);

        let mut canvas = Canvas::new(90, 28);
        paint(&page, &mut canvas);
        assert!(canvas_text(&canvas).contains("Summertime Sadness"));
    }
}
