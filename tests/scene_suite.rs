use std::time::Duration;

use birthday_reveal::embed::EmbedCommand;
use birthday_reveal::scene::{LOADING_FADE, LOADING_HOLD, PARTY_MESSAGES, Page, PageOptions, Section, Stage};
use birthday_reveal::tracks::default_catalogue;

fn page(loading_screen: bool) -> Page {
    let opts = PageOptions {
        rain: true,
        loading_screen,
    };
    Page::new(default_catalogue(), opts, fastrand::Rng::with_seed(11)).expect("page should build")
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn loading_screen_holds_then_fades_out() {
    let mut p = page(true);
    p.update(ms(100), 0.1);
    assert_eq!(p.stage(), Stage::Loading);
    assert_eq!(p.loading_opacity(), 1.0);

    p.update(LOADING_HOLD + LOADING_FADE / 2, 0.1);
    assert_eq!(p.stage(), Stage::Loading);
    assert!((p.loading_opacity() - 0.5).abs() < 1e-3);

    p.update(LOADING_HOLD + LOADING_FADE, 0.1);
    assert_eq!(p.stage(), Stage::Content);
}

#[test]
fn gift_cannot_be_opened_while_loading() {
    let mut p = page(true);
    p.update(ms(500), 0.5);
    assert!(!p.open_gift());
    assert!(!p.playback.has_autoplayed());
}

#[test]
fn opening_the_gift_fires_confetti_and_previews_music_once() {
    let mut p = page(false);
    assert!(p.open_gift());
    assert!(!p.open_gift());
    assert!(p.hero_burst().is_active());
    assert_eq!(p.hero_burst().particles().len(), 40);

    p.update(ms(50), 0.05);
    assert!(p.playback.is_playing());

    p.update(ms(3000), 2.95);
    assert!(!p.hero_burst().is_active(), "hero confetti clears after 3s");

    p.update(ms(10_000), 7.0);
    assert!(!p.playback.is_playing());
    let log = p.command_log();
    assert_eq!(log.count(EmbedCommand::Play), 1);
    assert_eq!(log.count(EmbedCommand::Pause), 1);
}

#[test]
fn party_boxes_open_once_each() {
    let mut p = page(false);
    assert!(p.open_party_box(1));
    let first_gen = p.party_burst().generation();
    assert!(!p.open_party_box(1));
    assert_eq!(p.party_burst().generation(), first_gen);

    assert!(p.open_party_box(3));
    assert_eq!(p.party_burst().generation(), first_gen + 1);
    assert!(p.is_box_open(1) && p.is_box_open(3));
    assert!(!p.is_box_open(0));
    assert!(!p.open_party_box(PARTY_MESSAGES.len()));

    p.update(ms(2000), 2.0);
    assert!(!p.party_burst().is_active(), "party confetti clears after 2s");
}

#[test]
fn ambient_layers_survive_updates_unchanged() {
    let mut p = page(false);
    let rain = p.rain().expect("rain enabled").particles().to_vec();
    let floating = p.floating().particles().to_vec();
    for i in 1..=30 {
        p.update(ms(i * 100), 0.1);
    }
    assert_eq!(p.rain().unwrap().particles(), rain.as_slice());
    assert_eq!(p.floating().particles(), floating.as_slice());
    assert_eq!(p.hearts().particles().len(), 8);
    assert_eq!(p.stars().particles().len(), 12);
}

#[test]
fn rain_can_be_disabled() {
    let opts = PageOptions {
        rain: false,
        loading_screen: false,
    };
    let p = Page::new(default_catalogue(), opts, fastrand::Rng::new()).unwrap();
    assert!(p.rain().is_none());
}

#[test]
fn sections_cycle_in_page_order() {
    let mut p = page(false);
    let mut seen = vec![p.section()];
    for _ in 0..4 {
        p.cycle_section();
        seen.push(p.section());
    }
    assert_eq!(
        seen,
        vec![Section::Hero, Section::Party, Section::Music, Section::Final, Section::Hero]
    );
}

#[test]
fn turntable_and_equalizer_follow_playback() {
    let mut p = page(false);
    p.playback.toggle_play_pause();
    for i in 1..=60 {
        p.update(ms(i * 50), 0.05);
    }
    assert!(p.turntable().vinyl_angle() > 0.0);
    assert!(p.turntable().arm_engaged());

    p.playback.toggle_play_pause();
    p.update(ms(3100), 0.05);
    assert!(p.equalizer().iter().all(|h| *h == 8.0));
}
