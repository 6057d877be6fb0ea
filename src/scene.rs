//! Page model shared by the terminal surface and the tests: which stage and section are showing,
//! the decorative layers, the two gift interactions, and the playback controller they feed.

use crate::decor::{
    self, AmbientLayer, Burst, EQUALIZER_BARS, EQUALIZER_REST, FLOATING, HEARTS, HERO_BURST_LIFETIME,
    PARTY_BURST_LIFETIME, RAIN, STARS,
};
use crate::embed::CommandLog;
use crate::playback::{PlaybackController, PlaybackError};
use crate::tracks::TrackCatalogue;
use crate::turntable::Turntable;
use fastrand::Rng;
use std::time::Duration;

/// Loading screen holds for 2s, then fades for 1.5s.
pub const LOADING_HOLD: Duration = Duration::from_secs(2);
pub const LOADING_FADE: Duration = Duration::from_millis(1500);

/// Equalizer bars re-roll at this cadence while music plays.
const EQUALIZER_STEP: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Hero,
    Party,
    Music,
    Final,
}

impl Section {
    pub const ALL: [Section; 4] = [Self::Hero, Self::Party, Self::Music, Self::Final];

    pub fn next(self) -> Self {
        match self {
            Self::Hero => Self::Party,
            Self::Party => Self::Music,
            Self::Music => Self::Final,
            Self::Final => Self::Hero,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "gift",
            Self::Party => "party",
            Self::Music => "music",
            Self::Final => "finale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Gold,
    Rose,
    Wine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyMessage {
    pub message: &'static str,
    pub sub_message: &'static str,
    pub variant: Variant,
}

pub const PARTY_MESSAGES: [PartyMessage; 4] = [
    PartyMessage {
        message: "Another year older, another year of questionable decisions",
        sub_message: "But honestly? You make them all look glamorous.",
        variant: Variant::Gold,
    },
    PartyMessage {
        message: "You're not aging, you're leveling up",
        sub_message: "And clearly, you've unlocked some kind of eternal glow cheat code.",
        variant: Variant::Rose,
    },
    PartyMessage {
        message: "Birthdays are just annual reminders that you're a legend!!!",
        sub_message: "This is your reminder.",
        variant: Variant::Wine,
    },
    PartyMessage {
        message: "May your birth day be noice!!",
        sub_message: "And may your coffee always be the perfect temperature.",
        variant: Variant::Gold,
    },
];

pub struct PageOptions {
    pub rain: bool,
    pub loading_screen: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            rain: true,
            loading_screen: true,
        }
    }
}

pub struct Page {
    rng: Rng,
    catalogue: TrackCatalogue,
    pub playback: PlaybackController,
    log: CommandLog,
    loading_screen: bool,
    section: Section,

    rain: Option<AmbientLayer>,
    floating: AmbientLayer,
    hearts: AmbientLayer,
    stars: AmbientLayer,

    gift_opened: bool,
    hero_burst: Burst,
    opened_boxes: Vec<usize>,
    party_burst: Burst,

    turntable: Turntable,
    equalizer: [f32; EQUALIZER_BARS],
    equalizer_at: Duration,
    now: Duration,
}

impl Page {
    pub fn new(
        catalogue: TrackCatalogue,
        opts: PageOptions,
        mut rng: Rng,
    ) -> Result<Self, PlaybackError> {
        let log = CommandLog::new();
        let playback = PlaybackController::new(catalogue.len(), log.embeds(catalogue.len()))?;

        let rain = opts.rain.then(|| AmbientLayer::new(RAIN, &mut rng));
        let floating = AmbientLayer::new(FLOATING, &mut rng);
        let hearts = AmbientLayer::new(HEARTS, &mut rng);
        let stars = AmbientLayer::new(STARS, &mut rng);

        Ok(Self {
            rng,
            catalogue,
            playback,
            log,
            loading_screen: opts.loading_screen,
            section: Section::Hero,
            rain,
            floating,
            hearts,
            stars,
            gift_opened: false,
            hero_burst: Burst::new(decor::BURST, HERO_BURST_LIFETIME),
            opened_boxes: Vec::new(),
            party_burst: Burst::new(decor::BURST, PARTY_BURST_LIFETIME),
            turntable: Turntable::new(),
            equalizer: [EQUALIZER_REST; EQUALIZER_BARS],
            equalizer_at: Duration::ZERO,
            now: Duration::ZERO,
        })
    }

    pub fn stage(&self) -> Stage {
        if self.loading_screen && self.now < LOADING_HOLD + LOADING_FADE {
            Stage::Loading
        } else {
            Stage::Content
        }
    }

    /// Loading-screen opacity in `[0, 1]`.
    pub fn loading_opacity(&self) -> f32 {
        if !self.loading_screen {
            return 0.0;
        }
        if self.now <= LOADING_HOLD {
            return 1.0;
        }
        let fade = self.now.saturating_sub(LOADING_HOLD).as_secs_f32() / LOADING_FADE.as_secs_f32();
        (1.0 - fade).clamp(0.0, 1.0)
    }

    /// Advances everything time-driven to `now`, `dt` seconds after the previous update.
    pub fn update(&mut self, now: Duration, dt: f32) {
        self.now = now;
        self.playback.tick(now);
        self.hero_burst.update(now);
        self.party_burst.update(now);

        let playing = self.playback.is_playing();
        self.turntable.update(dt, playing);
        if !playing {
            self.equalizer = [EQUALIZER_REST; EQUALIZER_BARS];
        } else if now.saturating_sub(self.equalizer_at) >= EQUALIZER_STEP {
            self.equalizer = decor::equalizer_heights(true, &mut self.rng);
            self.equalizer_at = now;
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn t_s(&self) -> f32 {
        self.now.as_secs_f32()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn cycle_section(&mut self) {
        self.section = self.section.next();
    }

    /// Opens the hero gift. The first open fires the burst and starts the music preview;
    /// later calls do nothing. Returns whether this call opened it.
    pub fn open_gift(&mut self) -> bool {
        if self.gift_opened || self.stage() == Stage::Loading {
            return false;
        }
        self.gift_opened = true;
        self.hero_burst.fire(self.now, &mut self.rng);
        self.playback.trigger_autoplay();
        tracing::info!("gift opened");
        true
    }

    pub fn gift_opened(&self) -> bool {
        self.gift_opened
    }

    /// Opens party box `index`. Only a box that was still closed fires confetti.
    pub fn open_party_box(&mut self, index: usize) -> bool {
        if index >= PARTY_MESSAGES.len() || self.opened_boxes.contains(&index) {
            return false;
        }
        self.opened_boxes.push(index);
        self.party_burst.fire(self.now, &mut self.rng);
        true
    }

    pub fn is_box_open(&self, index: usize) -> bool {
        self.opened_boxes.contains(&index)
    }

    pub fn catalogue(&self) -> &TrackCatalogue {
        &self.catalogue
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.log
    }

    pub fn rain(&self) -> Option<&AmbientLayer> {
        self.rain.as_ref()
    }

    pub fn floating(&self) -> &AmbientLayer {
        &self.floating
    }

    pub fn hearts(&self) -> &AmbientLayer {
        &self.hearts
    }

    pub fn stars(&self) -> &AmbientLayer {
        &self.stars
    }

    pub fn hero_burst(&self) -> &Burst {
        &self.hero_burst
    }

    pub fn party_burst(&self) -> &Burst {
        &self.party_burst
    }

    pub fn turntable(&self) -> &Turntable {
        &self.turntable
    }

    pub fn equalizer(&self) -> &[f32; EQUALIZER_BARS] {
        &self.equalizer
    }
}
