use fastrand::Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#RRGGBB` (leading `#` optional).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self(r, g, b))
    }
}

/// Gold, rose, blush, cream, wine.
pub const CONFETTI_PALETTE: [Rgb; 5] = [
    Rgb(231, 175, 47),
    Rgb(226, 110, 130),
    Rgb(230, 179, 188),
    Rgb(241, 236, 228),
    Rgb(183, 46, 69),
];

/// Half-open `[min, max)` range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(v: f32) -> Self {
        Self { min: v, max: v }
    }

    pub fn sample(&self, rng: &mut Rng) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        let v = self.min + rng.f32() * (self.max - self.min);
        // f32 rounding can land exactly on `max`.
        if v >= self.max { self.min } else { v }
    }

    pub fn contains(&self, v: f32) -> bool {
        if self.max <= self.min {
            return v == self.min;
        }
        v >= self.min && v < self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    Star,
    Heart,
    Sparkle,
}

impl GlyphKind {
    pub const ALL: [GlyphKind; 3] = [Self::Star, Self::Heart, Self::Sparkle];

    pub fn glyph(self) -> char {
        match self {
            Self::Star => '✦',
            Self::Heart => '♡',
            Self::Sparkle => '✧',
        }
    }
}

/// Count and parameter ranges for one decorative effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSpec {
    pub name: &'static str,
    pub count: usize,
    pub x: Span,
    pub y: Option<Span>,
    pub duration_s: Span,
    pub delay_s: Span,
    pub rotation_deg: Option<Span>,
    pub size: Span,
    pub palette: Option<&'static [Rgb]>,
    pub kinds: Option<&'static [GlyphKind]>,
}

/// Confetti falling across the whole page. Vertical traversal is fixed, so only `x` varies.
pub const RAIN: EffectSpec = EffectSpec {
    name: "rain",
    count: 12,
    x: Span::new(0.0, 100.0),
    y: None,
    duration_s: Span::new(5.0, 8.0),
    delay_s: Span::new(0.0, 5.0),
    rotation_deg: Some(Span::new(0.0, 360.0)),
    size: Span::new(4.0, 12.0),
    palette: Some(&CONFETTI_PALETTE),
    kinds: None,
};

/// One-shot explosion around the centre of the screen.
pub const BURST: EffectSpec = EffectSpec {
    name: "burst",
    count: 40,
    x: Span::new(40.0, 60.0),
    y: None,
    duration_s: Span::new(1.0, 2.5),
    delay_s: Span::new(0.0, 0.2),
    rotation_deg: Some(Span::new(0.0, 720.0)),
    size: Span::new(5.0, 15.0),
    palette: Some(&CONFETTI_PALETTE),
    kinds: None,
};

pub const FLOATING: EffectSpec = EffectSpec {
    name: "floating",
    count: 15,
    x: Span::new(0.0, 100.0),
    y: Some(Span::new(0.0, 100.0)),
    duration_s: Span::new(12.0, 20.0),
    delay_s: Span::new(0.0, 3.0),
    rotation_deg: None,
    size: Span::new(4.0, 10.0),
    palette: None,
    kinds: Some(&GlyphKind::ALL),
};

/// Party-section hearts; `size` is a font size in pixels.
pub const HEARTS: EffectSpec = EffectSpec {
    name: "hearts",
    count: 8,
    x: Span::new(0.0, 100.0),
    y: None,
    duration_s: Span::new(12.0, 20.0),
    delay_s: Span::new(0.0, 8.0),
    rotation_deg: None,
    size: Span::new(10.0, 26.0),
    palette: None,
    kinds: None,
};

/// Twinkling stars behind the closing message.
pub const STARS: EffectSpec = EffectSpec {
    name: "stars",
    count: 12,
    x: Span::new(0.0, 100.0),
    y: Some(Span::new(0.0, 100.0)),
    duration_s: Span::new(3.0, 6.0),
    delay_s: Span::new(0.0, 2.0),
    rotation_deg: None,
    size: Span::fixed(1.0),
    palette: None,
    kinds: None,
};

/// Immutable randomized parameters for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub id: usize,
    pub x: f32,
    pub y: Option<f32>,
    pub duration_s: f32,
    pub delay_s: f32,
    pub color: Option<Rgb>,
    pub rotation_deg: Option<f32>,
    pub size: f32,
    pub kind: Option<GlyphKind>,
}

impl Particle {
    /// Position in the particle's looping cycle, in `[0, 1)`. `None` before the delay has passed.
    pub fn phase(&self, t_s: f32) -> Option<f32> {
        let local = t_s - self.delay_s;
        if local < 0.0 || self.duration_s <= 0.0 {
            return None;
        }
        Some((local / self.duration_s).fract())
    }
}

pub fn generate(spec: &EffectSpec, rng: &mut Rng) -> Vec<Particle> {
    (0..spec.count)
        .map(|id| Particle {
            id,
            x: spec.x.sample(rng),
            y: spec.y.map(|s| s.sample(rng)),
            duration_s: spec.duration_s.sample(rng),
            delay_s: spec.delay_s.sample(rng),
            color: spec.palette.and_then(|p| pick(p, rng)),
            rotation_deg: spec.rotation_deg.map(|s| s.sample(rng)),
            size: spec.size.sample(rng),
            kind: spec.kinds.and_then(|k| pick(k, rng)),
        })
        .collect()
}

fn pick<T: Copy>(items: &[T], rng: &mut Rng) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    Some(items[rng.usize(..items.len())])
}

/// Particles generated once and kept for the lifetime of the owning view.
#[derive(Debug, Clone)]
pub struct AmbientLayer {
    spec: EffectSpec,
    particles: Vec<Particle>,
}

impl AmbientLayer {
    pub fn new(spec: EffectSpec, rng: &mut Rng) -> Self {
        let particles = generate(&spec, rng);
        tracing::debug!(effect = spec.name, count = particles.len(), "ambient layer generated");
        Self { spec, particles }
    }

    pub fn spec(&self) -> &EffectSpec {
        &self.spec
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// Particles regenerated on every trigger and dropped after `lifetime`.
#[derive(Debug, Clone)]
pub struct Burst {
    spec: EffectSpec,
    lifetime: Duration,
    fired_at: Option<Duration>,
    particles: Vec<Particle>,
    generation: u64,
}

pub const HERO_BURST_LIFETIME: Duration = Duration::from_secs(3);
pub const PARTY_BURST_LIFETIME: Duration = Duration::from_secs(2);

impl Burst {
    pub fn new(spec: EffectSpec, lifetime: Duration) -> Self {
        Self {
            spec,
            lifetime,
            fired_at: None,
            particles: Vec::new(),
            generation: 0,
        }
    }

    pub fn fire(&mut self, now: Duration, rng: &mut Rng) {
        self.particles = generate(&self.spec, rng);
        self.fired_at = Some(now);
        self.generation += 1;
        tracing::debug!(effect = self.spec.name, generation = self.generation, "burst fired");
    }

    pub fn update(&mut self, now: Duration) {
        if let Some(at) = self.fired_at {
            if now.saturating_sub(at) >= self.lifetime {
                self.fired_at = None;
                self.particles.clear();
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.fired_at.is_some()
    }

    /// Seconds since the current burst fired.
    pub fn age_s(&self, now: Duration) -> Option<f32> {
        self.fired_at.map(|at| now.saturating_sub(at).as_secs_f32())
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of times the burst has fired; changes whenever the collection is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub const EQUALIZER_BARS: usize = 8;
pub const EQUALIZER_REST: f32 = 8.0;
pub const EQUALIZER_PEAK: Span = Span::new(8.0, 28.0);

pub fn equalizer_heights(playing: bool, rng: &mut Rng) -> [f32; EQUALIZER_BARS] {
    let mut out = [EQUALIZER_REST; EQUALIZER_BARS];
    if playing {
        for h in &mut out {
            *h = EQUALIZER_PEAK.sample(rng);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colours_parse() {
        assert_eq!(Rgb::parse_hex("#8B4513"), Some(Rgb(0x8b, 0x45, 0x13)));
        assert_eq!(Rgb::parse_hex("000080"), Some(Rgb(0, 0, 0x80)));
        assert_eq!(Rgb::parse_hex("#12345"), None);
        assert_eq!(Rgb::parse_hex("#zz0000"), None);
    }

    #[test]
    fn phase_waits_for_delay_then_loops() {
        let p = Particle {
            id: 0,
            x: 0.0,
            y: None,
            duration_s: 4.0,
            delay_s: 1.0,
            color: None,
            rotation_deg: None,
            size: 1.0,
            kind: None,
        };
        assert_eq!(p.phase(0.5), None);
        assert_eq!(p.phase(3.0), Some(0.5));
        assert_eq!(p.phase(5.0), Some(0.0));
    }
}
