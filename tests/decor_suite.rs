use std::collections::HashSet;
use std::time::Duration;

use birthday_reveal::decor::{
    AmbientLayer, BURST, Burst, CONFETTI_PALETTE, EQUALIZER_BARS, EQUALIZER_PEAK, EQUALIZER_REST,
    EffectSpec, FLOATING, GlyphKind, HEARTS, Particle, RAIN, STARS, Span, equalizer_heights,
    generate,
};

fn assert_within(spec: &EffectSpec, particles: &[Particle]) {
    assert_eq!(particles.len(), spec.count, "{}: wrong count", spec.name);
    for (i, p) in particles.iter().enumerate() {
        let ctx = format!("{} particle {i}", spec.name);
        assert_eq!(p.id, i, "{ctx}: ids follow generation order");
        assert!(spec.x.contains(p.x), "{ctx}: x={} outside {:?}", p.x, spec.x);
        assert!(spec.duration_s.contains(p.duration_s), "{ctx}: duration={}", p.duration_s);
        assert!(spec.delay_s.contains(p.delay_s), "{ctx}: delay={}", p.delay_s);
        assert!(spec.size.contains(p.size), "{ctx}: size={}", p.size);
        assert!(p.duration_s >= 0.0 && p.delay_s >= 0.0);

        match (spec.y, p.y) {
            (Some(span), Some(y)) => assert!(span.contains(y), "{ctx}: y={y}"),
            (None, None) => {}
            other => panic!("{ctx}: y presence mismatch {other:?}"),
        }
        match (spec.rotation_deg, p.rotation_deg) {
            (Some(span), Some(r)) => assert!(span.contains(r), "{ctx}: rotation={r}"),
            (None, None) => {}
            other => panic!("{ctx}: rotation presence mismatch {other:?}"),
        }
        match (spec.palette, p.color) {
            (Some(palette), Some(c)) => assert!(palette.contains(&c), "{ctx}: colour {c:?}"),
            (None, None) => {}
            other => panic!("{ctx}: colour presence mismatch {other:?}"),
        }
        match (spec.kinds, p.kind) {
            (Some(kinds), Some(k)) => assert!(kinds.contains(&k)),
            (None, None) => {}
            other => panic!("{ctx}: kind presence mismatch {other:?}"),
        }
    }
}

#[test]
fn declared_counts_and_ranges() {
    assert_eq!(RAIN.count, 12);
    assert_eq!(BURST.count, 40);
    assert_eq!(FLOATING.count, 15);
    assert_eq!(HEARTS.count, 8);

    assert_eq!(RAIN.duration_s, Span::new(5.0, 8.0));
    assert_eq!(BURST.duration_s, Span::new(1.0, 2.5));
    assert_eq!(FLOATING.duration_s, Span::new(12.0, 20.0));
    assert_eq!(HEARTS.duration_s, Span::new(12.0, 20.0));
    assert_eq!(BURST.x, Span::new(40.0, 60.0));
    assert_eq!(HEARTS.size, Span::new(10.0, 26.0));
}

#[test]
fn every_effect_stays_within_its_ranges() {
    let mut rng = fastrand::Rng::with_seed(42);
    for spec in [RAIN, BURST, FLOATING, HEARTS, STARS] {
        for _ in 0..250 {
            let particles = generate(&spec, &mut rng);
            assert_within(&spec, &particles);
        }
    }
}

#[test]
fn palette_and_kinds_are_all_reachable() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut colours = HashSet::new();
    let mut kinds = HashSet::new();
    for _ in 0..50 {
        colours.extend(generate(&RAIN, &mut rng).iter().filter_map(|p| p.color));
        kinds.extend(generate(&FLOATING, &mut rng).iter().filter_map(|p| p.kind));
    }
    assert_eq!(colours.len(), CONFETTI_PALETTE.len());
    assert_eq!(kinds, GlyphKind::ALL.into_iter().collect::<HashSet<_>>());
}

#[test]
fn same_seed_reproduces_and_fresh_calls_vary() {
    let a = generate(&BURST, &mut fastrand::Rng::with_seed(99));
    let b = generate(&BURST, &mut fastrand::Rng::with_seed(99));
    assert_eq!(a, b);

    let mut rng = fastrand::Rng::with_seed(99);
    let first = generate(&BURST, &mut rng);
    let second = generate(&BURST, &mut rng);
    assert_ne!(first, second);
}

#[test]
fn ambient_layer_is_generated_once() {
    let mut rng = fastrand::Rng::with_seed(1);
    let layer = AmbientLayer::new(FLOATING, &mut rng);
    let snapshot = layer.particles().to_vec();
    let _ = generate(&FLOATING, &mut rng);
    assert_eq!(layer.particles(), snapshot.as_slice());
    assert_eq!(layer.spec().count, 15);
}

#[test]
fn burst_regenerates_per_trigger_and_expires() {
    let mut rng = fastrand::Rng::with_seed(5);
    let mut burst = Burst::new(BURST, Duration::from_secs(2));
    assert!(!burst.is_active());
    assert!(burst.particles().is_empty());

    burst.fire(Duration::from_secs(1), &mut rng);
    let first = burst.particles().to_vec();
    assert_eq!(first.len(), 40);
    assert_eq!(burst.generation(), 1);

    burst.update(Duration::from_millis(2500));
    assert!(burst.is_active());
    assert_eq!(burst.age_s(Duration::from_millis(2500)), Some(1.5));

    burst.fire(Duration::from_millis(2500), &mut rng);
    assert_eq!(burst.generation(), 2);
    assert_ne!(burst.particles(), first.as_slice());

    burst.update(Duration::from_millis(4500));
    assert!(!burst.is_active());
    assert!(burst.particles().is_empty());
}

#[test]
fn equalizer_rests_when_paused() {
    let mut rng = fastrand::Rng::with_seed(3);
    assert_eq!(equalizer_heights(false, &mut rng), [EQUALIZER_REST; EQUALIZER_BARS]);
    for _ in 0..100 {
        for h in equalizer_heights(true, &mut rng) {
            assert!(EQUALIZER_PEAK.contains(h));
        }
    }
}

#[test]
fn degenerate_span_is_fixed() {
    let mut rng = fastrand::Rng::with_seed(0);
    let s = Span::fixed(1.0);
    assert_eq!(s.sample(&mut rng), 1.0);
    assert!(s.contains(1.0));
    assert!(!s.contains(1.5));
}
