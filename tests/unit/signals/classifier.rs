//! Unit tests for the signal classifier policies

use elderix::models::signal::{ElderRaySnapshot, SignalDirection};
use elderix::signals::classifier::{SignalClassifier, SignalPolicy};

fn snapshot(bull_power: f64, bear_power: f64) -> ElderRaySnapshot {
    ElderRaySnapshot {
        ema: 100.0,
        atr: Some(5.0),
        bull_power,
        bear_power,
        bull_strong: false,
        bear_strong: false,
    }
}

fn strong_snapshot(bull_strong: bool, bear_strong: bool) -> ElderRaySnapshot {
    ElderRaySnapshot {
        bull_strong,
        bear_strong,
        ..snapshot(0.0, 0.0)
    }
}

#[test]
fn strong_bull_only_is_long() {
    let mut classifier = SignalClassifier::new(SignalPolicy::StrongThreshold);
    // bull = 2*k*atr, bear = 0 territory
    let signal = classifier.classify(&ElderRaySnapshot {
        bull_power: 10.0,
        bear_power: 0.0,
        ..strong_snapshot(true, false)
    });
    assert_eq!(signal, SignalDirection::Long);
}

#[test]
fn strong_bear_only_is_short() {
    let mut classifier = SignalClassifier::new(SignalPolicy::StrongThreshold);
    let signal = classifier.classify(&ElderRaySnapshot {
        bull_power: 0.0,
        bear_power: -10.0,
        ..strong_snapshot(false, true)
    });
    assert_eq!(signal, SignalDirection::Short);
}

#[test]
fn neither_strong_is_neutral() {
    let mut classifier = SignalClassifier::new(SignalPolicy::StrongThreshold);
    assert_eq!(
        classifier.classify(&strong_snapshot(false, false)),
        SignalDirection::Neutral
    );
}

#[test]
fn both_strong_resolves_to_neutral() {
    let mut classifier = SignalClassifier::new(SignalPolicy::StrongThreshold);
    assert_eq!(
        classifier.classify(&strong_snapshot(true, true)),
        SignalDirection::Neutral
    );
}

#[test]
fn zero_cross_first_cycle_is_neutral() {
    let mut classifier = SignalClassifier::new(SignalPolicy::ZeroCross { min_strength: None });
    assert_eq!(
        classifier.classify(&snapshot(1.0, 2.0)),
        SignalDirection::Neutral
    );
}

#[test]
fn bull_crossing_up_with_improving_bear_is_long() {
    let mut classifier = SignalClassifier::new(SignalPolicy::ZeroCross { min_strength: None });
    classifier.classify(&snapshot(-1.0, 0.0));
    assert_eq!(
        classifier.classify(&snapshot(1.0, 2.0)),
        SignalDirection::Long
    );
}

#[test]
fn bear_crossing_down_with_fading_bull_is_short() {
    let mut classifier = SignalClassifier::new(SignalPolicy::ZeroCross { min_strength: None });
    classifier.classify(&snapshot(0.0, 1.0));
    assert_eq!(
        classifier.classify(&snapshot(-2.0, -1.0)),
        SignalDirection::Short
    );
}

#[test]
fn cross_without_improving_bear_stays_neutral() {
    let mut classifier = SignalClassifier::new(SignalPolicy::ZeroCross { min_strength: None });
    classifier.classify(&snapshot(-1.0, 3.0));
    // bull crosses zero but bear power deteriorated
    assert_eq!(
        classifier.classify(&snapshot(1.0, 2.0)),
        SignalDirection::Neutral
    );
}

#[test]
fn min_strength_filters_weak_crosses() {
    let mut classifier = SignalClassifier::new(SignalPolicy::ZeroCross {
        min_strength: Some(1.5),
    });
    classifier.classify(&snapshot(-1.0, 0.0));
    assert_eq!(
        classifier.classify(&snapshot(1.0, 2.0)),
        SignalDirection::Neutral
    );

    let mut classifier = SignalClassifier::new(SignalPolicy::ZeroCross {
        min_strength: Some(1.5),
    });
    classifier.classify(&snapshot(-1.0, 0.0));
    assert_eq!(
        classifier.classify(&snapshot(2.0, 2.0)),
        SignalDirection::Long
    );
}

#[test]
fn previous_pair_advances_every_cycle() {
    let mut classifier = SignalClassifier::new(SignalPolicy::ZeroCross { min_strength: None });
    classifier.classify(&snapshot(-1.0, 0.0));
    classifier.classify(&snapshot(-0.5, 1.0));
    // prev is now (-0.5, 1.0), so this cross still qualifies
    assert_eq!(
        classifier.classify(&snapshot(0.5, 2.0)),
        SignalDirection::Long
    );
}

#[test]
fn policy_min_bars_depends_on_policy() {
    assert_eq!(SignalPolicy::StrongThreshold.min_bars(13), 30);
    assert_eq!(SignalPolicy::StrongThreshold.min_bars(50), 50);
    assert_eq!(
        SignalPolicy::ZeroCross { min_strength: None }.min_bars(13),
        13
    );
    assert!(SignalPolicy::StrongThreshold.requires_atr());
    assert!(!SignalPolicy::ZeroCross { min_strength: None }.requires_atr());
}
