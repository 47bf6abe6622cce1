#![allow(missing_docs)]
//! Host-level tests for the starfield's random source.

use core::num::NonZeroU16;

use lamp_matrix::lfsr::{LFSR_PERIOD, LFSR_SEED, LFSR_TAPS, Lfsr};

#[test]
fn boots_with_seed() {
    assert_eq!(Lfsr::new().value(), LFSR_SEED);
    assert_eq!(Lfsr::default().value(), 0xCAFE);
    assert_eq!(LFSR_TAPS, 0xB400);
}

#[test]
fn first_steps_match_galois_feedback() {
    let mut lfsr = Lfsr::new();
    assert_eq!(lfsr.step(), 0x657F); // even: plain shift
    assert_eq!(lfsr.step(), 0x86BF); // odd: shift then taps
    assert_eq!(lfsr.step(), 0xF75F);
    assert_eq!(lfsr.step(), 0xCFAF);
}

#[test]
fn steps_returns_final_state() {
    let mut lfsr = Lfsr::new();
    assert_eq!(lfsr.steps(4), 0xCFAF);
    assert_eq!(lfsr.steps(4), 0xD97A);
    assert_eq!(lfsr.steps(0), 0xD97A);
}

#[test]
fn is_deterministic() {
    let first: Vec<u16> = Lfsr::new().take(1000).collect();
    let second: Vec<u16> = Lfsr::new().take(1000).collect();
    assert_eq!(first, second);
}

#[test]
fn visits_every_non_zero_state_once_per_period() {
    let mut seen = vec![false; 1 << 16];
    let mut lfsr = Lfsr::new();
    for step in 0..LFSR_PERIOD {
        let value = lfsr.step();
        assert_ne!(value, 0, "zero at step {step}");
        assert!(!seen[usize::from(value)], "repeat of {value:#06x} at step {step}");
        seen[usize::from(value)] = true;
    }
    assert_eq!(lfsr.value(), LFSR_SEED);
}

#[test]
fn custom_seed_starts_elsewhere() {
    let seed = NonZeroU16::new(1).expect("1 is non-zero");
    let mut lfsr = Lfsr::with_seed(seed);
    assert_eq!(lfsr.value(), 1);
    assert_eq!(lfsr.step(), 0xB400);
}
