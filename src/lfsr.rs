//! A 16-bit Galois linear-feedback shift register.
//!
//! Drives the sparkle positions of the starfield animation. See [`Lfsr`].

use core::num::NonZeroU16;

/// Boot seed.
pub const LFSR_SEED: u16 = 0xCAFE;

/// Feedback taps (x^16 + x^14 + x^13 + x^11 + 1), a maximal-length polynomial.
pub const LFSR_TAPS: u16 = 0xB400;

/// Number of distinct states visited before the sequence repeats.
pub const LFSR_PERIOD: u32 = 65_535;

const SEED: NonZeroU16 = match NonZeroU16::new(LFSR_SEED) {
    Some(seed) => seed,
    None => panic!("LFSR seed must be non-zero"),
};

/// A 16-bit Galois LFSR that never enters the all-zero state.
///
/// Each step shifts right by one; when the bit shifted out is `1`, the result is
/// XORed with [`LFSR_TAPS`]. Because the taps set the top bit, feedback can never
/// produce zero, so the register cycles through all 65535 non-zero values.
///
/// The type also works as an endless [`Iterator`] of successive states.
///
/// # Example
///
/// ```rust,no_run
/// use lamp_matrix::lfsr::Lfsr;
///
/// let mut lfsr = Lfsr::new();
/// assert_eq!(lfsr.value(), 0xCAFE);
/// assert_eq!(lfsr.step(), 0x657F);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lfsr(NonZeroU16);

impl Lfsr {
    /// Create a register holding [`LFSR_SEED`].
    #[must_use]
    pub const fn new() -> Self {
        Self(SEED)
    }

    /// Create a register from any non-zero seed.
    #[must_use]
    pub const fn with_seed(seed: NonZeroU16) -> Self {
        Self(seed)
    }

    /// The current state.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0.get()
    }

    /// Advance one step and return the new state.
    pub fn step(&mut self) -> u16 {
        let value = self.0.get();
        let mut next = value >> 1;
        if value & 1 == 1 {
            next ^= LFSR_TAPS;
        }
        // Zero is unreachable from a non-zero state; keep the seed as a fallback.
        self.0 = NonZeroU16::new(next).unwrap_or(SEED);
        self.0.get()
    }

    /// Advance `count` steps and return the final state.
    pub fn steps(&mut self, count: u8) -> u16 {
        for _ in 0..count {
            self.step();
        }
        self.value()
    }
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for Lfsr {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.step())
    }
}
