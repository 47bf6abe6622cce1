//! Animation engine and device glue for a 4×4 multiplexed lamp matrix on the Pico 1 and 2.
//!
//! A fixed library of [programs](program::PROGRAMS) is stepped once per display scan by
//! the [scheduler](scheduler::AnimationScheduler); a single button cycles through them.
//! [`matrix::LampMatrix`] ties the pieces into the firmware loop.
//!
//! # Glossary
//!
//! - **Scan cycle:** one pass over all four rows (about 2 ms). All animation timing is
//!   counted in scan cycles.
//! - **Virtual program:** a program that stores one bitmap and animates it through its
//!   update hook instead of storing one bitmap per frame.
//! - **Lockout:** the [`DEBOUNCE_CYCLES`](button::DEBOUNCE_CYCLES) window after a press
//!   during which further button edges are ignored.
//! - **PWM ([Pulse Width Modulation](https://en.wikipedia.org/wiki/Pulse-width_modulation)) Slices:**
//!   Both Pico 1 and 2 have 8 slices (& 16 channels). These "slices" are unrelated to Rust
//!   slices.
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time check: the ARM core is the only supported architecture
#[cfg(all(not(feature = "arm"), not(feature = "host")))]
compile_error!("Must enable the 'arm' architecture feature");

pub mod brightness;
pub mod button;
mod error;
pub mod frame4x4;
pub mod lfsr;
pub mod matrix;
pub mod program;
pub mod scanner;
pub mod scheduler;
#[cfg(feature = "host")]
pub mod to_png;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
