//! Row multiplexing for the lamp matrix through a 74HC595 shift register.
//!
//! Each row is one byte: the high nibble enables columns (active low, only the
//! current row's bit pulled low) and the low nibble carries that row's lamps.
//! See [`row_word`] and [`ShiftRegister595`].

use embassy_time::Duration;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

use crate::frame4x4::{Frame4x4, NIBBLE_MASK, SIZE};
use crate::{Error, Result};

/// Rows driven per scan pass.
pub const ROW_COUNT: usize = SIZE;

/// How long each row stays lit, in microseconds.
pub const ROW_SETTLE_US: u32 = 500;

/// How long each row stays lit.
#[expect(clippy::cast_lossless, reason = "u64::from is not const")]
pub const ROW_SETTLE: Duration = Duration::from_micros(ROW_SETTLE_US as u64);

/// One full pass over all rows, in microseconds (the nominal scan cycle).
#[expect(clippy::cast_lossless, reason = "u64::from is not const")]
pub const SCAN_PERIOD_US: u64 = ROW_SETTLE_US as u64 * ROW_COUNT as u64;

/// Anything that can latch one byte onto the matrix drivers.
pub trait ShiftOut {
    /// Shift `byte` out and latch it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if a pin cannot be driven.
    fn send(&mut self, byte: u8) -> Result<()>;
}

impl<T: ShiftOut + ?Sized> ShiftOut for &mut T {
    fn send(&mut self, byte: u8) -> Result<()> {
        (**self).send(byte)
    }
}

/// The byte that lights row `y` of `frame`.
///
/// ```rust,no_run
/// use lamp_matrix::{frame4x4::Frame4x4, scanner::row_word};
///
/// let frame = Frame4x4::from_rows([0b0110, 0, 0, 0]);
/// assert_eq!(row_word(frame, 0), 0b1110_0110);
/// assert_eq!(row_word(frame, 3), 0b0111_0000);
/// ```
#[must_use]
pub const fn row_word(frame: Frame4x4, y: u8) -> u8 {
    let enable = !(1u8 << (y % ROW_COUNT as u8)) & NIBBLE_MASK;
    (enable << 4) | frame.row(y)
}

/// The bytes for one scan pass, top row first.
#[must_use]
pub const fn row_words(frame: Frame4x4) -> [u8; ROW_COUNT] {
    [
        row_word(frame, 0),
        row_word(frame, 1),
        row_word(frame, 2),
        row_word(frame, 3),
    ]
}

/// A bit-banged 74HC595: data, shift clock, and storage latch.
///
/// Bits go out least significant first, each followed by a clock pulse; a latch pulse
/// then moves the byte to the outputs.
///
/// # Example
///
/// ```rust,ignore
/// use embassy_rp::gpio::{Level, Output};
/// use lamp_matrix::scanner::{ShiftOut, ShiftRegister595};
///
/// fn example(p: embassy_rp::Peripherals) -> lamp_matrix::Result<()> {
///     let mut shift_register = ShiftRegister595::new(
///         Output::new(p.PIN_4, Level::Low),
///         Output::new(p.PIN_2, Level::Low),
///         Output::new(p.PIN_1, Level::Low),
///     );
///     shift_register.send(0b1110_0110)
/// }
/// ```
pub struct ShiftRegister595<D, C, L> {
    data: D,
    clock: C,
    latch: L,
}

impl<D, C, L> ShiftRegister595<D, C, L>
where
    D: OutputPin,
    C: OutputPin,
    L: OutputPin,
{
    /// Wrap the three output pins.
    #[must_use]
    pub const fn new(data: D, clock: C, latch: L) -> Self {
        Self { data, clock, latch }
    }

    /// Give the pins back.
    pub fn release(self) -> (D, C, L) {
        (self.data, self.clock, self.latch)
    }
}

impl<D, C, L> ShiftOut for ShiftRegister595<D, C, L>
where
    D: OutputPin,
    C: OutputPin,
    L: OutputPin,
{
    fn send(&mut self, byte: u8) -> Result<()> {
        for bit in 0..u8::BITS {
            let state = PinState::from((byte >> bit) & 1 == 1);
            self.data
                .set_state(state)
                .map_err(|_| Error::CannotSetOutputState)?;
            pulse(&mut self.clock)?;
        }
        pulse(&mut self.latch)
    }
}

fn pulse<P: OutputPin>(pin: &mut P) -> Result<()> {
    pin.set_high().map_err(|_| Error::CannotSetOutputState)?;
    pin.set_low().map_err(|_| Error::CannotSetOutputState)
}

/// Show `frame` once: each row is latched and held for [`ROW_SETTLE`].
///
/// On the board `delay` is `embassy_time::Delay`.
///
/// # Errors
///
/// Returns any error from `shift_out`.
pub async fn scan<S, D>(shift_out: &mut S, delay: &mut D, frame: Frame4x4) -> Result<()>
where
    S: ShiftOut,
    D: DelayNs,
{
    for word in row_words(frame) {
        shift_out.send(word)?;
        delay.delay_us(ROW_SETTLE_US).await;
    }
    Ok(())
}
