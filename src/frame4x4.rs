//! A 4×4 one-bit lamp bitmap and the shift transform applied to it.
//!
//! See [`Frame4x4`] for the bit layout and an example.

use core::convert::Infallible;

use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

/// Width and height of the lamp matrix.
pub const SIZE: usize = 4;

const SIZE_U8: u8 = SIZE as u8;

/// Mask for one row (a nibble).
pub const NIBBLE_MASK: u8 = 0x0F;

/// A 4×4 lamp bitmap packed into 16 bits.
///
/// Row `y` occupies bits `4y..4y+3`; within a row, bit `x` is column `x`.
/// A lit lamp is a `1` bit.
///
/// Frames can be built from row nibbles, bit by bit, or by drawing with the
/// [`embedded-graphics`](https://docs.rs/embedded-graphics) API.
///
/// # Example
///
/// ```rust,no_run
/// use lamp_matrix::frame4x4::Frame4x4;
///
/// // Rows are listed top to bottom; column 0 is the lowest bit of each row.
/// const CIRCLE: Frame4x4 = Frame4x4::from_rows([0b0110, 0b1001, 0b1001, 0b0110]);
///
/// assert_eq!(CIRCLE.row(1), 0b1001);
/// assert!(CIRCLE.is_lit(0, 1));
/// assert_eq!(CIRCLE.shifted(0, 0), CIRCLE);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame4x4(pub u16);

impl Frame4x4 {
    /// All lamps off.
    pub const EMPTY: Self = Self(0);

    /// All lamps on.
    pub const FULL: Self = Self(u16::MAX);

    /// Create a frame from raw packed bits.
    #[must_use]
    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    /// Create a frame from four row nibbles, top row first.
    ///
    /// Bits above the low nibble of each row are ignored.
    #[must_use]
    pub const fn from_rows(rows: [u8; SIZE]) -> Self {
        let mut bits = 0u16;
        let mut y = 0;
        while y < SIZE {
            bits |= ((rows[y] & NIBBLE_MASK) as u16) << (4 * y);
            y += 1;
        }
        Self(bits)
    }

    /// A frame with exactly one lamp lit, addressed by bit position `0..16`.
    ///
    /// Only the low 4 bits of `bit_index` are used.
    #[must_use]
    pub const fn single(bit_index: u8) -> Self {
        Self(1 << (bit_index & NIBBLE_MASK))
    }

    /// The packed bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Row `y` as a nibble. `y` is taken mod 4.
    #[must_use]
    pub const fn row(self, y: u8) -> u8 {
        ((self.0 >> (4 * (y % SIZE_U8))) as u8) & NIBBLE_MASK
    }

    /// All four rows, top row first.
    #[must_use]
    pub const fn rows(self) -> [u8; SIZE] {
        [self.row(0), self.row(1), self.row(2), self.row(3)]
    }

    /// Whether the lamp at column `x`, row `y` is lit.
    #[must_use]
    pub const fn is_lit(self, x: u8, y: u8) -> bool {
        (self.row(y) >> (x % SIZE_U8)) & 1 == 1
    }

    /// Turn the lamp at column `x`, row `y` on or off.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the 4×4 grid.
    pub fn set(&mut self, x: u8, y: u8, lit: bool) {
        assert!(usize::from(x) < SIZE, "x must be within width");
        assert!(usize::from(y) < SIZE, "y must be within height");
        let mask = 1u16 << (4 * y + x);
        if lit {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }

    /// Number of lit lamps.
    #[must_use]
    pub const fn lit_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Scroll the frame.
    ///
    /// Destination row `y` shows source row `(y + y_shift) mod 4`, and each row is
    /// rotated left by `x_shift` within its nibble. Both shifts are taken mod 4, and
    /// `shifted(0, 0)` is the identity.
    #[must_use]
    pub const fn shifted(self, x_shift: u8, y_shift: u8) -> Self {
        let mut rows = [0u8; SIZE];
        let mut y = 0;
        while y < SIZE {
            let source_y = (y as u8).wrapping_add(y_shift % SIZE_U8) % SIZE_U8;
            rows[y] = rotate_nibble_left(self.row(source_y), x_shift);
            y += 1;
        }
        Self::from_rows(rows)
    }
}

/// Circular left rotation of the low 4 bits of `row` by `amount` (taken mod 4).
///
/// Bits leaving the top of the nibble re-enter at bit 0. An amount of 0 returns the
/// row unchanged without ever shifting by the full nibble width.
#[must_use]
pub const fn rotate_nibble_left(row: u8, amount: u8) -> u8 {
    let row = row & NIBBLE_MASK;
    let amount = amount % SIZE_U8;
    if amount == 0 {
        return row;
    }
    ((row << amount) | (row >> (SIZE_U8 - amount))) & NIBBLE_MASK
}

impl From<u16> for Frame4x4 {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<Frame4x4> for u16 {
    fn from(frame: Frame4x4) -> Self {
        frame.0
    }
}

impl OriginDimensions for Frame4x4 {
    fn size(&self) -> Size {
        Size::new(SIZE as u32, SIZE as u32)
    }
}

impl DrawTarget for Frame4x4 {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            // Off-panel pixels are clipped.
            if let (Ok(x), Ok(y)) = (u8::try_from(coord.x), u8::try_from(coord.y)) {
                if usize::from(x) < SIZE && usize::from(y) < SIZE {
                    self.set(x, y, color.is_on());
                }
            }
        }
        Ok(())
    }
}
