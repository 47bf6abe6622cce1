//! Compiled-in animation programs and the table the button cycles through.
//!
//! See [`AnimationProgram`] for how a program is described and [`PROGRAMS`] for the
//! built-in library.

use crate::frame4x4::Frame4x4;
use crate::scheduler::UpdateHook;

/// Largest frame count a program may declare (7 bits).
pub const MAX_FRAME_COUNT: u8 = 0x7F;

/// Largest number of programs a table may hold (the program index is 3 bits).
pub const MAX_PROGRAMS: usize = 8;

/// Frame delay that is never counted down: the program shows its first frame and holds it.
pub const STILL_FRAME_DELAY: u8 = u8::MAX;

/// An immutable description of one animation.
///
/// A program has `frame_count` logical frames, shown for `frame_delay` scan cycles
/// each. A *virtual* program stores a single bitmap and gets all of its motion from
/// its [`UpdateHook`]; other programs store one bitmap per logical frame.
///
/// Programs are checked when they are built. Because the constructors are `const`,
/// a malformed program in a `static` or `const` item fails to compile.
///
/// # Example
///
/// ```rust,no_run
/// use lamp_matrix::{frame4x4::Frame4x4, program::AnimationProgram, scheduler::UpdateHook};
///
/// static DOT: [Frame4x4; 1] = [Frame4x4::single(0)];
///
/// // One stored dot, moved one column to the left every 100 scan cycles.
/// static MARCHING_DOT: AnimationProgram =
///     AnimationProgram::shifting("marching dot", &DOT, 4, 100, UpdateHook::HorizontalShift);
///
/// assert!(MARCHING_DOT.is_virtual());
/// assert_eq!(MARCHING_DOT.frame_count(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationProgram {
    name: &'static str,
    frame_count: u8,
    is_virtual: bool,
    frame_delay: u8,
    update_hook: UpdateHook,
    frames: &'static [Frame4x4],
}

impl AnimationProgram {
    /// Describe a program field by field.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`/`static`) if `frame_count`
    /// exceeds [`MAX_FRAME_COUNT`] or if `frames` does not hold one bitmap for a
    /// virtual program, `frame_count` bitmaps for a stored sequence, or none when
    /// `frame_count` is 0.
    #[must_use]
    pub const fn new(
        name: &'static str,
        frame_count: u8,
        is_virtual: bool,
        frame_delay: u8,
        update_hook: UpdateHook,
        frames: &'static [Frame4x4],
    ) -> Self {
        assert!(
            frame_count <= MAX_FRAME_COUNT,
            "frame_count must fit in 7 bits"
        );
        let expected_len = if frame_count == 0 {
            0
        } else if is_virtual {
            1
        } else {
            frame_count as usize
        };
        assert!(
            frames.len() == expected_len,
            "frames must hold one bitmap per stored frame"
        );
        Self {
            name,
            frame_count,
            is_virtual,
            frame_delay,
            update_hook,
            frames,
        }
    }

    /// A still image: one frame, shown until the program is switched.
    #[must_use]
    pub const fn still(name: &'static str, frame: &'static [Frame4x4; 1]) -> Self {
        Self::new(name, 1, true, STILL_FRAME_DELAY, UpdateHook::None, frame)
    }

    /// One stored bitmap scrolled by `update_hook` over `frame_count` logical frames.
    #[must_use]
    pub const fn shifting(
        name: &'static str,
        frame: &'static [Frame4x4; 1],
        frame_count: u8,
        frame_delay: u8,
        update_hook: UpdateHook,
    ) -> Self {
        Self::new(name, frame_count, true, frame_delay, update_hook, frame)
    }

    /// A flip-book of stored bitmaps, one per logical frame.
    ///
    /// # Panics
    ///
    /// Panics if there are more than [`MAX_FRAME_COUNT`] frames.
    #[must_use]
    pub const fn sequence(
        name: &'static str,
        frames: &'static [Frame4x4],
        frame_delay: u8,
    ) -> Self {
        assert!(
            frames.len() <= MAX_FRAME_COUNT as usize,
            "frame_count must fit in 7 bits"
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "length checked against MAX_FRAME_COUNT above"
        )]
        let frame_count = frames.len() as u8;
        Self::new(name, frame_count, false, frame_delay, UpdateHook::None, frames)
    }

    /// A program with no stored frames whose hook draws the framebuffer directly.
    #[must_use]
    pub const fn generated(name: &'static str, frame_delay: u8, update_hook: UpdateHook) -> Self {
        Self::new(name, 0, true, frame_delay, update_hook, &[])
    }

    /// Human-readable name, used in logs and preview file names.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of logical frames.
    #[must_use]
    pub const fn frame_count(&self) -> u8 {
        self.frame_count
    }

    /// Whether every logical frame reuses the single stored bitmap.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// Scan cycles to wait between frames. [`STILL_FRAME_DELAY`] means "never advance".
    #[must_use]
    pub const fn frame_delay(&self) -> u8 {
        self.frame_delay
    }

    /// The hook run after each frame advance.
    #[must_use]
    pub const fn update_hook(&self) -> UpdateHook {
        self.update_hook
    }

    /// The stored bitmaps.
    #[must_use]
    pub const fn frames(&self) -> &'static [Frame4x4] {
        self.frames
    }

    /// The stored bitmap behind logical frame `frame_index`.
    ///
    /// Virtual programs always answer with their single bitmap. Returns `None` for a
    /// program with no stored frames or an out-of-range index.
    #[must_use]
    pub fn source_frame(&self, frame_index: u8) -> Option<Frame4x4> {
        let index = if self.is_virtual {
            0
        } else {
            usize::from(frame_index)
        };
        self.frames.get(index).copied()
    }

    /// Render logical frame `frame_index` with the given scroll.
    ///
    /// A pure function of its arguments. Returns `None` when there is nothing to
    /// render, in which case the caller keeps showing what it already has.
    #[must_use]
    pub fn render(&self, frame_index: u8, x_shift: u8, y_shift: u8) -> Option<Frame4x4> {
        self.source_frame(frame_index)
            .map(|frame| frame.shifted(x_shift, y_shift))
    }

    /// The logical frame after `frame_index`, wrapping to 0.
    ///
    /// Stays at 0 for a program with no frames.
    #[must_use]
    pub const fn next_frame_index(&self, frame_index: u8) -> u8 {
        let next = frame_index.wrapping_add(1);
        if next >= self.frame_count { 0 } else { next }
    }
}

/// A fixed, non-empty catalogue of programs.
///
/// Lookups wrap modulo the table length, so every `u8` index names a program.
#[derive(Clone, Copy, Debug)]
pub struct ProgramTable(&'static [AnimationProgram]);

impl ProgramTable {
    /// Wrap a program slice.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in a `const`/`static`) if `programs` is empty or holds
    /// more than [`MAX_PROGRAMS`] entries.
    #[must_use]
    pub const fn new(programs: &'static [AnimationProgram]) -> Self {
        assert!(!programs.is_empty(), "a program table needs at least one program");
        assert!(
            programs.len() <= MAX_PROGRAMS,
            "a program table holds at most 8 programs"
        );
        Self(programs)
    }

    /// Number of programs.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "length is at most MAX_PROGRAMS"
    )]
    pub const fn len(self) -> u8 {
        self.0.len() as u8
    }

    /// Always `false`; tables are never empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// The program at `index` (mod table length).
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        clippy::integer_division_remainder_used,
        reason = "the index is reduced modulo the non-empty table length"
    )]
    pub const fn get(self, index: u8) -> &'static AnimationProgram {
        &self.0[index as usize % self.0.len()]
    }

    /// The index after `index`, wrapping from the last program to 0.
    #[must_use]
    pub const fn next_index(self, index: u8) -> u8 {
        let next = index.wrapping_add(1);
        if next >= self.len() { 0 } else { next }
    }

    /// All programs in selection order.
    pub fn iter(self) -> core::slice::Iter<'static, AnimationProgram> {
        self.0.iter()
    }

    /// The underlying slice.
    #[must_use]
    pub const fn as_slice(self) -> &'static [AnimationProgram] {
        self.0
    }
}

impl IntoIterator for ProgramTable {
    type Item = &'static AnimationProgram;
    type IntoIter = core::slice::Iter<'static, AnimationProgram>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Built-in library
// ============================================================================

static CIRCLE: [Frame4x4; 1] = [Frame4x4::from_rows([0b0110, 0b1001, 0b1001, 0b0110])];

static X: [Frame4x4; 1] = [Frame4x4::from_rows([0b1001, 0b0110, 0b0110, 0b1001])];

static V_LINE: [Frame4x4; 1] = [Frame4x4::from_rows([0b0001, 0b0001, 0b0001, 0b0001])];

static H_LINE: [Frame4x4; 1] = [Frame4x4::from_rows([0b1111, 0b0000, 0b0000, 0b0000])];

static CHEVRON: [Frame4x4; 1] = [Frame4x4::from_rows([0b0001, 0b0010, 0b0010, 0b0001])];

static PULSE: [Frame4x4; 6] = [
    Frame4x4::from_rows([0b0000, 0b0000, 0b0100, 0b0000]),
    Frame4x4::from_rows([0b0000, 0b0010, 0b0100, 0b0000]),
    Frame4x4::from_rows([0b0000, 0b0110, 0b0110, 0b0000]),
    Frame4x4::from_rows([0b0010, 0b1110, 0b0111, 0b0100]),
    Frame4x4::from_rows([0b0110, 0b1111, 0b1111, 0b0110]),
    Frame4x4::FULL,
];

static BUILT_IN: [AnimationProgram; 7] = [
    AnimationProgram::still("circle", &CIRCLE),
    AnimationProgram::still("x", &X),
    AnimationProgram::shifting(
        "vertical line scroll",
        &V_LINE,
        4,
        70,
        UpdateHook::HorizontalShift,
    ),
    AnimationProgram::shifting(
        "horizontal line scroll",
        &H_LINE,
        4,
        70,
        UpdateHook::VerticalShift,
    ),
    AnimationProgram::shifting("chevron", &CHEVRON, 3, 50, UpdateHook::HorizontalShift),
    AnimationProgram::sequence("pulse", &PULSE, 20),
    AnimationProgram::generated("starfield", 20, UpdateHook::Starfield),
];

/// The built-in library, in button order.
pub static PROGRAMS: ProgramTable = ProgramTable::new(&BUILT_IN);
