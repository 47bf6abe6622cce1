//! Per-scan-cycle timing, frame advancement, and program switching.
//!
//! See [`AnimationScheduler`] for the state machine and [`UpdateHook`] for the
//! per-frame effects.

use crate::frame4x4::{Frame4x4, NIBBLE_MASK, SIZE};
use crate::lfsr::Lfsr;
use crate::program::{AnimationProgram, ProgramTable, STILL_FRAME_DELAY};

const SHIFT_MODULUS: u8 = SIZE as u8;

/// Number of phases in the starfield sparkle: one flash, one clear, three dark.
pub const STARFIELD_PHASES: u8 = 5;

/// LFSR steps taken before each new star.
const STARFIELD_LFSR_STEPS: u8 = 4;

// ============================================================================
// ScheduleState
// ============================================================================

/// Mutable animation state, owned by the main loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleState {
    /// Selected program, always less than the table length.
    pub program_index: u8,
    /// Current logical frame, less than the program's frame count when it has frames.
    pub frame_index: u8,
    /// Scan cycles left before the next frame; [`STILL_FRAME_DELAY`] never counts down.
    pub wait_remaining: u8,
    /// Horizontal rotation, `0..4`.
    pub x_shift: u8,
    /// Vertical rotation, `0..4`.
    pub y_shift: u8,
}

// ============================================================================
// StarfieldPhase
// ============================================================================

/// Position in the starfield's five-phase sparkle cycle.
///
/// Owned by the scheduler and left untouched while other programs run, so the
/// sparkle resumes where it stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StarfieldPhase(u8);

impl StarfieldPhase {
    /// Phase 0, the next call lights a star.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// The current phase, `0..STARFIELD_PHASES`.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    fn advance(&mut self) {
        let next = self.0.wrapping_add(1);
        self.0 = if next >= STARFIELD_PHASES { 0 } else { next };
    }
}

// ============================================================================
// UpdateHook
// ============================================================================

/// Per-frame effect run after a program advances its frame index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateHook {
    /// No effect.
    #[default]
    None,
    /// Set `x_shift` to the new frame index, scrolling the stored frame sideways.
    HorizontalShift,
    /// Set `y_shift` to the new frame index, scrolling the stored frame vertically.
    VerticalShift,
    /// Flash a random lamp, clear it, then stay dark for three frames.
    Starfield,
}

impl UpdateHook {
    /// Run the hook for the frame index just advanced to.
    ///
    /// `Starfield` writes `framebuffer` directly and owns `lfsr` and
    /// `starfield_phase`; the shift hooks only touch `state`.
    pub fn apply(
        self,
        frame_index: u8,
        state: &mut ScheduleState,
        framebuffer: &mut Frame4x4,
        lfsr: &mut Lfsr,
        starfield_phase: &mut StarfieldPhase,
    ) {
        match self {
            Self::None => {}
            Self::HorizontalShift => state.x_shift = frame_index % SHIFT_MODULUS,
            Self::VerticalShift => state.y_shift = frame_index % SHIFT_MODULUS,
            Self::Starfield => {
                match starfield_phase.get() {
                    0 => {
                        let value = lfsr.steps(STARFIELD_LFSR_STEPS);
                        #[expect(
                            clippy::cast_possible_truncation,
                            reason = "masked to the low nibble"
                        )]
                        let bit_index = (value & u16::from(NIBBLE_MASK)) as u8;
                        *framebuffer = Frame4x4::single(bit_index);
                    }
                    1 => *framebuffer = Frame4x4::EMPTY,
                    _ => {}
                }
                starfield_phase.advance();
            }
        }
    }
}

// ============================================================================
// AnimationScheduler
// ============================================================================

/// Outcome of one [`AnimationScheduler::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// Still counting down the frame delay.
    Waiting,
    /// Rendered, advanced the frame index, and ran the hook.
    Advanced,
}

/// Advances the selected program once per scan cycle and owns the framebuffer.
///
/// Each [`tick`](Self::tick) either counts down the frame delay or renders the
/// current frame, moves to the next frame, runs the program's [`UpdateHook`], and
/// reloads the delay. [`switch_program`](Self::switch_program) selects the next
/// program and resets timing and scroll so the new program starts on the next tick.
///
/// # Example
///
/// ```rust,no_run
/// use lamp_matrix::{program::PROGRAMS, scheduler::{AnimationScheduler, Tick}};
///
/// let mut scheduler = AnimationScheduler::new(PROGRAMS);
/// assert_eq!(scheduler.tick(), Tick::Advanced); // the circle appears at once
/// assert_eq!(scheduler.tick(), Tick::Waiting); // and stays
///
/// scheduler.switch_program();
/// assert_eq!(scheduler.state().program_index, 1);
/// ```
#[derive(Clone, Debug)]
pub struct AnimationScheduler {
    programs: ProgramTable,
    state: ScheduleState,
    framebuffer: Frame4x4,
    lfsr: Lfsr,
    starfield_phase: StarfieldPhase,
}

impl AnimationScheduler {
    /// Start at program 0 with an empty framebuffer and the boot LFSR seed.
    #[must_use]
    pub const fn new(programs: ProgramTable) -> Self {
        Self {
            programs,
            state: ScheduleState {
                program_index: 0,
                frame_index: 0,
                wait_remaining: 0,
                x_shift: 0,
                y_shift: 0,
            },
            framebuffer: Frame4x4::EMPTY,
            lfsr: Lfsr::new(),
            starfield_phase: StarfieldPhase::new(),
        }
    }

    /// Run one scan cycle of animation logic.
    pub fn tick(&mut self) -> Tick {
        let state = &mut self.state;
        if state.wait_remaining > 0 {
            if state.wait_remaining != STILL_FRAME_DELAY {
                state.wait_remaining = state.wait_remaining.saturating_sub(1);
            }
            return Tick::Waiting;
        }

        let program = self.programs.get(state.program_index);
        // Rendered into a local first so the framebuffer is replaced in one store.
        if let Some(frame) = program.render(state.frame_index, state.x_shift, state.y_shift) {
            self.framebuffer = frame;
        }

        state.frame_index = program.next_frame_index(state.frame_index);
        program.update_hook().apply(
            state.frame_index,
            state,
            &mut self.framebuffer,
            &mut self.lfsr,
            &mut self.starfield_phase,
        );
        state.wait_remaining = program.frame_delay();
        Tick::Advanced
    }

    /// Select the next program (wrapping) and restart it from its first frame.
    ///
    /// The framebuffer, LFSR, and starfield phase are left as they are.
    pub fn switch_program(&mut self) -> &'static AnimationProgram {
        let program_index = self.programs.next_index(self.state.program_index);
        self.state = ScheduleState {
            program_index,
            ..ScheduleState::default()
        };
        self.programs.get(program_index)
    }

    /// The bitmap the display should show.
    #[must_use]
    pub const fn framebuffer(&self) -> Frame4x4 {
        self.framebuffer
    }

    /// A snapshot of the timing and scroll state.
    #[must_use]
    pub const fn state(&self) -> ScheduleState {
        self.state
    }

    /// The selected program.
    #[must_use]
    pub const fn program(&self) -> &'static AnimationProgram {
        self.programs.get(self.state.program_index)
    }

    /// The program table being cycled.
    #[must_use]
    pub const fn programs(&self) -> ProgramTable {
        self.programs
    }

    /// The starfield's random source.
    #[must_use]
    pub const fn lfsr(&self) -> Lfsr {
        self.lfsr
    }

    /// The starfield's sparkle phase.
    #[must_use]
    pub const fn starfield_phase(&self) -> StarfieldPhase {
        self.starfield_phase
    }
}
