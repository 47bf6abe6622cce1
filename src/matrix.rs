//! The main loop: scan, debounce, switch, animate.
//!
//! See [`LampMatrix`].

use embedded_hal_async::delay::DelayNs;

use crate::Result;
use crate::button::InputDebouncer;
use crate::frame4x4::Frame4x4;
use crate::program::{AnimationProgram, ProgramTable};
use crate::scanner::{ShiftOut, scan};
use crate::scheduler::{AnimationScheduler, ScheduleState, Tick};

#[cfg(not(feature = "host"))]
use core::convert::Infallible;

#[cfg(not(feature = "host"))]
use defmt::info;
#[cfg(not(feature = "host"))]
use embassy_time::Delay;

/// What happened during one [`LampMatrix::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    /// A button press was applied before the scheduler ran.
    pub switched: bool,
    /// The scheduler's result.
    pub tick: Tick,
}

/// The lamp-matrix firmware loop, minus the hardware.
///
/// Every iteration runs, in order: one display scan, one debounce tick, a pending
/// program switch if the button was pressed, and one scheduler tick. Program switches
/// therefore never land in the middle of a render.
///
/// [`step`](Self::step) is the part of an iteration after the scan. [`cycle`](Self::cycle)
/// is a whole iteration, and [`run`](Self::run) repeats it forever on the board.
///
/// # Example
///
/// ```rust,no_run
/// use lamp_matrix::{button::InputDebouncer, matrix::LampMatrix, program::PROGRAMS};
///
/// static DEBOUNCER: InputDebouncer = InputDebouncer::new();
///
/// let mut matrix = LampMatrix::new(PROGRAMS, &DEBOUNCER);
/// matrix.step();
/// assert_eq!(matrix.program().name(), "circle");
///
/// DEBOUNCER.on_edge(false); // press
/// assert!(matrix.step().switched);
/// assert_eq!(matrix.program().name(), "x");
/// ```
pub struct LampMatrix<'a> {
    scheduler: AnimationScheduler,
    debouncer: &'a InputDebouncer,
}

impl<'a> LampMatrix<'a> {
    /// Start at the first program of `programs`, switching on presses seen by `debouncer`.
    #[must_use]
    pub const fn new(programs: ProgramTable, debouncer: &'a InputDebouncer) -> Self {
        Self {
            scheduler: AnimationScheduler::new(programs),
            debouncer,
        }
    }

    /// One iteration without the display scan.
    pub fn step(&mut self) -> Step {
        self.debouncer.tick();
        let switched = self.debouncer.take_advance();
        if switched {
            self.scheduler.switch_program();
        }
        Step {
            switched,
            tick: self.scheduler.tick(),
        }
    }

    /// One full iteration: scan the current framebuffer, then [`step`](Self::step).
    ///
    /// # Errors
    ///
    /// Returns any error from `shift_out`. The step is skipped when the scan fails.
    pub async fn cycle<S, D>(&mut self, shift_out: &mut S, delay: &mut D) -> Result<Step>
    where
        S: ShiftOut,
        D: DelayNs,
    {
        scan(shift_out, delay, self.framebuffer()).await?;
        Ok(self.step())
    }

    /// The bitmap being displayed.
    #[must_use]
    pub const fn framebuffer(&self) -> Frame4x4 {
        self.scheduler.framebuffer()
    }

    /// Timing and scroll state.
    #[must_use]
    pub const fn state(&self) -> ScheduleState {
        self.scheduler.state()
    }

    /// The selected program.
    #[must_use]
    pub const fn program(&self) -> &'static AnimationProgram {
        self.scheduler.program()
    }

    /// The scheduler behind the loop.
    #[must_use]
    pub const fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }
}

#[cfg(not(feature = "host"))]
impl LampMatrix<'_> {
    /// Drive the display forever.
    ///
    /// # Errors
    ///
    /// Returns the first error from `shift_out`.
    pub async fn run<S: ShiftOut>(mut self, mut shift_out: S) -> Result<Infallible> {
        info!(
            "lamp matrix: {} programs, starting with {}",
            self.scheduler.programs().len(),
            self.program().name()
        );
        let mut delay = Delay;
        loop {
            let step = self.cycle(&mut shift_out, &mut delay).await?;
            if step.switched {
                let state = self.state();
                info!(
                    "program {} ({})",
                    state.program_index,
                    self.program().name()
                );
            }
            #[cfg(feature = "display-trace")]
            if step.tick == Tick::Advanced {
                defmt::debug!(
                    "frame {} -> {:04x}",
                    self.state().frame_index,
                    self.framebuffer().bits()
                );
            }
        }
    }
}
