//! Debounced program-select button.
//!
//! See [`InputDebouncer`] for the lockout rules and a usage example.

use core::sync::atomic::Ordering;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicBool, AtomicU8};

#[cfg(not(feature = "host"))]
use defmt::info;
#[cfg(not(feature = "host"))]
use embassy_executor::Spawner;
#[cfg(not(feature = "host"))]
use embassy_rp::gpio::Input;

#[cfg(not(feature = "host"))]
use crate::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Scan cycles during which further edges are ignored after a press (about 60 ms).
pub const DEBOUNCE_CYCLES: u8 = 30;

/// Level of the pulled-up button line while released.
pub const RELEASED_LEVEL: bool = true;

// ============================================================================
// InputDebouncer
// ============================================================================

/// Turns raw, bouncy edges on an active-low button line into single "advance program"
/// events.
///
/// The edge side calls [`on_edge`](Self::on_edge) with the level after every transition.
/// A falling edge (released to pressed) outside the lockout window queues one advance
/// and starts a [`DEBOUNCE_CYCLES`] lockout; edges inside the window are dropped without
/// touching any state. The main loop calls [`tick`](Self::tick) once per scan cycle to
/// run the lockout down and [`take_advance`](Self::take_advance) to collect the event.
///
/// Every field is an atomic or a single-slot [`Signal`], so one `static` instance can be
/// shared between the edge task and the main loop.
///
/// # Example
///
/// ```rust,no_run
/// use lamp_matrix::button::{DEBOUNCE_CYCLES, InputDebouncer};
///
/// static DEBOUNCER: InputDebouncer = InputDebouncer::new();
///
/// assert!(DEBOUNCER.on_edge(false)); // pressed
/// assert!(!DEBOUNCER.on_edge(true)); // bounce, ignored during lockout
/// assert!(DEBOUNCER.take_advance());
/// assert!(!DEBOUNCER.take_advance()); // drained
///
/// for _ in 0..DEBOUNCE_CYCLES {
///     DEBOUNCER.tick();
/// }
/// assert_eq!(DEBOUNCER.countdown(), 0);
/// ```
pub struct InputDebouncer {
    raw_level: AtomicBool,
    countdown: AtomicU8,
    advance: Signal<CriticalSectionRawMutex, ()>,
}

impl InputDebouncer {
    /// A debouncer that assumes the button starts released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw_level: AtomicBool::new(RELEASED_LEVEL),
            countdown: AtomicU8::new(0),
            advance: Signal::new(),
        }
    }

    /// Record the pin level read at boot, before edges are watched.
    pub fn seed_level(&self, level: bool) {
        self.raw_level.store(level, Ordering::Release);
    }

    /// Handle one pin transition; `level` is the pin level after it.
    ///
    /// Returns `true` when the edge was recognized as a press and an advance was queued.
    pub fn on_edge(&self, level: bool) -> bool {
        if self.countdown.load(Ordering::Acquire) > 0 {
            return false;
        }
        let previous = self.raw_level.swap(level, Ordering::AcqRel);
        let pressed = previous && !level;
        if pressed {
            self.countdown.store(DEBOUNCE_CYCLES, Ordering::Release);
            self.advance.signal(());
        }
        pressed
    }

    /// Run the lockout down by one scan cycle and return what is left.
    pub fn tick(&self) -> u8 {
        match self
            .countdown
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_sub(1)
            }) {
            Ok(previous) => previous.saturating_sub(1),
            Err(_) => 0,
        }
    }

    /// Collect a pending advance, if any. Several presses before a drain count as one.
    pub fn take_advance(&self) -> bool {
        self.advance.try_take().is_some()
    }

    /// Scan cycles left in the lockout; 0 means ready.
    #[must_use]
    pub fn countdown(&self) -> u8 {
        self.countdown.load(Ordering::Acquire)
    }

    /// The last accepted pin level.
    #[must_use]
    pub fn raw_level(&self) -> bool {
        self.raw_level.load(Ordering::Acquire)
    }
}

impl Default for InputDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(feature = "host"))]
impl InputDebouncer {
    /// Seed the level from `input` and spawn a task that feeds its edges to
    /// [`on_edge`](Self::on_edge).
    ///
    /// `input` should be configured with a pull-up and wired to ground through the
    /// button.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskSpawn`] if the edge task is already running.
    pub fn spawn_watch(&'static self, input: Input<'static>, spawner: Spawner) -> Result<()> {
        self.seed_level(input.is_high());
        let token = button_edge_loop(self, input).map_err(Error::TaskSpawn)?;
        spawner.spawn(token);
        Ok(())
    }
}

#[cfg(not(feature = "host"))]
#[embassy_executor::task]
async fn button_edge_loop(debouncer: &'static InputDebouncer, mut input: Input<'static>) -> ! {
    loop {
        input.wait_for_any_edge().await;
        if debouncer.on_edge(input.is_high()) {
            info!("button press");
        }
    }
}
