//! Fixed hardware dimming for the lamp matrix.
//!
//! The PWM slice is configured once at boot and then left alone. See [`Dimmer`].

#[cfg(not(feature = "host"))]
use defmt::info;
#[cfg(not(feature = "host"))]
use embassy_rp::clocks::clk_sys_freq;
#[cfg(not(feature = "host"))]
use embassy_rp::pwm::{Config, Pwm};

/// Share of each PWM period, in percent, during which the lamps are enabled.
///
/// The output drives the drivers' active-low output enable, so this is the low phase of
/// the pin. See [`DIM_ACTIVE_LOW`].
pub const DIM_DUTY_PERCENT: u8 = 20;

/// The dimming pin enables the lamps while low, so the PWM output is inverted: the pin
/// sits low for the first `compare` ticks of each period and high for the rest.
pub const DIM_ACTIVE_LOW: bool = true;

/// PWM counter wrap value; one period is `DIM_TOP + 1` ticks.
pub const DIM_TOP: u16 = 255;

/// Target PWM counter rate.
pub const DIM_TICK_HZ: u32 = 1_000_000;

/// Compare value giving `percent` duty for a counter that wraps at `top`.
///
/// `percent` above 100 is treated as 100.
///
/// ```rust,no_run
/// use lamp_matrix::brightness::dim_compare;
///
/// assert_eq!(dim_compare(255, 20), 51);
/// assert_eq!(dim_compare(255, 100), 255);
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::integer_division_remainder_used,
    reason = "the quotient never exceeds top"
)]
pub const fn dim_compare(top: u16, percent: u8) -> u16 {
    let percent = if percent > 100 { 100 } else { percent };
    (top as u32 * percent as u32 / 100) as u16
}

/// A PWM output that enables the lamps for [`DIM_DUTY_PERCENT`] of each period.
///
/// # Example
///
/// ```rust,ignore
/// use embassy_rp::pwm::{Config, Pwm};
/// use lamp_matrix::brightness::Dimmer;
///
/// fn example(p: embassy_rp::Peripherals) {
///     let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_0, Config::default());
///     let dimmer = Dimmer::new_output_a(pwm);
///     assert_eq!(dimmer.compare(), 51);
/// }
/// ```
#[cfg(not(feature = "host"))]
pub struct Dimmer<'d> {
    _pwm: Pwm<'d>,
    cfg: Config,
}

#[cfg(not(feature = "host"))]
impl<'d> Dimmer<'d> {
    /// Start dimming on the slice's A channel.
    #[must_use]
    pub fn new_output_a(mut pwm: Pwm<'d>) -> Self {
        let clk = clk_sys_freq(); // Hz
        // Aim for tick ≈ 1 µs so the period is about 256 µs.
        let div_int = (clk / DIM_TICK_HZ).clamp(1, 255) as u8;
        let compare = dim_compare(DIM_TOP, DIM_DUTY_PERCENT);

        let mut cfg = Config::default();
        cfg.top = DIM_TOP;
        cfg.phase_correct = false;
        cfg.divider = div_int.into();
        cfg.compare_a = compare;
        cfg.invert_a = DIM_ACTIVE_LOW;
        cfg.enable = true;
        pwm.set_config(&cfg);

        info!(
            "dimmer clk={}Hz div={} top={} compare={} active_low={}",
            clk, div_int, DIM_TOP, compare, DIM_ACTIVE_LOW
        );

        Self { _pwm: pwm, cfg }
    }

    /// The compare value in use.
    #[must_use]
    pub const fn compare(&self) -> u16 {
        self.cfg.compare_a
    }
}
