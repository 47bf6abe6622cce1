#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::convert::Infallible;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config, Pwm};
use lamp_matrix::{
    Result,
    brightness::Dimmer,
    button::InputDebouncer,
    matrix::LampMatrix,
    program::PROGRAMS,
    scanner::ShiftRegister595,
};
use {defmt::info, defmt_rtt as _, panic_probe as _};

static DEBOUNCER: InputDebouncer = InputDebouncer::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());
    info!("lamp matrix booting");

    // Dimming on GPIO 0 (PWM slice 0, channel A)
    let _dimmer = Dimmer::new_output_a(Pwm::new_output_a(
        p.PWM_SLICE0,
        p.PIN_0,
        Config::default(),
    ));

    // 74HC595: data GPIO 4, clock GPIO 2, latch GPIO 1
    let shift_register = ShiftRegister595::new(
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_1, Level::Low),
    );

    // Button on GPIO 3, wired to ground
    DEBOUNCER.spawn_watch(Input::new(p.PIN_3, Pull::Up), spawner)?;

    LampMatrix::new(PROGRAMS, &DEBOUNCER)
        .run(shift_register)
        .await
}
