//! Sensor trigger task
//!
//! Fires the two HC-SR04 sensors in turn so one burst never overlaps the
//! other sensor's listening window.

use defmt::*;
use embassy_stm32::gpio::Output;
use embassy_time::{Delay, Timer};

use parkgate_core::schedule::TriggerSchedule;
use parkgate_core::Lane;
use parkgate_drivers::Hcsr04Trigger;

use crate::clock;

/// Trigger output as wired on the board
pub type Trigger = Hcsr04Trigger<Output<'static>, Delay>;

/// Trigger task - alternates trigger pulses between the lanes
#[embassy_executor::task]
pub async fn trigger_task(mut entry: Trigger, mut exit: Trigger, interval_us: u64) {
    info!("Trigger task started");

    let mut schedule = TriggerSchedule::new(interval_us);

    loop {
        let now_us = clock::now_us();

        if let Some(lane) = schedule.poll(now_us) {
            trace!("Triggering {:?} sensor", lane);
            // GPIO writes on this chip cannot fail
            let _ = match lane {
                Lane::Entry => entry.fire().await,
                Lane::Exit => exit.fire().await,
            };
        }

        let wait_us = schedule.next_due_us().saturating_sub(clock::now_us());
        Timer::after_micros(wait_us).await;
    }
}
