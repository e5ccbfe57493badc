//! Main controller task
//!
//! Runs the parking controller whenever an echo reading arrives or one of
//! its deadlines passes, and hands queued telemetry to the UART task.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_stm32::gpio::Output;
use embassy_stm32::peripherals::{TIM1, TIM2};
use embassy_stm32::timer::simple_pwm::SimplePwmChannel;
use embassy_time::Timer;

use parkgate_core::controller::ParkingController;
use parkgate_core::telemetry::TelemetryWriter;
use parkgate_drivers::{SegmentPort, ServoGate};

use crate::channels::{DISTANCES, ECHO_UPDATED, TELEMETRY_PENDING};
use crate::clock;

/// Controller as wired on the board
pub type Controller = ParkingController<
    ServoGate<SimplePwmChannel<'static, TIM1>>,
    ServoGate<SimplePwmChannel<'static, TIM2>>,
    SegmentPort<Output<'static>>,
    TelemetryWriter<'static>,
>;

/// Controller task - main coordination loop
#[embassy_executor::task]
pub async fn controller_task(mut controller: Controller) {
    info!("Controller task started");

    loop {
        let now_us = clock::now_us();

        if let Some(transition) = controller.step(now_us, &DISTANCES) {
            info!(
                "{:?} -> {:?} ({:?}), {} spaces left",
                transition.from,
                transition.to,
                transition.event,
                controller.lot().remaining()
            );
            report_gate_faults(&controller);
        }

        // Status lines go out on most wake-ups; let the UART task sort it out
        TELEMETRY_PENDING.signal(());

        match controller.next_wake_us() {
            Some(at_us) => {
                let wait_us = at_us.saturating_sub(clock::now_us());
                match select(ECHO_UPDATED.wait(), Timer::after_micros(wait_us)).await {
                    Either::First(lane) => trace!("Echo update from {:?} lane", lane),
                    Either::Second(()) => {}
                }
            }
            None => {
                ECHO_UPDATED.wait().await;
            }
        }
    }
}

/// Log gates whose last command did not reach the servo
fn report_gate_faults(controller: &Controller) {
    if let Some(fault) = controller.entry_gate().fault() {
        warn!("Entry gate PWM write failed: {:?}", fault);
    }
    if let Some(fault) = controller.exit_gate().fault() {
        warn!("Exit gate PWM write failed: {:?}", fault);
    }
}
