//! Echo edge task
//!
//! One instance per lane. Timestamps every edge of the echo line and
//! publishes each completed measurement to the lane's distance cell.
//!
//! # Timing error
//!
//! The timestamp and line level are taken when the task runs, not in the
//! EXTI handler. Each edge is late by however long the executor was busy
//! when it fired (at most one uninterrupted stretch of another task, such
//! as the controller formatting a status line). Only the difference between
//! the two delays reaches the pulse width, and each microsecond of it is
//! 0.17 mm of distance.
//!
//! If the echo pulse is shorter than the wake-up delay, the line is already
//! low when the rising edge is handled. The channel then sees a falling
//! edge while idle and ignores it, so that reading is lost rather than
//! wrong. HC-SR04 pulses are at least ~120 µs (2 cm), far longer than an
//! executor pass here.

use defmt::*;
use embassy_stm32::exti::ExtiInput;

use parkgate_core::echo::EchoChannel;
use parkgate_core::Lane;

use crate::channels::{DISTANCES, ECHO_UPDATED};
use crate::clock::{self, CLOCK};

/// Echo task - times one sensor's echo pulses
#[embassy_executor::task(pool_size = 2)]
pub async fn echo_task(mut echo: ExtiInput<'static>, lane: Lane, speed_of_sound_m_s: f32) {
    info!("Echo task started for {:?} lane", lane);

    let mut channel = EchoChannel::new(lane, speed_of_sound_m_s);

    loop {
        echo.wait_for_any_edge().await;

        // Both edges are stamped after the same wake-up path
        let now = clock::now();
        let level_high = echo.is_high();

        if let Some(distance_m) = channel.on_edge(level_high, now, &CLOCK) {
            DISTANCES[lane.index()].publish(distance_m);
            ECHO_UPDATED.signal(lane);
            debug!("{:?} distance: {} m", lane, distance_m);
        }
    }
}
