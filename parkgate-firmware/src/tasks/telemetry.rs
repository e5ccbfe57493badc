//! Telemetry UART transmit task
//!
//! Drains the telemetry ring into USART1. The controller never waits on
//! the UART; if this task falls behind, the ring fills and new bytes are
//! dropped at the producer.

use defmt::*;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::UartTx;

use parkgate_core::telemetry::TelemetryDrain;

use crate::channels::TELEMETRY_PENDING;

/// Bytes handed to the UART per write
const CHUNK_SIZE: usize = 32;

/// Telemetry TX task - sends queued lines
#[embassy_executor::task]
pub async fn telemetry_tx_task(mut tx: UartTx<'static, Async>, mut drain: TelemetryDrain<'static>) {
    info!("Telemetry TX task started");

    let mut buf = [0u8; CHUNK_SIZE];

    loop {
        TELEMETRY_PENDING.wait().await;

        while drain.has_pending() {
            let len = drain.drain_into(&mut buf);
            if let Err(e) = tx.write(&buf[..len]).await {
                warn!("Failed to send telemetry: {:?}", e);
            }
        }
    }
}
