//! Telemetry ring buffer
//!
//! The controller is the only producer and the UART drain task the only
//! consumer, so the ring is a lock-free [`heapless::spsc::Queue`]. When the
//! ring is full the rest of a line is dropped; the producer never waits.

use heapless::spsc::{Consumer, Producer, Queue};

use crate::traits::TelemetrySink;

/// Ring size in bytes (one slot stays free to tell full from empty)
pub const TX_BUFFER_SIZE: usize = 128;

/// Ring shared between the controller and the drain task
pub type TxQueue = Queue<u8, TX_BUFFER_SIZE>;

/// Producer half of the ring
pub struct TelemetryWriter<'a, const N: usize = TX_BUFFER_SIZE> {
    producer: Producer<'a, u8, N>,
    dropped: u32,
}

impl<'a, const N: usize> TelemetryWriter<'a, N> {
    pub fn new(producer: Producer<'a, u8, N>) -> Self {
        Self { producer, dropped: 0 }
    }

    /// Bytes dropped on overflow since boot (wraps)
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> TelemetrySink for TelemetryWriter<'_, N> {
    fn send(&mut self, line: &str) -> usize {
        let mut accepted = 0;
        for &byte in line.as_bytes() {
            if self.producer.enqueue(byte).is_err() {
                break;
            }
            accepted += 1;
        }
        let lost = line.len() - accepted;
        self.dropped = self.dropped.wrapping_add(lost as u32);
        accepted
    }
}

/// Consumer half of the ring
pub struct TelemetryDrain<'a, const N: usize = TX_BUFFER_SIZE> {
    consumer: Consumer<'a, u8, N>,
}

impl<'a, const N: usize> TelemetryDrain<'a, N> {
    pub fn new(consumer: Consumer<'a, u8, N>) -> Self {
        Self { consumer }
    }

    /// Check if bytes are waiting
    pub fn has_pending(&self) -> bool {
        self.consumer.ready()
    }

    /// Move pending bytes into `buf`, returning how many were copied
    pub fn drain_into(&mut self, buf: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in buf.iter_mut() {
            match self.consumer.dequeue() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_then_drain() {
        let mut queue: TxQueue = Queue::new();
        let (producer, consumer) = queue.split();
        let mut writer = TelemetryWriter::new(producer);
        let mut drain = TelemetryDrain::new(consumer);

        assert!(!drain.has_pending());
        assert_eq!(writer.send("01\r\n"), 4);
        assert!(drain.has_pending());

        let mut buf = [0u8; 16];
        let n = drain.drain_into(&mut buf);
        assert_eq!(&buf[..n], b"01\r\n");
        assert!(!drain.has_pending());
    }

    #[test]
    fn test_overflow_drops_tail() {
        let mut queue: Queue<u8, 8> = Queue::new();
        let (producer, consumer) = queue.split();
        let mut writer = TelemetryWriter::new(producer);
        let mut drain = TelemetryDrain::new(consumer);

        // Seven usable slots
        assert_eq!(writer.send("0123456789"), 7);
        assert_eq!(writer.dropped(), 3);
        assert_eq!(writer.send("x"), 0);
        assert_eq!(writer.dropped(), 4);

        let mut buf = [0u8; 16];
        let n = drain.drain_into(&mut buf);
        assert_eq!(&buf[..n], b"0123456");

        // Space is back once drained
        assert_eq!(writer.send("ab"), 2);
    }

    #[test]
    fn test_drain_respects_buffer_size() {
        let mut queue: TxQueue = Queue::new();
        let (producer, consumer) = queue.split();
        let mut writer = TelemetryWriter::new(producer);
        let mut drain = TelemetryDrain::new(consumer);

        writer.send("hello");
        let mut buf = [0u8; 2];
        assert_eq!(drain.drain_into(&mut buf), 2);
        assert_eq!(&buf, b"he");
        assert_eq!(drain.drain_into(&mut buf), 2);
        assert_eq!(drain.drain_into(&mut buf), 1);
        assert_eq!(drain.drain_into(&mut buf), 0);
    }
}
