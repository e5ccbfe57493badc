//! Telemetry sink trait

/// Destination for telemetry lines
///
/// Implementations must never block. When there is no room, the tail of
/// the line is dropped.
pub trait TelemetrySink {
    /// Queue a line for transmission
    ///
    /// Returns the number of bytes accepted.
    fn send(&mut self, line: &str) -> usize;
}
