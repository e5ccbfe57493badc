//! Segment display output trait

/// Raw output for a two-digit seven-segment display
///
/// `bits` carries the units digit segments `a..g` in bits 0-6 and the
/// tens digit segments in bits 8-14. Bit 7 and bit 15 are unused.
pub trait SegmentOutput {
    /// Drive all segments at once
    fn write(&mut self, bits: u16);
}
