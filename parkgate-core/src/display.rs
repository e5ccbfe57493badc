//! Two-digit seven-segment encoding
//!
//! Segment bits follow the usual `a..g` order in bits 0-6. The tens digit
//! goes in the high byte and the units digit in the low byte of the packed
//! output word.

use crate::traits::SegmentOutput;

/// Segment patterns for digits 0-9
pub const DIGIT_SEGMENTS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x27, 0x7F, 0x6F];

/// Largest value two digits can show
pub const MAX_DISPLAY_VALUE: i32 = 99;

/// Display errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Value outside `0..=99`
    OutOfRange,
}

/// Segment patterns for both digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentPair {
    pub tens: u8,
    pub units: u8,
}

impl SegmentPair {
    /// All segments off
    pub const BLANK: SegmentPair = SegmentPair { tens: 0, units: 0 };

    /// Pack as `tens << 8 | units`
    pub const fn to_bits(self) -> u16 {
        (self.tens as u16) << 8 | self.units as u16
    }

    /// Unpack a word produced by [`SegmentPair::to_bits`]
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            tens: (bits >> 8) as u8 & 0x7F,
            units: bits as u8 & 0x7F,
        }
    }
}

/// Encode a value as two digit patterns
pub fn encode(value: i32) -> Result<SegmentPair, DisplayError> {
    if !(0..=MAX_DISPLAY_VALUE).contains(&value) {
        return Err(DisplayError::OutOfRange);
    }
    let value = value as usize;
    Ok(SegmentPair {
        tens: DIGIT_SEGMENTS[value / 10],
        units: DIGIT_SEGMENTS[value % 10],
    })
}

/// Value shown by a pair of patterns, if both are digits
pub fn decode(pair: SegmentPair) -> Option<u8> {
    let digit = |pattern| DIGIT_SEGMENTS.iter().position(|&p| p == pattern);
    let tens = digit(pair.tens)?;
    let units = digit(pair.units)?;
    Some((tens * 10 + units) as u8)
}

/// A segment output plus the last word written to it
#[derive(Debug)]
pub struct SegmentDisplay<O: SegmentOutput> {
    output: O,
    last_bits: u16,
}

impl<O: SegmentOutput> SegmentDisplay<O> {
    /// Wrap an output and blank it
    pub fn new(mut output: O) -> Self {
        output.write(SegmentPair::BLANK.to_bits());
        Self {
            output,
            last_bits: SegmentPair::BLANK.to_bits(),
        }
    }

    /// Show a value
    ///
    /// Out-of-range values are rejected and the output keeps its previous
    /// contents.
    pub fn show(&mut self, value: i32) -> Result<(), DisplayError> {
        let pair = encode(value)?;
        self.write(pair.to_bits());
        Ok(())
    }

    /// Turn every segment off
    pub fn blank(&mut self) {
        self.write(SegmentPair::BLANK.to_bits());
    }

    /// Last word written
    pub fn last_bits(&self) -> u16 {
        self.last_bits
    }

    /// Underlying output
    pub fn output(&self) -> &O {
        &self.output
    }

    fn write(&mut self, bits: u16) {
        self.output.write(bits);
        self.last_bits = bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Default)]
    struct RecordingOutput {
        writes: Vec<u16>,
    }

    impl SegmentOutput for RecordingOutput {
        fn write(&mut self, bits: u16) {
            self.writes.push(bits);
        }
    }

    #[test]
    fn test_encode_packs_tens_high() {
        assert_eq!(encode(19).unwrap().to_bits(), 0x066F);
        assert_eq!(encode(0).unwrap().to_bits(), 0x3F3F);
        assert_eq!(encode(7).unwrap(), SegmentPair { tens: 0x3F, units: 0x27 });
    }

    #[test]
    fn test_encode_rejects_out_of_range() {
        assert_eq!(encode(-1), Err(DisplayError::OutOfRange));
        assert_eq!(encode(100), Err(DisplayError::OutOfRange));
    }

    #[test]
    fn test_decode_rejects_non_digits() {
        assert_eq!(decode(SegmentPair::BLANK), None);
        assert_eq!(decode(SegmentPair { tens: 0x3F, units: 0x01 }), None);
    }

    #[test]
    fn test_out_of_range_leaves_output_unchanged() {
        let mut display = SegmentDisplay::new(RecordingOutput::default());
        display.show(42).unwrap();
        let before = display.last_bits();

        assert_eq!(display.show(150), Err(DisplayError::OutOfRange));
        assert_eq!(display.last_bits(), before);
        assert_eq!(display.output().writes, vec![0x0000, before]);
    }

    #[test]
    fn test_blank() {
        let mut display = SegmentDisplay::new(RecordingOutput::default());
        display.show(5).unwrap();
        display.blank();
        assert_eq!(display.last_bits(), 0);
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(value in 0i32..=99) {
            let pair = encode(value).unwrap();
            prop_assert_eq!(decode(pair), Some(value as u8));
            prop_assert_eq!(SegmentPair::from_bits(pair.to_bits()), pair);
            // Encoding is a pure function
            prop_assert_eq!(encode(value).unwrap(), pair);
        }
    }
}
