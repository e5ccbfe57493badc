//! Byte-at-a-time line assembly for the receiving end of the telemetry link.
//!
//! The link has no framing beyond CRLF, so a receiver that starts listening
//! mid-line sees a partial first line. The assembler hands that fragment
//! back like any other line; [`TelemetryLine::parse`] rejects it.

use crate::line::{Line, LineError, TelemetryLine, MAX_LINE_LEN};

/// Assembly state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Collecting bytes of the current line
    Collecting,
    /// Line overflowed, dropping bytes until the next newline
    Discarding,
}

/// Collects received bytes into CRLF-terminated lines
#[derive(Debug, Clone)]
pub struct LineAssembler {
    state: AssembleState,
    buffer: Line,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create a new assembler
    pub const fn new() -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Line::new(),
        }
    }

    /// Reset the assembler, dropping any partial line
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` with the terminator stripped when a newline
    /// completes a line, `Ok(None)` when more bytes are needed, and
    /// `Err(LineError::TooLong)` once for each line that overflowed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match self.state {
            AssembleState::Collecting => match byte {
                b'\n' => {
                    let mut line = core::mem::take(&mut self.buffer);
                    if line.ends_with('\r') {
                        line.pop();
                    }
                    Ok(Some(line))
                }
                _ if !byte.is_ascii() => {
                    // Line noise, resync on the next newline
                    self.buffer.clear();
                    self.state = AssembleState::Discarding;
                    Err(LineError::UnknownFormat)
                }
                _ => {
                    // Leave room for the terminator the sender counted
                    if self.buffer.len() + 2 >= MAX_LINE_LEN || self.buffer.push(byte as char).is_err() {
                        self.buffer.clear();
                        self.state = AssembleState::Discarding;
                        return Err(LineError::TooLong);
                    }
                    Ok(None)
                }
            },
            AssembleState::Discarding => {
                if byte == b'\n' {
                    self.state = AssembleState::Collecting;
                }
                Ok(None)
            }
        }
    }

    /// Feed bytes until a line parses or the input runs out
    ///
    /// Lines that fail to parse are skipped. Remaining bytes after a
    /// parsed line are not consumed; the count of consumed bytes is
    /// returned alongside the line.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Option<TelemetryLine>) {
        for (index, &byte) in bytes.iter().enumerate() {
            if let Ok(Some(line)) = self.feed(byte) {
                if let Ok(parsed) = TelemetryLine::parse(&line) {
                    return (index + 1, Some(parsed));
                }
            }
        }
        (bytes.len(), None)
    }
}
