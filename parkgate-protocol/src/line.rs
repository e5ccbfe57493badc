//! Telemetry line encoding and parsing.
//!
//! Line formats:
//! - Status: `ms:<u32>, TrigDist:<f32, 2 decimals>, Spaces:<i32>, State:<i32>\r\n`
//! - Count: `<occupied, two digits zero padded>\r\n`

use core::fmt::Write;

use heapless::String;

/// Line terminator appended to every message
pub const LINE_TERMINATOR: &str = "\r\n";

/// Maximum encoded line length in bytes, terminator included
pub const MAX_LINE_LEN: usize = 64;

/// An encoded telemetry line
pub type Line = String<MAX_LINE_LEN>;

const STATUS_PREFIX: &str = "ms:";

/// Errors that can occur while encoding or parsing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Encoded line does not fit in [`MAX_LINE_LEN`]
    TooLong,
    /// Line does not match any known format
    UnknownFormat,
    /// A field is missing from a status line
    MissingField,
    /// A field value could not be parsed
    InvalidValue,
}

/// Periodic controller status
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusLine {
    /// Milliseconds since boot (wraps at `u32::MAX`)
    pub uptime_ms: u32,
    /// Distance in meters that triggered the current or last gate cycle
    pub trigger_distance_m: f32,
    /// Remaining free spaces
    pub remaining_spaces: i32,
    /// Gate state code (0 = idle, 1 = entry, 2 = exit)
    pub state: i32,
}

/// Occupied-space count, sent after every completed gate cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CountLine {
    /// Number of occupied spaces
    pub occupied: u8,
}

/// Any line the controller can emit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryLine {
    Status(StatusLine),
    Count(CountLine),
}

impl StatusLine {
    /// Encode as a CRLF-terminated line
    pub fn encode(&self) -> Result<Line, LineError> {
        let mut line = Line::new();
        write!(
            line,
            "ms:{}, TrigDist:{:.2}, Spaces:{}, State:{}{}",
            self.uptime_ms,
            self.trigger_distance_m,
            self.remaining_spaces,
            self.state,
            LINE_TERMINATOR
        )
        .map_err(|_| LineError::TooLong)?;
        Ok(line)
    }

    fn parse(body: &str) -> Result<Self, LineError> {
        let mut fields = body.split(", ");

        let uptime_ms = field(fields.next(), "ms:")?;
        let trigger_distance_m = field(fields.next(), "TrigDist:")?;
        let remaining_spaces = field(fields.next(), "Spaces:")?;
        let state = field(fields.next(), "State:")?;

        if fields.next().is_some() {
            return Err(LineError::UnknownFormat);
        }

        Ok(Self {
            uptime_ms,
            trigger_distance_m,
            remaining_spaces,
            state,
        })
    }
}

impl CountLine {
    /// Encode as a CRLF-terminated line
    pub fn encode(&self) -> Result<Line, LineError> {
        let mut line = Line::new();
        write!(line, "{:02}{}", self.occupied, LINE_TERMINATOR).map_err(|_| LineError::TooLong)?;
        Ok(line)
    }

    fn parse(body: &str) -> Result<Self, LineError> {
        let occupied = body.parse().map_err(|_| LineError::InvalidValue)?;
        Ok(Self { occupied })
    }
}

impl TelemetryLine {
    /// Encode as a CRLF-terminated line
    pub fn encode(&self) -> Result<Line, LineError> {
        match self {
            TelemetryLine::Status(status) => status.encode(),
            TelemetryLine::Count(count) => count.encode(),
        }
    }

    /// Parse a line, with or without its trailing CRLF
    pub fn parse(line: &str) -> Result<Self, LineError> {
        let body = line.strip_suffix(LINE_TERMINATOR).unwrap_or(line);

        if body.starts_with(STATUS_PREFIX) {
            StatusLine::parse(body).map(TelemetryLine::Status)
        } else if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
            CountLine::parse(body).map(TelemetryLine::Count)
        } else {
            Err(LineError::UnknownFormat)
        }
    }
}

impl From<StatusLine> for TelemetryLine {
    fn from(status: StatusLine) -> Self {
        TelemetryLine::Status(status)
    }
}

impl From<CountLine> for TelemetryLine {
    fn from(count: CountLine) -> Self {
        TelemetryLine::Count(count)
    }
}

/// Parse one `Label:value` field
fn field<T: core::str::FromStr>(raw: Option<&str>, label: &str) -> Result<T, LineError> {
    let raw = raw.ok_or(LineError::MissingField)?;
    let value = raw.strip_prefix(label).ok_or(LineError::MissingField)?;
    value.parse().map_err(|_| LineError::InvalidValue)
}
