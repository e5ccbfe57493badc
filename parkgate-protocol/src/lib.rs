//! Parkgate serial telemetry protocol
//!
//! This crate defines the plain-ASCII lines the parking controller sends over
//! its UART link, and a byte-level assembler for the receiving side.
//!
//! # Protocol Overview
//!
//! Every message is one line terminated by CRLF. There is no framing beyond
//! the terminator, no acknowledgement and no flow control.
//!
//! ```text
//! ms:12500, TrigDist:0.52, Spaces:19, State:1\r\n   periodic status
//! 01\r\n                                              vehicle count
//! ```
//!
//! The status line reports controller uptime, the distance that triggered
//! the current gate cycle, remaining spaces and the gate state code. The
//! count line carries the number of occupied spaces and is sent whenever a
//! gate cycle completes.
//!
//! # Receiving side
//!
//! The firmware only encodes. [`TelemetryLine::parse`] and
//! [`LineAssembler`] are the decoder for whatever listens on the other end
//! of the link (a host-side monitor or a test bench). They build on `std`
//! hosts as well as `no_std` targets.
//!
//! ```ignore
//! let mut assembler = LineAssembler::new();
//! let (consumed, line) = assembler.feed_bytes(&rx_buf[..n]);
//! if let Some(TelemetryLine::Count(count)) = line {
//!     println!("occupied: {}", count.occupied);
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod line;

pub use assembler::LineAssembler;
pub use line::{CountLine, Line, LineError, StatusLine, TelemetryLine, LINE_TERMINATOR, MAX_LINE_LEN};
