//! Shared state between tasks
//!
//! Distance readings live in atomic cells. Signals only wake the reader;
//! they carry no data the reader depends on.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use parkgate_core::echo::DistanceCell;
use parkgate_core::Lane;

/// Latest reading per lane, indexed by [`Lane::index`]
pub static DISTANCES: [DistanceCell; 2] = [DistanceCell::new(), DistanceCell::new()];

/// An echo task published a reading
pub static ECHO_UPDATED: Signal<CriticalSectionRawMutex, Lane> = Signal::new();

/// The controller queued telemetry bytes
pub static TELEMETRY_PENDING: Signal<CriticalSectionRawMutex, ()> = Signal::new();
