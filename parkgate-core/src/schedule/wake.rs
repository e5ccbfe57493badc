//! Wake deadlines
//!
//! A fixed set of named deadlines. The controller sets and cancels them as
//! its state changes and the firmware sleeps until the earliest one.

/// Reasons the controller needs to run at a specific time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeReason {
    /// Open gate's hold time expires
    GateHold,
    /// Next periodic status line
    StatusReport,
    /// Next full-lot blink phase
    DisplayBlink,
}

impl WakeReason {
    const COUNT: usize = 3;

    const fn slot(self) -> usize {
        match self {
            WakeReason::GateHold => 0,
            WakeReason::StatusReport => 1,
            WakeReason::DisplayBlink => 2,
        }
    }

    const ALL: [WakeReason; Self::COUNT] = [
        WakeReason::GateHold,
        WakeReason::StatusReport,
        WakeReason::DisplayBlink,
    ];
}

/// Deadlines in microseconds since boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeSchedule {
    deadlines: [Option<u64>; WakeReason::COUNT],
}

impl WakeSchedule {
    /// Schedule with nothing pending
    pub const fn new() -> Self {
        Self {
            deadlines: [None; WakeReason::COUNT],
        }
    }

    /// Set or move a deadline
    pub fn set(&mut self, reason: WakeReason, at_us: u64) {
        self.deadlines[reason.slot()] = Some(at_us);
    }

    /// Drop a deadline
    pub fn cancel(&mut self, reason: WakeReason) {
        self.deadlines[reason.slot()] = None;
    }

    /// Pending deadline for `reason`
    pub fn deadline(&self, reason: WakeReason) -> Option<u64> {
        self.deadlines[reason.slot()]
    }

    /// Check if `reason` is due at `now_us`
    pub fn is_due(&self, reason: WakeReason, now_us: u64) -> bool {
        self.deadline(reason).is_some_and(|at| at <= now_us)
    }

    /// Earliest pending deadline and its reason
    pub fn next(&self) -> Option<(WakeReason, u64)> {
        WakeReason::ALL
            .iter()
            .filter_map(|&reason| self.deadline(reason).map(|at| (reason, at)))
            .min_by_key(|&(_, at)| at)
    }
}
