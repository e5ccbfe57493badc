//! Sensor trigger scheduling
//!
//! Both sensors fire once per interval, half an interval apart, so one
//! burst has died down before the other sensor listens.

use crate::lane::Lane;

/// Alternating trigger times for the two lanes, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TriggerSchedule {
    interval_us: u64,
    due_us: [u64; 2],
}

impl TriggerSchedule {
    /// Schedule starting at boot
    ///
    /// The entry sensor first fires one interval after boot and the exit
    /// sensor half an interval after that.
    pub const fn new(interval_us: u64) -> Self {
        Self {
            interval_us,
            due_us: [interval_us, interval_us + interval_us / 2],
        }
    }

    /// Interval between two triggers of the same lane
    pub fn interval_us(&self) -> u64 {
        self.interval_us
    }

    /// Minimum gap between triggers of different lanes
    pub fn gap_us(&self) -> u64 {
        self.interval_us / 2
    }

    /// When `lane` fires next
    pub fn due_us(&self, lane: Lane) -> u64 {
        self.due_us[lane.index()]
    }

    /// Earliest pending trigger
    pub fn next_due_us(&self) -> u64 {
        self.due_us[0].min(self.due_us[1])
    }

    /// Lane to trigger now, if any
    ///
    /// At most one lane fires per call. When both are overdue the earlier
    /// one wins (entry on a tie) and the other is pushed back by the gap.
    pub fn poll(&mut self, now_us: u64) -> Option<Lane> {
        let lane = if self.due_us(Lane::Entry) <= self.due_us(Lane::Exit) {
            Lane::Entry
        } else {
            Lane::Exit
        };
        if self.due_us(lane) > now_us {
            return None;
        }

        self.due_us[lane.index()] = now_us + self.interval_us;
        let other = &mut self.due_us[lane.other().index()];
        *other = (*other).max(now_us + self.interval_us / 2);
        Some(lane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL_US: u64 = 5_000_000;

    #[test]
    fn test_initial_phase() {
        let schedule = TriggerSchedule::new(INTERVAL_US);
        assert_eq!(schedule.due_us(Lane::Entry), 5_000_000);
        assert_eq!(schedule.due_us(Lane::Exit), 7_500_000);
        assert_eq!(schedule.next_due_us(), 5_000_000);
    }

    #[test]
    fn test_alternates_every_half_interval() {
        let mut schedule = TriggerSchedule::new(INTERVAL_US);
        let mut fired = Vec::new();

        // Poll on a 1 ms grid for 20 s
        for ms in 0..20_000u64 {
            let now = ms * 1_000;
            if let Some(lane) = schedule.poll(now) {
                fired.push((now, lane));
            }
        }

        assert_eq!(
            fired,
            vec![
                (5_000_000, Lane::Entry),
                (7_500_000, Lane::Exit),
                (10_000_000, Lane::Entry),
                (12_500_000, Lane::Exit),
                (15_000_000, Lane::Entry),
                (17_500_000, Lane::Exit),
            ]
        );
    }

    #[test]
    fn test_late_poll_never_fires_both() {
        let mut schedule = TriggerSchedule::new(INTERVAL_US);

        // Controller was away for a long time; both lanes are overdue
        assert_eq!(schedule.poll(60_000_000), Some(Lane::Entry));
        assert_eq!(schedule.poll(60_000_000), None);
        assert_eq!(schedule.due_us(Lane::Exit), 62_500_000);
        assert_eq!(schedule.poll(62_500_000), Some(Lane::Exit));
    }

    #[test]
    fn test_nothing_due_before_first_interval() {
        let mut schedule = TriggerSchedule::new(INTERVAL_US);
        assert_eq!(schedule.poll(0), None);
        assert_eq!(schedule.poll(4_999_999), None);
    }
}
