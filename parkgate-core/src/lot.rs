//! Parking lot occupancy

/// Default number of spaces
pub const DEFAULT_CAPACITY: u8 = 20;

/// Free-space bookkeeping
///
/// `remaining` stays within `[0, capacity]` no matter how many vehicles
/// are admitted or released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParkingLot {
    capacity: u8,
    remaining: u8,
}

impl Default for ParkingLot {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ParkingLot {
    /// Create an empty lot
    pub const fn new(capacity: u8) -> Self {
        Self {
            capacity,
            remaining: capacity,
        }
    }

    /// Total spaces
    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    /// Free spaces
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Occupied spaces
    pub fn occupied(&self) -> u8 {
        self.capacity - self.remaining
    }

    /// Check if at least one space is free
    pub fn has_space(&self) -> bool {
        self.remaining > 0
    }

    /// Check if every space is taken
    pub fn is_full(&self) -> bool {
        self.remaining == 0
    }

    /// A vehicle entered; floors at zero
    pub fn admit(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    /// A vehicle left; caps at capacity
    pub fn release(&mut self) {
        if self.remaining < self.capacity {
            self.remaining += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_empty() {
        let lot = ParkingLot::default();
        assert_eq!(lot.capacity(), 20);
        assert_eq!(lot.remaining(), 20);
        assert_eq!(lot.occupied(), 0);
        assert!(lot.has_space());
    }

    #[test]
    fn test_admit_floors_at_zero() {
        let mut lot = ParkingLot::new(2);
        lot.admit();
        lot.admit();
        assert!(lot.is_full());
        lot.admit();
        assert_eq!(lot.remaining(), 0);
        assert_eq!(lot.occupied(), 2);
    }

    #[test]
    fn test_release_caps_at_capacity() {
        let mut lot = ParkingLot::new(3);
        lot.release();
        assert_eq!(lot.remaining(), 3);
        lot.admit();
        lot.release();
        assert_eq!(lot.remaining(), 3);
    }

    proptest! {
        #[test]
        fn prop_remaining_stays_in_range(capacity in 0u8..=99, ops in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut lot = ParkingLot::new(capacity);
            for admit in ops {
                if admit { lot.admit() } else { lot.release() }
                prop_assert!(lot.remaining() <= capacity);
                prop_assert_eq!(lot.occupied() + lot.remaining(), capacity);
            }
        }
    }
}
