//! Gate actuator trait

/// Commanded gate position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GatePosition {
    /// Barrier down
    #[default]
    Closed,
    /// Barrier up
    Open,
}

/// Trait for a two-position gate
///
/// Commands take effect immediately. There is no feedback sensor, so
/// [`GateActuator::position`] reports the last commanded position, not a
/// measured one. The caller decides how long a gate stays open.
pub trait GateActuator {
    /// Command the gate open
    fn open(&mut self);

    /// Command the gate closed
    fn close(&mut self);

    /// Last commanded position
    fn position(&self) -> GatePosition;

    /// Check if the gate was last commanded open
    fn is_open(&self) -> bool {
        self.position() == GatePosition::Open
    }
}
