//! Parking controller
//!
//! Owns the gate state machine and everything it drives: both gates, the
//! lot count, the segment display and the telemetry sink. The firmware
//! calls [`ParkingController::step`] whenever a distance reading changes
//! or a deadline from [`ParkingController::next_wake_us`] passes.
//!
//! One step:
//! 1. Idle: entry reading below threshold with a free space opens the
//!    entry gate, otherwise an exit reading below threshold opens the exit
//!    gate. The consumed reading is reset to the sentinel so the same car
//!    cannot trigger twice.
//! 2. Busy: once the hold time has passed, close the gate, update the lot,
//!    send the count line and refresh the display.
//! 3. Send the status line and advance the full-lot blink when due.

use parkgate_protocol::{CountLine, StatusLine};

use crate::config::ParkingConfig;
use crate::display::SegmentDisplay;
use crate::echo::DistanceCell;
use crate::lane::Lane;
use crate::lot::ParkingLot;
use crate::schedule::{WakeReason, WakeSchedule};
use crate::state::{Event, GateState};
use crate::traits::{GateActuator, SegmentOutput, TelemetrySink};

/// A state change made by [`ParkingController::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub from: GateState,
    pub to: GateState,
    pub event: Event,
}

/// Gate controller for one entry and one exit lane
pub struct ParkingController<E, X, D, T>
where
    E: GateActuator,
    X: GateActuator,
    D: SegmentOutput,
    T: TelemetrySink,
{
    config: ParkingConfig,
    state: GateState,
    lot: ParkingLot,
    entry_gate: E,
    exit_gate: X,
    display: SegmentDisplay<D>,
    telemetry: T,
    /// When the open gate was commanded open (µs)
    action_start_us: u64,
    /// Reading that opened the current or last gate (m)
    triggered_distance_m: f32,
    wake: WakeSchedule,
    /// Digits lit in the current blink phase
    blink_on: bool,
}

impl<E, X, D, T> ParkingController<E, X, D, T>
where
    E: GateActuator,
    X: GateActuator,
    D: SegmentOutput,
    T: TelemetrySink,
{
    /// Create a controller with an empty lot
    ///
    /// Both gates are commanded closed and the display shows the free
    /// spaces. `now_us` anchors the status cadence.
    pub fn new(config: ParkingConfig, mut entry_gate: E, mut exit_gate: X, display: D, telemetry: T, now_us: u64) -> Self {
        entry_gate.close();
        exit_gate.close();

        let mut wake = WakeSchedule::new();
        wake.set(WakeReason::StatusReport, now_us + config.status_interval_us());

        let mut controller = Self {
            config,
            state: GateState::Idle,
            lot: ParkingLot::new(config.capacity),
            entry_gate,
            exit_gate,
            display: SegmentDisplay::new(display),
            telemetry,
            action_start_us: 0,
            triggered_distance_m: 0.0,
            wake,
            blink_on: false,
        };
        controller.refresh_display(now_us);
        controller
    }

    /// Run one control iteration
    ///
    /// `distances` holds the entry and exit readings, indexed by
    /// [`Lane::index`]. Returns the state change, if any.
    pub fn step(&mut self, now_us: u64, distances: &[DistanceCell; 2]) -> Option<Transition> {
        let transition = match self.state {
            GateState::Idle => self.check_detections(now_us, distances),
            GateState::EntryInProgress | GateState::ExitInProgress => self.check_hold(now_us),
        };
        if let Some(transition) = transition {
            self.state = transition.to;
        }

        if self.wake.is_due(WakeReason::StatusReport, now_us) {
            self.send_status(now_us);
            self.wake.set(WakeReason::StatusReport, now_us + self.config.status_interval_us());
        }

        if self.wake.is_due(WakeReason::DisplayBlink, now_us) {
            self.blink_on = !self.blink_on;
            self.show_blink_phase();
            self.wake.set(WakeReason::DisplayBlink, now_us + self.config.blink_interval_us());
        }

        transition
    }

    /// Earliest time the controller needs to run again, if any
    ///
    /// Distance updates are not included; the caller also steps on those.
    pub fn next_wake_us(&self) -> Option<u64> {
        self.wake.next().map(|(_, at)| at)
    }

    /// Current gate state
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Lot occupancy
    pub fn lot(&self) -> &ParkingLot {
        &self.lot
    }

    /// Reading that opened the current or last gate
    pub fn triggered_distance_m(&self) -> f32 {
        self.triggered_distance_m
    }

    /// Configuration the controller runs with
    pub fn config(&self) -> &ParkingConfig {
        &self.config
    }

    /// Entry gate actuator
    pub fn entry_gate(&self) -> &E {
        &self.entry_gate
    }

    /// Exit gate actuator
    pub fn exit_gate(&self) -> &X {
        &self.exit_gate
    }

    /// Segment display and its last written pattern
    pub fn display(&self) -> &SegmentDisplay<D> {
        &self.display
    }

    /// Telemetry sink
    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    fn check_detections(&mut self, now_us: u64, distances: &[DistanceCell; 2]) -> Option<Transition> {
        let threshold = self.config.sensor.threshold_m;
        let entry = distances[Lane::Entry.index()].load();
        let exit = distances[Lane::Exit.index()].load();

        let (lane, distance) = if entry < threshold && self.lot.has_space() {
            (Lane::Entry, entry)
        } else if exit < threshold {
            (Lane::Exit, exit)
        } else {
            return None;
        };

        self.set_gate(lane, true);
        self.action_start_us = now_us;
        self.triggered_distance_m = distance;
        distances[lane.index()].clear();

        // Closes strictly after the hold time
        self.wake.set(WakeReason::GateHold, now_us + self.config.hold_us() + 1);

        Some(self.apply(Event::VehicleDetected(lane)))
    }

    fn check_hold(&mut self, now_us: u64) -> Option<Transition> {
        let elapsed_us = now_us.saturating_sub(self.action_start_us);
        if elapsed_us <= self.config.hold_us() {
            return None;
        }

        let lane = self.state.active_lane()?;
        self.set_gate(lane, false);
        match lane {
            Lane::Entry => self.lot.admit(),
            Lane::Exit => self.lot.release(),
        }
        self.wake.cancel(WakeReason::GateHold);

        let count = CountLine {
            occupied: self.lot.occupied(),
        };
        if let Ok(line) = count.encode() {
            self.telemetry.send(&line);
        }
        self.refresh_display(now_us);

        Some(self.apply(Event::HoldElapsed))
    }

    fn apply(&self, event: Event) -> Transition {
        Transition {
            from: self.state,
            to: self.state.transition(event),
            event,
        }
    }

    fn set_gate(&mut self, lane: Lane, open: bool) {
        match (lane, open) {
            (Lane::Entry, true) => self.entry_gate.open(),
            (Lane::Entry, false) => self.entry_gate.close(),
            (Lane::Exit, true) => self.exit_gate.open(),
            (Lane::Exit, false) => self.exit_gate.close(),
        }
    }

    fn send_status(&mut self, now_us: u64) {
        let status = StatusLine {
            uptime_ms: (now_us / 1000) as u32,
            trigger_distance_m: self.triggered_distance_m,
            remaining_spaces: self.lot.remaining() as i32,
            state: self.state.code(),
        };
        if let Ok(line) = status.encode() {
            self.telemetry.send(&line);
        }
    }

    /// Show the free spaces, or start blinking when the lot is full
    fn refresh_display(&mut self, now_us: u64) {
        if self.lot.is_full() {
            self.blink_on = true;
            self.show_blink_phase();
            self.wake.set(WakeReason::DisplayBlink, now_us + self.config.blink_interval_us());
        } else {
            self.wake.cancel(WakeReason::DisplayBlink);
            // Capacity is validated to two digits
            let _ = self.display.show(self.lot.remaining() as i32);
        }
    }

    fn show_blink_phase(&mut self) {
        if self.blink_on {
            let _ = self.display.show(0);
        } else {
            self.display.blank();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{encode, SegmentPair};
    use crate::traits::GatePosition;
    use proptest::prelude::*;

    #[derive(Debug, Default)]
    struct RecordingGate {
        position: GatePosition,
        opens: u32,
    }

    impl GateActuator for RecordingGate {
        fn open(&mut self) {
            self.position = GatePosition::Open;
            self.opens += 1;
        }

        fn close(&mut self) {
            self.position = GatePosition::Closed;
        }

        fn position(&self) -> GatePosition {
            self.position
        }
    }

    #[derive(Debug, Default)]
    struct RecordingOutput {
        bits: u16,
    }

    impl SegmentOutput for RecordingOutput {
        fn write(&mut self, bits: u16) {
            self.bits = bits;
        }
    }

    #[derive(Debug, Default)]
    struct CaptureSink {
        lines: Vec<String>,
    }

    impl CaptureSink {
        fn counts(&self) -> Vec<&str> {
            self.lines.iter().filter(|l| !l.starts_with("ms:")).map(String::as_str).collect()
        }
    }

    impl TelemetrySink for CaptureSink {
        fn send(&mut self, line: &str) -> usize {
            self.lines.push(line.to_string());
            line.len()
        }
    }

    type TestController = ParkingController<RecordingGate, RecordingGate, RecordingOutput, CaptureSink>;

    const HOLD_US: u64 = 450_000;

    fn controller_with(config: ParkingConfig) -> TestController {
        ParkingController::new(
            config,
            RecordingGate::default(),
            RecordingGate::default(),
            RecordingOutput::default(),
            CaptureSink::default(),
            0,
        )
    }

    fn controller() -> TestController {
        controller_with(ParkingConfig::default())
    }

    fn cells() -> [DistanceCell; 2] {
        [DistanceCell::new(), DistanceCell::new()]
    }

    fn shown(controller: &TestController) -> u16 {
        controller.display().output().bits
    }

    #[test]
    fn test_starts_idle_and_closed() {
        let controller = controller();
        assert_eq!(controller.state(), GateState::Idle);
        assert!(!controller.entry_gate().is_open());
        assert!(!controller.exit_gate().is_open());
        assert_eq!(controller.lot().remaining(), 20);
        assert_eq!(shown(&controller), encode(20).unwrap().to_bits());
        assert_eq!(controller.triggered_distance_m(), 0.0);
    }

    #[test]
    fn test_entry_scenario() {
        let mut controller = controller();
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);

        let t0 = 1_000_000;
        let transition = controller.step(t0, &distances).unwrap();
        assert_eq!(transition.from, GateState::Idle);
        assert_eq!(transition.to, GateState::EntryInProgress);
        assert!(controller.entry_gate().is_open());
        assert!(!distances[Lane::Entry.index()].is_fresh());
        assert_eq!(controller.triggered_distance_m(), 0.5);

        // Exactly the hold time is not enough
        assert_eq!(controller.step(t0 + HOLD_US, &distances), None);
        assert!(controller.entry_gate().is_open());

        let transition = controller.step(t0 + HOLD_US + 1, &distances).unwrap();
        assert_eq!(transition.to, GateState::Idle);
        assert!(!controller.entry_gate().is_open());
        assert_eq!(controller.lot().remaining(), 19);
        assert_eq!(controller.telemetry().counts(), vec!["01\r\n"]);
        assert_eq!(shown(&controller), encode(19).unwrap().to_bits());
    }

    #[test]
    fn test_exit_scenario() {
        let mut controller = controller();
        let distances = cells();

        distances[Lane::Entry.index()].publish(0.2);
        controller.step(0, &distances);
        controller.step(HOLD_US + 1, &distances);
        assert_eq!(controller.lot().remaining(), 19);

        distances[Lane::Exit.index()].publish(0.8);
        let t1 = 2_000_000;
        assert_eq!(controller.step(t1, &distances).unwrap().to, GateState::ExitInProgress);
        assert!(controller.exit_gate().is_open());
        assert!(!controller.entry_gate().is_open());

        controller.step(t1 + HOLD_US + 1, &distances);
        assert_eq!(controller.state(), GateState::Idle);
        assert_eq!(controller.lot().remaining(), 20);
        assert_eq!(controller.telemetry().counts(), vec!["01\r\n", "00\r\n"]);
    }

    #[test]
    fn test_full_lot_ignores_entry() {
        let config = ParkingConfig {
            capacity: 0,
            ..Default::default()
        };
        let mut controller = controller_with(config);
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);

        assert_eq!(controller.step(1_000, &distances), None);
        assert_eq!(controller.state(), GateState::Idle);
        assert!(!controller.entry_gate().is_open());
        // Reading is left alone for when a space frees up
        assert!(distances[Lane::Entry.index()].is_fresh());
    }

    #[test]
    fn test_entry_wins_over_exit() {
        let mut controller = controller();
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);
        distances[Lane::Exit.index()].publish(0.5);

        assert_eq!(controller.step(0, &distances).unwrap().to, GateState::EntryInProgress);
        assert!(!controller.exit_gate().is_open());
    }

    #[test]
    fn test_exit_allowed_when_full() {
        let config = ParkingConfig {
            capacity: 1,
            ..Default::default()
        };
        let mut controller = controller_with(config);
        let distances = cells();

        distances[Lane::Entry.index()].publish(0.5);
        distances[Lane::Exit.index()].publish(0.5);
        controller.step(0, &distances);
        controller.step(HOLD_US + 1, &distances);
        assert!(controller.lot().is_full());

        // Exit reading published before the entry cycle is still there
        assert_eq!(controller.step(HOLD_US + 2, &distances).unwrap().to, GateState::ExitInProgress);
    }

    #[test]
    fn test_exit_during_entry_is_deferred() {
        let mut controller = controller();
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);
        controller.step(0, &distances);

        distances[Lane::Exit.index()].publish(0.3);
        assert_eq!(controller.step(100_000, &distances), None);
        assert!(!controller.exit_gate().is_open());
        assert_eq!(controller.state(), GateState::EntryInProgress);

        // Closing the entry gate is its own step
        assert_eq!(controller.step(HOLD_US + 1, &distances).unwrap().to, GateState::Idle);
        assert!(!controller.exit_gate().is_open());

        // Reading survived, so the next idle step acts on it
        assert_eq!(controller.step(HOLD_US + 2, &distances).unwrap().to, GateState::ExitInProgress);
    }

    #[test]
    fn test_cleared_exit_reading_is_missed() {
        let mut controller = controller();
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);
        controller.step(0, &distances);

        // Detected mid-entry, but the reading was reset before idle
        distances[Lane::Exit.index()].publish(0.3);
        controller.step(100_000, &distances);
        distances[Lane::Exit.index()].clear();

        controller.step(HOLD_US + 1, &distances);
        assert_eq!(controller.step(HOLD_US + 2, &distances), None);
        assert_eq!(controller.exit_gate().opens, 0);
    }

    #[test]
    fn test_same_car_does_not_retrigger() {
        let mut controller = controller();
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);
        controller.step(0, &distances);
        controller.step(HOLD_US + 1, &distances);

        // No fresh measurement since the reading was consumed
        for t in (HOLD_US + 2..HOLD_US + 10_000).step_by(1000) {
            assert_eq!(controller.step(t, &distances), None);
        }
        assert_eq!(controller.entry_gate().opens, 1);
        assert_eq!(controller.lot().remaining(), 19);
    }

    #[test]
    fn test_reading_at_threshold_is_ignored() {
        let mut controller = controller();
        let distances = cells();
        distances[Lane::Exit.index()].publish(1.0);
        assert_eq!(controller.step(0, &distances), None);
    }

    #[test]
    fn test_status_line() {
        let mut controller = controller();
        let distances = cells();

        controller.step(499_999, &distances);
        assert!(controller.telemetry().lines.is_empty());

        controller.step(500_000, &distances);
        assert_eq!(
            controller.telemetry().lines,
            vec!["ms:500, TrigDist:0.00, Spaces:20, State:0\r\n".to_string()]
        );

        distances[Lane::Entry.index()].publish(0.42);
        controller.step(1_000_000, &distances);
        assert_eq!(
            controller.telemetry().lines.last().unwrap(),
            "ms:1000, TrigDist:0.42, Spaces:20, State:1\r\n"
        );
    }

    #[test]
    fn test_telemetry_decodes_on_the_receiving_side() {
        use parkgate_protocol::{LineAssembler, TelemetryLine};

        let mut controller = controller();
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.42);
        controller.step(100_000, &distances);
        controller.step(500_000, &distances);
        controller.step(100_000 + HOLD_US + 1, &distances);
        controller.step(1_000_000, &distances);

        let wire: String = controller.telemetry().lines.concat();
        let mut assembler = LineAssembler::new();
        let mut bytes = wire.as_bytes();
        let mut decoded = Vec::new();
        while let (consumed, Some(line)) = assembler.feed_bytes(bytes) {
            decoded.push(line);
            bytes = &bytes[consumed..];
        }

        assert_eq!(decoded.len(), controller.telemetry().lines.len());
        assert_eq!(
            decoded[0],
            TelemetryLine::Status(StatusLine {
                uptime_ms: 500,
                trigger_distance_m: 0.42,
                remaining_spaces: 20,
                state: 1,
            })
        );
        assert_eq!(decoded[1], TelemetryLine::Count(CountLine { occupied: 1 }));
        assert!(matches!(
            decoded[2],
            TelemetryLine::Status(StatusLine {
                uptime_ms: 1000,
                remaining_spaces: 19,
                state: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_next_wake_tracks_hold() {
        let mut controller = controller();
        let distances = cells();
        assert_eq!(controller.next_wake_us(), Some(500_000));

        distances[Lane::Entry.index()].publish(0.5);
        controller.step(10_000, &distances);
        assert_eq!(controller.next_wake_us(), Some(10_000 + HOLD_US + 1));

        controller.step(10_000 + HOLD_US + 1, &distances);
        assert_eq!(controller.next_wake_us(), Some(500_000));
    }

    #[test]
    fn test_gate_closes_within_one_step_of_hold() {
        const STEP_US: u64 = 1_000;
        let mut controller = controller();
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);

        let opened_at = 3 * STEP_US;
        let mut closed_at = None;
        for t in (opened_at..opened_at + 2 * HOLD_US).step_by(STEP_US as usize) {
            controller.step(t, &distances);
            if t > opened_at && !controller.entry_gate().is_open() && closed_at.is_none() {
                closed_at = Some(t);
            }
        }

        let held = closed_at.unwrap() - opened_at;
        assert!(held > HOLD_US);
        assert!(held <= HOLD_US + STEP_US);
    }

    #[test]
    fn test_full_lot_blinks() {
        let config = ParkingConfig {
            capacity: 1,
            ..Default::default()
        };
        let blink_us = config.blink_interval_us();
        let mut controller = controller_with(config);
        let distances = cells();
        let zero = encode(0).unwrap().to_bits();

        distances[Lane::Entry.index()].publish(0.5);
        controller.step(0, &distances);
        let full_at = HOLD_US + 1;
        controller.step(full_at, &distances);
        assert_eq!(shown(&controller), zero);

        controller.step(full_at + blink_us, &distances);
        assert_eq!(shown(&controller), SegmentPair::BLANK.to_bits());
        controller.step(full_at + 2 * blink_us, &distances);
        assert_eq!(shown(&controller), zero);

        // A car leaves: steady count again
        distances[Lane::Exit.index()].publish(0.5);
        let t = full_at + 2 * blink_us + 1;
        controller.step(t, &distances);
        controller.step(t + HOLD_US + 1, &distances);
        assert_eq!(shown(&controller), encode(1).unwrap().to_bits());
        controller.step(t + HOLD_US + 1 + blink_us, &distances);
        assert_eq!(shown(&controller), encode(1).unwrap().to_bits());
    }

    #[test]
    fn test_runs_through_32bit_tick_boundary() {
        use crate::clock::tests::{clock_72mhz_at, ManualCounter, TICKS_32BIT};

        let clock = clock_72mhz_at(TICKS_32BIT - 10);
        let counter = ManualCounter::default();
        counter.set(36_000);

        let start_us = clock.to_us(clock.now(&counter));
        let mut controller = ParkingController::new(
            ParkingConfig::default(),
            RecordingGate::default(),
            RecordingGate::default(),
            RecordingOutput::default(),
            CaptureSink::default(),
            start_us,
        );
        let distances = cells();
        distances[Lane::Entry.index()].publish(0.5);
        controller.step(start_us, &distances);
        assert!(controller.entry_gate().is_open());

        // One step per millisecond, well past the hold time
        for _ in 0..1_000 {
            clock.tick();
            controller.step(clock.to_us(clock.now(&counter)), &distances);
        }

        assert!(clock.coarse_ticks() > TICKS_32BIT);
        assert!(!controller.entry_gate().is_open());
        assert_eq!(controller.state(), GateState::Idle);
        assert_eq!(controller.lot().remaining(), 19);
        assert_eq!(controller.telemetry().counts(), vec!["01\r\n"]);
        assert!(controller.telemetry().lines.iter().filter(|l| l.starts_with("ms:")).count() >= 2);
        assert!(controller.next_wake_us().unwrap() > clock.to_us(clock.now(&counter)));
    }

    #[derive(Debug, Clone)]
    enum Input {
        Entry(f32),
        Exit(f32),
        Wait(u64),
    }

    fn input() -> impl Strategy<Value = Input> {
        prop_oneof![
            (0.0f32..2.0).prop_map(Input::Entry),
            (0.0f32..2.0).prop_map(Input::Exit),
            (0u64..1_000_000).prop_map(Input::Wait),
        ]
    }

    proptest! {
        #[test]
        fn prop_lot_and_gates_stay_consistent(capacity in 0u8..=5, inputs in proptest::collection::vec(input(), 0..300)) {
            let config = ParkingConfig { capacity, ..Default::default() };
            let mut controller = controller_with(config);
            let distances = cells();
            let mut now = 0u64;

            for input in inputs {
                match input {
                    Input::Entry(d) => distances[Lane::Entry.index()].publish(d),
                    Input::Exit(d) => distances[Lane::Exit.index()].publish(d),
                    Input::Wait(us) => now += us,
                }
                controller.step(now, &distances);

                prop_assert!(controller.lot().remaining() <= capacity);
                let entry_open = controller.entry_gate().is_open();
                let exit_open = controller.exit_gate().is_open();
                prop_assert!(!(entry_open && exit_open));
                prop_assert_eq!(entry_open, controller.state() == GateState::EntryInProgress);
                prop_assert_eq!(exit_open, controller.state() == GateState::ExitInProgress);
            }
        }
    }
}
