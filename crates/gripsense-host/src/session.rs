//! Blocking glove session.
//!
//! [`GloveSession`] owns up to two transport endpoints (one per hand) and
//! exposes the SDK operation set. The session holds no background threads:
//! every call runs on the caller's thread, bounded by the caller's
//! deadline, and the two hands never share state, so LEFT and RIGHT
//! operations may run concurrently from separate sessions or behind a
//! caller-side lock.
//!
//! Lifecycle is `Uninitialized -> Initialized -> Uninitialized`. Every
//! operation except [`init`](GloveSession::init) and
//! [`shutdown`](GloveSession::shutdown) requires an initialized session
//! and fails with [`SessionError::NotInitialized`] before touching any
//! transport.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use gripsense_core::protocol::{deserialize_skeleton, GloveReport, RumbleReport};
use gripsense_core::types::flags;
use gripsense_core::{CalibrationOptions, Hand, HandSkeleton, TelemetryRecord};

use crate::error::{SessionError, SessionResult};
use crate::transport::{GloveTransport, TransportError, TransportProvider};

/// Default deadline for [`GloveSession::get_skeletal`].
pub const DEFAULT_SKELETAL_TIMEOUT: Duration = Duration::from_millis(1000);

/// Sleep between transport polls while waiting out a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(1);

// ============================================================================
// Per-Hand State
// ============================================================================

struct HandState {
    transport: Box<dyn GloveTransport>,
    /// Last normalized snapshot, if any report ever arrived
    last_record: Option<TelemetryRecord>,
    /// Host-side sample counter, bumped per fresh report, wraps
    packet_counter: u32,
}

impl HandState {
    fn new(transport: Box<dyn GloveTransport>) -> Self {
        Self {
            transport,
            last_record: None,
            packet_counter: 0,
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Host session over a pair of glove endpoints.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use gripsense_core::Hand;
/// use gripsense_host::GloveSession;
///
/// let mut session = GloveSession::new();
/// session.init(&mut provider)?;
///
/// let record = session.get_telemetry(Hand::Right, Duration::from_millis(100))?;
/// println!("packet {} roll {}", record.packet_number, record.euler.x);
///
/// session.shutdown();
/// ```
pub struct GloveSession {
    /// `None` = uninitialized; inner `None` = hand endpoint absent
    hands: Option<[Option<HandState>; 2]>,
}

impl GloveSession {
    /// Create an uninitialized session.
    #[must_use]
    pub const fn new() -> Self {
        Self { hands: None }
    }

    /// Whether [`init`](Self::init) has run and
    /// [`shutdown`](Self::shutdown) has not.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.hands.is_some()
    }

    /// Initialize the session, opening one endpoint per hand.
    ///
    /// A hand whose glove is merely absent does not fail init; that hand
    /// reports [`SessionError::Disconnected`] on use until a future
    /// re-init finds it.
    ///
    /// # Errors
    ///
    /// [`SessionError::Failed`] if already initialized;
    /// [`SessionError::Transport`] if the transport layer is unavailable.
    /// On error the session stays (or returns to) uninitialized.
    pub fn init(&mut self, provider: &mut dyn TransportProvider) -> SessionResult<()> {
        if self.hands.is_some() {
            return Err(SessionError::Failed("session already initialized".into()));
        }

        let mut hands: [Option<HandState>; 2] = [None, None];
        for hand in Hand::ALL {
            match provider.open(hand)? {
                Some(transport) => {
                    debug!(?hand, "glove endpoint opened");
                    hands[hand.index()] = Some(HandState::new(transport));
                }
                None => {
                    debug!(?hand, "no glove present");
                }
            }
        }

        self.hands = Some(hands);
        Ok(())
    }

    /// Shut the session down, dropping both endpoints. Idempotent; safe
    /// to call on an uninitialized session.
    pub fn shutdown(&mut self) {
        if self.hands.take().is_some() {
            debug!("session shut down");
        }
    }

    /// Whether a glove endpoint for this hand is currently held.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotInitialized`] before init.
    pub fn is_connected(&self, hand: Hand) -> SessionResult<bool> {
        let hands = self.hands.as_ref().ok_or(SessionError::NotInitialized)?;
        Ok(hands[hand.index()].is_some())
    }

    fn hand_state(&mut self, hand: Hand) -> SessionResult<&mut HandState> {
        let hands = self.hands.as_mut().ok_or(SessionError::NotInitialized)?;
        hands[hand.index()]
            .as_mut()
            .ok_or(SessionError::Disconnected(hand))
    }

    /// Drop a hand whose endpoint reported closed.
    fn drop_hand(&mut self, hand: Hand) {
        if let Some(hands) = self.hands.as_mut() {
            if hands[hand.index()].take().is_some() {
                warn!(?hand, "glove endpoint closed, dropping hand");
            }
        }
    }

    // ------------------------------------------------------------------
    // Telemetry & skeletal polling
    // ------------------------------------------------------------------

    /// Poll one hand for a telemetry snapshot, waiting up to `timeout`
    /// for a fresh report.
    ///
    /// A fresh report bumps the per-hand packet counter; if the deadline
    /// passes without one, the previous snapshot is returned unchanged
    /// (same `packet_number`, which is how callers detect staleness). The
    /// call leaves the session valid either way.
    ///
    /// # Errors
    ///
    /// [`SessionError::Timeout`] if no report has ever arrived for this
    /// hand; [`SessionError::Disconnected`] if the hand has no endpoint;
    /// [`SessionError::NotInitialized`] before init.
    pub fn get_telemetry(
        &mut self,
        hand: Hand,
        timeout: Duration,
    ) -> SessionResult<TelemetryRecord> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self.hand_state(hand)?;
            match state.transport.poll_report() {
                Ok(Some(bytes)) => {
                    match GloveReport::from_bytes(&bytes) {
                        Ok(report) if report.device_type.hand() == hand => {
                            state.packet_counter = state.packet_counter.wrapping_add(1);
                            let record = report.to_telemetry(state.packet_counter);
                            state.last_record = Some(record);
                            return Ok(record);
                        }
                        Ok(report) => {
                            // Report routed to the wrong endpoint; keep waiting
                            warn!(?hand, got = ?report.device_type, "mismatched report");
                        }
                        Err(e) => {
                            warn!(?hand, error = %e, "discarding malformed report");
                        }
                    }
                }
                Ok(None) => {}
                Err(TransportError::Closed) => {
                    self.drop_hand(hand);
                    return Err(SessionError::Disconnected(hand));
                }
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                let state = self.hand_state(hand)?;
                return state
                    .last_record
                    .ok_or(SessionError::Timeout(timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    /// Poll one hand for its device-derived skeletal model, waiting up
    /// to `timeout`. See [`DEFAULT_SKELETAL_TIMEOUT`].
    ///
    /// The glove computes the pose tree itself; the host only decodes
    /// the fixed 588-byte payload.
    ///
    /// # Errors
    ///
    /// [`SessionError::Timeout`] if no payload arrived in time;
    /// [`SessionError::Protocol`] on a malformed payload;
    /// [`SessionError::Disconnected`] / [`SessionError::NotInitialized`]
    /// as for telemetry.
    pub fn get_skeletal(
        &mut self,
        hand: Hand,
        timeout: Duration,
    ) -> SessionResult<HandSkeleton> {
        let deadline = Instant::now() + timeout;
        loop {
            let state = self.hand_state(hand)?;
            match state.transport.poll_skeletal() {
                Ok(Some(bytes)) => return Ok(deserialize_skeleton(&bytes)?),
                Ok(None) => {}
                Err(TransportError::Closed) => {
                    self.drop_hand(hand);
                    return Err(SessionError::Disconnected(hand));
                }
                Err(e) => return Err(e.into()),
            }

            if Instant::now() >= deadline {
                return Err(SessionError::Timeout(timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    // ------------------------------------------------------------------
    // Device control
    // ------------------------------------------------------------------

    /// Rewrite the glove's persistent handedness flag.
    ///
    /// Destructive: the setting overwrites factory configuration and
    /// survives power cycles. Only the handedness bit changes; the
    /// calibration bits pass through untouched.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidArgument`] if the addressed hand has no
    /// connected glove; transport failures as
    /// [`SessionError::Transport`].
    pub fn set_handedness(&mut self, hand: Hand, new_hand: Hand) -> SessionResult<()> {
        let state = match self.hand_state(hand) {
            Ok(state) => state,
            Err(SessionError::Disconnected(_)) => {
                return Err(SessionError::InvalidArgument(
                    "no connected glove for the addressed hand",
                ))
            }
            Err(e) => return Err(e),
        };

        let current = state.transport.read_flags()?;
        let updated = match new_hand {
            Hand::Right => current | flags::HANDEDNESS,
            Hand::Left => current & !flags::HANDEDNESS,
        };
        state.transport.write_flags(updated)?;
        debug!(?hand, ?new_hand, "handedness rewritten");
        Ok(())
    }

    /// Trigger on-device sensor calibration for the selected sensors.
    ///
    /// Destructive: the glove recomputes and persists its calibration.
    /// The handedness bit passes through untouched.
    ///
    /// # Errors
    ///
    /// [`SessionError::Disconnected`] for an absent hand; transport
    /// failures as [`SessionError::Transport`].
    pub fn calibrate(&mut self, hand: Hand, options: CalibrationOptions) -> SessionResult<()> {
        let state = self.hand_state(hand)?;
        let current = state.transport.read_flags()?;
        state.transport.write_flags(options.apply_to(current))?;
        debug!(?hand, ?options, "calibration triggered");
        Ok(())
    }

    /// Drive the haptic motor at `power` in `[0, 1]`.
    ///
    /// The value is validated, not clamped; zero stops the motor.
    ///
    /// # Errors
    ///
    /// [`SessionError::OutOfRange`] for `power` outside `[0, 1]` (NaN
    /// included); [`SessionError::Disconnected`] for an absent hand.
    pub fn set_vibration(&mut self, hand: Hand, power: f32) -> SessionResult<()> {
        if !(0.0..=1.0).contains(&power) {
            return Err(SessionError::OutOfRange {
                what: "power",
                value: power,
            });
        }

        let state = self.hand_state(hand)?;
        let payload = RumbleReport::from_power(power).to_bytes();
        state.transport.write_rumble(&payload)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Auxiliary reads
    // ------------------------------------------------------------------

    /// Read the glove's persistent flags byte.
    ///
    /// # Errors
    ///
    /// [`SessionError::Disconnected`] for an absent hand; transport
    /// failures as [`SessionError::Transport`].
    pub fn flags(&mut self, hand: Hand) -> SessionResult<u8> {
        let state = self.hand_state(hand)?;
        Ok(state.transport.read_flags()?)
    }

    /// Read the link signal strength in dBm.
    ///
    /// # Errors
    ///
    /// As for [`flags`](Self::flags).
    pub fn rssi(&mut self, hand: Hand) -> SessionResult<i16> {
        let state = self.hand_state(hand)?;
        Ok(state.transport.read_rssi()?)
    }

    /// Read the battery voltage in millivolts.
    ///
    /// # Errors
    ///
    /// As for [`flags`](Self::flags).
    pub fn battery_voltage(&mut self, hand: Hand) -> SessionResult<u16> {
        let state = self.hand_state(hand)?;
        Ok(state.transport.read_battery_voltage()?)
    }

    /// Read the battery charge percentage (0 to 100).
    ///
    /// # Errors
    ///
    /// As for [`flags`](Self::flags).
    pub fn battery_percentage(&mut self, hand: Hand) -> SessionResult<u8> {
        let state = self.hand_state(hand)?;
        Ok(state.transport.read_battery_percentage()?)
    }

    /// Power the glove down and drop its endpoint.
    ///
    /// # Errors
    ///
    /// [`SessionError::Disconnected`] for an absent hand; transport
    /// failures as [`SessionError::Transport`].
    pub fn power_off(&mut self, hand: Hand) -> SessionResult<()> {
        let state = self.hand_state(hand)?;
        state.transport.power_off()?;
        self.drop_hand(hand);
        Ok(())
    }
}

impl Default for GloveSession {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use gripsense_core::protocol::{serialize_skeleton, DeviceType, HAND_SKELETON_WIRE_SIZE};
    use gripsense_core::{Finger, Pose, Quaternion, Vector3};

    use super::*;
    use crate::error::ResultCode;

    /// Shared view into a scripted endpoint, for asserting what the
    /// session wrote and feeding it reports mid-test.
    #[derive(Default)]
    struct Shared {
        reports: VecDeque<Vec<u8>>,
        skeletals: VecDeque<Vec<u8>>,
        flags: u8,
        rumbles: Vec<Vec<u8>>,
        closed: bool,
    }

    struct ScriptedTransport {
        shared: Arc<Mutex<Shared>>,
    }

    impl GloveTransport for ScriptedTransport {
        fn poll_report(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
            let mut shared = self.shared.lock().unwrap();
            if shared.closed {
                return Err(TransportError::Closed);
            }
            Ok(shared.reports.pop_front())
        }

        fn poll_skeletal(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
            let mut shared = self.shared.lock().unwrap();
            if shared.closed {
                return Err(TransportError::Closed);
            }
            Ok(shared.skeletals.pop_front())
        }

        fn read_flags(&mut self) -> Result<u8, TransportError> {
            Ok(self.shared.lock().unwrap().flags)
        }

        fn write_flags(&mut self, flags: u8) -> Result<(), TransportError> {
            self.shared.lock().unwrap().flags = flags;
            Ok(())
        }

        fn write_rumble(&mut self, payload: &[u8]) -> Result<(), TransportError> {
            self.shared.lock().unwrap().rumbles.push(payload.to_vec());
            Ok(())
        }

        fn read_battery_voltage(&mut self) -> Result<u16, TransportError> {
            Ok(3700)
        }

        fn read_battery_percentage(&mut self) -> Result<u8, TransportError> {
            Ok(82)
        }

        fn read_rssi(&mut self) -> Result<i16, TransportError> {
            Ok(-48)
        }

        fn power_off(&mut self) -> Result<(), TransportError> {
            self.shared.lock().unwrap().closed = true;
            Ok(())
        }
    }

    struct ScriptedProvider {
        left: Option<Arc<Mutex<Shared>>>,
        right: Option<Arc<Mutex<Shared>>>,
    }

    impl ScriptedProvider {
        fn right_only() -> (Self, Arc<Mutex<Shared>>) {
            let right = Arc::new(Mutex::new(Shared::default()));
            (
                Self {
                    left: None,
                    right: Some(Arc::clone(&right)),
                },
                right,
            )
        }

        fn both() -> (Self, Arc<Mutex<Shared>>, Arc<Mutex<Shared>>) {
            let left = Arc::new(Mutex::new(Shared::default()));
            let right = Arc::new(Mutex::new(Shared::default()));
            (
                Self {
                    left: Some(Arc::clone(&left)),
                    right: Some(Arc::clone(&right)),
                },
                left,
                right,
            )
        }
    }

    impl TransportProvider for ScriptedProvider {
        fn open(
            &mut self,
            hand: Hand,
        ) -> Result<Option<Box<dyn GloveTransport>>, TransportError> {
            let shared = match hand {
                Hand::Left => self.left.as_ref(),
                Hand::Right => self.right.as_ref(),
            };
            Ok(shared.map(|shared| {
                Box::new(ScriptedTransport {
                    shared: Arc::clone(shared),
                }) as Box<dyn GloveTransport>
            }))
        }
    }

    fn report_bytes(device_type: DeviceType, fingers: [u8; 5]) -> Vec<u8> {
        GloveReport {
            device_type,
            quat: [16384, 0, 0, 0],
            accel: [0, 16384, 0],
            fingers,
        }
        .to_bytes()
        .to_vec()
    }

    /// Route session logs through the test harness capture.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn init_session(provider: &mut ScriptedProvider) -> GloveSession {
        init_tracing();
        let mut session = GloveSession::new();
        session.init(provider).unwrap();
        session
    }

    #[test]
    fn test_ops_before_init_touch_no_transport() {
        init_tracing();
        let mut session = GloveSession::new();

        let result = session.get_telemetry(Hand::Left, Duration::from_millis(10));
        assert!(matches!(result, Err(SessionError::NotInitialized)));
        assert_eq!(ResultCode::of(&result), ResultCode::Disconnected);

        assert!(matches!(
            session.get_skeletal(Hand::Right, DEFAULT_SKELETAL_TIMEOUT),
            Err(SessionError::NotInitialized)
        ));
        assert!(matches!(
            session.set_vibration(Hand::Right, 0.5),
            Err(SessionError::NotInitialized)
        ));
    }

    #[test]
    fn test_init_twice_fails() {
        let (mut provider, _right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);
        assert!(matches!(
            session.init(&mut provider),
            Err(SessionError::Failed(_))
        ));
        assert!(session.is_initialized());
    }

    #[test]
    fn test_absent_hand_is_disconnected_not_fatal() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        let result = session.get_telemetry(Hand::Left, Duration::ZERO);
        assert!(matches!(result, Err(SessionError::Disconnected(Hand::Left))));
        assert_eq!(ResultCode::of(&result), ResultCode::Disconnected);

        // the session stays usable for the other hand
        right
            .lock()
            .unwrap()
            .reports
            .push_back(report_bytes(DeviceType::GloveRight, [0, 0, 0, 0, 255]));
        let record = session.get_telemetry(Hand::Right, Duration::ZERO).unwrap();
        assert_eq!(record.packet_number, 1);
    }

    #[test]
    fn test_telemetry_normalized_and_counted() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        right
            .lock()
            .unwrap()
            .reports
            .push_back(report_bytes(DeviceType::GloveRight, [255, 0, 0, 0, 0]));
        let first = session.get_telemetry(Hand::Right, Duration::ZERO).unwrap();
        assert_eq!(first.packet_number, 1);
        assert_eq!(first.orientation, Quaternion::IDENTITY);
        assert_eq!(first.acceleration, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(first.finger(Finger::Thumb), 1.0);

        right
            .lock()
            .unwrap()
            .reports
            .push_back(report_bytes(DeviceType::GloveRight, [0, 0, 0, 0, 0]));
        let second = session.get_telemetry(Hand::Right, Duration::ZERO).unwrap();
        assert_eq!(second.packet_number, 2);
    }

    #[test]
    fn test_stale_poll_returns_previous_snapshot() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        right
            .lock()
            .unwrap()
            .reports
            .push_back(report_bytes(DeviceType::GloveRight, [10, 20, 30, 40, 50]));
        let fresh = session.get_telemetry(Hand::Right, Duration::ZERO).unwrap();

        // no new report within the deadline: same snapshot, same counter
        let stale = session.get_telemetry(Hand::Right, Duration::ZERO).unwrap();
        assert_eq!(stale, fresh);
        assert_eq!(stale.packet_number, 1);
    }

    #[test]
    fn test_telemetry_timeout_before_any_report() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        let timeout = Duration::from_millis(5);
        let result = session.get_telemetry(Hand::Right, timeout);
        assert!(matches!(result, Err(SessionError::Timeout(t)) if t == timeout));
        assert_eq!(ResultCode::of(&result), ResultCode::Error);

        // session stays valid; a later report succeeds
        right
            .lock()
            .unwrap()
            .reports
            .push_back(report_bytes(DeviceType::GloveRight, [0; 5]));
        assert!(session.get_telemetry(Hand::Right, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_malformed_and_mismatched_reports_skipped() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        {
            let mut shared = right.lock().unwrap();
            shared.reports.push_back(vec![0xFF; 3]); // short
            shared
                .reports
                .push_back(report_bytes(DeviceType::GloveLeft, [0; 5])); // wrong hand
            shared
                .reports
                .push_back(report_bytes(DeviceType::GloveRight, [0; 5]));
        }

        let record = session
            .get_telemetry(Hand::Right, Duration::from_millis(100))
            .unwrap();
        assert_eq!(record.packet_number, 1);
    }

    #[test]
    fn test_closed_endpoint_drops_hand() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        right.lock().unwrap().closed = true;
        let result = session.get_telemetry(Hand::Right, Duration::ZERO);
        assert!(matches!(result, Err(SessionError::Disconnected(Hand::Right))));

        // hand stays dropped afterwards, session stays initialized
        assert!(session.is_initialized());
        assert!(!session.is_connected(Hand::Right).unwrap());
    }

    #[test]
    fn test_skeletal_decode() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        let mut model = HandSkeleton::default();
        model.palm = Pose {
            orientation: Quaternion::IDENTITY,
            position: Vector3::new(0.0, 85.0, 0.0),
        };
        model.index.distal.position = Vector3::new(12.5, 180.0, -3.0);

        let mut payload = vec![0u8; HAND_SKELETON_WIRE_SIZE];
        serialize_skeleton(&model, &mut payload).unwrap();
        right.lock().unwrap().skeletals.push_back(payload);

        let decoded = session
            .get_skeletal(Hand::Right, DEFAULT_SKELETAL_TIMEOUT)
            .unwrap();
        assert_eq!(decoded, model);
        assert_eq!(HandSkeleton::POSE_COUNT, 21);
    }

    #[test]
    fn test_skeletal_timeout() {
        let (mut provider, _right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        let result = session.get_skeletal(Hand::Right, Duration::from_millis(5));
        assert!(matches!(result, Err(SessionError::Timeout(_))));
    }

    #[test]
    fn test_set_handedness_preserves_other_bits() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        right.lock().unwrap().flags = flags::CAL_GYRO | flags::CAL_FINGERS;
        session.set_handedness(Hand::Right, Hand::Right).unwrap();
        assert_eq!(
            right.lock().unwrap().flags,
            flags::HANDEDNESS | flags::CAL_GYRO | flags::CAL_FINGERS
        );

        session.set_handedness(Hand::Right, Hand::Left).unwrap();
        assert_eq!(
            right.lock().unwrap().flags,
            flags::CAL_GYRO | flags::CAL_FINGERS
        );
    }

    #[test]
    fn test_set_handedness_absent_hand_is_invalid_argument() {
        let (mut provider, _right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        let result = session.set_handedness(Hand::Left, Hand::Right);
        assert!(matches!(result, Err(SessionError::InvalidArgument(_))));
        assert_eq!(ResultCode::of(&result), ResultCode::InvalidArgument);
    }

    #[test]
    fn test_calibrate_sets_selected_bits() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        right.lock().unwrap().flags = flags::HANDEDNESS | flags::CAL_FINGERS;
        session
            .calibrate(Hand::Right, CalibrationOptions::default())
            .unwrap();

        let byte = right.lock().unwrap().flags;
        assert_eq!(byte & flags::HANDEDNESS, flags::HANDEDNESS);
        assert_eq!(byte & flags::CAL_GYRO, flags::CAL_GYRO);
        assert_eq!(byte & flags::CAL_ACCEL, flags::CAL_ACCEL);
        assert_eq!(byte & flags::CAL_FINGERS, 0);
    }

    #[test]
    fn test_vibration_range_validation() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        for bad in [-0.01f32, 1.5, f32::NAN] {
            let result = session.set_vibration(Hand::Right, bad);
            assert!(matches!(result, Err(SessionError::OutOfRange { .. })));
            assert_eq!(ResultCode::of(&result), ResultCode::OutOfRange);
        }
        assert!(right.lock().unwrap().rumbles.is_empty());

        session.set_vibration(Hand::Right, 0.5).unwrap();
        session.set_vibration(Hand::Right, 0.0).unwrap();

        let rumbles = right.lock().unwrap().rumbles.clone();
        assert_eq!(rumbles.len(), 2);
        // 0.5 * 65535 truncates to 32767
        let half = u16::from_le_bytes([rumbles[0][0], rumbles[0][1]]);
        assert_eq!(half, 32767);
        assert_eq!(rumbles[1], vec![0, 0]);
    }

    #[test]
    fn test_hands_are_independent() {
        let (mut provider, left, right) = ScriptedProvider::both();
        let mut session = init_session(&mut provider);

        left.lock()
            .unwrap()
            .reports
            .push_back(report_bytes(DeviceType::GloveLeft, [255, 0, 0, 0, 0]));
        right
            .lock()
            .unwrap()
            .reports
            .push_back(report_bytes(DeviceType::GloveRight, [255, 0, 0, 0, 0]));

        let l = session.get_telemetry(Hand::Left, Duration::ZERO).unwrap();
        let r = session.get_telemetry(Hand::Right, Duration::ZERO).unwrap();

        // counters advance per hand, and the left strip is reversed
        assert_eq!(l.packet_number, 1);
        assert_eq!(r.packet_number, 1);
        assert_eq!(l.finger(Finger::Pinky), 1.0);
        assert_eq!(r.finger(Finger::Thumb), 1.0);
    }

    #[test]
    fn test_auxiliary_reads() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        right.lock().unwrap().flags = flags::HANDEDNESS;
        assert_eq!(session.flags(Hand::Right).unwrap(), flags::HANDEDNESS);
        assert_eq!(session.rssi(Hand::Right).unwrap(), -48);
        assert_eq!(session.battery_voltage(Hand::Right).unwrap(), 3700);
        assert_eq!(session.battery_percentage(Hand::Right).unwrap(), 82);

        assert!(matches!(
            session.flags(Hand::Left),
            Err(SessionError::Disconnected(Hand::Left))
        ));
    }

    #[test]
    fn test_power_off_drops_hand() {
        let (mut provider, right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        session.power_off(Hand::Right).unwrap();
        assert!(right.lock().unwrap().closed);
        assert!(!session.is_connected(Hand::Right).unwrap());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (mut provider, _right) = ScriptedProvider::right_only();
        let mut session = init_session(&mut provider);

        session.shutdown();
        assert!(!session.is_initialized());
        session.shutdown();

        assert!(matches!(
            session.get_telemetry(Hand::Right, Duration::ZERO),
            Err(SessionError::NotInitialized)
        ));

        // re-init works after shutdown
        session.init(&mut provider).unwrap();
        assert!(session.is_initialized());
    }
}
