use crate::types::FlightPhase;

/// Event bit raised by the ignition sensor when the motor lights.
pub const EVENT_IGNITION_ON: u32 = 1 << 0;

/// Event bit raised by the ignition sensor when the motor cuts off.
pub const EVENT_IGNITION_OFF: u32 = 1 << 1;

/// Vertical-speed magnitude (m/s) below which a coasting rocket is treated
/// as being inside the apogee window.
pub const APOGEE_THRESHOLD_MPS: f32 = 10.0;

/// Vertical-speed magnitude (m/s) below which a descending rocket is
/// treated as having touched down (sensor noise floor).
pub const NOISE_THRESHOLD_MPS: f32 = 0.5;

/// The authoritative mission-phase state machine.
///
/// Fed one sample per scheduler cycle: the ignition events caught this cycle
/// and the latest vertical-speed estimate. Transitions run forward along
/// Idle → Burning → Coasting → ApogeeWindow → Descending → Touchdown, except
/// through [`reset`](FlightPhaseEngine::reset). The rules are evaluated in a
/// fixed order and later rules see the phase already updated by earlier ones
/// in the same cycle; in particular, ignition-off beats ignition-on when
/// both events land in one cycle.
///
/// No I/O: the phase value is the only observable effect.
pub struct FlightPhaseEngine {
    phase: FlightPhase,
    apogee_threshold: f32,
    noise_threshold: f32,
}

impl FlightPhaseEngine {
    pub const fn new() -> Self {
        Self::with_thresholds(APOGEE_THRESHOLD_MPS, NOISE_THRESHOLD_MPS)
    }

    pub const fn with_thresholds(apogee_threshold: f32, noise_threshold: f32) -> Self {
        Self {
            phase: FlightPhase::Idle,
            apogee_threshold,
            noise_threshold,
        }
    }

    pub const fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// External reset back to the pad state.
    pub fn reset(&mut self) {
        self.phase = FlightPhase::Idle;
    }

    /// Advance the state machine by one cycle.
    ///
    /// `events` holds the ignition bits caught since the last step; because
    /// event bits are consumed on read, each raise fires a transition at
    /// most once.
    pub fn step(&mut self, events: u32, vertical_velocity: f32) -> FlightPhase {
        if events & EVENT_IGNITION_ON != 0 {
            self.phase = FlightPhase::Burning;
        }
        // Off wins when both ignition events land in the same cycle.
        if events & EVENT_IGNITION_OFF != 0 {
            self.phase = FlightPhase::Coasting;
        }
        if self.phase == FlightPhase::Coasting && vertical_velocity.abs() <= self.apogee_threshold {
            self.phase = FlightPhase::ApogeeWindow;
        }
        if self.phase == FlightPhase::ApogeeWindow && vertical_velocity <= -self.apogee_threshold {
            self.phase = FlightPhase::Descending;
        }
        if self.phase == FlightPhase::Descending && vertical_velocity.abs() <= self.noise_threshold {
            self.phase = FlightPhase::Touchdown;
        }
        self.phase
    }
}

impl Default for FlightPhaseEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
