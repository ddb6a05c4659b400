// types.rs
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlightPhase {
    Idle = 0,         // On the pad, no ignition yet
    Burning = 1,      // Motor lit, under thrust
    Coasting = 2,     // Motor out, still climbing on momentum
    ApogeeWindow = 3, // Vertical speed near zero, the peak
    Descending = 4,   // Past apogee, coming down
    Touchdown = 5,    // Back on the ground
}

/// Vertical-speed estimate delivered by an external producer. The phase
/// engine consumes only the vertical component; heading and ground speed
/// ride along for downstream consumers.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VelocityEstimate {
    /// Vertical speed, m/s, positive up.
    pub vertical: f32,
    /// Heading in degrees, 0 = due north.
    pub heading: f32,
    /// Speed across the ground, m/s.
    pub ground_speed: f32,
}

impl VelocityEstimate {
    pub const fn new() -> Self {
        Self {
            vertical: 0.0,
            heading: 0.0,
            ground_speed: 0.0,
        }
    }
}
