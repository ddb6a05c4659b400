use crate::datacells::DataCell;
use crate::gps::types::{GpsDiagnostics, IngestHealth, PositionFix};
use crate::types::{FlightPhase, VelocityEstimate};

/// The shared state every task sees: the authoritative flight phase, the
/// externally produced velocity estimate, and the latest GPS snapshots.
///
/// There is deliberately no global instance. Whoever assembles the system
/// owns one (typically through a `StaticCell`) and hands a reference to each
/// task at creation, which is what lets every task loop be tested in
/// isolation.
///
/// Scheduling is cooperative, so at most one task touches a cell at a time
/// and readers between yields always see whole snapshots.
pub struct FlightShared {
    pub phase: DataCell<FlightPhase>,
    pub velocity: DataCell<VelocityEstimate>,
    pub fix: DataCell<PositionFix>,
    pub diagnostics: DataCell<GpsDiagnostics>,
    pub ingest_health: DataCell<IngestHealth>,
}

impl FlightShared {
    pub const fn new() -> Self {
        Self {
            phase: DataCell::new(FlightPhase::Idle),
            velocity: DataCell::new(VelocityEstimate::new()),
            fix: DataCell::new(PositionFix::new()),
            diagnostics: DataCell::new(GpsDiagnostics::new()),
            ingest_health: DataCell::new(IngestHealth::new()),
        }
    }

    /// Latest authoritative flight phase.
    pub fn flight_phase(&self) -> FlightPhase {
        self.phase.snapshot()
    }

    /// Latest published position fix.
    pub fn position_fix(&self) -> PositionFix {
        self.fix.snapshot()
    }

    /// Latest published GPS diagnostics.
    pub fn gps_diagnostics(&self) -> GpsDiagnostics {
        self.diagnostics.snapshot()
    }

    /// Entry point for the external velocity producer.
    pub fn velocity_update(&self, vertical: f32, heading: f32, ground_speed: f32) {
        self.velocity.publish(VelocityEstimate {
            vertical,
            heading,
            ground_speed,
        });
    }
}

impl Default for FlightShared {
    fn default() -> Self {
        Self::new()
    }
}
