// flight/tests.rs
#[cfg(test)]
mod tests {
    use crate::flight::{EVENT_IGNITION_OFF, EVENT_IGNITION_ON, FlightPhaseEngine};
    use crate::types::FlightPhase;

    #[test]
    fn starts_idle() {
        let engine = FlightPhaseEngine::new();
        assert_eq!(engine.phase(), FlightPhase::Idle);
    }

    #[test]
    fn ignition_events_drive_burn_and_coast() {
        let mut engine = FlightPhaseEngine::new();

        engine.step(EVENT_IGNITION_ON, 0.0);
        assert_eq!(engine.phase(), FlightPhase::Burning);

        // Cutoff moves to Coasting regardless of how fast we are going.
        engine.step(EVENT_IGNITION_OFF, 110.0);
        assert_eq!(engine.phase(), FlightPhase::Coasting);
    }

    #[test]
    fn simultaneous_ignition_events_resolve_to_off() {
        let mut engine = FlightPhaseEngine::new();
        engine.step(EVENT_IGNITION_ON | EVENT_IGNITION_OFF, 50.0);
        assert_eq!(engine.phase(), FlightPhase::Coasting);
    }

    #[test]
    fn slow_coast_opens_apogee_window() {
        let mut engine = FlightPhaseEngine::new();
        engine.step(EVENT_IGNITION_ON, 110.0);
        engine.step(EVENT_IGNITION_OFF, 110.0);

        // Still moving fast: stays Coasting.
        engine.step(0, 20.0);
        assert_eq!(engine.phase(), FlightPhase::Coasting);

        engine.step(0, 5.0);
        assert_eq!(engine.phase(), FlightPhase::ApogeeWindow);
    }

    #[test]
    fn sustained_negative_velocity_means_descending() {
        let mut engine = FlightPhaseEngine::new();
        engine.step(EVENT_IGNITION_ON, 110.0);
        engine.step(EVENT_IGNITION_OFF, 110.0);
        engine.step(0, 5.0);
        assert_eq!(engine.phase(), FlightPhase::ApogeeWindow);

        // Small positive or small negative drift keeps the window open.
        engine.step(0, 8.0);
        assert_eq!(engine.phase(), FlightPhase::ApogeeWindow);
        engine.step(0, -5.0);
        assert_eq!(engine.phase(), FlightPhase::ApogeeWindow);

        engine.step(0, -12.0);
        assert_eq!(engine.phase(), FlightPhase::Descending);
    }

    #[test]
    fn near_zero_velocity_while_descending_is_touchdown() {
        let mut engine = FlightPhaseEngine::new();
        engine.step(EVENT_IGNITION_ON, 110.0);
        engine.step(EVENT_IGNITION_OFF, 110.0);
        engine.step(0, 5.0);
        engine.step(0, -12.0);
        assert_eq!(engine.phase(), FlightPhase::Descending);

        // Still falling: not landed yet.
        engine.step(0, -3.0);
        assert_eq!(engine.phase(), FlightPhase::Descending);

        engine.step(0, 0.3);
        assert_eq!(engine.phase(), FlightPhase::Touchdown);
    }

    #[test]
    fn events_fire_transitions_only_when_present() {
        let mut engine = FlightPhaseEngine::new();
        // No events, any velocity: Idle holds.
        engine.step(0, 150.0);
        engine.step(0, 0.0);
        assert_eq!(engine.phase(), FlightPhase::Idle);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut engine = FlightPhaseEngine::new();
        engine.step(EVENT_IGNITION_ON, 0.0);
        assert_eq!(engine.phase(), FlightPhase::Burning);
        engine.reset();
        assert_eq!(engine.phase(), FlightPhase::Idle);
    }
}
