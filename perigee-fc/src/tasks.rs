//! The two perpetual tasks and their helpers.
//!
//! Task bodies are generic over [`Sched`] so the loops can be exercised
//! against a scripted scheduler in tests; in flight they run on the real
//! runtime, which hands the CPU around at each `yield_now`.

use perigee_core::flight::{EVENT_IGNITION_OFF, EVENT_IGNITION_ON, FlightPhaseEngine};
use perigee_core::{FlightPhase, FlightShared};
use perigee_rt::Sched;

use crate::ingest::PositionIngest;
use crate::serial::SerialPort;

/// Mission-phase task: each cycle, consume whatever ignition events arrived,
/// sample the velocity estimate, advance the state machine and publish the
/// authoritative phase.
pub fn flight_phase_task<S: Sched>(sched: &S, shared: &FlightShared) -> ! {
    let mut engine = FlightPhaseEngine::new();
    loop {
        let events = sched.catch_event(EVENT_IGNITION_ON | EVENT_IGNITION_OFF);
        let velocity = shared.velocity.snapshot();
        let previous = engine.phase();
        let phase = engine.step(events, velocity.vertical);
        if phase != previous {
            log::info!("flight phase {:?} -> {:?}", previous, phase);
        }
        shared.phase.publish(phase);
        sched.yield_now();
    }
}

/// GPS task: each cycle, drain the serial device through the frame pipeline
/// and publish whatever fixes completed.
pub fn position_ingest_task<S: Sched, P: SerialPort>(
    sched: &S,
    mut port: P,
    shared: &FlightShared,
) -> ! {
    let mut ingest = PositionIngest::new();
    loop {
        ingest.pump(&mut port, shared);
        sched.yield_now();
    }
}

/// Block (yielding) until the published phase reaches `target`.
pub fn wait_for_phase<S: Sched>(sched: &S, shared: &FlightShared, target: FlightPhase) {
    while shared.flight_phase() != target {
        sched.yield_now();
    }
}

#[cfg(test)]
mod tests;
