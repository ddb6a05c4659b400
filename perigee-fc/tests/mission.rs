//! End-to-end mission flow: both perpetual tasks on the real cooperative
//! runtime, a scripted serial device, and the boot task acting as the
//! ignition sensor and velocity producer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use perigee_core::flight::{EVENT_IGNITION_OFF, EVENT_IGNITION_ON};
use perigee_core::{FlightPhase, FlightShared};
use perigee_fc::{SerialPort, flight_phase_task, position_ingest_task};
use perigee_rt::{Runtime, RuntimeConfig};

const GGA: &[u8] =
    b"$GPGGA,172814.0,3723.46587704,N,12202.26957864,W,2,6,1.2,18.893,M,-25.669,M,2.0,0031*4F";

/// One end of an in-memory serial line; the test holds the other end and
/// injects bytes between cycles.
#[derive(Clone)]
struct SerialLine {
    bytes: Rc<RefCell<VecDeque<u8>>>,
}

impl SerialLine {
    fn new() -> Self {
        Self {
            bytes: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    fn inject(&self, data: &[u8]) {
        self.bytes.borrow_mut().extend(data);
    }
}

impl SerialPort for SerialLine {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut bytes = self.bytes.borrow_mut();
        let n = buf.len().min(bytes.len());
        for slot in buf[..n].iter_mut() {
            *slot = bytes.pop_front().unwrap();
        }
        n
    }
}

#[test]
fn mission_flow_through_the_real_runtime() {
    let rt: &'static Runtime = Box::leak(Box::new(Runtime::new(RuntimeConfig::default())));
    let shared: &'static FlightShared = Box::leak(Box::new(FlightShared::new()));
    let line = SerialLine::new();

    let port = line.clone();
    rt.spawn(move || -> ! { position_ingest_task(rt, port, shared) })
        .unwrap();
    rt.spawn(move || -> ! { flight_phase_task(rt, shared) })
        .unwrap();

    // A fix arrives in two pieces behind line noise; nothing is published
    // until the sentence completes.
    line.inject(b"junk\r\n");
    line.inject(&GGA[..30]);
    rt.yield_now();
    assert_eq!(shared.fix.stamp_us(), 0);

    line.inject(&GGA[30..]);
    rt.yield_now();
    let fix = shared.position_fix();
    assert_eq!(fix.timestamp, 172814.0);
    assert_eq!(fix.latitude, 3723.46587704);
    assert_eq!(fix.longitude, 12202.26957864);
    assert_eq!(fix.altitude, 18.893);
    assert_eq!(shared.gps_diagnostics().satellites, 6);

    // Ignition: the boot task plays the sensor.
    rt.raise_event(EVENT_IGNITION_ON);
    shared.velocity_update(120.0, 0.0, 0.0);
    rt.yield_now();
    assert_eq!(shared.flight_phase(), FlightPhase::Burning);

    // Both events in one cycle: cutoff wins, whatever the velocity.
    rt.raise_event(EVENT_IGNITION_ON);
    rt.raise_event(EVENT_IGNITION_OFF);
    rt.yield_now();
    assert_eq!(shared.flight_phase(), FlightPhase::Coasting);

    // Fast coast holds; slowing through the threshold opens the window.
    rt.yield_now();
    assert_eq!(shared.flight_phase(), FlightPhase::Coasting);
    shared.velocity_update(5.0, 0.0, 0.0);
    rt.yield_now();
    assert_eq!(shared.flight_phase(), FlightPhase::ApogeeWindow);

    shared.velocity_update(-12.0, 0.0, 0.0);
    rt.yield_now();
    assert_eq!(shared.flight_phase(), FlightPhase::Descending);

    // Still falling fast: not landed.
    shared.velocity_update(-8.0, 0.0, 0.0);
    rt.yield_now();
    assert_eq!(shared.flight_phase(), FlightPhase::Descending);

    shared.velocity_update(0.3, 0.0, 0.0);
    rt.yield_now();
    assert_eq!(shared.flight_phase(), FlightPhase::Touchdown);

    // The whole flight ran on cooperative switches alone.
    assert!(rt.metrics().context_switches() > 0);
}
