//! Software-in-the-loop bridge: replays a recorded NMEA byte stream and a
//! scripted ignition/velocity profile through the real cooperative runtime,
//! so a whole mission can be flown at a desk.

use std::io::Write;

use embassy_time::{Duration, Instant};
use static_cell::StaticCell;

use perigee_core::flight::{EVENT_IGNITION_OFF, EVENT_IGNITION_ON};
use perigee_core::{FlightPhase, FlightShared};
use perigee_fc::{SerialPort, flight_phase_task, position_ingest_task};
use perigee_rt::{Runtime, RuntimeConfig};

/// Built-in capture used when no file is given on the command line: a short
/// GGA stream with the line noise a real receiver produces on power-up.
const SAMPLE_STREAM: &[u8] = b"\xFF\x00garbage\r\n\
$GPGGA,172813.0,3723.46587000,N,12202.26957000,W,2,5,1.4,2.110,M,-25.669,M,2.0,0031*4E\r\n\
$GPGGA,172814.0,3723.46587704,N,12202.26957864,W,2,6,1.2,18.893,M,-25.669,M,2.0,0031*4F\r\n\
$GPGGA,172815.0,3723.46588113,N,12202.26958012,W,2,6,1.2,141.220,M,-25.669,M,2.0,0031*41\r\n";

/// Bytes handed out per read call; small on purpose, so sentences arrive in
/// pieces and the ingest side's residual carryover is exercised.
const DRIP: usize = 17;

/// Serial device replaying a captured byte stream.
struct ReplaySerial {
    stream: Vec<u8>,
    cursor: usize,
}

impl ReplaySerial {
    fn new(stream: Vec<u8>) -> Self {
        Self { stream, cursor: 0 }
    }

    /// Open a capture file by path.
    fn open(path: &str) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read(path)?))
    }
}

impl SerialPort for ReplaySerial {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        let left = self.stream.len() - self.cursor;
        let n = buf.len().min(left).min(DRIP);
        buf[..n].copy_from_slice(&self.stream[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }
}

/// Scripted flight: light the motor, accelerate, cut off, coast through
/// apogee, fall, land. Plays the roles of the ignition sensor and the
/// external velocity producer.
fn flight_profile_task(rt: &'static Runtime, shared: &'static FlightShared) -> ! {
    rt.wait(Duration::from_millis(10));
    rt.raise_event(EVENT_IGNITION_ON);
    for vertical in [25.0, 70.0, 120.0] {
        shared.velocity_update(vertical, 0.0, 0.0);
        rt.wait(Duration::from_millis(5));
    }

    rt.raise_event(EVENT_IGNITION_OFF);
    for vertical in [90.0, 40.0, 9.0, -12.0, -30.0, -6.0, -0.2] {
        shared.velocity_update(vertical, 0.0, 0.0);
        rt.wait(Duration::from_millis(5));
    }

    loop {
        rt.wait(Duration::from_secs(1));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let port = match std::env::args().nth(1) {
        Some(path) => {
            println!("Replaying {path}");
            ReplaySerial::open(&path)?
        }
        None => {
            println!("No capture given, replaying the built-in sample stream");
            ReplaySerial::new(SAMPLE_STREAM.to_vec())
        }
    };

    // The runtime is pinned to this thread (!Send), so it cannot live in a
    // true static; the blackboard can.
    static SHARED: StaticCell<FlightShared> = StaticCell::new();
    let shared: &'static FlightShared = SHARED.init(FlightShared::new());
    let rt: &'static Runtime = Box::leak(Box::new(Runtime::new(RuntimeConfig::default())));

    rt.spawn(move || -> ! { position_ingest_task(rt, port, shared) })?;
    rt.spawn(move || -> ! { flight_phase_task(rt, shared) })?;
    rt.spawn(move || -> ! { flight_profile_task(rt, shared) })?;

    let start = Instant::now();
    let mut last_phase = shared.flight_phase();
    let mut last_status = Instant::now();
    while shared.flight_phase() != FlightPhase::Touchdown {
        rt.yield_now();

        let phase = shared.flight_phase();
        if phase != last_phase {
            println!("\nPHASE CHANGE: {last_phase:?} -> {phase:?}");
            last_phase = phase;
        }

        if Instant::now() - last_status >= Duration::from_millis(10) {
            last_status = Instant::now();
            let fix = shared.position_fix();
            let velocity = shared.velocity.snapshot();
            print!(
                "\rAlt: {:.1}m | V-Speed: {:.1}m/s | Sats: {} | Phase: {:?}   ",
                fix.altitude,
                velocity.vertical,
                shared.gps_diagnostics().satellites,
                phase
            );
            std::io::stdout().flush()?;
        }

        if Instant::now() - start > Duration::from_secs(10) {
            return Err("flight profile never reached touchdown".into());
        }
    }

    let fix = shared.position_fix();
    let health = shared.ingest_health.snapshot();
    println!("\nTouchdown after {}ms", (Instant::now() - start).as_millis());
    println!(
        "Last fix: t={} lat={} lon={} alt={}m ({} frames decoded, {} decode errors, {} bytes dropped)",
        fix.timestamp,
        fix.latitude,
        fix.longitude,
        fix.altitude,
        health.frames_decoded,
        health.decode_errors,
        health.bytes_dropped
    );
    println!(
        "Scheduler: {} context switches across {} tasks",
        rt.metrics().context_switches(),
        rt.task_count()
    );
    Ok(())
}
