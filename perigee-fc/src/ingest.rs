use perigee_core::FlightShared;
use perigee_core::gps::decoder::decode_sentence;
use perigee_core::gps::frame::{FrameBuffer, MAX_FRAME_LEN};
use perigee_core::gps::types::IngestHealth;

use crate::serial::SerialPort;

/// Bytes pulled from the serial device per read call while draining.
const READ_CHUNK: usize = 64;

/// The serial-to-blackboard pipeline: drains the device, slices the stream
/// into frames, decodes them and publishes the latest fix, diagnostics and
/// health counters. One [`pump`](PositionIngest::pump) call is one scheduler
/// cycle's worth of work.
pub struct PositionIngest {
    frames: FrameBuffer,
    health: IngestHealth,
}

impl PositionIngest {
    pub const fn new() -> Self {
        Self {
            frames: FrameBuffer::new(),
            health: IngestHealth::new(),
        }
    }

    pub fn health(&self) -> IngestHealth {
        self.health
    }

    /// One ingest cycle: drain, extract, decode, publish.
    pub fn pump<P: SerialPort>(&mut self, port: &mut P, shared: &FlightShared) {
        // Drain everything the device has right now, never asking for more
        // than the buffer can take.
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let space = self.frames.remaining();
            if space == 0 {
                break;
            }
            let want = space.min(chunk.len());
            let got = port.read(&mut chunk[..want]);
            if got == 0 {
                break;
            }
            self.frames.extend(&chunk[..got]);
        }

        // Pull out every frame that has fully arrived.
        while let Some(frame) = self.frames.take_frame::<MAX_FRAME_LEN>() {
            match decode_sentence(&frame) {
                Ok((fix, diag)) => {
                    self.health.frames_decoded = self.health.frames_decoded.wrapping_add(1);
                    shared.fix.publish(fix);
                    shared.diagnostics.publish(diag);
                }
                Err(_) => {
                    self.health.decode_errors = self.health.decode_errors.wrapping_add(1);
                }
            }
        }

        // A buffer still full after extraction can never complete a frame:
        // shed the dead prefix so the stream keeps flowing.
        if self.frames.remaining() == 0 {
            let shed = self.frames.reclaim();
            log::warn!("frame buffer overflow, dropped {shed} bytes");
        }

        self.health.bytes_dropped = self.frames.dropped();
        shared.ingest_health.publish(self.health);
    }
}

impl Default for PositionIngest {
    fn default() -> Self {
        Self::new()
    }
}
