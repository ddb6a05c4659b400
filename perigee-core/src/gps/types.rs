// gps/types.rs
/// Latest decoded position snapshot. Coordinate fields carry the raw
/// sentence values (ddmm.mmm form, hemisphere unapplied); downstream
/// consumers that need signed degrees convert at the edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionFix {
    /// UTC time of fix, hhmmss.s as transmitted.
    pub timestamp: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Antenna altitude, metres.
    pub altitude: f64,
}

impl PositionFix {
    pub const fn new() -> Self {
        Self {
            timestamp: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpsDiagnostics {
    /// Satellites used in the fix.
    pub satellites: u8,
    /// Estimated horizontal accuracy, metres. Carried for downstream
    /// consumers; the current sentence decode does not populate it.
    pub horizontal_accuracy: f32,
}

impl GpsDiagnostics {
    pub const fn new() -> Self {
        Self {
            satellites: 0,
            horizontal_accuracy: 0.0,
        }
    }
}

/// Ingest-side health counters, published next to the fix snapshot.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestHealth {
    pub frames_decoded: u32,
    pub decode_errors: u16,
    /// Bytes discarded by the overflow guard and oversized-run handling.
    pub bytes_dropped: u32,
}

impl IngestHealth {
    pub const fn new() -> Self {
        Self {
            frames_decoded: 0,
            decode_errors: 0,
            bytes_dropped: 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The frame is not valid UTF-8 and cannot be field-split.
    InvalidData,
}
