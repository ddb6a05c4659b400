// gps/decoder.rs
use crate::gps::types::{DecodeError, GpsDiagnostics, PositionFix};

/// Decode one extracted sentence frame into a fix and diagnostics.
///
/// The frame is treated as comma-delimited fields of the one supported
/// sentence shape; the mapping is positional and everything else is carried
/// through untouched: field 1 is the UTC timestamp, 2 the latitude, 4 the
/// longitude, 7 the satellite count and 9 the altitude. The sentence id,
/// hemisphere letters, fix quality, dilution and any trailing fields are
/// skipped. Unparsable or missing numeric fields decode as zero rather than
/// failing the frame, and the two checksum characters after the `*` are not
/// validated.
pub fn decode_sentence(frame: &[u8]) -> Result<(PositionFix, GpsDiagnostics), DecodeError> {
    let Ok(sentence) = core::str::from_utf8(frame) else {
        return Err(DecodeError::InvalidData);
    };

    let mut fix = PositionFix::new();
    let mut diag = GpsDiagnostics::new();
    for (index, field) in sentence.split(',').enumerate() {
        match index {
            1 => fix.timestamp = field.parse::<f64>().unwrap_or(0.0),
            2 => fix.latitude = field.parse::<f64>().unwrap_or(0.0),
            4 => fix.longitude = field.parse::<f64>().unwrap_or(0.0),
            7 => diag.satellites = field.parse::<u8>().unwrap_or(0),
            9 => fix.altitude = field.parse::<f64>().unwrap_or(0.0),
            _ => {}
        }
    }
    Ok((fix, diag))
}

#[cfg(test)]
mod tests;
