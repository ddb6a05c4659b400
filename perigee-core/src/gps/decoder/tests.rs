// gps/decoder/tests.rs
#[cfg(test)]
mod tests {
    use crate::gps::decoder::decode_sentence;
    use crate::gps::types::DecodeError;

    #[test]
    fn decodes_the_reference_sentence() {
        let frame =
            b"$GPGGA,172814.0,3723.46587704,N,12202.26957864,W,2,6,1.2,18.893,M,-25.669,M,2.0,0031*4F";
        let (fix, diag) = decode_sentence(frame).unwrap();
        assert_eq!(fix.timestamp, 172814.0);
        assert_eq!(fix.latitude, 3723.46587704);
        assert_eq!(fix.longitude, 12202.26957864);
        assert_eq!(fix.altitude, 18.893);
        assert_eq!(diag.satellites, 6);
    }

    #[test]
    fn missing_and_garbled_fields_decode_as_zero() {
        let (fix, diag) = decode_sentence(b"$GPGGA,,abc,N,,W,1,xx*7A").unwrap();
        assert_eq!(fix.timestamp, 0.0);
        assert_eq!(fix.latitude, 0.0);
        assert_eq!(fix.longitude, 0.0);
        assert_eq!(fix.altitude, 0.0);
        assert_eq!(diag.satellites, 0);
    }

    #[test]
    fn short_sentences_decode_what_is_there() {
        let (fix, diag) = decode_sentence(b"$GPGGA,123456.7,*00").unwrap();
        assert_eq!(fix.timestamp, 123456.7);
        // The checksum run lands in the latitude slot and is not a number.
        assert_eq!(fix.latitude, 0.0);
        assert_eq!(diag.satellites, 0);
    }

    #[test]
    fn checksum_characters_are_carried_through_unvalidated() {
        // Deliberately wrong checksum: the frame still decodes.
        let frame = b"$GPGGA,1.0,2.0,N,3.0,W,1,4,1.0,5.0,M,0.0,M,,*FF";
        let (fix, diag) = decode_sentence(frame).unwrap();
        assert_eq!(fix.timestamp, 1.0);
        assert_eq!(fix.latitude, 2.0);
        assert_eq!(fix.longitude, 3.0);
        assert_eq!(fix.altitude, 5.0);
        assert_eq!(diag.satellites, 4);
    }

    #[test]
    fn non_utf8_frames_are_rejected() {
        assert_eq!(
            decode_sentence(&[b'$', 0xFF, 0xFE, b'*', b'0', b'0']),
            Err(DecodeError::InvalidData)
        );
    }
}
