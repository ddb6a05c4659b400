/// The one thing this system needs from a serial device.
///
/// Implementations are opened however the platform opens devices (by path,
/// by adapter serial number); only the byte stream crosses this seam.
pub trait SerialPort {
    /// Non-blocking read of whatever is available right now, up to
    /// `buf.len()` bytes. Returns how many bytes were written into `buf`;
    /// `0` means "nothing this cycle" and is never an error.
    fn read(&mut self, buf: &mut [u8]) -> usize;
}
