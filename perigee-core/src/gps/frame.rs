// gps/frame.rs
use heapless::Vec;

/// Start-of-sentence marker on the wire.
pub const START_MARKER: u8 = b'$';

/// End-of-payload marker; two checksum characters follow it.
pub const END_MARKER: u8 = b'*';

/// Checksum characters trailing the end marker.
const CHECKSUM_LEN: usize = 2;

/// Default accumulation capacity in bytes.
pub const FRAME_BUFFER_CAPACITY: usize = 512;

/// Upper bound on one extracted sentence, markers and checksum included.
/// Anything longer is line noise and is discarded.
pub const MAX_FRAME_LEN: usize = 120;

/// Fixed-capacity accumulator slicing an open-ended serial byte stream into
/// delimited sentence frames.
///
/// Bytes go in with [`extend`] (bounded by remaining capacity, the caller
/// re-offers the rest later); complete frames come out with [`take_frame`],
/// which also erases any noise in front of the start marker. Incomplete
/// frames simply stay buffered until more bytes arrive — there is no
/// timeout. A buffer that fills up without ever completing a frame is
/// unwedged by [`reclaim`].
///
/// [`extend`]: FrameBuffer::extend
/// [`take_frame`]: FrameBuffer::take_frame
/// [`reclaim`]: FrameBuffer::reclaim
pub struct FrameBuffer<const N: usize = FRAME_BUFFER_CAPACITY> {
    buf: Vec<u8, N>,
    dropped: u32,
}

impl<const N: usize> FrameBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            dropped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        N - self.buf.len()
    }

    /// Total bytes discarded so far by [`reclaim`](FrameBuffer::reclaim) and
    /// oversized-run handling.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Append as much of `bytes` as fits in the remaining capacity.
    /// Returns how many were accepted; the caller keeps the rest.
    pub fn extend(&mut self, bytes: &[u8]) -> usize {
        let take = bytes.len().min(self.remaining());
        // Cannot fail: bounded by remaining capacity above.
        let _ = self.buf.extend_from_slice(&bytes[..take]);
        take
    }

    /// A frame is present once the buffer holds a start marker with an end
    /// marker somewhere after it. Leading and trailing noise do not matter;
    /// an end marker in front of the first start marker does not count.
    pub fn has_frame(&self) -> bool {
        match self.buf.iter().position(|&b| b == START_MARKER) {
            Some(start) => self.buf[start + 1..].contains(&END_MARKER),
            None => false,
        }
    }

    /// Extract the next complete frame: the run from the start marker
    /// through both checksum characters past the end marker.
    ///
    /// The consumed prefix — leading noise included — is erased by shifting
    /// the tail down, so repeated calls walk through everything buffered.
    /// Returns `None` when no frame has fully arrived; in particular a
    /// sentence whose trailing checksum characters are still in flight is
    /// left untouched until they land. Runs longer than `M` are dropped as
    /// noise and the scan continues.
    pub fn take_frame<const M: usize>(&mut self) -> Option<Vec<u8, M>> {
        loop {
            let start = self.buf.iter().position(|&b| b == START_MARKER)?;
            let star = start
                + 1
                + self.buf[start + 1..]
                    .iter()
                    .position(|&b| b == END_MARKER)?;
            let end = star + CHECKSUM_LEN;
            if end >= self.buf.len() {
                return None;
            }
            let frame = Vec::from_slice(&self.buf[start..=end]);
            self.consume(end + 1);
            match frame {
                Ok(frame) => return Some(frame),
                Err(()) => {
                    self.dropped += (end + 1 - start) as u32;
                    continue;
                }
            }
        }
    }

    /// Overflow guard for a buffer that filled up without a takeable frame:
    /// discard the oldest unterminated prefix. The newest start marker (and
    /// whatever follows it) survives in case its sentence is still in
    /// flight; with no start marker past the front, the whole buffer is the
    /// dead prefix and is cleared.
    ///
    /// Returns the number of bytes discarded.
    pub fn reclaim(&mut self) -> usize {
        let cut = match self.buf.iter().rposition(|&b| b == START_MARKER) {
            Some(pos) if pos > 0 => pos,
            _ => self.buf.len(),
        };
        self.dropped += cut as u32;
        self.consume(cut)
    }

    /// Erase the first `n` bytes, shifting the tail down.
    fn consume(&mut self, n: usize) -> usize {
        let len = self.buf.len();
        let n = n.min(len);
        self.buf.copy_within(n..len, 0);
        self.buf.truncate(len - n);
        n
    }
}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
