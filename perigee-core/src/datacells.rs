use core::cell::Cell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Instant;
use portable_atomic::{AtomicU64, Ordering};

/// Single-slot snapshot cell for blackboard-style data sharing.
///
/// Writers overwrite the whole value, readers get a copy; no history is
/// kept. Each publish also stamps the monotonic clock so consumers can tell
/// a fresh snapshot from a stale one.
pub struct DataCell<T: Copy> {
    slot: Mutex<CriticalSectionRawMutex, Cell<T>>,
    stamp_us: AtomicU64,
}

impl<T: Copy> DataCell<T> {
    pub const fn new(init: T) -> Self {
        Self {
            slot: Mutex::new(Cell::new(init)),
            stamp_us: AtomicU64::new(0),
        }
    }

    /// Overwrite the snapshot and stamp it with the current time.
    pub fn publish(&self, value: T) {
        self.slot.lock(|cell| cell.set(value));
        self.stamp_us
            .store(Instant::now().as_micros(), Ordering::Relaxed);
    }

    /// Copy out the latest snapshot.
    pub fn snapshot(&self) -> T {
        self.slot.lock(|cell| cell.get())
    }

    /// Microsecond timestamp of the last publish; 0 if never published.
    pub fn stamp_us(&self) -> u64 {
        self.stamp_us.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_the_initial_value() {
        let cell = DataCell::new(7i32);
        assert_eq!(cell.snapshot(), 7);
        assert_eq!(cell.stamp_us(), 0);
    }

    #[test]
    fn publish_overwrites_and_stamps() {
        let cell = DataCell::new(0i32);
        cell.publish(42);
        assert_eq!(cell.snapshot(), 42);
        assert!(cell.stamp_us() > 0);
    }
}
