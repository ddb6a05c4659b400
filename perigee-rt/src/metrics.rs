use portable_atomic::{AtomicU32, Ordering};

/// Scheduler counters, readable from any task between yields.
///
/// Monotonically increasing; take deltas between samples for per-interval
/// rates.
pub struct RuntimeMetrics {
    context_switches: AtomicU32,
    tasks_spawned: AtomicU32,
}

impl RuntimeMetrics {
    pub const fn new() -> Self {
        Self {
            context_switches: AtomicU32::new(0),
            tasks_spawned: AtomicU32::new(0),
        }
    }

    pub(crate) fn record_switch(&self) {
        self.context_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_spawn(&self) {
        self.tasks_spawned.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of context switches performed so far.
    pub fn context_switches(&self) -> u32 {
        self.context_switches.load(Ordering::Relaxed)
    }

    /// Number of tasks created with `spawn` (the boot task is not counted).
    pub fn tasks_spawned(&self) -> u32 {
        self.tasks_spawned.load(Ordering::Relaxed)
    }
}

impl Default for RuntimeMetrics {
    fn default() -> Self {
        Self::new()
    }
}
