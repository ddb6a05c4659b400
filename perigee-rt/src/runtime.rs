//! Cooperative round-robin task runtime.
//!
//! One logical thread of control. Every task runs until it calls
//! [`Runtime::yield_now`], the sole suspension point; the next task in
//! creation order then resumes, and control comes back to the caller only
//! after a full trip around the rotation. The thread that constructs the
//! [`Runtime`] is itself the first task in the rotation (the boot task), so
//! there is no separate "run" entry point: the boot task simply starts
//! yielding.
//!
//! Because no task is ever re-entered before it yields, tasks may mutate
//! shared state without locks; cross-task visibility is guaranteed at yield
//! boundaries.

use core::cell::UnsafeCell;
use core::marker::PhantomData;

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::arch::{self, SavedContext};
use crate::events::EventMask;
use crate::metrics::RuntimeMetrics;

/// Default ceiling on the number of tasks, boot task included.
pub const DEFAULT_MAX_TASKS: usize = 20;

/// Default private stack size per spawned task.
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024;

/// Smallest stack the fabricated first-resume frame fits in with any room
/// left to actually run.
pub const MIN_STACK_SIZE: usize = 4 * 1024;

/// Stable identifier of a task in the rotation. Tasks are never retired, so
/// an id stays valid for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    /// The boot task: the thread that constructed the runtime.
    pub const BOOT: TaskId = TaskId(0);

    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpawnError {
    /// The configured task ceiling has been reached.
    TaskLimitReached { limit: usize },
    /// The configured stack size is below [`MIN_STACK_SIZE`].
    StackTooSmall { min: usize },
}

impl core::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SpawnError::TaskLimitReached { limit } => {
                write!(f, "task limit of {limit} reached")
            }
            SpawnError::StackTooSmall { min } => {
                write!(f, "task stack below the {min}-byte minimum")
            }
        }
    }
}

impl core::error::Error for SpawnError {}

#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Maximum number of tasks, boot task included.
    pub max_tasks: usize,
    /// Private stack size for each spawned task.
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_tasks: DEFAULT_MAX_TASKS,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// One entry in the task arena.
///
/// The boot task owns no stack allocation (it runs on the thread's own
/// stack); spawned tasks keep theirs alive here for the life of the process.
struct TaskSlot {
    saved: SavedContext,
    _stack: Option<Box<[u8]>>,
}

struct Inner {
    tasks: Vec<TaskSlot>,
    current: usize,
    config: RuntimeConfig,
}

/// The cooperative task runtime.
///
/// # Usage
///
/// The runtime needs a stable address once tasks exist, and spawned closures
/// capture a `&'static` handle back to it:
///
/// ```ignore
/// let rt: &'static Runtime = Box::leak(Box::new(Runtime::new(RuntimeConfig::default())));
/// rt.spawn(move || -> ! { sensor_task(rt, shared) })?;
/// loop {
///     rt.yield_now();
/// }
/// ```
///
/// # `!Send + !Sync` Invariant
///
/// All tasks share one OS thread; suspension happens only inside
/// [`yield_now`](Runtime::yield_now). The `PhantomData<*mut ()>` marker keeps
/// the runtime (and every `&'static` handle to it) pinned to the thread that
/// created it, which is what makes the lock-free interior mutability sound.
pub struct Runtime {
    inner: UnsafeCell<Inner>,
    events: EventMask,
    metrics: RuntimeMetrics,
    _not_send: PhantomData<*mut ()>,
}

impl Runtime {
    /// Create a runtime whose first task is the calling thread.
    pub fn new(config: RuntimeConfig) -> Self {
        let boot = TaskSlot {
            // Overwritten by the first yield before it can ever be resumed.
            saved: SavedContext(core::ptr::null_mut()),
            _stack: None,
        };
        let mut tasks = Vec::with_capacity(config.max_tasks.min(64));
        tasks.push(boot);
        Self {
            inner: UnsafeCell::new(Inner {
                tasks,
                current: 0,
                config,
            }),
            events: EventMask::new(),
            metrics: RuntimeMetrics::new(),
            _not_send: PhantomData,
        }
    }

    /// Create a task that begins executing `entry` the first time the
    /// rotation reaches it.
    ///
    /// Entry functions must loop forever and yield periodically; the
    /// `FnOnce() -> !` bound makes "must never return" a compile-time
    /// guarantee rather than a comment. Exceeding the configured task
    /// ceiling is reported, not written past.
    pub fn spawn<F>(&'static self, entry: F) -> Result<TaskId, SpawnError>
    where
        F: FnOnce() -> ! + 'static,
    {
        // Safety: single-threaded by the !Send invariant, and nothing below
        // yields, so this is the only live borrow of `inner`.
        let inner = unsafe { &mut *self.inner.get() };
        if inner.tasks.len() >= inner.config.max_tasks {
            return Err(SpawnError::TaskLimitReached {
                limit: inner.config.max_tasks,
            });
        }
        if inner.config.stack_size < MIN_STACK_SIZE {
            return Err(SpawnError::StackTooSmall {
                min: MIN_STACK_SIZE,
            });
        }

        let mut stack = vec![0u8; inner.config.stack_size].into_boxed_slice();
        let thunk: Box<dyn FnOnce() -> !> = Box::new(entry);
        let ctx = Box::into_raw(Box::new(thunk)) as *mut ();
        // Safety: the stack is boxed and parked in the slot below, so it
        // stays allocated and unmoved for the life of the process.
        let saved = unsafe { arch::fabricate(&mut stack, launch, ctx) };

        let id = TaskId(inner.tasks.len());
        inner.tasks.push(TaskSlot {
            saved,
            _stack: Some(stack),
        });
        self.metrics.record_spawn();
        log::debug!("task {} spawned", id.0);
        Ok(id)
    }

    /// Suspend the calling task and resume the next one in creation order,
    /// wrapping at the end of the arena. Control returns here only after
    /// every other task has had its turn. With no other tasks this is a
    /// no-op.
    pub fn yield_now(&self) {
        let (from, to) = {
            // Safety: single-threaded; the borrow ends before the switch, so
            // the task we resume can re-borrow without aliasing.
            let inner = unsafe { &mut *self.inner.get() };
            if inner.tasks.len() <= 1 {
                return;
            }
            let current = inner.current;
            let next = (current + 1) % inner.tasks.len();
            inner.current = next;
            (
                &mut inner.tasks[current].saved as *mut SavedContext,
                &inner.tasks[next].saved as *const SavedContext,
            )
        };
        self.metrics.record_switch();
        // Safety: `from` and `to` are distinct live slots in the arena, and
        // everything runs on the thread that owns this runtime.
        unsafe { arch::switch(from, to) };
    }

    /// Yield until at least `duration` has elapsed on the monotonic clock.
    ///
    /// A lower bound, not an upper bound: whatever the other tasks do
    /// between polls stretches the actual wait. Always yields at least once.
    pub fn wait(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            self.yield_now();
            if Instant::now() >= deadline {
                return;
            }
        }
    }

    /// OR bits into the shared event set.
    pub fn raise_event(&self, bits: u32) {
        self.events.raise(bits);
    }

    /// Consume and return the pending bits matching `mask`; unrelated bits
    /// stay pending for other readers.
    pub fn catch_event(&self, mask: u32) -> u32 {
        self.events.catch(mask)
    }

    /// The shared event set itself, for producers that hold the runtime.
    pub fn events(&self) -> &EventMask {
        &self.events
    }

    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    /// Id of the task currently executing.
    pub fn current_task(&self) -> TaskId {
        // Safety: single-threaded read of a plain field.
        TaskId(unsafe { &*self.inner.get() }.current)
    }

    /// Number of tasks in the rotation, boot task included.
    pub fn task_count(&self) -> usize {
        // Safety: single-threaded read of a plain field.
        unsafe { &*self.inner.get() }.tasks.len()
    }
}

/// First-resume entry: reclaims the boxed task closure and runs it.
extern "C" fn launch(ctx: *mut ()) -> ! {
    // Safety: `ctx` came from `Box::into_raw` in `spawn` and each fabricated
    // frame is entered at most once.
    let thunk = unsafe { Box::from_raw(ctx as *mut Box<dyn FnOnce() -> !>) };
    thunk()
}

/// Monotonic microsecond clock shared by every task.
pub fn now_micros() -> u64 {
    Instant::now().as_micros()
}

/// The scheduling surface a task sees.
///
/// Task loops are written against this trait rather than [`Runtime`]
/// directly so they can be driven by a scripted mock in tests.
pub trait Sched {
    /// Voluntarily hand the CPU to the next task.
    fn yield_now(&self);
    /// Yield until at least `duration` has elapsed (lower bound).
    fn wait(&self, duration: Duration);
    /// OR bits into the shared event set.
    fn raise_event(&self, bits: u32);
    /// Consume and return the pending bits matching `mask`.
    fn catch_event(&self, mask: u32) -> u32;
}

impl Sched for Runtime {
    fn yield_now(&self) {
        Runtime::yield_now(self)
    }

    fn wait(&self, duration: Duration) {
        Runtime::wait(self, duration)
    }

    fn raise_event(&self, bits: u32) {
        Runtime::raise_event(self, bits)
    }

    fn catch_event(&self, mask: u32) -> u32 {
        Runtime::catch_event(self, mask)
    }
}
