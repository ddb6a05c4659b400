//! Cooperative task runtime for the perigee flight computer.
//!
//! Fixed rotation of forever-running tasks, each with a private stack and a
//! first-class continuation, switched through architecture-specific
//! primitives. No preemption, no priorities: a task keeps the CPU until it
//! yields.

#![no_std]

extern crate alloc;

mod arch;
pub mod events;
pub mod metrics;
pub mod runtime;

pub use events::EventMask;
pub use metrics::RuntimeMetrics;
pub use runtime::{
    DEFAULT_MAX_TASKS, DEFAULT_STACK_SIZE, MIN_STACK_SIZE, Runtime, RuntimeConfig, Sched,
    SpawnError, TaskId, now_micros,
};

// Re-exported so task code has one source for durations.
pub use embassy_time::Duration;
