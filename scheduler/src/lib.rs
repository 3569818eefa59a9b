//! Discrete-time CPU scheduling simulation.
//!
//! Given processes (arrival time, service time) and a policy, the
//! [`SchedulerEngine`] computes which process holds the processor on every
//! tick and derives per-process waiting times.
//!
//! ```
//! use process_timeline::{Process, SchedulerEngine, SchedulingRequest, Policy};
//!
//! let request = SchedulingRequest::new(Policy::PreemptiveSjf)
//!     .with_process(Process::new(1, 0, 5))
//!     .with_process(Process::new(2, 2, 2));
//!
//! let result = SchedulerEngine::new().run(&request).unwrap();
//! assert_eq!(result.total_duration(), 7);
//! assert_eq!(result.occupant_at(2), Some(2));
//! assert_eq!(result.average_waiting_time(), Some(1.0));
//! ```

pub mod scheduler;

pub use scheduler::{
    Pid, Policy, Process, ProcessSummary, RunInterval, SchedulerEngine, SchedulerError,
    SchedulerResult, SchedulingRequest, TimeQuantum, TimelineResult, Tick,
};
