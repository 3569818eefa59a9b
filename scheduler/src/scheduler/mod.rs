mod admission;
mod aggregate;
mod engine;
mod error;
mod policy;
mod process;
mod round_robin;
mod shortest_job;
mod timeline;

pub use admission::Admissions;
pub use aggregate::ResultAggregator;
pub use engine::SchedulerEngine;
pub use error::{SchedulerError, SchedulerResult};
pub use policy::{Policy, SchedulingRequest, TimeQuantum};
pub use process::{Pid, Process, RunInterval, Tick};
pub use round_robin::RoundRobinScheduler;
pub use shortest_job::PreemptiveSjfScheduler;
pub use timeline::{ProcessSummary, TimelineResult};

/// A dispatch policy.
///
/// `schedule` receives every process of the run, already reset, plus the table
/// of pending arrivals. It drives the clock one tick at a time until every
/// admitted process has finished, recording run intervals on the records, and
/// returns the final clock value.
pub trait Scheduler {
    const NAME: &'static str;

    fn schedule(&mut self, processes: &mut [Process], admissions: Admissions) -> Tick;
}
