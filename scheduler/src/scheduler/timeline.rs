use super::{
    error::{SchedulerError, SchedulerResult},
    process::{Pid, RunInterval, Tick},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-process figures derived from a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub pid: Pid,
    pub arrival_time: Tick,
    pub service_time: Tick,
    pub completion_time: Tick,
    pub turnaround_time: Tick,
    pub waiting_time: Tick,
    pub run_intervals: Vec<RunInterval>,
}

/// The outcome of one scheduling run.
///
/// A plain value: nothing in it refers back to the engine or the records it ran on.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimelineResult {
    total_duration: Tick,
    occupancy: BTreeMap<Tick, Pid>,
    waiting_times: BTreeMap<Pid, Tick>,
    average_waiting_time: Option<f64>,
    average_turnaround_time: Option<f64>,
    processes: Vec<ProcessSummary>,
}

impl TimelineResult {
    pub(crate) fn new(
        total_duration: Tick,
        occupancy: BTreeMap<Tick, Pid>,
        processes: Vec<ProcessSummary>,
        average_waiting_time: Option<f64>,
        average_turnaround_time: Option<f64>,
    ) -> Self {
        let waiting_times = processes
            .iter()
            .map(|summary| (summary.pid, summary.waiting_time))
            .collect();
        Self {
            total_duration,
            occupancy,
            waiting_times,
            average_waiting_time,
            average_turnaround_time,
            processes,
        }
    }

    /// Result of scheduling nothing: zero duration and undefined averages.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Clock value when the last process finished.
    pub fn total_duration(&self) -> Tick {
        self.total_duration
    }

    pub fn occupancy(&self) -> &BTreeMap<Tick, Pid> {
        &self.occupancy
    }

    pub fn occupant_at(&self, tick: Tick) -> Option<Pid> {
        self.occupancy.get(&tick).copied()
    }

    pub fn is_idle(&self, tick: Tick) -> bool {
        !self.occupancy.contains_key(&tick)
    }

    pub fn waiting_times(&self) -> &BTreeMap<Pid, Tick> {
        &self.waiting_times
    }

    pub fn waiting_time(&self, pid: Pid) -> Option<Tick> {
        self.waiting_times.get(&pid).copied()
    }

    /// `None` when no processes were scheduled. Do not read that as zero.
    pub fn average_waiting_time(&self) -> Option<f64> {
        self.average_waiting_time
    }

    pub fn try_average_waiting_time(&self) -> SchedulerResult<f64> {
        self.average_waiting_time.ok_or(SchedulerError::EmptyInput)
    }

    pub fn average_turnaround_time(&self) -> Option<f64> {
        self.average_turnaround_time
    }

    /// Summaries in the order the caller supplied the processes.
    pub fn processes(&self) -> &[ProcessSummary] {
        &self.processes
    }

    pub fn process(&self, pid: Pid) -> Option<&ProcessSummary> {
        self.processes.iter().find(|summary| summary.pid == pid)
    }

    pub fn run_intervals(&self, pid: Pid) -> Option<&[RunInterval]> {
        self.process(pid).map(|summary| summary.run_intervals.as_slice())
    }

    pub fn process_ids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.processes.iter().map(|summary| summary.pid)
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}
