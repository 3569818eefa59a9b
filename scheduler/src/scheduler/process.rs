use serde::{Deserialize, Serialize};

/// Caller-assigned process identifier.
pub type Pid = u32;

/// A discrete unit of simulated time.
pub type Tick = u64;

/// Half-open `[start, end)` range of ticks during which a process held the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunInterval {
    pub start: Tick,
    pub end: Tick,
}

impl RunInterval {
    pub fn new(start: Tick, end: Tick) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> Tick {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, tick: Tick) -> bool {
        self.start <= tick && tick < self.end
    }
}

/// A simulated process.
///
/// `arrival_time` and `service_time` are fixed at construction. The engine owns
/// `remaining_time` and `run_intervals`, and resets both at the start of every run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(rename = "id")]
    pid: Pid,
    arrival_time: Tick,
    service_time: Tick,
    #[serde(skip)]
    remaining_time: Tick,
    #[serde(skip)]
    run_intervals: Vec<RunInterval>,
}

impl Process {
    pub fn new(pid: Pid, arrival_time: Tick, service_time: Tick) -> Self {
        Self {
            pid,
            arrival_time,
            service_time,
            remaining_time: service_time,
            run_intervals: Vec::new(),
        }
    }

    /// A process that is ready at tick 0.
    pub fn immediate(pid: Pid, service_time: Tick) -> Self {
        Process::new(pid, 0, service_time)
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    pub fn service_time(&self) -> Tick {
        self.service_time
    }

    pub fn remaining_time(&self) -> Tick {
        self.remaining_time
    }

    pub fn run_intervals(&self) -> &[RunInterval] {
        &self.run_intervals
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_time == 0
    }

    /// Ticks executed so far in the current run.
    pub fn executed_time(&self) -> Tick {
        self.service_time - self.remaining_time
    }

    /// Tick at which the last run interval ended, once the process has finished.
    pub fn completion_time(&self) -> Option<Tick> {
        if !self.is_finished() {
            return None;
        }
        self.run_intervals.last().map(|interval| interval.end)
    }

    pub(crate) fn reset(&mut self) {
        self.remaining_time = self.service_time;
        self.run_intervals.clear();
    }

    /// Consume one tick of service and return what is left.
    pub(crate) fn execute_tick(&mut self) -> Tick {
        self.remaining_time = self.remaining_time.saturating_sub(1);
        self.remaining_time
    }

    pub(crate) fn record_interval(&mut self, start: Tick, end: Tick) {
        debug_assert!(
            self.run_intervals
                .last()
                .map_or(true, |last| last.end <= start),
            "run intervals must be strictly increasing"
        );
        if end > start {
            self.run_intervals.push(RunInterval::new(start, end));
        }
    }
}
