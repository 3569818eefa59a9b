use super::{
    error::{SchedulerError, SchedulerResult},
    process::{Process, Tick},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Which dispatch algorithm a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// Shortest remaining time first, re-evaluated every tick
    #[default]
    PreemptiveSjf,
    /// Fixed rotation with a time quantum
    RoundRobin,
}

impl Policy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PreemptiveSjf => "preemptive_sjf",
            Self::RoundRobin => "round_robin",
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::PreemptiveSjf => "Shortest Job First - Preemptive",
            Self::RoundRobin => "Round Robin (Time Quantum Required)",
        }
    }

    pub const fn requires_quantum(&self) -> bool {
        matches!(self, Self::RoundRobin)
    }

    /// Validate `quantum` for this policy. Policies without a quantum ignore it.
    pub fn resolve_quantum(&self, quantum: Option<Tick>) -> SchedulerResult<Option<TimeQuantum>> {
        if !self.requires_quantum() {
            return Ok(None);
        }
        match quantum {
            Some(ticks) => TimeQuantum::new(ticks).map(Some),
            None => Err(SchedulerError::invalid_configuration(format!(
                "{} requires a time quantum",
                self
            ))),
        }
    }

    /// The other policy.
    pub const fn toggled(&self) -> Self {
        match self {
            Self::PreemptiveSjf => Self::RoundRobin,
            Self::RoundRobin => Self::PreemptiveSjf,
        }
    }
}

impl FromStr for Policy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "preemptive_sjf" | "sjf" | "srtf" => Ok(Self::PreemptiveSjf),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(SchedulerError::invalid_configuration(format!(
                "unknown policy '{}' (valid: preemptive_sjf, round_robin)",
                s
            ))),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Policy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Round-Robin time slice, always at least one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TimeQuantum(Tick);

impl TimeQuantum {
    pub fn new(ticks: Tick) -> SchedulerResult<Self> {
        if ticks == 0 {
            return Err(SchedulerError::invalid_configuration(
                "time quantum must be a positive number of ticks",
            ));
        }
        Ok(Self(ticks))
    }

    #[inline]
    pub const fn ticks(&self) -> Tick {
        self.0
    }
}

/// Everything needed for one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchedulingRequest {
    pub processes: Vec<Process>,
    pub policy: Policy,
    /// Only consulted for Round-Robin.
    #[serde(default)]
    pub quantum: Option<Tick>,
}

impl SchedulingRequest {
    pub fn new(policy: Policy) -> Self {
        Self {
            processes: Vec::new(),
            policy,
            quantum: None,
        }
    }

    pub fn round_robin(quantum: Tick) -> Self {
        Self::new(Policy::RoundRobin).with_quantum(quantum)
    }

    pub fn with_quantum(mut self, quantum: Tick) -> Self {
        self.quantum = Some(quantum);
        self
    }

    pub fn with_process(mut self, process: Process) -> Self {
        self.processes.push(process);
        self
    }

    pub fn with_processes(mut self, processes: impl IntoIterator<Item = Process>) -> Self {
        self.processes.extend(processes);
        self
    }
}
