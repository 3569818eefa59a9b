use super::{
    process::{Pid, Process, Tick},
    timeline::{ProcessSummary, TimelineResult},
};
use std::collections::BTreeMap;

/// Reduces finished process records into a [`TimelineResult`].
pub struct ResultAggregator;

impl ResultAggregator {
    /// Ticks spent ready but not running: the gaps between arrival and the
    /// first interval, and between consecutive intervals.
    pub fn waiting_time(process: &Process) -> Tick {
        let mut previous_end = process.arrival_time();
        process
            .run_intervals()
            .iter()
            .map(|interval| {
                let gap = interval.start.saturating_sub(previous_end);
                previous_end = interval.end;
                gap
            })
            .sum()
    }

    /// Mean of `values`, or `None` for an empty set.
    pub fn mean<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = Tick>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0u128, 0u64), |(sum, count), value| {
                (sum + value as u128, count + 1)
            });
        if count == 0 {
            return None;
        }
        Some(sum as f64 / count as f64)
    }

    pub fn occupancy(processes: &[Process]) -> BTreeMap<Tick, Pid> {
        let mut occupancy = BTreeMap::new();
        for process in processes {
            for interval in process.run_intervals() {
                for tick in interval.start..interval.end {
                    let previous = occupancy.insert(tick, process.pid());
                    debug_assert!(previous.is_none(), "tick {} assigned twice", tick);
                }
            }
        }
        occupancy
    }

    pub fn summarize(process: &Process) -> ProcessSummary {
        debug_assert_eq!(
            process.run_intervals().iter().map(|interval| interval.len()).sum::<Tick>(),
            process.executed_time(),
            "run intervals of process {} disagree with executed time",
            process.pid()
        );
        let completion_time = process.completion_time().unwrap_or(process.arrival_time());
        ProcessSummary {
            pid: process.pid(),
            arrival_time: process.arrival_time(),
            service_time: process.service_time(),
            completion_time,
            turnaround_time: completion_time.saturating_sub(process.arrival_time()),
            waiting_time: Self::waiting_time(process),
            run_intervals: process.run_intervals().to_vec(),
        }
    }

    pub fn aggregate(processes: &[Process], total_duration: Tick) -> TimelineResult {
        let summaries: Vec<ProcessSummary> = processes.iter().map(Self::summarize).collect();
        let average_waiting_time = Self::mean(summaries.iter().map(|s| s.waiting_time));
        let average_turnaround_time = Self::mean(summaries.iter().map(|s| s.turnaround_time));

        TimelineResult::new(
            total_duration,
            Self::occupancy(processes),
            summaries,
            average_waiting_time,
            average_turnaround_time,
        )
    }
}
