use super::{
    admission::Admissions,
    process::{Process, Tick},
    Scheduler,
};
use std::{cmp::Reverse, collections::BinaryHeap};
use tracing::{debug, trace};

/// Ready-queue key. Field order gives the ordering: shortest remaining time
/// first, then whichever process entered the queue earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct ReadyEntry {
    remaining: Tick,
    sequence: u64,
    index: usize,
}

/// Preemptive shortest-job-first (shortest remaining time) scheduling.
///
/// A newly admitted process with less remaining work than the running one
/// takes the processor at its arrival tick.
pub struct PreemptiveSjfScheduler {
    ready: BinaryHeap<Reverse<ReadyEntry>>,
    running: Option<usize>,
    segment_start: Tick,
    clock: Tick,
    next_sequence: u64,
}

impl PreemptiveSjfScheduler {
    pub fn new() -> Self {
        Self {
            ready: BinaryHeap::new(),
            running: None,
            segment_start: 0,
            clock: 0,
            next_sequence: 0,
        }
    }

    fn admit(&mut self, processes: &[Process], arrived: Vec<usize>) {
        for index in arrived {
            self.ready.push(Reverse(ReadyEntry {
                remaining: processes[index].remaining_time(),
                sequence: self.next_sequence,
                index,
            }));
            self.next_sequence += 1;
        }
    }

    /// Close the running process's interval and hand the processor to `next`.
    fn switch_to(&mut self, processes: &mut [Process], next: usize) {
        if let Some(previous) = self.running {
            processes[previous].record_interval(self.segment_start, self.clock);
            debug!(
                tick = self.clock,
                preempted = processes[previous].pid(),
                by = processes[next].pid(),
                "preemption"
            );
        }
        self.segment_start = self.clock;
        self.running = Some(next);
    }
}

impl Default for PreemptiveSjfScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for PreemptiveSjfScheduler {
    const NAME: &'static str = "Preemptive SJF Scheduler";

    fn schedule(&mut self, processes: &mut [Process], mut admissions: Admissions) -> Tick {
        *self = Self::new();
        let mut unfinished = admissions.len();

        while unfinished > 0 {
            let arrived = admissions.take(self.clock);
            if arrived.is_empty() && self.ready.is_empty() {
                // Nothing can run before the next arrival
                let next = admissions.next_arrival().unwrap_or(self.clock + 1);
                trace!(from = self.clock, until = next, "idle");
                self.clock = next;
                self.segment_start = self.clock;
                continue;
            }
            self.admit(processes, arrived);

            let Some(Reverse(head)) = self.ready.pop() else {
                break;
            };
            if self.running != Some(head.index) {
                self.switch_to(processes, head.index);
            }

            self.clock += 1;
            let remaining = processes[head.index].execute_tick();

            if remaining == 0 {
                let process = &mut processes[head.index];
                process.record_interval(self.segment_start, self.clock);
                debug!(tick = self.clock, pid = process.pid(), "finished");
                self.running = None;
                unfinished -= 1;
            } else {
                self.ready.push(Reverse(ReadyEntry { remaining, ..head }));
            }
        }

        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::engine::admission_order;

    fn simulate(mut processes: Vec<Process>) -> (Vec<Process>, Tick) {
        let order = admission_order(&processes);
        let admissions = Admissions::from_order(&processes, &order);
        let clock = PreemptiveSjfScheduler::new().schedule(&mut processes, admissions);
        (processes, clock)
    }

    fn intervals(process: &Process) -> Vec<(Tick, Tick)> {
        process
            .run_intervals()
            .iter()
            .map(|interval| (interval.start, interval.end))
            .collect()
    }

    #[test]
    fn test_shorter_arrival_preempts() {
        let (processes, clock) = simulate(vec![Process::new(1, 0, 5), Process::new(2, 2, 2)]);

        assert_eq!(clock, 7);
        assert_eq!(intervals(&processes[0]), vec![(0, 2), (4, 7)]);
        assert_eq!(intervals(&processes[1]), vec![(2, 4)]);
        assert!(processes.iter().all(Process::is_finished));
    }

    #[test]
    fn test_equal_remaining_keeps_admission_order() {
        let (processes, _) = simulate(vec![Process::new(1, 0, 3), Process::new(2, 0, 3)]);
        assert_eq!(intervals(&processes[0]), vec![(0, 3)]);
        assert_eq!(intervals(&processes[1]), vec![(3, 6)]);
    }

    #[test]
    fn test_running_process_wins_tie_against_newcomer() {
        // At tick 1 both have 3 ticks left; the earlier admission keeps running
        let (processes, _) = simulate(vec![Process::new(1, 0, 4), Process::new(2, 1, 3)]);
        assert_eq!(intervals(&processes[0]), vec![(0, 4)]);
        assert_eq!(intervals(&processes[1]), vec![(4, 7)]);
    }

    #[test]
    fn test_same_arrival_shorter_service_first() {
        let (processes, _) = simulate(vec![Process::new(1, 0, 4), Process::new(2, 0, 1)]);
        assert_eq!(intervals(&processes[1]), vec![(0, 1)]);
        assert_eq!(intervals(&processes[0]), vec![(1, 5)]);
    }

    #[test]
    fn test_chained_preemption() {
        let (processes, clock) = simulate(vec![
            Process::new(1, 0, 8),
            Process::new(2, 1, 4),
            Process::new(3, 2, 2),
        ]);

        assert_eq!(clock, 14);
        assert_eq!(intervals(&processes[0]), vec![(0, 1), (7, 14)]);
        assert_eq!(intervals(&processes[1]), vec![(1, 2), (4, 7)]);
        assert_eq!(intervals(&processes[2]), vec![(2, 4)]);
    }

    #[test]
    fn test_idle_gaps_advance_clock() {
        let (processes, clock) = simulate(vec![Process::new(1, 2, 2), Process::new(2, 6, 1)]);
        assert_eq!(clock, 7);
        assert_eq!(intervals(&processes[0]), vec![(2, 4)]);
        assert_eq!(intervals(&processes[1]), vec![(6, 7)]);
    }

    #[test]
    fn test_distant_arrival_skips_idle_stretch() {
        let far = 1_000_000_000_000;
        let (processes, clock) = simulate(vec![Process::new(1, 0, 2), Process::new(2, far, 3)]);

        assert_eq!(clock, far + 3);
        assert_eq!(intervals(&processes[0]), vec![(0, 2)]);
        assert_eq!(intervals(&processes[1]), vec![(far, far + 3)]);
    }
}
