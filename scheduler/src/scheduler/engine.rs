use super::{
    admission::Admissions,
    aggregate::ResultAggregator,
    error::{SchedulerError, SchedulerResult},
    policy::{Policy, SchedulingRequest, TimeQuantum},
    process::{Process, Tick},
    round_robin::RoundRobinScheduler,
    shortest_job::PreemptiveSjfScheduler,
    timeline::TimelineResult,
    Scheduler,
};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Runs a full simulation: validation, reset, dispatch, aggregation.
///
/// The engine holds no state between runs, so the same request always yields
/// the same [`TimelineResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerEngine;

impl SchedulerEngine {
    pub fn new() -> Self {
        Self
    }

    /// Schedule a private copy of the request's processes.
    pub fn run(&self, request: &SchedulingRequest) -> SchedulerResult<TimelineResult> {
        let mut working = request.processes.clone();
        self.run_in_place(&mut working, request.policy, request.quantum)
    }

    /// Schedule caller-owned records, resetting and then mutating their
    /// remaining time and run intervals.
    pub fn run_in_place(
        &self,
        processes: &mut [Process],
        policy: Policy,
        quantum: Option<Tick>,
    ) -> SchedulerResult<TimelineResult> {
        let quantum = resolve_quantum(policy, quantum)?;
        validate(processes)?;

        if processes.is_empty() {
            info!(policy = %policy, "no processes to schedule");
            return Ok(TimelineResult::empty());
        }

        for process in processes.iter_mut() {
            process.reset();
        }
        let order = admission_order(processes);
        let admissions = Admissions::from_order(processes, &order);

        let total_duration = match (policy, quantum) {
            (Policy::PreemptiveSjf, _) => {
                dispatch(PreemptiveSjfScheduler::new(), processes, admissions)
            }
            (Policy::RoundRobin, Some(quantum)) => {
                dispatch(RoundRobinScheduler::new(quantum), processes, admissions)
            }
            (Policy::RoundRobin, None) => {
                return Err(SchedulerError::invalid_configuration(
                    "round_robin requires a time quantum",
                ))
            }
        };

        let result = ResultAggregator::aggregate(processes, total_duration);
        info!(
            policy = %policy,
            processes = processes.len(),
            total_duration,
            average_waiting_time = ?result.average_waiting_time(),
            "run complete"
        );
        Ok(result)
    }
}

fn dispatch<S: Scheduler>(mut scheduler: S, processes: &mut [Process], admissions: Admissions) -> Tick {
    debug!(scheduler = S::NAME, pending = admissions.len(), "dispatching");
    scheduler.schedule(processes, admissions)
}

fn resolve_quantum(policy: Policy, quantum: Option<Tick>) -> SchedulerResult<Option<TimeQuantum>> {
    policy.resolve_quantum(quantum).map_err(|err| {
        warn!(policy = %policy, ?quantum, "rejected configuration");
        err
    })
}

fn validate(processes: &[Process]) -> SchedulerResult<()> {
    let mut seen = HashSet::with_capacity(processes.len());
    let mut total_service: Tick = 0;

    for process in processes {
        if process.service_time() == 0 {
            warn!(pid = process.pid(), "rejected process with zero service time");
            return Err(SchedulerError::invalid_record(
                process.pid(),
                "service time must be positive",
            ));
        }
        if !seen.insert(process.pid()) {
            warn!(pid = process.pid(), "rejected duplicate process id");
            return Err(SchedulerError::invalid_record(
                process.pid(),
                "duplicate process id",
            ));
        }
        total_service = total_service
            .checked_add(process.service_time())
            .ok_or_else(|| out_of_range(process))?;
    }

    // The clock can run to the last arrival plus every tick of service
    if let Some(latest) = processes.iter().max_by_key(|process| process.arrival_time()) {
        latest
            .arrival_time()
            .checked_add(total_service)
            .ok_or_else(|| out_of_range(latest))?;
    }
    Ok(())
}

fn out_of_range(process: &Process) -> SchedulerError {
    warn!(pid = process.pid(), "rejected process outside the simulation range");
    SchedulerError::invalid_record(process.pid(), "times exceed the simulation range")
}

/// Indices of `processes` ordered by arrival time, then service time.
/// Remaining ties keep the caller's order.
pub(crate) fn admission_order(processes: &[Process]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..processes.len()).collect();
    order.sort_by_key(|&index| {
        let process = &processes[index];
        (process.arrival_time(), process.service_time())
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_order_breaks_ties_by_service_time() {
        let processes = vec![
            Process::new(1, 2, 1),
            Process::new(2, 0, 5),
            Process::new(3, 0, 2),
            Process::new(4, 0, 2),
        ];
        assert_eq!(admission_order(&processes), vec![2, 3, 1, 0]);
    }

    #[test]
    fn test_round_robin_requires_quantum() {
        let engine = SchedulerEngine::new();
        let mut processes = vec![Process::immediate(1, 3)];

        for quantum in [None, Some(0)] {
            let err = engine
                .run_in_place(&mut processes, Policy::RoundRobin, quantum)
                .unwrap_err();
            assert!(matches!(err, SchedulerError::InvalidConfiguration(_)));
        }
        // Nothing was simulated
        assert!(processes[0].run_intervals().is_empty());
    }

    #[test]
    fn test_configuration_checked_before_empty_input() {
        let err = SchedulerEngine::new()
            .run_in_place(&mut [], Policy::RoundRobin, None)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_zero_service_time() {
        let request = SchedulingRequest::new(Policy::PreemptiveSjf)
            .with_process(Process::immediate(1, 2))
            .with_process(Process::new(2, 1, 0));
        let err = SchedulerEngine::new().run(&request).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::invalid_record(2, "service time must be positive")
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let request = SchedulingRequest::round_robin(2)
            .with_process(Process::immediate(1, 2))
            .with_process(Process::new(1, 3, 1));
        let err = SchedulerEngine::new().run(&request).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidProcessRecord { id: 1, .. }));
    }

    #[test]
    fn test_rejects_overflowing_times() {
        let request = SchedulingRequest::new(Policy::PreemptiveSjf)
            .with_process(Process::new(1, Tick::MAX, 1));
        assert!(SchedulerEngine::new().run(&request).is_err());
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let result = SchedulerEngine::new()
            .run(&SchedulingRequest::new(Policy::PreemptiveSjf))
            .unwrap();
        assert_eq!(result.total_duration(), 0);
        assert_eq!(result.average_waiting_time(), None);
    }

    #[test]
    fn test_run_in_place_resets_previous_state() {
        let engine = SchedulerEngine::new();
        let mut processes = vec![Process::new(1, 0, 5), Process::new(2, 2, 2)];

        let first = engine
            .run_in_place(&mut processes, Policy::PreemptiveSjf, None)
            .unwrap();
        let second = engine
            .run_in_place(&mut processes, Policy::PreemptiveSjf, None)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(processes[0].run_intervals().len(), 2);
        assert!(processes.iter().all(Process::is_finished));
    }

    #[test]
    fn test_run_leaves_request_untouched() {
        let request = SchedulingRequest::round_robin(1)
            .with_process(Process::immediate(1, 2))
            .with_process(Process::immediate(2, 1));
        let before = request.clone();

        SchedulerEngine::new().run(&request).unwrap();
        assert_eq!(request, before);
    }
}
