use super::{
    config::TimelineView,
    display::{DisplayTerminal, TimelineScreen},
};
use process_timeline::{
    Policy, SchedulerEngine, SchedulerResult, SchedulingRequest, Tick, TimelineResult,
};
use std::io;
use tracing::{debug, warn};

/// Quantum used when switching to Round-Robin without one configured.
const DEFAULT_QUANTUM: Tick = 2;

pub enum RunnerEvent {
    Quit,
    SwitchPolicy,
    IncreaseQuantum,
    DecreaseQuantum,
    ToggleView,
    ScrollUp,
    ScrollDown,
    None,
}

/// Keeps the request the user is editing and the latest result for it.
///
/// Every edit re-runs the engine from scratch.
pub struct TimelineState {
    engine: SchedulerEngine,
    request: SchedulingRequest,
    outcome: SchedulerResult<TimelineResult>,
    view: TimelineView,
    scroll: usize,
}

impl TimelineState {
    pub fn new(request: SchedulingRequest, view: TimelineView) -> Self {
        let engine = SchedulerEngine::new();
        let outcome = engine.run(&request);
        Self {
            engine,
            request,
            outcome,
            view,
            scroll: 0,
        }
    }

    pub fn screen(&self) -> TimelineScreen<'_> {
        TimelineScreen {
            request: &self.request,
            outcome: &self.outcome,
            view: self.view,
            scroll: self.scroll,
        }
    }

    fn rerun(&mut self) {
        self.outcome = self.engine.run(&self.request);
        if let Err(err) = &self.outcome {
            warn!(error = %err, "scheduling failed");
        }
        self.scroll = self.scroll.min(self.last_tick());
    }

    fn last_tick(&self) -> usize {
        match &self.outcome {
            Ok(result) => result.total_duration().saturating_sub(1) as usize,
            Err(_) => 0,
        }
    }

    /// Apply one event. Returns false if the program should quit.
    pub fn handle(&mut self, event: RunnerEvent) -> bool {
        match event {
            RunnerEvent::Quit => return false,
            RunnerEvent::SwitchPolicy => {
                self.request.policy = self.request.policy.toggled();
                if self.request.policy == Policy::RoundRobin && self.request.quantum.is_none() {
                    self.request.quantum = Some(DEFAULT_QUANTUM);
                }
                debug!(policy = %self.request.policy, "policy switched");
                self.rerun();
            }
            RunnerEvent::IncreaseQuantum if self.request.policy.requires_quantum() => {
                let quantum = self.request.quantum.unwrap_or(DEFAULT_QUANTUM);
                self.request.quantum = Some(quantum.saturating_add(1));
                self.rerun();
            }
            RunnerEvent::DecreaseQuantum if self.request.policy.requires_quantum() => {
                let quantum = self.request.quantum.unwrap_or(DEFAULT_QUANTUM);
                self.request.quantum = Some(quantum.saturating_sub(1).max(1));
                self.rerun();
            }
            RunnerEvent::ToggleView => self.view = self.view.toggled(),
            RunnerEvent::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            RunnerEvent::ScrollDown => self.scroll = (self.scroll + 1).min(self.last_tick()),
            _ => {}
        }
        true
    }
}

pub struct TimelineRunner {
    terminal: DisplayTerminal,
    state: TimelineState,
}

impl TimelineRunner {
    pub fn new(request: SchedulingRequest, view: TimelineView) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new()?;

        Ok(Self {
            terminal,
            state: TimelineState::new(request, view),
        })
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        self.terminal.draw(&self.state.screen())?;
        let event = self.terminal.get_input();
        Ok(self.state.handle(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use process_timeline::Process;

    fn state() -> TimelineState {
        let request = SchedulingRequest::new(Policy::PreemptiveSjf)
            .with_process(Process::new(1, 0, 5))
            .with_process(Process::new(2, 2, 2));
        TimelineState::new(request, TimelineView::SplitProcess)
    }

    #[test]
    fn test_switching_policy_supplies_quantum() {
        let mut state = state();
        assert!(state.handle(RunnerEvent::SwitchPolicy));
        assert_eq!(state.request.policy, Policy::RoundRobin);
        assert_eq!(state.request.quantum, Some(DEFAULT_QUANTUM));
        assert!(state.outcome.is_ok());
    }

    #[test]
    fn test_quantum_never_drops_below_one() {
        let mut state = state();
        state.handle(RunnerEvent::SwitchPolicy);
        for _ in 0..5 {
            state.handle(RunnerEvent::DecreaseQuantum);
        }
        assert_eq!(state.request.quantum, Some(1));
        assert!(state.outcome.is_ok());
    }

    #[test]
    fn test_quantum_keys_ignored_for_sjf() {
        let mut state = state();
        state.handle(RunnerEvent::IncreaseQuantum);
        assert_eq!(state.request.quantum, None);
    }

    #[test]
    fn test_switching_back_restores_result() {
        let mut state = state();
        let original = state.outcome.clone();
        state.handle(RunnerEvent::SwitchPolicy);
        state.handle(RunnerEvent::SwitchPolicy);
        assert_eq!(state.outcome, original);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = state();
        state.handle(RunnerEvent::ScrollUp);
        assert_eq!(state.screen().scroll, 0);
        for _ in 0..20 {
            state.handle(RunnerEvent::ScrollDown);
        }
        assert_eq!(state.screen().scroll, 6);
    }

    #[test]
    fn test_quit() {
        assert!(!state().handle(RunnerEvent::Quit));
    }
}
