use crate::{config::TimelineView, runner::RunnerEvent};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use process_timeline::{SchedulerResult, SchedulingRequest, TimelineResult};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

const TICK_RATE: Duration = Duration::from_millis(200);

const PALETTE: [Color; 6] = [
    Color::LightBlue,
    Color::LightGreen,
    Color::LightMagenta,
    Color::LightYellow,
    Color::LightCyan,
    Color::LightRed,
];

const HELP: &str = "q quit | p policy | +/- quantum | v view | up/down scroll";

/// Everything one frame needs.
pub struct TimelineScreen<'a> {
    pub request: &'a SchedulingRequest,
    pub outcome: &'a SchedulerResult<TimelineResult>,
    pub view: TimelineView,
    pub scroll: usize,
}

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    pub fn new() -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Input handling thread
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = TICK_RATE
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }

                if last_tick.elapsed() >= TICK_RATE {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw(&mut self, screen: &TimelineScreen) -> Result<(), io::Error> {
        let request = screen.request;
        let quantum = match request.quantum {
            Some(quantum) if request.policy.requires_quantum() => quantum.to_string(),
            _ => "-".to_owned(),
        };

        let (headline, headline_color) = match screen.outcome {
            Ok(result) => (
                format!(
                    "{} | Quantum: {} | Average Waiting Time: {} | Average Turnaround Time: {} | Duration: {}",
                    request.policy.title(),
                    quantum,
                    format_average(result.average_waiting_time()),
                    format_average(result.average_turnaround_time()),
                    result.total_duration()
                ),
                Color::LightBlue,
            ),
            Err(err) => (format!("{} | {}", request.policy.title(), err), Color::LightRed),
        };

        let empty = TimelineResult::empty();
        let result = screen.outcome.as_ref().unwrap_or(&empty);
        let pids: Vec<_> = result.process_ids().collect();

        let mut widths = vec![Constraint::Length(6)];
        match screen.view {
            TimelineView::SplitProcess => {
                widths.extend(pids.iter().map(|_| Constraint::Length(5)));
            }
            TimelineView::SingleTimeline => widths.push(Constraint::Length(10)),
        }
        let summary_widths = [Constraint::Length(10); 6];

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(pids.len() as u16 + 3),
                    Constraint::Length(1),
                ])
                .split(f.size());

            let header = Paragraph::new(headline.clone())
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .fg(headline_color),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Scheduling")
                        .border_type(BorderType::Rounded),
                );
            f.render_widget(header, chunks[0]);

            let visible = chunks[1].height.saturating_sub(3) as usize;
            let first = screen.scroll as u64;
            let last = (first + visible as u64).min(result.total_duration());

            let rows = (first..last).map(|tick| {
                let mut cells = vec![Cell::from(tick.to_string())
                    .style(Style::default().add_modifier(Modifier::BOLD))];
                let occupant = result.occupant_at(tick);
                match screen.view {
                    TimelineView::SplitProcess => {
                        cells.extend(pids.iter().enumerate().map(|(position, pid)| {
                            if occupant == Some(*pid) {
                                Cell::from("████").style(Style::default().fg(process_color(position)))
                            } else {
                                Cell::from("")
                            }
                        }));
                    }
                    TimelineView::SingleTimeline => {
                        cells.push(match occupant {
                            Some(pid) => {
                                let position = pids.iter().position(|p| *p == pid).unwrap_or(0);
                                Cell::from(format!("P{}", pid))
                                    .style(Style::default().fg(process_color(position)))
                            }
                            None => Cell::from("idle").style(Style::default().fg(Color::DarkGray)),
                        });
                    }
                }
                Row::new(cells)
            });

            let mut heading = vec![Cell::from("Time")];
            match screen.view {
                TimelineView::SplitProcess => {
                    heading.extend(pids.iter().map(|pid| Cell::from(format!("P{}", pid))))
                }
                TimelineView::SingleTimeline => heading.push(Cell::from("Process")),
            }

            let timeline = Table::new(rows)
                .header(Row::new(heading).style(Style::default().add_modifier(Modifier::BOLD)))
                .widths(&widths)
                .block(
                    Block::default()
                        .title(screen.view.title())
                        .borders(Borders::ALL),
                )
                .column_spacing(1);
            f.render_widget(timeline, chunks[1]);

            let items = result.processes().iter().enumerate().map(|(position, summary)| {
                Row::new(vec![
                    Cell::from(format!("P{}", summary.pid))
                        .style(Style::default().fg(process_color(position)).add_modifier(Modifier::BOLD)),
                    Cell::from(summary.arrival_time.to_string()),
                    Cell::from(summary.service_time.to_string()),
                    Cell::from(summary.completion_time.to_string()),
                    Cell::from(summary.turnaround_time.to_string()),
                    Cell::from(summary.waiting_time.to_string()),
                ])
            });

            let summary = Table::new(items)
                .header(
                    Row::new(vec![
                        "PID",
                        "Arrival",
                        "Service",
                        "Completion",
                        "Turnaround",
                        "Waiting",
                    ])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&summary_widths)
                .block(Block::default().title("Processes").borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);
            f.render_widget(summary, chunks[2]);

            f.render_widget(
                Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
                chunks[3],
            );
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        match self.input_rx.recv() {
            Ok(DisplayEvent::Input(key)) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    if key.code == KeyCode::Char('c') {
                        return RunnerEvent::Quit;
                    }
                    return RunnerEvent::None;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => RunnerEvent::Quit,
                    KeyCode::Char('p') => RunnerEvent::SwitchPolicy,
                    KeyCode::Char('+') | KeyCode::Char('=') => RunnerEvent::IncreaseQuantum,
                    KeyCode::Char('-') => RunnerEvent::DecreaseQuantum,
                    KeyCode::Char('v') => RunnerEvent::ToggleView,
                    KeyCode::Up => RunnerEvent::ScrollUp,
                    KeyCode::Down => RunnerEvent::ScrollDown,
                    _ => RunnerEvent::None,
                }
            }
            Ok(DisplayEvent::Tick) => RunnerEvent::None,
            // The input thread is gone; nothing more can be read
            Err(_) => RunnerEvent::Quit,
        }
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = self.terminal.show_cursor();
    }
}

fn process_color(position: usize) -> Color {
    PALETTE[position % PALETTE.len()]
}

fn format_average(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("{:.2}", value),
        None => "undefined".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(1.0)), "1.00");
        assert_eq!(format_average(Some(5.0 / 3.0)), "1.67");
        assert_eq!(format_average(None), "undefined");
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(process_color(0), process_color(PALETTE.len()));
    }
}
