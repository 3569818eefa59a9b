use process_timeline::{Policy, Process, SchedulingRequest};
use std::{env, fs, io, path::PathBuf, str::FromStr};
use thiserror::Error;

pub const SCENARIO_ENV: &str = "TIMELINE_SCENARIO";
pub const OUTPUT_ENV: &str = "TIMELINE_OUTPUT";
pub const VIEW_ENV: &str = "TIMELINE_VIEW";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read scenario {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse scenario {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value '{value}' for {key}")]
    InvalidSetting { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Tui,
    Json,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tui" => Ok(Self::Tui),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidSetting {
                key: OUTPUT_ENV,
                value: s.to_owned(),
            }),
        }
    }
}

/// How the timeline grid is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineView {
    /// One column per process
    #[default]
    SplitProcess,
    /// One column naming the occupant of each tick
    SingleTimeline,
}

impl TimelineView {
    pub fn title(&self) -> &'static str {
        match self {
            Self::SplitProcess => "Split Processes",
            Self::SingleTimeline => "Single Timeline",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::SplitProcess => Self::SingleTimeline,
            Self::SingleTimeline => Self::SplitProcess,
        }
    }
}

impl FromStr for TimelineView {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "split" | "split_process" => Ok(Self::SplitProcess),
            "single" | "single_timeline" => Ok(Self::SingleTimeline),
            _ => Err(ConfigError::InvalidSetting {
                key: VIEW_ENV,
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub request: SchedulingRequest,
    pub output: OutputMode,
    pub view: TimelineView,
}

impl AppConfig {
    /// Read the scenario path from the first argument or `TIMELINE_SCENARIO`,
    /// and the remaining settings from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let scenario = env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| env::var_os(SCENARIO_ENV).map(PathBuf::from));

        let request = match scenario {
            Some(path) => load_scenario(path)?,
            None => default_scenario(),
        };

        Ok(Self {
            request,
            output: setting(OUTPUT_ENV)?.unwrap_or_default(),
            view: setting(VIEW_ENV)?.unwrap_or_default(),
        })
    }
}

fn setting<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = ConfigError>,
{
    match env::var(key) {
        Ok(value) => value.parse().map(Some),
        Err(_) => Ok(None),
    }
}

pub fn load_scenario(path: PathBuf) -> Result<SchedulingRequest, ConfigError> {
    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    parse_scenario(&contents).map_err(|source| ConfigError::Parse { path, source })
}

pub fn parse_scenario(contents: &str) -> Result<SchedulingRequest, serde_json::Error> {
    serde_json::from_str(contents)
}

/// The demonstration set shown when no scenario is given.
pub fn default_scenario() -> SchedulingRequest {
    SchedulingRequest::new(Policy::PreemptiveSjf)
        .with_quantum(2)
        .with_processes([
            Process::new(1, 0, 7),
            Process::new(2, 2, 4),
            Process::new(3, 4, 1),
            Process::new(4, 5, 4),
            Process::new(5, 12, 3),
        ])
}
