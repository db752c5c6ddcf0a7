use rhein_schema::Judgement;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindowsError {
    #[error("timing window bounds must be >= 0 (got {0} ms)")]
    Negative(i32),
    #[error("{tier} window ({bound} ms) is narrower than the previous tier ({previous} ms)")]
    Decreasing {
        tier: Judgement,
        bound: i32,
        previous: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModError {
    #[error("invalid speed multiplier {0}")]
    InvalidSpeed(f64),
    #[error("unknown mod `{0}`")]
    Unknown(String),
    #[error("{0}")]
    Rejected(String),
}

/// Everything that can abort a session before its clock starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("invalid timing windows: {0}")]
    Windows(#[from] WindowsError),
    #[error("mod `{name}` failed: {source}")]
    Mod {
        name: &'static str,
        #[source]
        source: ModError,
    },
    #[error("chart bpm must be a positive number (got {0})")]
    InvalidBpm(f64),
    #[error("note at beat {beat} uses lane {lane} but the ruleset has {keys} keys")]
    LaneOutOfRange { lane: u32, beat: f64, keys: usize },
    #[error("note at beat {beat} has a non-finite or negative timing")]
    InvalidNote { beat: f64 },
    #[error("lane {lane} goes backwards (beat {beat} after {previous})")]
    UnorderedLane { lane: u32, beat: f64, previous: f64 },
    #[error("gamemode is {0:?}, setup needs a freshly created gamemode")]
    WrongPhase(crate::gameplay::Phase),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a session is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("failed to spawn simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
}
