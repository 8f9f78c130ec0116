use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unknown {kind} name: {name:?}")]
    UnknownMode { kind: &'static str, name: String },

    #[error("invalid start time {0:?}, expected HH:MM on a 5 minute grid")]
    InvalidStartTime(String),

    #[error("invalid time program: {0}")]
    InvalidTimeProgram(String),

    #[error("quick veto duration of {minutes} minutes exceeds the maximum of {max}")]
    QuickVetoDuration { minutes: u16, max: u16 },

    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
}

impl Error {
    pub(crate) fn unknown_mode(kind: &'static str, name: &str) -> Self {
        Self::UnknownMode {
            kind,
            name: name.to_string(),
        }
    }
}
