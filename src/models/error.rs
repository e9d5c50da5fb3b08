use chrono::{DateTime, Utc};
use serenity::http::HttpError;

/// Discord JSON error code for "Missing Permissions".
pub const DISCORD_MISSING_PERMISSIONS: isize = 50013;
/// Discord JSON error code for "Invalid Form Body".
pub const DISCORD_INVALID_FORM_BODY: isize = 50035;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("no `H:MM am/pm` time found in {0:?}")]
    NoClockTime(String),
    #[error("clock time {hour}:{minute:02} is out of range")]
    InvalidClock { hour: u32, minute: u32 },
    #[error("local time {0} does not exist in the event time zone")]
    NonexistentLocalTime(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("could not find event title in <h1><span>")]
    MissingTitle,
    #[error("could not find a usable datetime attribute on <time>")]
    MissingBaseDate,
    #[error("could not find event time text under <time>")]
    MissingTimeText,
    #[error("unparsable event time: {0}")]
    UnparsableTime(#[from] TimeParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP {status} when fetching page")]
    BadStatus { status: u16 },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("not a Partiful link: {0}")]
    InvalidLink(String),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("event starts at {start_time}, which is not in the future")]
    PastEvent { start_time: DateTime<Utc> },
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("missing permissions")]
    MissingPermissions,
    #[error("invalid form body: {0}")]
    InvalidPayload(String),
    #[error("{0}")]
    Other(String),
}

impl PlatformError {
    pub fn from_code(code: isize, message: &str) -> Option<Self> {
        match code {
            DISCORD_MISSING_PERMISSIONS => Some(PlatformError::MissingPermissions),
            DISCORD_INVALID_FORM_BODY => Some(PlatformError::InvalidPayload(message.to_string())),
            _ => None,
        }
    }
}

impl From<serenity::Error> for PlatformError {
    fn from(err: serenity::Error) -> Self {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = &err {
            if let Some(classified) =
                PlatformError::from_code(response.error.code, &response.error.message)
            {
                return classified;
            }
        }
        PlatformError::Other(err.to_string())
    }
}

/// Everything that can end a `/createevent` invocation early.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("missing `link` option")]
    MissingLink,
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("discord rejected the request: {0}")]
    Platform(#[from] PlatformError),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}
