//! Notification and status types shared between the engine and backends.

use std::fmt;

/// Identifies which `set_source` call a notification belongs to.
///
/// The engine bumps the generation on every load; backends stamp every
/// notification with the generation of the source it concerns.
pub type Generation = u64;

/// How much of the current resource the element has buffered.
///
/// Ordered, so `state < ReadyState::HaveFutureData` reads naturally.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ReadyState {
    #[default]
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// Power state of the analysis graph's audio context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextState {
    Running,
    /// Typically entered because of autoplay policy before any user gesture.
    Suspended,
    Closed,
}

/// Error codes a media element reports through its `error` notification.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaErrorCode {
    Aborted,
    Network,
    Decode,
    SourceNotSupported,
    Unknown,
}

impl fmt::Display for MediaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Aborted => "aborted",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::SourceNotSupported => "source not supported",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Answer to "can this element decode `mime`?".
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum FormatSupport {
    #[default]
    No,
    Maybe,
    Probably,
}

impl fmt::Display for FormatSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::No => "no",
            Self::Maybe => "maybe",
            Self::Probably => "probably",
        })
    }
}

/// Why the element refused to start playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayFailure {
    /// Autoplay policy: the platform wants a user gesture first.
    NotAllowed,
    /// The decoder rejected the resource format.
    NotSupported,
    /// The play request was interrupted, usually by a new source.
    Aborted,
    Other(String),
}

impl fmt::Display for PlayFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed => f.write_str("not allowed"),
            Self::NotSupported => f.write_str("not supported"),
            Self::Aborted => f.write_str("aborted"),
            Self::Other(detail) => f.write_str(detail),
        }
    }
}

/// Lifecycle events of the media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    LoadStart,
    /// Metadata arrived; `duration` is in seconds and may be non-finite for streams.
    LoadedMetadata { duration: f64 },
    /// Enough data to begin playback.
    CanPlay,
    /// Enough data to play to the end without stalling.
    CanPlayThrough,
    /// Position advanced, in seconds.
    TimeUpdate { position: f64 },
    /// Playback actually started (may follow buffering).
    Playing,
    Paused,
    Ended,
    Waiting,
    Stalled,
    Suspend,
    Error { code: MediaErrorCode, detail: String },
    /// The last `play` command succeeded.
    PlayResolved,
    /// The last `play` command was refused.
    PlayRejected(PlayFailure),
}

/// A [`MediaEvent`] tagged with the source generation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaNotification {
    pub generation: Generation,
    pub event: MediaEvent,
}

impl MediaNotification {
    pub fn new(generation: Generation, event: MediaEvent) -> Self {
        Self { generation, event }
    }
}
