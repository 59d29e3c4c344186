//! Error types reported by the engine.
//!
//! Every failure is caught at the boundary of the operation that caused it
//! and handed back as a [`PlayerError`]. [`PlayerError::kind`] gives the
//! coarse classification hosts use to pick a message.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::media::{GraphError, MediaErrorCode, PlayFailure};

/// Coarse failure classes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The resource never signalled readiness in time. Retry `load`.
    LoadTimeout,
    /// Bad locator, network failure or decode failure while loading.
    LoadError,
    /// Autoplay policy refused playback. Needs a user gesture.
    PlaybackBlocked,
    /// The platform decoder rejected the format. Pick another track.
    UnsupportedFormat,
    /// An in-flight request was interrupted. Transient, retry.
    PlaybackAborted,
    Unclassified,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::LoadTimeout => "load timeout",
            Self::LoadError => "load error",
            Self::PlaybackBlocked => "playback blocked",
            Self::UnsupportedFormat => "unsupported format",
            Self::PlaybackAborted => "playback aborted",
            Self::Unclassified => "playback error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    #[error("audio load timed out after {}ms", .timeout.as_millis())]
    LoadTimeout { timeout: Duration },

    #[error("failed to load audio ({code}): {detail}")]
    Load { code: MediaErrorCode, detail: String },

    #[error("playback blocked: {detail}")]
    Blocked { detail: String },

    #[error("unsupported audio format: {detail}")]
    UnsupportedFormat { detail: String },

    #[error("playback aborted: {reason}")]
    Aborted { reason: String },

    #[error("no track loaded")]
    NoTrackLoaded,

    #[error("analysis graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("playback error: {detail}")]
    Other { detail: String },
}

pub type PlayerResult<T> = Result<T, PlayerError>;

impl PlayerError {
    pub(crate) fn aborted(reason: impl Into<String>) -> Self {
        Self::Aborted {
            reason: reason.into(),
        }
    }

    /// Classify an `error` notification from the media element.
    ///
    /// `loading` is true while a readiness wait is pending; an unknown code
    /// seen then is treated as a load failure.
    pub fn from_media_error(code: MediaErrorCode, detail: impl Into<String>, loading: bool) -> Self {
        let detail = detail.into();
        match code {
            MediaErrorCode::Aborted => Self::Aborted { reason: detail },
            MediaErrorCode::Network | MediaErrorCode::Decode => Self::Load { code, detail },
            MediaErrorCode::SourceNotSupported => Self::UnsupportedFormat { detail },
            MediaErrorCode::Unknown if loading => Self::Load { code, detail },
            MediaErrorCode::Unknown => Self::Other { detail },
        }
    }

    /// Classify a refused `play` (or context `resume`).
    pub fn from_play_failure(failure: PlayFailure) -> Self {
        match failure {
            PlayFailure::NotAllowed => Self::Blocked {
                detail: "autoplay is blocked until the user interacts with the page".to_string(),
            },
            PlayFailure::NotSupported => Self::UnsupportedFormat {
                detail: "the decoder rejected the resource".to_string(),
            },
            PlayFailure::Aborted => Self::aborted("play request was interrupted"),
            PlayFailure::Other(detail) => Self::Other { detail },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LoadTimeout { .. } => ErrorKind::LoadTimeout,
            Self::Load { .. } => ErrorKind::LoadError,
            Self::Blocked { .. } => ErrorKind::PlaybackBlocked,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Aborted { .. } => ErrorKind::PlaybackAborted,
            Self::NoTrackLoaded | Self::Graph(_) | Self::Other { .. } => ErrorKind::Unclassified,
        }
    }

    /// Message suitable for showing to the listener.
    pub fn user_message(&self) -> String {
        match self {
            Self::LoadTimeout { .. } => {
                "The track took too long to load. Check your connection and try again.".to_string()
            }
            Self::Load { .. } => format!(
                "Failed to load audio: {self}. This might be due to CORS restrictions or an unsupported format."
            ),
            Self::Blocked { .. } => {
                "Please click the play button to start playback. Autoplay is blocked until you interact with the page."
                    .to_string()
            }
            Self::UnsupportedFormat { .. } => {
                "This audio format is not supported. Please try a different track.".to_string()
            }
            Self::Aborted { .. } => "Playback was interrupted. Please try again.".to_string(),
            Self::NoTrackLoaded => "Pick a track to play first.".to_string(),
            Self::Graph(_) | Self::Other { .. } => format!("Playback error: {self}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_error_codes_classify_by_cause() {
        let k = |code, loading| PlayerError::from_media_error(code, "x", loading).kind();
        assert_eq!(k(MediaErrorCode::Network, false), ErrorKind::LoadError);
        assert_eq!(k(MediaErrorCode::Decode, true), ErrorKind::LoadError);
        assert_eq!(k(MediaErrorCode::SourceNotSupported, true), ErrorKind::UnsupportedFormat);
        assert_eq!(k(MediaErrorCode::Aborted, false), ErrorKind::PlaybackAborted);
        assert_eq!(k(MediaErrorCode::Unknown, true), ErrorKind::LoadError);
        assert_eq!(k(MediaErrorCode::Unknown, false), ErrorKind::Unclassified);
    }

    #[test]
    fn play_failures_classify_for_messaging() {
        let blocked = PlayerError::from_play_failure(PlayFailure::NotAllowed);
        assert_eq!(blocked.kind(), ErrorKind::PlaybackBlocked);
        assert!(blocked.user_message().contains("interact"));

        let unsupported = PlayerError::from_play_failure(PlayFailure::NotSupported);
        assert_eq!(unsupported.kind(), ErrorKind::UnsupportedFormat);
        assert!(unsupported.user_message().contains("different track"));

        assert_eq!(
            PlayerError::from_play_failure(PlayFailure::Aborted).kind(),
            ErrorKind::PlaybackAborted
        );

        let other = PlayerError::from_play_failure(PlayFailure::Other("device lost".into()));
        assert_eq!(other.kind(), ErrorKind::Unclassified);
        assert!(other.user_message().contains("device lost"));
    }

    #[test]
    fn timeout_message_names_the_bound() {
        let e = PlayerError::LoadTimeout {
            timeout: Duration::from_secs(10),
        };
        assert_eq!(e.to_string(), "audio load timed out after 10000ms");
        assert_eq!(e.kind().to_string(), "load timeout");
    }
}
