// src/audio/mod.rs

mod sample_player;
mod source;

pub use sample_player::SamplePlayer;
pub use source::{SampleLocation, SampleSource};

use crate::piano::Volume;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A request to start playing one note
#[derive(Debug, Clone, PartialEq)]
pub struct PlayRequest {
    pub note: String,
    pub volume: Volume,
}

impl PlayRequest {
    pub fn new(note: impl Into<String>, volume: Volume) -> Self {
        PlayRequest {
            note: note.into(),
            volume,
        }
    }
}

/// Something that can start note playback.
///
/// `play` must not block. Whatever goes wrong afterwards is logged and
/// recorded on the returned [`Playback`]; it is never reported to the caller
/// as an error.
pub trait NotePlayer {
    fn play(&self, request: PlayRequest) -> Playback;
}

/// Where a single playback currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    /// Sample is being fetched or decoded
    Pending,
    /// Sample was handed to the output device
    Started,
    /// Playback was abandoned; the message is what got logged
    Failed(String),
}

/// Shared view of an in-flight playback.
///
/// Dropping it does not stop the sound: there is no cancellation.
#[derive(Debug, Clone)]
pub struct Playback {
    state: Arc<Mutex<PlaybackState>>,
}

impl Playback {
    pub fn pending() -> Self {
        Playback {
            state: Arc::new(Mutex::new(PlaybackState::Pending)),
        }
    }

    pub fn started() -> Self {
        let playback = Self::pending();
        playback.mark_started();
        playback
    }

    pub fn state(&self) -> PlaybackState {
        self.state.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.state.lock(), PlaybackState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(*self.state.lock(), PlaybackState::Failed(_))
    }

    pub fn mark_started(&self) {
        *self.state.lock() = PlaybackState::Started;
    }

    /// Log the failure and record it on the handle
    pub fn fail(&self, error: PlaybackError) {
        log::warn!("Error playing audio: {}", error);
        *self.state.lock() = PlaybackState::Failed(error.to_string());
    }
}

/// Everything that can stop a sample from being heard
#[derive(Debug)]
pub enum PlaybackError {
    /// No audio output device could be opened at startup
    NoOutputDevice,
    /// The HTTP client could not be constructed
    Client(reqwest::Error),
    Fetch {
        location: String,
        source: reqwest::Error,
    },
    Status {
        location: String,
        status: u16,
    },
    Io {
        location: String,
        source: std::io::Error,
    },
    Decode {
        note: String,
        source: rodio::decoder::DecoderError,
    },
    Sink(rodio::PlayError),
    Spawn(std::io::Error),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::NoOutputDevice => write!(f, "no audio output device available"),
            PlaybackError::Client(e) => write!(f, "failed to create HTTP client: {}", e),
            PlaybackError::Fetch { location, source } => {
                write!(f, "failed to fetch {}: {}", location, source)
            }
            PlaybackError::Status { location, status } => {
                write!(f, "fetching {} returned HTTP {}", location, status)
            }
            PlaybackError::Io { location, source } => {
                write!(f, "failed to read {}: {}", location, source)
            }
            PlaybackError::Decode { note, source } => {
                write!(f, "failed to decode sample for {}: {}", note, source)
            }
            PlaybackError::Sink(e) => write!(f, "failed to open playback sink: {}", e),
            PlaybackError::Spawn(e) => write!(f, "failed to start playback worker: {}", e),
        }
    }
}

impl std::error::Error for PlaybackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaybackError::Client(e) => Some(e),
            PlaybackError::Fetch { source, .. } => Some(source),
            PlaybackError::Io { source, .. } => Some(source),
            PlaybackError::Decode { source, .. } => Some(source),
            PlaybackError::Sink(e) => Some(e),
            PlaybackError::Spawn(e) => Some(e),
            PlaybackError::NoOutputDevice | PlaybackError::Status { .. } => None,
        }
    }
}

impl From<rodio::PlayError> for PlaybackError {
    fn from(e: rodio::PlayError) -> Self {
        PlaybackError::Sink(e)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_state_transitions() {
        let playback = Playback::pending();
        assert!(playback.is_pending());

        let shared = playback.clone();
        shared.mark_started();
        assert_eq!(playback.state(), PlaybackState::Started);

        shared.fail(PlaybackError::Status {
            location: "https://example.com/C.mp3".to_string(),
            status: 404,
        });
        assert!(playback.is_failed());
        match playback.state() {
            PlaybackState::Failed(msg) => assert!(msg.contains("404")),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = PlaybackError::NoOutputDevice;
        assert_eq!(err.to_string(), "no audio output device available");
        assert!(std::error::Error::source(&err).is_none());
    }
}
