use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Flip,
    Match,
    Success,
}

impl SoundCue {
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundCue::Flip => "flip.mp3",
            SoundCue::Match => "match.mp3",
            SoundCue::Success => "success.mp3",
        }
    }
}

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("sound asset not found: {}", .0.display())]
    MissingAsset(PathBuf),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Best-effort audio. Callers log and drop failures.
pub trait SoundPlayer {
    fn play(&self, cue: SoundCue) -> Result<(), SoundError>;
}
