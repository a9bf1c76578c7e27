use gtk4::prelude::*;
use gtk4::MediaFile;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::PathBuf;

use crate::game::sound::{SoundCue, SoundError, SoundPlayer};

/// Plays cues from `<sounds_dir>/<cue file>` through GTK's media stack.
pub struct MediaSoundPlayer {
    sounds_dir: PathBuf,
    media: RefCell<HashMap<SoundCue, MediaFile>>,
}

impl MediaSoundPlayer {
    pub fn new(sounds_dir: impl Into<PathBuf>) -> Self {
        Self {
            sounds_dir: sounds_dir.into(),
            media: RefCell::new(HashMap::new()),
        }
    }

    fn media_for(&self, cue: SoundCue) -> Result<MediaFile, SoundError> {
        if let Some(media) = self.media.borrow().get(&cue) {
            return Ok(media.clone());
        }
        let path = self.sounds_dir.join(cue.file_name());
        if !path.is_file() {
            return Err(SoundError::MissingAsset(path));
        }
        let media = MediaFile::for_filename(&path);
        self.media.borrow_mut().insert(cue, media.clone());
        Ok(media)
    }
}

impl SoundPlayer for MediaSoundPlayer {
    fn play(&self, cue: SoundCue) -> Result<(), SoundError> {
        let media = self.media_for(cue)?;
        if let Some(err) = media.error() {
            return Err(SoundError::Playback(err.to_string()));
        }
        media.seek(0);
        media.play();
        Ok(())
    }
}

impl Debug for MediaSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MediaSoundPlayer({})", self.sounds_dir.display())
    }
}
