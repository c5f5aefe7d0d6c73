use std::collections::HashMap;

use engine::AssetProvider;
use tracing::{debug, warn};

use super::config::SoundConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEvent {
    ItemCollected { total: u32 },
    PortalUnlocked,
    HarmfulItemTouched,
    VehicleHit,
    LevelAdvanced { level: usize },
    GameWon,
    Restarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SoundCue {
    Eat,
    Ouch,
    Honk,
}

impl GameEvent {
    pub(crate) fn sound_cue(self) -> Option<SoundCue> {
        match self {
            GameEvent::ItemCollected { .. } => Some(SoundCue::Eat),
            GameEvent::HarmfulItemTouched => Some(SoundCue::Ouch),
            GameEvent::VehicleHit => Some(SoundCue::Honk),
            _ => None,
        }
    }
}

/// Raw sound bytes for each cue, handed to whatever plays audio. Missing sounds are skipped.
#[derive(Debug, Clone, Default)]
pub(crate) struct SoundBank {
    sounds: HashMap<SoundCue, Vec<u8>>,
}

impl SoundBank {
    pub(crate) fn load(config: &SoundConfig, provider: &mut dyn AssetProvider) -> Self {
        let mut sounds = HashMap::new();
        for (cue, path) in [
            (SoundCue::Eat, &config.eat),
            (SoundCue::Ouch, &config.ouch),
            (SoundCue::Honk, &config.honk),
        ] {
            match provider.load_sound(path) {
                Ok(bytes) => {
                    debug!(cue = ?cue, path = %path, bytes = bytes.len(), "sound_loaded");
                    sounds.insert(cue, bytes);
                }
                Err(error) => {
                    warn!(cue = ?cue, path = %path, error = %error, "sound_load_failed_skipping");
                }
            }
        }
        Self { sounds }
    }

    pub(crate) fn get(&self, cue: SoundCue) -> Option<&[u8]> {
        self.sounds.get(&cue).map(Vec::as_slice)
    }
}

/// Where fired sound cues go. Playback lives outside the game; the sink gets the
/// loaded bytes for each cue, or `None` when the sound could not be loaded.
pub(crate) trait AudioSink {
    fn play(&mut self, cue: SoundCue, sound: Option<&[u8]>);
}

/// Records cues in the log instead of playing them.
#[derive(Debug, Default)]
pub(crate) struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: SoundCue, sound: Option<&[u8]>) {
        match sound {
            Some(bytes) => debug!(cue = ?cue, bytes = bytes.len(), "sound_cue"),
            None => debug!(cue = ?cue, "sound_cue_unavailable"),
        }
    }
}
