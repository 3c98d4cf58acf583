//! Enemy voices backed by the Kira main audio channel.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_kira_audio::prelude::{
    Audio, AudioControl, AudioInstance, AudioSource, AudioTween, PlaybackState,
};

use super::capabilities::SoundPlayer;
use super::components::{EnemySounds, EnemyVoice, SoundCue};

/// Borrowed view of one enemy's voice for the duration of a brain tick.
pub struct KiraVoice<'a> {
    pub voice: &'a mut EnemyVoice,
    pub sounds: &'a EnemySounds,
    pub audio: &'a Audio,
    pub instances: &'a mut Assets<AudioInstance>,
    pub asset_server: &'a AssetServer,
}

impl KiraVoice<'_> {
    fn failed(&self, clip: &Handle<AudioSource>) -> bool {
        matches!(self.asset_server.load_state(clip.id()), LoadState::Failed(_))
    }
}

impl SoundPlayer for KiraVoice<'_> {
    fn is_playing(&self) -> bool {
        let Some(handle) = self.voice.instance.as_ref() else {
            return false;
        };
        match self.instances.get(handle) {
            Some(instance) => !matches!(instance.state(), PlaybackState::Stopped),
            // Queued until its clip loads, unless the clip never will
            None => !self
                .voice
                .current
                .and_then(|cue| self.sounds.get(cue))
                .is_some_and(|clip| self.failed(clip)),
        }
    }

    fn current_cue(&self) -> Option<SoundCue> {
        self.voice.current
    }

    fn play(&mut self, cue: SoundCue) {
        let Some(clip) = self.sounds.get(cue) else {
            return;
        };
        if self.failed(clip) {
            return;
        }

        if let Some(previous) = self
            .voice
            .instance
            .as_ref()
            .and_then(|handle| self.instances.get_mut(handle))
        {
            previous.stop(AudioTween::default());
        }

        self.voice.instance = Some(self.audio.play(clip.clone()).handle());
        self.voice.current = Some(cue);
    }
}
