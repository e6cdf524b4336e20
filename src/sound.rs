use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::saturating_u8;
use crate::session::SoundCue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SoundConfig {
    pub enabled: bool,
    /// 0-100
    #[serde(deserialize_with = "saturating_u8")]
    pub volume: u8,
    pub hit_sound: bool,
    pub miss_sound: bool,
    pub life_lost_sound: bool,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 100,
            hit_sound: true,
            miss_sound: true,
            life_lost_sound: true,
        }
    }
}

impl SoundConfig {
    pub fn clamp(mut self) -> Self {
        self.volume = self.volume.min(100);
        self
    }

    /// Playback gain in 0.0..=1.0, or `None` when the cue is muted
    pub fn gain(&self, cue: SoundCue) -> Option<f32> {
        let wanted = match cue {
            SoundCue::Hit => self.hit_sound,
            SoundCue::Miss => self.miss_sound,
            SoundCue::LifeLost => self.life_lost_sound,
        };
        if !self.enabled || !wanted || self.volume == 0 {
            return None;
        }
        Some(f32::from(self.volume) / 100.0)
    }
}

/// Audio playback collaborator
pub trait SoundSink {
    fn play(&mut self, cue: SoundCue, gain: f32);
}

/// Plays every cue the config allows. Returns how many were played.
pub fn dispatch<S: SoundSink + ?Sized>(
    cues: impl IntoIterator<Item = SoundCue>,
    config: &SoundConfig,
    sink: &mut S,
) -> usize {
    let mut played = 0;
    for cue in cues {
        match config.gain(cue) {
            Some(gain) => {
                sink.play(cue, gain);
                played += 1;
            }
            None => trace!(?cue, "muted"),
        }
    }
    played
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder(Vec<(SoundCue, f32)>);

    impl SoundSink for Recorder {
        fn play(&mut self, cue: SoundCue, gain: f32) {
            self.0.push((cue, gain));
        }
    }

    #[test]
    fn per_cue_toggles() {
        let cfg = SoundConfig {
            miss_sound: false,
            volume: 50,
            ..SoundConfig::default()
        };
        assert_eq!(cfg.gain(SoundCue::Hit), Some(0.5));
        assert_eq!(cfg.gain(SoundCue::Miss), None);
        assert_eq!(cfg.gain(SoundCue::LifeLost), Some(0.5));
    }

    #[test]
    fn master_switch_mutes_everything() {
        let cfg = SoundConfig {
            enabled: false,
            ..SoundConfig::default()
        };
        let mut sink = Recorder::default();
        let played = dispatch([SoundCue::Hit, SoundCue::LifeLost], &cfg, &mut sink);
        assert_eq!(played, 0);
        assert!(sink.0.is_empty());
    }

    #[test]
    fn dispatch_plays_allowed_cues() {
        let mut sink = Recorder::default();
        let played = dispatch(
            [SoundCue::Hit, SoundCue::Miss],
            &SoundConfig::default(),
            &mut sink,
        );
        assert_eq!(played, 2);
        assert_eq!(sink.0, vec![(SoundCue::Hit, 1.0), (SoundCue::Miss, 1.0)]);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SoundConfig = serde_json::from_str(r#"{"volume":30}"#).unwrap();
        assert_eq!(cfg.volume, 30);
        assert!(cfg.enabled);
        assert!(cfg.life_lost_sound);
    }
}
