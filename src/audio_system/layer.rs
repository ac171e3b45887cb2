//! One independently playable stream inside a sound
use std::sync::Arc;

use super::effects::VolumeEffect;
use super::loader::AudioClip;

/// Playback status of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
}

/// A play cursor over a shared clip, with its own volume, mute and loop flags
#[derive(Debug, Clone)]
pub struct Layer {
    clip: Arc<AudioClip>,
    time: f32,
    volume: VolumeEffect,
    looping: bool,
    status: PlaybackStatus,
}

impl Layer {
    pub fn new(clip: Arc<AudioClip>, initial_volume: f32) -> Self {
        Self {
            clip,
            time: 0.0,
            volume: VolumeEffect::new(initial_volume),
            looping: false,
            status: PlaybackStatus::Stopped,
        }
    }

    pub fn clip(&self) -> &AudioClip {
        &self.clip
    }

    /// Clip length in seconds
    pub fn duration(&self) -> f32 {
        self.clip.duration
    }

    /// Current play cursor in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Start playing from `from` seconds, restarting if already playing
    pub fn start(&mut self, from: f32) {
        if self.is_playing() {
            self.stop();
        }
        self.time = from.clamp(0.0, self.duration());
        self.status = PlaybackStatus::Playing;
    }

    /// Stop and rewind; the loop flag is left untouched
    pub fn stop(&mut self) {
        self.status = PlaybackStatus::Stopped;
        self.time = 0.0;
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Move the play cursor forward by `delta` seconds
    ///
    /// A non-looping layer stops when it runs off the end of its clip; a
    /// looping layer wraps around.
    pub fn advance(&mut self, delta: f32) {
        if !self.is_playing() || delta <= 0.0 {
            return;
        }

        let duration = self.duration();
        self.time += delta;

        if self.time < duration {
            return;
        }

        if self.looping && duration > 0.0 {
            self.time %= duration;
        } else {
            self.stop();
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume.set_level(volume);
    }

    /// Volume actually heard, accounting for mute
    pub fn effective_volume(&self) -> f32 {
        self.volume.effective_level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn mute(&mut self) -> bool {
        self.volume.mute()
    }

    pub fn unmute(&mut self) -> bool {
        self.volume.unmute()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(duration: f32) -> Layer {
        Layer::new(Arc::new(AudioClip::silent(duration)), 0.5)
    }

    #[test]
    fn test_new_layer_is_stopped() {
        let layer = layer(3.0);
        assert_eq!(layer.status(), PlaybackStatus::Stopped);
        assert_eq!(layer.time(), 0.0);
        assert_eq!(layer.volume(), 0.5);
        assert!(!layer.is_looping());
    }

    #[test]
    fn test_one_shot_stops_at_end() {
        let mut layer = layer(2.0);
        layer.start(0.0);
        layer.advance(1.5);
        assert!(layer.is_playing());
        assert!((layer.time() - 1.5).abs() < 1e-6);

        layer.advance(0.6);
        assert!(!layer.is_playing());
        assert_eq!(layer.time(), 0.0);
    }

    #[test]
    fn test_looping_layer_wraps() {
        let mut layer = layer(2.0);
        layer.set_looping(true);
        layer.start(1.5);
        layer.advance(1.0);
        assert!(layer.is_playing());
        assert!((layer.time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_zero_length_loop_does_not_spin() {
        let mut layer = layer(0.0);
        layer.set_looping(true);
        layer.start(0.0);
        layer.advance(0.1);
        assert!(!layer.is_playing());
    }

    #[test]
    fn test_start_clamps_seek_offset() {
        let mut layer = layer(4.0);
        layer.start(10.0);
        assert_eq!(layer.time(), 4.0);
        layer.start(-1.0);
        assert_eq!(layer.time(), 0.0);
    }

    #[test]
    fn test_pause_holds_cursor() {
        let mut layer = layer(4.0);
        layer.start(1.0);
        layer.pause();
        layer.advance(1.0);
        assert_eq!(layer.status(), PlaybackStatus::Paused);
        assert_eq!(layer.time(), 1.0);
    }

    #[test]
    fn test_stop_keeps_loop_flag() {
        let mut layer = layer(4.0);
        layer.set_looping(true);
        layer.start(0.0);
        layer.stop();
        assert!(layer.is_looping());
    }
}
