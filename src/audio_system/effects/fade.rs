//! Per-tick volume fading
//!
//! A sound holds one `FadeEffect` shared by all of its layers. Each tick the
//! effect moves every layer's volume linearly toward the fade target; the
//! first layer found at or past the target ends the fade for the whole sound
//! and snaps every layer onto the target.

use serde::{Deserialize, Serialize};

use crate::audio_system::layer::Layer;

/// Current fade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeMode {
    #[default]
    None,
    FadeIn,
    FadeOut,
}

/// How a fade's per-second step is derived from its duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeRamp {
    /// `delta / (duration + 1)`: fades take longer than requested
    #[default]
    Padded,

    /// `delta / duration`: fades complete on schedule
    Exact,
}

impl FadeRamp {
    /// Fraction of the full swing covered by one tick
    fn fraction(&self, delta: f32, duration: f32) -> f32 {
        match self {
            FadeRamp::Padded => delta / (duration + 1.0),
            FadeRamp::Exact if duration > 0.0 => delta / duration,
            FadeRamp::Exact => 1.0,
        }
    }
}

/// Which start volume a layer's step is scaled by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeReference {
    /// Layer 0's volume when the fade began, used for every layer
    #[default]
    SharedFirstLayer,

    /// Each layer's own volume when the fade began
    PerLayer,
}

/// What a completed fade did, reported by `step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeOutcome {
    FadedIn { volume: f32 },
    FadedOut { volume: f32, stopped: bool },
}

/// Fade state of one sound
#[derive(Debug, Clone)]
pub struct FadeEffect {
    mode: FadeMode,
    enabled: bool,
    stop_on_complete: bool,

    /// Requested duration in seconds
    duration: f32,

    /// Fade-in target
    target_volume: f32,

    /// Fade-out floor
    min_volume: f32,

    /// Layer volumes captured when the fade began
    start_volumes: Vec<f32>,

    ramp: FadeRamp,
    reference: FadeReference,
}

impl FadeEffect {
    pub fn new(target_volume: f32, ramp: FadeRamp, reference: FadeReference) -> Self {
        Self {
            mode: FadeMode::None,
            enabled: true,
            stop_on_complete: false,
            duration: 0.0,
            target_volume,
            min_volume: 0.0,
            start_volumes: Vec::new(),
            ramp,
            reference,
        }
    }

    pub fn mode(&self) -> FadeMode {
        self.mode
    }

    pub fn is_fading(&self) -> bool {
        self.mode != FadeMode::None
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn stop_on_complete(&self) -> bool {
        self.stop_on_complete
    }

    pub fn target_volume(&self) -> f32 {
        self.target_volume
    }

    /// Change the fade-in target without starting a fade
    pub fn set_target_volume(&mut self, volume: f32) {
        self.target_volume = volume.clamp(0.0, 1.0);
    }

    pub fn min_volume(&self) -> f32 {
        self.min_volume
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Begin fading in toward `target`, cancelling any fade-out.
    /// Returns false when fading is disabled.
    pub fn begin_fade_in(&mut self, layers: &[Layer], duration: f32, target: f32) -> bool {
        if !self.enabled {
            return false;
        }

        // Layer volumes are capped at 1.0
        self.duration = duration.max(0.0);
        self.target_volume = target.clamp(0.0, 1.0);
        self.capture_start(layers);
        self.mode = FadeMode::FadeIn;
        true
    }

    /// Begin fading out toward `min_volume`, cancelling any fade-in.
    /// Returns false when fading is disabled.
    pub fn begin_fade_out(
        &mut self,
        layers: &[Layer],
        duration: f32,
        min_volume: f32,
        stop_on_complete: bool,
    ) -> bool {
        if stop_on_complete {
            self.stop_on_complete = true;
        }

        if !self.enabled {
            return false;
        }

        self.duration = duration.max(0.0);
        self.min_volume = min_volume.max(0.0);
        self.capture_start(layers);
        self.mode = FadeMode::FadeOut;
        true
    }

    fn capture_start(&mut self, layers: &[Layer]) {
        self.start_volumes.clear();
        self.start_volumes.extend(layers.iter().map(Layer::volume));
    }

    fn reference_volume(&self, layer: usize) -> f32 {
        let index = match self.reference {
            FadeReference::SharedFirstLayer => 0,
            FadeReference::PerLayer => layer,
        };
        self.start_volumes.get(index).copied().unwrap_or(0.0)
    }

    /// Advance the fade by one tick of `delta` seconds
    ///
    /// A zero-length tick moves nothing and never completes a fade.
    pub fn step(&mut self, layers: &mut [Layer], delta: f32) -> Option<FadeOutcome> {
        if delta <= 0.0 {
            return None;
        }

        match self.mode {
            FadeMode::None => None,
            FadeMode::FadeIn => self.step_in(layers, delta),
            FadeMode::FadeOut => self.step_out(layers, delta),
        }
    }

    fn step_in(&mut self, layers: &mut [Layer], delta: f32) -> Option<FadeOutcome> {
        let target = self.target_volume;
        let fraction = self.ramp.fraction(delta, self.duration);

        for i in 0..layers.len() {
            let volume = layers[i].volume();
            let increment = fraction * (target - self.reference_volume(i));

            if volume < target && increment > 0.0 {
                layers[i].set_volume((volume + increment).min(target));
            } else {
                self.mode = FadeMode::None;
                for layer in layers.iter_mut() {
                    layer.set_volume(target);
                }
                return Some(FadeOutcome::FadedIn { volume: target });
            }
        }

        None
    }

    fn step_out(&mut self, layers: &mut [Layer], delta: f32) -> Option<FadeOutcome> {
        let floor = self.min_volume;
        let fraction = self.ramp.fraction(delta, self.duration);

        for i in 0..layers.len() {
            let volume = layers[i].volume();
            let decrement = fraction * (self.reference_volume(i) - floor);

            if volume > floor && decrement > 0.0 {
                layers[i].set_volume((volume - decrement).max(floor));
            } else {
                self.mode = FadeMode::None;
                let stopped = std::mem::replace(&mut self.stop_on_complete, false);
                for layer in layers.iter_mut() {
                    layer.set_volume(floor);
                    if stopped {
                        layer.stop();
                        layer.set_looping(false);
                    }
                }
                return Some(FadeOutcome::FadedOut {
                    volume: floor,
                    stopped,
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::loader::AudioClip;
    use std::sync::Arc;

    fn layers(volumes: &[f32]) -> Vec<Layer> {
        let clip = Arc::new(AudioClip::silent(60.0));
        volumes
            .iter()
            .map(|v| {
                let mut layer = Layer::new(Arc::clone(&clip), *v);
                layer.start(0.0);
                layer
            })
            .collect()
    }

    fn run(
        fade: &mut FadeEffect,
        layers: &mut [Layer],
        delta: f32,
        ticks: usize,
    ) -> Vec<FadeOutcome> {
        (0..ticks).filter_map(|_| fade.step(layers, delta)).collect()
    }

    #[test]
    fn test_padded_fade_in_takes_duration_plus_one() {
        let mut layers = layers(&[0.0]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        assert!(fade.begin_fade_in(&layers, 4.0, 0.5));

        // 0.5 / 5 per second: four ticks reach 0.4, the fifth reaches 0.5
        let outcomes = run(&mut fade, &mut layers, 1.0, 4);
        assert!(outcomes.is_empty());
        assert!((layers[0].volume() - 0.4).abs() < 1e-5);

        // Reaching the target and noticing it takes separate ticks
        let outcomes = run(&mut fade, &mut layers, 1.0, 3);
        assert_eq!(outcomes, vec![FadeOutcome::FadedIn { volume: 0.5 }]);
        assert_eq!(layers[0].volume(), 0.5);
        assert_eq!(fade.mode(), FadeMode::None);
    }

    #[test]
    fn test_zero_delta_leaves_fade_running() {
        let mut layers = layers(&[0.6]);
        layers[0].set_looping(true);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.begin_fade_out(&layers, 4.0, 0.0, true);

        assert_eq!(fade.step(&mut layers, 0.0), None);
        assert_eq!(fade.mode(), FadeMode::FadeOut);
        assert_eq!(layers[0].volume(), 0.6);
        assert!(layers[0].is_playing());
        assert!(layers[0].is_looping());

        fade.begin_fade_in(&layers, 2.0, 1.0);
        assert_eq!(fade.step(&mut layers, 0.0), None);
        assert_eq!(fade.mode(), FadeMode::FadeIn);
        assert_eq!(layers[0].volume(), 0.6);
    }

    #[test]
    fn test_target_above_full_volume_is_clamped() {
        let mut layers = layers(&[0.0]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Exact, FadeReference::SharedFirstLayer);
        fade.begin_fade_in(&layers, 1.0, 1.5);
        assert_eq!(fade.target_volume(), 1.0);

        let outcomes = run(&mut fade, &mut layers, 0.1, 20);
        assert_eq!(outcomes, vec![FadeOutcome::FadedIn { volume: 1.0 }]);
        assert_eq!(fade.mode(), FadeMode::None);
        assert_eq!(layers[0].volume(), 1.0);
    }

    #[test]
    fn test_exact_fade_in_respects_duration() {
        let mut layers = layers(&[0.0]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Exact, FadeReference::SharedFirstLayer);
        fade.begin_fade_in(&layers, 4.0, 0.8);

        let _ = run(&mut fade, &mut layers, 1.0, 4);
        assert!((layers[0].volume() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_exact_zero_duration_jumps() {
        let mut layers = layers(&[0.2]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Exact, FadeReference::SharedFirstLayer);
        fade.begin_fade_out(&layers, 0.0, 0.0, false);

        let _ = run(&mut fade, &mut layers, 0.016, 2);
        assert_eq!(layers[0].volume(), 0.0);
        assert!(!fade.is_fading());
    }

    #[test]
    fn test_fade_never_passes_target() {
        let mut layers = layers(&[0.0]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.begin_fade_in(&layers, 0.5, 0.3);

        for _ in 0..20 {
            fade.step(&mut layers, 0.7);
            assert!(layers[0].volume() <= 0.3);
        }
        assert_eq!(layers[0].volume(), 0.3);
    }

    #[test]
    fn test_fade_out_to_stop_stops_and_clears_loop() {
        let mut layers = layers(&[0.6, 0.6]);
        for layer in layers.iter_mut() {
            layer.set_looping(true);
        }
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.begin_fade_out(&layers, 2.0, 0.0, true);
        assert!(fade.stop_on_complete());

        let outcomes = run(&mut fade, &mut layers, 0.5, 40);
        assert_eq!(
            outcomes,
            vec![FadeOutcome::FadedOut {
                volume: 0.0,
                stopped: true
            }]
        );
        for layer in &layers {
            assert!(!layer.is_playing());
            assert!(!layer.is_looping());
            assert_eq!(layer.volume(), 0.0);
        }
        assert!(!fade.stop_on_complete());
    }

    #[test]
    fn test_fade_out_to_floor_keeps_playing() {
        let mut layers = layers(&[0.8]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.begin_fade_out(&layers, 4.0, 0.15, false);

        let _ = run(&mut fade, &mut layers, 0.25, 100);
        assert_eq!(layers[0].volume(), 0.15);
        assert!(layers[0].is_playing());
    }

    #[test]
    fn test_negative_floor_is_zero() {
        let layers = layers(&[0.8]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.begin_fade_out(&layers, 1.0, -0.5, false);
        assert_eq!(fade.min_volume(), 0.0);
    }

    #[test]
    fn test_opposing_fade_cancels() {
        let layers = layers(&[0.5]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.begin_fade_out(&layers, 3.0, 0.0, false);
        assert_eq!(fade.mode(), FadeMode::FadeOut);
        fade.begin_fade_in(&layers, 3.0, 1.0);
        assert_eq!(fade.mode(), FadeMode::FadeIn);
    }

    #[test]
    fn test_disabled_fade_does_not_start() {
        let layers = layers(&[0.5]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.set_enabled(false);
        assert!(!fade.begin_fade_in(&layers, 3.0, 1.0));
        assert_eq!(fade.mode(), FadeMode::None);
    }

    #[test]
    fn test_shared_and_per_layer_references_differ() {
        // Layer 0 starts at 0.0 and layer 1 at 0.4, both fading to 0.8 over 1s
        let mut shared_layers = layers(&[0.0, 0.4]);
        let mut shared = FadeEffect::new(1.0, FadeRamp::Exact, FadeReference::SharedFirstLayer);
        shared.begin_fade_in(&shared_layers, 1.0, 0.8);
        shared.step(&mut shared_layers, 0.25);

        let mut own_layers = layers(&[0.0, 0.4]);
        let mut own = FadeEffect::new(1.0, FadeRamp::Exact, FadeReference::PerLayer);
        own.begin_fade_in(&own_layers, 1.0, 0.8);
        own.step(&mut own_layers, 0.25);

        // Shared: both layers step by 0.25 * (0.8 - 0.0) = 0.2
        assert!((shared_layers[1].volume() - 0.6).abs() < 1e-5);
        // Per layer: layer 1 steps by 0.25 * (0.8 - 0.4) = 0.1
        assert!((own_layers[1].volume() - 0.5).abs() < 1e-5);
        assert!((shared_layers[0].volume() - own_layers[0].volume()).abs() < 1e-6);
    }

    #[test]
    fn test_first_layer_at_target_ends_fade_for_all() {
        let mut layers = layers(&[0.9, 0.1]);
        let mut fade = FadeEffect::new(1.0, FadeRamp::Padded, FadeReference::SharedFirstLayer);
        fade.begin_fade_in(&layers, 5.0, 0.5);

        let outcome = fade.step(&mut layers, 0.1);
        assert_eq!(outcome, Some(FadeOutcome::FadedIn { volume: 0.5 }));
        assert_eq!(layers[0].volume(), 0.5);
        assert_eq!(layers[1].volume(), 0.5);
    }
}
