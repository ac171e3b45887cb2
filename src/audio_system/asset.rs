//! SoundAsset: one named sound made of interchangeable layers
//!
//! Layers are variants of the same sound (alternate footsteps, cricket calls)
//! rather than a chord: untargeted plays pick one layer at random. Targeted
//! operations take a 0-based layer index, except `set_layer_volume` and
//! `layer_volume` which keep the 1-based numbering game scripts call with.
use std::sync::Arc;

use super::effects::{FadeEffect, FadeMode, FadeOutcome, FadeSettings};
use super::layer::Layer;
use super::loader::AudioClip;
use super::random::RandomSource;
use super::source::AudioCategory;
use crate::error::AudioError;

/// Which layer a play request starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerSelection {
    /// Layer 0 for single-layer sounds, otherwise a uniformly random layer
    Any,
    /// A specific 0-based layer
    Layer(usize),
}

/// A play request: which layer, where to seek, at what volume, looping or not
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    pub selection: LayerSelection,
    pub from: f32,
    pub volume: Option<f32>,
    pub looping: bool,
}

impl PlayRequest {
    pub fn new() -> Self {
        Self {
            selection: LayerSelection::Any,
            from: 0.0,
            volume: None,
            looping: false,
        }
    }

    pub fn layer(mut self, layer: usize) -> Self {
        self.selection = LayerSelection::Layer(layer);
        self
    }

    pub fn from_time(mut self, time: f32) -> Self {
        self.from = time;
        self
    }

    pub fn at_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }
}

impl Default for PlayRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// A loaded sound with live layers and fade state
#[derive(Debug, Clone)]
pub struct SoundAsset {
    name: String,
    category: AudioCategory,
    layers: Vec<Layer>,
    default_volume: f32,
    initial_volume: f32,
    fade: FadeEffect,
}

impl SoundAsset {
    pub fn new(
        name: &str,
        category: AudioCategory,
        clips: Vec<Arc<AudioClip>>,
        default_volume: f32,
        initial_volume: f32,
        fade: FadeSettings,
    ) -> Result<Self, AudioError> {
        if clips.is_empty() {
            return Err(AudioError::EmptyAsset(name.to_string()));
        }

        let layers = clips
            .into_iter()
            .map(|clip| Layer::new(clip, initial_volume))
            .collect();

        Ok(Self {
            name: name.to_string(),
            category,
            layers,
            default_volume,
            initial_volume,
            fade: FadeEffect::new(default_volume, fade.ramp, fade.reference),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> AudioCategory {
        self.category
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn initial_volume(&self) -> f32 {
        self.initial_volume
    }

    fn check_layer(&self, layer: usize) -> Result<(), AudioError> {
        if layer < self.layers.len() {
            Ok(())
        } else {
            Err(AudioError::LayerOutOfRange {
                name: self.name.clone(),
                layer,
                count: self.layers.len(),
            })
        }
    }

    fn layer_mut(&mut self, layer: usize) -> Result<&mut Layer, AudioError> {
        self.check_layer(layer)?;
        Ok(&mut self.layers[layer])
    }

    /// Converts a 1-based layer position to an index
    fn position_to_index(&self, position: usize) -> Result<usize, AudioError> {
        match position.checked_sub(1) {
            Some(index) if index < self.layers.len() => Ok(index),
            _ => Err(AudioError::LayerOutOfRange {
                name: self.name.clone(),
                layer: position,
                count: self.layers.len(),
            }),
        }
    }

    // -- playback --------------------------------------------------------

    /// Start a layer according to `request`, returning the 0-based layer played
    ///
    /// A requested volume goes through the same ceiling as `set_volume`
    /// (or `set_volume_of_layer` for a targeted layer).
    pub fn start(
        &mut self,
        request: PlayRequest,
        random: &mut dyn RandomSource,
    ) -> Result<usize, AudioError> {
        let index = match request.selection {
            LayerSelection::Layer(layer) => {
                self.check_layer(layer)?;
                if let Some(volume) = request.volume {
                    self.set_volume_of_layer(layer, volume)?;
                }
                layer
            }
            LayerSelection::Any => {
                if let Some(volume) = request.volume {
                    self.set_volume(volume);
                }
                if self.layers.len() == 1 {
                    0
                } else {
                    random.pick_index(self.layers.len())
                }
            }
        };

        let layer = &mut self.layers[index];
        if request.looping {
            layer.set_looping(true);
        }
        layer.start(request.from);

        tracing::debug!(
            "Playing {} layer {} from {:.2}s{}",
            self.name,
            index,
            request.from,
            if request.looping { " (loop)" } else { "" }
        );
        Ok(index)
    }

    /// Play one layer (at random when there are several) from the start
    pub fn play(&mut self, random: &mut dyn RandomSource) -> usize {
        self.play_any(PlayRequest::new(), random)
    }

    pub fn play_at(&mut self, volume: f32, random: &mut dyn RandomSource) -> usize {
        self.play_any(PlayRequest::new().at_volume(volume), random)
    }

    pub fn play_from_time(&mut self, time: f32, random: &mut dyn RandomSource) -> usize {
        self.play_any(PlayRequest::new().from_time(time), random)
    }

    pub fn loop_play(&mut self, random: &mut dyn RandomSource) -> usize {
        self.play_any(PlayRequest::new().looping(), random)
    }

    pub fn loop_play_at(&mut self, volume: f32, random: &mut dyn RandomSource) -> usize {
        self.play_any(PlayRequest::new().at_volume(volume).looping(), random)
    }

    pub fn loop_play_from_time(&mut self, time: f32, random: &mut dyn RandomSource) -> usize {
        self.play_any(PlayRequest::new().from_time(time).looping(), random)
    }

    // Untargeted requests cannot miss a layer: assets always hold at least one
    fn play_any(&mut self, request: PlayRequest, random: &mut dyn RandomSource) -> usize {
        self.start(request, random).unwrap_or(0)
    }

    /// Start from volume 0 and fade in to the default volume
    pub fn play_with_fade_in(&mut self, duration: f32, random: &mut dyn RandomSource) -> usize {
        self.play_with_fade_in_from(duration, 0.0, 0.0, random)
    }

    /// Start at `start_volume` from `time` and fade in to the default volume
    pub fn play_with_fade_in_from(
        &mut self,
        duration: f32,
        time: f32,
        start_volume: f32,
        random: &mut dyn RandomSource,
    ) -> usize {
        let layer = self.play_any(
            PlayRequest::new().from_time(time).at_volume(start_volume),
            random,
        );
        self.fade_in(duration);
        layer
    }

    /// Stop every layer and clear every loop flag
    pub fn stop(&mut self) {
        for layer in self.layers.iter_mut() {
            if layer.is_playing() {
                layer.stop();
            }
            layer.set_looping(false);
        }
    }

    /// Stop one layer; its loop flag is kept so a later play resumes looping
    pub fn stop_layer(&mut self, layer: usize) -> Result<(), AudioError> {
        let layer = self.layer_mut(layer)?;
        if layer.is_playing() {
            layer.stop();
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.pause();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.layers.iter().any(Layer::is_playing)
    }

    pub fn are_playing(&self) -> Vec<bool> {
        self.layers.iter().map(Layer::is_playing).collect()
    }

    pub fn is_layer_playing(&self, layer: usize) -> Result<bool, AudioError> {
        self.check_layer(layer)?;
        Ok(self.layers[layer].is_playing())
    }

    // -- looping ---------------------------------------------------------

    pub fn set_loop(&mut self, looping: bool) {
        for layer in self.layers.iter_mut() {
            layer.set_looping(looping);
        }
    }

    pub fn loop_layer(&mut self, layer: usize) -> Result<(), AudioError> {
        self.layer_mut(layer)?.set_looping(true);
        Ok(())
    }

    pub fn stop_looping_layer(&mut self, layer: usize) -> Result<(), AudioError> {
        self.layer_mut(layer)?.set_looping(false);
        Ok(())
    }

    // -- cursor ----------------------------------------------------------

    pub fn times(&self) -> Vec<f32> {
        self.layers.iter().map(Layer::time).collect()
    }

    /// Play cursor of layer 0
    pub fn time(&self) -> f32 {
        self.layers[0].time()
    }

    pub fn layer_time(&self, layer: usize) -> Result<f32, AudioError> {
        self.check_layer(layer)?;
        Ok(self.layers[layer].time())
    }

    /// Clip length of layer 0
    pub fn runtime(&self) -> f32 {
        self.layers[0].duration()
    }

    // -- volume ----------------------------------------------------------

    /// Set every layer's volume; requests above the default volume are
    /// ignored. Returns whether the volume was applied.
    pub fn set_volume(&mut self, volume: f32) -> bool {
        if volume > self.default_volume {
            return false;
        }
        for layer in self.layers.iter_mut() {
            layer.set_volume(volume);
        }
        true
    }

    /// Volume of layer 0
    pub fn volume(&self) -> f32 {
        self.layers[0].volume()
    }

    /// Set one layer's volume by 1-based position, with the same ceiling
    /// as `set_volume`
    pub fn set_layer_volume(&mut self, position: usize, volume: f32) -> Result<bool, AudioError> {
        let index = self.position_to_index(position)?;
        self.set_volume_of_layer(index, volume)
    }

    /// Volume of the layer at 1-based `position`
    pub fn layer_volume(&self, position: usize) -> Result<f32, AudioError> {
        let index = self.position_to_index(position)?;
        Ok(self.layers[index].volume())
    }

    fn set_volume_of_layer(&mut self, index: usize, volume: f32) -> Result<bool, AudioError> {
        let ceiling = self.default_volume;
        let layer = self.layer_mut(index)?;
        if volume > ceiling {
            return Ok(false);
        }
        layer.set_volume(volume);
        Ok(true)
    }

    pub fn default_volume(&self) -> f32 {
        self.default_volume
    }

    /// Change the default volume, which also becomes the next fade-in target
    pub fn set_default_volume(&mut self, volume: f32) {
        self.default_volume = volume;
        self.fade.set_target_volume(volume);
    }

    pub fn reset_volume(&mut self) {
        let volume = self.default_volume;
        for layer in self.layers.iter_mut() {
            layer.set_volume(volume);
        }
    }

    // -- mute ------------------------------------------------------------

    pub fn mute(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.mute();
        }
    }

    pub fn unmute(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.unmute();
        }
    }

    /// True when any layer is muted
    pub fn is_muted(&self) -> bool {
        self.layers.iter().any(Layer::is_muted)
    }

    // -- fading ----------------------------------------------------------

    pub fn fade(&self) -> &FadeEffect {
        &self.fade
    }

    pub fn fade_mode(&self) -> FadeMode {
        self.fade.mode()
    }

    pub fn enable_fading(&mut self) {
        self.fade.set_enabled(true);
    }

    pub fn disable_fading(&mut self) {
        self.fade.set_enabled(false);
    }

    /// Fade in to the default volume
    pub fn fade_in(&mut self, duration: f32) -> bool {
        let target = self.default_volume;
        self.fade.begin_fade_in(&self.layers, duration, target)
    }

    pub fn fade_in_to_volume(&mut self, duration: f32, volume: f32) -> bool {
        self.fade.begin_fade_in(&self.layers, duration, volume)
    }

    pub fn fade_out(&mut self, duration: f32, min_volume: f32) -> bool {
        self.fade
            .begin_fade_out(&self.layers, duration, min_volume, false)
    }

    /// Fade out, then stop every layer and clear loop flags
    pub fn fade_out_to_stop(&mut self, duration: f32, min_volume: f32) -> bool {
        self.fade
            .begin_fade_out(&self.layers, duration, min_volume, true)
    }

    /// Advance fades and play cursors by one tick
    pub fn tick(&mut self, delta: f32) -> Option<FadeOutcome> {
        let outcome = self.fade.step(&mut self.layers, delta);
        for layer in self.layers.iter_mut() {
            layer.advance(delta);
        }
        outcome
    }
}
