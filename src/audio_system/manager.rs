//! Audio engine facade
//!
//! Every operation addresses a sound by name. Callers never hold a
//! `SoundAsset` across calls, so unloading can never leave a dangling handle.

use super::asset::PlayRequest;
use super::directory::{CatalogEntry, PlaybackDirectory};
use super::effects::{FadeOutcome, FadeSettings};
use super::loader::AudioLoader;
use super::random::RandomSource;
use super::source::{AudioCategory, CategoryFilter};
use super::SoundAsset;
use crate::error::AudioError;

/// Engine-wide behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub fade: FadeSettings,

    /// Log recoverable errors at warn instead of debug
    pub report_missing: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fade: FadeSettings::default(),
            report_missing: true,
        }
    }
}

/// A fade that finished during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct FadeCompletion {
    pub name: String,
    pub outcome: FadeOutcome,
}

/// Audio engine
///
/// Owns the playback directory and the loader and random collaborators.
pub struct AudioEngine {
    directory: PlaybackDirectory,
    loader: Box<dyn AudioLoader + Send>,
    random: Box<dyn RandomSource + Send>,
    settings: EngineSettings,
}

impl AudioEngine {
    /// Create a new engine around its collaborators
    pub fn new(
        loader: Box<dyn AudioLoader + Send>,
        random: Box<dyn RandomSource + Send>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            directory: PlaybackDirectory::new(settings.fade),
            loader,
            random,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn directory(&self) -> &PlaybackDirectory {
        &self.directory
    }

    /// The random source shared by layer picks and ambient scheduling
    pub fn random(&mut self) -> &mut (dyn RandomSource + Send) {
        self.random.as_mut()
    }

    /// Log a recoverable error and turn the result into an option
    pub fn recover<T>(&self, context: &str, result: Result<T, AudioError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                if self.settings.report_missing {
                    tracing::warn!("{}: {}", context, e);
                } else {
                    tracing::debug!("{}: {}", context, e);
                }
                None
            }
        }
    }

    // -- catalog ---------------------------------------------------------

    pub fn declare(&mut self, entry: CatalogEntry) -> Result<(), AudioError> {
        self.directory.declare(entry)
    }

    pub fn load(&mut self, name: &str) -> Result<(), AudioError> {
        self.directory.load(name, self.loader.as_ref())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.directory.is_loaded(name)
    }

    pub fn unload(&mut self, name: &str) -> Result<(), AudioError> {
        self.directory.unload(name)
    }

    pub fn loaded_count(&self) -> usize {
        self.directory.loaded_count()
    }

    fn asset(&self, name: &str) -> Result<&SoundAsset, AudioError> {
        self.directory.get(name)
    }

    fn asset_mut(&mut self, name: &str) -> Result<&mut SoundAsset, AudioError> {
        self.directory.get_mut(name)
    }

    // -- playback --------------------------------------------------------

    /// Load if needed, then start a layer as described by `request`
    pub fn start(&mut self, name: &str, request: PlayRequest) -> Result<usize, AudioError> {
        self.load(name)?;
        let asset = self.directory.get_mut(name)?;
        asset.start(request, self.random.as_mut())
    }

    pub fn play(&mut self, name: &str) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new())
    }

    pub fn play_at(&mut self, name: &str, volume: f32) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().at_volume(volume))
    }

    pub fn play_from_time(&mut self, name: &str, time: f32) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().from_time(time))
    }

    pub fn play_layer(&mut self, name: &str, layer: usize) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().layer(layer))
    }

    pub fn play_layer_at(
        &mut self,
        name: &str,
        layer: usize,
        volume: f32,
    ) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().layer(layer).at_volume(volume))
    }

    pub fn play_layer_from_time(
        &mut self,
        name: &str,
        layer: usize,
        time: f32,
    ) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().layer(layer).from_time(time))
    }

    pub fn loop_play(&mut self, name: &str) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().looping())
    }

    pub fn loop_play_at(&mut self, name: &str, volume: f32) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().at_volume(volume).looping())
    }

    pub fn loop_play_from_time(&mut self, name: &str, time: f32) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().from_time(time).looping())
    }

    pub fn loop_play_layer(&mut self, name: &str, layer: usize) -> Result<usize, AudioError> {
        self.start(name, PlayRequest::new().layer(layer).looping())
    }

    /// Play from volume 0 and fade in to the default volume
    pub fn play_with_fade_in(&mut self, name: &str, duration: f32) -> Result<usize, AudioError> {
        self.load(name)?;
        let asset = self.directory.get_mut(name)?;
        Ok(asset.play_with_fade_in(duration, self.random.as_mut()))
    }

    /// Play from `time` at `start_volume` and fade in to the default volume
    pub fn play_with_fade_in_from(
        &mut self,
        name: &str,
        duration: f32,
        time: f32,
        start_volume: f32,
    ) -> Result<usize, AudioError> {
        self.load(name)?;
        let asset = self.directory.get_mut(name)?;
        Ok(asset.play_with_fade_in_from(duration, time, start_volume, self.random.as_mut()))
    }

    pub fn stop(&mut self, name: &str) -> Result<(), AudioError> {
        self.asset_mut(name)?.stop();
        Ok(())
    }

    pub fn stop_layer(&mut self, name: &str, layer: usize) -> Result<(), AudioError> {
        self.asset_mut(name)?.stop_layer(layer)
    }

    pub fn pause(&mut self, name: &str) -> Result<(), AudioError> {
        self.asset_mut(name)?.pause();
        Ok(())
    }

    /// Whether any layer is playing; unloaded sounds are not playing
    pub fn is_playing(&self, name: &str) -> bool {
        self.asset(name).map(SoundAsset::is_playing).unwrap_or(false)
    }

    pub fn are_playing(&self, name: &str) -> Result<Vec<bool>, AudioError> {
        Ok(self.asset(name)?.are_playing())
    }

    pub fn is_layer_playing(&self, name: &str, layer: usize) -> Result<bool, AudioError> {
        self.asset(name)?.is_layer_playing(layer)
    }

    // -- looping ---------------------------------------------------------

    pub fn set_loop(&mut self, name: &str, looping: bool) -> Result<(), AudioError> {
        self.asset_mut(name)?.set_loop(looping);
        Ok(())
    }

    pub fn loop_layer(&mut self, name: &str, layer: usize) -> Result<(), AudioError> {
        self.asset_mut(name)?.loop_layer(layer)
    }

    pub fn stop_looping(&mut self, name: &str) -> Result<(), AudioError> {
        self.set_loop(name, false)
    }

    pub fn stop_looping_layer(&mut self, name: &str, layer: usize) -> Result<(), AudioError> {
        self.asset_mut(name)?.stop_looping_layer(layer)
    }

    // -- cursor ----------------------------------------------------------

    pub fn get_times(&self, name: &str) -> Result<Vec<f32>, AudioError> {
        Ok(self.asset(name)?.times())
    }

    pub fn get_time(&self, name: &str) -> Result<f32, AudioError> {
        Ok(self.asset(name)?.time())
    }

    pub fn get_layer_time(&self, name: &str, layer: usize) -> Result<f32, AudioError> {
        self.asset(name)?.layer_time(layer)
    }

    pub fn get_runtime(&self, name: &str) -> Result<f32, AudioError> {
        Ok(self.asset(name)?.runtime())
    }

    pub fn num_layers(&self, name: &str) -> Result<usize, AudioError> {
        Ok(self.asset(name)?.num_layers())
    }

    // -- volume ----------------------------------------------------------

    /// Set every layer's volume. Returns false when the request exceeds the
    /// sound's default volume and was ignored.
    pub fn set_volume(&mut self, name: &str, volume: f32) -> Result<bool, AudioError> {
        Ok(self.asset_mut(name)?.set_volume(volume))
    }

    pub fn get_volume(&self, name: &str) -> Result<f32, AudioError> {
        Ok(self.asset(name)?.volume())
    }

    /// Set one layer's volume; `position` counts layers from 1
    pub fn set_layer_volume(
        &mut self,
        name: &str,
        position: usize,
        volume: f32,
    ) -> Result<bool, AudioError> {
        self.asset_mut(name)?.set_layer_volume(position, volume)
    }

    /// Volume of one layer; `position` counts layers from 1
    pub fn get_layer_volume(&self, name: &str, position: usize) -> Result<f32, AudioError> {
        self.asset(name)?.layer_volume(position)
    }

    pub fn reset_volume(&mut self, name: &str) -> Result<(), AudioError> {
        self.asset_mut(name)?.reset_volume();
        Ok(())
    }

    pub fn get_default_volume(&self, name: &str) -> Result<f32, AudioError> {
        Ok(self.asset(name)?.default_volume())
    }

    pub fn set_default_volume(&mut self, name: &str, volume: f32) -> Result<(), AudioError> {
        self.asset_mut(name)?.set_default_volume(volume);
        Ok(())
    }

    pub fn reset_all_volumes(&mut self) {
        for asset in self.directory.loaded_mut() {
            asset.reset_volume();
        }
    }

    // -- mute ------------------------------------------------------------

    pub fn mute(&mut self, name: &str) -> Result<(), AudioError> {
        self.asset_mut(name)?.mute();
        Ok(())
    }

    pub fn unmute(&mut self, name: &str) -> Result<(), AudioError> {
        self.asset_mut(name)?.unmute();
        Ok(())
    }

    pub fn is_muted(&self, name: &str) -> Result<bool, AudioError> {
        Ok(self.asset(name)?.is_muted())
    }

    pub fn mute_all(&mut self) {
        for asset in self.directory.loaded_mut() {
            asset.mute();
        }
    }

    pub fn unmute_all(&mut self) {
        for asset in self.directory.loaded_mut() {
            asset.unmute();
        }
    }

    // -- fading ----------------------------------------------------------

    pub fn enable_fading(&mut self, name: &str) -> Result<(), AudioError> {
        self.asset_mut(name)?.enable_fading();
        Ok(())
    }

    pub fn disable_fading(&mut self, name: &str) -> Result<(), AudioError> {
        self.asset_mut(name)?.disable_fading();
        Ok(())
    }

    /// Fade in to the default volume. Returns false when fading is disabled.
    pub fn fade_in(&mut self, name: &str, duration: f32) -> Result<bool, AudioError> {
        Ok(self.asset_mut(name)?.fade_in(duration))
    }

    pub fn fade_in_to_volume(
        &mut self,
        name: &str,
        duration: f32,
        volume: f32,
    ) -> Result<bool, AudioError> {
        Ok(self.asset_mut(name)?.fade_in_to_volume(duration, volume))
    }

    pub fn fade_out(
        &mut self,
        name: &str,
        duration: f32,
        min_volume: f32,
    ) -> Result<bool, AudioError> {
        Ok(self.asset_mut(name)?.fade_out(duration, min_volume))
    }

    pub fn fade_out_to_stop(
        &mut self,
        name: &str,
        duration: f32,
        min_volume: f32,
    ) -> Result<bool, AudioError> {
        Ok(self.asset_mut(name)?.fade_out_to_stop(duration, min_volume))
    }

    // -- bulk ------------------------------------------------------------

    /// Apply `f` to every loaded sound matching `filter`, optionally only to
    /// those currently playing. Returns how many sounds were touched.
    pub fn for_each_where<F>(
        &mut self,
        filter: CategoryFilter,
        playing_only: bool,
        mut f: F,
    ) -> usize
    where
        F: FnMut(&mut SoundAsset),
    {
        let mut touched = 0;
        for asset in self.directory.loaded_mut() {
            if !filter.matches(asset.category()) {
                continue;
            }
            if playing_only && !asset.is_playing() {
                continue;
            }
            f(asset);
            touched += 1;
        }
        touched
    }

    /// Names of loaded sounds matching `filter`, sorted
    pub fn loaded_where(&self, filter: CategoryFilter) -> Vec<String> {
        let mut names: Vec<_> = self
            .directory
            .loaded()
            .filter(|asset| filter.matches(asset.category()))
            .map(|asset| asset.name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn fade_in_where(&mut self, filter: CategoryFilter, duration: f32) -> usize {
        self.for_each_where(filter, false, |asset| {
            asset.fade_in(duration);
        })
    }

    pub fn fade_out_where(
        &mut self,
        filter: CategoryFilter,
        duration: f32,
        min_volume: f32,
    ) -> usize {
        self.for_each_where(filter, true, |asset| {
            asset.fade_out(duration, min_volume);
        })
    }

    pub fn fade_out_to_stop_where(
        &mut self,
        filter: CategoryFilter,
        duration: f32,
        min_volume: f32,
    ) -> usize {
        self.for_each_where(filter, true, |asset| {
            asset.fade_out_to_stop(duration, min_volume);
        })
    }

    pub fn stop_where(&mut self, filter: CategoryFilter) -> usize {
        self.for_each_where(filter, true, SoundAsset::stop)
    }

    /// Fade every loaded sound in to its default volume
    pub fn fade_in_all(&mut self, duration: f32) -> usize {
        self.fade_in_where(CategoryFilter::All, duration)
    }

    /// Fade every playing non-music sound down to `min_volume`
    pub fn fade_out_sounds(&mut self, duration: f32, min_volume: f32) -> usize {
        self.fade_out_where(CategoryFilter::Except(AudioCategory::Music), duration, min_volume)
    }

    /// Fade every playing music track in to its default volume
    pub fn fade_in_music(&mut self, duration: f32) -> usize {
        self.for_each_where(CategoryFilter::Only(AudioCategory::Music), true, |asset| {
            asset.fade_in(duration);
        })
    }

    /// Fade every playing music track out and stop it
    pub fn fade_out_music(&mut self, duration: f32, min_volume: f32) -> usize {
        let music = CategoryFilter::Only(AudioCategory::Music);
        self.fade_out_to_stop_where(music, duration, min_volume)
    }

    pub fn stop_all_sounds(&mut self) {
        for asset in self.directory.loaded_mut() {
            asset.stop();
        }
        tracing::debug!("Stopped all sounds");
    }

    /// Stop every playing non-music sound
    pub fn stop_sounds(&mut self) -> usize {
        self.stop_where(CategoryFilter::Except(AudioCategory::Music))
    }

    /// Stop every playing music track
    pub fn stop_music(&mut self) -> usize {
        self.stop_where(CategoryFilter::Only(AudioCategory::Music))
    }

    /// Unload every loaded sound in `category`
    pub fn unload_category(&mut self, category: AudioCategory) -> usize {
        let names = self.loaded_where(CategoryFilter::Only(category));
        for name in &names {
            let result = self.directory.unload(name);
            self.recover("unload_category", result);
        }
        tracing::debug!("Unloaded {} {} sounds", names.len(), category);
        names.len()
    }

    /// Stop and unload everything
    pub fn shutdown(&mut self) {
        let names = self.directory.loaded_names();
        for name in &names {
            let result = self.directory.unload(name);
            self.recover("shutdown", result);
        }
        tracing::info!("Audio engine shut down ({} sounds released)", names.len());
    }

    // -- tick ------------------------------------------------------------

    /// Advance every loaded sound's fade and play cursor by `delta` seconds
    pub fn tick(&mut self, delta: f32) -> Vec<FadeCompletion> {
        let mut completions = Vec::new();
        for asset in self.directory.loaded_mut() {
            if let Some(outcome) = asset.tick(delta) {
                tracing::debug!("Fade finished for {}: {:?}", asset.name(), outcome);
                completions.push(FadeCompletion {
                    name: asset.name().to_string(),
                    outcome,
                });
            }
        }
        completions.sort_by(|a, b| a.name.cmp(&b.name));
        completions
    }
}
