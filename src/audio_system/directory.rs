//! PlaybackDirectory: the catalog of known sounds and the set of loaded ones
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::asset::SoundAsset;
use super::effects::FadeSettings;
use super::loader::AudioLoader;
use super::source::AudioCategory;
use crate::error::AudioError;

/// Static description of a sound, declared once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub category: AudioCategory,
    /// Source paths, one per layer
    pub layers: Vec<String>,
    pub default_volume: f32,
    pub initial_volume: f32,
}

impl CatalogEntry {
    pub fn new(name: &str, category: AudioCategory, layers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            category,
            layers: layers.iter().map(|l| l.to_string()).collect(),
            default_volume: 1.0,
            initial_volume: 1.0,
        }
    }

    pub fn with_volumes(mut self, default_volume: f32, initial_volume: f32) -> Self {
        self.default_volume = default_volume;
        self.initial_volume = initial_volume;
        self
    }
}

/// Name-keyed registry of declared and loaded sounds
///
/// Every loaded name is also declared; the catalog only grows.
#[derive(Debug, Default)]
pub struct PlaybackDirectory {
    catalog: HashMap<String, CatalogEntry>,
    active: HashMap<String, SoundAsset>,
    fade: FadeSettings,
}

impl PlaybackDirectory {
    pub fn new(fade: FadeSettings) -> Self {
        Self {
            catalog: HashMap::new(),
            active: HashMap::new(),
            fade,
        }
    }

    /// Register a catalog entry
    pub fn declare(&mut self, entry: CatalogEntry) -> Result<(), AudioError> {
        if self.catalog.contains_key(&entry.name) {
            return Err(AudioError::DuplicateName(entry.name));
        }
        if entry.layers.is_empty() {
            return Err(AudioError::EmptyAsset(entry.name));
        }

        tracing::debug!(
            "Declared {} ({}, {} layers)",
            entry.name,
            entry.category,
            entry.layers.len()
        );
        self.catalog.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.catalog.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.catalog.get(name)
    }

    /// Catalog entries in a category, sorted by name
    pub fn declared_in(&self, category: AudioCategory) -> Vec<&CatalogEntry> {
        let mut entries: Vec<_> = self
            .catalog
            .values()
            .filter(|e| e.category == category)
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Instantiate a declared sound; loading an already loaded sound does nothing
    pub fn load(&mut self, name: &str, loader: &dyn AudioLoader) -> Result<(), AudioError> {
        if self.active.contains_key(name) {
            return Ok(());
        }

        let entry = self
            .catalog
            .get(name)
            .ok_or_else(|| AudioError::NotFound(name.to_string()))?;

        let clips = entry
            .layers
            .iter()
            .map(|path| loader.load(path))
            .collect::<Result<Vec<_>, _>>()?;

        let asset = SoundAsset::new(
            &entry.name,
            entry.category,
            clips,
            entry.default_volume,
            entry.initial_volume,
            self.fade,
        )?;

        tracing::debug!("Loaded {} ({} layers)", name, asset.num_layers());
        self.active.insert(name.to_string(), asset);
        Ok(())
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.active.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&SoundAsset, AudioError> {
        self.active
            .get(name)
            .ok_or_else(|| AudioError::NotLoaded(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut SoundAsset, AudioError> {
        self.active
            .get_mut(name)
            .ok_or_else(|| AudioError::NotLoaded(name.to_string()))
    }

    /// Stop and release a loaded sound
    pub fn unload(&mut self, name: &str) -> Result<(), AudioError> {
        let mut asset = self
            .active
            .remove(name)
            .ok_or_else(|| AudioError::NotLoaded(name.to_string()))?;
        asset.stop();
        tracing::debug!("Unloaded {}", name);
        Ok(())
    }

    /// Names of loaded sounds, sorted so bulk operations run in a stable order
    pub fn loaded_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.active.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn loaded(&self) -> impl Iterator<Item = &SoundAsset> {
        self.active.values()
    }

    pub fn loaded_mut(&mut self) -> impl Iterator<Item = &mut SoundAsset> {
        self.active.values_mut()
    }

    pub fn loaded_count(&self) -> usize {
        self.active.len()
    }

    pub fn declared_count(&self) -> usize {
        self.catalog.len()
    }
}
