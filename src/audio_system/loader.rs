//! Loader collaborator
//!
//! Resolves a layer path to immutable audio data. The engine never looks at
//! file formats itself; it only keeps the returned clip alive while a layer
//! references it.
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rodio::{Decoder, Source};

use crate::error::AudioError;

/// Immutable source audio shared by every layer that plays it
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Length in seconds
    pub duration: f32,
    pub sample_rate: u32,
    pub channels: u16,
    /// Interleaved samples in [-1.0, 1.0]
    pub samples: Arc<[f32]>,
}

impl AudioClip {
    /// Build a clip from interleaved samples, deriving its duration
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        let frames = if channels == 0 {
            0
        } else {
            samples.len() / channels as usize
        };
        let duration = if sample_rate == 0 {
            0.0
        } else {
            frames as f32 / sample_rate as f32
        };

        Self {
            duration,
            sample_rate,
            channels,
            samples: samples.into(),
        }
    }

    /// A clip of the given length with no sample data
    pub fn silent(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            sample_rate: 0,
            channels: 0,
            samples: Arc::from(Vec::new()),
        }
    }
}

/// Resolves a catalog layer path to playable audio data
pub trait AudioLoader {
    fn load(&self, path: &str) -> Result<Arc<AudioClip>, AudioError>;
}

/// Decodes layer files below a root directory with rodio
///
/// Decoded clips are cached by path, so several sounds sharing a file only
/// decode it once.
pub struct RodioLoader {
    root: PathBuf,
    cache: Mutex<HashMap<PathBuf, Arc<AudioClip>>>,
}

impl RodioLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Number of decoded clips held in memory
    pub fn cached_count(&self) -> usize {
        self.cache.lock().len()
    }

    fn decode(path: &Path) -> Result<AudioClip, AudioError> {
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            AudioError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };

        let file = File::open(path).map_err(|e| load_failed(Box::new(e)))?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| load_failed(Box::new(e)))?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.map(|s| s as f32 / i16::MAX as f32).collect();

        Ok(AudioClip::from_samples(samples, sample_rate, channels))
    }
}

impl AudioLoader for RodioLoader {
    fn load(&self, path: &str) -> Result<Arc<AudioClip>, AudioError> {
        let full_path = self.root.join(path);

        if let Some(clip) = self.cache.lock().get(&full_path) {
            return Ok(Arc::clone(clip));
        }

        let clip = Arc::new(Self::decode(&full_path)?);
        tracing::info!(
            "Decoded audio layer: {} ({:.2}s, {} Hz, {} ch)",
            full_path.display(),
            clip.duration,
            clip.sample_rate,
            clip.channels
        );

        self.cache.lock().insert(full_path, Arc::clone(&clip));
        Ok(clip)
    }
}

/// Serves clips registered up front; unknown paths fail to load
#[derive(Default)]
pub struct MemoryLoader {
    clips: HashMap<String, Arc<AudioClip>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, path: &str, clip: AudioClip) -> Self {
        self.insert(path, clip);
        self
    }

    pub fn insert(&mut self, path: &str, clip: AudioClip) {
        self.clips.insert(path.to_string(), Arc::new(clip));
    }
}

impl AudioLoader for MemoryLoader {
    fn load(&self, path: &str) -> Result<Arc<AudioClip>, AudioError> {
        self.clips
            .get(path)
            .cloned()
            .ok_or_else(|| AudioError::LoadFailed {
                path: path.to_string(),
                source: format!("no clip registered for {}", path).into(),
            })
    }
}

/// Answers every path with a silent clip of fixed length
///
/// Used for headless runs and tests where only timing matters.
#[derive(Debug, Clone, Copy)]
pub struct SilentClipLoader {
    duration: f32,
}

impl SilentClipLoader {
    pub fn new(duration: f32) -> Self {
        Self { duration }
    }
}

impl Default for SilentClipLoader {
    fn default() -> Self {
        Self { duration: 30.0 }
    }
}

impl AudioLoader for SilentClipLoader {
    fn load(&self, _path: &str) -> Result<Arc<AudioClip>, AudioError> {
        Ok(Arc::new(AudioClip::silent(self.duration)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_test_wav(name: &str, frames: u32, sample_rate: u32) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..frames {
            let sample = if i % 2 == 0 { 1000i16 } else { -1000i16 };
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn test_clip_duration_from_samples() {
        let clip = AudioClip::from_samples(vec![0.0; 44_100 * 2], 44_100, 2);
        assert!((clip.duration - 1.0).abs() < 1e-6);
        assert_eq!(clip.samples.len(), 88_200);
    }

    #[test]
    fn test_clip_without_format_has_zero_duration() {
        let clip = AudioClip::from_samples(vec![0.0; 10], 0, 0);
        assert_eq!(clip.duration, 0.0);
    }

    #[test]
    fn test_silent_loader_answers_everything() {
        let loader = SilentClipLoader::new(2.5);
        let clip = loader.load("anything/at/all.wav").unwrap();
        assert_eq!(clip.duration, 2.5);
        assert!(clip.samples.is_empty());
    }

    #[test]
    fn test_memory_loader_unknown_path_fails() {
        let loader = MemoryLoader::new().with_clip("a.wav", AudioClip::silent(1.0));
        assert!(loader.load("a.wav").is_ok());
        assert!(matches!(
            loader.load("b.wav"),
            Err(AudioError::LoadFailed { .. })
        ));
    }

    #[test]
    fn test_rodio_loader_missing_file() {
        let loader = RodioLoader::new(std::env::temp_dir());
        let result = loader.load("definitely_missing_ambiance_layer.wav");
        assert!(matches!(result, Err(AudioError::LoadFailed { .. })));
        assert_eq!(loader.cached_count(), 0);
    }

    #[test]
    fn test_rodio_loader_decodes_and_caches_wav() {
        let path = write_test_wav("ambiance_engine_loader_test.wav", 8_000, 8_000);
        let loader = RodioLoader::new(std::env::temp_dir());

        let clip = loader.load("ambiance_engine_loader_test.wav").unwrap();
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.sample_rate, 8_000);
        assert!((clip.duration - 1.0).abs() < 0.01);

        let again = loader.load("ambiance_engine_loader_test.wav").unwrap();
        assert!(Arc::ptr_eq(&clip, &again));
        assert_eq!(loader.cached_count(), 1);

        let _ = std::fs::remove_file(path);
    }
}
