//! Audio effects module
//!
//! Effects applied to a sound's layers while it plays: per-layer volume and
//! mute, and the per-sound fade shared by all of its layers.

pub mod fade;
pub mod volume;

pub use fade::{FadeEffect, FadeMode, FadeOutcome, FadeRamp, FadeReference};
pub use volume::VolumeEffect;

/// How fades are computed for every sound an engine creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FadeSettings {
    pub ramp: FadeRamp,
    pub reference: FadeReference,
}

impl FadeSettings {
    pub fn with_ramp(mut self, ramp: FadeRamp) -> Self {
        self.ramp = ramp;
        self
    }

    pub fn with_reference(mut self, reference: FadeReference) -> Self {
        self.reference = reference;
        self
    }
}
