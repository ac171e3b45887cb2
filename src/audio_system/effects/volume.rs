//! Per-layer volume and mute state

/// Volume effect configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeEffect {
    /// Volume multiplier (0.0-1.0)
    level: f32,

    /// Mute flag; independent of `level`
    muted: bool,
}

impl VolumeEffect {
    /// Create a new volume effect
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Get the volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set the volume level
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    /// Level actually heard: zero while muted
    pub fn effective_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Mute; returns false if it was already muted
    pub fn mute(&mut self) -> bool {
        !std::mem::replace(&mut self.muted, true)
    }

    /// Unmute; returns false if it was not muted
    pub fn unmute(&mut self) -> bool {
        std::mem::replace(&mut self.muted, false)
    }
}

impl Default for VolumeEffect {
    fn default() -> Self {
        Self {
            level: 1.0,
            muted: false,
        }
    }
}
