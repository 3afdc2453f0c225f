//! Volume control
//!
//! Volume is an integer percentage in `0..=100`. The device gain is the
//! plain linear ratio `level / 100`.

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,
}

impl Volume {
    /// Create new volume controller, clamping to 100
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(100),
        }
    }

    /// Set volume from any integer, clamped to `0..=100`
    pub fn set_level(&mut self, level: i32) {
        self.level = Self::clamp(level);
    }

    /// Current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Linear gain for the output device
    pub fn gain(&self) -> f32 {
        f32::from(self.level) / 100.0
    }

    /// Clamp an arbitrary integer to a valid level
    pub fn clamp(level: i32) -> u8 {
        // Lossless: clamped into u8 range first
        level.clamp(0, 100) as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(70)
    }
}
