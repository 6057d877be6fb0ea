use std::f32::consts::TAU;

/// Radians per second the record turns while playing.
pub const VINYL_SPEED: f32 = 2.0;
/// Tone-arm angle (radians) when resting on the record.
pub const ARM_PLAYING: f32 = -0.3;
pub const ARM_REST: f32 = 0.0;
/// Lerp rate for the tone arm, per second.
pub const ARM_FOLLOW: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Turntable {
    vinyl: f32,
    arm: f32,
}

impl Turntable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32, playing: bool) {
        let dt = dt.max(0.0);
        if playing {
            self.vinyl = (self.vinyl + dt * VINYL_SPEED).rem_euclid(TAU);
        }
        let target = if playing { ARM_PLAYING } else { ARM_REST };
        let k = (dt * ARM_FOLLOW).min(1.0);
        self.arm += (target - self.arm) * k;
    }

    /// Record angle in `[0, 2π)`.
    pub fn vinyl_angle(&self) -> f32 {
        self.vinyl
    }

    pub fn arm_angle(&self) -> f32 {
        self.arm
    }

    /// True once the arm is within a hair of the record.
    pub fn arm_engaged(&self) -> bool {
        (self.arm - ARM_PLAYING).abs() < 0.05
    }

    /// One of eight spinner glyphs for the current record angle.
    pub fn spinner(&self) -> char {
        const FRAMES: [char; 8] = ['|', '/', '-', '\\', '|', '/', '-', '\\'];
        let idx = ((self.vinyl / TAU) * FRAMES.len() as f32) as usize % FRAMES.len();
        FRAMES[idx]
    }
}
