//! Joystick response curve
//!
//! Turns the raw drag-joystick vector into a movement direction and a speed
//! factor. The curve is strongly sub-linear so small deflections give fine
//! control and only near-full deflection ramps up to top speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Raw vector reported by the on-screen joystick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JoystickVector {
    pub x: f32,
    pub y: f32,
    /// Deflection in [0, 1]
    pub magnitude: f32,
}

impl JoystickVector {
    pub fn new(x: f32, y: f32, magnitude: f32) -> Self {
        Self { x, y, magnitude }
    }
}

/// Processed movement for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementCommand {
    /// Unit direction, or zero when stopped
    pub direction: Vec2,
    /// Curved and sensitivity-scaled multiplier for the base move speed
    pub speed_factor: f32,
}

impl MovementCommand {
    pub const STOP: Self = Self {
        direction: Vec2::ZERO,
        speed_factor: 0.0,
    };

    pub fn is_moving(&self) -> bool {
        self.speed_factor > 0.0 && self.direction != Vec2::ZERO
    }
}

/// Response curve parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputCurve {
    /// Deflections below this stop the craft immediately
    pub deadzone: f32,
    /// Power applied to the remapped deflection
    pub exponent: f32,
    /// Caps top speed before sensitivity is applied
    pub max_speed_multiplier: f32,
}

impl Default for InputCurve {
    fn default() -> Self {
        Self {
            deadzone: 0.15,
            exponent: 2.8,
            max_speed_multiplier: 0.25,
        }
    }
}

impl InputCurve {
    /// Curved speed for a deflection, before the max-speed multiplier and sensitivity
    pub fn curve(&self, magnitude: f32) -> f32 {
        let magnitude = if magnitude.is_finite() { magnitude.clamp(0.0, 1.0) } else { 0.0 };
        if magnitude < self.deadzone {
            return 0.0;
        }
        let span = (1.0 - self.deadzone).max(f32::EPSILON);
        let normalized = ((magnitude - self.deadzone) / span).clamp(0.0, 1.0);
        normalized.powf(self.exponent)
    }

    /// Map a raw joystick vector to a movement command
    pub fn process(&self, raw: JoystickVector, sensitivity: f32) -> MovementCommand {
        let dir = Vec2::new(raw.x, raw.y);
        if !raw.magnitude.is_finite() || raw.magnitude < self.deadzone || !dir.is_finite() {
            return MovementCommand::STOP;
        }
        let direction = dir.normalize_or_zero();
        if direction == Vec2::ZERO {
            return MovementCommand::STOP;
        }

        let speed_factor = self.curve(raw.magnitude) * self.max_speed_multiplier * sensitivity;
        MovementCommand {
            direction,
            speed_factor,
        }
    }
}
