//! Session driver
//!
//! Owns the world together with the buffered input and the frame clock. The
//! presentation layer pushes intents at any time; they are read at the next
//! tick boundary. Each frame runs exactly one tick and hands back a snapshot
//! plus the effect events produced during it.

use glam::Vec2;
use serde::Serialize;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, JoystickVector, TickInput, World, WorldSnapshot, tick};

/// Output of one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub snapshot: WorldSnapshot,
    pub events: Vec<GameEvent>,
}

/// Converts monotonic timestamps into clamped frame deltas
///
/// While detached the next frame reports dt = 0 and re-anchors, so time
/// spent paused or in a menu never reaches the simulation.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    anchor_ms: Option<f64>,
}

impl FrameClock {
    /// Seconds since the previous timestamp, clamped to [0, MAX_FRAME_DT]
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.anchor_ms {
            Some(prev) if now_ms.is_finite() => ((now_ms - prev) / 1000.0) as f32,
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.anchor_ms = Some(now_ms);
        }
        if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 }
    }

    pub fn detach(&mut self) {
        self.anchor_ms = None;
    }

    pub fn is_attached(&self) -> bool {
        self.anchor_ms.is_some()
    }
}

/// A running game driven by intents and frame timestamps
#[derive(Debug, Clone)]
pub struct Session {
    world: World,
    input: TickInput,
    clock: FrameClock,
    settings: Settings,
    /// Pixel size waiting for the next tick boundary
    pending_field: Option<Vec2>,
}

impl Session {
    pub fn new(seed: u64, field: Vec2, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let input = TickInput {
            sensitivity: settings.sensitivity,
            ..Default::default()
        };
        Self {
            world: World::new(seed, field),
            input,
            clock: FrameClock::default(),
            settings,
            pending_field: None,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.world.snapshot()
    }

    // === Intents ===

    pub fn set_movement_vector(&mut self, vector: JoystickVector) {
        self.input.movement = Some(vector);
    }

    pub fn clear_movement_vector(&mut self) {
        self.input.movement = None;
    }

    pub fn set_firing(&mut self, firing: bool) {
        self.input.firing = firing;
    }

    pub fn start(&mut self) {
        self.input.start = true;
    }

    pub fn pause(&mut self) {
        self.input.pause = true;
    }

    pub fn resume(&mut self) {
        self.input.resume = true;
    }

    pub fn advance_to_next_level(&mut self) {
        self.input.next_level = true;
    }

    /// Update the joystick sensitivity; values outside (0, 2] are rejected
    pub fn set_sensitivity(&mut self, sensitivity: f32) -> bool {
        if !self.settings.set_sensitivity(sensitivity) {
            return false;
        }
        self.input.sensitivity = self.settings.sensitivity;
        true
    }

    /// Buffer a new playfield size in pixels for the next tick
    pub fn set_playfield_size(&mut self, width: f32, height: f32) -> bool {
        let size = Vec2::new(width, height);
        if !size.is_finite() || size.min_element() <= 0.0 {
            log::warn!("Ignoring invalid playfield size {}x{}", width, height);
            return false;
        }
        self.pending_field = Some(size);
        true
    }

    // === Frames ===

    /// Run one frame at the given monotonic timestamp (milliseconds)
    pub fn frame(&mut self, now_ms: f64) -> Frame {
        // Always re-anchor; the frame that leaves a frozen phase still runs with zero dt
        let elapsed = self.clock.delta(now_ms);
        let dt = if self.world.phase.runs_clock() { elapsed } else { 0.0 };
        self.step(dt)
    }

    /// Run one frame with an explicit delta time
    pub fn step(&mut self, dt: f32) -> Frame {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

        if let Some(field) = self.pending_field.take() {
            log::debug!("Playfield resized to {}x{}", field.x, field.y);
            self.world.field = field;
        }

        tick(&mut self.world, &self.input, dt);
        self.input.clear_one_shots();

        if !self.world.phase.runs_clock() {
            self.clock.detach();
        }

        Frame {
            snapshot: self.world.snapshot(),
            events: self.world.drain_events(),
        }
    }
}
