//! Playfield geometry helpers
//!
//! Entity positions live in percent space (0..100 on each axis, y pointing
//! down) while radii and speeds are in pixels. Every function here takes the
//! current playfield size in pixels so behavior is resolution-independent.

use glam::Vec2;

/// Radius of a circle expressed as a percentage of each axis
#[inline]
pub fn radius_in_percent(radius: f32, field: Vec2) -> Vec2 {
    Vec2::new(radius / field.x * 100.0, radius / field.y * 100.0)
}

/// Convert a percent position into pixels
#[inline]
pub fn percent_to_px(pos: Vec2, field: Vec2) -> Vec2 {
    pos * field / 100.0
}

/// Convert a pixel position into percent
#[inline]
pub fn px_to_percent(pos: Vec2, field: Vec2) -> Vec2 {
    pos / field * 100.0
}

/// Clamp a position so a circle of `radius` px stays fully inside the field
pub fn clamp_to_bounds(pos: Vec2, field: Vec2, radius: f32) -> Vec2 {
    let r = radius_in_percent(radius, field);
    // A circle wider than the field pins to the center instead of panicking in clamp
    let min = r.min(Vec2::splat(50.0));
    let max = (Vec2::splat(100.0) - r).max(Vec2::splat(50.0));
    pos.clamp(min, max)
}

/// Bounce a circle off the field edges
///
/// Each axis is handled on its own: if clamping moved the position on an axis,
/// that axis's velocity component is negated unless it already points back
/// into the field. Returns `(position, velocity)`.
pub fn reflect_at_bounds(pos: Vec2, vel: Vec2, field: Vec2, radius: f32) -> (Vec2, Vec2) {
    let clamped = clamp_to_bounds(pos, field, radius);
    let vel = Vec2::new(
        reflect_axis(pos.x, clamped.x, vel.x),
        reflect_axis(pos.y, clamped.y, vel.y),
    );
    (clamped, vel)
}

/// Velocity component after clamping one axis from `raw` to `clamped`
#[inline]
fn reflect_axis(raw: f32, clamped: f32, vel: f32) -> f32 {
    let outward = (clamped < raw && vel > 0.0) || (clamped > raw && vel < 0.0);
    if outward { -vel } else { vel }
}

/// Bounce only off the side and bottom edges
///
/// Used while an obstacle is still sliding in from above the field.
pub fn reflect_at_sides(pos: Vec2, vel: Vec2, field: Vec2, radius: f32) -> (Vec2, Vec2) {
    let r = radius_in_percent(radius, field);
    let mut pos = pos;
    let mut vel = vel;
    let max_x = (100.0 - r.x).max(50.0);
    let min_x = r.x.min(50.0);
    let clamped_x = pos.x.clamp(min_x, max_x);
    vel.x = reflect_axis(pos.x, clamped_x, vel.x);
    pos.x = clamped_x;
    let max_y = (100.0 - r.y).max(50.0);
    let clamped_y = pos.y.min(max_y);
    vel.y = reflect_axis(pos.y, clamped_y, vel.y);
    pos.y = clamped_y;
    (pos, vel)
}

/// Clamp a circle against the side and bottom edges only
///
/// Counterpart of [`clamp_to_bounds`] for obstacles still entering from above.
pub fn clamp_to_sides(pos: Vec2, field: Vec2, radius: f32) -> Vec2 {
    let r = radius_in_percent(radius, field);
    Vec2::new(
        pos.x.clamp(r.x.min(50.0), (100.0 - r.x).max(50.0)),
        pos.y.min((100.0 - r.y).max(50.0)),
    )
}

/// True when a circle touches or crosses any field edge
pub fn is_at_border(pos: Vec2, field: Vec2, radius: f32) -> bool {
    let r = radius_in_percent(radius, field);
    pos.x <= r.x || pos.x >= 100.0 - r.x || pos.y <= r.y || pos.y >= 100.0 - r.y
}

/// True when a circle lies fully inside the field
pub fn is_inside(pos: Vec2, field: Vec2, radius: f32) -> bool {
    let r = radius_in_percent(radius, field);
    pos.x >= r.x && pos.x <= 100.0 - r.x && pos.y >= r.y && pos.y <= 100.0 - r.y
}

/// Unit forward vector for a facing angle in degrees
///
/// 0° points up the screen `(0, -1)`, positive angles rotate clockwise.
#[inline]
pub fn angle_to_forward(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

/// Scale a physical speed along `direction` into a percent-space delta
///
/// Each axis is divided by its own field dimension, so a diagonal stays
/// diagonal on screen even when the field is not square.
#[inline]
pub fn pixel_velocity_to_percent(speed: f32, direction: Vec2, field: Vec2, dt: f32) -> Vec2 {
    direction * speed * dt / field * 100.0
}

/// Convert a pixel-space velocity vector into a percent delta over `dt`
#[inline]
pub fn px_velocity_to_percent_delta(vel: Vec2, field: Vec2, dt: f32) -> Vec2 {
    vel * dt / field * 100.0
}

/// Clamp each velocity component to `max`, replacing non-finite components with zero
pub fn sanitize_velocity(vel: Vec2, max: f32) -> Vec2 {
    let fix = |c: f32| if c.is_finite() { c.clamp(-max, max) } else { 0.0 };
    Vec2::new(fix(vel.x), fix(vel.y))
}
