//! Small scalar/vector helpers shared by the controller and the camera.
//!
//! Angles in this module are degrees.

use bevy::prelude::*;

/// Move `current` toward `target` by at most `max_delta`.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Like [`move_towards`] but takes the short way around the circle.
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if -max_delta < delta && delta < max_delta {
        return target;
    }
    move_towards(current, current + delta, max_delta)
}

/// Wrap an angle into `[0, 360)`.
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Heading of a unit direction on the horizontal plane.
///
/// `direction.x` is the rightward component and `direction.y` the forward one.
/// 0° is straight ahead, angles grow clockwise when seen from above.
pub fn heading_angle(direction: Vec2) -> f32 {
    let angle = direction.y.clamp(-1.0, 1.0).acos().to_degrees();
    if direction.x < 0.0 {
        360.0 - angle
    } else {
        angle
    }
}

/// Project `direction` onto the plane with unit `normal` and renormalize.
///
/// A direction parallel to the normal has no in-plane part and projects to zero.
#[inline]
pub fn project_direction_on_plane(direction: Vec3, normal: Vec3) -> Vec3 {
    (direction - normal * direction.dot(normal)).normalize_or_zero()
}

/// Rotation from pitch/yaw orbit angles (degrees).
///
/// Pitch turns about the local right axis first (positive looks down), then yaw turns
/// about the local up axis (positive is clockwise seen from above).
pub fn orbit_rotation(angles: Vec2) -> Quat {
    Quat::from_rotation_y(-angles.y.to_radians()) * Quat::from_rotation_x(-angles.x.to_radians())
}
