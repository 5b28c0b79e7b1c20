//! Contact classification: which touching surfaces count as ground, which as steep walls.

use bevy::prelude::*;

use crate::layers::{Layer, LayerMask};

/// Contacts whose alignment with up is at or below this are overhangs/ceilings.
const MIN_STEEP_DOT: f32 = -0.01;

/// One touching contact point reported by the physics engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactSample {
    /// Surface normal, pointing from the surface toward the character.
    pub normal: Vec3,
    /// Layer of the surface that was touched.
    pub layer: Layer,
}

impl ContactSample {
    pub fn new(normal: Vec3, layer: Layer) -> Self {
        Self { normal, layer }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    Ground,
    Steep,
    Ignored,
}

/// Walkable slope thresholds, stored as cosines so classification is a single dot product.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopeLimits {
    pub min_ground_dot: f32,
    pub min_stairs_dot: f32,
    pub stairs_mask: LayerMask,
}

impl SlopeLimits {
    /// Build from maximum slope angles in degrees.
    pub fn from_angles(max_ground_angle: f32, max_stairs_angle: f32, stairs_mask: LayerMask) -> Self {
        Self {
            min_ground_dot: max_ground_angle.to_radians().cos(),
            min_stairs_dot: max_stairs_angle.to_radians().cos(),
            stairs_mask,
        }
    }

    #[inline]
    pub fn min_dot(&self, layer: Layer) -> f32 {
        if self.stairs_mask.contains(layer) {
            self.min_stairs_dot
        } else {
            self.min_ground_dot
        }
    }

    pub fn classify(&self, up: Vec3, contact: &ContactSample) -> SurfaceKind {
        let up_dot = up.dot(contact.normal);
        if up_dot >= self.min_dot(contact.layer) {
            SurfaceKind::Ground
        } else if up_dot > MIN_STEEP_DOT {
            SurfaceKind::Steep
        } else {
            SurfaceKind::Ignored
        }
    }
}

/// Per-step contact accumulators.
///
/// Normals are summed unnormalized; a single contact's normal is already the surface
/// normal, several are averaged by normalizing the sum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactState {
    pub ground_count: u32,
    pub ground_normal: Vec3,
    pub steep_count: u32,
    pub steep_normal: Vec3,
}

impl ContactState {
    /// Bucket a step's raw contacts relative to `up`.
    pub fn classify(contacts: &[ContactSample], up: Vec3, limits: &SlopeLimits) -> Self {
        let mut state = Self::default();
        for contact in contacts {
            state.accumulate(contact, up, limits);
        }
        state
    }

    pub fn accumulate(&mut self, contact: &ContactSample, up: Vec3, limits: &SlopeLimits) -> SurfaceKind {
        let kind = limits.classify(up, contact);
        match kind {
            SurfaceKind::Ground => {
                self.ground_count += 1;
                self.ground_normal += contact.normal;
            }
            SurfaceKind::Steep => {
                self.steep_count += 1;
                self.steep_normal += contact.normal;
            }
            SurfaceKind::Ignored => {}
        }
        kind
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.ground_count > 0
    }

    #[inline]
    pub fn on_steep(&self) -> bool {
        self.steep_count > 0
    }

    /// Several steep contacts can together form walkable ground, e.g. a narrow crevasse.
    ///
    /// Normalizes the steep sum and, if the average passes `min_ground_dot`, turns it into
    /// a single synthetic ground contact. A sum that cancels out is left as is.
    pub fn promote_steep_to_ground(&mut self, up: Vec3, min_ground_dot: f32) -> bool {
        if self.steep_count <= 1 {
            return false;
        }
        // Walls facing each other cancel out and form no floor.
        let Some(average) = self.steep_normal.try_normalize() else {
            return false;
        };
        self.steep_normal = average;
        if up.dot(self.steep_normal) >= min_ground_dot {
            self.ground_count = 1;
            self.ground_normal = self.steep_normal;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> SlopeLimits {
        SlopeLimits::from_angles(25.0, 50.0, LayerMask::from_layers(&[Layer::STAIRS]))
    }

    fn slope_normal(angle_deg: f32) -> Vec3 {
        let a = angle_deg.to_radians();
        Vec3::new(a.sin(), a.cos(), 0.0)
    }

    #[test]
    fn test_threshold_is_inclusive_to_ground() {
        let limits = limits();
        for up in [Vec3::Y, Vec3::X, Vec3::new(1.0, 1.0, -1.0).normalize()] {
            // Build a normal whose dot with up is exactly the threshold.
            let tangent = up.any_orthonormal_vector();
            let cos = limits.min_ground_dot;
            let normal = up * cos + tangent * (1.0 - cos * cos).sqrt();
            let contact = ContactSample {
                normal,
                layer: Layer::DEFAULT,
            };
            // Recompute with the exact dot so rounding cannot push us across the line.
            let exact = SlopeLimits {
                min_ground_dot: up.dot(normal),
                ..limits
            };
            assert_eq!(exact.classify(up, &contact), SurfaceKind::Ground);
        }
    }

    #[test]
    fn test_slopes_bucket_by_angle() {
        let limits = limits();
        let ground = ContactSample::new(slope_normal(20.0), Layer::DEFAULT);
        let steep = ContactSample::new(slope_normal(40.0), Layer::DEFAULT);
        let wall = ContactSample::new(Vec3::X, Layer::DEFAULT);
        let ceiling = ContactSample::new(Vec3::NEG_Y, Layer::DEFAULT);

        assert_eq!(limits.classify(Vec3::Y, &ground), SurfaceKind::Ground);
        assert_eq!(limits.classify(Vec3::Y, &steep), SurfaceKind::Steep);
        assert_eq!(limits.classify(Vec3::Y, &wall), SurfaceKind::Steep);
        assert_eq!(limits.classify(Vec3::Y, &ceiling), SurfaceKind::Ignored);
    }

    #[test]
    fn test_stairs_accept_steeper_slopes() {
        let limits = limits();
        let on_ground_layer = ContactSample::new(slope_normal(40.0), Layer::DEFAULT);
        let on_stairs_layer = ContactSample::new(slope_normal(40.0), Layer::STAIRS);
        assert_eq!(limits.classify(Vec3::Y, &on_ground_layer), SurfaceKind::Steep);
        assert_eq!(limits.classify(Vec3::Y, &on_stairs_layer), SurfaceKind::Ground);
    }

    #[test]
    fn test_classify_sums_normals() {
        let contacts = [
            ContactSample::new(slope_normal(10.0), Layer::DEFAULT),
            ContactSample::new(slope_normal(-10.0), Layer::DEFAULT),
            ContactSample::new(Vec3::X, Layer::DEFAULT),
            ContactSample::new(Vec3::NEG_Y, Layer::DEFAULT),
        ];
        let state = ContactState::classify(&contacts, Vec3::Y, &limits());
        assert_eq!(state.ground_count, 2);
        assert_eq!(state.steep_count, 1);
        // Sum is unnormalized: two ~unit normals add up to nearly 2 along up.
        assert!(state.ground_normal.y > 1.9);
        assert!(state.ground_normal.x.abs() < 1e-5);
        assert!(state.on_ground());
    }

    #[test]
    fn test_flat_groove_is_not_promoted() {
        let mut state = ContactState {
            steep_count: 2,
            steep_normal: Vec3::new(0.9, 0.1, 0.0) + Vec3::new(0.9, -0.1, 0.0),
            ..Default::default()
        };
        let min_ground_dot = 25.0_f32.to_radians().cos();
        assert!(!state.promote_steep_to_ground(Vec3::Y, min_ground_dot));
        assert_eq!(state.ground_count, 0);
        assert!((state.steep_normal - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_v_groove_is_promoted() {
        let left = slope_normal(-60.0);
        let right = slope_normal(60.0);
        let mut state = ContactState {
            steep_count: 2,
            steep_normal: left + right,
            ..Default::default()
        };
        assert!(state.promote_steep_to_ground(Vec3::Y, limits().min_ground_dot));
        assert_eq!(state.ground_count, 1);
        assert!((state.ground_normal - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_single_steep_contact_never_promoted() {
        let mut state = ContactState {
            steep_count: 1,
            steep_normal: Vec3::Y,
            ..Default::default()
        };
        assert!(!state.promote_steep_to_ground(Vec3::Y, 0.9));
    }

    #[test]
    fn test_facing_walls_are_not_promoted() {
        let limits = limits();
        let contacts = [
            ContactSample::new(Vec3::X, Layer::DEFAULT),
            ContactSample::new(Vec3::NEG_X, Layer::DEFAULT),
        ];
        let mut state = ContactState::classify(&contacts, Vec3::Y, &limits);
        assert_eq!(state.steep_count, 2);
        assert!(!state.promote_steep_to_ground(Vec3::Y, limits.min_ground_dot));
        assert!(!state.on_ground());
    }
}
