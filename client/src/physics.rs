//! Rapier bridge
//!
//! Turns rapier contact manifolds into [`ContactSample`]s and answers the sim's ray and
//! box casts with rapier scene queries. Collision layers map 1:1 onto rapier groups.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use sim::{BoxHit, ContactSample, Layer, LayerMask, PhysicsQueries, RayHit};

/// Box casts need some thickness; the camera's near-plane rectangle is flat.
const MIN_CAST_HALF_DEPTH: f32 = 0.01;

/// Collision layer of a collider entity. Colliders without one are on `Layer::DEFAULT`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceLayer(pub Layer);

/// Rapier membership for a layer. Everything collides with everything; filtering
/// happens per query.
pub fn collision_groups(layer: Layer) -> CollisionGroups {
    CollisionGroups::new(Group::from_bits_truncate(layer.bit()), Group::ALL)
}

fn query_filter(mask: LayerMask) -> QueryFilter<'static> {
    QueryFilter::new().groups(CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask.bits())))
}

/// Collect one sample per active contact manifold touching `body`.
///
/// Rapier reports manifold normals pointing from the first collider to the second; the
/// sim wants normals pointing away from the other surface, into the body.
pub fn gather_contacts(
    context: &RapierContext,
    body: Entity,
    layer_of: impl Fn(Entity) -> Layer,
) -> Vec<ContactSample> {
    let mut samples = Vec::new();
    for pair in context.contact_pairs_with(body) {
        if !pair.has_any_active_contact() {
            continue;
        }
        let (Some(first), Some(second)) = (pair.collider1(), pair.collider2()) else {
            continue;
        };
        let (other, sign) = if first == body { (second, -1.0) } else { (first, 1.0) };
        let layer = layer_of(other);

        for manifold in pair.manifolds() {
            if manifold.num_points() == 0 {
                continue;
            }
            let normal = (manifold.normal() * sign).normalize_or_zero();
            if normal != Vec3::ZERO {
                samples.push(ContactSample::new(normal, layer));
            }
        }
    }
    samples
}

/// [`PhysicsQueries`] over the live rapier scene.
pub struct RapierQueries<'a, 'w, F> {
    pub context: &'a RapierContext<'w>,
    pub layer_of: F,
}

impl<F: Fn(Entity) -> Layer> PhysicsQueries for RapierQueries<'_, '_, F> {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let (entity, hit) =
            self.context
                .cast_ray_and_get_normal(origin, direction, max_distance, true, query_filter(mask))?;
        Some(RayHit {
            normal: hit.normal,
            distance: hit.time_of_impact,
            layer: (self.layer_of)(entity),
        })
    }

    fn boxcast(
        &self,
        origin: Vec3,
        half_extents: Vec3,
        direction: Vec3,
        orientation: Quat,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<BoxHit> {
        let shape = Collider::cuboid(
            half_extents.x,
            half_extents.y,
            half_extents.z.max(MIN_CAST_HALF_DEPTH),
        );
        let options = ShapeCastOptions::with_max_time_of_impact(max_distance);
        let (_, hit) = self
            .context
            .cast_shape(origin, orientation, direction, &*shape.raw, options, query_filter(mask))?;
        Some(BoxHit {
            distance: hit.time_of_impact,
        })
    }
}
