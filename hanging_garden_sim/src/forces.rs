// Composable vector force fields.
//
// A force field is a pure function `(position, world) -> Vec2`. Fields
// compose by vector summation and scalar scaling; the particle simulation
// samples them on demand. Only one field exists today — the pathway field —
// but seeds and fireflies blend it at different multipliers, which is why
// composition helpers live here rather than inline in `particles.rs`.
//
// The pathway field models attraction/flow along inter-cluster pathway
// segments. For a query point: project onto each segment; beyond
// `max_distance` the segment contributes exactly nothing; otherwise blend an
// attraction component (toward the closest point) with a flow component
// (along the segment, signed by the pathway's direction tag). Strength falls
// off with a cubic of normalized distance, so influence is sharply
// concentrated near the line. None of this is physical — the falloff and
// weights are tuned for how seed streams look.

use crate::config::PathwayForceParams;
use crate::geom::{Vec2, project_onto_segment};
use crate::types::PathwayDirection;
use crate::world::World;

/// Sum a set of sampled forces.
pub fn combine_forces(forces: &[Vec2]) -> Vec2 {
    forces.iter().fold(Vec2::ZERO, |acc, f| acc + *f)
}

/// Scale a sampled force.
pub fn scale_force(force: Vec2, factor: f32) -> Vec2 {
    force * factor
}

/// Sample the pathway force field at a world-space position.
///
/// Returns the exact zero vector when every pathway segment is farther than
/// `params.max_distance` (or when endpoints can't be resolved).
pub fn sample_pathway_force(pos: Vec2, world: &World, params: &PathwayForceParams) -> Vec2 {
    let mut total = Vec2::ZERO;

    for pathway in world.pathways.values() {
        let (Some(from), Some(to)) = (
            world.cluster_world_pos(pathway.from_cluster),
            world.cluster_world_pos(pathway.to_cluster),
        ) else {
            continue;
        };

        let proj = project_onto_segment(pos, from, to);
        if proj.distance > params.max_distance {
            continue;
        }

        let falloff = (1.0 - proj.distance / params.max_distance)
            .max(0.0)
            .powi(params.falloff_exponent);

        let attraction = (proj.point - pos).normalize() * params.attraction_weight;

        let along = (to - from).normalize();
        let flow_dir = match pathway.direction {
            PathwayDirection::Forward => along,
            PathwayDirection::Backward => -along,
            // Bidirectional flows toward whichever endpoint is nearer in t.
            PathwayDirection::Bidirectional => {
                if proj.t < 0.5 {
                    -along
                } else {
                    along
                }
            }
        };
        let flow = flow_dir * params.direction_weight;

        total += (attraction + flow) * (params.strength * falloff);
    }

    total
}
