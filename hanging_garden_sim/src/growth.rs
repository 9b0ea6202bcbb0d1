// The plant growth rule.
//
// There is exactly one growth rule in the system. The generator applies it
// repeatedly to seed initial plants; the reducer applies it once when a
// player sprouts a charged bud; auto-sprout applies it from the tick path.
// It is parameterized only by the bud's current depth and the PRNG stream
// passed in — generation uses the seeded generation stream, live sprouting
// uses the world's own stream.
//
// Rule, given a bud at depth d:
// - At depth >= `flower_min_depth`, the bud may instead terminally convert
//   to a flower (probability scales with depth, capped) — no children.
// - Otherwise the bud becomes a stem (same id, same depth) and extends a new
//   continuation bud at `angle + jitter`, with segment length tapering by
//   depth (the "bark taper").
// - A leaf may attach at an offset angle (more likely deeper).
// - A second "branch" bud may attach (less likely deeper) at an angle chosen
//   by the largest-gap heuristic below.
//
// Branch-angle selection searches the ±`branch_window` angular window around
// the stem's own growth angle for the largest gap between existing children
// and takes the gap midpoint plus jitter — keeping siblings from visually
// overlapping. A childless stem just picks a random side.
//
// See also: `gen.rs` (initial plant seeding), `actions.rs` (sprout/branch
// edits), `config.rs` for `GrowthParams`.

use crate::entity::{Entity, NodeKind, Plant, PlantNode};
use crate::geom::{Vec2, angle_diff};
use crate::prng::GardenRng;
use crate::types::{Id, IdClass};
use crate::world::World;

/// Apply the growth rule once to a bud. Returns `false` (and changes
/// nothing) if the target is missing or not a bud.
pub fn grow_bud(world: &mut World, plant_id: Id, bud_id: Id, rng: &mut GardenRng) -> bool {
    let Some(node) = world.node(bud_id) else {
        return false;
    };
    if !node.kind.is_bud() {
        return false;
    }
    let depth = node.depth;
    let pos = node.pos;
    let angle = node.angle;
    let params = world.config.growth.clone();

    // Terminal flower conversion — instead of stem + children.
    if depth >= params.flower_min_depth {
        let p = (params.flower_chance_per_depth * depth as f32).min(params.flower_chance_max);
        if rng.chance(p) {
            if let Some(node) = world.node_mut(bud_id) {
                node.kind = NodeKind::Flower;
            }
            return true;
        }
    }

    // Bud becomes a stem; same id, same depth.
    if let Some(node) = world.node_mut(bud_id) {
        node.kind = NodeKind::Stem;
    }

    let child_depth = depth + 1;
    let segment = (params.base_segment_length * params.length_taper.powi(child_depth as i32))
        .max(params.min_segment_length);

    // Continuation bud.
    let grow_angle = angle + rng.jitter(params.angle_jitter);
    let bud_pos = pos + Vec2::from_angle(grow_angle) * segment;
    attach_child(
        world,
        plant_id,
        bud_id,
        NodeKind::Bud { charge: 0.0 },
        bud_pos,
        grow_angle,
        child_depth,
    );

    // Optional leaf — more likely deeper.
    let leaf_p =
        (params.leaf_chance_base + params.leaf_chance_per_depth * depth as f32)
            .min(params.leaf_chance_max);
    if rng.chance(leaf_p) {
        let side = if rng.chance(0.5) { 1.0 } else { -1.0 };
        let leaf_angle = angle + side * params.leaf_offset_angle + rng.jitter(0.15);
        let leaf_pos = pos + Vec2::from_angle(leaf_angle) * (segment * 0.6);
        attach_child(
            world,
            plant_id,
            bud_id,
            NodeKind::Leaf,
            leaf_pos,
            leaf_angle,
            child_depth,
        );
    }

    // Optional second branch bud — less likely deeper.
    let branch_p = (params.branch_chance_base
        - params.branch_chance_decay_per_depth * depth as f32)
        .max(params.branch_chance_min);
    if rng.chance(branch_p) {
        add_branch_bud(world, plant_id, bud_id, rng);
    }

    true
}

/// Add one bud child to a stem at an angle chosen by the largest-gap
/// heuristic. Returns the new bud's id, or `None` if the target is not a
/// stem. Used by the growth rule and by the interactive branch action.
pub fn add_branch_bud(
    world: &mut World,
    plant_id: Id,
    stem_id: Id,
    rng: &mut GardenRng,
) -> Option<Id> {
    let stem = world.node(stem_id)?;
    if !stem.kind.is_stem() {
        return None;
    }
    let plant = world.plants.get(&plant_id)?;
    let angle = pick_branch_angle(world, plant, stem, rng);

    let depth = stem.depth + 1;
    let params = &world.config.growth;
    let segment = (params.base_segment_length * params.length_taper.powi(depth as i32))
        .max(params.min_segment_length);
    let pos = stem.pos + Vec2::from_angle(angle) * segment;

    Some(attach_child(
        world,
        plant_id,
        stem_id,
        NodeKind::Bud { charge: 0.0 },
        pos,
        angle,
        depth,
    ))
}

/// Largest-gap branch angle around a stem's growth direction.
pub fn pick_branch_angle(
    world: &World,
    plant: &Plant,
    stem: &PlantNode,
    rng: &mut GardenRng,
) -> f32 {
    let window = world.config.growth.branch_window;
    let jitter = world.config.growth.branch_angle_jitter;

    let mut offsets: Vec<f32> = plant
        .children(stem.id)
        .iter()
        .filter_map(|child| world.node(*child))
        .map(|child| angle_diff(child.angle, stem.angle))
        .filter(|offset| offset.abs() <= window)
        .collect();

    if offsets.is_empty() {
        // No children: pick a random side off the parent angle.
        let side = if rng.chance(0.5) { 1.0 } else { -1.0 };
        return stem.angle + side * rng.range_f32(0.5, 1.0);
    }

    offsets.sort_by(f32::total_cmp);

    // Scan gaps between consecutive occupied angles, window edges included.
    let mut prev = -window;
    let mut best_gap = 0.0;
    let mut best_mid = 0.0;
    for &offset in offsets.iter().chain(std::iter::once(&window)) {
        let gap = offset - prev;
        if gap > best_gap {
            best_gap = gap;
            best_mid = (prev + offset) * 0.5;
        }
        prev = offset;
    }

    stem.angle + best_mid + rng.jitter(jitter)
}

/// Insert a new node under `parent`, updating the entity map, the plant's
/// adjacency, and the reverse index together.
pub(crate) fn attach_child(
    world: &mut World,
    plant_id: Id,
    parent: Id,
    kind: NodeKind,
    pos: Vec2,
    angle: f32,
    depth: u32,
) -> Id {
    let id = world.allocator.alloc(IdClass::Node);
    world.entities.insert(
        id,
        Entity::Node(PlantNode {
            id,
            kind,
            pos,
            angle,
            depth,
        }),
    );
    if let Some(plant) = world.plants.get_mut(&plant_id) {
        plant.adjacency.entry(parent).or_default().push(id);
    }
    world.index_node(id, plant_id);
    id
}

/// Create a fresh two-node plant (root stem + first bud) anchored at an
/// island-local position. Shared by generation seeding and seed rooting.
pub fn create_plant(
    world: &mut World,
    island_id: Id,
    anchor: Vec2,
    angle: f32,
    rng: &mut GardenRng,
) -> Id {
    let plant_id = world.allocator.alloc(IdClass::Plant);
    let root_id = world.allocator.alloc(IdClass::Node);

    world.entities.insert(
        root_id,
        Entity::Node(PlantNode {
            id: root_id,
            kind: NodeKind::Stem,
            pos: anchor,
            angle,
            depth: 0,
        }),
    );
    world.plants.insert(
        plant_id,
        Plant {
            id: plant_id,
            island_id,
            root_id,
            adjacency: Default::default(),
        },
    );
    world.index_node(root_id, plant_id);

    // First bud extends straight out of the root.
    let params = &world.config.growth;
    let segment =
        (params.base_segment_length * params.length_taper).max(params.min_segment_length);
    let bud_angle = angle + rng.jitter(params.angle_jitter);
    let bud_pos = anchor + Vec2::from_angle(bud_angle) * segment;
    attach_child(
        world,
        plant_id,
        root_id,
        NodeKind::Bud { charge: 0.0 },
        bud_pos,
        bud_angle,
        1,
    );

    plant_id
}
