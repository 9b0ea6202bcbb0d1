// Plant edit operations: sprout, prune, branch, cut, graft, release.
//
// Every operation takes a `&World` snapshot and an id, validates its
// preconditions, and returns `Some(new_world)` on success or `None` as the
// failure sentinel — wrong node kind, missing plant, targeting a root, or
// bad carried state all degrade to a no-op at the reducer. Nothing here
// mutates the input snapshot.
//
// Preconditions, per operation:
// - sprout: target is a bud.
// - prune / cut: target is not the plant's root (roots are anchored).
// - branch: target is a stem.
// - cut: nothing already carried.
// - graft: something carried, and the target is a stem.
// - release: something carried.
//
// Prune and cut share descendant collection: a breadth-first walk of the
// adjacency map from the target, root first. Cut packages the collected
// subtree into a `CarriedSubtree` instead of discarding it; graft merges a
// carried subtree back in under a stem, recomputing depths relative to the
// new parent.

use crate::entity::{CarriedSubtree, DriftingPiece, Entity, Plant, PlantNode};
use crate::geom::Vec2;
use crate::growth;
use crate::types::{Id, IdClass};
use crate::world::World;
use std::collections::BTreeMap;
use std::f32::consts::TAU;

/// Apply the growth rule to a bud. `None` if the target is not a bud.
pub fn sprout(world: &World, bud_id: Id) -> Option<World> {
    let plant_id = world.plant_of_node(bud_id)?;
    if !world.node(bud_id)?.kind.is_bud() {
        return None;
    }
    let mut next = world.clone();
    let mut rng = next.sim_rng.clone();
    let grew = growth::grow_bud(&mut next, plant_id, bud_id, &mut rng);
    next.sim_rng = rng;
    grew.then_some(next)
}

/// Remove a node and its whole descendant subtree. `None` when targeting
/// the plant's root.
pub fn prune(world: &World, node_id: Id) -> Option<World> {
    let plant_id = world.plant_of_node(node_id)?;
    let plant = world.plants.get(&plant_id)?;
    if node_id == plant.root_id {
        return None;
    }
    let ids = subtree_ids(plant, node_id);

    let mut next = world.clone();
    remove_subtree(&mut next, plant_id, &ids);
    Some(next)
}

/// Add one bud child to a stem via the angle-gap heuristic. `None` if the
/// target is not a stem.
pub fn branch(world: &World, stem_id: Id) -> Option<World> {
    let plant_id = world.plant_of_node(stem_id)?;
    let mut next = world.clone();
    let mut rng = next.sim_rng.clone();
    let added = growth::add_branch_bud(&mut next, plant_id, stem_id, &mut rng);
    next.sim_rng = rng;
    added.map(|_| next)
}

/// Detach a subtree into carried state. `None` when targeting the root or
/// while already carrying.
pub fn cut(world: &World, node_id: Id) -> Option<World> {
    if world.carried.is_some() {
        return None;
    }
    let plant_id = world.plant_of_node(node_id)?;
    let plant = world.plants.get(&plant_id)?;
    if node_id == plant.root_id {
        return None;
    }
    let ids = subtree_ids(plant, node_id);

    let nodes: Vec<PlantNode> = ids
        .iter()
        .filter_map(|id| world.node(*id).cloned())
        .collect();
    if nodes.len() != ids.len() {
        return None; // dangling reference; refuse to stage a broken subtree
    }
    let adjacency: BTreeMap<_, _> = ids
        .iter()
        .filter_map(|id| plant.adjacency.get(id).map(|c| (*id, c.clone())))
        .collect();

    let mut next = world.clone();
    remove_subtree(&mut next, plant_id, &ids);
    next.carried = Some(CarriedSubtree {
        root_id: node_id,
        nodes,
        adjacency,
    });
    Some(next)
}

/// Merge the carried subtree in under a stem. `None` when nothing is
/// carried or the target is not a stem.
pub fn graft(world: &World, target_id: Id) -> Option<World> {
    let carried = world.carried.as_ref()?;
    let plant_id = world.plant_of_node(target_id)?;
    let target = world.node(target_id)?;
    if !target.kind.is_stem() {
        return None;
    }

    // Nudge the subtree off the target so the graft seam is visible.
    let nudge = Vec2::from_angle(target.angle) * world.config.growth.min_segment_length;
    let old_root_pos = carried.nodes.first()?.pos;
    let shift = target.pos + nudge - old_root_pos;

    // Depths are relative to the carried root, re-based under the target.
    let mut rel_depth: BTreeMap<Id, u32> = BTreeMap::new();
    rel_depth.insert(carried.root_id, 0);
    let mut queue = vec![carried.root_id];
    while let Some(id) = queue.pop() {
        let d = rel_depth[&id];
        if let Some(children) = carried.adjacency.get(&id) {
            for child in children {
                rel_depth.insert(*child, d + 1);
                queue.push(*child);
            }
        }
    }

    let base_depth = target.depth + 1;
    let mut next = world.clone();
    let carried = next.carried.take()?;
    for node in &carried.nodes {
        let mut node = node.clone();
        node.pos += shift;
        node.depth = base_depth + rel_depth.get(&node.id).copied().unwrap_or(0);
        next.index_node(node.id, plant_id);
        next.entities.insert(node.id, Entity::Node(node));
    }
    if let Some(plant) = next.plants.get_mut(&plant_id) {
        for (parent, children) in carried.adjacency {
            plant.adjacency.insert(parent, children);
        }
        plant
            .adjacency
            .entry(target_id)
            .or_default()
            .push(carried.root_id);
    }
    Some(next)
}

/// Release the carried subtree into the void as fading drifting pieces.
/// `None` when nothing is carried.
pub fn release(world: &World, pos: Vec2) -> Option<World> {
    world.carried.as_ref()?;

    let mut next = world.clone();
    let carried = next.carried.take()?;
    let mut rng = next.sim_rng.clone();
    let root_pos = match carried.nodes.first() {
        Some(root) => root.pos,
        None => Vec2::ZERO,
    };
    let speed = next.config.drift.release_speed;

    for node in carried.nodes {
        let rel = node.pos - root_pos;
        let dir = if rel.length() > 1e-3 {
            rel.normalize()
        } else {
            Vec2::from_angle(rng.range_f32(0.0, TAU))
        };
        let id = next.allocator.alloc(IdClass::Piece);
        next.drifting.push(DriftingPiece {
            id,
            pos: pos + rel,
            velocity: dir * speed,
            opacity: 1.0,
            node,
        });
    }
    next.sim_rng = rng;
    Some(next)
}

/// Breadth-first descendant collection, the target itself first.
fn subtree_ids(plant: &Plant, root: Id) -> Vec<Id> {
    let mut ids = vec![root];
    let mut i = 0;
    while i < ids.len() {
        ids.extend_from_slice(plant.children(ids[i]));
        i += 1;
    }
    ids
}

/// Remove a collected subtree from the plant's adjacency, the entity map,
/// and the reverse index. `ids[0]` is the subtree root.
fn remove_subtree(world: &mut World, plant_id: Id, ids: &[Id]) {
    if let Some(plant) = world.plants.get_mut(&plant_id) {
        let root = ids[0];
        for children in plant.adjacency.values_mut() {
            children.retain(|c| *c != root);
        }
        for id in ids {
            plant.adjacency.remove(id);
        }
    }
    for id in ids {
        world.entities.remove(id);
        world.unindex_node(*id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GardenConfig;
    use crate::entity::{Island, NodeKind};
    use crate::growth::attach_child;
    use std::f32::consts::PI;

    /// A world with one island and one hand-built plant:
    ///
    /// root(stem) ── a(stem) ── b(bud)
    ///            │          └ c(leaf)
    ///            └ d(bud)
    fn fixture() -> (World, Id, [Id; 5]) {
        let mut world = World::empty(0, GardenConfig::default());
        let island_id = world.allocator.alloc(IdClass::Island);
        let cluster_id = world.allocator.alloc(IdClass::Cluster);
        world.entities.insert(
            island_id,
            Entity::Island(Island {
                id: island_id,
                cluster_id,
                pos: Vec2::ZERO,
                radius: 80.0,
                outline: Vec::new(),
            }),
        );

        let plant_id = world.allocator.alloc(IdClass::Plant);
        let root = world.allocator.alloc(IdClass::Node);
        world.entities.insert(
            root,
            Entity::Node(PlantNode {
                id: root,
                kind: NodeKind::Stem,
                pos: Vec2::ZERO,
                angle: PI / 2.0,
                depth: 0,
            }),
        );
        world.plants.insert(
            plant_id,
            Plant {
                id: plant_id,
                island_id,
                root_id: root,
                adjacency: BTreeMap::new(),
            },
        );
        world.index_node(root, plant_id);

        let up = PI / 2.0;
        let a = attach_child(
            &mut world,
            plant_id,
            root,
            NodeKind::Stem,
            Vec2::new(0.0, 20.0),
            up,
            1,
        );
        let b = attach_child(
            &mut world,
            plant_id,
            a,
            NodeKind::Bud { charge: 0.5 },
            Vec2::new(0.0, 38.0),
            up,
            2,
        );
        let c = attach_child(
            &mut world,
            plant_id,
            a,
            NodeKind::Leaf,
            Vec2::new(8.0, 32.0),
            up - 0.9,
            2,
        );
        let d = attach_child(
            &mut world,
            plant_id,
            root,
            NodeKind::Bud { charge: 0.0 },
            Vec2::new(-8.0, 16.0),
            up + 0.8,
            1,
        );
        (world, plant_id, [root, a, b, c, d])
    }

    #[test]
    fn sprout_requires_a_bud() {
        let (world, _, [root, a, b, _, _]) = fixture();
        assert!(sprout(&world, root).is_none());
        assert!(sprout(&world, a).is_none());
        assert!(sprout(&world, b).is_some());
    }

    #[test]
    fn sprout_grows_in_place_and_leaves_the_snapshot_alone() {
        let (world, plant_id, [_, _, b, _, _]) = fixture();
        let before = world.entities.len();

        let next = sprout(&world, b).unwrap();
        assert!(next.entities.len() > before);
        assert!(!next.node(b).unwrap().kind.is_bud());
        assert!(next.plant_is_valid_tree(plant_id));

        // The input snapshot is untouched.
        assert_eq!(world.entities.len(), before);
        assert!(world.node(b).unwrap().kind.is_bud());
    }

    #[test]
    fn prune_refuses_the_root() {
        let (world, _, [root, ..]) = fixture();
        assert!(prune(&world, root).is_none());
    }

    #[test]
    fn prune_removes_exactly_the_subtree() {
        let (world, plant_id, [root, a, b, c, d]) = fixture();
        let next = prune(&world, a).unwrap();

        for gone in [a, b, c] {
            assert!(next.node(gone).is_none());
            assert!(next.plant_of_node(gone).is_none());
        }
        // The sibling subtree and root are untouched.
        assert!(next.node(root).is_some());
        assert!(next.node(d).is_some());
        let plant = &next.plants[&plant_id];
        assert_eq!(plant.children(root), &[d]);
        assert!(next.plant_is_valid_tree(plant_id));
    }

    #[test]
    fn branch_requires_a_stem() {
        let (world, _, [_, a, b, c, _]) = fixture();
        assert!(branch(&world, b).is_none());
        assert!(branch(&world, c).is_none());

        let next = branch(&world, a).unwrap();
        assert_eq!(next.plants.len(), world.plants.len());
        assert_eq!(next.entities.len(), world.entities.len() + 1);
        let new_children = next.plants.values().next().unwrap().children(a);
        assert_eq!(new_children.len(), 3);
    }

    #[test]
    fn cut_refuses_root_and_double_carry() {
        let (world, _, [root, a, _, _, d]) = fixture();
        assert!(cut(&world, root).is_none());

        let carrying = cut(&world, a).unwrap();
        assert!(carrying.carried.is_some());
        assert!(cut(&carrying, d).is_none());
    }

    #[test]
    fn cut_stages_the_whole_subtree() {
        let (world, plant_id, [_, a, b, c, _]) = fixture();
        let next = cut(&world, a).unwrap();

        let carried = next.carried.as_ref().unwrap();
        assert_eq!(carried.root_id, a);
        let mut staged: Vec<Id> = carried.nodes.iter().map(|n| n.id).collect();
        staged.sort();
        let mut expected = vec![a, b, c];
        expected.sort();
        assert_eq!(staged, expected);
        assert_eq!(carried.nodes[0].id, a, "subtree root comes first");

        for gone in [a, b, c] {
            assert!(next.node(gone).is_none());
        }
        assert!(next.plant_is_valid_tree(plant_id));

        // Carried state survives a save/load round trip intact.
        let reloaded = World::from_json(&next.to_json().unwrap()).unwrap();
        let carried = reloaded.carried.as_ref().unwrap();
        assert_eq!(carried.root_id, a);
        assert_eq!(carried.nodes.len(), 3);
    }

    #[test]
    fn graft_needs_carried_state_and_a_stem_target() {
        let (world, _, [_, a, b, _, d]) = fixture();
        assert!(graft(&world, a).is_none(), "nothing carried yet");

        let carrying = cut(&world, b).unwrap();
        assert!(graft(&carrying, d).is_none(), "bud is not a graft target");
        assert!(graft(&carrying, a).is_some());
    }

    #[test]
    fn graft_merges_and_rebases_depth() {
        let (world, plant_id, [root, a, b, c, _]) = fixture();
        let carrying = cut(&world, a).unwrap();
        let node_count = carrying.entities.len();

        let next = graft(&carrying, root).unwrap();
        assert!(next.carried.is_none());
        assert_eq!(next.entities.len(), node_count + 3);
        assert!(next.plant_is_valid_tree(plant_id));

        // The carried root re-parents under the target at depth target+1.
        assert_eq!(next.node(a).unwrap().depth, 1);
        assert_eq!(next.node(b).unwrap().depth, 2);
        assert_eq!(next.node(c).unwrap().depth, 2);
        assert!(next.plants[&plant_id].children(root).contains(&a));
        assert_eq!(next.plant_of_node(b), Some(plant_id));
    }

    #[test]
    fn graft_offsets_away_from_the_target() {
        let (world, _, [root, a, _, _, _]) = fixture();
        let carrying = cut(&world, a).unwrap();
        let next = graft(&carrying, root).unwrap();
        let target_pos = next.node(root).unwrap().pos;
        let grafted_pos = next.node(a).unwrap().pos;
        assert!(target_pos.distance(grafted_pos) > 1e-3);
    }

    #[test]
    fn release_turns_carried_nodes_into_drifting_pieces() {
        let (world, _, [_, a, _, _, _]) = fixture();
        assert!(release(&world, Vec2::ZERO).is_none(), "nothing carried");

        let carrying = cut(&world, a).unwrap();
        let at = Vec2::new(300.0, -50.0);
        let next = release(&carrying, at).unwrap();

        assert!(next.carried.is_none());
        assert_eq!(next.drifting.len(), 3);
        for piece in &next.drifting {
            assert_eq!(piece.opacity, 1.0);
            assert!(piece.velocity.length() > 0.0);
            assert!(piece.pos.distance(at) < 100.0);
        }
    }

    #[test]
    fn operations_preserve_the_tree_invariant() {
        let (world, plant_id, [_, a, b, _, d]) = fixture();
        let mut current = world;
        for step in 0..3 {
            if let Some(next) = sprout(&current, b) {
                current = next;
            }
            if let Some(next) = sprout(&current, d) {
                current = next;
            }
            if let Some(next) = branch(&current, a) {
                current = next;
            }
            assert!(
                current.plant_is_valid_tree(plant_id),
                "invariant broken at step {step}"
            );
        }
    }
}
