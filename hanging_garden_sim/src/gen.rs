// Procedural world generation.
//
// Generation is strictly staged on a single PRNG stream seeded from the
// world seed: constellations, then clusters, then pathways, then islands,
// then rocks, then initial plants. Within a stage every iteration runs in
// `BTreeMap` id order, so a given seed always consumes the stream in the
// same order and reproduces the same world bit-for-bit.
//
// The layout is hierarchical and parent-relative: constellations are flung
// around the origin, clusters spread within their constellation, islands sit
// on a polar ring around their cluster, rock formations sit inside their
// island, and plants root in rock cracks. Pathways are chosen by a
// distance-greedy pass with an angular-claim rejection rule (plus a small
// override chance and a random prune), then repaired so the main cluster is
// never isolated.
//
// Initial plants reuse the one growth rule from `growth.rs` — generation
// applies it a few passes up front, the live sim keeps applying it later.

use crate::config::GardenConfig;
use crate::entity::{Boulder, Cluster, Constellation, Entity, Island, Pathway, Rock};
use crate::geom::{Vec2, angle_diff};
use crate::growth;
use crate::prng::GardenRng;
use crate::types::{GlyphKind, Id, IdClass, PathwayDirection};
use crate::world::World;
use std::collections::BTreeMap;
use std::f32::consts::{PI, TAU};

/// Generate a world from a seed with the default configuration.
pub fn generate_world(seed: u32) -> World {
    generate_world_with_config(seed, GardenConfig::default())
}

/// Generate a world from a seed and an explicit configuration.
pub fn generate_world_with_config(seed: u32, config: GardenConfig) -> World {
    let mut world = World::empty(seed, config);
    let mut rng = GardenRng::new(seed);

    gen_constellations(&mut world, &mut rng);
    gen_clusters(&mut world, &mut rng);
    gen_pathways(&mut world, &mut rng);
    gen_islands(&mut world, &mut rng);
    gen_rocks(&mut world, &mut rng);
    gen_plants(&mut world, &mut rng);

    world
}

/// Stage 1: constellations. The first sits at the origin; the rest are
/// spread evenly around it with angular jitter.
fn gen_constellations(world: &mut World, rng: &mut GardenRng) {
    let params = world.config.r#gen.clone();
    for i in 0..params.constellation_count {
        let pos = if i == 0 {
            Vec2::ZERO
        } else {
            let spread = TAU / (params.constellation_count - 1).max(1) as f32;
            let angle = i as f32 * spread + rng.jitter(params.constellation_angle_jitter);
            let radius =
                rng.range_f32(params.constellation_min_radius, params.constellation_max_radius);
            Vec2::from_angle(angle) * radius
        };
        let id = world.allocator.alloc(IdClass::Constellation);
        world.constellations.insert(id, Constellation { id, pos });
    }
}

/// Stage 2: clusters. The first constellation hosts the main cluster at its
/// center plus a few extras; every other constellation gets exactly one
/// cluster at its center.
fn gen_clusters(world: &mut World, rng: &mut GardenRng) {
    let params = world.config.r#gen.clone();
    let constellations: Vec<(Id, Vec2)> = world
        .constellations
        .iter()
        .map(|(id, c)| (*id, c.pos))
        .collect();

    let mut main_cluster = None;
    for (i, (constellation_id, center)) in constellations.into_iter().enumerate() {
        let count = if i == 0 {
            1 + rng.range_u32(0, params.main_extra_clusters_max + 1)
        } else {
            1
        };
        for j in 0..count {
            let pos = if j == 0 {
                center
            } else {
                let angle = rng.range_f32(0.0, TAU);
                let spread = rng.range_f32(params.cluster_min_spread, params.cluster_max_spread);
                center + Vec2::from_angle(angle) * spread
            };
            let id = world.allocator.alloc(IdClass::Cluster);
            world.clusters.insert(
                id,
                Cluster {
                    id,
                    constellation_id,
                    pos,
                    glyph: GlyphKind::ALL[rng.index(GlyphKind::ALL.len())],
                    rotation: rng.range_f32(0.0, TAU),
                },
            );
            if i == 0 && j == 0 {
                main_cluster = Some(id);
            }
        }
    }
    if let Some(id) = main_cluster {
        world.main_cluster_id = id;
    }
}

/// Stage 3: pathways. Candidate edges are every same-constellation cluster
/// pair ordered by distance; an edge is rejected when its direction at either endpoint falls
/// within the angular claim of an edge already kept there (with a small
/// override chance), and kept edges may still be randomly pruned. A repair
/// step guarantees the main cluster keeps at least one pathway.
fn gen_pathways(world: &mut World, rng: &mut GardenRng) {
    let params = world.config.r#gen.clone();
    let clusters: Vec<(Id, Vec2, Id)> = world
        .clusters
        .iter()
        .map(|(id, c)| (*id, c.pos, c.constellation_id))
        .collect();

    // Pathways never cross constellations.
    let mut candidates: Vec<(f32, Id, Id)> = Vec::new();
    for (i, &(a, pa, ca)) in clusters.iter().enumerate() {
        for &(b, pb, cb) in &clusters[i + 1..] {
            if ca == cb {
                candidates.push((pa.distance(pb), a, b));
            }
        }
    }
    candidates.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)).then(x.2.cmp(&y.2)));

    // Directions already claimed at each cluster, in radians.
    let mut claimed: BTreeMap<Id, Vec<f32>> = BTreeMap::new();
    let pos_of: BTreeMap<Id, Vec2> = clusters.iter().map(|&(id, pos, _)| (id, pos)).collect();

    for (_, a, b) in candidates {
        let dir_ab = (pos_of[&b] - pos_of[&a]).angle();
        let dir_ba = (pos_of[&a] - pos_of[&b]).angle();

        let conflict = |at: Id, dir: f32, claimed: &BTreeMap<Id, Vec<f32>>| {
            claimed
                .get(&at)
                .is_some_and(|dirs| {
                    dirs.iter()
                        .any(|&d| angle_diff(dir, d).abs() < params.pathway_angle_claim)
                })
        };

        if (conflict(a, dir_ab, &claimed) || conflict(b, dir_ba, &claimed))
            && !rng.chance(params.pathway_claim_override_chance)
        {
            continue;
        }
        if rng.chance(params.pathway_prune_chance) {
            continue;
        }

        claimed.entry(a).or_default().push(dir_ab);
        claimed.entry(b).or_default().push(dir_ba);

        let direction = match rng.index(3) {
            0 => PathwayDirection::Forward,
            1 => PathwayDirection::Backward,
            _ => PathwayDirection::Bidirectional,
        };
        let id = world.allocator.alloc(IdClass::Pathway);
        world.pathways.insert(
            id,
            Pathway {
                id,
                from_cluster: a,
                to_cluster: b,
                direction,
            },
        );
    }

    // Repair: when the main constellation has siblings, the main cluster
    // must keep at least one pathway.
    let main = world.main_cluster_id;
    let main_constellation = world.clusters[&main].constellation_id;
    let main_connected = world
        .pathways
        .values()
        .any(|p| p.from_cluster == main || p.to_cluster == main);
    if !main_connected {
        let main_pos = pos_of[&main];
        let nearest = clusters
            .iter()
            .filter(|(id, _, c)| *id != main && *c == main_constellation)
            .min_by(|(_, a, _), (_, b, _)| {
                main_pos.distance(*a).total_cmp(&main_pos.distance(*b))
            })
            .map(|(id, _, _)| *id);
        if let Some(other) = nearest {
            let id = world.allocator.alloc(IdClass::Pathway);
            world.pathways.insert(
                id,
                Pathway {
                    id,
                    from_cluster: main,
                    to_cluster: other,
                    direction: PathwayDirection::Bidirectional,
                },
            );
        }
    }
}

/// Stage 4: islands on a polar ring around each cluster, with an organic
/// blob outline sampled per angular step.
fn gen_islands(world: &mut World, rng: &mut GardenRng) {
    let params = world.config.r#gen.clone();
    let cluster_ids: Vec<Id> = world.clusters.keys().copied().collect();

    for cluster_id in cluster_ids {
        let count =
            rng.range_u32(params.islands_per_cluster_min, params.islands_per_cluster_max + 1);
        for _ in 0..count {
            let angle = rng.range_f32(0.0, TAU);
            let ring = rng.range_f32(params.island_ring_min, params.island_ring_max);
            let radius = rng.range_f32(params.island_radius_min, params.island_radius_max);

            let samples = params.island_outline_samples;
            let outline = (0..samples)
                .map(|k| {
                    let a = k as f32 * TAU / samples as f32;
                    let r = radius * (1.0 + rng.jitter(params.island_outline_irregularity));
                    Vec2::from_angle(a) * r
                })
                .collect();

            let id = world.allocator.alloc(IdClass::Island);
            world.entities.insert(
                id,
                Entity::Island(Island {
                    id,
                    cluster_id,
                    pos: Vec2::from_angle(angle) * ring,
                    radius,
                    outline,
                }),
            );
        }
    }
}

/// Stage 5: rock formations. Each is a primary boulder plus 1–3 secondary
/// boulders scattered around it, with crack anchor points at the midpoints
/// between consecutive boulders.
fn gen_rocks(world: &mut World, rng: &mut GardenRng) {
    let params = world.config.r#gen.clone();
    let islands: Vec<(Id, f32)> = world
        .entities
        .iter()
        .filter_map(|(id, e)| e.as_island().map(|island| (*id, island.radius)))
        .collect();

    for (island_id, island_radius) in islands {
        let count = rng.range_u32(params.rocks_per_island_min, params.rocks_per_island_max + 1);
        for _ in 0..count {
            let angle = rng.range_f32(0.0, TAU);
            let dist = rng.range_f32(0.0, island_radius * 0.6);
            let pos = Vec2::from_angle(angle) * dist;

            let primary_size = rng.range_f32(params.boulder_size_min, params.boulder_size_max);
            let mut boulders = vec![Boulder {
                offset: Vec2::ZERO,
                size: primary_size,
                rotation: rng.range_f32(0.0, TAU),
                sides: rng.range_u32(5, 9),
                irregularity: rng.range_f32(0.1, 0.4),
            }];

            let secondaries =
                rng.range_u32(params.secondary_boulders_min, params.secondary_boulders_max + 1);
            for _ in 0..secondaries {
                let offset_angle = rng.range_f32(0.0, TAU);
                let offset_dist = rng.range_f32(primary_size * 0.6, primary_size * 1.2);
                boulders.push(Boulder {
                    offset: Vec2::from_angle(offset_angle) * offset_dist,
                    size: primary_size * rng.range_f32(0.45, 0.8),
                    rotation: rng.range_f32(0.0, TAU),
                    sides: rng.range_u32(5, 9),
                    irregularity: rng.range_f32(0.1, 0.4),
                });
            }

            // Cracks sit between consecutive boulders, island-local.
            let cracks = boulders
                .windows(2)
                .map(|pair| {
                    let mid = (pair[0].offset + pair[1].offset) * 0.5;
                    pos + mid + Vec2::new(rng.jitter(3.0), rng.jitter(3.0))
                })
                .collect();

            let id = world.allocator.alloc(IdClass::Rock);
            world.entities.insert(
                id,
                Entity::Rock(Rock {
                    id,
                    island_id,
                    pos,
                    boulders,
                    cracks,
                }),
            );
        }
    }
}

/// Stage 6: initial plants. Each rock may seed one plant in a crack — more
/// likely on the main cluster — grown a few passes by the shared rule.
fn gen_plants(world: &mut World, rng: &mut GardenRng) {
    let params = world.config.r#gen.clone();
    let rocks: Vec<(Id, Id, Vec2, Vec<Vec2>)> = world
        .entities
        .values()
        .filter_map(Entity::as_rock)
        .map(|rock| (rock.id, rock.island_id, rock.pos, rock.cracks.clone()))
        .collect();

    for (_, island_id, rock_pos, cracks) in rocks {
        let on_main = world
            .island(island_id)
            .is_some_and(|island| island.cluster_id == world.main_cluster_id);
        let chance = if on_main {
            params.plant_chance_main_cluster
        } else {
            params.plant_chance_elsewhere
        };
        if !rng.chance(chance) {
            continue;
        }

        let anchor = if cracks.is_empty() {
            rock_pos
        } else {
            cracks[rng.index(cracks.len())]
        };
        // Plants grow roughly upward out of the crack.
        let angle = PI / 2.0 + rng.jitter(0.35);
        let plant_id = growth::create_plant(world, island_id, anchor, angle, rng);

        let passes =
            rng.range_u32(params.initial_growth_passes_min, params.initial_growth_passes_max + 1);
        for _ in 0..passes {
            let buds: Vec<Id> = world
                .entities
                .values()
                .filter_map(Entity::as_node)
                .filter(|n| n.kind.is_bud() && world.plant_of_node(n.id) == Some(plant_id))
                .map(|n| n.id)
                .collect();
            for bud in buds {
                growth::grow_bud(world, plant_id, bud, rng);
            }
        }
    }
}
