// Particle simulation: seeds, fireflies, and drifting pieces.
//
// Motion runs on two cadences. The fast tick integrates continuous motion
// every `Msg::Tick` (wind, forces, damping, easing); the lifecycle tick runs
// once every `lifecycle_interval_ticks` fast ticks and handles discrete
// state: aging out, landed-seed rooting, flower seed emission, and
// dusk/night firefly spawning. Spawn chances and population ceilings bound
// both populations, so a long-running garden never accumulates particles
// without limit.
//
// Seed rooting is deliberately not a constant chance. The base chance is
// attenuated by proximity to the nearest plant root on the island and by an
// island plant cap, which keeps islands visually sparse instead of
// saturating. `rooting_probability` returns just the attenuation product so
// its monotonicity is testable in isolation.
//
// Everything here runs on a world the reducer has already cloned; per-entity
// updates clone the particle out, compute against `&World` reads, and write
// it back. The PRNG stream is consumed in `BTreeMap` id order.

use crate::entity::{Entity, NodeKind, Particle, ParticleKind, ParticleState, PlantNode};
use crate::forces::sample_pathway_force;
use crate::geom::{Vec2, angle_diff, wrap_angle};
use crate::prng::GardenRng;
use crate::types::{DayPhase, Id, IdClass};
use crate::world::World;
use std::f32::consts::TAU;

/// One fast tick: integrate motion for every particle and fade drifting
/// pieces. `dt` is the tick's timestep in seconds.
pub fn fast_tick(world: &mut World, dt: f32) {
    let mut rng = world.sim_rng.clone();
    let ids: Vec<Id> = world
        .entities
        .iter()
        .filter(|(_, e)| e.as_particle().is_some())
        .map(|(id, _)| *id)
        .collect();

    for id in ids {
        let Some(particle) = world.particle(id).cloned() else {
            continue;
        };
        let updated = match particle.kind {
            ParticleKind::Seed => seed_fast_tick(world, particle, dt, &mut rng),
            ParticleKind::Firefly => firefly_fast_tick(world, particle, dt, &mut rng),
        };
        world.entities.insert(id, Entity::Particle(updated));
    }

    // Drifting pieces: straight-line drift and opacity decay.
    let fade = world.config.drift.fade_per_tick;
    for piece in &mut world.drifting {
        piece.pos += piece.velocity * dt;
        piece.opacity -= fade;
    }
    world.drifting.retain(|piece| piece.opacity > 0.0);

    world.sim_rng = rng;
}

fn seed_fast_tick(world: &World, mut seed: Particle, dt: f32, rng: &mut GardenRng) -> Particle {
    if seed.state != ParticleState::Floating {
        return seed;
    }
    let params = &world.config.seeds;

    // Sinusoidal wind, phase-offset per particle so seeds don't march in
    // lockstep.
    let phase = world.elapsed_secs * params.wind_frequency + seed.id.index as f32 * 0.7;
    let wind = Vec2::new(phase.sin(), (phase * 0.5).cos() * 0.3) * params.wind_amplitude;
    let brownian = Vec2::new(rng.jitter(params.brownian), rng.jitter(params.brownian));
    // Gravity is a gentle settle toward the islands below (y-up axes).
    let gravity = Vec2::new(0.0, -params.gravity);
    let pathway = sample_pathway_force(seed.pos, world, &world.config.pathway_force)
        * params.pathway_multiplier;

    seed.velocity = ((seed.velocity + (wind + brownian + gravity + pathway) * dt)
        * params.damping)
        .clamp_length(params.max_speed);
    seed.pos += seed.velocity * dt;

    // Rotation tumbles at the spawn spin rate while easing toward the
    // velocity heading.
    seed.rotation = wrap_angle(seed.rotation + seed.angular_velocity * dt);
    if seed.velocity.length() > 1e-3 {
        let heading = seed.velocity.angle();
        seed.rotation += angle_diff(heading, seed.rotation) * params.rotation_ease;
    }

    // Landing: Bernoulli trial, only within a landing spot's radius.
    if let Some(spot) = nearest_landing_spot(world, seed.pos)
        && rng.chance(params.landing_chance)
    {
        seed.state = ParticleState::Landed;
        seed.landed_on = Some(spot);
        seed.velocity = Vec2::ZERO;
    }
    seed
}

fn firefly_fast_tick(world: &World, mut fly: Particle, dt: f32, rng: &mut GardenRng) -> Particle {
    let params = &world.config.fireflies;
    let phase = world.config.day_cycle.phase(world.day_fraction);

    // Glow eases toward its day-phase target regardless of motion state.
    let glow_target = match phase {
        DayPhase::Night => params.glow_night,
        DayPhase::Dusk => params.glow_dusk,
        DayPhase::Day | DayPhase::Dawn => params.glow_day,
    };
    fly.glow += (glow_target - fly.glow) * params.glow_ease;

    match fly.state {
        ParticleState::Floating => {
            // Attraction to glowing targets only matters when they glow.
            let attract = if matches!(phase, DayPhase::Dusk | DayPhase::Night) {
                nearest_glow_target(world, fly.pos)
                    .map(|target| {
                        let to = target - fly.pos;
                        if to.length() < params.orbit_radius {
                            to.normalize().perp() * params.orbit_strength
                        } else {
                            to.normalize() * params.attraction_strength
                        }
                    })
                    .unwrap_or(Vec2::ZERO)
            } else {
                Vec2::ZERO
            };
            let wander = Vec2::new(rng.jitter(params.wander), rng.jitter(params.wander));
            let pathway = sample_pathway_force(fly.pos, world, &world.config.pathway_force)
                * params.pathway_multiplier;

            fly.velocity = ((fly.velocity + (attract + wander + pathway) * dt) * params.damping)
                .clamp_length(params.max_speed);
            fly.pos += fly.velocity * dt;
            fly.rotation = wrap_angle(fly.rotation + fly.angular_velocity * dt);

            // Fireflies settle during the day.
            if phase == DayPhase::Day && rng.chance(params.landing_chance) {
                fly.state = ParticleState::Landed;
                fly.velocity = Vec2::ZERO;
            }
        }
        ParticleState::Landed | ParticleState::Rooting => {
            if matches!(phase, DayPhase::Dusk | DayPhase::Night)
                && rng.chance(params.takeoff_chance)
            {
                fly.state = ParticleState::Floating;
            }
        }
    }
    fly
}

/// One lifecycle tick: age everything out, root landed seeds, emit seeds
/// from flowers, spawn fireflies at dusk and night.
pub fn lifecycle_tick(world: &mut World) {
    let mut rng = world.sim_rng.clone();

    age_and_cull(world);
    root_landed_seeds(world, &mut rng);
    emit_flower_seeds(world, &mut rng);
    spawn_fireflies(world, &mut rng);

    world.sim_rng = rng;
}

fn age_and_cull(world: &mut World) {
    let seed_max = world.config.seeds.max_age;
    let fly_max = world.config.fireflies.max_age;
    let expired: Vec<Id> = world
        .entities
        .iter_mut()
        .filter_map(|(id, e)| {
            let particle = e.as_particle_mut()?;
            particle.age += 1;
            let max = match particle.kind {
                ParticleKind::Seed => seed_max,
                ParticleKind::Firefly => fly_max,
            };
            (particle.age > max).then_some(*id)
        })
        .collect();
    for id in expired {
        world.entities.remove(&id);
    }
}

fn root_landed_seeds(world: &mut World, rng: &mut GardenRng) {
    let rooting = world.config.rooting.clone();
    let landed: Vec<(Id, Vec2, Id)> = world
        .entities
        .values()
        .filter_map(Entity::as_particle)
        .filter(|p| {
            p.kind == ParticleKind::Seed
                && p.state == ParticleState::Landed
                && p.age >= rooting.min_age
        })
        .filter_map(|p| {
            let island = landing_island(world, p.landed_on?)?;
            Some((p.id, p.pos, island))
        })
        .collect();

    for (seed_id, world_pos, island_id) in landed {
        let Some(island_origin) = world.island_world_pos(island_id) else {
            continue;
        };
        let local = world_pos - island_origin;
        let p = rooting.base_chance * rooting_probability(world, island_id, local);
        if !rng.chance(p) {
            continue;
        }
        world.entities.remove(&seed_id);
        let angle = std::f32::consts::FRAC_PI_2 + rng.jitter(0.35);
        crate::growth::create_plant(world, island_id, local, angle, rng);
    }
}

fn emit_flower_seeds(world: &mut World, rng: &mut GardenRng) {
    let params = world.config.seeds.clone();
    let mut population = floating_count(world, ParticleKind::Seed);

    let flowers: Vec<Id> = world
        .entities
        .values()
        .filter_map(Entity::as_node)
        .filter(|n| n.kind == NodeKind::Flower)
        .map(|n| n.id)
        .collect();

    for flower in flowers {
        if population >= params.max_population {
            break;
        }
        if !rng.chance(params.flower_emit_chance) {
            continue;
        }
        let Some(pos) = world.node_world_pos(flower) else {
            continue;
        };
        let velocity = Vec2::from_angle(rng.range_f32(0.0, TAU)) * rng.range_f32(2.0, 8.0);
        spawn_particle(world, ParticleKind::Seed, pos, velocity, rng);
        population += 1;
    }
}

fn spawn_fireflies(world: &mut World, rng: &mut GardenRng) {
    let phase = world.config.day_cycle.phase(world.day_fraction);
    if !matches!(phase, DayPhase::Dusk | DayPhase::Night) {
        return;
    }
    let params = world.config.fireflies.clone();
    let mut population = world
        .entities
        .values()
        .filter_map(Entity::as_particle)
        .filter(|p| p.kind == ParticleKind::Firefly)
        .count();

    let rock_ids: Vec<Id> = world
        .entities
        .iter()
        .filter(|(_, e)| e.as_rock().is_some())
        .map(|(id, _)| *id)
        .collect();

    for rock_id in rock_ids {
        if population >= params.max_population {
            break;
        }
        if !rng.chance(params.spawn_chance) {
            continue;
        }
        let Some(pos) = world.rock_world_pos(rock_id) else {
            continue;
        };
        let velocity = Vec2::from_angle(rng.range_f32(0.0, TAU)) * rng.range_f32(4.0, 12.0);
        spawn_particle(world, ParticleKind::Firefly, pos, velocity, rng);
        population += 1;
    }
}

/// The rooting attenuation in [0, 1] — the product of the proximity and
/// crowding multipliers, without the base chance. Exactly 1.0 on an empty
/// island far from everything.
pub fn rooting_probability(world: &World, island_id: Id, local_pos: Vec2) -> f32 {
    let params = &world.config.rooting;

    // Proximity: linear ramp from the minimum multiplier at the nearest
    // plant root up to 1.0 at the falloff radius.
    let nearest = world
        .plants
        .values()
        .filter(|p| p.island_id == island_id)
        .filter_map(|p| world.node(p.root_id))
        .map(|root| root.pos.distance(local_pos))
        .min_by(f32::total_cmp);
    let proximity = match nearest {
        None => 1.0,
        Some(d) => {
            let t = (d / params.proximity_radius).clamp(0.0, 1.0);
            params.min_proximity_multiplier + (1.0 - params.min_proximity_multiplier) * t
        }
    };

    // Crowding: full chance well below the cap, halfway one below it,
    // floored at the crowded multiplier at or past it.
    let count = world.plant_count_on_island(island_id);
    let crowding = if count >= params.island_plant_cap {
        params.crowded_multiplier
    } else if count + 1 == params.island_plant_cap {
        (1.0 + params.crowded_multiplier) * 0.5
    } else {
        1.0
    };

    proximity * crowding
}

/// Nearest rock or island landing spot within its landing radius, if any.
fn nearest_landing_spot(world: &World, pos: Vec2) -> Option<Id> {
    let params = &world.config.seeds;
    let mut best: Option<(f32, Id)> = None;
    for (id, entity) in &world.entities {
        let (spot, radius) = match entity {
            Entity::Rock(_) => (world.rock_world_pos(*id), params.rock_landing_radius),
            Entity::Island(_) => (world.island_world_pos(*id), params.island_landing_radius),
            _ => continue,
        };
        let Some(spot) = spot else { continue };
        let d = spot.distance(pos);
        if d <= radius && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, *id));
        }
    }
    best.map(|(_, id)| id)
}

/// World position of the nearest glowing target: any flower, or any bud
/// charged past the firefly threshold.
fn nearest_glow_target(world: &World, pos: Vec2) -> Option<Vec2> {
    let threshold = world.config.fireflies.charge_threshold;
    let glows = |node: &PlantNode| match node.kind {
        NodeKind::Flower => true,
        NodeKind::Bud { charge } => charge > threshold,
        _ => false,
    };
    world
        .entities
        .values()
        .filter_map(Entity::as_node)
        .filter(|n| glows(n))
        .filter_map(|n| world.node_world_pos(n.id))
        .min_by(|a, b| a.distance(pos).total_cmp(&b.distance(pos)))
}

/// Floating particles of a given kind (population-cap accounting).
fn floating_count(world: &World, kind: ParticleKind) -> usize {
    world
        .entities
        .values()
        .filter_map(Entity::as_particle)
        .filter(|p| p.kind == kind && p.state == ParticleState::Floating)
        .count()
}

/// Resolve a landing target (rock or island) to its island.
fn landing_island(world: &World, landed_on: Id) -> Option<Id> {
    match world.entities.get(&landed_on)? {
        Entity::Rock(rock) => Some(rock.island_id),
        Entity::Island(island) => Some(island.id),
        _ => None,
    }
}

/// Insert a fresh floating particle into the entity map.
pub fn spawn_particle(
    world: &mut World,
    kind: ParticleKind,
    pos: Vec2,
    velocity: Vec2,
    rng: &mut GardenRng,
) -> Id {
    let id = world.allocator.alloc(IdClass::Particle);
    world.entities.insert(
        id,
        Entity::Particle(Particle {
            id,
            kind,
            state: ParticleState::Floating,
            pos,
            velocity,
            rotation: rng.range_f32(0.0, TAU),
            angular_velocity: rng.jitter(0.4),
            glow: 0.0,
            age: 0,
            landed_on: None,
        }),
    );
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GardenConfig;
    use crate::entity::{Island, Plant, PlantNode, Rock};
    use crate::geom::Vec2;
    use std::collections::BTreeMap;
    use std::f32::consts::PI;

    /// A world with a single island at the origin of a single cluster, plus
    /// one rock at the island center.
    fn island_world() -> (World, Id, Id) {
        let mut world = World::empty(0, GardenConfig::default());
        let cluster_id = world.allocator.alloc(IdClass::Cluster);
        let constellation_id = world.allocator.alloc(IdClass::Constellation);
        world.constellations.insert(
            constellation_id,
            crate::entity::Constellation {
                id: constellation_id,
                pos: Vec2::ZERO,
            },
        );
        world.clusters.insert(
            cluster_id,
            crate::entity::Cluster {
                id: cluster_id,
                constellation_id,
                pos: Vec2::ZERO,
                glyph: crate::types::GlyphKind::Spiral,
                rotation: 0.0,
            },
        );
        let island_id = world.allocator.alloc(IdClass::Island);
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
        let rock_id = world.allocator.alloc(IdClass::Rock);
        world.entities.insert(
            rock_id,
            Entity::Rock(Rock {
                id: rock_id,
                island_id,
                pos: Vec2::new(40.0, 0.0),
                boulders: Vec::new(),
                cracks: Vec::new(),
            }),
        );
        (world, island_id, rock_id)
    }

    fn add_plant_at(world: &mut World, island_id: Id, pos: Vec2) -> Id {
        let plant_id = world.allocator.alloc(IdClass::Plant);
        let root_id = world.allocator.alloc(IdClass::Node);
        world.entities.insert(
            root_id,
            Entity::Node(PlantNode {
                id: root_id,
                kind: NodeKind::Stem,
                pos,
                angle: PI / 2.0,
                depth: 0,
            }),
        );
        world.plants.insert(
            plant_id,
            Plant {
                id: plant_id,
                island_id,
                root_id,
                adjacency: BTreeMap::new(),
            },
        );
        world.index_node(root_id, plant_id);
        plant_id
    }

    #[test]
    fn rooting_probability_is_one_on_an_empty_distant_island() {
        let (world, island_id, _) = island_world();
        assert_eq!(
            rooting_probability(&world, island_id, Vec2::new(500.0, 500.0)),
            1.0
        );
    }

    #[test]
    fn rooting_probability_increases_with_distance_from_plants() {
        let (mut world, island_id, _) = island_world();
        add_plant_at(&mut world, island_id, Vec2::ZERO);

        let near = rooting_probability(&world, island_id, Vec2::new(5.0, 0.0));
        let mid = rooting_probability(&world, island_id, Vec2::new(40.0, 0.0));
        let far = rooting_probability(&world, island_id, Vec2::new(200.0, 0.0));
        assert!(near < mid);
        assert!(mid < far);
        assert_eq!(far, 1.0, "beyond the falloff radius there is no penalty");
        assert!(near >= world.config.rooting.min_proximity_multiplier);
    }

    #[test]
    fn rooting_probability_drops_when_crowded() {
        let (mut world, island_id, _) = island_world();
        let far = Vec2::new(500.0, 500.0);
        let cap = world.config.rooting.island_plant_cap;

        let mut last = rooting_probability(&world, island_id, far);
        for i in 0..cap {
            add_plant_at(&mut world, island_id, Vec2::new(-300.0 - i as f32 * 50.0, 0.0));
            let p = rooting_probability(&world, island_id, far);
            assert!(p <= last, "crowding must never increase rooting");
            last = p;
        }
        assert_eq!(last, world.config.rooting.crowded_multiplier);
    }

    #[test]
    fn floating_seed_moves_and_rotates() {
        let (mut world, _, _) = island_world();
        let mut rng = world.sim_rng.clone();
        let id = spawn_particle(
            &mut world,
            ParticleKind::Seed,
            Vec2::new(1000.0, 1000.0),
            Vec2::new(10.0, 0.0),
            &mut rng,
        );
        world.sim_rng = rng;
        let before = world.particle(id).unwrap().pos;

        fast_tick(&mut world, 0.05);
        let after = world.particle(id).unwrap();
        assert_ne!(after.pos, before);
        assert!(after.velocity.length() <= world.config.seeds.max_speed + 1e-3);
    }

    #[test]
    fn seed_lands_near_a_rock_with_certain_chance() {
        let (mut world, _, rock_id) = island_world();
        world.config.seeds.landing_chance = 1.0;
        let mut rng = world.sim_rng.clone();
        let id = spawn_particle(
            &mut world,
            ParticleKind::Seed,
            Vec2::new(45.0, 5.0),
            Vec2::ZERO,
            &mut rng,
        );
        world.sim_rng = rng;

        fast_tick(&mut world, 0.05);
        let seed = world.particle(id).unwrap();
        assert_eq!(seed.state, ParticleState::Landed);
        assert_eq!(seed.landed_on, Some(rock_id));
        assert_eq!(seed.velocity, Vec2::ZERO);
    }

    #[test]
    fn landed_seed_roots_into_a_two_node_plant() {
        let (mut world, island_id, rock_id) = island_world();
        world.config.rooting.base_chance = 1.0;
        world.config.rooting.min_age = 0;
        let mut rng = world.sim_rng.clone();
        let id = spawn_particle(
            &mut world,
            ParticleKind::Seed,
            Vec2::new(10.0, 0.0),
            Vec2::ZERO,
            &mut rng,
        );
        world.sim_rng = rng;
        {
            let seed = world
                .entities
                .get_mut(&id)
                .and_then(Entity::as_particle_mut)
                .unwrap();
            seed.state = ParticleState::Landed;
            seed.landed_on = Some(rock_id);
            seed.age = 10;
        }

        lifecycle_tick(&mut world);
        assert!(world.particle(id).is_none(), "rooted seed is consumed");
        assert_eq!(world.plant_count_on_island(island_id), 1);
        let plant = world.plants.values().next().unwrap();
        assert!(world.plant_is_valid_tree(plant.id));
        // Root stem plus first bud.
        assert_eq!(plant.children(plant.root_id).len(), 1);
    }

    #[test]
    fn particles_age_out() {
        let (mut world, _, _) = island_world();
        let mut rng = world.sim_rng.clone();
        let id = spawn_particle(
            &mut world,
            ParticleKind::Seed,
            Vec2::ZERO,
            Vec2::ZERO,
            &mut rng,
        );
        world.sim_rng = rng;
        world
            .entities
            .get_mut(&id)
            .and_then(Entity::as_particle_mut)
            .unwrap()
            .age = world.config.seeds.max_age;

        lifecycle_tick(&mut world);
        assert!(world.particle(id).is_none());
    }

    #[test]
    fn flowers_emit_seeds_up_to_the_population_cap() {
        let (mut world, island_id, _) = island_world();
        world.config.seeds.flower_emit_chance = 1.0;
        world.config.seeds.max_population = 3;

        // Five flowers on one plant.
        let plant_id = add_plant_at(&mut world, island_id, Vec2::ZERO);
        let root = world.plants[&plant_id].root_id;
        for i in 0..5 {
            crate::growth::attach_child(
                &mut world,
                plant_id,
                root,
                NodeKind::Flower,
                Vec2::new(i as f32 * 4.0, -10.0),
                PI / 2.0,
                1,
            );
        }

        lifecycle_tick(&mut world);
        assert_eq!(floating_count(&world, ParticleKind::Seed), 3);
        lifecycle_tick(&mut world);
        assert_eq!(
            floating_count(&world, ParticleKind::Seed),
            3,
            "cap holds on later ticks"
        );
    }

    #[test]
    fn fireflies_spawn_only_at_dusk_and_night() {
        let (mut world, _, _) = island_world();
        world.config.fireflies.spawn_chance = 1.0;

        world.day_fraction = 0.3; // day
        lifecycle_tick(&mut world);
        assert_eq!(floating_count(&world, ParticleKind::Firefly), 0);

        world.day_fraction = 0.8; // night
        lifecycle_tick(&mut world);
        assert!(floating_count(&world, ParticleKind::Firefly) > 0);
    }

    #[test]
    fn firefly_glow_eases_toward_the_phase_target() {
        let (mut world, _, _) = island_world();
        world.day_fraction = 0.8; // night
        let mut rng = world.sim_rng.clone();
        let id = spawn_particle(
            &mut world,
            ParticleKind::Firefly,
            Vec2::new(2000.0, 0.0),
            Vec2::ZERO,
            &mut rng,
        );
        world.sim_rng = rng;

        let mut last = world.particle(id).unwrap().glow;
        for _ in 0..20 {
            fast_tick(&mut world, 0.05);
            let glow = world.particle(id).unwrap().glow;
            assert!(glow >= last, "glow must rise toward the night target");
            last = glow;
        }
        assert!(last > 0.5);
    }

    #[test]
    fn floating_particles_spin_at_their_angular_velocity() {
        let (mut world, _, _) = island_world();
        world.day_fraction = 0.3; // day: no glow attraction
        world.config.fireflies.wander = 0.0;
        world.config.fireflies.landing_chance = 0.0;
        let mut rng = world.sim_rng.clone();
        let id = spawn_particle(
            &mut world,
            ParticleKind::Firefly,
            Vec2::new(2000.0, 0.0),
            Vec2::ZERO,
            &mut rng,
        );
        world.sim_rng = rng;
        {
            let fly = world
                .entities
                .get_mut(&id)
                .and_then(Entity::as_particle_mut)
                .unwrap();
            fly.rotation = 0.0;
            fly.angular_velocity = 1.5;
        }

        fast_tick(&mut world, 0.05);
        let fly = world.particle(id).unwrap();
        assert!((fly.rotation - 1.5 * 0.05).abs() < 1e-4);
    }

    #[test]
    fn drifting_pieces_fade_and_disappear() {
        let (mut world, _, _) = island_world();
        world.drifting.push(crate::entity::DriftingPiece {
            id: world.allocator.alloc(IdClass::Piece),
            node: PlantNode {
                id: Id {
                    class: IdClass::Node,
                    index: 999,
                },
                kind: NodeKind::Leaf,
                pos: Vec2::ZERO,
                angle: 0.0,
                depth: 3,
            },
            pos: Vec2::ZERO,
            velocity: Vec2::new(10.0, 0.0),
            opacity: 0.05,
        });

        fast_tick(&mut world, 0.05);
        assert_eq!(world.drifting.len(), 1);
        assert!(world.drifting[0].opacity < 0.05);
        fast_tick(&mut world, 0.05);
        fast_tick(&mut world, 0.05);
        assert!(world.drifting.is_empty());
    }

    #[test]
    fn fast_tick_is_deterministic() {
        let (mut world, _, _) = island_world();
        let mut rng = world.sim_rng.clone();
        for i in 0..6 {
            spawn_particle(
                &mut world,
                if i % 2 == 0 {
                    ParticleKind::Seed
                } else {
                    ParticleKind::Firefly
                },
                Vec2::new(i as f32 * 37.0, -20.0),
                Vec2::new(3.0, -1.0),
                &mut rng,
            );
        }
        world.sim_rng = rng;

        let mut a = world.clone();
        let mut b = world.clone();
        for _ in 0..10 {
            fast_tick(&mut a, 0.05);
            fast_tick(&mut b, 0.05);
        }
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }

}
