// The reducer: one pure function from a message and a snapshot to the next
// snapshot.
//
// `update(msg, world)` is the only mutation surface of the simulation. Every
// branch either returns the input unchanged (the message had no effect) or
// builds a structurally new `World`; callers may keep old snapshots around
// and diff them against new ones.
//
// `Msg::Tick` is the heartbeat. It advances bud charges by a jittered
// increment, rolls at most one auto-sprout per tick among fully charged buds
// (bounding the rate of change), runs the particle fast tick, and runs the
// lifecycle tick every `lifecycle_interval_ticks` fast ticks.
// `Msg::DayCycleTick` advances the wrapped time-of-day fraction
// independently; both tick paths are no-ops while the day cycle is stopped.
//
// Edit messages delegate to `actions.rs`; a sentinel failure there means
// the original world comes back unchanged.

use crate::actions;
use crate::entity::{Entity, NodeKind};
use crate::r#gen::generate_world_with_config;
use crate::geom::Vec2;
use crate::growth;
use crate::particles;
use crate::types::{DebugFlag, Id, PanelKind};
use crate::world::{ContextMenu, World};
use serde::{Deserialize, Serialize};

/// Every input the simulation reacts to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Msg {
    CameraPan { delta: Vec2 },
    CameraZoom { factor: f32 },
    CameraFocus { target: Id },
    Select { target: Option<Id> },
    Hover { target: Option<Id> },

    Sprout { bud: Id },
    Prune { node: Id },
    Branch { stem: Id },
    Cut { node: Id },
    Graft { target: Id },
    Release { pos: Vec2 },

    ContextMenuOpen { target: Id, pos: Vec2 },
    ContextMenuClose,

    Tick { dt: f32 },
    DayCycleTick { dt: f32 },
    DayCycleSetRunning { running: bool },
    SetDayFraction { fraction: f32 },

    ToggleDebug { flag: DebugFlag },
    Regenerate { seed: u32 },
    PanelOpened { panel: PanelKind },
}

/// Advance the world by one message.
pub fn update(msg: &Msg, world: &World) -> World {
    match msg {
        Msg::CameraPan { delta } => {
            let mut next = world.clone();
            next.camera.pos += *delta;
            next
        }
        Msg::CameraZoom { factor } => {
            let mut next = world.clone();
            next.camera.zoom = (next.camera.zoom * factor).clamp(0.1, 8.0);
            next
        }
        Msg::CameraFocus { target } => match entity_world_pos(world, *target) {
            Some(pos) => {
                let mut next = world.clone();
                next.camera.pos = pos;
                next
            }
            None => world.clone(),
        },
        Msg::Select { target } => {
            let mut next = world.clone();
            next.selected = target.filter(|id| entity_exists(world, *id));
            next
        }
        Msg::Hover { target } => {
            let mut next = world.clone();
            next.hovered = target.filter(|id| entity_exists(world, *id));
            next
        }

        Msg::Sprout { bud } => actions::sprout(world, *bud).unwrap_or_else(|| world.clone()),
        Msg::Prune { node } => actions::prune(world, *node).unwrap_or_else(|| world.clone()),
        Msg::Branch { stem } => actions::branch(world, *stem).unwrap_or_else(|| world.clone()),
        Msg::Cut { node } => actions::cut(world, *node).unwrap_or_else(|| world.clone()),
        Msg::Graft { target } => actions::graft(world, *target).unwrap_or_else(|| world.clone()),
        Msg::Release { pos } => actions::release(world, *pos).unwrap_or_else(|| world.clone()),

        Msg::ContextMenuOpen { target, pos } => {
            let mut next = world.clone();
            next.context_menu = entity_exists(world, *target).then_some(ContextMenu {
                target: *target,
                pos: *pos,
            });
            next
        }
        Msg::ContextMenuClose => {
            let mut next = world.clone();
            next.context_menu = None;
            next
        }

        Msg::Tick { dt } => tick(world, *dt),
        Msg::DayCycleTick { dt } => {
            if !world.day_running {
                return world.clone();
            }
            let mut next = world.clone();
            let rate = 1.0 / next.config.day_cycle.day_length_secs;
            next.day_fraction = (next.day_fraction + dt * rate).rem_euclid(1.0);
            next
        }
        Msg::DayCycleSetRunning { running } => {
            let mut next = world.clone();
            next.day_running = *running;
            next
        }
        Msg::SetDayFraction { fraction } => {
            let mut next = world.clone();
            next.day_fraction = fraction.rem_euclid(1.0);
            next
        }

        Msg::ToggleDebug { flag } => {
            let mut next = world.clone();
            match flag {
                DebugFlag::ShowForces => next.debug.show_forces = !next.debug.show_forces,
                DebugFlag::ShowIds => next.debug.show_ids = !next.debug.show_ids,
                DebugFlag::ShowPathways => next.debug.show_pathways = !next.debug.show_pathways,
            }
            next
        }
        Msg::Regenerate { seed } => generate_world_with_config(*seed, world.config.clone()),
        Msg::PanelOpened { panel } => {
            let mut next = world.clone();
            next.opened_panels.insert(*panel);
            next
        }
    }
}

/// The simulation heartbeat. No-op while the day cycle is stopped.
fn tick(world: &World, dt: f32) -> World {
    if !world.day_running {
        return world.clone();
    }
    let mut next = world.clone();
    let params = next.config.growth.clone();
    let mut rng = next.sim_rng.clone();

    // Charge every not-yet-full bud by a jittered increment, capped at 1.
    let charging: Vec<Id> = next
        .entities
        .values()
        .filter_map(Entity::as_node)
        .filter(|n| matches!(n.kind, NodeKind::Bud { charge } if charge < 1.0))
        .map(|n| n.id)
        .collect();
    for id in charging {
        let inc = params.charge_increment + rng.jitter(params.charge_jitter);
        if let Some(node) = next.node_mut(id)
            && let NodeKind::Bud { charge } = &mut node.kind
        {
            *charge = (*charge + inc).min(1.0);
        }
    }

    // At most one auto-sprout per tick among the fully charged buds.
    let charged: Vec<Id> = next
        .entities
        .values()
        .filter_map(Entity::as_node)
        .filter(|n| matches!(n.kind, NodeKind::Bud { charge } if charge >= 1.0))
        .map(|n| n.id)
        .collect();
    for bud in charged {
        if rng.chance(params.auto_sprout_chance) {
            if let Some(plant_id) = next.plant_of_node(bud) {
                growth::grow_bud(&mut next, plant_id, bud, &mut rng);
            }
            break;
        }
    }
    next.sim_rng = rng;

    next.tick += 1;
    next.elapsed_secs += dt;

    particles::fast_tick(&mut next, dt);
    if next.tick % next.config.day_cycle.lifecycle_interval_ticks == 0 {
        particles::lifecycle_tick(&mut next);
    }
    next
}

fn entity_exists(world: &World, id: Id) -> bool {
    world.entities.contains_key(&id)
        || world.plants.contains_key(&id)
        || world.clusters.contains_key(&id)
        || world.constellations.contains_key(&id)
        || world.pathways.contains_key(&id)
}

/// World position of any focusable entity.
fn entity_world_pos(world: &World, id: Id) -> Option<Vec2> {
    if let Some(pos) = world.cluster_world_pos(id) {
        return Some(pos);
    }
    match world.entities.get(&id)? {
        Entity::Island(_) => world.island_world_pos(id),
        Entity::Rock(_) => world.rock_world_pos(id),
        Entity::Node(_) => world.node_world_pos(id),
        Entity::Particle(particle) => Some(particle.pos),
    }
}
