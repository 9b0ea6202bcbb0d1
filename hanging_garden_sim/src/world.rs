// The World aggregate root and snapshot discipline.
//
// `World` is the single source of truth: every entity map, the scalar
// simulation state (camera, day cycle, selection, cut/graft staging), the id
// allocator, and the live-simulation PRNG stream. All id-keyed maps are
// `BTreeMap` so iteration order — and therefore every downstream PRNG
// consumption order — is deterministic.
//
// ## Snapshot purity
//
// Nothing in this crate mutates a `World` it was handed by a caller. The
// reducer (`update.rs`) and the edit operations (`actions.rs`) clone the
// snapshot, mutate the clone, and return it. A prior snapshot therefore
// stays valid and unaffected by later edits, which is what lets an external
// renderer diff old vs. new snapshots cheaply.
//
// ## Reverse index
//
// `node_plant` maps every plant node id to its owning plant, replacing the
// O(plants) scan the lookup would otherwise need. It is transient
// (`serde(skip)`) — rebuilt after deserialization via
// `rebuild_transient_state()` — and maintained incrementally by every
// structural edit. It is a `FxHashMap` because it is lookup-only and never
// iterated, so its nondeterministic order can't leak into simulation state.
//
// See also: `gen.rs` which constructs worlds, `update.rs` for the only
// mutation surface, `entity.rs` for the entity schema.

use crate::config::GardenConfig;
use crate::entity::{CarriedSubtree, DriftingPiece, Entity, NodeKind, Particle, ParticleKind};
use crate::entity::{Cluster, Constellation, Island, Pathway, Plant, PlantNode, Rock};
use crate::geom::Vec2;
use crate::prng::GardenRng;
use crate::types::{Id, IdAllocator, PanelKind};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Viewport state. Owned by the core so focus/zoom messages are replayable,
/// but only read by the external rendering layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

/// Debug overlay switches.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DebugFlags {
    pub show_forces: bool,
    pub show_ids: bool,
    pub show_pathways: bool,
}

/// An open context menu: the entity it targets and its screen anchor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContextMenu {
    pub target: Id,
    pub pos: Vec2,
}

/// The complete world snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    /// The seed this world was generated from.
    pub seed: u32,
    pub config: GardenConfig,

    /// Fast-tick counter since generation.
    pub tick: u64,
    /// Wall-clock style elapsed simulation seconds (sum of tick dts).
    pub elapsed_secs: f32,
    /// Wrapped time-of-day fraction in [0, 1).
    pub day_fraction: f32,
    /// When false, day-cycle ticks and sim ticks are both no-ops.
    pub day_running: bool,

    pub camera: Camera,
    pub selected: Option<Id>,
    pub hovered: Option<Id>,
    pub context_menu: Option<ContextMenu>,
    pub debug: DebugFlags,
    /// Panels the player has opened at least once (tutorial hooks).
    pub opened_panels: BTreeSet<PanelKind>,

    /// A cut subtree following the cursor, if any.
    pub carried: Option<CarriedSubtree>,
    /// Released cut remnants, fading out. Scratch state with its own
    /// lifecycle — not part of the entity maps.
    pub drifting: Vec<DriftingPiece>,

    /// Islands, rocks, plant nodes, and particles.
    pub entities: BTreeMap<Id, Entity>,
    pub plants: BTreeMap<Id, Plant>,
    pub clusters: BTreeMap<Id, Cluster>,
    pub constellations: BTreeMap<Id, Constellation>,
    pub pathways: BTreeMap<Id, Pathway>,

    /// The first cluster of the first constellation.
    pub main_cluster_id: Id,

    /// Id allocator, threaded through generation and edits.
    pub allocator: IdAllocator,
    /// The live simulation's PRNG stream (derived from `seed`; distinct
    /// from the generation stream, which is consumed during `generate_world`).
    pub sim_rng: GardenRng,

    /// node id → owning plant id. Transient; see module docs.
    #[serde(skip)]
    node_plant: FxHashMap<Id, Id>,
}

impl World {
    /// A structurally empty world. Only `generate_world` and tests should
    /// need this; the placeholder `main_cluster_id` must be overwritten as
    /// soon as the main cluster exists.
    pub(crate) fn empty(seed: u32, config: GardenConfig) -> Self {
        Self {
            seed,
            config,
            tick: 0,
            elapsed_secs: 0.0,
            day_fraction: 0.0,
            day_running: true,
            camera: Camera::default(),
            selected: None,
            hovered: None,
            context_menu: None,
            debug: DebugFlags::default(),
            opened_panels: BTreeSet::new(),
            carried: None,
            drifting: Vec::new(),
            entities: BTreeMap::new(),
            plants: BTreeMap::new(),
            clusters: BTreeMap::new(),
            constellations: BTreeMap::new(),
            pathways: BTreeMap::new(),
            main_cluster_id: Id {
                class: crate::types::IdClass::Cluster,
                index: 0,
            },
            allocator: IdAllocator::new(),
            // The live stream is derived from the seed but offset so it
            // never replays the generation stream.
            sim_rng: GardenRng::new(seed ^ 0x9E37_79B9),
            node_plant: FxHashMap::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Lookup helpers
    // -----------------------------------------------------------------------

    pub fn node(&self, id: Id) -> Option<&PlantNode> {
        self.entities.get(&id).and_then(Entity::as_node)
    }

    pub fn node_mut(&mut self, id: Id) -> Option<&mut PlantNode> {
        self.entities.get_mut(&id).and_then(Entity::as_node_mut)
    }

    pub fn particle(&self, id: Id) -> Option<&Particle> {
        self.entities.get(&id).and_then(Entity::as_particle)
    }

    pub fn island(&self, id: Id) -> Option<&Island> {
        self.entities.get(&id).and_then(Entity::as_island)
    }

    pub fn rock(&self, id: Id) -> Option<&Rock> {
        self.entities.get(&id).and_then(Entity::as_rock)
    }

    /// The plant owning a node, via the maintained reverse index. O(1).
    pub fn plant_of_node(&self, node_id: Id) -> Option<Id> {
        self.node_plant.get(&node_id).copied()
    }

    // -----------------------------------------------------------------------
    // World-space position resolution (hierarchy is parent-relative)
    // -----------------------------------------------------------------------

    /// Absolute position of a cluster (clusters store absolute positions).
    pub fn cluster_world_pos(&self, cluster_id: Id) -> Option<Vec2> {
        self.clusters.get(&cluster_id).map(|c| c.pos)
    }

    pub fn island_world_pos(&self, island_id: Id) -> Option<Vec2> {
        let island = self.island(island_id)?;
        let cluster = self.cluster_world_pos(island.cluster_id)?;
        Some(cluster + island.pos)
    }

    pub fn rock_world_pos(&self, rock_id: Id) -> Option<Vec2> {
        let rock = self.rock(rock_id)?;
        let island = self.island_world_pos(rock.island_id)?;
        Some(island + rock.pos)
    }

    /// Absolute position of a plant node (node positions are island-local).
    pub fn node_world_pos(&self, node_id: Id) -> Option<Vec2> {
        let node = self.node(node_id)?;
        let plant_id = self.plant_of_node(node_id)?;
        let plant = self.plants.get(&plant_id)?;
        let island = self.island_world_pos(plant.island_id)?;
        Some(island + node.pos)
    }

    // -----------------------------------------------------------------------
    // Reverse index maintenance
    // -----------------------------------------------------------------------

    /// Record a node as belonging to a plant. Called by every edit that
    /// inserts a node.
    pub fn index_node(&mut self, node_id: Id, plant_id: Id) {
        self.node_plant.insert(node_id, plant_id);
    }

    /// Drop a node from the reverse index. Called by prune/cut removal.
    pub fn unindex_node(&mut self, node_id: Id) {
        self.node_plant.remove(&node_id);
    }

    /// Rebuild all transient state after deserialization.
    pub fn rebuild_transient_state(&mut self) {
        self.node_plant = self
            .plants
            .iter()
            .flat_map(|(plant_id, plant)| {
                plant
                    .adjacency
                    .iter()
                    .flat_map(|(parent, children)| {
                        std::iter::once(*parent).chain(children.iter().copied())
                    })
                    .map(move |node_id| (node_id, *plant_id))
            })
            .collect();
    }

    // -----------------------------------------------------------------------
    // Save/load
    // -----------------------------------------------------------------------

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut world: World = serde_json::from_str(json)?;
        world.rebuild_transient_state();
        Ok(world)
    }

    // -----------------------------------------------------------------------
    // Structural queries
    // -----------------------------------------------------------------------

    /// Number of plants rooted on an island.
    pub fn plant_count_on_island(&self, island_id: Id) -> usize {
        self.plants
            .values()
            .filter(|p| p.island_id == island_id)
            .count()
    }

    /// Check the tree invariant for one plant: acyclic, rooted at
    /// `root_id`, every adjacency id present in the entity map, and every
    /// non-root node reachable exactly once. Test/debug helper.
    pub fn plant_is_valid_tree(&self, plant_id: Id) -> bool {
        let Some(plant) = self.plants.get(&plant_id) else {
            return false;
        };
        if self.node(plant.root_id).is_none() {
            return false;
        }

        // Walk from the root, counting visits.
        let mut seen = BTreeSet::new();
        let mut queue = vec![plant.root_id];
        while let Some(id) = queue.pop() {
            if !seen.insert(id) {
                return false; // revisit = cycle or duplicate child entry
            }
            if self.node(id).is_none() {
                return false; // dangling reference
            }
            queue.extend_from_slice(plant.children(id));
        }

        // Every adjacency participant must have been reached.
        for (parent, children) in &plant.adjacency {
            if !seen.contains(parent) {
                return false;
            }
            for child in children {
                if !seen.contains(child) {
                    return false;
                }
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Summary (CLI / test tooling)
// ---------------------------------------------------------------------------

/// Entity counts for inspection and scripting. Not part of core logic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSummary {
    pub constellations: usize,
    pub clusters: usize,
    pub pathways: usize,
    pub islands: usize,
    pub rocks: usize,
    pub plants: usize,
    pub buds: usize,
    pub stems: usize,
    pub leaves: usize,
    pub flowers: usize,
    pub seeds: usize,
    pub fireflies: usize,
    pub entities: usize,
}

/// Count every entity category in a world.
pub fn summarize_world(world: &World) -> WorldSummary {
    let mut summary = WorldSummary {
        constellations: world.constellations.len(),
        clusters: world.clusters.len(),
        pathways: world.pathways.len(),
        plants: world.plants.len(),
        entities: world.entities.len(),
        ..WorldSummary::default()
    };
    for entity in world.entities.values() {
        match entity {
            Entity::Island(_) => summary.islands += 1,
            Entity::Rock(_) => summary.rocks += 1,
            Entity::Node(node) => match node.kind {
                NodeKind::Bud { .. } => summary.buds += 1,
                NodeKind::Stem => summary.stems += 1,
                NodeKind::Leaf => summary.leaves += 1,
                NodeKind::Flower => summary.flowers += 1,
            },
            Entity::Particle(particle) => match particle.kind {
                ParticleKind::Seed => summary.seeds += 1,
                ParticleKind::Firefly => summary.fireflies += 1,
            },
        }
    }
    summary
}
