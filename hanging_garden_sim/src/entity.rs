// The entity schema — everything that lives in a `World`.
//
// The spatial hierarchy is strict containment with parent-relative positions:
// constellations hold absolute positions, clusters hold absolute positions,
// islands are local to their cluster, and rocks and plant nodes are local to
// their island. Plants are trees of nodes over an adjacency map; particles
// are free world-space entities.
//
// Plant node kinds are a tagged union with variant payloads — a bud's charge
// exists only on `NodeKind::Bud`, so "a stem with a charge" is not
// representable. Flowers and leaves are terminal: no edit operation ever
// adds children under them (enforced in `actions.rs`/`growth.rs`).
//
// See also: `world.rs` for the aggregate root that owns the entity maps,
// `gen.rs` for how these are initially produced, `types.rs` for `Id`.

use crate::geom::Vec2;
use crate::types::{GlyphKind, Id, PathwayDirection};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Child list for one adjacency entry. Plants rarely exceed two children
/// per node (continuation bud + branch or leaf), so four slots stay inline.
pub type Children = SmallVec<[Id; 4]>;

/// Parent → children edges of one plant. Always a tree rooted at the
/// plant's `root_id`.
pub type Adjacency = BTreeMap<Id, Children>;

// ---------------------------------------------------------------------------
// Spatial hierarchy
// ---------------------------------------------------------------------------

/// Top-level grouping of clusters. Absolute world position only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Constellation {
    pub id: Id,
    pub pos: Vec2,
}

/// Mid-level grouping of islands around a glyph anchor. Absolute position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cluster {
    pub id: Id,
    pub constellation_id: Id,
    pub pos: Vec2,
    pub glyph: GlyphKind,
    pub rotation: f32,
}

/// A soil patch hosting rocks and plants. Position is local to the cluster.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Island {
    pub id: Id,
    pub cluster_id: Id,
    /// Position relative to the owning cluster.
    pub pos: Vec2,
    /// Nominal radius of the blob outline.
    pub radius: f32,
    /// Organic outline: one sample per angular step, local to the island.
    pub outline: Vec<Vec2>,
}

/// One polygonal boulder within a rock formation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Boulder {
    /// Offset from the rock formation's position.
    pub offset: Vec2,
    pub size: f32,
    pub rotation: f32,
    /// Polygon side count (5–8).
    pub sides: u32,
    /// How far vertices deviate from a regular polygon (0–1).
    pub irregularity: f32,
}

/// A compound rock formation on an island: 2–4 boulders plus crack points
/// where plants may root. Position is local to the island.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rock {
    pub id: Id,
    pub island_id: Id,
    pub pos: Vec2,
    pub boulders: Vec<Boulder>,
    /// Plant-root anchor points, local to the island.
    pub cracks: Vec<Vec2>,
}

// ---------------------------------------------------------------------------
// Plants
// ---------------------------------------------------------------------------

/// What a plant node currently is. Only buds carry charge; only buds sprout;
/// only stems branch or accept grafts; leaves and flowers are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Growable tip. `charge` in [0, 1] is readiness to sprout.
    Bud { charge: f32 },
    Stem,
    Leaf,
    Flower,
}

impl NodeKind {
    pub fn is_bud(self) -> bool {
        matches!(self, NodeKind::Bud { .. })
    }

    pub fn is_stem(self) -> bool {
        matches!(self, NodeKind::Stem)
    }

    /// Leaves and flowers never receive children.
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeKind::Leaf | NodeKind::Flower)
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Bud { .. } => "bud",
            NodeKind::Stem => "stem",
            NodeKind::Leaf => "leaf",
            NodeKind::Flower => "flower",
        }
    }
}

/// One node of a plant tree. Position is local to the owning island.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlantNode {
    pub id: Id,
    pub kind: NodeKind,
    pub pos: Vec2,
    /// Growth direction in radians.
    pub angle: f32,
    /// Distance from the root in edges. Root = 0; drives segment length
    /// taper and render stroke width.
    pub depth: u32,
}

/// A plant: a tree of nodes anchored to an island.
///
/// Invariants (preserved by every edit in `actions.rs`):
/// - `adjacency` is a tree rooted at `root_id` — acyclic, single root,
///   every non-root node appears exactly once as a child.
/// - Every id in `adjacency` (key or child) exists in the world's entity map.
/// - `root_id` is never removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plant {
    pub id: Id,
    pub island_id: Id,
    pub root_id: Id,
    pub adjacency: Adjacency,
}

impl Plant {
    /// Children of a node (empty slice for leaves-of-the-tree).
    pub fn children(&self, id: Id) -> &[Id] {
        self.adjacency.get(&id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    /// The parent of a node, or `None` for the root. O(nodes) scan — used
    /// by edits and tests, not per-tick code.
    pub fn parent_of(&self, id: Id) -> Option<Id> {
        self.adjacency
            .iter()
            .find(|(_, children)| children.contains(&id))
            .map(|(parent, _)| *parent)
    }
}

// ---------------------------------------------------------------------------
// Particles
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Seed,
    Firefly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleState {
    Floating,
    Landed,
    Rooting,
}

/// A free entity not attached to any tree: a drifting seed or a firefly.
/// Positions and velocities are world-space.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Particle {
    pub id: Id,
    pub kind: ParticleKind,
    pub state: ParticleState,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub angular_velocity: f32,
    /// Glow intensity in [0, 1] (fireflies pulse at night).
    pub glow: f32,
    /// Lifecycle tick count. Drives aging out and periodic motion.
    pub age: u32,
    /// The rock or island this particle rests on, when landed.
    pub landed_on: Option<Id>,
}

// ---------------------------------------------------------------------------
// Pathways
// ---------------------------------------------------------------------------

/// An inter-cluster edge used only for force-field sampling. Generated once,
/// never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pathway {
    pub id: Id,
    pub from_cluster: Id,
    pub to_cluster: Id,
    pub direction: PathwayDirection,
}

// ---------------------------------------------------------------------------
// Cut/graft staging
// ---------------------------------------------------------------------------

/// A cut branch staged for grafting, following the cursor until released.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarriedSubtree {
    /// Root of the carried subtree (was the cut node).
    pub root_id: Id,
    /// The detached nodes, root first.
    pub nodes: Vec<PlantNode>,
    /// Adjacency restricted to the carried nodes.
    pub adjacency: Adjacency,
}

/// A released remnant of a cut subtree: one node drifting and fading.
/// Removed once `opacity` reaches zero.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriftingPiece {
    pub id: Id,
    pub node: PlantNode,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub opacity: f32,
}

// ---------------------------------------------------------------------------
// The entity map's tagged union
// ---------------------------------------------------------------------------

/// One entry of the world's `entities` map. Clusters, constellations,
/// pathways, and plants live in their own maps; everything positional that
/// simulation code touches per-tick lives here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Entity {
    Island(Island),
    Rock(Rock),
    Node(PlantNode),
    Particle(Particle),
}

impl Entity {
    pub fn id(&self) -> Id {
        match self {
            Entity::Island(island) => island.id,
            Entity::Rock(rock) => rock.id,
            Entity::Node(node) => node.id,
            Entity::Particle(particle) => particle.id,
        }
    }

    pub fn as_node(&self) -> Option<&PlantNode> {
        match self {
            Entity::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut PlantNode> {
        match self {
            Entity::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_particle(&self) -> Option<&Particle> {
        match self {
            Entity::Particle(particle) => Some(particle),
            _ => None,
        }
    }

    pub fn as_particle_mut(&mut self) -> Option<&mut Particle> {
        match self {
            Entity::Particle(particle) => Some(particle),
            _ => None,
        }
    }

    pub fn as_island(&self) -> Option<&Island> {
        match self {
            Entity::Island(island) => Some(island),
            _ => None,
        }
    }

    pub fn as_rock(&self) -> Option<&Rock> {
        match self {
            Entity::Rock(rock) => Some(rock),
            _ => None,
        }
    }
}
