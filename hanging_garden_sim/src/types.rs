// Core types shared across the simulation.
//
// Defines entity identifiers (class-prefixed counter ids such as `"node-17"`),
// the explicit id allocator, and small shared enums. All types derive
// `Serialize`/`Deserialize` for save/load and for the CLI summary output.
//
// Ids are minted from an `IdAllocator` that is threaded explicitly through
// generation and edits as part of the `World` — there is no global counter.
// The generator starts from a fresh allocator, so a given seed always
// reproduces the same id sequence.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Entity ids — class-prefixed counters
// ---------------------------------------------------------------------------

/// The class of entity an id refers to. Determines the display prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdClass {
    Constellation,
    Cluster,
    Island,
    Rock,
    Plant,
    Node,
    Pathway,
    Particle,
    Piece,
}

impl IdClass {
    pub fn prefix(self) -> &'static str {
        match self {
            IdClass::Constellation => "constellation",
            IdClass::Cluster => "cluster",
            IdClass::Island => "island",
            IdClass::Rock => "rock",
            IdClass::Plant => "plant",
            IdClass::Node => "node",
            IdClass::Pathway => "pathway",
            IdClass::Particle => "particle",
            IdClass::Piece => "piece",
        }
    }

    fn from_prefix(s: &str) -> Option<Self> {
        Some(match s {
            "constellation" => IdClass::Constellation,
            "cluster" => IdClass::Cluster,
            "island" => IdClass::Island,
            "rock" => IdClass::Rock,
            "plant" => IdClass::Plant,
            "node" => IdClass::Node,
            "pathway" => IdClass::Pathway,
            "particle" => IdClass::Particle,
            "piece" => IdClass::Piece,
            _ => return None,
        })
    }
}

/// An entity identifier: a class plus a monotonically allocated index.
///
/// Displays and serializes as `"<prefix>-<index>"` (e.g. `"node-17"`) so
/// snapshots stay human-readable and ids are valid JSON map keys. The index
/// is unique across all classes within one world (single shared counter).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id {
    pub class: IdClass,
    pub index: u64,
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.class.prefix(), self.index)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({self})")
    }
}

impl FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, index) = s.rsplit_once('-').ok_or(())?;
        let class = IdClass::from_prefix(prefix).ok_or(())?;
        let index = index.parse().map_err(|_| ())?;
        Ok(Id { class, index })
    }
}

// Custom serde: serialize as the display string so `Id` can be used as a
// JSON map key (serde_json requires string keys).
impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|()| serde::de::Error::custom("invalid id format"))
    }
}

/// Monotonic id allocator — the only source of new ids.
///
/// Owned by the `World` and threaded through generation and every edit that
/// creates entities. A fresh allocator plus a fixed PRNG seed reproduces the
/// exact id sequence of a previous run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh id of the given class.
    pub fn alloc(&mut self, class: IdClass) -> Id {
        let id = Id {
            class,
            index: self.next,
        };
        self.next += 1;
        id
    }
}

// ---------------------------------------------------------------------------
// Shared simulation enums
// ---------------------------------------------------------------------------

/// Cosmetic glyph drawn at a cluster's anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlyphKind {
    Spiral,
    Ring,
    Trigram,
    Lattice,
    Crescent,
}

impl GlyphKind {
    pub const ALL: [GlyphKind; 5] = [
        GlyphKind::Spiral,
        GlyphKind::Ring,
        GlyphKind::Trigram,
        GlyphKind::Lattice,
        GlyphKind::Crescent,
    ];
}

/// Flow direction of an inter-cluster pathway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathwayDirection {
    Forward,
    Backward,
    Bidirectional,
}

/// Phase of the day cycle, derived from the wrapped time-of-day fraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    Dawn,
    Day,
    Dusk,
    Night,
}

/// A debug overlay toggled by `Msg::ToggleDebug`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebugFlag {
    ShowForces,
    ShowIds,
    ShowPathways,
}

/// UI panels whose first open feeds tutorial progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelKind {
    Inspector,
    Tutorial,
    Help,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_is_monotonic_across_classes() {
        let mut alloc = IdAllocator::new();
        let a = alloc.alloc(IdClass::Node);
        let b = alloc.alloc(IdClass::Plant);
        let c = alloc.alloc(IdClass::Node);
        assert_eq!(a.index, 0);
        assert_eq!(b.index, 1);
        assert_eq!(c.index, 2);
    }

    #[test]
    fn id_display_format() {
        let mut alloc = IdAllocator::new();
        for _ in 0..17 {
            alloc.alloc(IdClass::Particle);
        }
        let id = alloc.alloc(IdClass::Node);
        assert_eq!(id.to_string(), "node-17");
    }

    #[test]
    fn id_parse_round_trip() {
        for class in [
            IdClass::Constellation,
            IdClass::Cluster,
            IdClass::Island,
            IdClass::Rock,
            IdClass::Plant,
            IdClass::Node,
            IdClass::Pathway,
            IdClass::Particle,
            IdClass::Piece,
        ] {
            let id = Id { class, index: 93 };
            let parsed: Id = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn id_parse_rejects_garbage() {
        assert!("node17".parse::<Id>().is_err());
        assert!("gizmo-17".parse::<Id>().is_err());
        assert!("node-seventeen".parse::<Id>().is_err());
        assert!("".parse::<Id>().is_err());
    }

    #[test]
    fn id_serializes_as_string() {
        let id = Id {
            class: IdClass::Rock,
            index: 4,
        };
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"rock-4\"");
        let restored: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, id);
    }

    #[test]
    fn id_works_as_json_map_key() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(
            Id {
                class: IdClass::Node,
                index: 0,
            },
            1u32,
        );
        let json = serde_json::to_string(&map).unwrap();
        let restored: BTreeMap<Id, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, map);
    }

    #[test]
    fn allocator_reset_reproduces_sequence() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        for class in [IdClass::Node, IdClass::Plant, IdClass::Rock] {
            assert_eq!(a.alloc(class), b.alloc(class));
        }
    }
}
