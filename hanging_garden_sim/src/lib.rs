// hanging_garden_sim — pure Rust simulation library.
//
// This crate contains the entire core of the hanging-garden toy: the world
// data model, the seeded procedural generator, the plant growth and edit
// operations, the particle simulation, and the message reducer. It has zero
// rendering dependencies and can be tested, benchmarked, and run headless.
//
// Module overview:
// - `geom.rs`:      2D vector arithmetic, angles, segment projection, OKLCH color.
// - `types.rs`:     Entity ids ("node-17" style), the id allocator, shared enums.
// - `entity.rs`:    The entity schema — constellations down to plant nodes and particles.
// - `config.rs`:    GardenConfig — all tunable parameters in nested groups.
// - `world.rs`:     The World aggregate root, snapshot discipline, summary, save/load.
// - `gen.rs`:       generate_world(seed) — the staged deterministic generator.
// - `growth.rs`:    The single plant growth rule + branch-angle selection.
// - `actions.rs`:   sprout / prune / branch / cut / graft / release edits.
// - `forces.rs`:    Composable vector force fields (pathway attraction/flow).
// - `particles.rs`: Seed and firefly fast/lifecycle ticks, rooting.
// - `update.rs`:    Msg union and the update(msg, world) -> world reducer.
//
// The rendering layer, UI chrome, camera input handling, and audio live in
// external collaborators. They consume `World` snapshots and dispatch `Msg`
// values into `update` — that function-call surface is the crate's entire
// interface.
//
// **Critical constraint: snapshot purity.** `update` never mutates the world
// it is given: every mutation path clones first and returns a new value, so
// callers can hold onto old snapshots for diffing and history. All
// randomness comes from seeded mulberry32 streams (`hanging_garden_prng`);
// ordered collections are `BTreeMap` so iteration order is deterministic.

pub mod actions;
pub mod config;
pub mod entity;
pub mod forces;
pub mod r#gen;
pub mod geom;
pub mod growth;
pub mod particles;
pub use hanging_garden_prng as prng;
pub mod types;
pub mod update;
pub mod world;
