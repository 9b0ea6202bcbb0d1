// Data-driven simulation configuration.
//
// All tunable parameters live here in `GardenConfig`, grouped into nested
// structs per subsystem. The sim never uses magic numbers — it reads from
// the config. The forces here are deliberately non-realistic; every value is
// tuned for how the garden looks in motion, not for physics.
//
// The defaults are the canonical tuning: the structural-bounds tests in
// `gen.rs` (cluster and island counts per seed) assume them.
//
// See also: `gen.rs` for `GenParams` consumers, `growth.rs` for
// `GrowthParams`, `forces.rs` for `PathwayForceParams`, `particles.rs` for
// the seed/firefly/rooting groups, `update.rs` for `DayCycleParams`.

use crate::types::DayPhase;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// World generation parameters (spatial hierarchy and initial layout).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenParams {
    /// Number of constellations. The first sits at the world origin.
    pub constellation_count: u32,
    /// Radial distance range for non-origin constellations.
    pub constellation_min_radius: f32,
    pub constellation_max_radius: f32,
    /// Angular jitter applied to the even constellation spread (radians).
    pub constellation_angle_jitter: f32,

    /// Extra clusters (beyond the main one) rolled for the first
    /// constellation: `1 + [0, main_extra_clusters_max]`. Other
    /// constellations get exactly one cluster each.
    pub main_extra_clusters_max: u32,
    /// Distance range from the constellation center for non-main clusters.
    pub cluster_min_spread: f32,
    pub cluster_max_spread: f32,

    /// Pathway generation: reject an edge whose direction is within this
    /// angle (radians) of an edge already claimed at either endpoint.
    pub pathway_angle_claim: f32,
    /// Chance to accept an edge despite an angular conflict.
    pub pathway_claim_override_chance: f32,
    /// Random pruning applied to otherwise-accepted edges, for sparseness.
    pub pathway_prune_chance: f32,

    /// Islands per cluster (inclusive range).
    pub islands_per_cluster_min: u32,
    pub islands_per_cluster_max: u32,
    /// Polar ring the islands are placed on, relative to the cluster.
    pub island_ring_min: f32,
    pub island_ring_max: f32,
    /// Island blob size and outline shape.
    pub island_radius_min: f32,
    pub island_radius_max: f32,
    pub island_outline_samples: u32,
    /// Fractional radius deviation per outline sample (0–1).
    pub island_outline_irregularity: f32,

    /// Rock formations per island (inclusive range).
    pub rocks_per_island_min: u32,
    pub rocks_per_island_max: u32,
    /// Secondary boulders per formation (inclusive range). With the primary
    /// this yields the 2–4 boulders a formation always has.
    pub secondary_boulders_min: u32,
    pub secondary_boulders_max: u32,
    /// Primary boulder size range; secondaries are scaled down from it.
    pub boulder_size_min: f32,
    pub boulder_size_max: f32,

    /// Chance that a rock seeds an initial plant, by cluster.
    pub plant_chance_main_cluster: f32,
    pub plant_chance_elsewhere: f32,
    /// Initial growth passes for a seeded plant (inclusive range).
    pub initial_growth_passes_min: u32,
    pub initial_growth_passes_max: u32,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            constellation_count: 3,
            constellation_min_radius: 3500.0,
            constellation_max_radius: 5000.0,
            constellation_angle_jitter: 0.5,
            main_extra_clusters_max: 2,
            cluster_min_spread: 600.0,
            cluster_max_spread: 1100.0,
            pathway_angle_claim: PI / 6.0,
            pathway_claim_override_chance: 0.05,
            pathway_prune_chance: 0.15,
            islands_per_cluster_min: 2,
            islands_per_cluster_max: 6,
            island_ring_min: 160.0,
            island_ring_max: 420.0,
            island_radius_min: 60.0,
            island_radius_max: 110.0,
            island_outline_samples: 12,
            island_outline_irregularity: 0.35,
            rocks_per_island_min: 1,
            rocks_per_island_max: 2,
            secondary_boulders_min: 1,
            secondary_boulders_max: 3,
            boulder_size_min: 16.0,
            boulder_size_max: 30.0,
            plant_chance_main_cluster: 0.7,
            plant_chance_elsewhere: 0.5,
            initial_growth_passes_min: 2,
            initial_growth_passes_max: 4,
        }
    }
}

/// The single plant growth rule's parameters — shared by generation-time
/// seeding and live sprouting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrowthParams {
    /// Segment length at depth 0; each level multiplies by `length_taper`.
    pub base_segment_length: f32,
    pub length_taper: f32,
    pub min_segment_length: f32,
    /// Angular jitter applied to the continuation bud (radians).
    pub angle_jitter: f32,

    /// Leaf attachment chance: `base + per_depth * depth`, capped.
    pub leaf_chance_base: f32,
    pub leaf_chance_per_depth: f32,
    pub leaf_chance_max: f32,
    /// Angular offset of an attached leaf from the stem direction.
    pub leaf_offset_angle: f32,

    /// Branch-bud chance: `base - decay_per_depth * depth`, floored.
    pub branch_chance_base: f32,
    pub branch_chance_decay_per_depth: f32,
    pub branch_chance_min: f32,
    /// Half-width of the angular window searched for a branch gap (radians).
    pub branch_window: f32,
    /// Jitter added to the chosen gap midpoint.
    pub branch_angle_jitter: f32,

    /// Minimum depth before a bud may convert to a flower.
    pub flower_min_depth: u32,
    /// Flower conversion chance per unit depth, capped at `flower_chance_max`.
    pub flower_chance_per_depth: f32,
    pub flower_chance_max: f32,

    /// Per-tick bud charge advance and its jitter.
    pub charge_increment: f32,
    pub charge_jitter: f32,
    /// Per-tick chance for one fully charged bud to auto-sprout.
    pub auto_sprout_chance: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            base_segment_length: 26.0,
            length_taper: 0.85,
            min_segment_length: 5.0,
            angle_jitter: 0.22,
            leaf_chance_base: 0.12,
            leaf_chance_per_depth: 0.08,
            leaf_chance_max: 0.6,
            leaf_offset_angle: 0.9,
            branch_chance_base: 0.42,
            branch_chance_decay_per_depth: 0.06,
            branch_chance_min: 0.08,
            branch_window: 0.7 * PI,
            branch_angle_jitter: 0.1,
            flower_min_depth: 2,
            flower_chance_per_depth: 0.1,
            flower_chance_max: 0.4,
            charge_increment: 0.012,
            charge_jitter: 0.006,
            auto_sprout_chance: 0.03,
        }
    }
}

/// Pathway force field parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathwayForceParams {
    /// Points farther than this from a pathway segment feel exactly nothing.
    pub max_distance: f32,
    /// Blend weight of the pull toward the closest segment point.
    pub attraction_weight: f32,
    /// Blend weight of the flow along the segment direction.
    pub direction_weight: f32,
    /// Overall force magnitude.
    pub strength: f32,
    /// Falloff exponent over normalized distance (3 = cubic, the default;
    /// 2 gives the softer quadratic variant).
    pub falloff_exponent: i32,
}

impl Default for PathwayForceParams {
    fn default() -> Self {
        Self {
            max_distance: 220.0,
            attraction_weight: 0.6,
            direction_weight: 0.4,
            strength: 40.0,
            falloff_exponent: 3,
        }
    }
}

/// Seed particle motion and landing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedParams {
    pub wind_amplitude: f32,
    pub wind_frequency: f32,
    /// Brownian jitter magnitude per fast tick.
    pub brownian: f32,
    /// Constant downward pull. Not physical gravity — just drift.
    pub gravity: f32,
    pub damping: f32,
    pub max_speed: f32,
    /// Seeds are strongly steered by pathways.
    pub pathway_multiplier: f32,
    /// Easing rate of rotation toward the velocity heading.
    pub rotation_ease: f32,
    /// Per-tick Bernoulli landing chance when within a landing radius.
    pub landing_chance: f32,
    pub rock_landing_radius: f32,
    pub island_landing_radius: f32,
    /// Lifecycle ticks before a seed ages out.
    pub max_age: u32,
    /// Global floating-seed population ceiling.
    pub max_population: usize,
    /// Per-lifecycle-tick chance that a flower emits a seed.
    pub flower_emit_chance: f32,
}

impl Default for SeedParams {
    fn default() -> Self {
        Self {
            wind_amplitude: 14.0,
            wind_frequency: 0.8,
            brownian: 6.0,
            gravity: 4.0,
            damping: 0.92,
            max_speed: 55.0,
            pathway_multiplier: 1.6,
            rotation_ease: 0.15,
            landing_chance: 0.02,
            rock_landing_radius: 30.0,
            island_landing_radius: 45.0,
            max_age: 90,
            max_population: 40,
            flower_emit_chance: 0.03,
        }
    }
}

/// Firefly motion, glow, and spawning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FireflyParams {
    /// Pull toward the nearest glowing target.
    pub attraction_strength: f32,
    /// Within this distance of a target, fireflies orbit instead of approach.
    pub orbit_radius: f32,
    pub orbit_strength: f32,
    /// Wandering noise magnitude.
    pub wander: f32,
    pub damping: f32,
    pub max_speed: f32,
    /// Fireflies feel pathways only weakly.
    pub pathway_multiplier: f32,
    /// Minimum bud charge for a bud to count as a glow target.
    pub charge_threshold: f32,
    /// Easing rate of glow toward its day-phase target.
    pub glow_ease: f32,
    /// Day-phase glow targets.
    pub glow_night: f32,
    pub glow_dusk: f32,
    pub glow_day: f32,
    /// Landing/takeoff Bernoulli chances, gated by day phase.
    pub landing_chance: f32,
    pub takeoff_chance: f32,
    pub max_age: u32,
    pub max_population: usize,
    /// Per-lifecycle-tick dusk/night spawn chance per rock.
    pub spawn_chance: f32,
}

impl Default for FireflyParams {
    fn default() -> Self {
        Self {
            attraction_strength: 18.0,
            orbit_radius: 30.0,
            orbit_strength: 25.0,
            wander: 8.0,
            damping: 0.9,
            max_speed: 40.0,
            pathway_multiplier: 0.3,
            charge_threshold: 0.7,
            glow_ease: 0.08,
            glow_night: 1.0,
            glow_dusk: 0.4,
            glow_day: 0.02,
            landing_chance: 0.01,
            takeoff_chance: 0.05,
            max_age: 120,
            max_population: 25,
            spawn_chance: 0.04,
        }
    }
}

/// Seed rooting — the anti-crowding policy that keeps islands sparse.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RootingParams {
    /// Lifecycle ticks a seed must rest before it may root.
    pub min_age: u32,
    /// Base per-lifecycle-tick rooting chance, before attenuation.
    pub base_chance: f32,
    /// Proximity falloff radius: rooting at distance `d` from the nearest
    /// plant root is scaled from `min_proximity_multiplier` (at d=0) up to
    /// 1.0 (at `proximity_radius`).
    pub proximity_radius: f32,
    pub min_proximity_multiplier: f32,
    /// Per-island plant cap. At or above it, rooting probability drops to
    /// `crowded_multiplier`; one below it, halfway there.
    pub island_plant_cap: usize,
    pub crowded_multiplier: f32,
}

impl Default for RootingParams {
    fn default() -> Self {
        Self {
            min_age: 5,
            base_chance: 0.25,
            proximity_radius: 80.0,
            min_proximity_multiplier: 0.15,
            island_plant_cap: 5,
            crowded_multiplier: 0.1,
        }
    }
}

/// Day-cycle timing and phase boundaries (fractions of one day).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DayCycleParams {
    /// Seconds per full day at `DayCycleTick` rate.
    pub day_length_secs: f32,
    /// Phase boundaries: dawn starts at 0, then these in order.
    pub day_start: f32,
    pub dusk_start: f32,
    pub night_start: f32,
    /// Lifecycle ticks run once per this many fast ticks.
    pub lifecycle_interval_ticks: u64,
}

impl DayCycleParams {
    /// Map a wrapped time-of-day fraction in [0, 1) to its phase.
    pub fn phase(&self, fraction: f32) -> DayPhase {
        let f = fraction.rem_euclid(1.0);
        if f < self.day_start {
            DayPhase::Dawn
        } else if f < self.dusk_start {
            DayPhase::Day
        } else if f < self.night_start {
            DayPhase::Dusk
        } else {
            DayPhase::Night
        }
    }
}

impl Default for DayCycleParams {
    fn default() -> Self {
        Self {
            day_length_secs: 120.0,
            day_start: 0.1,
            dusk_start: 0.5,
            night_start: 0.6,
            lifecycle_interval_ticks: 20,
        }
    }
}

/// Drifting-piece decay (released cut subtrees).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DriftParams {
    /// Outward speed given to released pieces.
    pub release_speed: f32,
    /// Opacity lost per fast tick. Bounds the piece lifetime.
    pub fade_per_tick: f32,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            release_speed: 22.0,
            fade_per_tick: 0.02,
        }
    }
}

/// Complete configuration for one world.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GardenConfig {
    pub r#gen: GenParams,
    pub growth: GrowthParams,
    pub pathway_force: PathwayForceParams,
    pub seeds: SeedParams,
    pub fireflies: FireflyParams,
    pub rooting: RootingParams,
    pub day_cycle: DayCycleParams,
    pub drift: DriftParams,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_consistent() {
        let config = GardenConfig::default();
        assert!(config.r#gen.islands_per_cluster_min <= config.r#gen.islands_per_cluster_max);
        assert!(config.r#gen.rocks_per_island_min <= config.r#gen.rocks_per_island_max);
        assert!(config.r#gen.secondary_boulders_min >= 1);
        assert!(config.r#gen.secondary_boulders_max <= 3);
        assert!(config.growth.flower_chance_max <= 0.4);
        assert!(config.rooting.min_proximity_multiplier < 1.0);
        assert!(config.day_cycle.day_start < config.day_cycle.dusk_start);
        assert!(config.day_cycle.dusk_start < config.day_cycle.night_start);
    }

    #[test]
    fn day_phase_boundaries() {
        let params = DayCycleParams::default();
        assert_eq!(params.phase(0.0), DayPhase::Dawn);
        assert_eq!(params.phase(0.09), DayPhase::Dawn);
        assert_eq!(params.phase(0.1), DayPhase::Day);
        assert_eq!(params.phase(0.49), DayPhase::Day);
        assert_eq!(params.phase(0.5), DayPhase::Dusk);
        assert_eq!(params.phase(0.59), DayPhase::Dusk);
        assert_eq!(params.phase(0.6), DayPhase::Night);
        assert_eq!(params.phase(0.99), DayPhase::Night);
        // Out-of-range fractions wrap.
        assert_eq!(params.phase(1.05), DayPhase::Dawn);
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = GardenConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: GardenConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            restored.r#gen.constellation_count,
            config.r#gen.constellation_count
        );
        assert_eq!(restored.seeds.max_population, config.seeds.max_population);
    }
}
