//! Simulation parameters that the UI adjusts while the flock is running.
//!
//! The engine takes a copy of [`SimulationParams`] at the start of every frame,
//! so a slider that changes a value mid-frame only takes effect on the next one.

use core::ops::RangeInclusive;

/// What happens when a boid crosses the canvas edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryMode {
    #[default]
    Wrap,
    Bounce,
}

impl BoundaryMode {
    pub fn toggled(self) -> Self {
        match self {
            BoundaryMode::Wrap => BoundaryMode::Bounce,
            BoundaryMode::Bounce => BoundaryMode::Wrap,
        }
    }

    pub fn is_wrap(self) -> bool {
        self == BoundaryMode::Wrap
    }
}

/// Parameters for the simulation that can be adjusted via UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub num_boids: usize,
    pub perception_radius: f32,
    pub max_force: f32,
    pub max_speed: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub orb_strength: f32,
    pub boundary: BoundaryMode,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            num_boids: 150,
            perception_radius: 50.0,
            max_force: 0.2,
            max_speed: 4.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            orb_strength: 50.0,
            boundary: BoundaryMode::Wrap,
        }
    }
}

/// Result of comparing two parameter snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamChange {
    /// `num_boids` differs, the population has to be rebuilt
    pub population_changed: bool,
    pub any_changed: bool,
}

impl SimulationParams {
    pub fn num_boids_range() -> RangeInclusive<usize> {
        0..=2000
    }

    pub fn perception_radius_range() -> RangeInclusive<f32> {
        10.0..=200.0
    }

    pub fn weight_range() -> RangeInclusive<f32> {
        0.0..=5.0
    }

    pub fn max_speed_range() -> RangeInclusive<f32> {
        0.5..=10.0
    }

    pub fn max_force_range() -> RangeInclusive<f32> {
        0.01..=1.0
    }

    pub fn orb_strength_range() -> RangeInclusive<f32> {
        0.0..=500.0
    }

    /// Copy with every value forced into its slider range.
    /// NaN falls back to the default for that field.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let num_boids = Self::num_boids_range();

        Self {
            num_boids: self.num_boids.clamp(*num_boids.start(), *num_boids.end()),
            perception_radius: clamp_or(
                self.perception_radius,
                Self::perception_radius_range(),
                defaults.perception_radius,
            ),
            max_force: clamp_or(self.max_force, Self::max_force_range(), defaults.max_force),
            max_speed: clamp_or(self.max_speed, Self::max_speed_range(), defaults.max_speed),
            separation_weight: clamp_or(
                self.separation_weight,
                Self::weight_range(),
                defaults.separation_weight,
            ),
            alignment_weight: clamp_or(
                self.alignment_weight,
                Self::weight_range(),
                defaults.alignment_weight,
            ),
            cohesion_weight: clamp_or(
                self.cohesion_weight,
                Self::weight_range(),
                defaults.cohesion_weight,
            ),
            orb_strength: clamp_or(
                self.orb_strength,
                Self::orb_strength_range(),
                defaults.orb_strength,
            ),
            boundary: self.boundary,
        }
    }

    pub fn diff(&self, previous: &SimulationParams) -> ParamChange {
        ParamChange {
            population_changed: self.num_boids != previous.num_boids,
            any_changed: self != previous,
        }
    }
}

fn clamp_or(value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(*range.start(), *range.end())
    }
}
