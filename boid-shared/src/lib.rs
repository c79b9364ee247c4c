#![cfg_attr(not(feature = "std"), no_std)]

//! Serializable settings, UI updates and status messages shared by the
//! browser front end and the headless runner.

use core::fmt;
use core::ops::RangeInclusive;

use boid_core::{
    BoundaryMode, Flock, FlockStats, Orb, OrbBindings, OrbKind, ParamChange, SimulationParams,
    Vector2D,
};
use serde::{Deserialize, Serialize};

/// Represents a 2D position in canvas coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Position> for Vector2D {
    fn from(position: Position) -> Self {
        Vector2D::new(position.x, position.y)
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Position::new(v.x, v.y)
    }
}

#[derive(Debug)]
pub enum SettingsError {
    /// A numeric setting is NaN, infinite or outside its slider range
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    TooManyBoids {
        requested: usize,
        max: usize,
    },
    #[cfg(feature = "std")]
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{} = {} is outside {}..={}", field, value, min, max),
            SettingsError::TooManyBoids { requested, max } => {
                write!(f, "num_boids = {} exceeds the maximum of {}", requested, max)
            }
            #[cfg(feature = "std")]
            SettingsError::Parse(e) => write!(f, "invalid settings JSON: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

/// Boid simulation configuration as stored in a settings document.
///
/// Missing fields take their defaults, so `{"num_boids": 300}` is a valid file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockSettings {
    pub num_boids: usize,
    pub perception_radius: f32,
    pub max_force: f32,
    pub max_speed: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub orb_strength: f32,
    pub boundary: BoundaryMode,
    pub orb_bindings: OrbBindings,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self::from_parts(SimulationParams::default(), OrbBindings::default())
    }
}

impl From<SimulationParams> for FlockSettings {
    fn from(params: SimulationParams) -> Self {
        Self::from_parts(params, OrbBindings::default())
    }
}

impl FlockSettings {
    pub fn from_parts(params: SimulationParams, orb_bindings: OrbBindings) -> Self {
        Self {
            num_boids: params.num_boids,
            perception_radius: params.perception_radius,
            max_force: params.max_force,
            max_speed: params.max_speed,
            separation_weight: params.separation_weight,
            alignment_weight: params.alignment_weight,
            cohesion_weight: params.cohesion_weight,
            orb_strength: params.orb_strength,
            boundary: params.boundary,
            orb_bindings,
        }
    }

    pub fn to_params(&self) -> SimulationParams {
        SimulationParams {
            num_boids: self.num_boids,
            perception_radius: self.perception_radius,
            max_force: self.max_force,
            max_speed: self.max_speed,
            separation_weight: self.separation_weight,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            orb_strength: self.orb_strength,
            boundary: self.boundary,
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let max_boids = *SimulationParams::num_boids_range().end();
        if self.num_boids > max_boids {
            return Err(SettingsError::TooManyBoids {
                requested: self.num_boids,
                max: max_boids,
            });
        }

        check(
            "perception_radius",
            self.perception_radius,
            SimulationParams::perception_radius_range(),
        )?;
        check("max_force", self.max_force, SimulationParams::max_force_range())?;
        check("max_speed", self.max_speed, SimulationParams::max_speed_range())?;
        check(
            "separation_weight",
            self.separation_weight,
            SimulationParams::weight_range(),
        )?;
        check(
            "alignment_weight",
            self.alignment_weight,
            SimulationParams::weight_range(),
        )?;
        check(
            "cohesion_weight",
            self.cohesion_weight,
            SimulationParams::weight_range(),
        )?;
        check(
            "orb_strength",
            self.orb_strength,
            SimulationParams::orb_strength_range(),
        )?;
        Ok(())
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: FlockSettings = serde_json::from_str(json)?;
        settings.validate()?;
        log::debug!("loaded settings: {:?}", settings);
        Ok(settings)
    }

    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check(field: &'static str, value: f32, range: RangeInclusive<f32>) -> Result<(), SettingsError> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// A single slider or toggle change coming from the UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "param", content = "value", rename_all = "snake_case")]
pub enum SettingsUpdate {
    NumBoids(usize),
    PerceptionRadius(f32),
    MaxSpeed(f32),
    MaxForce(f32),
    SeparationWeight(f32),
    AlignmentWeight(f32),
    CohesionWeight(f32),
    OrbStrength(f32),
    Boundary(BoundaryMode),
    ToggleBoundary,
    RestoreDefaults,
}

impl SettingsUpdate {
    /// Writes the change into `params`, clamped to the slider ranges
    pub fn apply(&self, params: &mut SimulationParams) -> ParamChange {
        let before = *params;

        match *self {
            SettingsUpdate::NumBoids(n) => params.num_boids = n,
            SettingsUpdate::PerceptionRadius(r) => params.perception_radius = r,
            SettingsUpdate::MaxSpeed(s) => params.max_speed = s,
            SettingsUpdate::MaxForce(f) => params.max_force = f,
            SettingsUpdate::SeparationWeight(w) => params.separation_weight = w,
            SettingsUpdate::AlignmentWeight(w) => params.alignment_weight = w,
            SettingsUpdate::CohesionWeight(w) => params.cohesion_weight = w,
            SettingsUpdate::OrbStrength(s) => params.orb_strength = s,
            SettingsUpdate::Boundary(mode) => params.boundary = mode,
            SettingsUpdate::ToggleBoundary => params.boundary = params.boundary.toggled(),
            SettingsUpdate::RestoreDefaults => *params = SimulationParams::default(),
        }

        *params = params.clamped();
        log::trace!("{:?} applied", self);

        // Restoring defaults always rebuilds the population from scratch
        if *self == SettingsUpdate::RestoreDefaults {
            return ParamChange {
                population_changed: true,
                any_changed: true,
            };
        }
        params.diff(&before)
    }

    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Orb placement request, e.g. from a command line or a saved scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbPlacement {
    pub position: Position,
    pub kind: OrbKind,
}

impl OrbPlacement {
    pub fn to_orb(&self) -> Orb {
        Orb::new(self.position.into(), self.kind)
    }
}

/// Status snapshot of a running flock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockStatus {
    pub width: f32,
    pub height: f32,
    pub boundary: BoundaryMode,
    pub stats: FlockStats,
}

impl FlockStatus {
    pub fn of(flock: &Flock) -> Self {
        Self {
            width: flock.width,
            height: flock.height,
            boundary: flock.params.boundary,
            stats: flock.stats(),
        }
    }
}
