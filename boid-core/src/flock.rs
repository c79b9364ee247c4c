#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use rand::Rng;

use crate::behavior;
use crate::{
    AgentView, Boid, Orb, OrbBindings, OrbKind, OrbView, PointerButton, SimulationParams,
    Vector2D,
};

/// Aggregate numbers about the current population
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlockStats {
    pub boid_count: usize,
    pub orb_count: usize,
    pub frame: u64,
    pub mean_speed: f32,
    pub max_observed_speed: f32,
}

/// The boid population, the orbs acting on it and the canvas it lives in
pub struct Flock {
    pub boids: Vec<Boid>,
    pub orbs: Vec<Orb>,
    pub params: SimulationParams,
    pub width: f32,
    pub height: f32,
    frame: u64,
}

impl Flock {
    #[cfg(feature = "std")]
    pub fn new(width: f32, height: f32, params: SimulationParams) -> Self {
        Self::new_with_rng(width, height, params, &mut rand::thread_rng())
    }

    pub fn new_with_rng<R: Rng + ?Sized>(
        width: f32,
        height: f32,
        params: SimulationParams,
        rng: &mut R,
    ) -> Self {
        let mut flock = Self {
            boids: Vec::new(),
            orbs: Vec::new(),
            params,
            width,
            height,
            frame: 0,
        };
        flock.reset_with(rng);
        flock
    }

    /// Flock over an explicit population; `params.num_boids` follows its length
    pub fn with_boids(width: f32, height: f32, params: SimulationParams, boids: Vec<Boid>) -> Self {
        let params = SimulationParams {
            num_boids: boids.len(),
            ..params
        };

        Self {
            boids,
            orbs: Vec::new(),
            params,
            width,
            height,
            frame: 0,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances the simulation by one frame.
    ///
    /// Forces are computed from the population as it stood at the start of the
    /// frame, then every boid integrates and resolves the boundary.
    pub fn update(&mut self) {
        let params = self.params;

        let forces: Vec<Vector2D> = self
            .boids
            .iter()
            .map(|boid| {
                let mut force = behavior::flocking_force(boid, &self.boids, &params);
                for orb in &self.orbs {
                    force += behavior::orb_force(boid, orb, &params);
                }
                force
            })
            .collect();

        for (boid, force) in self.boids.iter_mut().zip(forces) {
            boid.apply_force(force);
            boid.update(params.max_speed);
            boid.resolve_boundary(params.boundary, self.width, self.height);
        }

        self.frame += 1;
    }

    /// Tears down every boid and orb and spawns `params.num_boids` fresh boids
    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        log::debug!(
            "resetting flock: {} boids on {}x{} canvas",
            self.params.num_boids,
            self.width,
            self.height
        );

        let (width, height) = (self.width, self.height);
        let max_speed = self.params.max_speed;

        self.boids.clear();
        self.orbs.clear();
        self.boids.extend(
            (0..self.params.num_boids).map(|_| Boid::random_with(rng, width, height, max_speed)),
        );
        self.frame = 0;
    }

    #[cfg(feature = "std")]
    pub fn reset(&mut self) {
        self.reset_with(&mut rand::thread_rng());
    }

    pub fn restore_defaults_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.params = SimulationParams::default();
        self.reset_with(rng);
    }

    #[cfg(feature = "std")]
    pub fn restore_defaults(&mut self) {
        self.restore_defaults_with(&mut rand::thread_rng());
    }

    /// Replaces the parameters, rebuilding the population when its size changed.
    /// Returns whether a reset happened.
    pub fn set_params_with<R: Rng + ?Sized>(&mut self, params: SimulationParams, rng: &mut R) -> bool {
        let change = params.diff(&self.params);
        self.params = params;

        if change.any_changed {
            log::trace!("parameters changed: {:?}", self.params);
        }

        if change.population_changed {
            self.reset_with(rng);
        }

        change.population_changed
    }

    #[cfg(feature = "std")]
    pub fn set_params(&mut self, params: SimulationParams) -> bool {
        self.set_params_with(params, &mut rand::thread_rng())
    }

    pub fn add_orb(&mut self, orb: Orb) {
        log::debug!(
            "placing {:?} at ({:.1}, {:.1})",
            orb.kind,
            orb.position.x,
            orb.position.y
        );
        self.orbs.push(orb);
    }

    /// Places the orb bound to `button`, if any, at `position`
    pub fn place_orb(
        &mut self,
        position: Vector2D,
        button: PointerButton,
        bindings: &OrbBindings,
    ) -> Option<OrbKind> {
        let kind = bindings.kind_for(button)?;
        self.add_orb(Orb::new(position, kind));
        Some(kind)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn agent_views(&self) -> impl Iterator<Item = AgentView> + '_ {
        self.boids.iter().map(Boid::view)
    }

    pub fn orb_views(&self) -> impl Iterator<Item = OrbView> + '_ {
        self.orbs.iter().map(Orb::view)
    }

    pub fn stats(&self) -> FlockStats {
        let (total, max) = self
            .boids
            .iter()
            .map(|boid| boid.velocity.magnitude())
            .fold((0.0f32, 0.0f32), |(total, max), speed| {
                (total + speed, max.max(speed))
            });

        let mean_speed = if self.boids.is_empty() {
            0.0
        } else {
            total / self.boids.len() as f32
        };

        FlockStats {
            boid_count: self.boids.len(),
            orb_count: self.orbs.len(),
            frame: self.frame,
            mean_speed,
            max_observed_speed: max,
        }
    }
}
