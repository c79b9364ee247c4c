#![cfg_attr(not(feature = "std"), no_std)]

//! Boid flocking engine.
//!
//! Agents steer by three local rules (separation, alignment, cohesion) plus
//! optional attractor/repulsor orbs, integrate under speed and force caps and
//! then resolve the canvas boundary by wrapping or bouncing.

#[cfg(not(feature = "std"))]
extern crate alloc;

use rand::Rng;

pub mod config;
pub mod flock;
pub mod orb;

pub use config::{BoundaryMode, ParamChange, SimulationParams};
pub use flock::{Flock, FlockStats};
pub use orb::{Orb, OrbBindings, OrbKind, OrbView, PointerButton};

/// Size used for boids created without an explicit size
pub const DEFAULT_BOID_SIZE: f32 = 2.0;

/// Separation radius as a multiple of boid size
pub const SEPARATION_FACTOR: f32 = 6.0;

/// Distance kept from an edge after a bounce
pub const BOUNCE_INSET: f32 = 1.0;

#[inline]
fn sqrtf(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(value)
    }
}

#[inline]
fn atan2f(y: f32, x: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        y.atan2(x)
    }
    #[cfg(not(feature = "std"))]
    {
        libm::atan2f(y, x)
    }
}

/// A 2D vector used for position, velocity and forces.
///
/// Every operation returns a new value; nothing mutates through a shared
/// reference, so there is no need to copy an operand before subtracting.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn scale(&self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Divides both components. A zero divisor produces non-finite
    /// components, use [`Vector2D::checked_divide`] when it can be zero.
    pub fn divide(&self, divisor: f32) -> Self {
        Self {
            x: self.x / divisor,
            y: self.y / divisor,
        }
    }

    pub fn checked_divide(&self, divisor: f32) -> Option<Self> {
        if divisor == 0.0 {
            None
        } else {
            Some(self.divide(divisor))
        }
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.dot(self)
    }

    pub fn magnitude(&self) -> f32 {
        sqrtf(self.magnitude_squared())
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            self.divide(mag)
        } else {
            *self
        }
    }

    pub fn with_magnitude(&self, magnitude: f32) -> Self {
        self.normalize().scale(magnitude)
    }

    /// Clamps the magnitude to `max`, leaving shorter vectors untouched.
    pub fn limit(&self, max: f32) -> Self {
        if self.magnitude() > max {
            self.with_magnitude(max)
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }

    /// Angle of the vector in radians, measured from the positive x axis.
    pub fn heading(&self) -> f32 {
        atan2f(self.y, self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        self.scale(scalar)
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        self.divide(scalar)
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

/// Opaque per-boid color, only meaningful to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const NEUTRAL: Rgb = Rgb::new(220, 220, 220);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Random color bright enough to stand out on a dark canvas
    pub fn random_bright<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(100..=255),
            g: rng.gen_range(100..=255),
            b: rng.gen_range(100..=255),
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// What the renderer needs to draw one boid as an oriented triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub position: Vector2D,
    pub heading: f32,
    pub size: f32,
    pub color: Rgb,
}

/// A single boid entity
#[derive(Debug, Clone)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    pub size: f32,
    pub color: Rgb,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
            size: DEFAULT_BOID_SIZE,
            color: Rgb::NEUTRAL,
        }
    }

    /// Random boid inside `[0, width) x [0, height)` moving no faster than `max_speed`
    pub fn random_with<R: Rng + ?Sized>(
        rng: &mut R,
        width: f32,
        height: f32,
        max_speed: f32,
    ) -> Self {
        let position = Vector2D::new(sample_extent(rng, width), sample_extent(rng, height));
        let velocity = Vector2D::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0))
            .limit(max_speed.max(0.0));
        let mut boid = Self::new(position, velocity);
        boid.color = Rgb::random_bright(rng);
        boid
    }

    #[cfg(feature = "std")]
    pub fn random(width: f32, height: f32, max_speed: f32) -> Self {
        Self::random_with(&mut rand::thread_rng(), width, height, max_speed)
    }

    pub fn desired_separation(&self) -> f32 {
        self.size * SEPARATION_FACTOR
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    pub fn update(&mut self, max_speed: f32) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(max_speed);
        self.position += self.velocity;
        self.acceleration = Vector2D::zero();
    }

    /// Teleports the boid to the opposite edge, velocity is untouched
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        if self.position.x < 0.0 {
            self.position.x = width;
        } else if self.position.x > width {
            self.position.x = 0.0;
        }

        if self.position.y < 0.0 {
            self.position.y = height;
        } else if self.position.y > height {
            self.position.y = 0.0;
        }
    }

    /// Pulls the boid just inside the edge and reverses the crossing component
    pub fn bounce_edges(&mut self, width: f32, height: f32) {
        if self.position.x < 0.0 {
            self.position.x = BOUNCE_INSET;
            self.velocity.x = -self.velocity.x;
        } else if self.position.x > width {
            self.position.x = width - BOUNCE_INSET;
            self.velocity.x = -self.velocity.x;
        }

        if self.position.y < 0.0 {
            self.position.y = BOUNCE_INSET;
            self.velocity.y = -self.velocity.y;
        } else if self.position.y > height {
            self.position.y = height - BOUNCE_INSET;
            self.velocity.y = -self.velocity.y;
        }
    }

    pub fn resolve_boundary(&mut self, mode: BoundaryMode, width: f32, height: f32) {
        match mode {
            BoundaryMode::Wrap => self.wrap_edges(width, height),
            BoundaryMode::Bounce => self.bounce_edges(width, height),
        }
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            position: self.position,
            heading: self.velocity.heading(),
            size: self.size,
            color: self.color,
        }
    }
}

fn sample_extent<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> f32 {
    if extent > 0.0 {
        rng.gen_range(0.0..extent)
    } else {
        0.0
    }
}

/// Steering rules, each computed from a scan over the whole population
pub mod behavior {
    use super::*;

    /// Distance under which orbs stop pushing, avoids the singularity at zero
    pub const ORB_MIN_DISTANCE: f32 = 1.0;

    /// Reynolds steering: desired velocity at full speed minus current velocity
    fn steer(boid: &Boid, desired: Vector2D, params: &SimulationParams) -> Vector2D {
        (desired.with_magnitude(params.max_speed) - boid.velocity).limit(params.max_force)
    }

    pub fn separation<'a, I>(boid: &Boid, others: I, params: &SimulationParams) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let radius = boid.desired_separation();
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            let distance = boid.position.distance(&other.position);
            if distance > 0.0 && distance < radius {
                // Inverse-square weighting, closer neighbors push harder
                sum += (boid.position - other.position) / (distance * distance);
                count += 1;
            }
        }

        if count > 0 {
            steer(boid, sum / count as f32, params)
        } else {
            Vector2D::zero()
        }
    }

    pub fn alignment<'a, I>(boid: &Boid, others: I, params: &SimulationParams) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            let distance = boid.position.distance(&other.position);
            if distance > 0.0 && distance < params.perception_radius {
                sum += other.velocity;
                count += 1;
            }
        }

        if count > 0 {
            steer(boid, sum / count as f32, params)
        } else {
            Vector2D::zero()
        }
    }

    pub fn cohesion<'a, I>(boid: &Boid, others: I, params: &SimulationParams) -> Vector2D
    where
        I: Iterator<Item = &'a Boid>,
    {
        let mut sum = Vector2D::zero();
        let mut count = 0;

        for other in others {
            let distance = boid.position.distance(&other.position);
            if distance > 0.0 && distance < params.perception_radius {
                sum += other.position;
                count += 1;
            }
        }

        if count > 0 {
            seek(boid, sum / count as f32, params)
        } else {
            Vector2D::zero()
        }
    }

    pub fn seek(boid: &Boid, target: Vector2D, params: &SimulationParams) -> Vector2D {
        steer(boid, target - boid.position, params)
    }

    /// Pull (attractor) or push (repulsor) from a single orb, fading with distance
    pub fn orb_force(boid: &Boid, orb: &Orb, params: &SimulationParams) -> Vector2D {
        let distance = boid.position.distance(&orb.position);
        if distance <= ORB_MIN_DISTANCE || distance >= 2.0 * params.perception_radius {
            return Vector2D::zero();
        }

        let direction = (orb.position - boid.position).normalize();
        let strength = orb.kind.sign() * params.orb_strength / distance;
        (direction * strength).limit(params.max_force)
    }

    /// Weighted sum of the three flocking rules
    pub fn flocking_force(boid: &Boid, others: &[Boid], params: &SimulationParams) -> Vector2D {
        let sep = separation(boid, others.iter(), params) * params.separation_weight;
        let ali = alignment(boid, others.iter(), params) * params.alignment_weight;
        let coh = cohesion(boid, others.iter(), params) * params.cohesion_weight;
        sep + ali + coh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn resting(x: f32, y: f32) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::zero())
    }

    #[test]
    fn test_vector2d_magnitude() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(v.magnitude_squared(), 25.0);
    }

    #[test]
    fn test_vector2d_normalize() {
        let v = Vector2D::new(3.0, 4.0);
        let normalized = v.normalize();
        assert!((normalized.magnitude() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_vector2d_normalize_zero_is_noop() {
        assert_eq!(Vector2D::zero().normalize(), Vector2D::zero());
        assert_eq!(Vector2D::zero().with_magnitude(4.0), Vector2D::zero());
    }

    #[test]
    fn test_vector2d_operations() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        assert_eq!(v1 + v2, Vector2D::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vector2D::new(2.0, 2.0));
        assert_eq!(v1 * 2.0, Vector2D::new(2.0, 4.0));
        assert_eq!(v2 / 2.0, Vector2D::new(1.5, 2.0));
        assert_eq!(-v1, Vector2D::new(-1.0, -2.0));

        // operands are values, nothing is modified in place
        assert_eq!(v1, Vector2D::new(1.0, 2.0));
    }

    #[test]
    fn test_vector2d_divide_by_zero() {
        assert!(!Vector2D::new(1.0, 1.0).divide(0.0).is_finite());
        assert_eq!(Vector2D::new(1.0, 1.0).checked_divide(0.0), None);
        assert_eq!(
            Vector2D::new(2.0, 4.0).checked_divide(2.0),
            Some(Vector2D::new(1.0, 2.0))
        );
    }

    #[test]
    fn test_vector2d_limit() {
        let long = Vector2D::new(30.0, 40.0).limit(5.0);
        assert!((long.magnitude() - 5.0).abs() < EPSILON);
        assert!((long.x - 3.0).abs() < EPSILON);

        let short = Vector2D::new(0.3, 0.4);
        assert_eq!(short.limit(5.0), short);
    }

    #[test]
    fn test_vector2d_distance_and_heading() {
        let a = Vector2D::new(1.0, 1.0);
        let b = Vector2D::new(4.0, 5.0);
        assert_eq!(a.distance(&b), 5.0);
        assert!((Vector2D::new(0.0, 1.0).heading() - core::f32::consts::FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn test_boid_update_integrates_and_clears_acceleration() {
        let mut boid = Boid::new(Vector2D::zero(), Vector2D::new(1.0, 1.0));
        boid.apply_force(Vector2D::new(1.0, 0.0));
        boid.update(10.0);

        assert_eq!(boid.velocity, Vector2D::new(2.0, 1.0));
        assert_eq!(boid.position, Vector2D::new(2.0, 1.0));
        assert_eq!(boid.acceleration, Vector2D::zero());
    }

    #[test]
    fn test_boid_update_caps_speed() {
        let mut boid = Boid::new(Vector2D::zero(), Vector2D::new(3.0, 0.0));
        boid.apply_force(Vector2D::new(10.0, 10.0));
        boid.update(4.0);
        assert!(boid.velocity.magnitude() <= 4.0 + EPSILON);
    }

    #[test]
    fn test_boid_wrap_edges() {
        let mut boid = Boid::new(Vector2D::new(101.0, -1.0), Vector2D::new(2.0, -3.0));
        boid.wrap_edges(100.0, 50.0);

        assert_eq!(boid.position, Vector2D::new(0.0, 50.0));
        assert_eq!(boid.velocity, Vector2D::new(2.0, -3.0));

        let mut boid = Boid::new(Vector2D::new(-0.5, 51.0), Vector2D::new(-1.0, 1.0));
        boid.wrap_edges(100.0, 50.0);
        assert_eq!(boid.position, Vector2D::new(100.0, 0.0));
    }

    #[test]
    fn test_boid_bounce_edges() {
        let mut boid = Boid::new(Vector2D::new(101.0, 20.0), Vector2D::new(2.0, 1.0));
        boid.bounce_edges(100.0, 50.0);
        assert_eq!(boid.position, Vector2D::new(99.0, 20.0));
        assert_eq!(boid.velocity, Vector2D::new(-2.0, 1.0));

        let mut boid = Boid::new(Vector2D::new(-3.0, 52.0), Vector2D::new(-2.0, 1.5));
        boid.bounce_edges(100.0, 50.0);
        assert_eq!(boid.position, Vector2D::new(1.0, 49.0));
        assert_eq!(boid.velocity, Vector2D::new(2.0, -1.5));

        let mut boid = Boid::new(Vector2D::new(50.0, -0.1), Vector2D::new(0.0, -1.0));
        boid.bounce_edges(100.0, 50.0);
        assert_eq!(boid.position.y, 1.0);
        assert_eq!(boid.velocity.y, 1.0);
    }

    #[test]
    fn test_separation_pushes_apart() {
        let params = SimulationParams::default();
        let first = resting(10.0, 10.0);
        let second = resting(11.0, 10.0);
        let flock = [first.clone(), second];

        let steering = behavior::separation(&first, flock.iter(), &params);

        assert!(steering.magnitude() > 0.0);
        assert!(steering.x < 0.0, "should point from the second boid toward the first");
        assert!(steering.y.abs() < EPSILON);
        assert!(steering.magnitude() <= params.max_force + EPSILON);
    }

    #[test]
    fn test_separation_ignores_boids_outside_desired_distance() {
        let params = SimulationParams::default();
        let boid = resting(0.0, 0.0);
        // size 2 gives a desired separation of 12
        let flock = [boid.clone(), resting(12.5, 0.0)];

        assert_eq!(behavior::separation(&boid, flock.iter(), &params), Vector2D::zero());
    }

    #[test]
    fn test_no_neighbors_yields_zero_steering() {
        let params = SimulationParams::default();
        let boid = Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 0.0));
        let far = resting(500.0, 500.0);
        let flock = [boid.clone(), far];

        assert_eq!(behavior::separation(&boid, flock.iter(), &params), Vector2D::zero());
        assert_eq!(behavior::alignment(&boid, flock.iter(), &params), Vector2D::zero());
        assert_eq!(behavior::cohesion(&boid, flock.iter(), &params), Vector2D::zero());
        assert_eq!(behavior::cohesion(&boid, core::iter::empty(), &params), Vector2D::zero());
    }

    #[test]
    fn test_alignment_steers_toward_neighbor_heading() {
        let params = SimulationParams::default();
        let boid = Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 0.0));
        let neighbor = Boid::new(Vector2D::new(20.0, 0.0), Vector2D::new(0.0, 3.0));
        let flock = [boid.clone(), neighbor];

        let steering = behavior::alignment(&boid, flock.iter(), &params);

        assert!(steering.y > 0.0);
        assert!(steering.magnitude() <= params.max_force + EPSILON);
    }

    #[test]
    fn test_cohesion_steers_toward_centroid() {
        let params = SimulationParams::default();
        let boid = resting(0.0, 0.0);
        let flock = [boid.clone(), resting(20.0, 10.0), resting(20.0, -10.0)];

        let steering = behavior::cohesion(&boid, flock.iter(), &params);

        assert!(steering.x > 0.0);
        assert!(steering.y.abs() < EPSILON);
        assert!(steering.magnitude() <= params.max_force + EPSILON);
    }

    #[test]
    fn test_orb_force_direction() {
        let params = SimulationParams::default();
        let boid = resting(100.0, 100.0);
        let target = Vector2D::new(130.0, 140.0);
        let to_orb = target - boid.position;

        let attract = behavior::orb_force(&boid, &Orb::new(target, OrbKind::Attractor), &params);
        let repel = behavior::orb_force(&boid, &Orb::new(target, OrbKind::Repulsor), &params);

        assert!(attract.dot(&to_orb) > 0.0);
        assert!(repel.dot(&to_orb) < 0.0);
        assert!(attract.magnitude() <= params.max_force + EPSILON);
    }

    #[test]
    fn test_orb_force_range() {
        let params = SimulationParams::default();
        let boid = resting(0.0, 0.0);

        let beyond = Orb::new(
            Vector2D::new(2.0 * params.perception_radius + 1.0, 0.0),
            OrbKind::Attractor,
        );
        assert_eq!(behavior::orb_force(&boid, &beyond, &params), Vector2D::zero());

        let on_top = Orb::new(Vector2D::new(0.5, 0.0), OrbKind::Repulsor);
        assert_eq!(behavior::orb_force(&boid, &on_top, &params), Vector2D::zero());
    }

    #[test]
    fn test_flocking_force_respects_weights() {
        let mut params = SimulationParams::default();
        params.separation_weight = 0.0;
        params.alignment_weight = 0.0;
        params.cohesion_weight = 0.0;
        let flock = [resting(0.0, 0.0), resting(1.0, 0.0), resting(5.0, 5.0)];

        assert_eq!(
            behavior::flocking_force(&flock[0], &flock, &params),
            Vector2D::zero()
        );
    }

    #[test]
    fn test_boid_view_heading() {
        let boid = Boid::new(Vector2D::new(5.0, 5.0), Vector2D::new(-1.0, 0.0));
        let view = boid.view();
        assert_eq!(view.position, Vector2D::new(5.0, 5.0));
        assert!((view.heading - core::f32::consts::PI).abs() < EPSILON);
    }
}
