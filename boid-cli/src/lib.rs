//! Headless flock runner: loads settings, places orbs, steps the engine for a
//! fixed number of frames and reports the final status.

use std::path::Path;

use anyhow::{bail, Context, Result};
use boid_core::{Flock, OrbKind};
use boid_shared::{FlockSettings, FlockStatus, OrbPlacement, Position};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub width: f32,
    pub height: f32,
    pub frames: u64,
    /// Log a status line every this many frames, 0 disables progress logging
    pub report_every: u64,
    pub seed: Option<u64>,
    pub settings: FlockSettings,
    pub orbs: Vec<OrbPlacement>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            frames: 600,
            report_every: 100,
            seed: None,
            settings: FlockSettings::default(),
            orbs: Vec::new(),
        }
    }
}

pub fn load_settings(path: &Path) -> Result<FlockSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = FlockSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    Ok(settings)
}

/// Parses `x,y,kind` where kind is `attract` or `repel`
pub fn parse_orb(input: &str) -> Result<OrbPlacement> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    let [x, y, kind] = parts.as_slice() else {
        bail!("Orb must be given as x,y,attract|repel, got '{}'", input);
    };

    let x: f32 = x
        .parse()
        .with_context(|| format!("Invalid orb x coordinate '{}'", x))?;
    let y: f32 = y
        .parse()
        .with_context(|| format!("Invalid orb y coordinate '{}'", y))?;

    let kind = match *kind {
        "attract" | "attractor" => OrbKind::Attractor,
        "repel" | "repulsor" => OrbKind::Repulsor,
        other => bail!("Unknown orb kind '{}', expected attract or repel", other),
    };

    Ok(OrbPlacement {
        position: Position::new(x, y),
        kind,
    })
}

pub fn run_headless(config: &RunConfig) -> Result<FlockStatus> {
    let finite = config.width.is_finite() && config.height.is_finite();
    if !(finite && config.width > 0.0 && config.height > 0.0) {
        bail!(
            "Canvas must have a finite positive size, got {}x{}",
            config.width,
            config.height
        );
    }
    config
        .settings
        .validate()
        .context("Settings out of range")?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut flock = Flock::new_with_rng(
        config.width,
        config.height,
        config.settings.to_params(),
        &mut rng,
    );
    for placement in &config.orbs {
        flock.add_orb(placement.to_orb());
    }

    log::info!(
        "Running {} frames with {} boids and {} orbs on {}x{}",
        config.frames,
        flock.boids.len(),
        flock.orbs.len(),
        config.width,
        config.height
    );

    for _ in 0..config.frames {
        flock.update();

        if config.report_every > 0 && flock.frame() % config.report_every == 0 {
            let stats = flock.stats();
            log::info!(
                "frame {}: mean speed {:.3}, max speed {:.3}",
                stats.frame,
                stats.mean_speed,
                stats.max_observed_speed
            );
        }
    }

    Ok(FlockStatus::of(&flock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orb_kinds() {
        let orb = parse_orb("10, 20, attract").unwrap();
        assert_eq!(orb.position, Position::new(10.0, 20.0));
        assert_eq!(orb.kind, OrbKind::Attractor);

        assert_eq!(parse_orb("1,2,repel").unwrap().kind, OrbKind::Repulsor);
    }

    #[test]
    fn test_parse_orb_rejects_garbage() {
        assert!(parse_orb("1,2").is_err());
        assert!(parse_orb("a,2,repel").is_err());
        assert!(parse_orb("1,2,spin").is_err());
    }
}
