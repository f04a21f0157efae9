//! Particle stream on the active pipe.
//!
//! Liquids spawn almost every frame and draw as long streaks, which reads as a
//! continuous stream; gases spawn rarely and draw as short puffs.

use rand::Rng;
use rc_core::{Particle, Point, QuadCurve, RefrigerantState, ensure_probability, require_finite};
use rc_graph::Connection;

use crate::error::{SimError, SimResult};
use crate::phase::Phase;

/// Per-frame spawn chance on a pipe carrying liquid.
pub const LIQUID_SPAWN_PROBABILITY: f64 = 0.8;
/// Per-frame spawn chance on a pipe carrying gas.
pub const GAS_SPAWN_PROBABILITY: f64 = 0.05;
/// Progress gained per frame is `speed / PROGRESS_DIVISOR`.
pub const PROGRESS_DIVISOR: f64 = 150.0;

/// Tuning for spawning and advancing particles.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticleConfig {
    pub liquid_spawn_probability: f64,
    pub gas_spawn_probability: f64,
    pub progress_divisor: f64,
    /// Speed is drawn uniformly from `[speed_min, speed_max)`.
    pub speed_min: f64,
    pub speed_max: f64,
    pub size_min: f64,
    pub size_max: f64,
    pub liquid_length_min: f64,
    pub liquid_length_max: f64,
    pub gas_length: f64,
    /// Spawning pauses while a pipe holds this many particles.
    pub max_per_connection: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            liquid_spawn_probability: LIQUID_SPAWN_PROBABILITY,
            gas_spawn_probability: GAS_SPAWN_PROBABILITY,
            progress_divisor: PROGRESS_DIVISOR,
            speed_min: 0.8,
            speed_max: 1.2,
            size_min: 1.0,
            size_max: 1.5,
            liquid_length_min: 25.0,
            liquid_length_max: 35.0,
            gas_length: 6.0,
            max_per_connection: 256,
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> SimResult<()> {
        ensure_probability(self.liquid_spawn_probability, "liquid_spawn_probability")?;
        ensure_probability(self.gas_spawn_probability, "gas_spawn_probability")?;
        if require_finite(self.progress_divisor, "progress_divisor")? <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "progress_divisor must be positive",
            });
        }
        let ranges = [
            (self.speed_min, self.speed_max, "speed range must be ordered"),
            (self.size_min, self.size_max, "size range must be ordered"),
            (
                self.liquid_length_min,
                self.liquid_length_max,
                "liquid length range must be ordered",
            ),
        ];
        for (lo, hi, what) in ranges {
            require_finite(lo, what)?;
            require_finite(hi, what)?;
            if lo > hi {
                return Err(SimError::InvalidArg { what });
            }
        }
        if self.speed_min < 0.0 {
            return Err(SimError::InvalidArg {
                what: "speed must be non-negative",
            });
        }
        require_finite(self.gas_length, "gas_length")?;
        Ok(())
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Spawns, advances and retires particles.
#[derive(Clone, Debug)]
pub struct ParticleStream {
    config: ParticleConfig,
}

impl Default for ParticleStream {
    fn default() -> Self {
        Self {
            config: ParticleConfig::default(),
        }
    }
}

impl ParticleStream {
    pub fn new(config: ParticleConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn spawn_probability(&self, state: RefrigerantState) -> f64 {
        if state.is_liquid() {
            self.config.liquid_spawn_probability
        } else {
            self.config.gas_spawn_probability
        }
    }

    fn spawn<R: Rng + ?Sized>(&self, state: RefrigerantState, rng: &mut R) -> Particle {
        let c = &self.config;
        let speed = sample(rng, c.speed_min, c.speed_max);
        let size = sample(rng, c.size_min, c.size_max);
        let length = if state.is_liquid() {
            sample(rng, c.liquid_length_min, c.liquid_length_max)
        } else {
            c.gas_length
        };
        Particle {
            progress: 0.0,
            speed,
            size,
            length,
            state,
        }
    }

    /// One frame for one pipe.
    ///
    /// `phase` is `None` while the simulation is stopped, which makes every
    /// pipe inactive.
    pub fn update<R: Rng + ?Sized>(
        &self,
        conn: &mut Connection,
        phase: Option<Phase>,
        rng: &mut R,
    ) {
        let Some(phase) = phase.filter(|p| p.is_active(conn.source, conn.dest)) else {
            conn.particles.clear();
            return;
        };

        let state = phase.refrigerant();
        if conn.particles.len() < self.config.max_per_connection
            && rng.r#gen::<f64>() < self.spawn_probability(state)
        {
            conn.particles.push(self.spawn(state, rng));
        }

        let divisor = self.config.progress_divisor;
        conn.particles.retain_mut(|p| {
            p.progress += p.speed / divisor;
            p.progress <= 1.0
        });
    }

    /// One frame for every pipe.
    pub fn update_all<R: Rng + ?Sized>(
        &self,
        connections: &mut [Connection],
        phase: Option<Phase>,
        rng: &mut R,
    ) {
        for conn in connections {
            self.update(conn, phase, rng);
        }
    }
}

/// Canvas position of a particle on its pipe.
pub fn particle_position(curve: &QuadCurve, particle: &Particle) -> Point {
    curve.point_at(particle.progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rc_core::ComponentKind;

    fn always_spawn() -> ParticleStream {
        ParticleStream::new(ParticleConfig {
            liquid_spawn_probability: 1.0,
            gas_spawn_probability: 1.0,
            ..ParticleConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(ParticleConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = ParticleConfig {
            gas_spawn_probability: 1.5,
            ..ParticleConfig::default()
        };
        assert!(ParticleStream::new(bad).is_err());

        let bad = ParticleConfig {
            progress_divisor: 0.0,
            ..ParticleConfig::default()
        };
        assert!(ParticleStream::new(bad).is_err());

        let bad = ParticleConfig {
            speed_min: 2.0,
            speed_max: 1.0,
            ..ParticleConfig::default()
        };
        assert!(ParticleStream::new(bad).is_err());
    }

    #[test]
    fn spawn_rates_by_state() {
        let stream = ParticleStream::default();
        assert_eq!(
            stream.spawn_probability(RefrigerantState::ColdLiquid),
            LIQUID_SPAWN_PROBABILITY
        );
        assert_eq!(
            stream.spawn_probability(RefrigerantState::HotGas),
            GAS_SPAWN_PROBABILITY
        );
    }

    #[test]
    fn active_pipe_spawns_and_advances() {
        let stream = always_spawn();
        let mut rng = StdRng::seed_from_u64(7);
        let mut conn = Connection::new(ComponentKind::ExpansionValve, ComponentKind::Evaporator);
        let phase = Some(Phase::ExpansionToEvaporator);

        stream.update(&mut conn, phase, &mut rng);
        assert_eq!(conn.particles.len(), 1);
        let p = conn.particles[0];
        assert_eq!(p.state, RefrigerantState::ColdLiquid);
        assert!((p.progress - p.speed / PROGRESS_DIVISOR).abs() < 1e-12);
        assert!((25.0..35.0).contains(&p.length));
        assert!((0.8..1.2).contains(&p.speed));
        assert!((1.0..1.5).contains(&p.size));
    }

    #[test]
    fn gas_particles_are_short() {
        let stream = always_spawn();
        let mut rng = StdRng::seed_from_u64(1);
        let mut conn = Connection::new(ComponentKind::Compressor, ComponentKind::Condenser);
        stream.update(&mut conn, Some(Phase::CompressorToCondenser), &mut rng);
        assert_eq!(conn.particles[0].length, 6.0);
        assert_eq!(conn.particles[0].state, RefrigerantState::HotGas);
    }

    #[test]
    fn inactive_pipe_is_emptied() {
        let stream = always_spawn();
        let mut rng = StdRng::seed_from_u64(3);
        let mut conn = Connection::new(ComponentKind::Compressor, ComponentKind::Condenser);
        for _ in 0..10 {
            stream.update(&mut conn, Some(Phase::CompressorToCondenser), &mut rng);
        }
        assert!(!conn.particles.is_empty());

        stream.update(&mut conn, Some(Phase::CondenserToExpansion), &mut rng);
        assert!(conn.particles.is_empty());

        for _ in 0..10 {
            stream.update(&mut conn, Some(Phase::CompressorToCondenser), &mut rng);
        }
        stream.update(&mut conn, None, &mut rng);
        assert!(conn.particles.is_empty());
    }

    #[test]
    fn particles_retire_after_traversal() {
        let stream = ParticleStream::new(ParticleConfig {
            liquid_spawn_probability: 1.0,
            ..ParticleConfig::default()
        })
        .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut conn = Connection::new(ComponentKind::Condenser, ComponentKind::ExpansionValve);
        let phase = Some(Phase::CondenserToExpansion);
        stream.update(&mut conn, phase, &mut rng);

        // Stop spawning and let the stream drain: slowest speed 0.8 needs
        // at most ceil(150 / 0.8) = 188 frames.
        let drain = ParticleStream::new(ParticleConfig {
            liquid_spawn_probability: 0.0,
            ..ParticleConfig::default()
        })
        .unwrap();
        for _ in 0..200 {
            drain.update(&mut conn, phase, &mut rng);
        }
        assert!(conn.particles.is_empty());
    }

    #[test]
    fn spawning_is_bounded() {
        let stream = ParticleStream::new(ParticleConfig {
            liquid_spawn_probability: 1.0,
            max_per_connection: 5,
            progress_divisor: 1.0e9,
            ..ParticleConfig::default()
        })
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut conn = Connection::new(ComponentKind::ExpansionValve, ComponentKind::Evaporator);
        for _ in 0..50 {
            stream.update(&mut conn, Some(Phase::ExpansionToEvaporator), &mut rng);
        }
        assert_eq!(conn.particles.len(), 5);
    }

    #[test]
    fn position_at_start_is_source_anchor() {
        let curve = QuadCurve::between(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let p = Particle {
            progress: 0.0,
            speed: 1.0,
            size: 1.0,
            length: 6.0,
            state: RefrigerantState::ColdGas,
        };
        assert_eq!(particle_position(&curve, &p), Point::new(0.0, 0.0));
    }
}
