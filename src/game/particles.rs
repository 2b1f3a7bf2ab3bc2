//! Short-lived cosmetic particles.  Nothing here affects gameplay.
use super::grid::Pos;
use crate::consts;
use rand::Rng;
use std::f64::consts::TAU;

/// The kinds of particle bursts
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Burst {
    /// Sprayed when the player eats; falls under gravity
    Food,

    /// Ring thrown out when a snake crashes
    Explosion,
}

impl Burst {
    fn count(self) -> usize {
        match self {
            Burst::Food => consts::FOOD_PARTICLES,
            Burst::Explosion => consts::EXPLOSION_PARTICLES,
        }
    }

    fn decay(self) -> f64 {
        match self {
            Burst::Food => consts::FOOD_PARTICLE_DECAY,
            Burst::Explosion => consts::EXPLOSION_PARTICLE_DECAY,
        }
    }

    fn gravity(self) -> f64 {
        match self {
            Burst::Food => consts::PARTICLE_GRAVITY,
            Burst::Explosion => 0.0,
        }
    }
}

/// A single particle.  Positions and velocities are in tiles and tiles per
/// frame.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Particle {
    pub(crate) x: f64,
    pub(crate) y: f64,
    vx: f64,
    vy: f64,
    /// Remaining life, starting at 1.0; the particle is gone once this
    /// reaches zero
    pub(crate) life: f64,
    decay: f64,
    pub(crate) size: f64,
    pub(crate) kind: Burst,
}

impl Particle {
    /// Integrate one frame.  Returns `false` once the particle has died.
    fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        self.vy += self.kind.gravity();
        self.vx *= consts::PARTICLE_DRAG;
        self.vy *= consts::PARTICLE_DRAG;
        self.life -= self.decay;
        self.life > 0.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Particles(Vec<Particle>);

impl Particles {
    /// Emit a burst of `kind` from the center of the cell `origin`
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn spawn<R: Rng + ?Sized>(&mut self, kind: Burst, origin: Pos, rng: &mut R) {
        let x = f64::from(origin.x) + 0.5;
        let y = f64::from(origin.y) + 0.5;
        let count = kind.count();
        for i in 0..count {
            let (vx, vy, size) = match kind {
                Burst::Food => (
                    rng.random_range(-consts::FOOD_PARTICLE_SPREAD..consts::FOOD_PARTICLE_SPREAD),
                    rng.random_range(-consts::FOOD_PARTICLE_SPREAD..consts::FOOD_PARTICLE_SPREAD),
                    rng.random_range(2.0..6.0),
                ),
                Burst::Explosion => {
                    let angle = TAU * (i as f64) / (count as f64);
                    let speed = rng.random_range(
                        consts::EXPLOSION_MIN_SPEED..consts::EXPLOSION_MAX_SPEED,
                    );
                    (angle.cos() * speed, angle.sin() * speed, rng.random_range(3.0..9.0))
                }
            };
            self.0.push(Particle {
                x,
                y,
                vx,
                vy,
                life: 1.0,
                decay: kind.decay(),
                size,
                kind,
            });
        }
    }

    /// Integrate every particle by one frame and drop the dead ones
    pub(crate) fn advance(&mut self) {
        self.0.retain_mut(Particle::advance);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.0.iter()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Particles {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
