//! Particle factory: hands out particles and takes them back for reuse

use crate::particle::Particle;

/// Hard cap on constructed particle instances. Reaching it almost always
/// means particles are leaking rather than a real scene requirement.
pub const DEFAULT_MAX_INSTANCES: usize = 10_000;

/// Owns particle lifetime. In pooling mode retired particles go onto a free
/// list and come back out on the next `create`; otherwise every `create`
/// allocates and every `destroy` drops.
pub struct ParticleFactory {
    free: Vec<Box<Particle>>,
    pooling: bool,
    constructed: usize,
    live: usize,
    max_instances: usize,
}

impl ParticleFactory {
    pub fn pooled() -> Self {
        Self::with_limit(true, DEFAULT_MAX_INSTANCES)
    }

    pub fn unpooled() -> Self {
        Self::with_limit(false, DEFAULT_MAX_INSTANCES)
    }

    pub fn with_limit(pooling: bool, max_instances: usize) -> Self {
        Self {
            free: Vec::new(),
            pooling,
            constructed: 0,
            live: 0,
            max_instances,
        }
    }

    pub fn is_pooling(&self) -> bool {
        self.pooling
    }

    /// Instances constructed so far. Only tracked in pooling mode.
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    /// Particles handed out and not yet returned
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Retired instances waiting for reuse
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn max_instances(&self) -> usize {
        self.max_instances
    }

    /// Take a reset particle. Returns None once the instance cap is reached.
    pub fn create(&mut self) -> Option<Box<Particle>> {
        if let Some(p) = self.free.pop() {
            self.live += 1;
            return Some(p);
        }

        let in_existence = if self.pooling {
            self.constructed
        } else {
            self.live
        };
        if in_existence >= self.max_instances {
            tracing::error!(
                limit = self.max_instances,
                live = self.live,
                "particle pool exhausted; particles are probably leaking"
            );
            return None;
        }

        if self.pooling {
            self.constructed += 1;
        }
        self.live += 1;
        Some(Box::new(Particle::new()))
    }

    /// Return a particle. It is reset before reuse; in non-pooling mode it is dropped.
    pub fn destroy(&mut self, mut particle: Box<Particle>) {
        self.live = self.live.saturating_sub(1);
        if self.pooling {
            particle.reset();
            self.free.push(particle);
        }
    }
}

impl Default for ParticleFactory {
    fn default() -> Self {
        Self::pooled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spark_core::Vec2;

    #[test]
    fn pool_reuses_retired_instances() {
        let mut factory = ParticleFactory::pooled();
        let mut p = factory.create().unwrap();
        p.position = Vec2::new(5.0, 5.0);
        p.is_dead = true;
        let addr = &*p as *const Particle;

        factory.destroy(p);
        assert_eq!(factory.free_count(), 1);

        let again = factory.create().unwrap();
        assert_eq!(&*again as *const Particle, addr);
        assert!(again.is_pristine());
        assert_eq!(factory.constructed(), 1);
    }

    #[test]
    fn live_instances_are_distinct() {
        let mut factory = ParticleFactory::pooled();
        let a = factory.create().unwrap();
        let b = factory.create().unwrap();
        factory.destroy(a);
        let c = factory.create().unwrap();
        assert_ne!(&*b as *const Particle, &*c as *const Particle);
        assert_eq!(factory.live_count(), 2);
    }

    #[test]
    fn pool_refuses_past_cap() {
        let mut factory = ParticleFactory::with_limit(true, 3);
        let held: Vec<_> = (0..3).map(|_| factory.create().unwrap()).collect();
        assert!(factory.create().is_none());

        // Returning one makes it available again without constructing more
        for p in held {
            factory.destroy(p);
        }
        assert!(factory.create().is_some());
        assert_eq!(factory.constructed(), 3);
    }

    #[test]
    fn unpooled_mode_discards() {
        let mut factory = ParticleFactory::unpooled();
        let p = factory.create().unwrap();
        factory.destroy(p);
        assert_eq!(factory.free_count(), 0);
        assert_eq!(factory.live_count(), 0);
        assert!(!factory.is_pooling());
    }
}
