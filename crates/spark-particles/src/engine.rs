//! Top-level coordinator: owns the factory, the emitters and the frame stats

use crate::config::{EffectDef, EngineConfig};
use crate::emitter::{Emitter, EmitterId, FrameStats};
use crate::generators::Generator;
use crate::pool::ParticleFactory;
use crate::rand::{ParticleRng, RandomSource};
use crate::sprite::SpriteLookup;
use spark_core::{Result, SparkError};

/// Nominal frame step used by `pre_warm`
pub const PRE_WARM_STEP: f32 = 1.0 / 60.0;

/// The particle engine. Call `update` once per rendered frame.
pub struct ParticleEngine {
    factory: ParticleFactory,
    emitters: Vec<Emitter>,
    stats: FrameStats,
    rng: Box<dyn RandomSource>,
    next_id: u64,
}

impl ParticleEngine {
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self::with_rng(config, Box::new(ParticleRng::new(config.seed)))
    }

    /// Use a caller-supplied random source instead of the seeded default
    pub fn with_rng(config: &EngineConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            factory: ParticleFactory::with_limit(config.pooling, config.max_instances),
            emitters: Vec::new(),
            stats: FrameStats::default(),
            rng,
            next_id: 1,
        }
    }

    /// Register a new, unstarted emitter driven by `generator`
    pub fn create_emitter(&mut self, generator: impl Generator + 'static) -> EmitterId {
        self.add_emitter(Emitter::new(generator))
    }

    /// Take ownership of a prepared emitter
    pub fn add_emitter(&mut self, mut emitter: Emitter) -> EmitterId {
        let id = EmitterId(self.next_id);
        self.next_id += 1;
        emitter.set_id(id);
        self.emitters.push(emitter);
        id
    }

    /// Build every emitter in `effect`, starting the ones marked autostart
    pub fn spawn_effect(
        &mut self,
        effect: &EffectDef,
        sprites: &dyn SpriteLookup,
    ) -> Result<Vec<EmitterId>> {
        // Build everything first so a bad definition registers nothing
        let built = effect
            .emitters
            .iter()
            .map(|def| -> Result<(Emitter, bool)> { Ok((def.build(sprites)?, def.autostart)) })
            .collect::<Result<Vec<_>>>()?;

        let mut ids = Vec::with_capacity(built.len());
        for (emitter, autostart) in built {
            let id = self.add_emitter(emitter);
            if autostart {
                self.start_emitter(id)?;
            }
            ids.push(id);
        }
        Ok(ids)
    }

    pub fn emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.iter().find(|e| e.id() == id)
    }

    pub fn emitter_mut(&mut self, id: EmitterId) -> Option<&mut Emitter> {
        self.emitters.iter_mut().find(|e| e.id() == id)
    }

    /// Emitters in creation order
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn factory(&self) -> &ParticleFactory {
        &self.factory
    }

    pub fn start_emitter(&mut self, id: EmitterId) -> Result<()> {
        let emitter = self
            .emitters
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(SparkError::UnknownEmitter(id.0))?;
        emitter.start(&mut self.factory, self.rng.as_mut());
        Ok(())
    }

    pub fn start_all(&mut self) {
        for emitter in &mut self.emitters {
            emitter.start(&mut self.factory, self.rng.as_mut());
        }
    }

    pub fn pause_all(&mut self) {
        for emitter in &mut self.emitters {
            emitter.pause();
        }
    }

    pub fn resume_all(&mut self) {
        for emitter in &mut self.emitters {
            emitter.resume();
        }
    }

    /// Remove an emitter and return its particles to the factory
    pub fn remove_emitter(&mut self, id: EmitterId) -> Result<()> {
        let idx = self
            .emitters
            .iter()
            .position(|e| e.id() == id)
            .ok_or(SparkError::UnknownEmitter(id.0))?;
        let mut emitter = self.emitters.remove(idx);
        emitter.remove_particles(&mut self.factory);
        Ok(())
    }

    /// Advance every emitter by `elapsed` seconds, in creation order
    pub fn update(&mut self, elapsed: f32) {
        self.stats = FrameStats::default();
        for emitter in &mut self.emitters {
            emitter.update_on_frame(elapsed, &mut self.factory, self.rng.as_mut(), &mut self.stats);
        }
    }

    /// Fast-forward `seconds` of simulation in fixed 1/60 s steps
    pub fn pre_warm(&mut self, seconds: f32) {
        let steps = (seconds / PRE_WARM_STEP).round().max(0.0) as u32;
        tracing::debug!(seconds, steps, "pre-warming particle engine");
        for _ in 0..steps {
            self.update(PRE_WARM_STEP);
        }
    }

    pub fn remove_all_particles(&mut self) {
        for emitter in &mut self.emitters {
            emitter.remove_particles(&mut self.factory);
        }
    }

    pub fn blast_all(&mut self) {
        for emitter in &mut self.emitters {
            emitter.blast();
        }
    }

    /// Live particles across all emitters
    pub fn total_alive(&self) -> usize {
        self.emitters.iter().map(|e| e.particle_count()).sum()
    }
}

impl Default for ParticleEngine {
    fn default() -> Self {
        Self::new()
    }
}
