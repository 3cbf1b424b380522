//! Emitter: one spawn point, its live particles and the rules that drive them

use crate::emitter_modifiers::EmitterModifier;
use crate::generators::{Emission, Generator};
use crate::initers::{Initer, IniterKind};
use crate::modifiers::{Modifier, ModifierKind};
use crate::particle::Particle;
use crate::pool::ParticleFactory;
use crate::rand::RandomSource;
use spark_core::Vec2;

/// Stable handle to an emitter owned by a `ParticleEngine`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EmitterId(pub u64);

/// Emitter placement as seen by initers and modifiers
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EmitterView {
    pub position: Vec2,
    /// Where the emitter was at the end of the previous frame
    pub last_position: Vec2,
}

impl EmitterView {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            last_position: position,
        }
    }
}

/// Per-frame counters, reset by the engine at the start of every update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub num_particles: usize,
    pub num_created: usize,
    pub num_destroyed: usize,
}

/// Runtime state for one emitter
pub struct Emitter {
    id: EmitterId,
    /// Spawn point; new particles start here
    pub position: Vec2,
    last_position: Vec2,
    /// Position at the end of the previous frame
    settled_position: Vec2,
    started: bool,
    running: bool,
    particles: Vec<Box<Particle>>,
    generator: Box<dyn Generator>,
    initers: Vec<Box<dyn Initer>>,
    modifiers: Vec<Box<dyn Modifier>>,
    emitter_modifiers: Vec<Box<dyn EmitterModifier>>,
}

impl Emitter {
    pub fn new(generator: impl Generator + 'static) -> Self {
        Self::from_boxed(Box::new(generator))
    }

    pub fn from_boxed(generator: Box<dyn Generator>) -> Self {
        Self {
            id: EmitterId::default(),
            position: Vec2::ZERO,
            last_position: Vec2::ZERO,
            settled_position: Vec2::ZERO,
            started: false,
            running: true,
            particles: Vec::new(),
            generator,
            initers: Vec::new(),
            modifiers: Vec::new(),
            emitter_modifiers: Vec::new(),
        }
    }

    pub fn id(&self) -> EmitterId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: EmitterId) {
        self.id = id;
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn last_position(&self) -> Vec2 {
        self.last_position
    }

    pub fn view(&self) -> EmitterView {
        EmitterView {
            position: self.position,
            last_position: self.last_position,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Live particles, for rendering
    pub fn particles(&self) -> impl ExactSizeIterator<Item = &Particle> {
        self.particles.iter().map(|p| &**p)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    // ── Rule registration ──

    pub fn add_init(&mut self, initer: impl Initer + 'static) -> &mut Self {
        self.initers.push(Box::new(initer));
        self
    }

    pub fn add_modifier(&mut self, modifier: impl Modifier + 'static) -> &mut Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn add_emitter_modifier(&mut self, modifier: impl EmitterModifier + 'static) -> &mut Self {
        self.emitter_modifiers.push(Box::new(modifier));
        self
    }

    pub fn add_boxed_init(&mut self, initer: Box<dyn Initer>) -> &mut Self {
        self.initers.push(initer);
        self
    }

    pub fn add_boxed_modifier(&mut self, modifier: Box<dyn Modifier>) -> &mut Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn add_boxed_emitter_modifier(&mut self, modifier: Box<dyn EmitterModifier>) -> &mut Self {
        self.emitter_modifiers.push(modifier);
        self
    }

    /// First registered initer of `kind`
    pub fn initer_of_kind(&self, kind: IniterKind) -> Option<&dyn Initer> {
        self.initers
            .iter()
            .find(|i| i.kind() == kind)
            .map(|i| i.as_ref())
    }

    /// Remove every initer of `kind`, returning how many were removed
    pub fn remove_initers_of_kind(&mut self, kind: IniterKind) -> usize {
        let before = self.initers.len();
        self.initers.retain(|i| i.kind() != kind);
        before - self.initers.len()
    }

    pub fn modifier_of_kind(&self, kind: ModifierKind) -> Option<&dyn Modifier> {
        self.modifiers
            .iter()
            .find(|m| m.kind() == kind)
            .map(|m| m.as_ref())
    }

    pub fn remove_modifiers_of_kind(&mut self, kind: ModifierKind) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.kind() != kind);
        before - self.modifiers.len()
    }

    // ── Control ──

    /// Start emitting. A second call does nothing.
    pub fn start(&mut self, factory: &mut ParticleFactory, rng: &mut dyn RandomSource) {
        if self.started {
            return;
        }
        self.started = true;
        self.settled_position = self.position;
        self.last_position = self.position;

        self.run_emitter_inits();

        let initial = self.generator.start_emitter(rng);
        tracing::debug!(emitter = self.id.0, initial, "emitter started");
        // Initial particles ignore the running flag
        self.spawn(Emission::steady(initial), factory, rng);
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Arm a burst on the generator. No effect unless the generator supports bursts.
    pub fn blast(&mut self) {
        self.generator.blast();
    }

    /// Destroy every live particle now. Started/running flags are untouched.
    pub fn remove_particles(&mut self, factory: &mut ParticleFactory) -> usize {
        let removed = self.particles.len();
        for p in self.particles.drain(..) {
            factory.destroy(p);
        }
        if removed > 0 {
            tracing::debug!(emitter = self.id.0, removed, "emitter particles cleared");
        }
        removed
    }

    /// Advance one frame. Does nothing before `start`.
    pub fn update_on_frame(
        &mut self,
        elapsed: f32,
        factory: &mut ParticleFactory,
        rng: &mut dyn RandomSource,
        stats: &mut FrameStats,
    ) {
        if !self.started {
            return;
        }
        self.last_position = self.settled_position;

        // Particles created this frame are first updated next frame
        let settled = self.particles.len();

        // Timing advances even while paused
        let emission = self.generator.spawn_particles(elapsed, rng);
        stats.num_created += emission.count as usize;
        if self.running {
            self.spawn(emission, factory, rng);
        }
        self.run_emitter_modifiers(elapsed);
        if self.running {
            self.run_modifiers(settled, elapsed, rng);
        }

        stats.num_destroyed += self.compact(factory);
        stats.num_particles += self.particles.len();
        self.settled_position = self.position;
    }

    fn run_emitter_inits(&mut self) {
        let mut view = self.view();
        for m in &mut self.emitter_modifiers {
            m.init(&mut view);
        }
        self.position = view.position;
    }

    fn run_emitter_modifiers(&mut self, elapsed: f32) {
        let mut view = self.view();
        for m in &mut self.emitter_modifiers {
            m.update(&mut view, elapsed);
        }
        self.position = view.position;
    }

    fn run_modifiers(&mut self, count: usize, elapsed: f32, rng: &mut dyn RandomSource) {
        let view = self.view();
        for particle in &mut self.particles[..count] {
            for m in &mut self.modifiers {
                m.update(&view, particle, elapsed, rng);
                if particle.is_dead {
                    break;
                }
            }
        }
    }

    fn spawn(
        &mut self,
        emission: Emission,
        factory: &mut ParticleFactory,
        rng: &mut dyn RandomSource,
    ) {
        if emission.count == 0 {
            return;
        }
        let view = self.view();
        if emission.blast {
            tracing::debug!(emitter = self.id.0, count = emission.count, "blast");
            for initer in &mut self.initers {
                initer.on_blast(&view, emission.count, rng);
            }
        }

        for _ in 0..emission.count {
            let Some(mut particle) = factory.create() else {
                tracing::warn!(emitter = self.id.0, "particle factory exhausted, pausing emitter");
                self.running = false;
                return;
            };
            particle.position = self.position;
            particle.last_position = self.position;
            for initer in &mut self.initers {
                initer.init(&view, &mut particle, rng);
            }
            self.particles.push(particle);
        }
    }

    /// Return dead particles to the factory, keeping survivors in order
    fn compact(&mut self, factory: &mut ParticleFactory) -> usize {
        let mut write = 0;
        for read in 0..self.particles.len() {
            if !self.particles[read].is_dead {
                self.particles.swap(write, read);
                write += 1;
            }
        }
        let dead = self.particles.len() - write;
        for p in self.particles.drain(write..) {
            factory.destroy(p);
        }
        dead
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter_modifiers::Orbit;
    use crate::generators::{Blast, Steady};
    use crate::initers::LifeTime;
    use crate::modifiers::{Age, Move};
    use crate::rand::ParticleRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct KillMarked;

    impl Modifier for KillMarked {
        fn kind(&self) -> ModifierKind {
            ModifierKind::Custom("kill-marked")
        }

        fn update(&mut self, _: &EmitterView, p: &mut Particle, _: f32, _: &mut dyn RandomSource) {
            if p.sort_value < 0.0 {
                p.is_dead = true;
            }
        }
    }

    struct CountCalls(usize);

    impl Modifier for CountCalls {
        fn kind(&self) -> ModifierKind {
            ModifierKind::Custom("count")
        }

        fn update(&mut self, _: &EmitterView, _: &mut Particle, _: f32, _: &mut dyn RandomSource) {
            self.0 += 1;
        }
    }

    /// Records the emitter position each particle update sees
    struct SeenPosition(Rc<RefCell<Vec<Vec2>>>);

    impl Modifier for SeenPosition {
        fn kind(&self) -> ModifierKind {
            ModifierKind::Custom("seen-position")
        }

        fn update(&mut self, e: &EmitterView, _: &mut Particle, _: f32, _: &mut dyn RandomSource) {
            self.0.borrow_mut().push(e.position);
        }
    }

    fn started(emitter: &mut Emitter, factory: &mut ParticleFactory, rng: &mut ParticleRng) {
        emitter.start(factory, rng);
    }

    #[test]
    fn update_before_start_is_noop() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut stats = FrameStats::default();
        let mut emitter = Emitter::new(Steady::new(100.0));

        emitter.update_on_frame(1.0, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particle_count(), 0);
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn start_is_idempotent() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Blast::new(3, 3).unwrap().with_auto_blast(true));
        started(&mut emitter, &mut factory, &mut rng);
        started(&mut emitter, &mut factory, &mut rng);
        assert!(emitter.is_started());

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.016, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particle_count(), 3);
    }

    #[test]
    fn compaction_removes_dead_and_keeps_order() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Steady::new(0.0));
        emitter.add_modifier(KillMarked);
        started(&mut emitter, &mut factory, &mut rng);

        // Mark particles 1, 2 and 4 of 0..6; adjacent deaths must not be skipped
        for i in 0..6 {
            let mut p = factory.create().unwrap();
            p.rotation = i as f32;
            p.sort_value = if matches!(i, 1 | 2 | 4) { -1.0 } else { 0.0 };
            emitter.particles.push(p);
        }
        let free_before = factory.free_count();

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.016, &mut factory, &mut rng, &mut stats);

        let survivors: Vec<f32> = emitter.particles().map(|p| p.rotation).collect();
        assert_eq!(survivors, vec![0.0, 3.0, 5.0]);
        assert_eq!(stats.num_destroyed, 3);
        assert_eq!(stats.num_particles, 3);
        assert_eq!(factory.free_count(), free_before + 3);
    }

    #[test]
    fn dead_particles_skip_remaining_modifiers() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Steady::new(0.0));
        emitter.add_modifier(Age::default()).add_modifier(Move);
        started(&mut emitter, &mut factory, &mut rng);

        let mut p = factory.create().unwrap();
        p.lifetime = 0.1;
        p.velocity = Vec2::new(1.0, 0.0);
        emitter.particles.push(p);

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.5, &mut factory, &mut rng, &mut stats);
        assert_eq!(stats.num_destroyed, 1);
        assert_eq!(emitter.particle_count(), 0);
        // The recycled instance was reset, and Move never ran on it
        assert!(factory.create().unwrap().is_pristine());
    }

    #[test]
    fn paused_emitter_advances_timing_but_spawns_nothing() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Steady::new(2.0));
        emitter.add_init(LifeTime::new(10.0, 10.0));
        started(&mut emitter, &mut factory, &mut rng);
        emitter.pause();

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.5, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particle_count(), 0);
        assert_eq!(stats.num_created, 1);

        emitter.resume();
        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.25, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particle_count(), 0);
        emitter.update_on_frame(0.25, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particle_count(), 1);
    }

    #[test]
    fn exhaustion_pauses_emitter() {
        let mut factory = ParticleFactory::with_limit(true, 4);
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Blast::new(10, 10).unwrap());
        emitter.add_init(LifeTime::new(5.0, 5.0));
        started(&mut emitter, &mut factory, &mut rng);
        emitter.blast();

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.016, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particle_count(), 4);
        assert!(!emitter.is_running());
    }

    #[test]
    fn remove_particles_keeps_flags() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Blast::new(4, 4).unwrap());
        emitter.add_init(LifeTime::new(5.0, 5.0));
        started(&mut emitter, &mut factory, &mut rng);
        emitter.blast();
        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.016, &mut factory, &mut rng, &mut stats);

        assert_eq!(emitter.remove_particles(&mut factory), 4);
        assert_eq!(emitter.particle_count(), 0);
        assert_eq!(factory.free_count(), 4);
        assert!(emitter.is_started());
        assert!(emitter.is_running());
    }

    #[test]
    fn kind_lookup_and_removal() {
        let mut emitter = Emitter::new(Steady::new(1.0));
        emitter
            .add_init(LifeTime::new(1.0, 1.0))
            .add_init(LifeTime::new(0.5, 0.5))
            .add_modifier(Move)
            .add_modifier(CountCalls(0));

        assert!(emitter.initer_of_kind(IniterKind::LifeTime).is_some());
        assert!(emitter.initer_of_kind(IniterKind::Alpha).is_none());
        assert_eq!(emitter.remove_initers_of_kind(IniterKind::LifeTime), 2);
        assert!(emitter.initer_of_kind(IniterKind::LifeTime).is_none());

        assert!(emitter.modifier_of_kind(ModifierKind::Custom("count")).is_some());
        assert_eq!(emitter.remove_modifiers_of_kind(ModifierKind::Move), 1);
        assert!(emitter.modifier_of_kind(ModifierKind::Move).is_none());
    }

    #[test]
    fn spawned_particles_start_at_emitter_position() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter =
            Emitter::new(Blast::new(2, 2).unwrap()).with_position(Vec2::new(3.0, 4.0));
        emitter.add_init(LifeTime::new(1.0, 1.0));
        started(&mut emitter, &mut factory, &mut rng);
        emitter.blast();

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.016, &mut factory, &mut rng, &mut stats);
        for p in emitter.particles() {
            assert_eq!(p.position, Vec2::new(3.0, 4.0));
        }
    }

    #[test]
    fn new_particles_are_first_updated_next_frame() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Blast::new(1, 1).unwrap());
        emitter.add_init(LifeTime::new(1.0, 1.0)).add_modifier(Age::default());
        started(&mut emitter, &mut factory, &mut rng);
        emitter.blast();

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.25, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particles().next().unwrap().age, 0.0);

        emitter.update_on_frame(0.25, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.particles().next().unwrap().age, 0.25);
    }

    #[test]
    fn last_position_trails_one_frame() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Steady::new(0.0));
        started(&mut emitter, &mut factory, &mut rng);
        let mut stats = FrameStats::default();

        emitter.position = Vec2::new(5.0, 0.0);
        emitter.update_on_frame(0.016, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.last_position(), Vec2::ZERO);

        emitter.position = Vec2::new(9.0, 0.0);
        emitter.update_on_frame(0.016, &mut factory, &mut rng, &mut stats);
        assert_eq!(emitter.last_position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn start_runs_emitter_modifier_init() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let mut emitter = Emitter::new(Steady::new(0.0));
        emitter.add_emitter_modifier(Orbit::new(1.0, 1.0));
        assert_eq!(emitter.position, Vec2::ZERO);

        started(&mut emitter, &mut factory, &mut rng);
        assert!((emitter.position.x - 1.0).abs() < 1e-6);
        assert!(emitter.position.y.abs() < 1e-6);
    }

    #[test]
    fn emitter_modifiers_run_before_particle_modifiers() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new(Steady::new(0.0));
        emitter
            .add_emitter_modifier(Orbit::new(1.0, 1.0))
            .add_modifier(SeenPosition(Rc::clone(&seen)));
        started(&mut emitter, &mut factory, &mut rng);
        emitter.particles.push(factory.create().unwrap());

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.5, &mut factory, &mut rng, &mut stats);
        let moved = emitter.position;
        assert!(moved.y > 0.4, "orbit did not advance: {moved:?}");
        assert_eq!(*seen.borrow(), vec![moved]);
    }

    #[test]
    fn paused_emitter_keeps_running_emitter_modifiers() {
        let mut factory = ParticleFactory::pooled();
        let mut rng = ParticleRng::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = Emitter::new(Steady::new(0.0));
        emitter
            .add_emitter_modifier(Orbit::new(1.0, 1.0))
            .add_modifier(SeenPosition(Rc::clone(&seen)));
        started(&mut emitter, &mut factory, &mut rng);
        emitter.particles.push(factory.create().unwrap());
        emitter.pause();
        let before = emitter.position;

        let mut stats = FrameStats::default();
        emitter.update_on_frame(0.5, &mut factory, &mut rng, &mut stats);
        assert_ne!(emitter.position, before);
        assert_eq!(emitter.last_position(), before);
        assert!(seen.borrow().is_empty());

        emitter.resume();
        emitter.update_on_frame(0.5, &mut factory, &mut rng, &mut stats);
        assert_eq!(seen.borrow().len(), 1);
    }
}
