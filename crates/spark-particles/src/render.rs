//! Packs live particles into GPU instance data for the renderer

use crate::emitter::EmitterId;
use crate::engine::ParticleEngine;
use crate::particle::ParticleInstance;

/// Draw data for one emitter, consumed by the renderer
pub struct ParticleDrawData<'a> {
    pub emitter: EmitterId,
    pub instances: &'a [ParticleInstance],
}

/// Reusable instance buffer, refilled every frame after `ParticleEngine::update`
#[derive(Default)]
pub struct InstanceBuffer {
    instances: Vec<ParticleInstance>,
    /// Per-emitter instance ranges: (emitter, start, count)
    ranges: Vec<(EmitterId, usize, usize)>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack every live particle, grouped by emitter in creation order
    pub fn pack(&mut self, engine: &ParticleEngine) {
        self.instances.clear();
        self.ranges.clear();

        for emitter in engine.emitters() {
            let count = emitter.particle_count();
            if count == 0 {
                continue;
            }
            let start = self.instances.len();
            self.instances
                .extend(emitter.particles().map(ParticleInstance::from_particle));
            self.ranges.push((emitter.id(), start, count));
        }
    }

    /// Packed instance data for a single upload
    pub fn instance_data(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Raw bytes of the instance data
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Draw data for each emitter that has live particles
    pub fn draw_data(&self) -> Vec<ParticleDrawData<'_>> {
        self.ranges
            .iter()
            .map(|&(emitter, start, count)| ParticleDrawData {
                emitter,
                instances: &self.instances[start..start + count],
            })
            .collect()
    }
}
