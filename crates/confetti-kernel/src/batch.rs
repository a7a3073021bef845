//! Per-frame vertex/index batch for one draw call.
//!
//! Position, scale and rotation are resolved on the CPU. Alpha and color are
//! packed into the vertex so the shader can interpolate them per pixel from
//! the `time` uniform.

use bytemuck::{Pod, Zeroable};
use confetti_common::{ImageId, ShaderId};
use glam::Vec2;

use crate::easing::Easing;
use crate::params::{AnimationParams, PositionMode, PropertyAnimation};
use crate::pool::{Particle, ParticlePool};
use crate::sequence::{evaluate_sequence, SequenceSnapshot};

/// Vertices per particle quad.
pub const VERTICES_PER_PARTICLE: usize = 4;

/// Indices per particle quad.
pub const INDICES_PER_PARTICLE: usize = 6;

/// Source image a system draws from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    /// Renderer-side image id
    pub id: ImageId,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ImageHandle {
    /// Creates a handle.
    #[must_use]
    pub fn new(id: ImageId, width: u32, height: u32) -> Self {
        Self {
            id,
            width: width as f32,
            height: height as f32,
        }
    }
}

/// Compiled particle shader owned by the renderer.
pub type ShaderHandle = ShaderId;

/// Vertex layout consumed by the particle shader (48 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Screen position
    pub dst: [f32; 2],
    /// Source position in image pixels
    pub src: [f32; 2],
    /// (start alpha, end alpha, alpha easing / 25, color easing / 25)
    pub color: [f32; 4],
    /// (spawn time, duration, packed start RGB, packed end RGB)
    pub custom: [f32; 4],
}

/// A built batch, borrowed from the builder until the next build.
#[derive(Debug, Clone, Copy)]
pub struct DrawBatch<'a> {
    /// Quad vertices
    pub vertices: &'a [Vertex],
    /// Triangle indices
    pub indices: &'a [u32],
    /// Value of the `Time` uniform
    pub time: f32,
    /// Image to sample
    pub image: ImageHandle,
    /// Shader to draw with
    pub shader: ShaderHandle,
}

impl DrawBatch<'_> {
    /// Number of quads in the batch.
    #[must_use]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_PARTICLE
    }

    /// Vertex data as raw bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices)
    }

    /// Index data as raw bytes for upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices)
    }
}

/// Packs an RGB color (0.0-1.0 per channel) into one float as `r<<16 | g<<8 | b`.
#[must_use]
pub fn pack_rgb(rgb: [f32; 3]) -> f32 {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u32);
    ((r << 16) | (g << 8) | b) as f32
}

/// Reusable vertex/index storage.
#[derive(Debug, Default)]
pub struct BatchBuilder {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl BatchBuilder {
    /// Creates a builder with room for `max_particles` quads.
    #[must_use]
    pub fn with_capacity(max_particles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(max_particles * VERTICES_PER_PARTICLE),
            indices: Vec::with_capacity(max_particles * INDICES_PER_PARTICLE),
        }
    }

    /// Vertices from the last build.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Indices from the last build.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Rebuilds the batch for every active particle at simulation time `now`.
    ///
    /// Returns `None` when there is nothing to draw: no image, no shader, or
    /// no active particles. The buffers are cleared either way.
    pub fn build(
        &mut self,
        pool: &ParticlePool,
        params: &AnimationParams,
        image: Option<ImageHandle>,
        shader: Option<ShaderHandle>,
        now: f32,
    ) -> Option<DrawBatch<'_>> {
        self.vertices.clear();
        self.indices.clear();

        let (image, shader) = (image?, shader?);
        if pool.active_count() == 0 {
            return None;
        }

        let half = Vec2::new(image.width, image.height) / 2.0;
        let uvs = [
            [0.0, 0.0],
            [image.width, 0.0],
            [0.0, image.height],
            [image.width, image.height],
        ];

        for (_, p) in pool.iter_active() {
            let elapsed = p.elapsed(now);
            let t = p.progress(now);

            let center = resolve_position(p, params, elapsed, t);
            let scale = resolve_scalar(
                &params.scale,
                p.start_scale,
                p.end_scale,
                p.scale_easing,
                &p.snapshots.scale,
                elapsed,
                t,
            );
            let rotation = resolve_scalar(
                &params.rotation,
                p.start_rotation,
                p.end_rotation,
                p.rotation_easing,
                &p.snapshots.rotation,
                elapsed,
                t,
            );

            // Sequenced alpha is baked here; the shader then sees a flat curve.
            let (start_alpha, end_alpha, alpha_easing) = match &params.alpha {
                PropertyAnimation::Sequence(seq) => {
                    let a = evaluate_sequence(seq, &p.snapshots.alpha, elapsed);
                    (a, a, Easing::Linear)
                }
                PropertyAnimation::Simple { .. } => (p.start_alpha, p.end_alpha, p.alpha_easing),
            };

            let color = [
                start_alpha,
                end_alpha,
                alpha_easing.normalized(),
                p.color_easing.normalized(),
            ];
            let custom = [
                p.spawn_time,
                p.duration,
                pack_rgb(p.start_color),
                pack_rgb(p.end_color),
            ];

            let extent = half * scale;
            let rot = if rotation == 0.0 {
                Vec2::X
            } else {
                Vec2::from_angle(rotation)
            };
            let corners = [
                Vec2::new(-extent.x, -extent.y),
                Vec2::new(extent.x, -extent.y),
                Vec2::new(-extent.x, extent.y),
                Vec2::new(extent.x, extent.y),
            ];

            let base = self.vertices.len() as u32;
            for (corner, src) in corners.into_iter().zip(uvs) {
                let dst = center + rot.rotate(corner);
                self.vertices.push(Vertex {
                    dst: dst.to_array(),
                    src,
                    color,
                    custom,
                });
            }
            self.indices
                .extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
        }

        Some(DrawBatch {
            vertices: &self.vertices,
            indices: &self.indices,
            time: now,
            image,
            shader,
        })
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn resolve_position(p: &Particle, params: &AnimationParams, elapsed: f32, t: f32) -> Vec2 {
    let lerped = p.start_position.lerp(p.end_position, p.position_easing.apply(t));
    match &params.position {
        PositionMode::Sequence { x, y, .. } => Vec2::new(
            x.as_ref()
                .map_or(lerped.x, |seq| evaluate_sequence(seq, &p.snapshots.x, elapsed)),
            y.as_ref()
                .map_or(lerped.y, |seq| evaluate_sequence(seq, &p.snapshots.y, elapsed)),
        ),
        PositionMode::Cartesian(_) | PositionMode::Polar { .. } => lerped,
    }
}

fn resolve_scalar(
    animation: &PropertyAnimation,
    start: f32,
    end: f32,
    easing: Easing,
    snapshot: &SequenceSnapshot,
    elapsed: f32,
    t: f32,
) -> f32 {
    match animation {
        PropertyAnimation::Sequence(seq) => evaluate_sequence(seq, snapshot, elapsed),
        PropertyAnimation::Simple { .. } => lerp(start, end, easing.apply(t)),
    }
}
